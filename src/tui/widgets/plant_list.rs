use crate::tui::widgets::color::{get_contrast_text_color, parse_color};
use crate::view::PlantView;
use crate::Config;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{
    Block, Borders, List, ListItem, ListState, Paragraph, Scrollbar, ScrollbarOrientation,
    ScrollbarState, StatefulWidget,
};
use ratatui::Frame;

/// One sidebar row: watered marker, number and name, cut to `max_width`
pub fn plant_row(view: &PlantView, max_width: usize) -> String {
    let marker = if view.watered_today { "✓" } else { "○" };
    let row = format!("{} {}. {}", marker, view.index + 1, view.name);
    truncate(&row, max_width)
}

fn truncate(text: &str, max_width: usize) -> String {
    if text.chars().count() > max_width {
        text.chars().take(max_width.saturating_sub(3)).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

pub fn render_plant_list(
    f: &mut Frame,
    area: Rect,
    views: &[PlantView],
    list_state: &mut ListState,
    config: &Config,
) {
    if area.width < 2 || area.height < 2 {
        return;
    }

    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let highlight_bg = parse_color(&active_theme.highlight_bg);
    let highlight_fg = if active_theme.highlight_fg.is_empty() {
        get_contrast_text_color(highlight_bg)
    } else {
        parse_color(&active_theme.highlight_fg)
    };

    let watered_count = views.iter().filter(|v| v.watered_today).count();
    let title = format!("My Plants ({}/{} watered)", watered_count, views.len());
    let block = Block::default().borders(Borders::ALL).title(title);

    if views.is_empty() {
        let empty = Paragraph::new("No plants yet!\nPress 'a' to add one.")
            .block(block)
            .style(Style::default().fg(fg_color))
            .wrap(ratatui::widgets::Wrap { trim: true });
        f.render_widget(empty, area);
        return;
    }

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);
    let list_area = horizontal[0];
    let scrollbar_area = horizontal[1];

    let max_width = list_area.width.saturating_sub(4) as usize; // borders + highlight symbol
    let items: Vec<ListItem> = views
        .iter()
        .map(|view| {
            let style = if view.watered_today {
                Style::default().fg(highlight_bg).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(fg_color)
            };
            ListItem::new(plant_row(view, max_width)).style(style)
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .style(Style::default().fg(fg_color))
        .highlight_style(Style::default().fg(highlight_fg).bg(highlight_bg));
    StatefulWidget::render(list, list_area, f.buffer_mut(), list_state);

    let visible_items = list_area.height.saturating_sub(2) as usize;
    if views.len() > visible_items && list_area.height > 2 {
        let scrollbar_inner_area = Rect::new(
            scrollbar_area.x,
            list_area.y + 1,
            scrollbar_area.width,
            list_area.height.saturating_sub(2),
        );
        let mut scrollbar_state = ScrollbarState::new(views.len())
            .viewport_content_length(visible_items)
            .position(list_state.offset());
        let scrollbar = Scrollbar::default()
            .orientation(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("↑"))
            .end_symbol(Some("↓"))
            .track_symbol(Some("│"))
            .thumb_symbol("█");
        f.render_stateful_widget(scrollbar, scrollbar_inner_area, &mut scrollbar_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(index: usize, name: &str, watered_today: bool) -> PlantView {
        PlantView {
            index,
            name: name.to_string(),
            last_watered: "Never".to_string(),
            date_added: "10/16/2026".to_string(),
            notes: None,
            watered_today,
        }
    }

    #[test]
    fn rows_are_numbered_from_one_and_marked() {
        assert_eq!(plant_row(&view(0, "Fern", false), 40), "○ 1. Fern");
        assert_eq!(plant_row(&view(4, "Rose", true), 40), "✓ 5. Rose");
    }

    #[test]
    fn long_names_are_cut_with_ellipsis() {
        let row = plant_row(&view(0, "Phalaenopsis amabilis", false), 12);
        assert_eq!(row, "○ 1. Phal...");
        assert_eq!(row.chars().count(), 12);
    }
}
