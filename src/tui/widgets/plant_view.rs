use crate::tui::widgets::color::parse_color;
use crate::view::PlantView;
use crate::Config;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState};
use ratatui::Frame;
use std::cmp;

/// Detail pane text for one plant, one entry per line
pub fn detail_lines(view: &PlantView) -> Vec<(String, String)> {
    let watered = if view.watered_today {
        format!("{} (today)", view.last_watered)
    } else {
        view.last_watered.clone()
    };
    let mut lines = vec![
        ("Name".to_string(), view.name.clone()),
        ("Last watered".to_string(), watered),
        ("Added".to_string(), view.date_added.clone()),
        (String::new(), String::new()),
    ];
    match view.notes {
        Some(ref notes) => {
            lines.push(("Notes".to_string(), String::new()));
            lines.extend(notes.lines().map(|l| (String::new(), l.to_string())));
        }
        None => lines.push(("Notes".to_string(), "(none)".to_string())),
    }
    lines
}

pub fn render_plant_view(
    f: &mut Frame,
    area: Rect,
    view: Option<&PlantView>,
    config: &Config,
    scroll_offset: usize,
) {
    if area.width < 2 || area.height < 2 {
        return;
    }

    let fg_color = parse_color(&config.get_active_theme().fg);
    let accent = parse_color(&config.get_active_theme().highlight_bg);
    let base_style = Style::default().fg(fg_color);

    let Some(view) = view else {
        let hint = Paragraph::new("Select a plant to see its details.")
            .block(Block::default().borders(Borders::ALL).title("Plant"))
            .style(base_style);
        f.render_widget(hint, area);
        return;
    };

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);
    let content_area = horizontal[0];
    let scrollbar_area = horizontal[1];

    let label_style = Style::default().fg(accent).add_modifier(Modifier::BOLD);
    let lines: Vec<Line> = detail_lines(view)
        .into_iter()
        .map(|(label, value)| {
            if label.is_empty() {
                Line::from(format!("  {}", value))
            } else {
                Line::from(vec![
                    Span::styled(format!("{}: ", label), label_style),
                    Span::raw(value),
                ])
            }
        })
        .collect();

    let viewport_height = area.height.saturating_sub(2) as usize;
    let total_lines = lines.len();
    let scroll_offset = cmp::min(scroll_offset, total_lines.saturating_sub(viewport_height));
    let visible = Text::from(
        lines
            .into_iter()
            .skip(scroll_offset)
            .take(viewport_height)
            .collect::<Vec<_>>(),
    );

    let paragraph = Paragraph::new(visible)
        .block(Block::default().borders(Borders::ALL).title(format!("Plant #{}", view.index + 1)))
        .style(base_style)
        .wrap(ratatui::widgets::Wrap { trim: false });
    f.render_widget(paragraph, content_area);

    if total_lines > viewport_height {
        let scrollbar_inner_area = Rect::new(
            scrollbar_area.x,
            content_area.y + 1,
            scrollbar_area.width,
            content_area.height.saturating_sub(2),
        );
        let mut scrollbar_state = ScrollbarState::new(total_lines)
            .viewport_content_length(viewport_height)
            .position(scroll_offset);
        let scrollbar = Scrollbar::default()
            .orientation(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("↑"))
            .end_symbol(Some("↓"));
        f.render_stateful_widget(scrollbar, scrollbar_inner_area, &mut scrollbar_state);
    }
}
