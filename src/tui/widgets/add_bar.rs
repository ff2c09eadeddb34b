use crate::tui::app::{AddState, Mode};
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};
use crate::Config;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph};
use ratatui::Frame;

/// Draw the add bar; returns the cursor position while it has focus
pub fn render_add_bar(
    f: &mut Frame,
    area: Rect,
    add: &mut AddState,
    mode: Mode,
    config: &Config,
) -> Option<(u16, u16)> {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let highlight_bg = parse_color(&active_theme.highlight_bg);
    let focused = mode == Mode::Add;

    let title = if focused {
        "Add plant (Enter: add • Tab: complete • Esc: close)".to_string()
    } else {
        format!(
            "Press {} to add a plant",
            crate::utils::format_key_binding_for_display(&config.key_bindings.add)
        )
    };
    let border_style = if focused {
        Style::default().fg(highlight_bg)
    } else {
        Style::default().fg(fg_color)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(border_style);
    let input_area = block.inner(area);
    f.render_widget(block, area);

    add.input.update_horizontal_scroll(input_area.width as usize);
    let text: Vec<Line> = add
        .input
        .get_visible_lines(1, input_area.width as usize)
        .into_iter()
        .map(Line::from)
        .collect();
    f.render_widget(Paragraph::new(text).style(Style::default().fg(fg_color)), input_area);

    if focused {
        add.input.get_cursor_screen_pos(input_area)
    } else {
        None
    }
}

/// Suggestion box floating just above the add bar
pub fn render_suggestions(
    f: &mut Frame,
    add_area: Rect,
    suggestions: &[String],
    selected: Option<usize>,
    config: &Config,
) {
    if suggestions.is_empty() || add_area.y == 0 {
        return;
    }
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let highlight_bg = parse_color(&active_theme.highlight_bg);
    let highlight_fg = get_contrast_text_color(highlight_bg);

    let height = (suggestions.len() as u16 + 2).min(add_area.y);
    let width = suggestions
        .iter()
        .map(|s| s.chars().count() as u16 + 4)
        .max()
        .unwrap_or(0)
        .clamp(20, add_area.width.max(20))
        .min(add_area.width);
    let popup = Rect::new(add_area.x, add_area.y - height, width, height);
    f.render_widget(Clear, popup);

    let items: Vec<ListItem> = suggestions
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let style = if Some(i) == selected {
                Style::default()
                    .fg(highlight_fg)
                    .bg(highlight_bg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(fg_color).bg(bg_color)
            };
            ListItem::new(name.as_str()).style(style)
        })
        .collect();
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Suggestions")
            .style(Style::default().fg(fg_color).bg(bg_color)),
    );
    f.render_widget(list, popup);
}
