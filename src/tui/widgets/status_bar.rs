use crate::tui::widgets::color::{get_contrast_text_color, parse_color};
use crate::Config;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

const SEPARATOR: &str = " • ";
const ELLIPSIS: &str = "...";

/// Join as many hints as fit in `max_width`, ending with "..." when some are left out
pub fn fit_hints(key_hints: &[String], max_width: usize) -> String {
    let mut text = String::new();
    for hint in key_hints {
        let addition = if text.is_empty() {
            hint.clone()
        } else {
            format!("{}{}", SEPARATOR, hint)
        };
        if text.chars().count() + addition.chars().count() > max_width {
            return with_ellipsis(&text, max_width, hint);
        }
        text.push_str(&addition);
    }
    text
}

fn with_ellipsis(text: &str, max_width: usize, first_hint: &str) -> String {
    let base = if text.is_empty() { first_hint } else { text };
    let room = max_width.saturating_sub(ELLIPSIS.len());
    let kept: String = base.chars().take(room).collect();
    kept + ELLIPSIS
}

pub fn render_status_bar(
    f: &mut Frame,
    area: Rect,
    message: Option<&str>,
    key_hints: &[String],
    config: &Config,
) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let highlight_bg = parse_color(&active_theme.highlight_bg);
    let max_width = area.width as usize;

    let (content, style) = match message {
        Some(msg) => {
            let content = if msg.chars().count() > max_width {
                msg.chars().take(max_width.saturating_sub(3)).collect::<String>() + ELLIPSIS
            } else {
                msg.to_string()
            };
            let msg_fg = get_contrast_text_color(highlight_bg);
            (
                content,
                Style::default().fg(msg_fg).bg(highlight_bg).add_modifier(Modifier::BOLD),
            )
        }
        None => (
            fit_hints(key_hints, max_width),
            Style::default().fg(fg_color).bg(bg_color),
        ),
    };

    f.render_widget(Paragraph::new(content).style(style), area);
}
