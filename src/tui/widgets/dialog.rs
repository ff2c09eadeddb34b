use crate::tracker::Request;
use crate::tui::app::Modal;
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};
use crate::Config;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

/// Key hint shown under each kind of dialog
pub fn dialog_hint(request: &Request) -> &'static str {
    match request {
        Request::Alert { .. } => "Enter/Esc: close",
        Request::Confirm { .. } => "←→ select • Enter confirm • y/n • Esc cancel",
        Request::PromptText { .. } => "Enter: save • Esc: cancel",
        Request::PromptNotes { .. } => "Ctrl+S: save • Enter: new line • Esc: cancel",
    }
}

/// Draw the open dialog; returns where the text cursor belongs, if anywhere
pub fn render_dialog(f: &mut Frame, area: Rect, modal: &mut Modal, config: &Config) -> Option<(u16, u16)> {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let highlight_bg = parse_color(&active_theme.highlight_bg);
    let highlight_fg = get_contrast_text_color(highlight_bg);
    let base = Style::default().fg(fg_color).bg(bg_color);

    let (percent_x, percent_y) = match modal.request {
        Request::PromptNotes { .. } => (70, 60),
        _ => (50, 35),
    };
    let popup = popup_area(area, percent_x, percent_y);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(modal.request.title().to_string())
        .title_alignment(Alignment::Center)
        .style(base);
    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let [message_area, body_area, hint_area] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(inner);

    let message = Paragraph::new(modal.request.message().to_string())
        .style(base)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(message, message_area);

    let hint = Paragraph::new(dialog_hint(&modal.request))
        .style(base)
        .alignment(Alignment::Center);
    f.render_widget(hint, hint_area);

    match modal.request {
        Request::Alert { .. } => {
            let ok = Line::from(Span::styled("[ OK ]", Style::default().fg(highlight_fg).bg(highlight_bg)));
            f.render_widget(Paragraph::new(ok).alignment(Alignment::Center).style(base), body_area);
            None
        }
        Request::Confirm { .. } => {
            let option = |index: usize, label: &str| {
                let style = if modal.selection == index {
                    Style::default().fg(highlight_fg).bg(highlight_bg)
                } else {
                    base
                };
                Span::styled(format!(" {} ", label), style)
            };
            let options = Line::from(vec![option(0, "Yes"), Span::raw("   "), option(1, "Cancel")]);
            f.render_widget(Paragraph::new(options).alignment(Alignment::Center).style(base), body_area);
            None
        }
        Request::PromptText { .. } | Request::PromptNotes { .. } => {
            let input_block = Block::default().borders(Borders::ALL).style(base);
            let input_area = input_block.inner(body_area);
            f.render_widget(input_block, body_area);

            let editor = &mut modal.editor;
            editor.update_scroll(input_area.height as usize);
            editor.update_horizontal_scroll(input_area.width as usize);
            let lines: Vec<Line> = editor
                .get_visible_lines(input_area.height as usize, input_area.width as usize)
                .into_iter()
                .map(Line::from)
                .collect();
            f.render_widget(Paragraph::new(lines).style(base), input_area);
            editor.get_cursor_screen_pos(input_area)
        }
    }
}

/// Centered rect taking the given percentages of `area`
pub fn popup_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::vertical([Constraint::Percentage(percent_y)]).flex(Flex::Center);
    let horizontal = Layout::horizontal([Constraint::Percentage(percent_x)]).flex(Flex::Center);
    let [area] = vertical.areas(area);
    let [area] = horizontal.areas(area);
    area
}
