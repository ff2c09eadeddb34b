use crate::tui::widgets::color::parse_color;
use crate::tui::widgets::dialog::popup_area;
use crate::utils::format_key_binding_for_display as key;
use crate::Config;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

pub fn render_help(f: &mut Frame, area: Rect, config: &Config) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);

    let popup_area = popup_area(area, 60, 70);
    f.render_widget(Clear, popup_area);

    let paragraph = Paragraph::new(build_help_text(config))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Help - Key Bindings")
                .title_alignment(Alignment::Center)
                .style(Style::default().fg(fg_color).bg(bg_color)),
        )
        .style(Style::default().fg(fg_color).bg(bg_color))
        .wrap(ratatui::widgets::Wrap { trim: false });

    f.render_widget(paragraph, popup_area);
}

pub fn build_help_text(config: &Config) -> String {
    let kb = &config.key_bindings;
    let mut text = String::new();

    text.push_str("Plants:\n");
    text.push_str(&format!("  {} / {} (or ↑ / ↓): Select plant\n", key(&kb.list_up), key(&kb.list_down)));
    text.push_str(&format!("  {}: Add a plant\n", key(&kb.add)));
    text.push_str(&format!("  {}: Water selected plant today\n", key(&kb.water)));
    text.push_str(&format!("  {}: Rename selected plant\n", key(&kb.rename)));
    text.push_str(&format!("  {}: Edit notes\n", key(&kb.notes)));
    text.push_str(&format!("  {}: Delete selected plant\n", key(&kb.delete)));
    text.push('\n');

    text.push_str("Add bar:\n");
    text.push_str("  Type to see species suggestions\n");
    text.push_str("  ↑ / ↓: Highlight suggestion, Tab: Use it\n");
    text.push_str("  Enter: Add, Esc: Close\n");
    text.push('\n');

    text.push_str("View:\n");
    text.push_str(&format!("  {}: Toggle plant list\n", key(&kb.toggle_sidebar)));
    text.push_str("  PgUp / PgDn: Scroll details\n");
    text.push_str(&format!("  {}: This help\n", key(&kb.help)));
    text.push_str(&format!("  {}: Quit\n", key(&kb.quit)));

    text
}
