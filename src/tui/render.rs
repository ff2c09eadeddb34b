use crate::tui::app::{Mode, SidebarState};
use crate::tui::widgets::{
    add_bar::{render_add_bar, render_suggestions},
    color::parse_color,
    dialog::{dialog_hint, render_dialog},
    help::render_help,
    plant_list::render_plant_list,
    plant_view::render_plant_view,
    status_bar::render_status_bar,
};
use crate::tui::{App, Layout};
use crate::utils::{format_display_date, format_key_binding_for_display as key};
use ratatui::layout::Alignment;
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

pub fn render(f: &mut Frame, app: &mut App, layout: &Layout) {
    let active_theme = app.config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let outer_block = Block::default()
        .borders(Borders::ALL)
        .title("PlantKeep")
        .title_alignment(Alignment::Center)
        .style(Style::default().fg(fg_color).bg(bg_color));
    let outer_area = f.area();
    f.render_widget(outer_block, outer_area);

    let header = Paragraph::new(header_text(app)).style(Style::default().fg(fg_color));
    f.render_widget(header, layout.header_area);

    if app.ui.sidebar_state == SidebarState::Expanded && layout.sidebar_area.width > 0 {
        let views = app.tracker.presenter().views();
        render_plant_list(f, layout.sidebar_area, views, &mut app.ui.list_state, &app.config);
    }

    render_plant_view(
        f,
        layout.main_area,
        app.selected_view(),
        &app.config,
        app.ui.detail_scroll,
    );

    let add_cursor = render_add_bar(f, layout.add_area, &mut app.add, app.ui.mode, &app.config);

    if app.ui.mode == Mode::Add && app.modal.is_none() {
        let suggestions = app.suggestions();
        render_suggestions(f, layout.add_area, &suggestions, app.add.suggestion_index, &app.config);
    }

    let full_area = f.area();
    if app.ui.mode == Mode::Help {
        render_help(f, full_area, &app.config);
    }

    // Dialogs go on top of everything and own the cursor while open
    let cursor = match app.modal {
        Some(ref mut modal) => render_dialog(f, full_area, modal, &app.config),
        None => add_cursor,
    };
    if let Some((x, y)) = cursor {
        f.set_cursor_position((x, y));
    }

    let key_hints = get_key_hints(app);
    render_status_bar(
        f,
        layout.status_area,
        app.status.message.as_deref(),
        &key_hints,
        &app.config,
    );
}

fn header_text(app: &App) -> String {
    let views = app.views();
    let watered = views.iter().filter(|v| v.watered_today).count();
    format!(
        " {} plant{} • {} watered today • {}",
        views.len(),
        if views.len() == 1 { "" } else { "s" },
        watered,
        format_display_date(app.tracker.today())
    )
}

fn get_key_hints(app: &App) -> Vec<String> {
    let kb = &app.config.key_bindings;
    if let Some(ref modal) = app.modal {
        return vec![dialog_hint(&modal.request).to_string()];
    }
    match app.ui.mode {
        Mode::Help => vec![format!("Esc or {}: Exit help", key(&kb.help))],
        Mode::Add => vec![
            "Enter: Add".to_string(),
            "Tab: Use suggestion".to_string(),
            "↑/↓: Suggestions".to_string(),
            "Esc: Close".to_string(),
        ],
        Mode::View => vec![
            format!("{}: Quit", key(&kb.quit)),
            format!("{}: Add", key(&kb.add)),
            format!("{}: Water", key(&kb.water)),
            format!("{}: Rename", key(&kb.rename)),
            format!("{}: Notes", key(&kb.notes)),
            format!("{}: Delete", key(&kb.delete)),
            format!("{}: Toggle list", key(&kb.toggle_sidebar)),
            format!("{}: Help", key(&kb.help)),
        ],
    }
}
