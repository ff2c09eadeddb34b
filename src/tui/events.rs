use crate::tracker::{Reply, Request};
use crate::tui::app::{Mode, SidebarState};
use crate::tui::error::TuiError;
use crate::tui::layout::Layout;
use crate::tui::App;
use crate::utils::{has_primary_modifier, parse_key_binding, ParsedKeyBinding};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, size as terminal_size, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;
use std::io;
use std::time::Duration;
use tracing::{debug, error};

/// Restores the terminal on drop, so a panic does not leave it in raw mode
struct TerminalGuard {
    raw_mode_enabled: bool,
    alternate_screen_enabled: bool,
}

impl TerminalGuard {
    fn new() -> Result<Self, TuiError> {
        enable_raw_mode()?;
        let mut guard = Self {
            raw_mode_enabled: true,
            alternate_screen_enabled: false,
        };
        execute!(io::stdout(), EnterAlternateScreen)?;
        guard.alternate_screen_enabled = true;
        Ok(guard)
    }

    /// Restore explicitly on normal exit; drop is then a no-op
    fn restore(&mut self) -> Result<(), TuiError> {
        if self.raw_mode_enabled {
            disable_raw_mode()?;
            self.raw_mode_enabled = false;
        }
        if self.alternate_screen_enabled {
            execute!(io::stdout(), LeaveAlternateScreen)?;
            self.alternate_screen_enabled = false;
        }
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        // Already cleaning up; nothing useful to do with errors here
        if self.raw_mode_enabled {
            let _ = disable_raw_mode();
        }
        if self.alternate_screen_enabled {
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
        }
    }
}

pub fn run_event_loop(mut app: App) -> Result<(), TuiError> {
    // Refuse before entering the alternate screen so the message stays visible
    let (width, height) = terminal_size()?;
    let min_width = Layout::MIN_WIDTH + 2;
    let min_height = Layout::MIN_HEIGHT + 2;
    if width < min_width || height < min_height {
        return Err(TuiError::RenderError(format!(
            "Terminal size too small. Current: {}x{}, Minimum required: {}x{}. Please resize your terminal window.",
            width, height, min_width, min_height
        )));
    }

    let mut guard = TerminalGuard::new()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;
    debug!("entered terminal UI");

    loop {
        app.check_status_message_timeout();

        let size = terminal.size()?;
        let terminal_rect = Rect::new(0, 0, size.width, size.height);
        terminal.draw(|f| {
            let layout = Layout::calculate(
                terminal_rect,
                app.config.sidebar_width_percent,
                app.ui.sidebar_state == SidebarState::Collapsed,
            );
            crate::tui::render::render(f, &mut app, &layout);
        })?;

        // Only Press events; Windows also reports releases
        if event::poll(Duration::from_millis(16))? {
            if let Event::Key(key_event) = event::read()? {
                if key_event.kind == KeyEventKind::Press {
                    match handle_key_event(&mut app, key_event) {
                        Ok(true) => break,
                        Ok(false) => {}
                        Err(TuiError::KeyBindingError(msg)) => {
                            error!(%msg, "invalid key binding in config");
                            app.set_status_message(msg);
                        }
                        Err(e) => return Err(e),
                    }
                }
            }
        }
    }

    guard.restore()?;
    debug!("left terminal UI");
    Ok(())
}

/// Handle one key press. Returns true when the user asked to quit.
pub fn handle_key_event(app: &mut App, key_event: KeyEvent) -> Result<bool, TuiError> {
    // An open dialog takes every key until it is answered
    if app.modal.is_some() {
        handle_dialog(app, key_event);
        return Ok(false);
    }

    match app.ui.mode {
        Mode::Help => handle_help_mode(app, key_event),
        Mode::Add => {
            handle_add_mode(app, key_event);
            Ok(false)
        }
        Mode::View => handle_view_mode(app, key_event),
    }
}

fn handle_dialog(app: &mut App, key_event: KeyEvent) {
    let Some(request) = app.modal.as_ref().map(|m| m.request.clone()) else {
        return;
    };
    match request {
        Request::Alert { .. } => {
            if matches!(key_event.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                app.resolve_modal(Reply::Acknowledged);
            }
        }
        Request::Confirm { .. } => match key_event.code {
            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::Up | KeyCode::Down => {
                app.toggle_modal_selection();
            }
            KeyCode::Char('y') | KeyCode::Char('Y') => app.resolve_modal(Reply::Confirmed(true)),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.resolve_modal(Reply::Confirmed(false))
            }
            KeyCode::Enter => {
                let yes = app.modal.as_ref().is_some_and(|m| m.selection == 0);
                app.resolve_modal(Reply::Confirmed(yes));
            }
            _ => {}
        },
        Request::PromptText { .. } => match key_event.code {
            KeyCode::Enter => app.submit_modal_text(),
            KeyCode::Esc => app.dismiss_modal(),
            _ => edit_modal_text(app, key_event),
        },
        Request::PromptNotes { .. } => match key_event.code {
            KeyCode::Char('s') if has_primary_modifier(key_event.modifiers) => {
                app.submit_modal_text()
            }
            KeyCode::Esc => app.dismiss_modal(),
            _ => edit_modal_text(app, key_event),
        },
    }
}

/// Plain editing keys shared by both prompt kinds
fn edit_modal_text(app: &mut App, key_event: KeyEvent) {
    let Some(editor) = app.get_modal_editor() else {
        return;
    };
    match key_event.code {
        KeyCode::Enter => editor.insert_newline(),
        KeyCode::Char(c) if !has_primary_modifier(key_event.modifiers) => editor.insert_char(c),
        KeyCode::Backspace => editor.delete_char(),
        KeyCode::Delete => editor.delete_forward(),
        KeyCode::Left => editor.move_cursor_left(),
        KeyCode::Right => editor.move_cursor_right(),
        KeyCode::Up => editor.move_cursor_up(),
        KeyCode::Down => editor.move_cursor_down(),
        KeyCode::Home => editor.move_cursor_home(),
        KeyCode::End => editor.move_cursor_end(),
        _ => {}
    }
}

fn handle_help_mode(app: &mut App, key_event: KeyEvent) -> Result<bool, TuiError> {
    let help_binding = binding(&app.config.key_bindings.help)?;
    if key_event.code == KeyCode::Esc || matches_key_event(key_event, &help_binding) {
        app.exit_help_mode();
    }
    Ok(false)
}

fn handle_add_mode(app: &mut App, key_event: KeyEvent) {
    match key_event.code {
        KeyCode::Esc => app.exit_add_mode(),
        KeyCode::Enter => app.submit_add(),
        KeyCode::Tab => {
            app.accept_suggestion();
        }
        KeyCode::Down => app.move_suggestion_down(),
        KeyCode::Up => app.move_suggestion_up(),
        KeyCode::Backspace => app.add_input_backspace(),
        KeyCode::Left => app.add.input.move_cursor_left(),
        KeyCode::Right => app.add.input.move_cursor_right(),
        KeyCode::Home => app.add.input.move_cursor_home(),
        KeyCode::End => app.add.input.move_cursor_end(),
        KeyCode::Char(c) if !has_primary_modifier(key_event.modifiers) => app.add_input_char(c),
        _ => {}
    }
}

fn handle_view_mode(app: &mut App, key_event: KeyEvent) -> Result<bool, TuiError> {
    let kb = app.config.key_bindings.clone();

    if matches_key_event(key_event, &binding(&kb.quit)?) {
        return Ok(true);
    }
    if matches_key_event(key_event, &binding(&kb.help)?) {
        app.enter_help_mode();
    } else if matches_key_event(key_event, &binding(&kb.add)?) {
        app.enter_add_mode();
    } else if matches_key_event(key_event, &binding(&kb.water)?) {
        app.water_selected();
    } else if matches_key_event(key_event, &binding(&kb.rename)?) {
        app.rename_selected();
    } else if matches_key_event(key_event, &binding(&kb.notes)?) {
        app.annotate_selected();
    } else if matches_key_event(key_event, &binding(&kb.delete)?) {
        app.delete_selected();
    } else if matches_key_event(key_event, &binding(&kb.toggle_sidebar)?) {
        app.toggle_sidebar();
    } else if key_event.code == KeyCode::Down
        || matches_key_event(key_event, &binding(&kb.list_down)?)
    {
        app.move_selection_down();
    } else if key_event.code == KeyCode::Up
        || matches_key_event(key_event, &binding(&kb.list_up)?)
    {
        app.move_selection_up();
    } else if key_event.code == KeyCode::PageDown {
        app.scroll_detail_down();
    } else if key_event.code == KeyCode::PageUp {
        app.scroll_detail_up();
    }
    Ok(false)
}

fn binding(key: &str) -> Result<ParsedKeyBinding, TuiError> {
    parse_key_binding(key).map_err(TuiError::KeyBindingError)
}

fn matches_key_event(key_event: KeyEvent, binding: &ParsedKeyBinding) -> bool {
    binding.requires_ctrl == has_primary_modifier(key_event.modifiers)
        && binding.key_code == key_event.code
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::PlantTracker;
    use crate::utils::FixedClock;
    use crate::view::ViewCache;
    use crate::{Config, Database};
    use chrono::NaiveDate;
    use crossterm::event::KeyModifiers;

    fn app() -> App {
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let db = Database::open_in_memory().unwrap();
        App::new(Config::default(), PlantTracker::new(db, ViewCache::new(), FixedClock(today)))
    }

    fn press(app: &mut App, code: KeyCode) -> bool {
        handle_key_event(app, KeyEvent::new(code, KeyModifiers::NONE)).unwrap()
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn add_flow_through_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.ui.mode, Mode::Add);
        type_text(&mut app, "fe");
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.add.input.to_string(), "Fern");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.ui.mode, Mode::View);
        assert_eq!(app.views()[0].name, "Fern");
        // Typed keys in the add bar never reach the view bindings
        assert!(!app.views()[0].watered_today);
    }

    #[test]
    fn quit_only_from_view_mode() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'));
        assert!(!press(&mut app, KeyCode::Char('q')));
        assert_eq!(app.add.input.to_string(), "q");
        press(&mut app, KeyCode::Esc);
        assert!(press(&mut app, KeyCode::Char('q')));
    }

    #[test]
    fn novel_plant_alert_is_closed_with_enter() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'));
        type_text(&mut app, "Monstera");
        press(&mut app, KeyCode::Enter);
        assert!(app.modal.is_some());
        // Keys other than close are swallowed
        press(&mut app, KeyCode::Char('d'));
        assert!(app.views().is_empty());

        press(&mut app, KeyCode::Enter);
        assert!(app.modal.is_none());
        assert_eq!(app.views()[0].name, "Monstera");
    }

    #[test]
    fn delete_confirmation_defaults_to_yes_and_esc_cancels() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'));
        type_text(&mut app, "Rose");
        press(&mut app, KeyCode::Enter);

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.views().len(), 1);

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.views().len(), 1);

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Enter);
        assert!(app.views().is_empty());
    }

    #[test]
    fn notes_take_newlines_and_save_with_ctrl_s() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'));
        type_text(&mut app, "Basil");
        press(&mut app, KeyCode::Enter);

        press(&mut app, KeyCode::Char('n'));
        type_text(&mut app, "sunny");
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "pinch flowers");
        handle_key_event(&mut app, KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL)).unwrap();

        assert!(app.modal.is_none());
        assert_eq!(app.views()[0].notes.as_deref(), Some("sunny\npinch flowers"));
    }

    #[test]
    fn rename_prompt_escape_keeps_name() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'));
        type_text(&mut app, "Cactus");
        press(&mut app, KeyCode::Enter);

        press(&mut app, KeyCode::Char('e'));
        type_text(&mut app, "!!");
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.views()[0].name, "Cactus");

        press(&mut app, KeyCode::Char('e'));
        type_text(&mut app, " 2");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.views()[0].name, "Cactus 2");
    }

    #[test]
    fn bad_binding_is_reported() {
        let mut app = app();
        app.config.key_bindings.quit = "Hyper+q".to_string();
        let result = handle_key_event(&mut app, KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE));
        assert!(matches!(result, Err(TuiError::KeyBindingError(_))));
    }
}
