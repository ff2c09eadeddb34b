use crate::collection::CollectionError;
use crate::tracker::{Outcome, Pending, PlantTracker, Reply, Request, Step};
use crate::tui::widgets::editor::Editor;
use crate::view::{PlantView, ViewCache};
use crate::{Config, Database};
use ratatui::widgets::ListState;
use std::cmp;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarState {
    Expanded,
    Collapsed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    View,
    Add,
    Help,
}

#[derive(Debug, Clone)]
pub struct UiState {
    pub sidebar_state: SidebarState,
    pub mode: Mode,
    pub selected_index: usize,
    pub list_state: ListState,
    pub detail_scroll: usize,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            sidebar_state: SidebarState::Expanded,
            mode: Mode::View,
            selected_index: 0,
            list_state: ListState::default(),
            detail_scroll: 0,
        }
    }
}

/// Add bar input plus the highlighted suggestion
#[derive(Debug, Clone)]
pub struct AddState {
    pub input: Editor,
    pub suggestion_index: Option<usize>,
}

impl Default for AddState {
    fn default() -> Self {
        Self {
            input: Editor::single_line(),
            suggestion_index: None,
        }
    }
}

/// An open dialog waiting for the user's answer
#[derive(Debug, Clone)]
pub struct Modal {
    pub request: Request,
    pub pending: Pending,
    pub editor: Editor,
    /// 0 = confirm, 1 = cancel
    pub selection: usize,
}

impl Modal {
    fn new(request: Request, pending: Pending) -> Self {
        let editor = match &request {
            Request::PromptText { default, .. } => Editor::from_string(default, true),
            Request::PromptNotes { default, .. } => Editor::from_string(default, false),
            _ => Editor::new(),
        };
        Self {
            request,
            pending,
            editor,
            selection: 0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StatusState {
    pub message: Option<String>,
    pub message_time: Option<Instant>,
}

pub struct App {
    pub config: Config,
    pub tracker: PlantTracker<Database, ViewCache>,

    pub ui: UiState,
    pub add: AddState,
    pub modal: Option<Modal>,
    pub status: StatusState,
}

impl App {
    pub fn new(config: Config, tracker: PlantTracker<Database, ViewCache>) -> Self {
        let mut app = Self {
            config,
            tracker,
            ui: UiState::default(),
            add: AddState::default(),
            modal: None,
            status: StatusState::default(),
        };
        app.adjust_selected_index();
        app
    }

    pub fn views(&self) -> &[PlantView] {
        self.tracker.presenter().views()
    }

    pub fn selected_view(&self) -> Option<&PlantView> {
        self.views().get(self.ui.selected_index)
    }

    pub fn adjust_selected_index(&mut self) {
        let len = self.views().len();
        self.ui.selected_index = cmp::min(self.ui.selected_index, len.saturating_sub(1));
        self.sync_list_state();
    }

    /// Sync ListState with selected_index for proper scrolling
    pub fn sync_list_state(&mut self) {
        if self.views().is_empty() {
            self.ui.list_state.select(None);
        } else {
            self.ui.list_state.select(Some(self.ui.selected_index));
        }
    }

    fn select(&mut self, index: usize) {
        self.ui.selected_index = index;
        self.ui.detail_scroll = 0;
        self.adjust_selected_index();
    }

    pub fn move_selection_up(&mut self) {
        if self.ui.selected_index > 0 {
            self.select(self.ui.selected_index - 1);
        }
    }

    pub fn move_selection_down(&mut self) {
        if self.ui.selected_index + 1 < self.views().len() {
            self.select(self.ui.selected_index + 1);
        }
    }

    pub fn toggle_sidebar(&mut self) {
        self.ui.sidebar_state = match self.ui.sidebar_state {
            SidebarState::Expanded => SidebarState::Collapsed,
            SidebarState::Collapsed => SidebarState::Expanded,
        };
    }

    pub fn scroll_detail_up(&mut self) {
        self.ui.detail_scroll = self.ui.detail_scroll.saturating_sub(1);
    }

    pub fn scroll_detail_down(&mut self) {
        self.ui.detail_scroll += 1;
    }

    pub fn set_status_message(&mut self, message: String) {
        self.status.message = Some(message);
        self.status.message_time = Some(Instant::now());
    }

    pub fn clear_status_message(&mut self) {
        self.status.message = None;
        self.status.message_time = None;
    }

    /// Check if status message should be auto-cleared (after 3 seconds)
    pub fn check_status_message_timeout(&mut self) {
        const STATUS_MESSAGE_TIMEOUT_SECS: u64 = 3;
        if let Some(time) = self.status.message_time {
            if time.elapsed().as_secs() >= STATUS_MESSAGE_TIMEOUT_SECS {
                self.clear_status_message();
            }
        }
    }

    pub fn enter_help_mode(&mut self) {
        self.ui.mode = Mode::Help;
    }

    pub fn exit_help_mode(&mut self) {
        self.ui.mode = Mode::View;
    }

    pub fn enter_add_mode(&mut self) {
        self.ui.mode = Mode::Add;
        self.add.suggestion_index = None;
    }

    pub fn exit_add_mode(&mut self) {
        self.ui.mode = Mode::View;
        self.add = AddState::default();
    }

    // Add bar

    /// Catalog matches for the add bar input, capped by `max_suggestions`
    pub fn suggestions(&self) -> Vec<String> {
        self.tracker
            .suggest(&self.add.input.to_string())
            .into_iter()
            .take(self.config.max_suggestions)
            .map(str::to_string)
            .collect()
    }

    pub fn add_input_char(&mut self, ch: char) {
        self.add.input.insert_char(ch);
        self.add.suggestion_index = None;
    }

    pub fn add_input_backspace(&mut self) {
        self.add.input.delete_char();
        self.add.suggestion_index = None;
    }

    pub fn move_suggestion_up(&mut self) {
        self.add.suggestion_index = match self.add.suggestion_index {
            Some(0) | None => None,
            Some(i) => Some(i - 1),
        };
    }

    pub fn move_suggestion_down(&mut self) {
        let count = self.suggestions().len();
        if count == 0 {
            return;
        }
        self.add.suggestion_index = match self.add.suggestion_index {
            None => Some(0),
            Some(i) => Some(cmp::min(i + 1, count - 1)),
        };
    }

    /// Replace the input with the highlighted suggestion, or the first one
    pub fn accept_suggestion(&mut self) -> bool {
        let suggestions = self.suggestions();
        let index = self.add.suggestion_index.unwrap_or(0);
        match suggestions.get(index) {
            Some(name) => {
                self.add.input = Editor::from_string(name, true);
                self.add.suggestion_index = None;
                true
            }
            None => false,
        }
    }

    pub fn submit_add(&mut self) {
        let raw = self.add.input.to_string();
        let step = self.tracker.begin_add(&raw);
        self.handle_step(step);
    }

    // Per-plant actions on the selected row

    pub fn water_selected(&mut self) {
        if let Some(index) = self.selected_index() {
            let outcome = self.tracker.water(index);
            self.apply_outcome(outcome);
        }
    }

    pub fn rename_selected(&mut self) {
        if let Some(index) = self.selected_index() {
            let step = self.tracker.begin_rename(index);
            self.handle_step(step);
        }
    }

    pub fn annotate_selected(&mut self) {
        if let Some(index) = self.selected_index() {
            let step = self.tracker.begin_annotate(index);
            self.handle_step(step);
        }
    }

    pub fn delete_selected(&mut self) {
        if let Some(index) = self.selected_index() {
            let step = self.tracker.begin_remove(index);
            self.handle_step(step);
        }
    }

    fn selected_index(&mut self) -> Option<usize> {
        if self.views().is_empty() {
            self.set_status_message("No plant selected".to_string());
            None
        } else {
            Some(self.ui.selected_index)
        }
    }

    // Dialogs

    pub fn handle_step(&mut self, step: Step) {
        match step {
            Step::Done(outcome) => self.apply_outcome(outcome),
            Step::Ask { request, pending } => self.modal = Some(Modal::new(request, pending)),
        }
    }

    /// Close the open dialog with `reply` and continue the operation
    pub fn resolve_modal(&mut self, reply: Reply) {
        if let Some(modal) = self.modal.take() {
            let step = self.tracker.resume(modal.pending, reply);
            self.handle_step(step);
        }
    }

    /// Submit the dialog editor's text
    pub fn submit_modal_text(&mut self) {
        let text = self.modal.as_ref().map(|m| m.editor.to_string());
        self.resolve_modal(Reply::Text(text));
    }

    pub fn dismiss_modal(&mut self) {
        let reply = match self.modal.as_ref().map(|m| &m.request) {
            Some(Request::Alert { .. }) => Reply::Acknowledged,
            Some(Request::Confirm { .. }) => Reply::Confirmed(false),
            Some(_) => Reply::Text(None),
            None => return,
        };
        self.resolve_modal(reply);
    }

    pub fn toggle_modal_selection(&mut self) {
        if let Some(ref mut modal) = self.modal {
            modal.selection = 1 - cmp::min(modal.selection, 1);
        }
    }

    pub fn get_modal_editor(&mut self) -> Option<&mut Editor> {
        match self.modal {
            Some(ref mut modal)
                if matches!(
                    modal.request,
                    Request::PromptText { .. } | Request::PromptNotes { .. }
                ) =>
            {
                Some(&mut modal.editor)
            }
            _ => None,
        }
    }

    fn plant_name(&self, index: usize) -> String {
        self.tracker
            .collection()
            .get(index)
            .map(|r| r.name.clone())
            .unwrap_or_default()
    }

    fn apply_outcome(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Added { index, .. } => {
                let name = self.plant_name(index);
                self.exit_add_mode();
                self.select(index);
                self.set_status_message(format!("Added {}", name));
            }
            Outcome::Watered { index } => {
                let name = self.plant_name(index);
                self.set_status_message(format!("Watered {}", name));
            }
            Outcome::Renamed { index } => {
                let name = self.plant_name(index);
                self.set_status_message(format!("Renamed to {}", name));
            }
            Outcome::Annotated { index } => {
                let name = self.plant_name(index);
                self.set_status_message(format!("Notes saved for {}", name));
            }
            Outcome::Removed { record, .. } => {
                self.adjust_selected_index();
                self.set_status_message(format!("Deleted {}", record.name));
            }
            Outcome::Cancelled => {}
            Outcome::Rejected(CollectionError::IndexOutOfRange { .. }) => {
                self.adjust_selected_index();
                self.set_status_message("That plant no longer exists".to_string());
            }
            // The alert already told the user; keep the add input for correction
            Outcome::Rejected(_) => {}
        }
    }
}
