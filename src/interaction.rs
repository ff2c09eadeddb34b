use std::io::{BufRead, Write};
use tracing::warn;

use crate::store::PlantStore;
use crate::tracker::{Outcome, PlantTracker, Reply, Request, Step};
use crate::view::Presenter;

/// Dialogs that block the caller until a human answers.
///
/// Dismissing a dialog is an answer too: `confirm` returns false and the
/// prompts return `None`.
pub trait InteractionAdapter {
    fn alert(&mut self, title: &str, message: &str);
    fn confirm(&mut self, title: &str, message: &str) -> bool;
    fn prompt_text(&mut self, title: &str, message: &str, default: &str) -> Option<String>;
    fn prompt_notes(&mut self, title: &str, message: &str, default: &str) -> Option<String>;
}

/// Show one request and turn the answer into a [`Reply`]
pub fn answer<A: InteractionAdapter + ?Sized>(adapter: &mut A, request: &Request) -> Reply {
    match request {
        Request::Alert { title, message } => {
            adapter.alert(title, message);
            Reply::Acknowledged
        }
        Request::Confirm { title, message } => Reply::Confirmed(adapter.confirm(title, message)),
        Request::PromptText { title, message, default } => {
            Reply::Text(adapter.prompt_text(title, message, default))
        }
        Request::PromptNotes { title, message, default } => {
            Reply::Text(adapter.prompt_notes(title, message, default))
        }
    }
}

/// Answer requests until the operation finishes
pub fn drive<S, P, A>(tracker: &mut PlantTracker<S, P>, mut step: Step, adapter: &mut A) -> Outcome
where
    S: PlantStore,
    P: Presenter,
    A: InteractionAdapter + ?Sized,
{
    loop {
        match step {
            Step::Done(outcome) => return outcome,
            Step::Ask { request, pending } => {
                let reply = answer(adapter, &request);
                step = tracker.resume(pending, reply);
            }
        }
    }
}

/// Line-oriented dialogs on a terminal (or any reader/writer pair).
///
/// Text prompts keep the default on an empty line; notes are read until a
/// line holding a single `.`. End of input dismisses.
pub struct ConsoleInteraction<R, W> {
    input: R,
    output: W,
    assume_yes: bool,
    preset_text: Option<String>,
}

impl<R: BufRead, W: Write> ConsoleInteraction<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            assume_yes: false,
            preset_text: None,
        }
    }

    /// Answer every confirmation with yes
    pub fn assume_yes(mut self, yes: bool) -> Self {
        self.assume_yes = yes;
        self
    }

    /// Use this text for the next prompt instead of reading input
    pub fn with_preset_text(mut self, text: Option<String>) -> Self {
        self.preset_text = text;
        self
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn say(&mut self, text: &str) {
        if let Err(e) = write!(self.output, "{}", text).and_then(|_| self.output.flush()) {
            warn!(error = %e, "failed to write to console");
        }
    }

    fn read_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
            Err(e) => {
                warn!(error = %e, "failed to read from console");
                None
            }
        }
    }
}

impl<R: BufRead, W: Write> InteractionAdapter for ConsoleInteraction<R, W> {
    fn alert(&mut self, title: &str, message: &str) {
        self.say(&format!("{}: {}\n", title, message));
    }

    fn confirm(&mut self, title: &str, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        self.say(&format!("{}: {} [y/N] ", title, message));
        self.read_line()
            .map(|answer| matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
            .unwrap_or(false)
    }

    fn prompt_text(&mut self, title: &str, message: &str, default: &str) -> Option<String> {
        if let Some(text) = self.preset_text.take() {
            return Some(text);
        }
        self.say(&format!("{}: {} [{}] ", title, message, default));
        self.read_line()
            .map(|line| if line.is_empty() { default.to_string() } else { line })
    }

    fn prompt_notes(&mut self, title: &str, message: &str, default: &str) -> Option<String> {
        if let Some(text) = self.preset_text.take() {
            return Some(text);
        }
        self.say(&format!("{}\n{} (end with a line containing only \".\")\n", title, message));
        if !default.is_empty() {
            self.say(&format!("Current notes:\n{}\n", default));
        }
        let mut lines = Vec::new();
        loop {
            match self.read_line() {
                Some(line) if line == "." => return Some(lines.join("\n")),
                Some(line) => lines.push(line),
                None => return None,
            }
        }
    }
}
