use clap::{Parser, Subcommand};
use std::io::{BufRead, Write};
use thiserror::Error;

use crate::collection::CollectionError;
use crate::database::DatabaseError;
use crate::interaction::{drive, ConsoleInteraction};
use crate::store::PlantStore;
use crate::tracker::{Outcome, PlantTracker, Step};
use crate::view::{PlantView, ViewCache};

#[derive(Parser)]
#[command(name = "plantkeep")]
#[command(about = "Plant care tracker - water, annotate and keep track of your plants")]
#[command(version)]
pub struct Cli {
    /// Custom config file path
    #[arg(short, long)]
    pub config: Option<String>,

    /// Use development mode (uses separate dev config/database)
    #[arg(long)]
    pub dev: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Launch interactive TUI (default if no subcommand)
    Tui,
    /// List your plants with their numbers
    List,
    /// Add a plant
    Add {
        /// Plant name
        name: String,
    },
    /// Mark a plant as watered today
    Water {
        /// Plant number as shown by `list`
        number: usize,
    },
    /// Rename a plant
    Rename {
        /// Plant number as shown by `list`
        number: usize,
        /// New name (prompted for when omitted)
        #[arg(long)]
        name: Option<String>,
    },
    /// Replace a plant's notes
    Notes {
        /// Plant number as shown by `list`
        number: usize,
        /// New notes (prompted for when omitted)
        #[arg(long)]
        text: Option<String>,
    },
    /// Delete a plant
    Remove {
        /// Plant number as shown by `list`
        number: usize,
        /// Skip the confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Show known species matching a query
    Suggest {
        query: String,
    },
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] DatabaseError),
    #[error("Plant numbers start at 1")]
    InvalidNumber,
    #[error("No plant number {number} (you have {count})")]
    NoSuchPlant { number: usize, count: usize },
    #[error("Output error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Run one non-TUI command. Dialogs are answered on `input`/`output`.
pub fn run_command<S, R, W>(
    command: Commands,
    tracker: &mut PlantTracker<S, ViewCache>,
    input: R,
    mut output: W,
) -> Result<(), CliError>
where
    S: PlantStore,
    R: BufRead,
    W: Write,
{
    let (step, assume_yes, preset): (Step, bool, Option<String>) = match command {
        Commands::Tui => return Ok(()),
        Commands::List => {
            print_views(&mut output, tracker.presenter().views())?;
            return Ok(());
        }
        Commands::Suggest { query } => {
            let suggestions = tracker.suggest(&query);
            if suggestions.is_empty() {
                writeln!(output, "No suggestions")?;
            }
            for name in suggestions {
                writeln!(output, "{}", name)?;
            }
            return Ok(());
        }
        Commands::Water { number } => (Step::Done(tracker.water(to_index(number)?)), false, None),
        Commands::Add { name } => (tracker.begin_add(&name), false, None),
        Commands::Rename { number, name } => (tracker.begin_rename(to_index(number)?), false, name),
        Commands::Notes { number, text } => (tracker.begin_annotate(to_index(number)?), false, text),
        Commands::Remove { number, yes } => (tracker.begin_remove(to_index(number)?), yes, None),
    };

    let outcome = {
        let mut console = ConsoleInteraction::new(input, &mut output)
            .assume_yes(assume_yes)
            .with_preset_text(preset);
        drive(tracker, step, &mut console)
    };

    report(&mut output, tracker, &outcome)
}

fn to_index(number: usize) -> Result<usize, CliError> {
    number.checked_sub(1).ok_or(CliError::InvalidNumber)
}

fn report<S: PlantStore>(
    output: &mut impl Write,
    tracker: &PlantTracker<S, ViewCache>,
    outcome: &Outcome,
) -> Result<(), CliError> {
    let name_at = |index: usize| {
        tracker
            .collection()
            .get(index)
            .map(|r| r.name.clone())
            .unwrap_or_default()
    };
    match outcome {
        Outcome::Added { index, .. } => {
            writeln!(output, "Added \"{}\" as #{}", name_at(*index), index + 1)?
        }
        Outcome::Watered { index } => writeln!(output, "Watered \"{}\"", name_at(*index))?,
        Outcome::Renamed { index } => writeln!(output, "Renamed to \"{}\"", name_at(*index))?,
        Outcome::Annotated { index } => {
            writeln!(output, "Updated notes for \"{}\"", name_at(*index))?
        }
        Outcome::Removed { record, .. } => writeln!(output, "Deleted \"{}\"", record.name)?,
        Outcome::Cancelled => writeln!(output, "Nothing changed")?,
        Outcome::Rejected(CollectionError::IndexOutOfRange { index, len }) => {
            return Err(CliError::NoSuchPlant {
                number: index + 1,
                count: *len,
            });
        }
        // Already shown to the user as an alert
        Outcome::Rejected(_) => {}
    }
    Ok(())
}

/// Numbered plant list as printed by `plantkeep list`
pub fn print_views(output: &mut impl Write, views: &[PlantView]) -> std::io::Result<()> {
    if views.is_empty() {
        writeln!(output, "No plants yet!")?;
        writeln!(output, "Add your first plant with `plantkeep add <NAME>`.")?;
        return Ok(());
    }
    for view in views {
        let today = if view.watered_today { " (today)" } else { "" };
        writeln!(
            output,
            "{:>3}. {}  - last watered: {}{}, added: {}",
            view.index + 1,
            view.name,
            view.last_watered,
            today,
            view.date_added
        )?;
        if let Some(ref notes) = view.notes {
            for line in notes.lines() {
                writeln!(output, "     {}", line)?;
            }
        }
    }
    Ok(())
}
