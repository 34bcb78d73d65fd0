//! Day-level commands: show, copy, clear, export.

use clap::Subcommand;
use timeblox_core::{schedule_to_text, DateKey, DayMarker};

use super::{load_state, settle, CmdResult};

#[derive(Subcommand)]
pub enum DayAction {
    /// Show a day's blocks with their indices
    Show {
        /// Date (YYYY-MM-DD)
        date: DateKey,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List every planned date with its calendar marker
    List,
    /// Copy one day's blocks onto another
    Copy {
        source: DateKey,
        target: DateKey,
        /// Overwrite a target that is itself a copy
        #[arg(long)]
        yes: bool,
    },
    /// Empty a day and cut its copy links
    Clear {
        date: DateKey,
        #[arg(long)]
        yes: bool,
    },
    /// Print a day as plain text
    Export { date: DateKey },
}

pub fn run(action: DayAction) -> CmdResult {
    let (file, state) = load_state()?;

    match action {
        DayAction::Show { date, json } => {
            let schedule = state.schedule(date);
            if json {
                println!("{}", serde_json::to_string_pretty(&schedule)?);
            } else if schedule.is_empty() {
                println!("No blocks on {date}.");
            } else {
                for (i, b) in schedule.iter().enumerate() {
                    println!("[{i}] {} - {} | {} ({})", b.start, b.end, b.title, b.category);
                }
            }
        }
        DayAction::List => {
            for date in state.planned_dates() {
                let marker = match state.day_marker(date) {
                    Some(DayMarker::Master { slot }) => format!("master {slot}"),
                    Some(DayMarker::Copy { source, color }) => format!("copy of {source} ({color})"),
                    None => String::new(),
                };
                println!("{date}  {:>2} blocks  {marker}", state.schedule(date).len());
            }
        }
        DayAction::Copy { source, target, yes } => {
            // Dragging a plain day promotes it to a free master slot first.
            let dragged = state.begin_day_drag(source);
            let next = settle(&dragged, dragged.copy_day(source, target), yes)?;
            file.save(&next)?;
            println!("Copied {source} to {target}.");
        }
        DayAction::Clear { date, yes } => {
            let next = settle(&state, state.clear_day(date), yes)?;
            file.save(&next)?;
            println!("Cleared {date}.");
        }
        DayAction::Export { date } => {
            println!("{}", schedule_to_text(&state.schedule(date)));
        }
    }
    Ok(())
}
