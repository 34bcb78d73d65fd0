//! Text-to-schedule generation.
//!
//! The CLI does not call a backend itself: `prompt` prints the request to
//! send, and `apply` imports the saved JSON reply into a day.

use clap::Subcommand;
use std::path::PathBuf;
use timeblox_core::generate::build_prompt;
use timeblox_core::{DateKey, RecordedResponse};

use super::{load_state, CmdResult};

#[derive(Subcommand)]
pub enum GenerateAction {
    /// Print the prompt for a generation backend
    Prompt {
        date: DateKey,
        /// Free-text task list
        tasks: String,
    },
    /// Replace a day with a backend's JSON reply
    Apply {
        date: DateKey,
        /// Free-text task list the reply was generated from
        tasks: String,
        /// File holding the reply ("-" for stdin)
        #[arg(long)]
        response: PathBuf,
    },
}

pub fn run(action: GenerateAction) -> CmdResult {
    let (file, state) = load_state()?;

    match action {
        GenerateAction::Prompt { date, tasks } => {
            println!("{}", build_prompt(&tasks, date, state.categories()));
        }
        GenerateAction::Apply {
            date,
            tasks,
            response,
        } => {
            let json = if response.as_os_str() == "-" {
                std::io::read_to_string(std::io::stdin())?
            } else {
                std::fs::read_to_string(&response)?
            };
            let next = state.apply_generated(date, &RecordedResponse::new(json), &tasks)?;
            file.save(&next)?;
            println!("Planned {} blocks on {date}.", next.schedule(date).len());
        }
    }
    Ok(())
}
