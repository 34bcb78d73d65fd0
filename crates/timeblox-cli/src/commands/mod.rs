//! Subcommand handlers. Each loads the planner state, applies one action
//! and writes the state back.

pub mod block;
pub mod category;
pub mod config;
pub mod day;
pub mod generate;
pub mod master;
pub mod month;

use timeblox_core::{Config, Outcome, PlannerState, StateFile};

pub type CmdResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Open the state file, seeding a fresh planner from config on first use.
pub fn load_state() -> CmdResult<(StateFile, PlannerState)> {
    let file = StateFile::open_default()?;
    let state = file.load_or(|| Config::load_or_default().new_planner())?;
    tracing::debug!(path = %file.path().display(), "planner state loaded");
    Ok((file, state))
}

/// Turn an outcome into the next state, confirming hazards only with `--yes`.
pub fn settle(state: &PlannerState, outcome: Outcome, yes: bool) -> CmdResult<PlannerState> {
    match outcome {
        Outcome::Applied(next) => Ok(next),
        Outcome::NeedsConfirmation(confirmation) if yes => Ok(state.confirm(confirmation)?),
        Outcome::NeedsConfirmation(confirmation) => Err(format!(
            "confirmation required: {} (re-run with --yes)",
            confirmation.prompt()
        )
        .into()),
    }
}
