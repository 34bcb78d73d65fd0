//! Month paste and month markers.

use clap::Subcommand;
use timeblox_core::MonthKey;

use super::{load_state, settle, CmdResult};

#[derive(Subcommand)]
pub enum MonthAction {
    /// Show planned days and paste markers for a month (YYYY-MM)
    Show { month: MonthKey },
    /// Replace a month with a weekday-matched copy of another
    Paste {
        source: MonthKey,
        target: MonthKey,
        #[arg(long)]
        yes: bool,
    },
}

pub fn run(action: MonthAction) -> CmdResult {
    let (file, state) = load_state()?;

    match action {
        MonthAction::Show { month } => {
            let marker = state.month_marker(month);
            println!("{month}");
            if marker.paste_source {
                println!("  paste source");
            }
            if let Some(source) = state.month_links().source_of(month) {
                println!("  pasted from {source}");
            }
            for date in state.planned_dates().filter(|d| month.contains(*d)) {
                println!("  {date}  {} blocks", state.schedule(date).len());
            }
        }
        MonthAction::Paste {
            source,
            target,
            yes,
        } => {
            let next = settle(&state, state.paste_month(source, target), yes)?;
            file.save(&next)?;
            let pasted = next.planned_dates().filter(|d| target.contains(*d)).count();
            println!("Pasted {source} into {target}: {pasted} days.");
        }
    }
    Ok(())
}
