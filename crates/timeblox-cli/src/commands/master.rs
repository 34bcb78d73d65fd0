//! Master template slots.

use clap::Subcommand;
use timeblox_core::DateKey;

use super::{load_state, settle, CmdResult};

#[derive(Subcommand)]
pub enum MasterAction {
    /// List the template slots
    List {
        #[arg(long)]
        json: bool,
    },
    /// Promote a planned, uncopied day into the first free slot
    Promote { date: DateKey },
    /// Clear a template's day and free its slot
    Delete {
        slot: u8,
        #[arg(long)]
        yes: bool,
    },
}

pub fn run(action: MasterAction) -> CmdResult {
    let (file, state) = load_state()?;

    match action {
        MasterAction::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(state.masters().slots())?);
            } else {
                for slot in state.masters().slots() {
                    let date = slot
                        .date
                        .map(|d| d.to_string())
                        .unwrap_or_else(|| "-".to_string());
                    println!("{}  {:<10} {:<7} {date}", slot.id, slot.name, slot.color_name);
                }
            }
        }
        MasterAction::Promote { date } => {
            let next = state.begin_day_drag(date);
            match next.masters().slot_for(date) {
                Some(slot) => println!("{date} is {}.", slot.name),
                None => println!("{date} was not promoted."),
            }
            file.save(&next)?;
        }
        MasterAction::Delete { slot, yes } => {
            let next = settle(&state, state.delete_master(slot)?, yes)?;
            file.save(&next)?;
            println!("Master {slot} cleared.");
        }
    }
    Ok(())
}
