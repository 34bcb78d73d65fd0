use clap::Subcommand;

use super::{load_state, CmdResult};

#[derive(Subcommand)]
pub enum CategoryAction {
    /// List categories
    List {
        #[arg(long)]
        json: bool,
    },
    /// Add a "New Category" entry and print its id
    Add,
    /// Rename or recolor a category
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },
    /// Remove a category
    Delete { id: String },
}

pub fn run(action: CategoryAction) -> CmdResult {
    let (file, state) = load_state()?;

    match action {
        CategoryAction::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(state.categories())?);
            } else {
                for c in state.categories() {
                    println!("{}  {:<14} {}", c.id, c.name, c.color);
                }
            }
        }
        CategoryAction::Add => {
            let (next, id) = state.add_category();
            file.save(&next)?;
            println!("{id}");
        }
        CategoryAction::Update { id, name, color } => {
            let next = state.update_category(&id, name, color)?;
            file.save(&next)?;
            println!("ok");
        }
        CategoryAction::Delete { id } => {
            let next = state.delete_category(&id)?;
            file.save(&next)?;
            println!("ok");
        }
    }
    Ok(())
}
