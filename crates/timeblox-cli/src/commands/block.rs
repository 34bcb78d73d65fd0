//! Block editing commands.

use clap::{Subcommand, ValueEnum};
use timeblox_core::{ClockTime, DateKey, ResizeHandle, TimeBlock, ValidationError};

use super::{load_state, settle, CmdResult};

#[derive(Clone, Copy, ValueEnum)]
pub enum Edge {
    Top,
    Bottom,
}

impl From<Edge> for ResizeHandle {
    fn from(edge: Edge) -> Self {
        match edge {
            Edge::Top => ResizeHandle::Top,
            Edge::Bottom => ResizeHandle::Bottom,
        }
    }
}

/// Blocks must end after they start.
fn check_span(start: ClockTime, end: ClockTime) -> Result<(), ValidationError> {
    if end > start {
        return Ok(());
    }
    Err(ValidationError::InvalidValue {
        field: "end".to_string(),
        message: format!("{end} is not after {start}"),
    })
}

#[derive(Subcommand)]
pub enum BlockAction {
    /// Add a block (times as "9:00 AM")
    Add {
        date: DateKey,
        start: ClockTime,
        end: ClockTime,
        title: String,
        /// Category name; color comes from the registry
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Add the default one-hour "New Task" block
    Draft { date: DateKey, start: ClockTime },
    /// Change fields of a block
    Edit {
        date: DateKey,
        index: usize,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        start: Option<ClockTime>,
        #[arg(long)]
        end: Option<ClockTime>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Delete a block
    Delete {
        date: DateKey,
        index: usize,
        #[arg(long)]
        yes: bool,
    },
    /// Move a block, keeping its duration
    Move {
        date: DateKey,
        index: usize,
        start: ClockTime,
        /// Split an occupied slot instead of refusing
        #[arg(long)]
        yes: bool,
    },
    /// Move one edge of a block, clamped to its neighbours
    Resize {
        date: DateKey,
        index: usize,
        #[arg(value_enum)]
        edge: Edge,
        to: ClockTime,
    },
    /// Change a block's length by minutes, pushing later blocks forward
    Shift {
        date: DateKey,
        index: usize,
        #[arg(allow_hyphen_values = true)]
        minutes: i32,
    },
    /// Lengthen a block by an hour
    Extend { date: DateKey, index: usize },
    /// Shorten a block by an hour
    Shorten { date: DateKey, index: usize },
}

pub fn run(action: BlockAction) -> CmdResult {
    let (file, state) = load_state()?;

    let (date, next) = match action {
        BlockAction::Add {
            date,
            start,
            end,
            title,
            category,
            notes,
        } => {
            check_span(start, end)?;
            let category = match category {
                Some(name) => state
                    .categories()
                    .iter()
                    .find(|c| c.name == name)
                    .cloned()
                    .ok_or_else(|| format!("unknown category: {name}"))?,
                None => state
                    .categories()
                    .first()
                    .cloned()
                    .ok_or("no categories configured")?,
            };
            let mut block = TimeBlock::new(start, end, title, category.name, category.color);
            block.notes = notes;
            (date, state.add_block(date, block))
        }
        BlockAction::Draft { date, start } => (date, state.add_draft_block(date, start)),
        BlockAction::Edit {
            date,
            index,
            title,
            start,
            end,
            category,
            color,
            notes,
        } => {
            let mut block = state.schedule(date).block(index)?.clone();
            if let Some(title) = title {
                block.title = title;
            }
            if let Some(start) = start {
                block.start = start;
            }
            if let Some(end) = end {
                block.end = end;
            }
            if let Some(category) = category {
                block.category = category;
            }
            if let Some(color) = color {
                block.color = color;
            }
            if notes.is_some() {
                block.notes = notes;
            }
            check_span(block.start, block.end)?;
            (date, state.edit_block(date, index, block)?)
        }
        BlockAction::Delete { date, index, yes } => {
            (date, settle(&state, state.delete_block(date, index)?, yes)?)
        }
        BlockAction::Move {
            date,
            index,
            start,
            yes,
        } => (date, settle(&state, state.move_block(date, index, start)?, yes)?),
        BlockAction::Resize {
            date,
            index,
            edge,
            to,
        } => {
            // "12:00 AM" on the bottom edge means the end of the day.
            let to = match (edge, to) {
                (Edge::Bottom, ClockTime::MIDNIGHT) => ClockTime::END_OF_DAY,
                (_, to) => to,
            };
            (date, state.resize_block(date, index, edge.into(), i64::from(to.minutes()))?)
        }
        BlockAction::Shift {
            date,
            index,
            minutes,
        } => (date, state.shift_duration(date, index, minutes)?),
        BlockAction::Extend { date, index } => (date, state.extend_block(date, index)?),
        BlockAction::Shorten { date, index } => (date, state.shorten_block(date, index)?),
    };

    file.save(&next)?;
    for (i, b) in next.schedule(date).iter().enumerate() {
        println!("[{i}] {} - {} | {} ({})", b.start, b.end, b.title, b.category);
    }
    Ok(())
}
