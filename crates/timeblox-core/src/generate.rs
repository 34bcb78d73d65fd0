//! Text-to-schedule generation seam.
//!
//! The generator itself lives outside the core. This module defines the trait
//! the planner calls, the prompt a language-model backend is given, and the
//! decoder for the JSON the backend answers with:
//!
//! ```json
//! {"schedule": [{"startTime": "9:00 AM", "endTime": "10:00 AM",
//!                "title": "Deep work", "category": "Focus",
//!                "color": "bg-sky-500", "notes": "optional"}]}
//! ```

use serde::Deserialize;

use crate::block::{ActivityCategory, TimeBlock};
use crate::clock::{parse_strict, ClockTime};
use crate::day::DateKey;
use crate::error::GenerationError;

/// An external service that turns free-text tasks into blocks for one date.
pub trait ScheduleGenerator {
    fn generate(
        &self,
        tasks: &str,
        date: DateKey,
        categories: &[ActivityCategory],
    ) -> Result<Vec<TimeBlock>, GenerationError>;
}

/// A generator that answers with a response captured earlier.
///
/// Used by the CLI to import a saved backend reply, and by tests.
#[derive(Debug, Clone)]
pub struct RecordedResponse {
    json: String,
}

impl RecordedResponse {
    pub fn new(json: impl Into<String>) -> Self {
        Self { json: json.into() }
    }
}

impl ScheduleGenerator for RecordedResponse {
    fn generate(
        &self,
        _tasks: &str,
        _date: DateKey,
        _categories: &[ActivityCategory],
    ) -> Result<Vec<TimeBlock>, GenerationError> {
        decode_response(&self.json)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireBlock {
    start_time: String,
    end_time: String,
    title: String,
    category: String,
    color: String,
    #[serde(default)]
    notes: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    schedule: Vec<WireBlock>,
}

/// Decode a backend reply. Any structural or clock-format problem is a
/// [`GenerationError`].
pub fn decode_response(json: &str) -> Result<Vec<TimeBlock>, GenerationError> {
    let response: WireResponse = serde_json::from_str(json.trim())
        .map_err(|e| GenerationError::new(format!("invalid schedule format: {e}")))?;

    response
        .schedule
        .into_iter()
        .map(|wire| {
            let start = parse_strict(&wire.start_time).map_err(|e| GenerationError::new(e.to_string()))?;
            let end = parse_strict(&wire.end_time).map_err(|e| GenerationError::new(e.to_string()))?;
            Ok(TimeBlock {
                start: ClockTime::from_minutes(start),
                end: ClockTime::from_minutes(end),
                title: wire.title,
                category: wire.category,
                color: wire.color,
                notes: wire.notes,
            })
        })
        .collect()
}

/// Instructions for a language-model backend.
pub fn build_prompt(tasks: &str, date: DateKey, categories: &[ActivityCategory]) -> String {
    let categories = categories
        .iter()
        .map(|c| format!("{} (use color '{}')", c.name, c.color))
        .collect::<Vec<_>>()
        .join(", ");
    let date = date.date().format("%a %b %d %Y");

    format!(
        "You are TimeBlox, a daily planner. Turn the user's unordered list of tasks into a \
         time-blocked schedule for {date}.\n\
         \n\
         1. Parse the tasks, durations, preferred times and workday hours from the input.\n\
         2. Produce a non-overlapping schedule for that date.\n\
         3. Fill empty slots with blocks such as \"Focus Time\", \"Lunch\", \"Short Break\" or \"Planning/Review\".\n\
         4. Give every block a category and its color from this list only: [{categories}].\n\
         5. Answer with a JSON object {{\"schedule\": [...]}} whose items have startTime, endTime \
         (\"H:MM AM\" format), title, category, color and optional notes. No markdown.\n\
         \n\
         User input:\n\"{tasks}\"\n"
    )
}
