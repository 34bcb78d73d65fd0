//! Plain-text export of a day.

use crate::day::DaySchedule;

/// One line per block: `"{start} - {end} | {title} ({category})"`.
pub fn schedule_to_text(schedule: &DaySchedule) -> String {
    schedule
        .iter()
        .map(|b| format!("{} - {} | {} ({})", b.start, b.end, b.title, b.category))
        .collect::<Vec<_>>()
        .join("\n")
}
