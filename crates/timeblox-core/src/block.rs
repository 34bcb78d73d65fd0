//! Time-block and activity-category types.

use serde::{Deserialize, Serialize};

use crate::clock::ClockTime;

/// Opaque style token (e.g. a CSS class such as `bg-sky-500`).
pub type ColorToken = String;

/// Fallback category used when the registry is empty.
pub const FALLBACK_CATEGORY: &str = "Uncategorized";
pub const FALLBACK_COLOR: &str = "bg-slate-600";
/// Color given to freshly added categories.
pub const NEW_CATEGORY_COLOR: &str = "bg-slate-500";

/// A single scheduled interval within a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBlock {
    pub start: ClockTime,
    pub end: ClockTime,
    pub title: String,
    pub category: String,
    pub color: ColorToken,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl TimeBlock {
    pub fn new(
        start: ClockTime,
        end: ClockTime,
        title: impl Into<String>,
        category: impl Into<String>,
        color: impl Into<ColorToken>,
    ) -> Self {
        Self {
            start,
            end,
            title: title.into(),
            category: category.into(),
            color: color.into(),
            notes: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn duration_minutes(&self) -> u32 {
        self.end.minutes().saturating_sub(self.start.minutes())
    }

    /// Half-open interval overlap against `[start, end)`.
    pub fn overlaps(&self, start: ClockTime, end: ClockTime) -> bool {
        start < self.end && end > self.start
    }

    /// Same block, moved to `[start, end]`.
    pub fn retimed(&self, start: ClockTime, end: ClockTime) -> Self {
        Self {
            start,
            end,
            ..self.clone()
        }
    }
}

/// A named activity type with its display color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityCategory {
    pub id: String,
    pub name: String,
    pub color: ColorToken,
}

impl ActivityCategory {
    pub fn new(id: impl Into<String>, name: impl Into<String>, color: impl Into<ColorToken>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: color.into(),
        }
    }

    /// The built-in registry a fresh planner starts with.
    pub fn defaults() -> Vec<ActivityCategory> {
        [
            ("1", "Work", "bg-red-500"),
            ("2", "Rest", "bg-blue-500"),
            ("3", "Workout", "bg-green-500"),
            ("4", "Meeting", "bg-orange-500"),
            ("5", "Meal", "bg-amber-500"),
            ("6", "Errand", "bg-purple-500"),
            ("7", "Focus", "bg-sky-500"),
            ("8", FALLBACK_CATEGORY, FALLBACK_COLOR),
        ]
        .into_iter()
        .map(|(id, name, color)| ActivityCategory::new(id, name, color))
        .collect()
    }
}

/// Look up the category whose name matches exactly.
pub fn find_category<'a>(categories: &'a [ActivityCategory], name: &str) -> Option<&'a ActivityCategory> {
    categories.iter().find(|c| c.name == name)
}
