//! Day and month copy links.
//!
//! `CopyLinks` maps a copied date to the date it was copied from. Links are
//! kept flat: a copy always points at its ultimate source, never at another
//! copy. `MonthLinks` records month pastes for display and has no effect on
//! day-level resolution.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::block::ColorToken;
use crate::day::{DateKey, MonthKey};
use crate::master::MasterRegistry;

/// Color of a copy whose source is not a master template.
pub const DEFAULT_COPY_COLOR: &str = "bg-sky-400";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CopyLinks {
    links: BTreeMap<DateKey, DateKey>,
}

impl CopyLinks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source_of(&self, date: DateKey) -> Option<DateKey> {
        self.links.get(&date).copied()
    }

    pub fn is_copy(&self, date: DateKey) -> bool {
        self.links.contains_key(&date)
    }

    /// The non-copy root a copy of `date` should point at.
    pub fn ultimate_source(&self, date: DateKey) -> DateKey {
        self.source_of(date).unwrap_or(date)
    }

    /// Record that `target` now holds a copy of `source`, flattened.
    ///
    /// Copies previously made from `target` no longer match its content and
    /// are orphaned, so a key is never also a source. Copying a day back onto
    /// its own origin leaves the origin unlinked.
    ///
    /// Returns the orphaned dates.
    pub fn link(&mut self, target: DateKey, source: DateKey) -> Vec<DateKey> {
        let root = self.ultimate_source(source);
        if root == target {
            self.links.remove(&target);
            return Vec::new();
        }
        let orphaned = self.copies_of(target);
        for child in &orphaned {
            self.links.remove(child);
        }
        self.links.insert(target, root);
        orphaned
    }

    /// Drop `date`'s own provenance.
    pub fn unlink(&mut self, date: DateKey) -> Option<DateKey> {
        self.links.remove(&date)
    }

    /// Drop `date`'s provenance and orphan every copy made from it.
    ///
    /// Returns the orphaned children.
    pub fn unlink_cascade(&mut self, date: DateKey) -> Vec<DateKey> {
        self.links.remove(&date);
        let children = self.copies_of(date);
        for child in &children {
            self.links.remove(child);
        }
        children
    }

    /// Dates whose recorded source is `source`.
    pub fn copies_of(&self, source: DateKey) -> Vec<DateKey> {
        self.links
            .iter()
            .filter(|(_, s)| **s == source)
            .map(|(k, _)| *k)
            .collect()
    }

    /// Remove every link whose key falls in `month`.
    pub fn clear_month(&mut self, month: MonthKey) {
        self.links.retain(|k, _| !month.contains(*k));
    }

    pub fn iter(&self) -> impl Iterator<Item = (DateKey, DateKey)> + '_ {
        self.links.iter().map(|(k, v)| (*k, *v))
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MonthLinks {
    links: BTreeMap<MonthKey, MonthKey>,
}

impl MonthLinks {
    pub fn record(&mut self, target: MonthKey, source: MonthKey) {
        self.links.insert(target, source);
    }

    pub fn source_of(&self, month: MonthKey) -> Option<MonthKey> {
        self.links.get(&month).copied()
    }

    pub fn marker(&self, month: MonthKey) -> MonthMarker {
        MonthMarker {
            paste_source: self.links.values().any(|s| *s == month),
            pasted_copy: self.links.contains_key(&month),
        }
    }
}

/// Calendar tag for a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DayMarker {
    /// The date is held by a master slot.
    Master { slot: u8 },
    /// The date is a copy; `color` is the source's master color if it has one.
    Copy { source: DateKey, color: ColorToken },
}

/// Calendar tags for a month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MonthMarker {
    /// Some other month was pasted from this one.
    pub paste_source: bool,
    /// This month was pasted from another.
    pub pasted_copy: bool,
}

/// Marker for a date with content. Master status wins over copy status.
pub fn day_marker(
    date: DateKey,
    has_schedule: bool,
    links: &CopyLinks,
    masters: &MasterRegistry,
) -> Option<DayMarker> {
    if !has_schedule {
        return None;
    }
    if let Some(slot) = masters.slot_for(date) {
        return Some(DayMarker::Master { slot: slot.id });
    }
    let source = links.source_of(date)?;
    let color = masters
        .slot_for(source)
        .map(|s| s.color.clone())
        .unwrap_or_else(|| DEFAULT_COPY_COLOR.to_string());
    Some(DayMarker::Copy { source, color })
}

/// The date in `month` with the same weekday and ordinal as `source`.
///
/// `None` when `month` has no such occurrence (e.g. a 5th Tuesday).
pub fn matching_occurrence(source: DateKey, month: MonthKey) -> Option<DateKey> {
    let weekday = source.weekday_from_sunday();
    let occurrence = source.weekday_occurrence();
    let first_weekday = month.first_day().weekday_from_sunday();
    let first_occurrence = 1 + (weekday + 7 - first_weekday) % 7;
    month.day(first_occurrence + (occurrence - 1) * 7)
}
