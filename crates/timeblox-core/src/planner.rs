//! Planner context: every schedule plus the replication graph.
//!
//! `PlannerState` is a value. Actions borrow the current state and return
//! the next one, so callers can keep history or discard a result freely.
//! Actions that could destroy work return [`Outcome::NeedsConfirmation`];
//! passing the [`Confirmation`] to [`PlannerState::confirm`] commits it and
//! dropping it cancels with nothing changed.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::block::{ActivityCategory, TimeBlock, NEW_CATEGORY_COLOR};
use crate::clock::ClockTime;
use crate::day::{DateKey, DaySchedule, MonthKey};
use crate::error::{CoreError, Result, ValidationError};
use crate::generate::ScheduleGenerator;
use crate::interaction::GestureOutcome;
use crate::master::MasterRegistry;
use crate::mutation::{self, BreakInProposal, MoveOutcome, ResizeHandle};
use crate::replication::{self, CopyLinks, DayMarker, MonthLinks, MonthMarker};

/// A pending destructive action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Confirmation {
    /// Drop a block onto another and split the occupant.
    BreakIn { date: DateKey, proposal: BreakInProposal },
    /// Copy a day over a day that is itself a copy.
    OverwriteCopy { source: DateKey, target: DateKey },
    /// Replace a whole month with a weekday-matched paste.
    PasteMonth { source: MonthKey, target: MonthKey },
    /// Empty a day and cut its copy links.
    ClearDay { date: DateKey },
    DeleteBlock { date: DateKey, index: usize },
    /// Empty a master template's day and free its slot.
    DeleteMaster { slot: u8 },
}

impl Confirmation {
    /// Question to put to the user.
    pub fn prompt(&self) -> String {
        match self {
            Confirmation::BreakIn { .. } => {
                "This will split the existing block. Continue?".to_string()
            }
            Confirmation::OverwriteCopy { target, .. } => {
                format!("{target} is already a copy. Overwrite it?")
            }
            Confirmation::PasteMonth { source, target } => {
                format!("Paste {source} into {target}? Every schedule in {target} will be replaced.")
            }
            Confirmation::ClearDay { date } => {
                format!("Clear every block on {date}? Copies made from it lose their link.")
            }
            Confirmation::DeleteBlock { date, index } => {
                format!("Delete block {index} on {date}?")
            }
            Confirmation::DeleteMaster { slot } => {
                format!("Delete master template {slot} and clear its day?")
            }
        }
    }
}

/// Result of an action that may need the user's go-ahead.
#[derive(Debug, Clone)]
pub enum Outcome {
    Applied(PlannerState),
    NeedsConfirmation(Confirmation),
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerState {
    #[serde(default)]
    schedules: BTreeMap<DateKey, DaySchedule>,
    #[serde(default)]
    copy_links: CopyLinks,
    #[serde(default)]
    month_links: MonthLinks,
    #[serde(default)]
    masters: MasterRegistry,
    #[serde(default = "ActivityCategory::defaults")]
    categories: Vec<ActivityCategory>,
}

impl Default for PlannerState {
    fn default() -> Self {
        Self::new(ActivityCategory::defaults(), MasterRegistry::default())
    }
}

impl PlannerState {
    pub fn new(categories: Vec<ActivityCategory>, masters: MasterRegistry) -> Self {
        Self {
            schedules: BTreeMap::new(),
            copy_links: CopyLinks::new(),
            month_links: MonthLinks::default(),
            masters,
            categories,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// The day's blocks, empty if nothing is planned.
    pub fn schedule(&self, date: DateKey) -> DaySchedule {
        self.schedules.get(&date).cloned().unwrap_or_default()
    }

    pub fn has_schedule(&self, date: DateKey) -> bool {
        self.schedules.get(&date).is_some_and(|s| !s.is_empty())
    }

    /// Dates with at least one block, ascending.
    pub fn planned_dates(&self) -> impl Iterator<Item = DateKey> + '_ {
        self.schedules
            .iter()
            .filter(|(_, s)| !s.is_empty())
            .map(|(d, _)| *d)
    }

    pub fn copy_links(&self) -> &CopyLinks {
        &self.copy_links
    }

    pub fn month_links(&self) -> &MonthLinks {
        &self.month_links
    }

    pub fn masters(&self) -> &MasterRegistry {
        &self.masters
    }

    pub fn categories(&self) -> &[ActivityCategory] {
        &self.categories
    }

    pub fn day_marker(&self, date: DateKey) -> Option<DayMarker> {
        replication::day_marker(date, self.has_schedule(date), &self.copy_links, &self.masters)
    }

    pub fn month_marker(&self, month: MonthKey) -> MonthMarker {
        self.month_links.marker(month)
    }

    // ── Block commands ───────────────────────────────────────────────

    pub fn add_block(&self, date: DateKey, block: TimeBlock) -> PlannerState {
        let schedule = mutation::insert(&self.schedule(date), block);
        tracing::info!(%date, blocks = schedule.len(), "block added");
        self.with_schedule(date, schedule)
    }

    /// Insert the default one-hour block at `start`.
    pub fn add_draft_block(&self, date: DateKey, start: ClockTime) -> PlannerState {
        self.add_block(date, mutation::draft_block(start, &self.categories))
    }

    pub fn edit_block(&self, date: DateKey, index: usize, updated: TimeBlock) -> Result<PlannerState> {
        let schedule = mutation::edit(&self.schedule(date), index, updated, &self.categories)?;
        tracing::info!(%date, index, "block edited");
        Ok(self.with_schedule(date, schedule))
    }

    /// Ask to delete a block. The index is checked before asking.
    pub fn delete_block(&self, date: DateKey, index: usize) -> Result<Outcome> {
        self.schedule(date).block(index)?;
        Ok(Outcome::NeedsConfirmation(Confirmation::DeleteBlock { date, index }))
    }

    pub fn move_block(&self, date: DateKey, index: usize, new_start: ClockTime) -> Result<Outcome> {
        match mutation::move_block(&self.schedule(date), index, new_start)? {
            MoveOutcome::Moved(schedule) => {
                tracing::info!(%date, index, start = %new_start, "block moved");
                Ok(Outcome::Applied(self.with_schedule(date, schedule)))
            }
            MoveOutcome::BreakIn(proposal) => {
                Ok(Outcome::NeedsConfirmation(Confirmation::BreakIn { date, proposal }))
            }
        }
    }

    pub fn resize_block(
        &self,
        date: DateKey,
        index: usize,
        handle: ResizeHandle,
        candidate: i64,
    ) -> Result<PlannerState> {
        let schedule = mutation::resize(&self.schedule(date), index, handle, candidate)?;
        tracing::info!(%date, index, ?handle, "block resized");
        Ok(self.with_schedule(date, schedule))
    }

    pub fn shift_duration(&self, date: DateKey, index: usize, delta: i32) -> Result<PlannerState> {
        let schedule = mutation::duration_shift(&self.schedule(date), index, delta)?;
        tracing::info!(%date, index, delta, "block duration shifted");
        Ok(self.with_schedule(date, schedule))
    }

    pub fn extend_block(&self, date: DateKey, index: usize) -> Result<PlannerState> {
        let schedule = mutation::extend(&self.schedule(date), index)?;
        tracing::info!(%date, index, "block extended");
        Ok(self.with_schedule(date, schedule))
    }

    pub fn shorten_block(&self, date: DateKey, index: usize) -> Result<PlannerState> {
        let schedule = mutation::shorten(&self.schedule(date), index)?;
        tracing::info!(%date, index, "block shortened");
        Ok(self.with_schedule(date, schedule))
    }

    /// Commit the result of a released gesture.
    pub fn apply_gesture(&self, date: DateKey, outcome: GestureOutcome) -> Outcome {
        match outcome {
            GestureOutcome::Moved(schedule) | GestureOutcome::Resized(schedule) => {
                tracing::info!(%date, "gesture committed");
                Outcome::Applied(self.with_schedule(date, schedule))
            }
            GestureOutcome::BreakIn(proposal) => {
                Outcome::NeedsConfirmation(Confirmation::BreakIn { date, proposal })
            }
        }
    }

    /// Replace a day with generated blocks. On failure nothing changes.
    pub fn apply_generated(
        &self,
        date: DateKey,
        generator: &dyn ScheduleGenerator,
        tasks: &str,
    ) -> Result<PlannerState> {
        if tasks.trim().is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "tasks".into(),
                message: "enter your tasks for the day".into(),
            }
            .into());
        }
        let blocks = generator.generate(tasks, date, &self.categories).map_err(|e| {
            tracing::warn!(%date, detail = %e.detail, "schedule generation failed");
            CoreError::Generation(e)
        })?;
        let schedule = DaySchedule::from_blocks(blocks);
        tracing::info!(%date, blocks = schedule.len(), "generated schedule applied");
        Ok(self.with_schedule(date, schedule))
    }

    // ── Replication commands ─────────────────────────────────────────

    /// A day is about to be dragged onto another: promote it to a master
    /// template if it is an original with content and a slot is free.
    pub fn begin_day_drag(&self, date: DateKey) -> PlannerState {
        if !self.has_schedule(date) || self.copy_links.is_copy(date) || self.masters.is_master(date) {
            return self.clone();
        }
        let mut next = self.clone();
        match next.masters.promote(date) {
            Some(slot) => tracing::info!(%date, slot, "day promoted to master template"),
            None => tracing::warn!(%date, "no free master slot, dragging unpromoted"),
        }
        next
    }

    /// Copy `source`'s blocks onto `target`.
    pub fn copy_day(&self, source: DateKey, target: DateKey) -> Outcome {
        if source == target || !self.has_schedule(source) {
            return Outcome::Applied(self.clone());
        }
        if self.has_schedule(target) && self.copy_links.is_copy(target) {
            return Outcome::NeedsConfirmation(Confirmation::OverwriteCopy { source, target });
        }
        Outcome::Applied(self.copied_day(source, target))
    }

    pub fn clear_day(&self, date: DateKey) -> Outcome {
        Outcome::NeedsConfirmation(Confirmation::ClearDay { date })
    }

    pub fn delete_master(&self, slot: u8) -> Result<Outcome> {
        let master = self.masters.slot(slot)?;
        if master.date.is_none() {
            return Ok(Outcome::Applied(self.clone()));
        }
        Ok(Outcome::NeedsConfirmation(Confirmation::DeleteMaster { slot }))
    }

    /// Ask to paste `source` month over `target` month.
    pub fn paste_month(&self, source: MonthKey, target: MonthKey) -> Outcome {
        if source == target {
            return Outcome::Applied(self.clone());
        }
        Outcome::NeedsConfirmation(Confirmation::PasteMonth { source, target })
    }

    /// Commit a confirmed action.
    pub fn confirm(&self, confirmation: Confirmation) -> Result<PlannerState> {
        match confirmation {
            Confirmation::BreakIn { date, proposal } => {
                let schedule = mutation::apply_break_in(&self.schedule(date), &proposal)?;
                tracing::info!(
                    %date,
                    dropped = proposal.dropped_index,
                    target = proposal.target_index,
                    "break-in applied"
                );
                Ok(self.with_schedule(date, schedule))
            }
            Confirmation::OverwriteCopy { source, target } => Ok(self.copied_day(source, target)),
            Confirmation::PasteMonth { source, target } => Ok(self.pasted_month(source, target)),
            Confirmation::ClearDay { date } => Ok(self.cleared_day(date)),
            Confirmation::DeleteBlock { date, index } => {
                let schedule = mutation::delete(&self.schedule(date), index)?;
                tracing::info!(%date, index, "block deleted");
                let mut next = self.with_schedule(date, schedule);
                if !next.has_schedule(date) {
                    next.copy_links.unlink(date);
                }
                Ok(next)
            }
            Confirmation::DeleteMaster { slot } => {
                let date = self.masters.slot(slot)?.date;
                Ok(match date {
                    Some(date) => self.cleared_day(date),
                    None => self.clone(),
                })
            }
        }
    }

    // ── Category commands ────────────────────────────────────────────

    /// Append a fresh "New Category" entry. Returns its id alongside.
    pub fn add_category(&self) -> (PlannerState, String) {
        let category = ActivityCategory::new(
            uuid::Uuid::new_v4().to_string(),
            "New Category",
            NEW_CATEGORY_COLOR,
        );
        let id = category.id.clone();
        let mut next = self.clone();
        next.categories.push(category);
        tracing::info!(%id, "category added");
        (next, id)
    }

    /// Rename or recolor a category. Existing blocks keep their color.
    pub fn update_category(
        &self,
        id: &str,
        name: Option<String>,
        color: Option<String>,
    ) -> Result<PlannerState> {
        let mut next = self.clone();
        let category = next
            .categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| ValidationError::UnknownCategory(id.to_string()))?;
        if let Some(name) = name {
            category.name = name;
        }
        if let Some(color) = color {
            category.color = color;
        }
        tracing::info!(%id, "category updated");
        Ok(next)
    }

    pub fn delete_category(&self, id: &str) -> Result<PlannerState> {
        let mut next = self.clone();
        let before = next.categories.len();
        next.categories.retain(|c| c.id != id);
        if next.categories.len() == before {
            return Err(ValidationError::UnknownCategory(id.to_string()).into());
        }
        tracing::info!(%id, "category deleted");
        Ok(next)
    }

    // ── Internals ────────────────────────────────────────────────────

    fn with_schedule(&self, date: DateKey, schedule: DaySchedule) -> PlannerState {
        let mut next = self.clone();
        if schedule.is_empty() {
            next.schedules.remove(&date);
        } else {
            next.schedules.insert(date, schedule);
        }
        next
    }

    fn copied_day(&self, source: DateKey, target: DateKey) -> PlannerState {
        let mut next = self.with_schedule(target, self.schedule(source));
        let orphaned = next.copy_links.link(target, source);
        tracing::info!(
            %source,
            %target,
            origin = %next.copy_links.ultimate_source(target),
            orphaned = orphaned.len(),
            "day copied"
        );
        next
    }

    fn cleared_day(&self, date: DateKey) -> PlannerState {
        let mut next = self.clone();
        next.schedules.remove(&date);
        let slot = next.masters.release(date);
        let orphaned = next.copy_links.unlink_cascade(date);
        tracing::info!(%date, ?slot, orphaned = orphaned.len(), "day cleared");
        next
    }

    fn pasted_month(&self, source: MonthKey, target: MonthKey) -> PlannerState {
        let mut next = self.clone();
        next.schedules.retain(|date, _| !target.contains(*date));
        next.copy_links.clear_month(target);

        let mut pasted = 0usize;
        for date in self.planned_dates().filter(|d| source.contains(*d)) {
            let Some(dest) = replication::matching_occurrence(date, target) else {
                tracing::debug!(%date, %target, "no matching weekday occurrence, skipped");
                continue;
            };
            next.schedules.insert(dest, self.schedule(date));
            next.copy_links.link(dest, self.copy_links.ultimate_source(date));
            pasted += 1;
        }
        next.month_links.record(target, source);
        tracing::info!(%source, %target, pasted, "month pasted");
        next
    }
}
