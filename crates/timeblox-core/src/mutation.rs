//! Block mutation engine.
//!
//! Every function takes a schedule by reference and returns a new one; no
//! block is edited in place. Results go through [`DaySchedule::from_blocks`],
//! so they come back sorted by start time.
//!
//! ## Operations
//!
//! - [`insert`] / [`edit`] / [`delete`]: plain store edits, no overlap checks
//! - [`move_block`]: keep duration, reject onto an occupied slot with a
//!   [`BreakInProposal`]
//! - [`resize`]: move one edge, clamped between the neighbours
//! - [`duration_shift`]: change the end and ripple later blocks forward
//! - [`break_in_split`]: drop one block into another, keeping the residue

use serde::{Deserialize, Serialize};

use crate::block::{find_category, ActivityCategory, TimeBlock, FALLBACK_CATEGORY, FALLBACK_COLOR};
use crate::clock::{
    ClockTime, EXTEND_STEP_MINUTES, MINUTES_PER_DAY, MIN_BLOCK_MINUTES, MIN_FRAGMENT_MINUTES,
    NEW_BLOCK_DEFAULT_MINUTES,
};
use crate::day::DaySchedule;
use crate::error::ValidationError;

/// Which edge of a block a resize gesture holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeHandle {
    Top,
    Bottom,
}

/// A drop onto an occupied interval, waiting for the user to confirm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakInProposal {
    pub dropped_index: usize,
    pub target_index: usize,
    pub new_start: ClockTime,
    pub new_end: ClockTime,
}

/// Result of [`move_block`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved(DaySchedule),
    BreakIn(BreakInProposal),
}

/// Append a block. The caller picks a free slot.
pub fn insert(schedule: &DaySchedule, block: TimeBlock) -> DaySchedule {
    let mut blocks = schedule.blocks().to_vec();
    blocks.push(block);
    DaySchedule::from_blocks(blocks)
}

/// Replace the block at `index`.
///
/// When the new category names a known [`ActivityCategory`], the block's
/// color is taken from it; otherwise the supplied color is kept as-is.
pub fn edit(
    schedule: &DaySchedule,
    index: usize,
    mut updated: TimeBlock,
    categories: &[ActivityCategory],
) -> Result<DaySchedule, ValidationError> {
    schedule.block(index)?;
    if let Some(category) = find_category(categories, &updated.category) {
        updated.color = category.color.clone();
    }
    let mut blocks = schedule.blocks().to_vec();
    blocks[index] = updated;
    Ok(DaySchedule::from_blocks(blocks))
}

/// Remove the block at `index`.
pub fn delete(schedule: &DaySchedule, index: usize) -> Result<DaySchedule, ValidationError> {
    schedule.block(index)?;
    let mut blocks = schedule.blocks().to_vec();
    blocks.remove(index);
    Ok(DaySchedule::from_blocks(blocks))
}

/// First block (in schedule order, skipping `exclude`) overlapping `[start, end)`.
pub fn first_collision(
    schedule: &DaySchedule,
    exclude: usize,
    start: ClockTime,
    end: ClockTime,
) -> Option<usize> {
    schedule
        .iter()
        .enumerate()
        .find(|(i, b)| *i != exclude && b.overlaps(start, end))
        .map(|(i, _)| i)
}

/// Move the block at `index` so it starts at `new_start`, keeping its duration.
///
/// Landing on another block is not applied; the first colliding block is
/// returned as a [`BreakInProposal`] instead.
pub fn move_block(
    schedule: &DaySchedule,
    index: usize,
    new_start: ClockTime,
) -> Result<MoveOutcome, ValidationError> {
    let block = schedule.block(index)?;
    let new_end = ClockTime::from_minutes(new_start.minutes() + block.duration_minutes());

    if let Some(target_index) = first_collision(schedule, index, new_start, new_end) {
        tracing::debug!(index, target_index, "move lands on occupied slot, proposing break-in");
        return Ok(MoveOutcome::BreakIn(BreakInProposal {
            dropped_index: index,
            target_index,
            new_start,
            new_end,
        }));
    }

    let mut blocks = schedule.blocks().to_vec();
    blocks[index] = block.retimed(new_start, new_end);
    Ok(MoveOutcome::Moved(DaySchedule::from_blocks(blocks)))
}

/// Clamp a candidate edge position for a resize of block `index`.
///
/// - top: `min(candidate, end - 15)`, then not above the previous block's
///   end, then not before midnight
/// - bottom: `max(candidate, start + 15)`, then not past the next block's
///   start, then not past end of day
///
/// Returns the resulting `(start, end)`.
pub fn clamp_resize(
    schedule: &DaySchedule,
    index: usize,
    handle: ResizeHandle,
    candidate: i64,
) -> Result<(ClockTime, ClockTime), ValidationError> {
    let block = schedule.block(index)?;
    let blocks = schedule.blocks();
    let start = block.start.minutes() as i64;
    let end = block.end.minutes() as i64;
    let min_len = MIN_BLOCK_MINUTES as i64;

    let (new_start, new_end) = match handle {
        ResizeHandle::Top => {
            let mut s = candidate.min(end - min_len);
            if index > 0 {
                s = s.max(blocks[index - 1].end.minutes() as i64);
            }
            (s.max(0), end)
        }
        ResizeHandle::Bottom => {
            let mut e = candidate.max(start + min_len);
            if let Some(next) = blocks.get(index + 1) {
                e = e.min(next.start.minutes() as i64);
            }
            (start, e.min(MINUTES_PER_DAY as i64))
        }
    };

    Ok((
        ClockTime::from_minutes(new_start as u32),
        ClockTime::from_minutes(new_end as u32),
    ))
}

/// Move the `handle` edge of block `index` towards `candidate`, clamped.
pub fn resize(
    schedule: &DaySchedule,
    index: usize,
    handle: ResizeHandle,
    candidate: i64,
) -> Result<DaySchedule, ValidationError> {
    let (start, end) = clamp_resize(schedule, index, handle, candidate)?;
    let mut blocks = schedule.blocks().to_vec();
    blocks[index] = blocks[index].retimed(start, end);
    Ok(DaySchedule::from_blocks(blocks))
}

/// Change block `index`'s end by `delta` minutes and ripple forward.
///
/// The block never drops below 15 minutes. Each later block that now starts
/// before its predecessor ends is pushed forward by exactly the overlap,
/// keeping its own duration. Gaps are left alone.
pub fn duration_shift(
    schedule: &DaySchedule,
    index: usize,
    delta: i32,
) -> Result<DaySchedule, ValidationError> {
    schedule.block(index)?;
    let mut blocks = schedule.blocks().to_vec();

    let target = &blocks[index];
    let current = target.end.minutes() as i64 - target.start.minutes() as i64;
    let duration = (current + delta as i64).max(MIN_BLOCK_MINUTES as i64);
    let end = ClockTime::from_minutes((target.start.minutes() as i64 + duration) as u32);
    blocks[index] = target.retimed(target.start, end);

    for i in index + 1..blocks.len() {
        let prev_end = blocks[i - 1].end;
        let current = &blocks[i];
        if current.start < prev_end {
            let shifted_end = ClockTime::from_minutes(prev_end.minutes() + current.duration_minutes());
            blocks[i] = current.retimed(prev_end, shifted_end);
        }
    }

    Ok(DaySchedule::from_blocks(blocks))
}

/// Lengthen block `index` by one step (double-click action).
pub fn extend(schedule: &DaySchedule, index: usize) -> Result<DaySchedule, ValidationError> {
    duration_shift(schedule, index, EXTEND_STEP_MINUTES)
}

/// Shorten block `index` by one step (long-press action).
pub fn shorten(schedule: &DaySchedule, index: usize) -> Result<DaySchedule, ValidationError> {
    duration_shift(schedule, index, -EXTEND_STEP_MINUTES)
}

/// Drop block `dropped` onto block `target` at `[new_start, new_end]`.
///
/// The target is replaced by what is left of it before `new_start` and after
/// `new_end`; residues shorter than 5 minutes are discarded.
pub fn break_in_split(
    schedule: &DaySchedule,
    dropped: usize,
    target: usize,
    new_start: ClockTime,
    new_end: ClockTime,
) -> Result<DaySchedule, ValidationError> {
    schedule.block(dropped)?;
    let original = schedule.block(target)?.clone();
    if dropped == target {
        return Err(ValidationError::InvalidValue {
            field: "target_index".into(),
            message: "a block cannot break into itself".into(),
        });
    }

    let mut blocks = schedule.blocks().to_vec();
    blocks[dropped] = blocks[dropped].retimed(new_start, new_end);

    let mut fragments = Vec::with_capacity(2);
    if new_start > original.start
        && new_start.minutes() - original.start.minutes() >= MIN_FRAGMENT_MINUTES
    {
        fragments.push(original.retimed(original.start, new_start));
    }
    if original.end > new_end && original.end.minutes() - new_end.minutes() >= MIN_FRAGMENT_MINUTES {
        fragments.push(original.retimed(new_end, original.end));
    }

    blocks.splice(target..=target, fragments);
    Ok(DaySchedule::from_blocks(blocks))
}

/// Apply a confirmed [`BreakInProposal`].
pub fn apply_break_in(
    schedule: &DaySchedule,
    proposal: &BreakInProposal,
) -> Result<DaySchedule, ValidationError> {
    break_in_split(
        schedule,
        proposal.dropped_index,
        proposal.target_index,
        proposal.new_start,
        proposal.new_end,
    )
}

/// The block offered when the user long-presses an empty slot.
///
/// One hour long, titled "New Task", in the first registered category.
pub fn draft_block(start: ClockTime, categories: &[ActivityCategory]) -> TimeBlock {
    let (category, color) = categories
        .first()
        .map(|c| (c.name.clone(), c.color.clone()))
        .unwrap_or_else(|| (FALLBACK_CATEGORY.to_string(), FALLBACK_COLOR.to_string()));
    let end = ClockTime::from_minutes(start.minutes() + NEW_BLOCK_DEFAULT_MINUTES);
    TimeBlock::new(start, end, "New Task", category, color).with_notes("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::parse;

    fn at(text: &str) -> ClockTime {
        ClockTime::from_minutes(parse(text))
    }

    fn block(title: &str, start: &str, end: &str) -> TimeBlock {
        TimeBlock::new(at(start), at(end), title, "Work", "bg-red-500")
    }

    fn spans(schedule: &DaySchedule) -> Vec<(String, String)> {
        schedule
            .iter()
            .map(|b| (b.start.to_string(), b.end.to_string()))
            .collect()
    }

    fn span(start: &str, end: &str) -> (String, String) {
        (start.to_string(), end.to_string())
    }

    fn three_hours() -> DaySchedule {
        DaySchedule::from_blocks(vec![
            block("a", "9:00 AM", "10:00 AM"),
            block("b", "10:00 AM", "11:00 AM"),
            block("c", "11:00 AM", "12:00 PM"),
        ])
    }

    #[test]
    fn insert_resorts_without_overlap_check() {
        let day = insert(&three_hours(), block("x", "9:30 AM", "9:45 AM"));
        assert_eq!(day.len(), 4);
        assert_eq!(day.blocks()[1].title, "x");
        assert!(!day.is_non_overlapping());
    }

    #[test]
    fn edit_takes_color_from_known_category() {
        let categories = ActivityCategory::defaults();
        let mut updated = three_hours().blocks()[0].clone();
        updated.category = "Meal".into();
        updated.color = "bg-pink-500".into();
        let day = edit(&three_hours(), 0, updated, &categories).unwrap();
        assert_eq!(day.blocks()[0].color, "bg-amber-500");
    }

    #[test]
    fn edit_keeps_color_for_unknown_category() {
        let categories = ActivityCategory::defaults();
        let mut updated = three_hours().blocks()[0].clone();
        updated.category = "Gardening".into();
        updated.color = "bg-lime-500".into();
        let day = edit(&three_hours(), 0, updated, &categories).unwrap();
        assert_eq!(day.blocks()[0].color, "bg-lime-500");
    }

    #[test]
    fn edit_resorts_moved_block() {
        let mut updated = three_hours().blocks()[0].clone();
        updated.start = at("1:00 PM");
        updated.end = at("2:00 PM");
        let day = edit(&three_hours(), 0, updated, &[]).unwrap();
        let titles: Vec<_> = day.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, ["b", "c", "a"]);
    }

    #[test]
    fn out_of_range_indices_fail_fast() {
        let day = three_hours();
        assert!(edit(&day, 3, block("z", "1:00 PM", "2:00 PM"), &[]).is_err());
        assert!(delete(&day, 9).is_err());
        assert!(resize(&day, 3, ResizeHandle::Top, 0).is_err());
        assert!(duration_shift(&day, 5, 30).is_err());
        assert!(break_in_split(&day, 0, 7, at("10:00 AM"), at("10:30 AM")).is_err());
        assert!(move_block(&day, 3, at("1:00 PM")).is_err());
    }

    #[test]
    fn delete_removes_block() {
        let day = delete(&three_hours(), 1).unwrap();
        assert_eq!(spans(&day), [span("9:00 AM", "10:00 AM"), span("11:00 AM", "12:00 PM")]);
    }

    #[test]
    fn move_into_free_slot_keeps_duration() {
        let outcome = move_block(&three_hours(), 0, at("1:00 PM")).unwrap();
        let MoveOutcome::Moved(day) = outcome else {
            panic!("expected a plain move");
        };
        assert_eq!(day.blocks()[2].title, "a");
        assert_eq!(spans(&day)[2], span("1:00 PM", "2:00 PM"));
        assert!(day.is_non_overlapping());
    }

    #[test]
    fn move_onto_block_proposes_break_in() {
        let day = three_hours();
        let outcome = move_block(&day, 2, at("10:15 AM")).unwrap();
        assert_eq!(
            outcome,
            MoveOutcome::BreakIn(BreakInProposal {
                dropped_index: 2,
                target_index: 1,
                new_start: at("10:15 AM"),
                new_end: at("11:15 AM"),
            })
        );
    }

    #[test]
    fn move_flush_against_neighbour_is_not_a_collision() {
        let day = DaySchedule::from_blocks(vec![
            block("a", "9:00 AM", "10:00 AM"),
            block("b", "11:00 AM", "12:00 PM"),
        ]);
        let outcome = move_block(&day, 1, at("10:00 AM")).unwrap();
        assert!(matches!(outcome, MoveOutcome::Moved(_)));
    }

    #[test]
    fn resize_top_clamps_to_previous_end_and_min_length() {
        let day = three_hours();
        let grown = resize(&day, 1, ResizeHandle::Top, parse("9:30 AM") as i64).unwrap();
        assert_eq!(spans(&grown)[1], span("10:00 AM", "11:00 AM"));

        let shrunk = resize(&day, 1, ResizeHandle::Top, parse("10:55 AM") as i64).unwrap();
        assert_eq!(spans(&shrunk)[1], span("10:45 AM", "11:00 AM"));
    }

    #[test]
    fn resize_top_floors_at_midnight() {
        let day = DaySchedule::from_blocks(vec![block("a", "12:30 AM", "2:00 AM")]);
        let day = resize(&day, 0, ResizeHandle::Top, -40).unwrap();
        assert_eq!(day.blocks()[0].start, ClockTime::MIDNIGHT);
    }

    #[test]
    fn resize_bottom_clamps_to_next_start_and_end_of_day() {
        let day = DaySchedule::from_blocks(vec![
            block("a", "9:00 AM", "10:00 AM"),
            block("b", "11:00 AM", "12:00 PM"),
        ]);
        let day2 = resize(&day, 0, ResizeHandle::Bottom, parse("11:30 AM") as i64).unwrap();
        assert_eq!(spans(&day2)[0], span("9:00 AM", "11:00 AM"));

        let day3 = resize(&day, 0, ResizeHandle::Bottom, parse("9:05 AM") as i64).unwrap();
        assert_eq!(spans(&day3)[0], span("9:00 AM", "9:15 AM"));

        let late = DaySchedule::from_blocks(vec![block("z", "11:00 PM", "11:30 PM")]);
        let late = resize(&late, 0, ResizeHandle::Bottom, 1500).unwrap();
        assert_eq!(late.blocks()[0].end, ClockTime::END_OF_DAY);
    }

    #[test]
    fn duration_shift_ripples_forward() {
        let day = duration_shift(&three_hours(), 0, 30).unwrap();
        assert_eq!(
            spans(&day),
            [
                span("9:00 AM", "10:30 AM"),
                span("10:30 AM", "11:30 AM"),
                span("11:30 AM", "12:30 PM"),
            ]
        );
    }

    #[test]
    fn duration_shift_leaves_gaps_alone() {
        let day = DaySchedule::from_blocks(vec![
            block("a", "9:00 AM", "10:00 AM"),
            block("b", "10:00 AM", "11:00 AM"),
            block("c", "1:00 PM", "2:00 PM"),
        ]);
        let day = duration_shift(&day, 0, 30).unwrap();
        assert_eq!(spans(&day)[1], span("10:30 AM", "11:30 AM"));
        assert_eq!(spans(&day)[2], span("1:00 PM", "2:00 PM"));

        let shorter = shorten(&three_hours(), 1).unwrap();
        assert_eq!(spans(&shorter)[1], span("10:00 AM", "10:15 AM"));
        assert_eq!(spans(&shorter)[2], span("11:00 AM", "12:00 PM"));
    }

    #[test]
    fn extend_pushes_following_blocks_an_hour() {
        let day = extend(&three_hours(), 1).unwrap();
        assert_eq!(
            spans(&day),
            [
                span("9:00 AM", "10:00 AM"),
                span("10:00 AM", "12:00 PM"),
                span("12:00 PM", "1:00 PM"),
            ]
        );
    }

    #[test]
    fn break_in_keeps_both_fragments() {
        let day = DaySchedule::from_blocks(vec![
            block("target", "10:00 AM", "11:00 AM"),
            block("dropped", "2:00 PM", "2:30 PM"),
        ]);
        let day = break_in_split(&day, 1, 0, at("10:15 AM"), at("10:45 AM")).unwrap();
        let got: Vec<_> = day
            .iter()
            .map(|b| (b.title.as_str(), b.start.to_string(), b.end.to_string()))
            .collect();
        assert_eq!(
            got,
            [
                ("target", "10:00 AM".to_string(), "10:15 AM".to_string()),
                ("dropped", "10:15 AM".to_string(), "10:45 AM".to_string()),
                ("target", "10:45 AM".to_string(), "11:00 AM".to_string()),
            ]
        );
    }

    #[test]
    fn break_in_drops_short_slivers() {
        let day = DaySchedule::from_blocks(vec![
            block("target", "10:00 AM", "11:00 AM"),
            block("dropped", "2:00 PM", "2:30 PM"),
        ]);
        let day = break_in_split(&day, 1, 0, at("10:02 AM"), at("10:32 AM")).unwrap();
        assert_eq!(
            spans(&day),
            [span("10:02 AM", "10:32 AM"), span("10:32 AM", "11:00 AM")]
        );
        assert_eq!(day.blocks()[0].title, "dropped");
    }

    #[test]
    fn break_in_covering_whole_target_removes_it() {
        let day = DaySchedule::from_blocks(vec![
            block("target", "10:00 AM", "10:30 AM"),
            block("dropped", "2:00 PM", "3:00 PM"),
        ]);
        let day = break_in_split(&day, 1, 0, at("9:45 AM"), at("10:45 AM")).unwrap();
        assert_eq!(day.len(), 1);
        assert_eq!(day.blocks()[0].title, "dropped");
    }

    #[test]
    fn break_in_onto_itself_is_rejected() {
        assert!(break_in_split(&three_hours(), 1, 1, at("10:00 AM"), at("10:30 AM")).is_err());
    }

    #[test]
    fn draft_block_uses_first_category() {
        let draft = draft_block(at("3:00 PM"), &ActivityCategory::defaults());
        assert_eq!(draft.title, "New Task");
        assert_eq!(draft.category, "Work");
        assert_eq!(draft.end.to_string(), "4:00 PM");

        let fallback = draft_block(at("3:00 PM"), &[]);
        assert_eq!(fallback.category, FALLBACK_CATEGORY);
        assert_eq!(fallback.color, FALLBACK_COLOR);
    }
}
