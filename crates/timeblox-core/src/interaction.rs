//! Drag and resize gesture tracking.
//!
//! The tracker is a two-state machine. It does not hold the schedule; the
//! caller passes the current [`DaySchedule`] into every call, and nothing is
//! written back until [`GestureTracker::release`] hands out a result.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> (Dragging | Resizing) -> Idle
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut tracker = GestureTracker::new();
//! tracker.begin_drag(&day, 2, pointer_y, zoom.pixels_per_minute())?;
//! // On each pointer move:
//! if let Some(GestureEvent::Tick { .. }) = tracker.pointer_moved(&day, y)? { /* click */ }
//! match tracker.release(&day)? { /* Moved / BreakIn / Resized */ }
//! ```

use serde::{Deserialize, Serialize};

use crate::clock::{snap, ClockTime, MINUTES_PER_DAY, MIN_BLOCK_MINUTES, SNAP_INCREMENT_MINUTES};
use crate::day::DaySchedule;
use crate::error::ValidationError;
use crate::mutation::{self, BreakInProposal, MoveOutcome, ResizeHandle};

pub const MIN_PIXELS_PER_MINUTE: f64 = 1.8;
pub const MAX_PIXELS_PER_MINUTE: f64 = 7.2;
const ZOOM_IN_FACTOR: f64 = 1.25;
const ZOOM_OUT_FACTOR: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionState {
    Idle,
    Dragging,
    Resizing,
}

/// Vertical scale of the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Zoom {
    pixels_per_minute: f64,
}

impl Zoom {
    pub fn new(pixels_per_minute: f64) -> Self {
        Self {
            pixels_per_minute: pixels_per_minute.clamp(MIN_PIXELS_PER_MINUTE, MAX_PIXELS_PER_MINUTE),
        }
    }

    pub fn pixels_per_minute(&self) -> f64 {
        self.pixels_per_minute
    }

    /// Returns false when already at the limit.
    pub fn zoom_in(&mut self) -> bool {
        self.scale(ZOOM_IN_FACTOR)
    }

    /// Returns false when already at the limit.
    pub fn zoom_out(&mut self) -> bool {
        self.scale(ZOOM_OUT_FACTOR)
    }

    fn scale(&mut self, factor: f64) -> bool {
        let next = (self.pixels_per_minute * factor).clamp(MIN_PIXELS_PER_MINUTE, MAX_PIXELS_PER_MINUTE);
        if next == self.pixels_per_minute {
            return false;
        }
        self.pixels_per_minute = next;
        true
    }
}

impl Default for Zoom {
    fn default() -> Self {
        Self::new(MIN_PIXELS_PER_MINUTE)
    }
}

/// A block shown compressed to the sliver a break-in would leave of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SquishPreview {
    pub index: usize,
    pub start: ClockTime,
    pub end: ClockTime,
}

/// Where the grabbed block would land if released now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GesturePreview {
    pub index: usize,
    pub start: ClockTime,
    pub end: ClockTime,
    /// Block currently under the dragged one, if any.
    pub collision: Option<usize>,
    pub squish: Option<SquishPreview>,
}

/// Feedback produced while a gesture is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GestureEvent {
    /// The snapped position changed; one click/vibration per distinct value.
    Tick { minutes: i64 },
}

/// What a finished gesture asks the store to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GestureOutcome {
    Moved(DaySchedule),
    BreakIn(BreakInProposal),
    Resized(DaySchedule),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum GestureKind {
    Drag { cursor_offset: f64 },
    Resize(ResizeHandle),
}

#[derive(Debug, Clone)]
struct ActiveGesture {
    kind: GestureKind,
    index: usize,
    initial_y: f64,
    original_start: ClockTime,
    original_end: ClockTime,
    pixels_per_minute: f64,
    preview: GesturePreview,
    last_snapped: Option<i64>,
}

/// Tracks at most one live drag or resize.
#[derive(Debug, Clone, Default)]
pub struct GestureTracker {
    active: Option<ActiveGesture>,
}

impl GestureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> InteractionState {
        match self.active.as_ref().map(|g| g.kind) {
            None => InteractionState::Idle,
            Some(GestureKind::Drag { .. }) => InteractionState::Dragging,
            Some(GestureKind::Resize(_)) => InteractionState::Resizing,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn preview(&self) -> Option<&GesturePreview> {
        self.active.as_ref().map(|g| &g.preview)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Grab block `index` for dragging. `pointer_y` is in timeline pixels.
    ///
    /// Returns `Ok(false)` without changing anything if a gesture is live.
    pub fn begin_drag(
        &mut self,
        schedule: &DaySchedule,
        index: usize,
        pointer_y: f64,
        pixels_per_minute: f64,
    ) -> Result<bool, ValidationError> {
        if self.active.is_some() {
            return Ok(false);
        }
        check_scale(pixels_per_minute)?;
        let block = schedule.block(index)?;
        let block_top = block.start.minutes() as f64 * pixels_per_minute;
        self.active = Some(ActiveGesture {
            kind: GestureKind::Drag {
                cursor_offset: pointer_y - block_top,
            },
            index,
            initial_y: pointer_y,
            original_start: block.start,
            original_end: block.end,
            pixels_per_minute,
            preview: GesturePreview {
                index,
                start: block.start,
                end: block.end,
                collision: None,
                squish: None,
            },
            last_snapped: None,
        });
        tracing::debug!(index, "drag started");
        Ok(true)
    }

    /// Grab one edge of block `index`.
    ///
    /// Returns `Ok(false)` without changing anything if a gesture is live.
    pub fn begin_resize(
        &mut self,
        schedule: &DaySchedule,
        index: usize,
        handle: ResizeHandle,
        pointer_y: f64,
        pixels_per_minute: f64,
    ) -> Result<bool, ValidationError> {
        if self.active.is_some() {
            return Ok(false);
        }
        check_scale(pixels_per_minute)?;
        let block = schedule.block(index)?;
        self.active = Some(ActiveGesture {
            kind: GestureKind::Resize(handle),
            index,
            initial_y: pointer_y,
            original_start: block.start,
            original_end: block.end,
            pixels_per_minute,
            preview: GesturePreview {
                index,
                start: block.start,
                end: block.end,
                collision: None,
                squish: None,
            },
            last_snapped: None,
        });
        tracing::debug!(index, ?handle, "resize started");
        Ok(true)
    }

    /// Recompute the preview for a new pointer position.
    ///
    /// Returns a tick when the snapped value differs from the previous one.
    pub fn pointer_moved(
        &mut self,
        schedule: &DaySchedule,
        pointer_y: f64,
    ) -> Result<Option<GestureEvent>, ValidationError> {
        let Some(gesture) = self.active.as_mut() else {
            return Ok(None);
        };

        let snapped = match gesture.kind {
            GestureKind::Drag { cursor_offset } => {
                let raw = (pointer_y - cursor_offset) / gesture.pixels_per_minute;
                let start = snap(raw, SNAP_INCREMENT_MINUTES).clamp(0, i64::from(MINUTES_PER_DAY));
                let duration = gesture.original_end.minutes().saturating_sub(gesture.original_start.minutes());
                let start = ClockTime::from_minutes(u32::try_from(start).unwrap_or(MINUTES_PER_DAY));
                let end = ClockTime::from_minutes(start.minutes().saturating_add(duration));
                let collision = mutation::first_collision(schedule, gesture.index, start, end);
                let squish = collision.and_then(|target| squish_preview(schedule, target, start));
                gesture.preview = GesturePreview {
                    index: gesture.index,
                    start,
                    end,
                    collision,
                    squish,
                };
                start.minutes() as i64
            }
            GestureKind::Resize(handle) => {
                let delta_px = pointer_y - gesture.initial_y;
                let delta = snap(delta_px / gesture.pixels_per_minute, SNAP_INCREMENT_MINUTES);
                let candidate = match handle {
                    ResizeHandle::Top => gesture.original_start.minutes() as i64 + delta,
                    ResizeHandle::Bottom => gesture.original_end.minutes() as i64 + delta,
                };
                let (start, end) = mutation::clamp_resize(schedule, gesture.index, handle, candidate)?;
                gesture.preview = GesturePreview {
                    index: gesture.index,
                    start,
                    end,
                    collision: None,
                    squish: None,
                };
                match handle {
                    ResizeHandle::Top => start.minutes() as i64,
                    ResizeHandle::Bottom => end.minutes() as i64,
                }
            }
        };

        if gesture.last_snapped == Some(snapped) {
            return Ok(None);
        }
        gesture.last_snapped = Some(snapped);
        Ok(Some(GestureEvent::Tick { minutes: snapped }))
    }

    /// End the gesture and turn the last preview into a store change.
    ///
    /// Returns `Ok(None)` when no gesture was live. A drag that lands on
    /// another block yields a [`BreakInProposal`] that still needs the
    /// caller's confirmation.
    pub fn release(&mut self, schedule: &DaySchedule) -> Result<Option<GestureOutcome>, ValidationError> {
        let Some(gesture) = self.active.take() else {
            return Ok(None);
        };

        let outcome = match gesture.kind {
            GestureKind::Drag { .. } => {
                match mutation::move_block(schedule, gesture.index, gesture.preview.start)? {
                    MoveOutcome::Moved(day) => GestureOutcome::Moved(day),
                    MoveOutcome::BreakIn(proposal) => GestureOutcome::BreakIn(proposal),
                }
            }
            GestureKind::Resize(handle) => {
                let edge = match handle {
                    ResizeHandle::Top => gesture.preview.start,
                    ResizeHandle::Bottom => gesture.preview.end,
                };
                GestureOutcome::Resized(mutation::resize(
                    schedule,
                    gesture.index,
                    handle,
                    edge.minutes() as i64,
                )?)
            }
        };
        tracing::debug!(index = gesture.index, "gesture released");
        Ok(Some(outcome))
    }

    /// Drop the gesture without touching the store.
    ///
    /// Returns true if a gesture was live.
    pub fn cancel(&mut self) -> bool {
        let was_active = self.active.take().is_some();
        if was_active {
            tracing::debug!("gesture cancelled");
        }
        was_active
    }
}

/// The part of `target` left before `candidate_start`, if at least 15 minutes.
fn squish_preview(schedule: &DaySchedule, target: usize, candidate_start: ClockTime) -> Option<SquishPreview> {
    let block = schedule.blocks().get(target)?;
    let remaining = candidate_start.minutes() as i64 - block.start.minutes() as i64;
    (remaining >= MIN_BLOCK_MINUTES as i64).then_some(SquishPreview {
        index: target,
        start: block.start,
        end: candidate_start,
    })
}

fn check_scale(pixels_per_minute: f64) -> Result<(), ValidationError> {
    if pixels_per_minute.is_finite() && pixels_per_minute > 0.0 {
        return Ok(());
    }
    Err(ValidationError::InvalidValue {
        field: "pixels_per_minute".to_string(),
        message: format!("must be a positive number, got {pixels_per_minute}"),
    })
}
