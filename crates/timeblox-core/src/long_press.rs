//! Cancellable long-press timer.
//!
//! Like the gesture tracker, this runs on wall-clock deltas with no internal
//! thread: the caller arms it on press, cancels it on any move or release,
//! and polls it with the current time. It fires at most once per arming.

use serde::{Deserialize, Serialize};

use crate::clock::{snap, ClockTime, NEW_BLOCK_SNAP_MINUTES};

pub const DEFAULT_LONG_PRESS_MS: u64 = 700;

/// What a completed long-press asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LongPressAction {
    /// Held on an empty part of the timeline: offer a new block here.
    AddBlockAt { start: ClockTime },
    /// Held on a block: shorten it by one step.
    ShortenBlock { index: usize },
}

#[derive(Debug, Clone, Copy)]
struct Armed {
    deadline_ms: u64,
    action: LongPressAction,
}

/// A single long-press timer slot.
#[derive(Debug, Clone)]
pub struct LongPressTimer {
    delay_ms: u64,
    armed: Option<Armed>,
}

impl LongPressTimer {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            armed: None,
        }
    }

    pub fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// Start timing `action` from `now_ms`, replacing any pending press.
    pub fn arm(&mut self, action: LongPressAction, now_ms: u64) {
        self.armed = Some(Armed {
            deadline_ms: now_ms.saturating_add(self.delay_ms),
            action,
        });
    }

    /// Arm an "add block" press at a pixel offset on the empty timeline.
    pub fn arm_empty_slot(&mut self, pointer_y: f64, pixels_per_minute: f64, now_ms: u64) {
        let start = empty_slot_start(pointer_y, pixels_per_minute);
        self.arm(LongPressAction::AddBlockAt { start }, now_ms);
    }

    /// Any competing input: pointer move, release, or a gesture starting.
    ///
    /// Returns true if a pending press was dropped.
    pub fn cancel(&mut self) -> bool {
        self.armed.take().is_some()
    }

    /// Fire the pending action if its deadline has passed, disarming it.
    pub fn poll(&mut self, now_ms: u64) -> Option<LongPressAction> {
        let armed = self.armed?;
        if now_ms < armed.deadline_ms {
            return None;
        }
        self.armed = None;
        tracing::debug!(action = ?armed.action, "long press fired");
        Some(armed.action)
    }
}

impl Default for LongPressTimer {
    fn default() -> Self {
        Self::new(DEFAULT_LONG_PRESS_MS)
    }
}

/// Start time offered for a new block pressed at `pointer_y`, on the 15-minute grid.
pub fn empty_slot_start(pointer_y: f64, pixels_per_minute: f64) -> ClockTime {
    let minutes = snap(pointer_y / pixels_per_minute, NEW_BLOCK_SNAP_MINUTES).max(0);
    ClockTime::from_minutes(minutes as u32)
}
