//! 12-hour clock codec.
//!
//! Converts between `H:MM AM|PM` text and minute-of-day integers. The lenient
//! [`parse`] never fails (malformed text reads as midnight); [`parse_strict`]
//! is for user-entered values that must be rejected instead.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

use crate::error::ValidationError;

pub const MINUTES_PER_DAY: u32 = 24 * 60;
/// Shortest block any drag, resize or shift may produce.
pub const MIN_BLOCK_MINUTES: u32 = 15;
/// Drag and resize previews snap to this grid.
pub const SNAP_INCREMENT_MINUTES: u32 = 5;
/// Break-in residual fragments shorter than this are dropped.
pub const MIN_FRAGMENT_MINUTES: u32 = 5;
/// Long-press on an empty slot snaps the new block start to this grid.
pub const NEW_BLOCK_SNAP_MINUTES: u32 = 15;
pub const NEW_BLOCK_DEFAULT_MINUTES: u32 = 60;
/// Extend (double-click) and shorten (long-press) step.
pub const EXTEND_STEP_MINUTES: i32 = 60;

/// A minute offset from the owning day's midnight.
///
/// Codec output is always below 1440. An end edge may sit at exactly 1440,
/// and a forward ripple may push a block past it; the value is kept
/// unwrapped so ordering stays monotonic, only the text form wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClockTime(u32);

impl ClockTime {
    pub const MIDNIGHT: ClockTime = ClockTime(0);
    pub const END_OF_DAY: ClockTime = ClockTime(MINUTES_PER_DAY);

    pub const fn from_minutes(minutes: u32) -> Self {
        Self(minutes)
    }

    pub const fn minutes(self) -> u32 {
        self.0
    }

    /// Lenient parse, see [`parse`].
    pub fn parse_lenient(text: &str) -> Self {
        Self(parse(text))
    }

    /// Offset by a signed number of minutes, saturating at midnight.
    pub fn offset(self, delta: i32) -> Self {
        Self((self.0 as i64 + delta as i64).max(0) as u32)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format(self.0))
    }
}

impl std::str::FromStr for ClockTime {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_strict(s).map(Self)
    }
}

struct RawClock {
    hours: u32,
    minutes: u32,
    pm: bool,
}

static CLOCK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+):(\d+)\s*(AM|PM)").expect("clock pattern is a valid regex")
});

/// First `H:MM AM|PM` match anywhere in `text`.
fn scan(text: &str) -> Option<RawClock> {
    let caps = CLOCK_PATTERN.captures(text)?;
    Some(RawClock {
        hours: caps[1].parse().ok()?,
        minutes: caps[2].parse().ok()?,
        pm: caps[3].eq_ignore_ascii_case("pm"),
    })
}

fn to_minutes(raw: &RawClock) -> u32 {
    let mut hours = raw.hours;
    if raw.pm && hours < 12 {
        hours += 12;
    }
    if !raw.pm && hours == 12 {
        hours = 0;
    }
    hours.saturating_mul(60).saturating_add(raw.minutes)
}

/// Parse `H:MM AM|PM` (case-insensitive) into minutes since midnight.
///
/// Malformed input yields `0`. Field ranges are not checked.
pub fn parse(text: &str) -> u32 {
    match scan(text) {
        Some(raw) => to_minutes(&raw),
        None => {
            if !text.trim().is_empty() {
                tracing::warn!(text = %text, "unparsable clock text, reading as midnight");
            }
            0
        }
    }
}

/// Parse `H:MM AM|PM`, rejecting malformed text and out-of-range fields.
pub fn parse_strict(text: &str) -> Result<u32, ValidationError> {
    let raw = scan(text).ok_or_else(|| ValidationError::MalformedClock(text.to_string()))?;
    if !(1..=12).contains(&raw.hours) || raw.minutes > 59 {
        return Err(ValidationError::MalformedClock(text.to_string()));
    }
    Ok(to_minutes(&raw))
}

/// Render minutes as `H:MM AM|PM`, wrapping modulo one day.
pub fn format(minutes: u32) -> String {
    let minutes = minutes % MINUTES_PER_DAY;
    let hours24 = minutes / 60;
    let mins = minutes % 60;
    let hours12 = if hours24 % 12 == 0 { 12 } else { hours24 % 12 };
    let meridiem = if hours24 >= 12 { "PM" } else { "AM" };
    format!("{hours12}:{mins:02} {meridiem}")
}

/// Round `minutes` to the nearest multiple of `increment`, halves rounding up.
pub fn snap(minutes: f64, increment: u32) -> i64 {
    let inc = increment as f64;
    ((minutes / inc + 0.5).floor() * inc) as i64
}
