//! # TimeBlox Core Library
//!
//! This library provides the core logic for TimeBlox, a day planner built
//! from time blocks. It follows a CLI-first philosophy: every operation is
//! available through the standalone CLI binary, and any graphical front end
//! is a thin layer over the same library.
//!
//! ## Architecture
//!
//! - **Clock codec**: `H:MM AM|PM` text to minute offsets and back
//! - **Mutation engine**: pure functions from one [`DaySchedule`] to the next,
//!   always re-sorted by start time
//! - **Interaction**: a drag/resize state machine and a long-press timer, both
//!   driven by the caller's pointer events and wall clock
//! - **Replication**: day copies with flattened provenance, month pastes and
//!   five master template slots
//! - **Planner**: [`PlannerState`], the value every action maps to its
//!   successor, with destructive actions gated by a [`Confirmation`]
//! - **Storage**: TOML configuration and a JSON state snapshot
//!
//! ## Key Components
//!
//! - [`PlannerState`]: all schedules and links
//! - [`GestureTracker`]: live drag/resize previews
//! - [`ScheduleGenerator`]: seam for text-to-schedule backends
//! - [`Config`]: application configuration management

pub mod block;
pub mod clock;
pub mod day;
pub mod error;
pub mod export;
pub mod generate;
pub mod interaction;
pub mod long_press;
pub mod master;
pub mod mutation;
pub mod planner;
pub mod replication;
pub mod storage;

pub use block::{ActivityCategory, ColorToken, TimeBlock};
pub use clock::ClockTime;
pub use day::{DateKey, DaySchedule, MonthKey};
pub use error::{ConfigError, CoreError, GenerationError, ValidationError};
pub use export::schedule_to_text;
pub use generate::{decode_response, RecordedResponse, ScheduleGenerator};
pub use interaction::{GestureEvent, GestureOutcome, GesturePreview, GestureTracker, InteractionState, Zoom};
pub use long_press::{LongPressAction, LongPressTimer};
pub use master::{MasterDay, MasterRegistry};
pub use mutation::{BreakInProposal, ResizeHandle};
pub use planner::{Confirmation, Outcome, PlannerState};
pub use replication::{CopyLinks, DayMarker, MonthLinks, MonthMarker};
pub use storage::{Config, StateFile};
