//! # Focusdial Core Library
//!
//! Core logic for the focusdial focus/break timer. Front ends (the CLI, or a
//! GUI) are thin layers over this crate: they feed it pointer positions and
//! user commands, drive its timeline, and render the events it returns.
//!
//! ## Architecture
//!
//! - **Dial**: maps pointer positions on a circular dial to angles and
//!   angles to whole-minute durations, with a seam latch at 12 o'clock
//! - **Timer Engine**: a caller-driven state machine on a virtual timeline;
//!   countdown ticks and the completion blink sequence are callbacks queued
//!   on that timeline
//! - **Feedback**: haptics, sound, notifications and the wall clock are
//!   injected capabilities
//! - **Statistics**: per-day, per-hour and per-tag focus counts kept in a
//!   string key-value store
//! - **Storage**: SQLite key-value persistence and TOML configuration
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`Dial`]: Drag gesture to angle mapping
//! - [`Statistics`]: Completion counters and period aggregation
//! - [`Database`]: Durable key-value store
//! - [`Config`]: Application configuration management

pub mod dial;
pub mod error;
pub mod events;
pub mod feedback;
pub mod stats;
pub mod storage;
pub mod tag;
pub mod timer;

pub use dial::{angle_from_point, angle_to_time, time_to_angle, Dial, Direction, Point};
pub use error::{ConfigError, CoreError, StoreError, ValidationError};
pub use events::Event;
pub use feedback::{Feedback, Haptics, Notifier, SoundPlayer, SystemClock, WallClock};
pub use stats::{FocusRecord, PeriodSummary, Rgba, Statistics};
pub use storage::{Config, Database, KeyValueStore, MemoryStore};
pub use tag::Tag;
pub use timer::{Cue, Phase, TimerEngine, TimerSession, TimerState};
