use serde::{Deserialize, Serialize};

use crate::dial::angle::{MAX_MINUTES, MIN_MINUTES};

/// Longest settable period, in seconds.
pub const MAX_SECS: u64 = MAX_MINUTES as u64 * 60;
/// Shortest settable period, in seconds.
pub const MIN_SECS: u64 = MIN_MINUTES as u64 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
    /// Countdown hit zero; the completion sequence owns the engine until it
    /// switches phase.
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Focus,
    Break,
}

impl Phase {
    pub fn other(self) -> Self {
        match self {
            Phase::Focus => Phase::Break,
            Phase::Break => Phase::Focus,
        }
    }
}

/// Countdown state owned by the engine.
///
/// `remaining_secs <= total_secs` always holds; `total_secs > 0` while
/// Running or Paused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSession {
    pub state: TimerState,
    pub phase: Phase,
    pub remaining_secs: u64,
    pub total_secs: u64,
}

impl TimerSession {
    /// Idle session at the start of `phase` with the given length.
    pub fn idle(phase: Phase, secs: u64) -> Self {
        Self {
            state: TimerState::Idle,
            phase,
            remaining_secs: secs,
            total_secs: secs,
        }
    }

    /// Fraction of the current period already elapsed, 0.0 ..= 1.0.
    pub fn elapsed_fraction(&self) -> f64 {
        if self.total_secs == 0 {
            return 0.0;
        }
        (self.total_secs - self.remaining_secs.min(self.total_secs)) as f64
            / self.total_secs as f64
    }

    /// Repair a session read back from storage so the invariants hold.
    pub fn sanitized(mut self) -> Self {
        self.remaining_secs = self.remaining_secs.min(self.total_secs);
        if matches!(self.state, TimerState::Running | TimerState::Paused) && self.total_secs == 0 {
            self.state = TimerState::Idle;
        }
        self
    }
}

/// Convert a configured length in minutes to whole seconds, at least one.
pub fn minutes_to_secs(minutes: f64) -> u64 {
    if !minutes.is_finite() || minutes <= 0.0 {
        return 1;
    }
    ((minutes * 60.0).round() as u64).max(1)
}
