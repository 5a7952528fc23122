use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::stats::FocusRecord;
use crate::timer::{Cue, Phase, TimerState};

/// Every state change of the engine produces an Event.
/// Commands return it; observers registered with `subscribe` also see it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        phase: Phase,
        remaining_secs: u64,
        total_secs: u64,
        at: DateTime<Utc>,
    },
    TimerResumed {
        phase: Phase,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        phase: Phase,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        phase: Phase,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// Phase switched by the user without the completion sequence.
    TimerSkipped {
        from: Phase,
        to: Phase,
        remaining_secs: u64,
        record: Option<FocusRecord>,
        at: DateTime<Utc>,
    },
    /// Countdown length changed while not running (dial or settings).
    TimeSet {
        phase: Phase,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    Tick {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// Countdown reached zero; the completion sequence follows.
    TimerFinished {
        phase: Phase,
        at: DateTime<Utc>,
    },
    CompletionCue {
        cue: Cue,
        ring_opacity: f64,
        at: DateTime<Utc>,
    },
    /// Completion sequence ran out and the phase switched. Front ends show
    /// their "session complete" prompt on this.
    PhaseCompleted {
        completed: Phase,
        next: Phase,
        remaining_secs: u64,
        record: Option<FocusRecord>,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: TimerState,
        phase: Phase,
        remaining_secs: u64,
        total_secs: u64,
        progress: f64,
        ring_opacity: f64,
        tag: Option<String>,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Stable name of the variant, as used in the serialized `type` field.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::TimerStarted { .. } => "TimerStarted",
            Event::TimerResumed { .. } => "TimerResumed",
            Event::TimerPaused { .. } => "TimerPaused",
            Event::TimerReset { .. } => "TimerReset",
            Event::TimerSkipped { .. } => "TimerSkipped",
            Event::TimeSet { .. } => "TimeSet",
            Event::Tick { .. } => "Tick",
            Event::TimerFinished { .. } => "TimerFinished",
            Event::CompletionCue { .. } => "CompletionCue",
            Event::PhaseCompleted { .. } => "PhaseCompleted",
            Event::StateSnapshot { .. } => "StateSnapshot",
        }
    }
}
