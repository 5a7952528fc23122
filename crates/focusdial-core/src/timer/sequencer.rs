//! The blink sequence played when a countdown reaches zero.
//!
//! Two fade-out/fade-in pulses of the progress ring, a heavy haptic each
//! time the ring is fully restored, then the completion callback. Timings
//! are fixed. Steps run strictly one after another: the engine schedules
//! step `n + 1` only from inside step `n`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Length of one fade leg.
pub const FADE_LEG: Duration = Duration::from_millis(300);
/// Pause between the engine entering Finished and the first fade.
pub const START_DELAY: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cue {
    /// Animate ring opacity to 0 over [`FADE_LEG`].
    FadeOut,
    /// Animate ring opacity to 1 over [`FADE_LEG`].
    FadeIn,
    /// Heavy haptic pulse.
    Pulse,
    /// Run the phase switch.
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceStep {
    /// Offset from the start of the sequence.
    pub at: Duration,
    pub cue: Cue,
}

const fn step(ms: u64, cue: Cue) -> SequenceStep {
    SequenceStep {
        at: Duration::from_millis(ms),
        cue,
    }
}

pub const SEQUENCE: [SequenceStep; 7] = [
    step(0, Cue::FadeOut),
    step(300, Cue::FadeIn),
    step(600, Cue::Pulse),
    step(600, Cue::FadeOut),
    step(900, Cue::FadeIn),
    step(1200, Cue::Pulse),
    step(1400, Cue::Complete),
];

/// Progress through [`SEQUENCE`].
#[derive(Debug, Clone)]
pub struct CompletionSequencer {
    cursor: Option<usize>,
    opacity: f64,
}

impl Default for CompletionSequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl CompletionSequencer {
    pub fn new() -> Self {
        Self {
            cursor: None,
            opacity: 1.0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.cursor.is_some()
    }

    /// Opacity the ring is animating toward.
    pub fn ring_opacity(&self) -> f64 {
        self.opacity
    }

    /// Start a run. Returns the delay until the first step, or `None` if a
    /// run is already in flight.
    pub fn begin(&mut self) -> Option<Duration> {
        if self.is_active() {
            return None;
        }
        self.cursor = Some(0);
        Some(SEQUENCE[0].at)
    }

    /// Execute the current step. Returns its cue and the delay until the
    /// next step, `None` after the last one.
    pub fn step(&mut self) -> Option<(Cue, Option<Duration>)> {
        let index = self.cursor?;
        let current = SEQUENCE.get(index)?;
        match current.cue {
            Cue::FadeOut => self.opacity = 0.0,
            Cue::FadeIn => self.opacity = 1.0,
            Cue::Pulse => {}
            Cue::Complete => {
                self.cursor = None;
                self.opacity = 1.0;
                return Some((Cue::Complete, None));
            }
        }
        let next = SEQUENCE.get(index + 1).map(|n| n.at.saturating_sub(current.at));
        self.cursor = next.map(|_| index + 1);
        Some((current.cue, next))
    }
}
