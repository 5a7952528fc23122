mod clock;
mod driver;
mod engine;
mod sequencer;
mod session;

pub use clock::{Scheduler, TaskHandle, Ticker};
pub use driver::{run_until_idle, DEFAULT_RESOLUTION};
pub use engine::{TimerEngine, TICK_INTERVAL};
pub use sequencer::{CompletionSequencer, Cue, SequenceStep, FADE_LEG, SEQUENCE, START_DELAY};
pub use session::{minutes_to_secs, Phase, TimerSession, TimerState, MAX_SECS, MIN_SECS};
