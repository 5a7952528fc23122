//! Real-time driver for [`TimerEngine`].
//!
//! Maps tokio's clock onto the engine's virtual timeline. Each wake-up
//! advances the engine to the wall time elapsed since the driver started,
//! so a late wake-up catches up instead of drifting.

use std::time::Duration;

use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::debug;

use super::engine::TimerEngine;
use super::session::TimerState;
use crate::events::Event;

/// How often the driver wakes by default. Fine enough for the 300 ms fades.
pub const DEFAULT_RESOLUTION: Duration = Duration::from_millis(50);

/// Drive `engine` in real time until it leaves the Running and Finished
/// states, handing every event to `on_event`. Returns the number of events.
///
/// A paused or idle engine returns immediately.
pub async fn run_until_idle<F>(
    engine: &mut TimerEngine,
    resolution: Duration,
    mut on_event: F,
) -> usize
where
    F: FnMut(&Event),
{
    let resolution = resolution.max(Duration::from_millis(1));
    let mut interval = time::interval(resolution);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let origin = Instant::now();
    let base = engine.now();
    let mut count = 0;

    while is_live(engine.state()) {
        interval.tick().await;
        for event in engine.advance_to(base + origin.elapsed()) {
            on_event(&event);
            count += 1;
        }
    }
    debug!(events = count, state = ?engine.state(), "driver stopped");
    count
}

fn is_live(state: TimerState) -> bool {
    matches!(state, TimerState::Running | TimerState::Finished)
}
