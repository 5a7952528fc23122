//! Timer state carried between invocations.
//!
//! Each command rebuilds the engine from the database: the last saved
//! session, the wall-clock instant it was saved, and the selected tag. A
//! session saved while running is caught up by the wall time that passed
//! since, so `focusdial timer status` an hour later sees a finished period.

use std::error::Error;
use std::time::Duration;

use chrono::{DateTime, Local, TimeDelta, Utc};
use focusdial_core::storage::{Config, Database, KeyValueStore};
use focusdial_core::timer::{TimerEngine, TimerSession, TimerState, TICK_INTERVAL};
use focusdial_core::{Event, Tag};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::terminal;

pub const SESSION_KEY: &str = "timerSession";
pub const TAG_KEY: &str = "selectedTag";

#[derive(Debug, Serialize, Deserialize)]
struct SavedTimer {
    session: TimerSession,
    /// Wall time of the last whole tick.
    saved_at: DateTime<Utc>,
}

/// Engine wired to the user's config and database, caught up to now.
///
/// Also returns the events produced while catching up.
pub fn open_engine() -> Result<(TimerEngine, Vec<Event>), Box<dyn Error>> {
    let config = Config::load_or_default();
    let db = Database::open()?;
    let saved: Option<SavedTimer> = read_json(&db, SESSION_KEY);
    let tag: Option<Tag> = read_json::<Option<Tag>>(&db, TAG_KEY).flatten();

    let mut engine = TimerEngine::from_config(&config, terminal::feedback(), db);
    engine.select_tag(tag);

    let mut caught_up = Vec::new();
    if let Some(saved) = saved {
        caught_up.extend(engine.restore(saved.session));
        // Completions replayed here belong to when the countdown ran out.
        engine.anchor_wall_clock(saved.saved_at.with_timezone(&Local).naive_local());
        if engine.state() == TimerState::Running {
            let elapsed = (Utc::now() - saved.saved_at).to_std().unwrap_or_default();
            debug!(elapsed_ms = elapsed.as_millis() as u64, "catching up running timer");
            caught_up.extend(engine.advance_by(elapsed));
        }
        caught_up.extend(engine.settle());
        engine.release_wall_clock();
    }
    Ok((engine, caught_up))
}

/// Persist the session. A running session is anchored at its last tick so
/// the partial second is not lost.
pub fn save_engine(engine: &mut TimerEngine) -> Result<(), Box<dyn Error>> {
    let since_tick =
        TimeDelta::from_std(since_last_tick(engine)).unwrap_or_else(|_| TimeDelta::zero());
    let saved = SavedTimer {
        session: engine.session(),
        saved_at: Utc::now() - since_tick,
    };
    let json = serde_json::to_string(&saved)?;
    engine.statistics_mut().store_mut().set(SESSION_KEY, &json)?;
    Ok(())
}

pub fn save_tag(engine: &mut TimerEngine) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string(&engine.selected_tag())?;
    engine.statistics_mut().store_mut().set(TAG_KEY, &json)?;
    Ok(())
}

fn since_last_tick(engine: &TimerEngine) -> Duration {
    if !engine.is_ticking() {
        return Duration::ZERO;
    }
    match engine.next_due() {
        Some(due) => TICK_INTERVAL.saturating_sub(due.saturating_sub(engine.now())),
        None => Duration::ZERO,
    }
}

fn read_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = match store.get(key) {
        Ok(raw) => raw?,
        Err(e) => {
            warn!(key, error = %e, "could not read saved state");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key, error = %e, "discarding unreadable saved state");
            None
        }
    }
}
