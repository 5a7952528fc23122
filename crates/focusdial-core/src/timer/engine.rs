//! Timer engine implementation.
//!
//! The engine is a single-threaded state machine. It owns a virtual
//! timeline ([`Scheduler`]) on which it queues its own callbacks: the
//! one-second tick while running and the steps of the completion sequence.
//! Whoever drives it moves the timeline with [`TimerEngine::advance_by`].
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused
//! Running -> Finished -> (completion sequence) -> Idle, phase switched
//! any but Finished -> reset/skip -> Idle
//! ```
//!
//! While Finished every user command is ignored until the completion
//! sequence has switched the phase.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(TimerConfig::default(), Feedback::silent(), stats);
//! engine.start();
//! // From the UI loop:
//! for event in engine.advance_by(elapsed) { /* render */ }
//! ```

use std::time::Duration;

use chrono::{NaiveDateTime, TimeDelta, Utc};
use tracing::{debug, info};

use super::clock::{Scheduler, TaskHandle, Ticker};
use super::sequencer::{CompletionSequencer, Cue, START_DELAY};
use super::session::{minutes_to_secs, Phase, TimerSession, TimerState, MAX_SECS, MIN_SECS};
use crate::dial::angle::{angle_to_time, time_to_angle};
use crate::events::Event;
use crate::feedback::{Feedback, HapticKind};
use crate::stats::{FocusRecord, Statistics};
use crate::storage::{Config, FeedbackConfig, KeyValueStore, TimerConfig};
use crate::tag::Tag;

pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Task {
    Tick,
    BeginCompletion,
    CompletionStep,
}

type Observer = Box<dyn FnMut(&Event)>;

/// Core timer engine.
pub struct TimerEngine {
    session: TimerSession,
    durations: TimerConfig,
    feedback: Feedback,
    stats: Statistics,
    selected_tag: Option<Tag>,
    scheduler: Scheduler<Task>,
    ticker: Ticker,
    sequencer: CompletionSequencer,
    /// Wall time pinned to a timeline position, for replaying a saved run.
    wall_anchor: Option<(NaiveDateTime, Duration)>,
    observers: Vec<Observer>,
}

impl TimerEngine {
    /// Create an engine idle at the start of a focus period.
    pub fn new(durations: TimerConfig, feedback: Feedback, stats: Statistics) -> Self {
        let session = TimerSession::idle(Phase::Focus, phase_length(&durations, Phase::Focus));
        Self {
            session,
            durations,
            feedback,
            stats,
            selected_tag: None,
            scheduler: Scheduler::new(),
            ticker: Ticker::every(TICK_INTERVAL),
            sequencer: CompletionSequencer::new(),
            wall_anchor: None,
            observers: Vec::new(),
        }
    }

    /// Wire an engine from the user's configuration.
    pub fn from_config(
        config: &Config,
        feedback: Feedback,
        store: impl KeyValueStore + 'static,
    ) -> Self {
        let stats = Statistics::new(store).with_default_color(config.default_color());
        Self::new(
            config.timer.clone(),
            feedback.with_settings(config.feedback),
            stats,
        )
    }

    /// Replace the session, e.g. with one saved by a previous run.
    ///
    /// Pending callbacks are dropped and the timeline starts over at zero.
    /// A running session resumes ticking and a finished one replays its
    /// completion sequence. Returns `TimerFinished` when the restored
    /// session is (or immediately becomes) Finished, so observers see it
    /// before the completion cues.
    pub fn restore(&mut self, session: TimerSession) -> Option<Event> {
        self.ticker.stop(&mut self.scheduler);
        self.scheduler = Scheduler::new();
        self.sequencer = CompletionSequencer::new();
        self.wall_anchor = None;
        self.session = session.sanitized();
        info!(
            state = ?self.session.state,
            phase = ?self.session.phase,
            remaining = self.session.remaining_secs,
            "timer session restored"
        );
        match self.session.state {
            TimerState::Running if self.session.remaining_secs == 0 => self.enter_finished(),
            TimerState::Running => {
                self.ticker.arm(&mut self.scheduler, Task::Tick);
                return None;
            }
            TimerState::Finished => {
                self.scheduler.schedule_after(START_DELAY, Task::BeginCompletion);
            }
            TimerState::Idle | TimerState::Paused => return None,
        }
        Some(self.emit(Event::TimerFinished {
            phase: self.session.phase,
            at: Utc::now(),
        }))
    }

    /// Pin the current timeline position to wall time `at`.
    ///
    /// Statistics recorded afterwards use `at` plus the timeline elapsed
    /// since, instead of the clock capability. Used when replaying a run
    /// saved earlier, so a completion lands on the day and hour it actually
    /// happened. Cleared by [`restore`](Self::restore) and
    /// [`release_wall_clock`](Self::release_wall_clock).
    pub fn anchor_wall_clock(&mut self, at: NaiveDateTime) {
        self.wall_anchor = Some((at, self.scheduler.now()));
    }

    /// Go back to the clock capability for wall time.
    pub fn release_wall_clock(&mut self) {
        self.wall_anchor = None;
    }

    /// Register a callback that sees every event the engine emits.
    pub fn subscribe(&mut self, observer: impl FnMut(&Event) + 'static) {
        self.observers.push(Box::new(observer));
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn session(&self) -> TimerSession {
        self.session
    }

    pub fn state(&self) -> TimerState {
        self.session.state
    }

    pub fn phase(&self) -> Phase {
        self.session.phase
    }

    pub fn remaining_secs(&self) -> u64 {
        self.session.remaining_secs
    }

    pub fn total_secs(&self) -> u64 {
        self.session.total_secs
    }

    pub fn durations(&self) -> &TimerConfig {
        &self.durations
    }

    pub fn selected_tag(&self) -> Option<&Tag> {
        self.selected_tag.as_ref()
    }

    pub fn statistics(&self) -> &Statistics {
        &self.stats
    }

    pub fn statistics_mut(&mut self) -> &mut Statistics {
        &mut self.stats
    }

    pub fn feedback_settings(&self) -> FeedbackConfig {
        self.feedback.settings()
    }

    /// Position on the engine's timeline.
    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    /// When the next queued callback falls due.
    pub fn next_due(&self) -> Option<Duration> {
        self.scheduler.next_due()
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.is_active()
    }

    /// True from the moment the countdown hits zero until the phase switch.
    pub fn is_completing(&self) -> bool {
        self.session.state == TimerState::Finished
    }

    pub fn ring_opacity(&self) -> f64 {
        self.sequencer.ring_opacity()
    }

    /// Length of `phase` as currently configured.
    pub fn phase_secs(&self, phase: Phase) -> u64 {
        phase_length(&self.durations, phase)
    }

    /// Local wall time of the current timeline position.
    pub fn wall_now(&self) -> NaiveDateTime {
        match self.wall_anchor {
            Some((wall, at)) => {
                let elapsed = TimeDelta::from_std(self.scheduler.now().saturating_sub(at))
                    .unwrap_or_else(|_| TimeDelta::zero());
                wall.checked_add_signed(elapsed).unwrap_or(wall)
            }
            None => self.feedback.now(),
        }
    }

    /// 0.0 ..= 1.0 for the progress ring.
    ///
    /// Elapsed fraction while counting down; otherwise the dial position of
    /// the remaining time.
    pub fn progress(&self) -> f64 {
        match self.session.state {
            TimerState::Running | TimerState::Finished => self.session.elapsed_fraction(),
            TimerState::Idle | TimerState::Paused => {
                time_to_angle(self.session.remaining_secs) / 360.0
            }
        }
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.session.state,
            phase: self.session.phase,
            remaining_secs: self.session.remaining_secs,
            total_secs: self.session.total_secs,
            progress: self.progress(),
            ring_opacity: self.ring_opacity(),
            tag: self.selected_tag.as_ref().map(|t| t.name.clone()),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        match self.session.state {
            TimerState::Idle => {
                if self.session.remaining_secs == 0 {
                    return None;
                }
                self.session.total_secs = self.session.remaining_secs;
                self.session.state = TimerState::Running;
                self.ticker.arm(&mut self.scheduler, Task::Tick);
                self.feedback.haptic(HapticKind::Light);
                info!(phase = ?self.session.phase, secs = self.session.total_secs, "timer started");
                Some(self.emit(Event::TimerStarted {
                    phase: self.session.phase,
                    remaining_secs: self.session.remaining_secs,
                    total_secs: self.session.total_secs,
                    at: Utc::now(),
                }))
            }
            TimerState::Paused => {
                self.session.state = TimerState::Running;
                self.ticker.arm(&mut self.scheduler, Task::Tick);
                self.feedback.haptic(HapticKind::Light);
                info!(remaining = self.session.remaining_secs, "timer resumed");
                Some(self.emit(Event::TimerResumed {
                    phase: self.session.phase,
                    remaining_secs: self.session.remaining_secs,
                    at: Utc::now(),
                }))
            }
            TimerState::Running | TimerState::Finished => None,
        }
    }

    pub fn pause(&mut self) -> Option<Event> {
        if self.session.state != TimerState::Running {
            return None;
        }
        self.ticker.stop(&mut self.scheduler);
        self.session.state = TimerState::Paused;
        self.feedback.haptic(HapticKind::Light);
        info!(remaining = self.session.remaining_secs, "timer paused");
        Some(self.emit(Event::TimerPaused {
            phase: self.session.phase,
            remaining_secs: self.session.remaining_secs,
            at: Utc::now(),
        }))
    }

    /// Back to the full configured length of the current phase.
    pub fn reset(&mut self) -> Option<Event> {
        if self.is_completing() {
            return None;
        }
        self.ticker.stop(&mut self.scheduler);
        let phase = self.session.phase;
        self.session = TimerSession::idle(phase, self.phase_secs(phase));
        self.feedback.haptic(HapticKind::Heavy);
        info!(?phase, "timer reset");
        Some(self.emit(Event::TimerReset {
            phase,
            remaining_secs: self.session.remaining_secs,
            at: Utc::now(),
        }))
    }

    /// Switch phase immediately, counting a focus period as completed.
    pub fn skip(&mut self) -> Option<Event> {
        if self.is_completing() {
            return None;
        }
        self.ticker.stop(&mut self.scheduler);
        let from = self.session.phase;
        let record = self.switch_phase(false);
        info!(?from, to = ?self.session.phase, "timer skipped");
        Some(self.emit(Event::TimerSkipped {
            from,
            to: self.session.phase,
            remaining_secs: self.session.remaining_secs,
            record,
            at: Utc::now(),
        }))
    }

    /// Set the countdown length while Idle or Paused, clamped to 1..=60
    /// minutes. Returns `None` when nothing changed.
    pub fn set_time_remaining(&mut self, secs: u64) -> Option<Event> {
        if !matches!(self.session.state, TimerState::Idle | TimerState::Paused) {
            return None;
        }
        let secs = secs.clamp(MIN_SECS, MAX_SECS);
        if self.session.remaining_secs == secs && self.session.total_secs == secs {
            return None;
        }
        self.session.remaining_secs = secs;
        self.session.total_secs = secs;
        debug!(secs, "time set");
        Some(self.emit(Event::TimeSet {
            phase: self.session.phase,
            remaining_secs: secs,
            at: Utc::now(),
        }))
    }

    /// Apply an angle produced by the dial. A haptic click marks each
    /// change of the quantized minute.
    pub fn apply_dial_angle(&mut self, angle: f64) -> Option<Event> {
        let event = self.set_time_remaining(angle_to_time(angle))?;
        self.feedback.haptic(HapticKind::Medium);
        Some(event)
    }

    pub fn set_focus_minutes(&mut self, minutes: f64) -> Option<Event> {
        self.set_phase_minutes(Phase::Focus, minutes)
    }

    pub fn set_break_minutes(&mut self, minutes: f64) -> Option<Event> {
        self.set_phase_minutes(Phase::Break, minutes)
    }

    pub fn select_tag(&mut self, tag: Option<Tag>) {
        debug!(tag = ?tag.as_ref().map(|t| &t.name), "tag selected");
        self.selected_tag = tag;
    }

    pub fn set_feedback_settings(&mut self, settings: FeedbackConfig) {
        self.feedback.set_settings(settings);
    }

    // ── Driving ──────────────────────────────────────────────────────

    /// Move the timeline forward by `dt`, running every callback that falls
    /// due on the way, in order.
    pub fn advance_by(&mut self, dt: Duration) -> Vec<Event> {
        let target = self.scheduler.now().saturating_add(dt);
        self.advance_to(target)
    }

    pub fn advance_to(&mut self, t: Duration) -> Vec<Event> {
        let mut events = Vec::new();
        while let Some((handle, task)) = self.scheduler.pop_due(t) {
            self.run_task(handle, task, &mut events);
        }
        self.scheduler.advance_to(t);
        events
    }

    /// Run a pending completion sequence to its end.
    pub fn settle(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        while self.is_completing() {
            let Some(due) = self.scheduler.next_due() else {
                break;
            };
            events.extend(self.advance_to(due));
        }
        events
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn run_task(&mut self, handle: TaskHandle, task: Task, events: &mut Vec<Event>) {
        match task {
            Task::Tick => self.on_tick(handle, events),
            Task::BeginCompletion => {
                if let Some(delay) = self.sequencer.begin() {
                    self.scheduler.schedule_after(delay, Task::CompletionStep);
                }
            }
            Task::CompletionStep => self.on_completion_step(events),
        }
    }

    fn on_tick(&mut self, handle: TaskHandle, events: &mut Vec<Event>) {
        if !self.ticker.fired(handle) || self.session.state != TimerState::Running {
            return;
        }
        if self.session.remaining_secs > 0 {
            self.session.remaining_secs -= 1;
            debug!(remaining = self.session.remaining_secs, "tick");
            events.push(self.emit(Event::Tick {
                remaining_secs: self.session.remaining_secs,
                at: Utc::now(),
            }));
        }
        if self.session.remaining_secs == 0 {
            self.enter_finished();
            events.push(self.emit(Event::TimerFinished {
                phase: self.session.phase,
                at: Utc::now(),
            }));
        } else {
            self.ticker.arm(&mut self.scheduler, Task::Tick);
        }
    }

    fn enter_finished(&mut self) {
        self.ticker.stop(&mut self.scheduler);
        self.session.state = TimerState::Finished;
        self.scheduler.schedule_after(START_DELAY, Task::BeginCompletion);
        info!(phase = ?self.session.phase, "countdown finished");
    }

    fn on_completion_step(&mut self, events: &mut Vec<Event>) {
        let Some((cue, next)) = self.sequencer.step() else {
            return;
        };
        if cue == Cue::Pulse {
            self.feedback.haptic(HapticKind::Heavy);
        }
        debug!(?cue, opacity = self.sequencer.ring_opacity(), "completion cue");
        events.push(self.emit(Event::CompletionCue {
            cue,
            ring_opacity: self.sequencer.ring_opacity(),
            at: Utc::now(),
        }));
        if let Some(delay) = next {
            self.scheduler.schedule_after(delay, Task::CompletionStep);
        }
        if cue == Cue::Complete {
            let completed = self.session.phase;
            let record = self.switch_phase(true);
            info!(?completed, next = ?self.session.phase, "phase completed");
            events.push(self.emit(Event::PhaseCompleted {
                completed,
                next: self.session.phase,
                remaining_secs: self.session.remaining_secs,
                record,
                at: Utc::now(),
            }));
        }
    }

    /// Shared by skip and natural completion: statistics for a focus
    /// period, chime, then idle at the start of the other phase.
    fn switch_phase(&mut self, natural: bool) -> Option<FocusRecord> {
        let completed = self.session.phase;
        let record = match completed {
            Phase::Focus => {
                let at = self.wall_now();
                Some(self.stats.record_focus_completion(at, self.selected_tag.as_ref()))
            }
            Phase::Break => None,
        };
        self.feedback.chime();
        if natural {
            self.feedback.haptic(HapticKind::Success);
            self.feedback.notify_completed(completed);
        }
        let next = completed.other();
        self.session = TimerSession::idle(next, self.phase_secs(next));
        record
    }

    fn set_phase_minutes(&mut self, phase: Phase, minutes: f64) -> Option<Event> {
        if !minutes.is_finite() || minutes <= 0.0 {
            return None;
        }
        match phase {
            Phase::Focus => self.durations.focus_minutes = minutes,
            Phase::Break => self.durations.break_minutes = minutes,
        }
        if self.session.state != TimerState::Idle || self.session.phase != phase {
            return None;
        }
        let secs = self.phase_secs(phase);
        self.session = TimerSession::idle(phase, secs);
        Some(self.emit(Event::TimeSet {
            phase,
            remaining_secs: secs,
            at: Utc::now(),
        }))
    }

    fn emit(&mut self, event: Event) -> Event {
        debug_assert!(self.session.remaining_secs <= self.session.total_secs);
        for observer in &mut self.observers {
            observer(&event);
        }
        event
    }
}

/// Configured length of `phase`, held to the dial's one-to-sixty minute range.
fn phase_length(durations: &TimerConfig, phase: Phase) -> u64 {
    let minutes = match phase {
        Phase::Focus => durations.focus_minutes,
        Phase::Break => durations.break_minutes,
    };
    minutes_to_secs(minutes).clamp(MIN_SECS, MAX_SECS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn engine() -> TimerEngine {
        TimerEngine::new(
            TimerConfig::default(),
            Feedback::silent(),
            Statistics::new(MemoryStore::new()),
        )
    }

    #[test]
    fn new_engine_is_idle_focus_with_configured_length() {
        let engine = engine();
        assert_eq!(engine.state(), TimerState::Idle);
        assert_eq!(engine.phase(), Phase::Focus);
        assert_eq!(engine.remaining_secs(), 25 * 60);
        assert_eq!(engine.total_secs(), 25 * 60);
    }

    #[test]
    fn start_pause_resume() {
        let mut engine = engine();
        assert!(matches!(engine.start(), Some(Event::TimerStarted { .. })));
        assert_eq!(engine.state(), TimerState::Running);
        assert!(engine.start().is_none());

        assert!(engine.pause().is_some());
        assert_eq!(engine.state(), TimerState::Paused);
        assert!(!engine.is_ticking());
        assert!(engine.pause().is_none());

        assert!(matches!(engine.start(), Some(Event::TimerResumed { .. })));
        assert_eq!(engine.state(), TimerState::Running);
    }

    #[test]
    fn ticks_count_down_once_per_second() {
        let mut engine = engine();
        engine.start();
        let events = engine.advance_by(Duration::from_millis(2500));
        assert_eq!(events.len(), 2);
        assert_eq!(engine.remaining_secs(), 25 * 60 - 2);
    }

    #[test]
    fn pause_stops_future_ticks() {
        let mut engine = engine();
        engine.start();
        engine.advance_by(Duration::from_secs(3));
        engine.pause();
        engine.advance_by(Duration::from_secs(10));
        assert_eq!(engine.remaining_secs(), 25 * 60 - 3);
        assert_eq!(engine.total_secs(), 25 * 60);
    }

    #[test]
    fn resume_keeps_total() {
        let mut engine = engine();
        engine.start();
        engine.advance_by(Duration::from_secs(5));
        engine.pause();
        engine.start();
        assert_eq!(engine.total_secs(), 25 * 60);
        assert_eq!(engine.remaining_secs(), 25 * 60 - 5);
    }

    #[test]
    fn set_time_only_when_not_running() {
        let mut engine = engine();
        assert!(engine.set_time_remaining(10 * 60).is_some());
        assert_eq!(engine.total_secs(), 10 * 60);
        assert!(engine.set_time_remaining(10 * 60).is_none());

        engine.start();
        assert!(engine.set_time_remaining(30 * 60).is_none());
        assert_eq!(engine.remaining_secs(), 10 * 60);
    }

    #[test]
    fn set_time_clamps_to_dial_range() {
        let mut engine = engine();
        engine.set_time_remaining(5);
        assert_eq!(engine.remaining_secs(), 60);
        engine.set_time_remaining(5 * 3600);
        assert_eq!(engine.remaining_secs(), 3600);
    }

    #[test]
    fn dial_angle_sets_quantized_time() {
        let mut engine = engine();
        assert!(engine.apply_dial_angle(91.0).is_some());
        assert_eq!(engine.remaining_secs(), 15 * 60);
        // Same minute, no change.
        assert!(engine.apply_dial_angle(92.0).is_none());
    }

    #[test]
    fn focus_minutes_update_idle_focus_session() {
        let mut engine = engine();
        assert!(engine.set_focus_minutes(40.0).is_some());
        assert_eq!(engine.remaining_secs(), 40 * 60);

        // Break length changes do not touch a focus session.
        assert!(engine.set_break_minutes(10.0).is_none());
        assert_eq!(engine.remaining_secs(), 40 * 60);
        assert_eq!(engine.phase_secs(Phase::Break), 10 * 60);

        assert!(engine.set_focus_minutes(-1.0).is_none());
        assert_eq!(engine.durations().focus_minutes, 40.0);
    }

    #[test]
    fn configured_lengths_stay_on_the_dial() {
        let mut engine = engine();
        assert!(engine.set_focus_minutes(90.0).is_some());
        assert_eq!(engine.remaining_secs(), MAX_SECS);
        assert_eq!(engine.total_secs(), MAX_SECS);
        assert_eq!(engine.durations().focus_minutes, 90.0);

        engine.set_break_minutes(0.25);
        assert_eq!(engine.phase_secs(Phase::Break), MIN_SECS);

        let long = TimerConfig {
            focus_minutes: 240.0,
            ..TimerConfig::default()
        };
        let stats = Statistics::new(MemoryStore::new());
        let engine = TimerEngine::new(long, Feedback::silent(), stats);
        assert_eq!(engine.remaining_secs(), MAX_SECS);
    }

    #[test]
    fn progress_uses_dial_angle_when_idle() {
        let mut engine = engine();
        assert_eq!(engine.progress(), 150.0 / 360.0);
        engine.set_time_remaining(60 * 60);
        assert_eq!(engine.progress(), 1.0);
    }

    #[test]
    fn progress_is_elapsed_fraction_while_running() {
        let mut engine = engine();
        engine.set_time_remaining(60);
        engine.start();
        assert_eq!(engine.progress(), 0.0);
        engine.advance_by(Duration::from_secs(15));
        assert_eq!(engine.progress(), 0.25);
    }

    #[test]
    fn snapshot_reports_state() {
        let mut engine = engine();
        engine.select_tag(Some(Tag::new("Work", crate::stats::Rgba::rgb(0, 0, 255))));
        match engine.snapshot() {
            Event::StateSnapshot {
                state,
                phase,
                remaining_secs,
                tag,
                ring_opacity,
                ..
            } => {
                assert_eq!(state, TimerState::Idle);
                assert_eq!(phase, Phase::Focus);
                assert_eq!(remaining_secs, 25 * 60);
                assert_eq!(tag.as_deref(), Some("Work"));
                assert_eq!(ring_opacity, 1.0);
            }
            _ => panic!("Expected StateSnapshot"),
        }
    }

    #[test]
    fn restore_running_session_resumes_ticking() {
        let mut engine = engine();
        engine.restore(TimerSession {
            state: TimerState::Running,
            phase: Phase::Break,
            remaining_secs: 3,
            total_secs: 300,
        });
        assert!(engine.is_ticking());
        engine.advance_by(Duration::from_secs(3));
        assert_eq!(engine.state(), TimerState::Finished);
        engine.settle();
        assert_eq!(engine.state(), TimerState::Idle);
        assert_eq!(engine.phase(), Phase::Focus);
    }

    #[test]
    fn restore_finished_session_replays_completion() {
        let mut engine = engine();
        engine.restore(TimerSession {
            state: TimerState::Finished,
            phase: Phase::Focus,
            remaining_secs: 0,
            total_secs: 60,
        });
        let events = engine.settle();
        assert!(events
            .iter()
            .any(|e| matches!(e, Event::PhaseCompleted { completed: Phase::Focus, .. })));
        assert_eq!(engine.phase(), Phase::Break);
    }

    #[test]
    fn restore_running_at_zero_reports_finished() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut engine = engine();
        engine.subscribe(move |e| sink.borrow_mut().push(e.kind()));

        let finished = engine.restore(TimerSession {
            state: TimerState::Running,
            phase: Phase::Focus,
            remaining_secs: 0,
            total_secs: 60,
        });
        assert!(matches!(finished, Some(Event::TimerFinished { phase: Phase::Focus, .. })));
        assert_eq!(engine.state(), TimerState::Finished);
        engine.settle();

        let seen = seen.borrow();
        let finished_at = seen.iter().position(|k| *k == "TimerFinished");
        let completed_at = seen.iter().position(|k| *k == "PhaseCompleted");
        assert_eq!(finished_at, Some(0));
        assert!(completed_at > finished_at);
    }

    #[test]
    fn restore_idle_session_reports_nothing() {
        let mut engine = engine();
        assert!(engine.restore(TimerSession::idle(Phase::Break, 300)).is_none());
        assert_eq!(engine.state(), TimerState::Idle);
    }

    #[test]
    fn anchored_completion_records_when_countdown_ended() {
        use chrono::NaiveDate;

        let mut engine = engine();
        engine.restore(TimerSession {
            state: TimerState::Running,
            phase: Phase::Focus,
            remaining_secs: 60,
            total_secs: 60,
        });
        let saved = NaiveDate::from_ymd_opt(2026, 3, 12)
            .and_then(|d| d.and_hms_opt(23, 59, 30))
            .unwrap();
        engine.anchor_wall_clock(saved);
        engine.advance_by(Duration::from_secs(2 * 24 * 3600));
        engine.settle();

        let ended = NaiveDate::from_ymd_opt(2026, 3, 13).unwrap();
        assert_eq!(engine.statistics().daily_count(ended), 1);
        assert_eq!(engine.statistics().hourly_counts(ended)[0], 1);
        assert_eq!(engine.statistics().daily_count(saved.date()), 0);

        engine.release_wall_clock();
        assert!(engine.wall_anchor.is_none());
    }

    #[test]
    fn observers_see_every_event() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut engine = engine();
        engine.subscribe(move |e| sink.borrow_mut().push(e.kind()));

        engine.start();
        engine.advance_by(Duration::from_secs(1));
        engine.pause();
        engine.reset();
        assert_eq!(
            *seen.borrow(),
            vec!["TimerStarted", "Tick", "TimerPaused", "TimerReset"]
        );
    }
}
