//! Integration tests for the timer engine.
//!
//! The engine is wired with recording capabilities and a fixed wall clock,
//! then driven through full focus/break cycles on its virtual timeline.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime};
use proptest::prelude::*;

use focusdial_core::feedback::{Feedback, Haptics, Notifier, SoundPlayer, WallClock};
use focusdial_core::stats::{Rgba, Statistics};
use focusdial_core::storage::{MemoryStore, TimerConfig};
use focusdial_core::timer::{Cue, Phase, TimerEngine, TimerSession, TimerState, MAX_SECS};
use focusdial_core::{Event, Tag};

#[derive(Clone, Default)]
struct Recorder(Rc<RefCell<Vec<String>>>);

impl Recorder {
    fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.0.borrow_mut())
    }

    fn push(&self, entry: impl Into<String>) {
        self.0.borrow_mut().push(entry.into());
    }
}

impl Haptics for Recorder {
    fn light_impact(&self) {
        self.push("light");
    }
    fn medium_impact(&self) {
        self.push("medium");
    }
    fn heavy_impact(&self) {
        self.push("heavy");
    }
    fn success_notification(&self) {
        self.push("success");
    }
}

impl SoundPlayer for Recorder {
    fn play_chime(&self) {
        self.push("chime");
    }
}

impl Notifier for Recorder {
    fn send_notification(&self, title: &str, _body: &str) {
        self.push(format!("notify:{title}"));
    }
}

struct FixedClock(NaiveDateTime);

impl WallClock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
}

fn setup() -> (TimerEngine, Recorder) {
    let recorder = Recorder::default();
    let clock = FixedClock(today().and_hms_opt(9, 30, 0).unwrap());
    let feedback = Feedback::new(recorder.clone(), recorder.clone(), recorder.clone(), clock);
    let engine = TimerEngine::new(
        TimerConfig::default(),
        feedback,
        Statistics::new(MemoryStore::new()),
    );
    (engine, recorder)
}

/// Idle focus session of `secs` seconds, bypassing the one-minute floor.
fn short_focus(engine: &mut TimerEngine, secs: u64) {
    engine.restore(TimerSession::idle(Phase::Focus, secs));
}

fn cues(events: &[Event]) -> Vec<Cue> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::CompletionCue { cue, .. } => Some(*cue),
            _ => None,
        })
        .collect()
}

#[test]
fn five_ticks_from_five_seconds_finish() {
    let (mut engine, _) = setup();
    short_focus(&mut engine, 5);
    engine.start();

    let events = engine.advance_by(Duration::from_secs(5));
    let ticks: Vec<u64> = events
        .iter()
        .filter_map(|e| match e {
            Event::Tick { remaining_secs, .. } => Some(*remaining_secs),
            _ => None,
        })
        .collect();
    assert_eq!(ticks, vec![4, 3, 2, 1, 0]);
    assert_eq!(engine.state(), TimerState::Finished);
    assert!(!engine.is_ticking());

    let later = engine.advance_by(Duration::from_millis(50));
    assert!(!later.iter().any(|e| matches!(e, Event::Tick { .. })));
}

#[test]
fn natural_completion_plays_sequence_then_switches_phase() {
    let (mut engine, recorder) = setup();
    short_focus(&mut engine, 2);
    engine.start();
    engine.advance_by(Duration::from_secs(2));
    recorder.take();

    // Finished at 2 s, sequence starts 100 ms later and lasts 1.4 s.
    let events = engine.advance_to(Duration::from_millis(3499));
    assert_eq!(engine.state(), TimerState::Finished);
    assert_eq!(
        cues(&events),
        vec![Cue::FadeOut, Cue::FadeIn, Cue::Pulse, Cue::FadeOut, Cue::FadeIn, Cue::Pulse]
    );

    let events = engine.advance_to(Duration::from_millis(3500));
    assert_eq!(cues(&events), vec![Cue::Complete]);
    match events.last() {
        Some(Event::PhaseCompleted {
            completed,
            next,
            remaining_secs,
            record,
            ..
        }) => {
            assert_eq!(*completed, Phase::Focus);
            assert_eq!(*next, Phase::Break);
            assert_eq!(*remaining_secs, 5 * 60);
            assert!(record.is_some());
        }
        other => panic!("Expected PhaseCompleted, got {other:?}"),
    }
    assert_eq!(engine.state(), TimerState::Idle);
    assert_eq!(engine.phase(), Phase::Break);
    assert_eq!(engine.ring_opacity(), 1.0);

    assert_eq!(
        recorder.take(),
        vec![
            "heavy",
            "heavy",
            "chime",
            "success",
            "notify:Focus session complete!",
        ]
    );
}

#[test]
fn break_completion_records_nothing() {
    let (mut engine, recorder) = setup();
    engine.restore(TimerSession::idle(Phase::Break, 1));
    engine.start();
    engine.advance_by(Duration::from_secs(1));
    let events = engine.settle();

    assert!(matches!(
        events.last(),
        Some(Event::PhaseCompleted { completed: Phase::Break, record: None, .. })
    ));
    assert_eq!(engine.phase(), Phase::Focus);
    assert_eq!(engine.remaining_secs(), 25 * 60);
    assert_eq!(engine.statistics().daily_count(today()), 0);
    assert!(recorder
        .take()
        .contains(&"notify:Break time complete".to_string()));
}

#[test]
fn tagged_focus_completion_updates_statistics() {
    let (mut engine, _) = setup();
    let blue = Rgba::rgb(0, 0, 255);
    engine.select_tag(Some(Tag::new("Work", blue)));
    short_focus(&mut engine, 1);
    engine.start();
    engine.advance_by(Duration::from_secs(1));
    engine.settle();

    let stats = engine.statistics();
    assert_eq!(stats.daily_count(today()), 1);
    assert_eq!(stats.hourly_counts(today())[9], 1);
    assert_eq!(stats.hourly_colors(today())[9], blue);
    let categories = stats.category_counts(today());
    assert_eq!(categories.len(), 1);
    assert_eq!(categories.get("Work"), Some(&1));
}

#[test]
fn untagged_completion_uses_default_color() {
    let (mut engine, _) = setup();
    engine.skip();

    let stats = engine.statistics();
    assert_eq!(stats.hourly_colors(today())[9], Rgba::DEFAULT_FOCUS);
    assert!(stats.category_counts(today()).is_empty());
}

#[test]
fn skip_from_running_focus_bypasses_sequence() {
    let (mut engine, recorder) = setup();
    engine.start();
    engine.advance_by(Duration::from_secs(10));
    recorder.take();

    match engine.skip() {
        Some(Event::TimerSkipped { from, to, record, .. }) => {
            assert_eq!(from, Phase::Focus);
            assert_eq!(to, Phase::Break);
            assert_eq!(record.map(|r| r.completed_today), Some(1));
        }
        other => panic!("Expected TimerSkipped, got {other:?}"),
    }
    assert_eq!(engine.state(), TimerState::Idle);
    assert_eq!(engine.phase(), Phase::Break);
    assert_eq!(engine.remaining_secs(), 5 * 60);

    let events = engine.advance_by(Duration::from_secs(5));
    assert!(events.is_empty());
    assert_eq!(engine.statistics().daily_count(today()), 1);
    assert_eq!(recorder.take(), vec!["chime"]);
}

#[test]
fn reset_in_break_restores_break_length() {
    let (mut engine, _) = setup();
    engine.skip();
    engine.start();
    engine.advance_by(Duration::from_secs(42));
    assert!(engine.reset().is_some());

    assert_eq!(engine.state(), TimerState::Idle);
    assert_eq!(engine.phase(), Phase::Break);
    assert_eq!(engine.remaining_secs(), 5 * 60);
    assert_eq!(engine.total_secs(), 5 * 60);
}

#[test]
fn commands_are_ignored_while_finished() {
    let (mut engine, _) = setup();
    short_focus(&mut engine, 1);
    engine.start();
    engine.advance_by(Duration::from_secs(1));
    let before = engine.session();

    assert!(engine.start().is_none());
    assert!(engine.pause().is_none());
    assert!(engine.reset().is_none());
    assert!(engine.skip().is_none());
    assert!(engine.set_time_remaining(600).is_none());
    assert!(engine.apply_dial_angle(180.0).is_none());
    assert_eq!(engine.session(), before);
    assert_eq!(engine.statistics().daily_count(today()), 0);

    engine.settle();
    assert_eq!(engine.statistics().daily_count(today()), 1);
}

#[test]
fn feedback_toggles_silence_capabilities() {
    let (mut engine, recorder) = setup();
    let mut settings = engine.feedback_settings();
    settings.sound_enabled = false;
    settings.haptics_enabled = false;
    settings.notifications_enabled = false;
    engine.set_feedback_settings(settings);

    short_focus(&mut engine, 1);
    engine.start();
    engine.advance_by(Duration::from_secs(1));
    engine.settle();
    assert!(recorder.take().is_empty());
    assert_eq!(engine.statistics().daily_count(today()), 1);
}

#[test]
fn dial_changes_click_once_per_minute() {
    let (mut engine, recorder) = setup();
    engine.apply_dial_angle(60.0);
    engine.apply_dial_angle(61.0);
    engine.apply_dial_angle(66.0);
    assert_eq!(engine.remaining_secs(), 11 * 60);
    assert_eq!(recorder.take(), vec!["medium", "medium"]);
}

#[derive(Debug, Clone)]
enum Op {
    Start,
    Pause,
    Reset,
    Skip,
    SetTime(u64),
    Dial(f64),
    FocusMinutes(f64),
    Advance(u64),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Start),
        Just(Op::Pause),
        Just(Op::Reset),
        Just(Op::Skip),
        (0u64..7200).prop_map(Op::SetTime),
        (-30.0f64..400.0).prop_map(Op::Dial),
        (-5.0f64..90.0).prop_map(Op::FocusMinutes),
        (0u64..120_000).prop_map(Op::Advance),
    ]
}

proptest! {
    #[test]
    fn remaining_never_exceeds_total(ops in prop::collection::vec(op(), 1..60)) {
        let (mut engine, _) = setup();
        for op in ops {
            match op {
                Op::Start => { engine.start(); }
                Op::Pause => { engine.pause(); }
                Op::Reset => { engine.reset(); }
                Op::Skip => { engine.skip(); }
                Op::SetTime(secs) => { engine.set_time_remaining(secs); }
                Op::Dial(angle) => { engine.apply_dial_angle(angle); }
                Op::FocusMinutes(m) => { engine.set_focus_minutes(m); }
                Op::Advance(ms) => { engine.advance_by(Duration::from_millis(ms)); }
            }
            prop_assert!(engine.remaining_secs() <= engine.total_secs());
            prop_assert!(engine.remaining_secs() <= MAX_SECS);
            prop_assert_eq!(engine.is_ticking(), engine.state() == TimerState::Running);
            let progress = engine.progress();
            prop_assert!((0.0..=1.0).contains(&progress));
        }
    }
}
