//! Capabilities the engine drives but does not implement.
//!
//! Front ends hand concrete implementations to the engine at construction;
//! tests hand in recorders. Every call is fire-and-forget.

use chrono::NaiveDateTime;

use crate::storage::FeedbackConfig;
use crate::timer::Phase;

pub trait Haptics {
    fn light_impact(&self);
    fn medium_impact(&self);
    fn heavy_impact(&self);
    fn success_notification(&self);
}

pub trait SoundPlayer {
    fn play_chime(&self);
}

pub trait Notifier {
    fn send_notification(&self, title: &str, body: &str);
}

/// Source of local wall-clock time for date keys and hour slots.
pub trait WallClock {
    fn now(&self) -> NaiveDateTime;
}

/// Local time from the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl WallClock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}

/// Capability that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl Haptics for Silent {
    fn light_impact(&self) {}
    fn medium_impact(&self) {}
    fn heavy_impact(&self) {}
    fn success_notification(&self) {}
}

impl SoundPlayer for Silent {
    fn play_chime(&self) {}
}

impl Notifier for Silent {
    fn send_notification(&self, _title: &str, _body: &str) {}
}

/// Title and body sent when a period runs out.
pub fn completion_message(phase: Phase) -> (&'static str, &'static str) {
    match phase {
        Phase::Focus => ("Focus session complete!", "Time to take a break."),
        Phase::Break => ("Break time complete", "Time to focus again."),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HapticKind {
    Light,
    Medium,
    Heavy,
    Success,
}

/// The injected capabilities plus the user's toggles for them.
pub struct Feedback {
    haptics: Box<dyn Haptics>,
    sound: Box<dyn SoundPlayer>,
    notifier: Box<dyn Notifier>,
    clock: Box<dyn WallClock>,
    settings: FeedbackConfig,
}

impl Feedback {
    pub fn new(
        haptics: impl Haptics + 'static,
        sound: impl SoundPlayer + 'static,
        notifier: impl Notifier + 'static,
        clock: impl WallClock + 'static,
    ) -> Self {
        Self {
            haptics: Box::new(haptics),
            sound: Box::new(sound),
            notifier: Box::new(notifier),
            clock: Box::new(clock),
            settings: FeedbackConfig::default(),
        }
    }

    /// No devices, system clock.
    pub fn silent() -> Self {
        Self::new(Silent, Silent, Silent, SystemClock)
    }

    pub fn with_settings(mut self, settings: FeedbackConfig) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> FeedbackConfig {
        self.settings
    }

    pub fn set_settings(&mut self, settings: FeedbackConfig) {
        self.settings = settings;
    }

    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    pub fn haptic(&self, kind: HapticKind) {
        if !self.settings.haptics_enabled {
            return;
        }
        match kind {
            HapticKind::Light => self.haptics.light_impact(),
            HapticKind::Medium => self.haptics.medium_impact(),
            HapticKind::Heavy => self.haptics.heavy_impact(),
            HapticKind::Success => self.haptics.success_notification(),
        }
    }

    pub fn chime(&self) {
        if self.settings.sound_enabled {
            self.sound.play_chime();
        }
    }

    pub fn notify_completed(&self, phase: Phase) {
        if self.settings.notifications_enabled {
            let (title, body) = completion_message(phase);
            self.notifier.send_notification(title, body);
        }
    }
}
