//! Feedback capabilities for a terminal session.

use focusdial_core::feedback::{Feedback, Haptics, Notifier, SoundPlayer, SystemClock};
use tracing::debug;

/// No vibration motor here; impacts only show up in the log.
pub struct LoggedHaptics;

impl Haptics for LoggedHaptics {
    fn light_impact(&self) {
        debug!(kind = "light", "haptic");
    }

    fn medium_impact(&self) {
        debug!(kind = "medium", "haptic");
    }

    fn heavy_impact(&self) {
        debug!(kind = "heavy", "haptic");
    }

    fn success_notification(&self) {
        debug!(kind = "success", "haptic");
    }
}

/// Rings the terminal bell.
pub struct Bell;

impl SoundPlayer for Bell {
    fn play_chime(&self) {
        eprint!("\x07");
    }
}

/// Prints notifications on stderr so stdout stays JSON.
pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn send_notification(&self, title: &str, body: &str) {
        eprintln!("{title} {body}");
    }
}

pub fn feedback() -> Feedback {
    Feedback::new(LoggedHaptics, Bell, StderrNotifier, SystemClock)
}
