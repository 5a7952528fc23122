mod config;
pub mod database;
mod kv;

pub use config::{
    Config, FeedbackConfig, StatsConfig, TimerConfig, BREAK_MINUTES_RANGE, FOCUS_MINUTES_RANGE,
};
pub use database::Database;
pub use kv::{KeyValueStore, MemoryStore};

use std::path::PathBuf;

use crate::error::CoreError;

/// Returns the data directory, creating it if needed.
///
/// `FOCUSDIAL_DATA_DIR` wins when set; otherwise `~/.config/focusdial`, or
/// `~/.config/focusdial-dev` when `FOCUSDIAL_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, CoreError> {
    let dir = match std::env::var_os("FOCUSDIAL_DATA_DIR") {
        Some(explicit) => PathBuf::from(explicit),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("FOCUSDIAL_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("focusdial-dev")
            } else {
                base_dir.join("focusdial")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
