//! TOML-based application configuration.
//!
//! Stores user preferences:
//! - Focus and break durations (minutes)
//! - Sound, haptics and notification toggles
//! - Color recorded for focus sessions without a tag
//!
//! Configuration is stored at `<data dir>/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

use super::data_dir;
use crate::error::{ConfigError, CoreError, ValidationError};
use crate::stats::Rgba;

pub const FOCUS_MINUTES_RANGE: (f64, f64) = (5.0, 60.0);
pub const BREAK_MINUTES_RANGE: (f64, f64) = (1.0, 30.0);

/// Timer durations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimerConfig {
    #[serde(default = "default_focus_minutes")]
    pub focus_minutes: f64,
    #[serde(default = "default_break_minutes")]
    pub break_minutes: f64,
}

/// Feedback toggles.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeedbackConfig {
    #[serde(default = "default_true")]
    pub sound_enabled: bool,
    #[serde(default = "default_true")]
    pub haptics_enabled: bool,
    #[serde(default = "default_true")]
    pub notifications_enabled: bool,
}

/// Statistics presentation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatsConfig {
    /// Hourly color recorded when no tag is selected.
    #[serde(default = "default_color")]
    pub default_color: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data dir>/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub feedback: FeedbackConfig,
    #[serde(default)]
    pub stats: StatsConfig,
}

fn default_focus_minutes() -> f64 {
    25.0
}
fn default_break_minutes() -> f64 {
    5.0
}
fn default_true() -> bool {
    true
}
fn default_color() -> String {
    "#3b82f6ff".into()
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            focus_minutes: default_focus_minutes(),
            break_minutes: default_break_minutes(),
        }
    }
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            haptics_enabled: true,
            notifications_enabled: true,
        }
    }
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            default_color: default_color(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() || key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as bool")))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| {
                                    invalid(format!("cannot parse '{value}' as number"))
                                })?
                        } else {
                            return Err(invalid(format!("cannot parse '{value}' as number")));
                        }
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        return Err(unknown());
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    pub fn path() -> Result<PathBuf, CoreError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, writing the defaults on first run.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk. Values outside
    /// the allowed ranges are replaced by their defaults.
    pub fn load() -> Result<Self, CoreError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.clone(),
                    message: e.to_string(),
                })?;
                Ok(cfg.repaired())
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), CoreError> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!(error = %e, "falling back to default configuration");
                Self::default()
            }
        }
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Every leaf key with its current value, dot-separated.
    pub fn entries(&self) -> Vec<(String, String)> {
        fn walk(prefix: &str, value: &serde_json::Value, out: &mut Vec<(String, String)>) {
            match value {
                serde_json::Value::Object(map) => {
                    for (k, v) in map {
                        let key = if prefix.is_empty() {
                            k.clone()
                        } else {
                            format!("{prefix}.{k}")
                        };
                        walk(&key, v, out);
                    }
                }
                serde_json::Value::String(s) => out.push((prefix.to_string(), s.clone())),
                other => out.push((prefix.to_string(), other.to_string())),
            }
        }

        let mut out = Vec::new();
        if let Ok(json) = serde_json::to_value(self) {
            walk("", &json, &mut out);
        }
        out.sort();
        out
    }

    /// Update a value in memory by key, validating the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the resulting configuration is invalid.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json)?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Update a value by key and persist.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        self.apply(key, value)?;
        self.save()
    }

    /// Check the ranges the settings screen allows.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_range("timer.focus_minutes", self.timer.focus_minutes, FOCUS_MINUTES_RANGE)?;
        check_range("timer.break_minutes", self.timer.break_minutes, BREAK_MINUTES_RANGE)?;
        self.stats
            .default_color
            .parse::<Rgba>()
            .map_err(|message| ValidationError::InvalidValue {
                field: "stats.default_color".into(),
                message,
            })?;
        Ok(())
    }

    /// Replace every out-of-range or unparsable setting with its default.
    pub fn repaired(mut self) -> Self {
        let defaults = Self::default();
        let focus_minutes = self.timer.focus_minutes;
        if let Err(e) = check_range("timer.focus_minutes", focus_minutes, FOCUS_MINUTES_RANGE) {
            warn!(error = %e, "using default focus length");
            self.timer.focus_minutes = defaults.timer.focus_minutes;
        }
        let break_minutes = self.timer.break_minutes;
        if let Err(e) = check_range("timer.break_minutes", break_minutes, BREAK_MINUTES_RANGE) {
            warn!(error = %e, "using default break length");
            self.timer.break_minutes = defaults.timer.break_minutes;
        }
        if self.stats.default_color.parse::<Rgba>().is_err() {
            warn!(value = %self.stats.default_color, "using default stats color");
            self.stats.default_color = defaults.stats.default_color;
        }
        self
    }

    /// Parsed default color, falling back to the built-in blue.
    pub fn default_color(&self) -> Rgba {
        self.stats
            .default_color
            .parse()
            .unwrap_or(Rgba::DEFAULT_FOCUS)
    }
}

fn check_range(field: &str, value: f64, (min, max): (f64, f64)) -> Result<(), ValidationError> {
    if !(min..=max).contains(&value) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            value,
            min,
            max,
        });
    }
    Ok(())
}
