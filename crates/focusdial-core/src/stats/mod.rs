//! Completion statistics kept per calendar day.
//!
//! Each day has four entries in the key-value store:
//! - `completedCount_<date>`: focus sessions completed that day
//! - `hourlyCompletedCount_<date>`: 24 per-hour counts
//! - `hourlyCompletedColor_<date>`: 24 colors, one per hour slot
//! - `categoryStatistics_<date>`: completions per tag name
//!
//! Reads that fail or do not decode fall back to empty values; writes that
//! fail are logged and dropped. The hourly color slot holds the color of the
//! most recent completion in that hour.

mod color;

pub use color::Rgba;

use std::collections::BTreeMap;

use chrono::{Months, NaiveDate, NaiveDateTime, Timelike};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::storage::KeyValueStore;
use crate::tag::Tag;

pub const HOURS_PER_DAY: usize = 24;

pub const DAILY_COUNT_PREFIX: &str = "completedCount_";
pub const HOURLY_COUNT_PREFIX: &str = "hourlyCompletedCount_";
pub const HOURLY_COLOR_PREFIX: &str = "hourlyCompletedColor_";
pub const CATEGORY_PREFIX: &str = "categoryStatistics_";

/// `<prefix><yyyy-MM-dd>`
pub fn date_key(prefix: &str, date: NaiveDate) -> String {
    format!("{prefix}{}", date.format("%Y-%m-%d"))
}

/// Result of recording one focus completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusRecord {
    pub date: NaiveDate,
    pub hour: u32,
    pub completed_today: u32,
    pub color: Rgba,
    pub category: Option<String>,
}

/// Everything stored for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub completed: u32,
    pub hourly: [u32; HOURS_PER_DAY],
    pub hourly_colors: [Rgba; HOURS_PER_DAY],
    pub categories: BTreeMap<String, u32>,
}

/// Days merged over a date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodSummary {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub total: u32,
    /// Only days with at least one completion.
    pub per_day: BTreeMap<NaiveDate, u32>,
    pub hourly: [u32; HOURS_PER_DAY],
    pub categories: BTreeMap<String, u32>,
}

impl PeriodSummary {
    fn empty(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from,
            to,
            total: 0,
            per_day: BTreeMap::new(),
            hourly: [0; HOURS_PER_DAY],
            categories: BTreeMap::new(),
        }
    }

    fn merge_day(&mut self, day: &DaySummary) {
        self.total = self.total.saturating_add(day.completed);
        if day.completed > 0 {
            self.per_day.insert(day.date, day.completed);
        }
        for (slot, count) in self.hourly.iter_mut().zip(day.hourly) {
            *slot = slot.saturating_add(count);
        }
        for (name, count) in &day.categories {
            let entry = self.categories.entry(name.clone()).or_insert(0);
            *entry = entry.saturating_add(*count);
        }
    }

    /// Hour of day with the most completions; earliest wins ties.
    pub fn busiest_hour(&self) -> Option<usize> {
        let max = *self.hourly.iter().max()?;
        if max == 0 {
            return None;
        }
        self.hourly.iter().position(|&c| c == max)
    }

    pub fn days(&self) -> i64 {
        (self.to - self.from).num_days() + 1
    }

    pub fn average_per_day(&self) -> f64 {
        self.total as f64 / self.days().max(1) as f64
    }
}

/// Statistics over an injected key-value store.
pub struct Statistics {
    store: Box<dyn KeyValueStore>,
    default_color: Rgba,
}

impl Statistics {
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self {
            store: Box::new(store),
            default_color: Rgba::DEFAULT_FOCUS,
        }
    }

    pub fn with_default_color(mut self, color: Rgba) -> Self {
        self.default_color = color;
        self
    }

    pub fn default_color(&self) -> Rgba {
        self.default_color
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    pub fn store_mut(&mut self) -> &mut dyn KeyValueStore {
        self.store.as_mut()
    }

    // ── Recording ────────────────────────────────────────────────────

    /// Apply one focus completion at local time `at`.
    ///
    /// Writes happen in order: daily count, hourly count, hourly color,
    /// category count. A failed write does not stop the later ones.
    pub fn record_focus_completion(&mut self, at: NaiveDateTime, tag: Option<&Tag>) -> FocusRecord {
        let date = at.date();
        let hour = at.hour();
        let slot = hour as usize;

        let completed_today = self.daily_count(date).saturating_add(1);
        self.write(&date_key(DAILY_COUNT_PREFIX, date), &completed_today);

        let mut hourly = self.hourly_counts(date);
        hourly[slot] = hourly[slot].saturating_add(1);
        self.write(&date_key(HOURLY_COUNT_PREFIX, date), &hourly);

        let color = tag.map(|t| t.color).unwrap_or(self.default_color);
        let mut colors = self.hourly_colors(date);
        colors[slot] = color;
        self.write(&date_key(HOURLY_COLOR_PREFIX, date), &colors);

        let category = tag.map(|t| {
            let mut categories = self.category_counts(date);
            let entry = categories.entry(t.name.clone()).or_insert(0);
            *entry = entry.saturating_add(1);
            self.write(&date_key(CATEGORY_PREFIX, date), &categories);
            t.name.clone()
        });

        debug!(%date, hour, completed_today, ?category, "focus completion recorded");
        FocusRecord {
            date,
            hour,
            completed_today,
            color,
            category,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn daily_count(&self, date: NaiveDate) -> u32 {
        self.read(&date_key(DAILY_COUNT_PREFIX, date)).unwrap_or(0)
    }

    pub fn hourly_counts(&self, date: NaiveDate) -> [u32; HOURS_PER_DAY] {
        let key = date_key(HOURLY_COUNT_PREFIX, date);
        self.read::<Vec<u32>>(&key)
            .map(|v| fit_hours(&key, v))
            .unwrap_or([0; HOURS_PER_DAY])
    }

    pub fn hourly_colors(&self, date: NaiveDate) -> [Rgba; HOURS_PER_DAY] {
        let key = date_key(HOURLY_COLOR_PREFIX, date);
        self.read::<Vec<Rgba>>(&key)
            .map(|v| fit_hours(&key, v))
            .unwrap_or([Rgba::CLEAR; HOURS_PER_DAY])
    }

    pub fn category_counts(&self, date: NaiveDate) -> BTreeMap<String, u32> {
        self.read(&date_key(CATEGORY_PREFIX, date))
            .unwrap_or_default()
    }

    pub fn day(&self, date: NaiveDate) -> DaySummary {
        DaySummary {
            date,
            completed: self.daily_count(date),
            hourly: self.hourly_counts(date),
            hourly_colors: self.hourly_colors(date),
            categories: self.category_counts(date),
        }
    }

    /// Merge every day in `from..=to`. An inverted range is empty.
    pub fn range(&self, from: NaiveDate, to: NaiveDate) -> PeriodSummary {
        let mut summary = PeriodSummary::empty(from, to);
        for date in days_between(from, to) {
            summary.merge_day(&self.day(date));
        }
        summary
    }

    /// Calendar month; `None` for an invalid year/month.
    pub fn month(&self, year: i32, month: u32) -> Option<PeriodSummary> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        let last = first.checked_add_months(Months::new(1))?.pred_opt()?;
        Some(self.range(first, last))
    }

    pub fn year(&self, year: i32) -> Option<PeriodSummary> {
        let first = NaiveDate::from_ymd_opt(year, 1, 1)?;
        let last = NaiveDate::from_ymd_opt(year, 12, 31)?;
        Some(self.range(first, last))
    }

    // ── Reset ────────────────────────────────────────────────────────

    /// Zero out one day. Keys are rewritten, not removed.
    pub fn reset_day(&mut self, date: NaiveDate) {
        self.write(&date_key(DAILY_COUNT_PREFIX, date), &0u32);
        self.write(&date_key(HOURLY_COUNT_PREFIX, date), &[0u32; HOURS_PER_DAY]);
        self.write(
            &date_key(HOURLY_COLOR_PREFIX, date),
            &[Rgba::CLEAR; HOURS_PER_DAY],
        );
        self.write(&date_key(CATEGORY_PREFIX, date), &BTreeMap::<String, u32>::new());
        debug!(%date, "statistics reset");
    }

    /// Zero out every day in `from..=to`, returning how many days were reset.
    pub fn reset_range(&mut self, from: NaiveDate, to: NaiveDate) -> usize {
        let mut days = 0;
        for date in days_between(from, to) {
            self.reset_day(date);
            days += 1;
        }
        days
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.store.get(key) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(key, error = %e, "statistics read failed");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "statistics value could not be decoded");
                None
            }
        }
    }

    fn write<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                warn!(key, error = %e, "statistics value could not be encoded");
                return;
            }
        };
        if let Err(e) = self.store.set(key, &json) {
            warn!(key, error = %e, "statistics write failed");
        }
    }
}

/// Coerce a stored per-hour list to exactly 24 slots.
fn fit_hours<T: Copy + Default>(key: &str, mut values: Vec<T>) -> [T; HOURS_PER_DAY] {
    if values.len() != HOURS_PER_DAY {
        warn!(key, len = values.len(), "hourly entry does not have 24 slots");
        values.resize(HOURS_PER_DAY, T::default());
    }
    let mut out = [T::default(); HOURS_PER_DAY];
    out.copy_from_slice(&values);
    out
}

fn days_between(from: NaiveDate, to: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    from.iter_days().take_while(move |d| *d <= to)
}
