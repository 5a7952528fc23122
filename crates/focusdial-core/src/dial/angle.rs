//! Pure angle/time conversions for the circular dial.
//!
//! Angles are clock-face degrees: 0° at 12 o'clock, increasing clockwise,
//! in screen coordinates (y grows downward). One minute is six degrees, so
//! a full turn is the 60-minute maximum.

use std::f64::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};

/// Degrees swept by one minute on the dial.
pub const DEGREES_PER_MINUTE: f64 = 6.0;
/// Shortest duration the dial can set.
pub const MIN_MINUTES: f64 = 1.0;
/// Longest duration the dial can set.
pub const MAX_MINUTES: f64 = 60.0;
/// Clockwise drags at or past this angle snap to the full circle.
pub const SEAM_SNAP_DEGREES: f64 = 354.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Clockwise,
    CounterClockwise,
}

impl Direction {
    /// Direction implied by a signed delta from [`angle_delta`].
    ///
    /// Zero carries no direction.
    pub fn from_delta(delta: f64) -> Option<Self> {
        if delta > 0.0 {
            Some(Direction::Clockwise)
        } else if delta < 0.0 {
            Some(Direction::CounterClockwise)
        } else {
            None
        }
    }

    pub fn is_clockwise(self) -> bool {
        self == Direction::Clockwise
    }
}

/// Clock-face angle of `point` around `center`, with the seam clamp for
/// the given drag direction applied.
///
/// Returns `None` for a point on the center itself, where the angle is
/// undefined.
pub fn angle_from_point(point: Point, center: Point, direction: Direction) -> Option<f64> {
    raw_angle(point, center).map(|angle| clamp_seam(angle, direction))
}

/// Clock-face angle in [0, 360) without any seam handling.
pub fn raw_angle(point: Point, center: Point) -> Option<f64> {
    let dx = point.x - center.x;
    let dy = point.y - center.y;
    if dx == 0.0 && dy == 0.0 {
        return None;
    }
    let degrees = (dy.atan2(dx) + FRAC_PI_2).to_degrees();
    if !degrees.is_finite() {
        return None;
    }
    Some(normalize_degrees(degrees))
}

/// Wrap any finite angle into [0, 360).
pub fn normalize_degrees(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid rounds tiny negatives up to exactly 360.0
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Snap to the 0/360 seam depending on drag direction.
pub fn clamp_seam(angle: f64, direction: Direction) -> f64 {
    match direction {
        Direction::Clockwise if angle >= SEAM_SNAP_DEGREES => 360.0,
        Direction::CounterClockwise if angle <= 0.0 => 0.0,
        _ => angle,
    }
}

/// Shortest signed distance from `from` to `to`; positive is clockwise.
pub fn angle_delta(from: f64, to: f64) -> f64 {
    let delta = to - from;
    if delta > 180.0 {
        delta - 360.0
    } else if delta <= -180.0 {
        delta + 360.0
    } else {
        delta
    }
}

/// Quantize a dial angle to whole minutes in [1, 60], returned in seconds.
pub fn angle_to_time(angle: f64) -> u64 {
    if !angle.is_finite() {
        return MIN_MINUTES as u64 * 60;
    }
    let minutes = (angle / DEGREES_PER_MINUTE)
        .round()
        .clamp(MIN_MINUTES, MAX_MINUTES);
    minutes as u64 * 60
}

/// Angle of the progress ring for a duration in seconds.
pub fn time_to_angle(secs: u64) -> f64 {
    let minutes = (secs as f64 / 60.0).clamp(MIN_MINUTES, MAX_MINUTES);
    minutes * DEGREES_PER_MINUTE
}
