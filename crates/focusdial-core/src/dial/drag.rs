//! Drag gesture tracking on the dial.
//!
//! A [`DragInteraction`] lives for one gesture. It remembers the previous
//! raw angle so each new pointer position can be classified as clockwise or
//! counter-clockwise, and it latches the output at 0° or 360° once the
//! pointer crosses the 12 o'clock seam so the dial never jumps between the
//! shortest and longest durations. The latch holds anywhere on the dial and
//! lets go only when the pointer crosses the seam again the other way.

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::angle::{angle_delta, clamp_seam, raw_angle, Direction, Point};

/// Which end of the dial the output is pinned to after a seam crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeamPin {
    /// Pinned at 0° after a counter-clockwise crossing.
    Empty,
    /// Pinned at 360° after a clockwise crossing.
    Full,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DragInteraction {
    previous_angle: f64,
    direction: Direction,
    is_dragging: bool,
    pin: Option<SeamPin>,
}

impl DragInteraction {
    /// Start a gesture at `point`. Returns `None` if the point sits on the
    /// dial center.
    pub fn begin(point: Point, center: Point) -> Option<Self> {
        let angle = raw_angle(point, center)?;
        Some(Self {
            previous_angle: angle,
            direction: Direction::Clockwise,
            is_dragging: true,
            pin: None,
        })
    }

    pub fn previous_angle(&self) -> f64 {
        self.previous_angle
    }

    pub fn is_clockwise(&self) -> bool {
        self.direction.is_clockwise()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_dragging(&self) -> bool {
        self.is_dragging
    }

    pub fn pin(&self) -> Option<SeamPin> {
        self.pin
    }

    /// Feed the next pointer position. Returns the dial angle to apply, or
    /// `None` when the position carries no movement (same angle, center
    /// point, or the gesture has ended).
    pub fn update(&mut self, point: Point, center: Point) -> Option<f64> {
        if !self.is_dragging {
            return None;
        }
        let raw = raw_angle(point, center)?;
        let delta = angle_delta(self.previous_angle, raw);
        let direction = Direction::from_delta(delta)?;
        let crossed_seam = (self.previous_angle - raw).abs() > 180.0;

        self.direction = direction;
        self.previous_angle = raw;

        match self.pin {
            Some(SeamPin::Empty) if crossed_seam && direction == Direction::Clockwise => {
                self.pin = None;
            }
            Some(SeamPin::Full) if crossed_seam && direction == Direction::CounterClockwise => {
                self.pin = None;
            }
            Some(_) => {}
            None if crossed_seam => {
                self.pin = Some(match direction {
                    Direction::Clockwise => SeamPin::Full,
                    Direction::CounterClockwise => SeamPin::Empty,
                });
            }
            None => {}
        }

        let angle = match self.pin {
            Some(SeamPin::Empty) => 0.0,
            Some(SeamPin::Full) => 360.0,
            None => clamp_seam(raw, direction),
        };
        trace!(raw, delta, ?direction, pin = ?self.pin, angle, "dial drag update");
        Some(angle)
    }

    pub fn end(&mut self) {
        self.is_dragging = false;
    }
}

/// The dial control: a center point plus the gesture in flight, if any.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dial {
    center: Point,
    #[serde(skip)]
    drag: Option<DragInteraction>,
}

impl Dial {
    pub fn new(center: Point) -> Self {
        Self { center, drag: None }
    }

    pub fn center(&self) -> Point {
        self.center
    }

    /// Move the dial, e.g. after a layout or orientation change. Any gesture
    /// in flight is dropped since its angles no longer line up.
    pub fn set_center(&mut self, center: Point) {
        self.center = center;
        self.drag = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.as_ref().is_some_and(|d| d.is_dragging())
    }

    pub fn interaction(&self) -> Option<&DragInteraction> {
        self.drag.as_ref()
    }

    /// Handle a pointer position during a drag. The first position of a
    /// gesture only anchors it; later positions yield angles.
    pub fn drag_changed(&mut self, point: Point) -> Option<f64> {
        match self.drag.as_mut() {
            Some(drag) => drag.update(point, self.center),
            None => {
                self.drag = DragInteraction::begin(point, self.center);
                None
            }
        }
    }

    pub fn drag_ended(&mut self) {
        if let Some(mut drag) = self.drag.take() {
            drag.end();
        }
    }
}
