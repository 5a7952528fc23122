//! Circular dial: pointer position to clock angle to countdown time.

pub mod angle;
mod drag;

pub use angle::{
    angle_delta, angle_from_point, angle_to_time, time_to_angle, Direction, Point,
};
pub use drag::{Dial, DragInteraction, SeamPin};
