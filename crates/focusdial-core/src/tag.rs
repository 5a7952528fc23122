use serde::{Deserialize, Serialize};

use crate::stats::Rgba;

/// A user-defined category attached to focus sessions for statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub color: Rgba,
}

impl Tag {
    pub fn new(name: impl Into<String>, color: Rgba) -> Self {
        Self {
            name: name.into(),
            color,
        }
    }
}
