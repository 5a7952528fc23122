use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// 8-bit-per-channel color stored alongside hourly statistics.
///
/// The serde form is the four named channels; the text form is
/// `#RRGGBBAA`. Both round-trip exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Empty hourly slot.
    pub const CLEAR: Rgba = Rgba::new(0, 0, 0, 0);
    /// Recorded for focus sessions with no tag selected.
    pub const DEFAULT_FOCUS: Rgba = Rgba::new(0x3b, 0x82, 0xf6, 0xff);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 0xff)
    }

    /// Build from unit-interval components, as UI toolkits report them.
    pub fn from_unit(r: f64, g: f64, b: f64, a: f64) -> Self {
        fn channel(v: f64) -> u8 {
            if v.is_nan() {
                return 0;
            }
            (v.clamp(0.0, 1.0) * 255.0).round() as u8
        }
        Self::new(channel(r), channel(g), channel(b), channel(a))
    }

    pub fn to_unit(self) -> [f64; 4] {
        [self.r, self.g, self.b, self.a].map(|c| c as f64 / 255.0)
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgba {
    type Err = String;

    /// Parses `#RRGGBB` or `#RRGGBBAA`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .strip_prefix('#')
            .ok_or_else(|| format!("color '{s}' must start with '#'"))?;
        if !hex.is_ascii() || !matches!(hex.len(), 6 | 8) {
            return Err(format!("color '{s}' must be #RRGGBB or #RRGGBBAA"));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| format!("color '{s}' has invalid hex digits"))
        };
        let a = if hex.len() == 8 { channel(6)? } else { 0xff };
        Ok(Rgba::new(channel(0)?, channel(2)?, channel(4)?, a))
    }
}
