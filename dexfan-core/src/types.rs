//! Core types for DexFan

use crate::{DexFanError, Result};
use std::fmt;
use std::str::FromStr;

/// Whole-degree Celsius temperature reported by the probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Degrees(pub i32);

impl Degrees {
    /// Value as the host's floating point representation
    pub fn as_f32(self) -> f32 {
        self.0 as f32
    }
}

impl FromStr for Degrees {
    type Err = DexFanError;

    /// Parse one response line. Surrounding whitespace (including a
    /// trailing `\r`) is ignored.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        trimmed
            .parse::<i32>()
            .map(Degrees)
            .map_err(|e| DexFanError::Parse(format!("Invalid temperature '{}': {}", trimmed, e)))
    }
}

impl fmt::Display for Degrees {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°C", self.0)
    }
}

impl From<Degrees> for f32 {
    fn from(value: Degrees) -> Self {
        value.as_f32()
    }
}
