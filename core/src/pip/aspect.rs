//! Aspect ratio of the floating window and argument coercion

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Width:height pair, both strictly positive once coerced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AspectRatio {
    pub width: u32,
    pub height: u32,
}

impl AspectRatio {
    pub const DEFAULT: AspectRatio = AspectRatio {
        width: 16,
        height: 9,
    };

    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Coerce raw caller dimensions into a positive pair.
    ///
    /// Each component falls back to the matching component of `fallback`
    /// when absent or non-positive. Oversize values clamp to `u32::MAX`.
    pub fn coerce(width: Option<i64>, height: Option<i64>, fallback: AspectRatio) -> Self {
        Self {
            width: positive_or(width, fallback.width),
            height: positive_or(height, fallback.height),
        }
    }
}

impl Default for AspectRatio {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl std::fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.width, self.height)
    }
}

fn positive_or(value: Option<i64>, fallback: u32) -> u32 {
    match value {
        Some(v) if v > 0 => u32::try_from(v).unwrap_or(u32::MAX),
        _ => fallback,
    }
}

/// Read an integer argument. Integer-valued floats are accepted; anything
/// else counts as absent.
pub(crate) fn integer_argument(value: &Value) -> Option<i64> {
    if let Some(i) = value.as_i64() {
        return Some(i);
    }
    if value.as_u64().is_some() {
        return Some(i64::MAX);
    }
    let f = value.as_f64()?;
    if f.is_finite() && f.fract() == 0.0 {
        // saturating cast
        Some(f as i64)
    } else {
        None
    }
}
