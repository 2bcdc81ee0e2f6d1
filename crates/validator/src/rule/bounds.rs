//! Inclusive bounds shared by the length check, the file-count check and the
//! numeric range check.

use serde::{Deserialize, Serialize};

/// Inclusive `min..=max` bound over a count.
///
/// Measures string length in the generic stage and the number of uploaded
/// files in [`Images`](crate::validators::Images). Each caller turns a
/// [`BoundViolation`] into its own message, so a file count never reads as a
/// character count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bounds {
    /// Smallest allowed count.
    pub min: usize,
    /// Largest allowed count.
    pub max: usize,
}

/// Which side of a [`Bounds`] a count fell outside of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundViolation {
    /// Count below `min`.
    Below { min: usize, actual: usize },
    /// Count above `max`.
    Above { max: usize, actual: usize },
}

impl Bounds {
    /// Builds bounds from optional ends. Either end missing means "no bounds".
    pub fn from_pair(min: Option<usize>, max: Option<usize>) -> Option<Self> {
        Some(Self { min: min?, max: max? })
    }

    /// True when `min <= max`.
    pub fn is_ordered(&self) -> bool {
        self.min <= self.max
    }

    /// Checks a count against the bounds.
    pub fn check(&self, actual: usize) -> Result<(), BoundViolation> {
        if actual < self.min {
            Err(BoundViolation::Below {
                min: self.min,
                actual,
            })
        } else if actual > self.max {
            Err(BoundViolation::Above {
                max: self.max,
                actual,
            })
        } else {
            Ok(())
        }
    }
}

/// Inclusive numeric range. Applied only when both ends are configured.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NumberRange {
    /// Smallest allowed value.
    pub min: Option<f64>,
    /// Largest allowed value.
    pub max: Option<f64>,
}

impl NumberRange {
    /// Both ends, or `None` when the range check is disabled.
    pub fn ends(&self) -> Option<(f64, f64)> {
        Some((self.min?, self.max?))
    }

    /// True unless both ends are set with `min > max`.
    pub fn is_ordered(&self) -> bool {
        self.ends().is_none_or(|(min, max)| min <= max)
    }
}
