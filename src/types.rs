//! Newtype wrappers and type aliases for domain concepts.
//!
//! Newtypes for identifiers (PIDs, priorities) prevent silent type
//! confusion. Simulated time is a plain alias: every quantity in the model
//! is an integer number of abstract time units.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Process identifier. Positive and unique within one run.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Pid(pub u32);

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// Process priority. `1` is the only value that selects the high
/// frequency tier; every other positive value runs at the low tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Priority(pub u32);

impl Priority {
    pub const HIGH: Priority = Priority(1);

    /// Map the priority onto the CPU's two frequency tiers.
    pub fn tier(self) -> FrequencyTier {
        if self == Self::HIGH {
            FrequencyTier::Max
        } else {
            FrequencyTier::Min
        }
    }
}

/// Which configured frequency the CPU runs a slice at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrequencyTier {
    Max,
    Min,
}

/// Simulated time in abstract units.
pub type TimeUnits = u64;

/// A `(time, value)` telemetry sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sample {
    pub time: TimeUnits,
    pub value: f64,
}

/// A half-open `[start, end)` execution slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Slice {
    pub start: TimeUnits,
    pub end: TimeUnits,
}

impl Slice {
    pub fn len(&self) -> TimeUnits {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}
