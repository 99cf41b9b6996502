//! Shared primitive types used across the entire analysis pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A stable, unique identifier for a simulated user. Runs from 1..=N.
pub type UserId = u64;

/// One arm of the experiment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Group {
    /// Store-brand carousel.
    Control,
    /// National-brand carousel.
    Treatment,
}

impl Group {
    /// Both arms in table order. Row 0 is control, row 1 is treatment.
    pub const ALL: [Group; 2] = [Group::Control, Group::Treatment];

    pub fn index(self) -> usize {
        match self {
            Self::Control   => 0,
            Self::Treatment => 1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Control   => "control",
            Self::Treatment => "treatment",
        }
    }

    /// Business-facing label used in reports and charts.
    pub fn label(self) -> &'static str {
        match self {
            Self::Control   => "Store-Brand",
            Self::Treatment => "National-Brand",
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One simulated user session.
///
/// `purchase_amount` is exactly 0.0 whenever `converted` is false.
/// Converted users may carry a negative amount: draws are never clamped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id:              UserId,
    pub group:           Group,
    pub converted:       bool,
    pub purchase_amount: f64,
}
