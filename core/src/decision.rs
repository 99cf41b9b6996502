//! Recommendation rule over the two p-values.
//!
//! NOTE: `NationalBrandWins` only requires both tests to be significant.
//! It does not check which arm had the higher conversion rate or purchase
//! amount, so a significantly *better* control arm also yields
//! `NationalBrandWins`. Kept as-is for compatibility with existing results;
//! callers that need direction should compare the group summaries.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    NationalBrandWins,
    NoSignificantDifference,
    MixedResults,
}

impl Decision {
    pub fn message(&self) -> &'static str {
        match self {
            Self::NationalBrandWins => "National-Brand items perform significantly better.",
            Self::NoSignificantDifference => {
                "No significant difference; consider sticking with Store-Brand items."
            }
            Self::MixedResults => "Mixed results; further investigation needed.",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Total over all inputs. A p-value equal to `alpha` counts as not significant.
pub fn decide(p_conversion: f64, p_purchase: f64, alpha: f64) -> Decision {
    if p_conversion < alpha && p_purchase < alpha {
        Decision::NationalBrandWins
    } else if p_conversion >= alpha && p_purchase >= alpha {
        Decision::NoSignificantDifference
    } else {
        Decision::MixedResults
    }
}
