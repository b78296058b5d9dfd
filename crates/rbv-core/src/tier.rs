//! # Potential Tier
//!
//! Three-way classification of the potential score. The tier selects the
//! display color and the advice text.
//!
//! Bounds are inclusive below: 40.0 is medium, 70.0 is high.

use crate::advice::{self, TierAdvice};
use crate::primitives::{HIGH_TIER_FLOOR_TENTHS, MEDIUM_TIER_FLOOR_TENTHS, Tenths};
use crate::scoring::PotentialScore;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Low / medium / high internationalization potential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PotentialTier {
    /// Below 40 %.
    Low,
    /// 40 % up to (not including) 70 %.
    Medium,
    /// 70 % and above.
    High,
}

impl PotentialTier {
    /// Classify an exact score.
    #[must_use]
    pub const fn from_score(score: PotentialScore) -> Self {
        let tenths = score.tenths();
        if tenths >= HIGH_TIER_FLOOR_TENTHS {
            Self::High
        } else if tenths >= MEDIUM_TIER_FLOOR_TENTHS {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Classify a raw percent. NaN classifies as low.
    #[must_use]
    pub fn from_percent(percent: f64) -> Self {
        if percent >= Tenths::new(i32::from(HIGH_TIER_FLOOR_TENTHS)).to_f64() {
            Self::High
        } else if percent >= Tenths::new(i32::from(MEDIUM_TIER_FLOOR_TENTHS)).to_f64() {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Lowercase label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Display color name.
    #[must_use]
    pub const fn color_name(self) -> &'static str {
        match self {
            Self::Low => "red",
            Self::Medium => "amber",
            Self::High => "green",
        }
    }

    /// Display color as hex.
    #[must_use]
    pub const fn color_hex(self) -> &'static str {
        match self {
            Self::Low => "#dc3545",
            Self::Medium => "#ffc107",
            Self::High => "#28a745",
        }
    }

    /// Advice for this tier.
    #[must_use]
    pub fn advice(self) -> &'static TierAdvice {
        advice::for_tier(self)
    }
}

impl fmt::Display for PotentialTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// TESTS
// =============================================================================
