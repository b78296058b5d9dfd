//! # Scoring Engine
//!
//! Maps nine ratings to the internationalization potential score and to
//! per-factor contribution points.
//!
//! ## Formula
//!
//! Each rating is normalized to a "goodness" value `s` in [0, 1]:
//! supporting `s = (r - 1) / 4`, barrier `s = 1 - (r - 1) / 4`.
//! The potential is
//! `P = (mean(s_supporting) * 0.6 + mean(s_barrier) * 0.4) * 100`.
//!
//! Goodness is carried as quarters (0-4) and the score as tenths of a
//! percent, which keeps every step exact: `P` in tenths is
//! `30 * sum(support quarters) + 25 * sum(barrier quarters)`.

use crate::factor::{BARRIER_COUNT, FactorId, FactorRole, SUPPORTING_COUNT};
use crate::factor_set::RatingSnapshot;
use crate::primitives::{
    BARRIER_WEIGHT_PERCENT, MAX_CONTRIBUTION_TENTHS, MAX_POTENTIAL_TENTHS, RATING_STEPS, Rating,
    SUPPORT_WEIGHT_PERCENT, Tenths,
};
use crate::tier::PotentialTier;
use serde::{Serialize, Serializer};
use std::fmt;

// =============================================================================
// POTENTIAL SCORE
// =============================================================================

/// The composite readiness metric, 0-100 %, held exactly in tenths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct PotentialScore(u16);

impl PotentialScore {
    /// 0 %.
    pub const MIN: Self = Self(0);
    /// 100 %.
    pub const MAX: Self = Self(MAX_POTENTIAL_TENTHS);

    /// Create from tenths of a percent, clamped to [0, 1000].
    #[must_use]
    pub const fn from_tenths(tenths: u16) -> Self {
        if tenths > MAX_POTENTIAL_TENTHS {
            Self::MAX
        } else {
            Self(tenths)
        }
    }

    /// Tenths of a percent (0-1000).
    #[must_use]
    pub const fn tenths(self) -> u16 {
        self.0
    }

    /// The score as a fixed-point percent.
    #[must_use]
    pub const fn as_tenths(self) -> Tenths {
        Tenths::new(self.0 as i32)
    }

    /// The score as an `f64` percent.
    #[must_use]
    pub fn percent(self) -> f64 {
        self.as_tenths().to_f64()
    }

    /// Whole percent, ties to even (62.5 -> 62, 37.5 -> 38).
    #[must_use]
    pub const fn whole_percent(self) -> u16 {
        self.as_tenths().round_half_even() as u16
    }

    /// The tier this score falls into.
    #[must_use]
    pub const fn tier(self) -> PotentialTier {
        PotentialTier::from_score(self)
    }
}

impl fmt::Display for PotentialScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_tenths())
    }
}

impl Serialize for PotentialScore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_tenths().serialize(serializer)
    }
}

// =============================================================================
// CONTRIBUTION
// =============================================================================

/// A factor's signed effect on the potential, for the contribution chart.
///
/// Supporting factors contribute `s * 10` points (0..10), barriers
/// contribute `-(1 - s) * 10` points (-10..0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Contribution {
    pub factor: FactorId,
    pub label: &'static str,
    pub role: FactorRole,
    pub rating: Rating,
    pub points: Tenths,
}

/// Potential, tier and contributions computed from one snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreBreakdown {
    pub potential: PotentialScore,
    pub tier: PotentialTier,
    pub contributions: Vec<Contribution>,
}

// =============================================================================
// SCORING ENGINE
// =============================================================================

/// Stateless scoring functions.
pub struct ScoringEngine;

impl ScoringEngine {
    /// Normalized goodness of a rating, in quarters (0 = worst, 4 = best).
    #[must_use]
    pub const fn goodness_quarters(factor: FactorId, rating: Rating) -> u8 {
        match factor.role() {
            FactorRole::Supporting => rating.steps(),
            FactorRole::Barrier => RATING_STEPS.saturating_sub(rating.steps()),
        }
    }

    /// Compute the potential score.
    #[must_use]
    pub fn potential(snapshot: &RatingSnapshot) -> PotentialScore {
        let support = Self::quarter_sum(snapshot, FactorRole::Supporting);
        let barrier = Self::quarter_sum(snapshot, FactorRole::Barrier);
        let steps = u32::from(RATING_STEPS);

        // Common denominator of both means and the percent weights, scaled
        // to tenths. Exact for the fixed weights and counts.
        let numerator = 1000 * SUPPORT_WEIGHT_PERCENT * support * BARRIER_COUNT
            + 1000 * BARRIER_WEIGHT_PERCENT * barrier * SUPPORTING_COUNT;
        let denominator = 100 * steps * SUPPORTING_COUNT * BARRIER_COUNT;
        let tenths = numerator / denominator;

        PotentialScore::from_tenths(tenths.min(u32::from(MAX_POTENTIAL_TENTHS)) as u16)
    }

    /// Compute per-factor contributions in catalog order.
    #[must_use]
    pub fn contributions(snapshot: &RatingSnapshot) -> Vec<Contribution> {
        snapshot
            .iter()
            .map(|(factor, rating)| Self::contribution(factor, rating))
            .collect()
    }

    /// Contribution of a single factor.
    #[must_use]
    pub fn contribution(factor: FactorId, rating: Rating) -> Contribution {
        let quarters = i32::from(Self::goodness_quarters(factor, rating));
        let steps = i32::from(RATING_STEPS);
        let points = match factor.role() {
            FactorRole::Supporting => quarters * MAX_CONTRIBUTION_TENTHS / steps,
            FactorRole::Barrier => -((steps - quarters) * MAX_CONTRIBUTION_TENTHS / steps),
        };
        Contribution {
            factor,
            label: factor.short_label(),
            role: factor.role(),
            rating,
            points: Tenths::new(points),
        }
    }

    /// Potential, tier and contributions in one pass.
    #[must_use]
    pub fn evaluate(snapshot: &RatingSnapshot) -> ScoreBreakdown {
        let potential = Self::potential(snapshot);
        ScoreBreakdown {
            potential,
            tier: potential.tier(),
            contributions: Self::contributions(snapshot),
        }
    }

    fn quarter_sum(snapshot: &RatingSnapshot, role: FactorRole) -> u32 {
        snapshot
            .by_role(role)
            .map(|(f, r)| u32::from(Self::goodness_quarters(f, r)))
            .sum()
    }
}

// =============================================================================
// TESTS
// =============================================================================
