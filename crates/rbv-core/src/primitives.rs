//! # Primitives
//!
//! Fixed design constants and the two value types every other module is
//! built from: [`Rating`] (a validated 1-5 integer) and [`Tenths`] (an exact
//! fixed-point value counting tenths of a unit).
//!
//! The scoring path never touches floating point. Every reachable potential
//! score is a multiple of 0.5, so tenths represent it exactly.

use crate::error::AssessmentError;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

// =============================================================================
// DESIGN CONSTANTS
// =============================================================================

/// Weight of the supporting-factor average, in percent.
pub const SUPPORT_WEIGHT_PERCENT: u32 = 60;

/// Weight of the negated barrier average, in percent.
pub const BARRIER_WEIGHT_PERCENT: u32 = 40;

/// Number of steps between the lowest and highest rating.
pub const RATING_STEPS: u8 = 4;

/// Upper bound of the potential score, in tenths of a percent.
pub const MAX_POTENTIAL_TENTHS: u16 = 1000;

/// Scores below this (in tenths) are in the low tier.
pub const MEDIUM_TIER_FLOOR_TENTHS: u16 = 400;

/// Scores at or above this (in tenths) are in the high tier.
pub const HIGH_TIER_FLOOR_TENTHS: u16 = 700;

/// Largest absolute contribution of one factor, in tenths of a point.
pub const MAX_CONTRIBUTION_TENTHS: i32 = 100;

/// Maximum number of factors listed per report highlight section.
pub const MAX_HIGHLIGHTS: usize = 2;

// =============================================================================
// RATING
// =============================================================================

/// A factor rating on the 1-5 scale.
///
/// The only way to obtain a `Rating` is through validation, so holding one
/// proves the value is in range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Rating(u8);

impl Rating {
    /// Lowest rating.
    pub const MIN: Self = Self(1);
    /// Highest rating.
    pub const MAX: Self = Self(5);
    /// Scale midpoint, used by the midpoint missing-rating policy.
    pub const MIDPOINT: Self = Self(3);

    /// Validate a raw value.
    pub fn new(value: i64) -> Result<Self, AssessmentError> {
        if (i64::from(Self::MIN.0)..=i64::from(Self::MAX.0)).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(AssessmentError::InvalidRating { value })
        }
    }

    /// The raw value (1-5).
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Steps above the minimum rating (0-4).
    #[must_use]
    pub const fn steps(self) -> u8 {
        self.0.saturating_sub(Self::MIN.0)
    }

    /// Zero-based position on the scale, for level tables.
    #[must_use]
    pub const fn index(self) -> usize {
        self.steps() as usize
    }

    /// All ratings from lowest to highest.
    pub fn all() -> impl Iterator<Item = Self> {
        (Self::MIN.0..=Self::MAX.0).map(Self)
    }
}

impl TryFrom<i64> for Rating {
    type Error = AssessmentError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// TENTHS (FIXED-POINT)
// =============================================================================

/// An exact decimal with one fractional digit, stored as tenths.
///
/// Displays as `62.5` / `-2.5` and serializes as a JSON number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Tenths(i32);

impl Tenths {
    /// Zero.
    pub const ZERO: Self = Self(0);

    /// Create from a raw count of tenths.
    #[must_use]
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    /// Raw count of tenths.
    #[must_use]
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Convert to `f64` for display layers.
    ///
    /// This is the only place the crate does float arithmetic.
    #[allow(clippy::float_arithmetic)]
    #[must_use]
    pub fn to_f64(self) -> f64 {
        f64::from(self.0) / 10.0
    }

    /// Round to a whole number, ties to even.
    #[must_use]
    pub const fn round_half_even(self) -> i32 {
        let whole = self.0.div_euclid(10);
        let frac = self.0.rem_euclid(10);
        if frac > 5 || (frac == 5 && whole.rem_euclid(2) == 1) {
            whole.saturating_add(1)
        } else {
            whole
        }
    }
}

impl fmt::Display for Tenths {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{}", sign, abs / 10, abs % 10)
    }
}

impl Serialize for Tenths {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_f64())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_accepts_scale() {
        for value in 1..=5 {
            let rating = Rating::new(value);
            assert_eq!(rating.map(Rating::value), Ok(value as u8));
        }
    }

    #[test]
    fn rating_rejects_out_of_range() {
        for value in [i64::MIN, -1, 0, 6, 255, i64::MAX] {
            assert_eq!(
                Rating::new(value),
                Err(AssessmentError::InvalidRating { value })
            );
        }
    }

    #[test]
    fn rating_steps_and_index() {
        assert_eq!(Rating::MIN.steps(), 0);
        assert_eq!(Rating::MIDPOINT.steps(), 2);
        assert_eq!(Rating::MAX.steps(), RATING_STEPS);
        assert_eq!(Rating::MAX.index(), 4);
    }

    #[test]
    fn rating_all_is_ordered() {
        let values: Vec<u8> = Rating::all().map(Rating::value).collect();
        assert_eq!(values, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn rating_serde_validates() {
        let ok: Result<Rating, _> = serde_json::from_str("4");
        assert_eq!(ok.ok(), Some(Rating(4)));

        let bad: Result<Rating, _> = serde_json::from_str("9");
        assert!(bad.is_err());

        assert_eq!(serde_json::to_string(&Rating(2)).ok(), Some("2".into()));
    }

    #[test]
    fn tenths_display() {
        assert_eq!(Tenths::new(625).to_string(), "62.5");
        assert_eq!(Tenths::new(0).to_string(), "0.0");
        assert_eq!(Tenths::new(-25).to_string(), "-2.5");
        assert_eq!(Tenths::new(-100).to_string(), "-10.0");
        assert_eq!(Tenths::new(1000).to_string(), "100.0");
    }

    #[test]
    fn tenths_round_half_even() {
        assert_eq!(Tenths::new(625).round_half_even(), 62);
        assert_eq!(Tenths::new(375).round_half_even(), 38);
        assert_eq!(Tenths::new(500).round_half_even(), 50);
        assert_eq!(Tenths::new(506).round_half_even(), 51);
        assert_eq!(Tenths::new(-25).round_half_even(), -2);
    }

    #[test]
    fn tenths_serializes_as_number() {
        assert_eq!(serde_json::to_string(&Tenths::new(625)).ok(), Some("62.5".into()));
        assert_eq!(serde_json::to_string(&Tenths::new(-50)).ok(), Some("-5.0".into()));
    }
}
