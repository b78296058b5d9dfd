//! # FactorSet
//!
//! The per-session rating state: one optional rating for each of the nine
//! factors. The key set is fixed at construction and never changes; the
//! only way to change a value is an explicit [`RatingUpdate`].
//!
//! Scoring never reads a `FactorSet` directly. It reads a
//! [`RatingSnapshot`], produced by [`FactorSet::resolve`] under an explicit
//! [`MissingRatingPolicy`].

use crate::error::AssessmentError;
use crate::factor::{FACTOR_COUNT, FactorId, FactorRole, NOT_YET_RATED, Sentiment};
use crate::primitives::Rating;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// =============================================================================
// MISSING RATING POLICY
// =============================================================================

/// What to do with unrated factors when a score is requested.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MissingRatingPolicy {
    /// Refuse to score until every factor is rated.
    #[default]
    RequireAll,
    /// Treat every unrated factor as the scale midpoint (3).
    Midpoint,
}

impl MissingRatingPolicy {
    /// Kebab-case label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::RequireAll => "require-all",
            Self::Midpoint => "midpoint",
        }
    }
}

impl fmt::Display for MissingRatingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for MissingRatingPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "require-all" | "require_all" | "strict" => Ok(Self::RequireAll),
            "midpoint" | "default" => Ok(Self::Midpoint),
            other => Err(format!(
                "unknown missing-rating policy '{}' (expected require-all or midpoint)",
                other
            )),
        }
    }
}

// =============================================================================
// RATING UPDATE
// =============================================================================

/// A single rating change: set a factor to a rating, or clear it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingUpdate {
    pub factor: FactorId,
    pub rating: Option<Rating>,
}

impl RatingUpdate {
    /// Set `factor` to `rating`.
    #[must_use]
    pub const fn set(factor: FactorId, rating: Rating) -> Self {
        Self {
            factor,
            rating: Some(rating),
        }
    }

    /// Reset `factor` to unrated.
    #[must_use]
    pub const fn clear(factor: FactorId) -> Self {
        Self {
            factor,
            rating: None,
        }
    }
}

// =============================================================================
// FACTOR SET
// =============================================================================

/// Ratings for the nine fixed factors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FactorSet {
    ratings: BTreeMap<FactorId, Option<Rating>>,
}

impl Default for FactorSet {
    fn default() -> Self {
        Self::new()
    }
}

impl FactorSet {
    /// A set with every factor unrated.
    #[must_use]
    pub fn new() -> Self {
        Self {
            ratings: FactorId::ALL.into_iter().map(|f| (f, None)).collect(),
        }
    }

    /// A set with every factor at the same rating.
    #[must_use]
    pub fn filled(rating: Rating) -> Self {
        Self {
            ratings: FactorId::ALL.into_iter().map(|f| (f, Some(rating))).collect(),
        }
    }

    /// Build a set from raw named values, as they arrive from outside.
    ///
    /// Names are parsed with [`FactorId::from_str`]; `None` leaves a factor
    /// unrated. Fails on the first unknown name or invalid rating.
    pub fn from_named_values<'a, I>(values: I) -> Result<Self, AssessmentError>
    where
        I: IntoIterator<Item = (&'a str, Option<i64>)>,
    {
        let mut set = Self::new();
        for (name, value) in values {
            let factor: FactorId = name.parse()?;
            match value {
                Some(raw) => set.rate(factor, raw)?,
                None => {
                    set.clear(factor);
                }
            }
        }
        Ok(set)
    }

    /// Apply an update event. Returns the previous rating.
    pub fn apply(&mut self, update: RatingUpdate) -> Option<Rating> {
        self.ratings
            .insert(update.factor, update.rating)
            .flatten()
    }

    /// Set a validated rating.
    pub fn set(&mut self, factor: FactorId, rating: Rating) -> Option<Rating> {
        self.apply(RatingUpdate::set(factor, rating))
    }

    /// Validate and set a raw rating. The set is unchanged on error.
    pub fn rate(&mut self, factor: FactorId, value: i64) -> Result<(), AssessmentError> {
        let rating = Rating::new(value)?;
        self.set(factor, rating);
        Ok(())
    }

    /// Reset a factor to unrated. Returns the previous rating.
    pub fn clear(&mut self, factor: FactorId) -> Option<Rating> {
        self.apply(RatingUpdate::clear(factor))
    }

    /// Current rating of a factor.
    #[must_use]
    pub fn rating(&self, factor: FactorId) -> Option<Rating> {
        self.ratings.get(&factor).copied().flatten()
    }

    /// All factors with their current rating, in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (FactorId, Option<Rating>)> + '_ {
        self.ratings.iter().map(|(f, r)| (*f, *r))
    }

    /// Number of rated factors.
    #[must_use]
    pub fn rated_count(&self) -> usize {
        self.ratings.values().filter(|r| r.is_some()).count()
    }

    /// Check if every factor is rated.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.rated_count() == FACTOR_COUNT
    }

    /// Unrated factors in catalog order.
    #[must_use]
    pub fn missing(&self) -> Vec<FactorId> {
        self.iter()
            .filter(|(_, r)| r.is_none())
            .map(|(f, _)| f)
            .collect()
    }

    /// Resolve to a complete snapshot under `policy`.
    pub fn resolve(&self, policy: MissingRatingPolicy) -> Result<RatingSnapshot, AssessmentError> {
        let missing = self.missing();
        if !missing.is_empty() && policy == MissingRatingPolicy::RequireAll {
            return Err(AssessmentError::IncompleteInput { missing });
        }

        let mut ratings = [Rating::MIDPOINT; FACTOR_COUNT];
        for (factor, rating) in self.iter() {
            if let Some(rating) = rating {
                ratings[factor.index()] = rating;
            }
        }
        Ok(RatingSnapshot { ratings })
    }

    /// Profile rows for every factor, rated or not.
    #[must_use]
    pub fn profile(&self) -> Vec<ProfileEntry> {
        self.iter()
            .map(|(factor, rating)| ProfileEntry::new(factor, rating))
            .collect()
    }
}

// =============================================================================
// RATING SNAPSHOT
// =============================================================================

/// A complete, read-only set of nine ratings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RatingSnapshot {
    ratings: [Rating; FACTOR_COUNT],
}

impl RatingSnapshot {
    /// Every factor at the same rating.
    #[must_use]
    pub const fn uniform(rating: Rating) -> Self {
        Self {
            ratings: [rating; FACTOR_COUNT],
        }
    }

    /// Build from a function of the factor.
    #[must_use]
    pub fn from_fn(mut f: impl FnMut(FactorId) -> Rating) -> Self {
        let mut ratings = [Rating::MIDPOINT; FACTOR_COUNT];
        for factor in FactorId::ALL {
            ratings[factor.index()] = f(factor);
        }
        Self { ratings }
    }

    /// Rating of a factor.
    #[must_use]
    pub const fn get(&self, factor: FactorId) -> Rating {
        self.ratings[factor.index()]
    }

    /// Copy with one factor replaced.
    #[must_use]
    pub const fn with(mut self, factor: FactorId, rating: Rating) -> Self {
        self.ratings[factor.index()] = rating;
        self
    }

    /// All factors with their rating, in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (FactorId, Rating)> + '_ {
        FactorId::ALL.into_iter().map(|f| (f, self.get(f)))
    }

    /// Factors of one role with their rating, in catalog order.
    pub fn by_role(&self, role: FactorRole) -> impl Iterator<Item = (FactorId, Rating)> + '_ {
        self.iter().filter(move |(f, _)| f.role() == role)
    }
}

impl From<RatingSnapshot> for FactorSet {
    fn from(snapshot: RatingSnapshot) -> Self {
        Self {
            ratings: snapshot.iter().map(|(f, r)| (f, Some(r))).collect(),
        }
    }
}

impl Serialize for RatingSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FACTOR_COUNT))?;
        for (factor, rating) in self.iter() {
            map.serialize_entry(&factor, &rating)?;
        }
        map.end()
    }
}

// =============================================================================
// PROFILE
// =============================================================================

/// One row of the profile summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileEntry {
    pub factor: FactorId,
    pub name: &'static str,
    pub role: FactorRole,
    pub rating: Option<Rating>,
    /// Level summary, or the "Not yet rated" placeholder.
    pub summary: &'static str,
    pub sentiment: Option<Sentiment>,
}

impl ProfileEntry {
    /// Build the row for one factor.
    #[must_use]
    pub fn new(factor: FactorId, rating: Option<Rating>) -> Self {
        Self {
            factor,
            name: factor.name(),
            role: factor.role(),
            rating,
            summary: rating
                .map(|r| factor.level_summary(r))
                .unwrap_or(NOT_YET_RATED),
            sentiment: rating.map(|r| factor.sentiment(r)),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn rating(value: i64) -> Rating {
        Rating::new(value).unwrap_or(Rating::MIDPOINT)
    }

    #[test]
    fn new_set_has_nine_unrated_factors() {
        let set = FactorSet::new();
        assert_eq!(set.iter().count(), FACTOR_COUNT);
        assert_eq!(set.rated_count(), 0);
        assert!(!set.is_complete());
        assert_eq!(set.missing(), FactorId::ALL.to_vec());
    }

    #[test]
    fn apply_returns_previous_rating() {
        let mut set = FactorSet::new();
        assert_eq!(set.set(FactorId::Network, rating(4)), None);
        assert_eq!(set.set(FactorId::Network, rating(2)), Some(rating(4)));
        assert_eq!(set.clear(FactorId::Network), Some(rating(2)));
        assert_eq!(set.rating(FactorId::Network), None);
        assert_eq!(set.iter().count(), FACTOR_COUNT);
    }

    #[test]
    fn rate_rejects_invalid_and_keeps_state() {
        let mut set = FactorSet::new();
        set.rate(FactorId::Technology, 5).unwrap_or_default();

        let result = set.rate(FactorId::Technology, 6);
        assert_eq!(result, Err(AssessmentError::InvalidRating { value: 6 }));
        assert_eq!(set.rating(FactorId::Technology), Some(rating(5)));
    }

    #[test]
    fn resolve_requires_all_by_default() {
        let mut set = FactorSet::filled(rating(4));
        set.clear(FactorId::HumanCapital);
        set.clear(FactorId::StrategyBarrier);

        let result = set.resolve(MissingRatingPolicy::default());
        assert_eq!(
            result,
            Err(AssessmentError::IncompleteInput {
                missing: vec![FactorId::HumanCapital, FactorId::StrategyBarrier]
            })
        );
    }

    #[test]
    fn resolve_midpoint_fills_gaps() {
        let mut set = FactorSet::new();
        set.set(FactorId::Innovation, rating(5));

        let snapshot = set.resolve(MissingRatingPolicy::Midpoint);
        let snapshot = snapshot.unwrap_or(RatingSnapshot::uniform(Rating::MIN));
        assert_eq!(snapshot.get(FactorId::Innovation), rating(5));
        assert_eq!(snapshot.get(FactorId::Network), Rating::MIDPOINT);
        assert_eq!(snapshot.get(FactorId::StrategyBarrier), Rating::MIDPOINT);
    }

    #[test]
    fn from_named_values_parses_and_validates() {
        let set = FactorSet::from_named_values([("innovation", Some(4)), ("network", None)]);
        let set = set.unwrap_or_default();
        assert_eq!(set.rating(FactorId::Innovation), Some(rating(4)));
        assert_eq!(set.rated_count(), 1);

        let unknown = FactorSet::from_named_values([("charisma", Some(3))]);
        assert!(matches!(unknown, Err(AssessmentError::UnknownFactor { .. })));

        let invalid = FactorSet::from_named_values([("innovation", Some(0))]);
        assert_eq!(invalid, Err(AssessmentError::InvalidRating { value: 0 }));
    }

    #[test]
    fn profile_marks_unrated() {
        let mut set = FactorSet::new();
        set.set(FactorId::FinancialBarrier, rating(1));

        let profile = set.profile();
        assert_eq!(profile.len(), FACTOR_COUNT);

        let innovation = &profile[FactorId::Innovation.index()];
        assert_eq!(innovation.rating, None);
        assert_eq!(innovation.summary, NOT_YET_RATED);
        assert_eq!(innovation.sentiment, None);

        let barrier = &profile[FactorId::FinancialBarrier.index()];
        assert_eq!(barrier.rating, Some(rating(1)));
        assert_eq!(barrier.sentiment, Some(Sentiment::Favorable));
        assert!(barrier.summary.starts_with("no significant constraint"));
    }

    #[test]
    fn policy_parsing() {
        assert_eq!("require-all".parse::<MissingRatingPolicy>(), Ok(MissingRatingPolicy::RequireAll));
        assert_eq!("Midpoint".parse::<MissingRatingPolicy>(), Ok(MissingRatingPolicy::Midpoint));
        assert!("lenient".parse::<MissingRatingPolicy>().is_err());
    }

    #[test]
    fn serializes_in_catalog_order() {
        let mut set = FactorSet::new();
        set.set(FactorId::StrategyBarrier, rating(2));
        let json = serde_json::to_string(&set).unwrap_or_default();
        assert!(json.starts_with("{\"innovation\":null"));
        assert!(json.ends_with("\"strategy_barrier\":2}"));
    }

    #[test]
    fn snapshot_roundtrips_through_factor_set() {
        let snapshot = RatingSnapshot::from_fn(|f| if f.is_barrier() { rating(2) } else { rating(4) });
        let set = FactorSet::from(snapshot);
        assert!(set.is_complete());
        assert_eq!(set.resolve(MissingRatingPolicy::RequireAll), Ok(snapshot));
    }
}
