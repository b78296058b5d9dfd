//! # Assessment
//!
//! One respondent's assessment: a [`FactorSet`] plus the
//! [`MissingRatingPolicy`] used whenever a result is requested.
//!
//! Nothing is cached. Every read resolves the current ratings into a fresh
//! [`RatingSnapshot`] and recomputes from it.

use crate::advice::TierAdvice;
use crate::error::AssessmentError;
use crate::factor::FactorId;
use crate::factor_set::{FactorSet, MissingRatingPolicy, ProfileEntry, RatingSnapshot, RatingUpdate};
use crate::primitives::Rating;
use crate::report::AssessmentReport;
use crate::scoring::{Contribution, PotentialScore, ScoreBreakdown, ScoringEngine};
use crate::tier::PotentialTier;
use crate::vrio::VrioMatrix;
use serde::Serialize;

/// Ratings and policy for one session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Assessment {
    ratings: FactorSet,
    policy: MissingRatingPolicy,
}

impl Assessment {
    /// An empty assessment under `policy`.
    #[must_use]
    pub fn new(policy: MissingRatingPolicy) -> Self {
        Self {
            ratings: FactorSet::new(),
            policy,
        }
    }

    /// Wrap an existing set of ratings.
    #[must_use]
    pub fn with_ratings(ratings: FactorSet, policy: MissingRatingPolicy) -> Self {
        Self { ratings, policy }
    }

    #[must_use]
    pub fn policy(&self) -> MissingRatingPolicy {
        self.policy
    }

    #[must_use]
    pub fn ratings(&self) -> &FactorSet {
        &self.ratings
    }

    // -------------------------------------------------------------------------
    // Updates
    // -------------------------------------------------------------------------

    /// Apply an update event. Returns the previous rating.
    pub fn apply(&mut self, update: RatingUpdate) -> Option<Rating> {
        self.ratings.apply(update)
    }

    /// Validate and set a raw rating.
    pub fn rate(&mut self, factor: FactorId, value: i64) -> Result<(), AssessmentError> {
        self.ratings.rate(factor, value)
    }

    /// Reset a factor to unrated.
    pub fn clear(&mut self, factor: FactorId) -> Option<Rating> {
        self.ratings.clear(factor)
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    /// Profile rows; never fails.
    #[must_use]
    pub fn profile(&self) -> Vec<ProfileEntry> {
        self.ratings.profile()
    }

    /// Resolve the current ratings under the session policy.
    pub fn snapshot(&self) -> Result<RatingSnapshot, AssessmentError> {
        self.ratings.resolve(self.policy)
    }

    pub fn score(&self) -> Result<PotentialScore, AssessmentError> {
        Ok(ScoringEngine::potential(&self.snapshot()?))
    }

    pub fn tier(&self) -> Result<PotentialTier, AssessmentError> {
        Ok(self.score()?.tier())
    }

    pub fn contributions(&self) -> Result<Vec<Contribution>, AssessmentError> {
        Ok(ScoringEngine::contributions(&self.snapshot()?))
    }

    /// Potential, tier and contributions together.
    pub fn breakdown(&self) -> Result<ScoreBreakdown, AssessmentError> {
        Ok(ScoringEngine::evaluate(&self.snapshot()?))
    }

    pub fn vrio(&self) -> Result<VrioMatrix, AssessmentError> {
        Ok(VrioMatrix::from_snapshot(&self.snapshot()?))
    }

    pub fn report(&self) -> Result<AssessmentReport, AssessmentError> {
        Ok(AssessmentReport::build(&self.snapshot()?))
    }

    pub fn advice(&self) -> Result<&'static TierAdvice, AssessmentError> {
        Ok(self.tier()?.advice())
    }
}

// =============================================================================
// TESTS
// =============================================================================
