//! # Errors
//!
//! Validation failures at the scoring-engine boundary.
//!
//! Errors are raised when a rating is accepted or when a score is requested,
//! never later. The classifiers are total and have no error cases.

use crate::factor::FactorId;
use thiserror::Error;

/// Errors produced while accepting ratings or computing a score.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssessmentError {
    /// A rating outside the 1-5 scale.
    #[error("invalid rating {value}: ratings must be whole numbers from 1 to 5")]
    InvalidRating { value: i64 },

    /// A score was requested while ratings are missing.
    #[error(
        "incomplete input: {} factor(s) not yet rated: {}",
        .missing.len(),
        FactorId::join(.missing)
    )]
    IncompleteInput { missing: Vec<FactorId> },

    /// A factor name that is not one of the nine fixed factors.
    #[error("unknown factor '{name}'")]
    UnknownFactor { name: String },
}

impl AssessmentError {
    /// Check if this error means the caller has more ratings to supply.
    #[must_use]
    pub fn is_incomplete(&self) -> bool {
        matches!(self, Self::IncompleteInput { .. })
    }
}
