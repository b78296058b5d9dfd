//! # RBV Core
//!
//! Deterministic scoring and classification engine for the RBV
//! (resource-based view) SME internationalization indicator.
//!
//! A respondent rates five supporting factors and four barriers on a 1-5
//! scale. From those nine ratings this crate derives:
//!
//! - the internationalization potential (0-100 %, one decimal)
//! - its tier (low / medium / high) with advice text
//! - per-factor contribution points
//! - a VRIO matrix over five resources
//! - a structured report
//!
//! The crate is pure: no I/O, no logging, no floating point in the scoring
//! path, and `BTreeMap` wherever order is observable.
//!
//! ## Example
//!
//! ```
//! use rbv_core::{Assessment, FactorId, MissingRatingPolicy, PotentialTier};
//!
//! let mut assessment = Assessment::new(MissingRatingPolicy::RequireAll);
//! for factor in FactorId::ALL {
//!     assessment.rate(factor, 3)?;
//! }
//! let score = assessment.score()?;
//! assert_eq!(score.to_string(), "50.0");
//! assert_eq!(score.tier(), PotentialTier::Medium);
//! # Ok::<(), rbv_core::AssessmentError>(())
//! ```

pub mod advice;
pub mod assessment;
pub mod error;
pub mod factor;
pub mod factor_set;
pub mod primitives;
pub mod report;
pub mod scoring;
pub mod tier;
pub mod vrio;

pub use advice::{Recommendation, TierAdvice};
pub use assessment::Assessment;
pub use error::AssessmentError;
pub use factor::{FactorId, FactorInfo, FactorRole, Sentiment};
pub use factor_set::{FactorSet, MissingRatingPolicy, ProfileEntry, RatingSnapshot, RatingUpdate};
pub use primitives::{Rating, Tenths};
pub use report::{AssessmentReport, FactorHighlight, VrioFinding};
pub use scoring::{Contribution, PotentialScore, ScoreBreakdown, ScoringEngine};
pub use tier::PotentialTier;
pub use vrio::{CompetitiveImplication, VrioMatrix, VrioResource, VrioRow};
