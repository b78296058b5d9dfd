//! # VRIO Classification
//!
//! Derives a Valuable / Rare / Inimitable / Organized matrix for five
//! resources from the ratings of five supporting factors.
//!
//! Every resource has its own hand-authored thresholds, so the rules live in
//! one data table ([`VRIO_RULES`]) instead of branching code. Each cell is a
//! step function of a single rating.

use crate::factor::FactorId;
use crate::factor_set::RatingSnapshot;
use crate::primitives::Rating;
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// RESOURCES
// =============================================================================

/// A resource assessed in the VRIO table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VrioResource {
    Innovation,
    HumanCapital,
    FinancialResources,
    Network,
    Technology,
}

impl VrioResource {
    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Innovation => "Innovation",
            Self::HumanCapital => "Human capital",
            Self::FinancialResources => "Financial resources",
            Self::Network => "Network",
            Self::Technology => "Technology",
        }
    }
}

impl fmt::Display for VrioResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// RULE TABLE
// =============================================================================

/// A threshold predicate over one rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Criterion {
    /// Holds when the rating is at least the value.
    AtLeast(u8),
    /// Holds only at exactly the value.
    Exactly(u8),
    /// Never holds.
    Never,
}

impl Criterion {
    /// Evaluate against a rating.
    #[must_use]
    pub const fn holds(self, rating: Rating) -> bool {
        match self {
            Self::AtLeast(min) => rating.value() >= min,
            Self::Exactly(value) => rating.value() == value,
            Self::Never => false,
        }
    }
}

/// Thresholds for one resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VrioRule {
    pub resource: VrioResource,
    /// The factor whose rating drives this row.
    pub source: FactorId,
    pub valuable: Criterion,
    pub rare: Criterion,
    pub inimitable: Criterion,
    pub organized: Criterion,
}

impl VrioRule {
    /// Evaluate the rule for a rating.
    #[must_use]
    pub const fn evaluate(&self, rating: Rating) -> VrioRow {
        VrioRow {
            resource: self.resource,
            source: self.source,
            rating,
            valuable: self.valuable.holds(rating),
            rare: self.rare.holds(rating),
            inimitable: self.inimitable.holds(rating),
            organized: self.organized.holds(rating),
        }
    }
}

/// The VRIO rule table, one row per resource.
///
/// Financial resources are never rare or inimitable; technology is widely
/// available and never inimitable; a strong network is hard to copy.
pub const VRIO_RULES: [VrioRule; 5] = [
    VrioRule {
        resource: VrioResource::Innovation,
        source: FactorId::Innovation,
        valuable: Criterion::AtLeast(3),
        rare: Criterion::AtLeast(4),
        inimitable: Criterion::Exactly(5),
        organized: Criterion::AtLeast(4),
    },
    VrioRule {
        resource: VrioResource::HumanCapital,
        source: FactorId::HumanCapital,
        valuable: Criterion::AtLeast(3),
        rare: Criterion::AtLeast(4),
        inimitable: Criterion::Exactly(5),
        organized: Criterion::AtLeast(4),
    },
    VrioRule {
        resource: VrioResource::FinancialResources,
        source: FactorId::FinancialStability,
        valuable: Criterion::AtLeast(3),
        rare: Criterion::Never,
        inimitable: Criterion::Never,
        organized: Criterion::AtLeast(3),
    },
    VrioRule {
        resource: VrioResource::Network,
        source: FactorId::Network,
        valuable: Criterion::AtLeast(3),
        rare: Criterion::AtLeast(4),
        inimitable: Criterion::AtLeast(4),
        organized: Criterion::AtLeast(3),
    },
    VrioRule {
        resource: VrioResource::Technology,
        source: FactorId::Technology,
        valuable: Criterion::AtLeast(3),
        rare: Criterion::AtLeast(4),
        inimitable: Criterion::Never,
        organized: Criterion::AtLeast(3),
    },
];

/// Look up the rule for a resource.
#[must_use]
pub fn rule_for(resource: VrioResource) -> &'static VrioRule {
    // VRIO_RULES is ordered like VrioResource.
    &VRIO_RULES[resource as usize]
}

// =============================================================================
// ROWS AND IMPLICATIONS
// =============================================================================

/// What a VRIO row means for competitive position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompetitiveImplication {
    SustainedAdvantage,
    TemporaryAdvantage,
    CompetitiveParity,
    CompetitiveDisadvantage,
}

impl CompetitiveImplication {
    /// Lowercase label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::SustainedAdvantage => "sustained advantage",
            Self::TemporaryAdvantage => "temporary advantage",
            Self::CompetitiveParity => "competitive parity",
            Self::CompetitiveDisadvantage => "competitive disadvantage",
        }
    }

    /// One-sentence reading of the implication.
    #[must_use]
    pub const fn explanation(self) -> &'static str {
        match self {
            Self::SustainedAdvantage => {
                "Can provide a lasting edge in international markets that competitors find hard to erode."
            }
            Self::TemporaryAdvantage => {
                "Gives an edge until competitors build a similar resource; keep developing it."
            }
            Self::CompetitiveParity => {
                "Keeps pace with the market but does not set the company apart on its own."
            }
            Self::CompetitiveDisadvantage => {
                "In its current form it may be a weakness or of limited relevance abroad."
            }
        }
    }
}

impl fmt::Display for CompetitiveImplication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One row of the VRIO matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VrioRow {
    pub resource: VrioResource,
    pub source: FactorId,
    pub rating: Rating,
    pub valuable: bool,
    pub rare: bool,
    pub inimitable: bool,
    pub organized: bool,
}

impl VrioRow {
    /// The four criteria in V, R, I, O order.
    #[must_use]
    pub const fn criteria(&self) -> (bool, bool, bool, bool) {
        (self.valuable, self.rare, self.inimitable, self.organized)
    }

    /// Composite implication; the first matching case wins.
    #[must_use]
    pub const fn implication(&self) -> CompetitiveImplication {
        match self.criteria() {
            (true, true, true, true) => CompetitiveImplication::SustainedAdvantage,
            (true, true, _, true) => CompetitiveImplication::TemporaryAdvantage,
            (true, _, _, true) => CompetitiveImplication::CompetitiveParity,
            _ => CompetitiveImplication::CompetitiveDisadvantage,
        }
    }
}

/// The full 5x4 VRIO matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VrioMatrix {
    pub rows: Vec<VrioRow>,
}

impl VrioMatrix {
    /// Evaluate every rule against a snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: &RatingSnapshot) -> Self {
        Self {
            rows: VRIO_RULES
                .iter()
                .map(|rule| rule.evaluate(snapshot.get(rule.source)))
                .collect(),
        }
    }

    /// Row for a resource.
    #[must_use]
    pub fn row(&self, resource: VrioResource) -> Option<&VrioRow> {
        self.rows.iter().find(|r| r.resource == resource)
    }

    /// Rows with their implication.
    pub fn implications(&self) -> impl Iterator<Item = (&VrioRow, CompetitiveImplication)> {
        self.rows.iter().map(|r| (r, r.implication()))
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

    fn row(resource: VrioResource, value: i64) -> VrioRow {
        rule_for(resource).evaluate(rating(value))
    }

    #[test]
    fn rule_table_is_ordered_by_resource() {
        for (i, rule) in VRIO_RULES.iter().enumerate() {
            assert_eq!(rule.resource as usize, i);
        }
    }

    #[test]
    fn innovation_rows() {
        assert_eq!(row(VrioResource::Innovation, 5).criteria(), (true, true, true, true));
        assert_eq!(row(VrioResource::Innovation, 4).criteria(), (true, true, false, true));
        assert_eq!(row(VrioResource::Innovation, 3).criteria(), (true, false, false, false));
        assert_eq!(row(VrioResource::Innovation, 1).criteria(), (false, false, false, false));
    }

    #[test]
    fn human_capital_matches_innovation() {
        for r in 1..=5 {
            assert_eq!(
                row(VrioResource::HumanCapital, r).criteria(),
                row(VrioResource::Innovation, r).criteria()
            );
        }
    }

    #[test]
    fn financial_resources_never_rare_or_inimitable() {
        for r in 1..=5 {
            let row = row(VrioResource::FinancialResources, r);
            assert!(!row.rare);
            assert!(!row.inimitable);
            assert_eq!(row.valuable, r >= 3);
            assert_eq!(row.organized, r >= 3);
        }
    }

    #[test]
    fn network_rows() {
        assert_eq!(row(VrioResource::Network, 4).criteria(), (true, true, true, true));
        assert_eq!(row(VrioResource::Network, 3).criteria(), (true, false, false, true));
        assert_eq!(row(VrioResource::Network, 2).criteria(), (false, false, false, false));
    }

    #[test]
    fn technology_never_inimitable() {
        assert_eq!(row(VrioResource::Technology, 5).criteria(), (true, true, false, true));
        assert_eq!(row(VrioResource::Technology, 3).criteria(), (true, false, false, true));
    }

    #[test]
    fn implication_priority() {
        assert_eq!(
            row(VrioResource::Innovation, 5).implication(),
            CompetitiveImplication::SustainedAdvantage
        );
        assert_eq!(
            row(VrioResource::Technology, 4).implication(),
            CompetitiveImplication::TemporaryAdvantage
        );
        assert_eq!(
            row(VrioResource::FinancialResources, 5).implication(),
            CompetitiveImplication::CompetitiveParity
        );
        // Valuable but not organized
        assert_eq!(
            row(VrioResource::Innovation, 3).implication(),
            CompetitiveImplication::CompetitiveDisadvantage
        );
        assert_eq!(
            row(VrioResource::Network, 1).implication(),
            CompetitiveImplication::CompetitiveDisadvantage
        );
    }

    #[test]
    fn matrix_reads_source_factors() {
        let snapshot = RatingSnapshot::uniform(rating(1))
            .with(FactorId::Network, rating(5))
            .with(FactorId::StrategyBarrier, rating(5));
        let matrix = VrioMatrix::from_snapshot(&snapshot);

        assert_eq!(matrix.rows.len(), 5);
        let network = matrix.row(VrioResource::Network).map(|r| r.criteria());
        assert_eq!(network, Some((true, true, true, true)));
        let innovation = matrix.row(VrioResource::Innovation).map(|r| r.criteria());
        assert_eq!(innovation, Some((false, false, false, false)));
    }

    #[test]
    fn barrier_ratings_do_not_affect_matrix() {
        let base = RatingSnapshot::uniform(rating(4));
        let shifted = base
            .with(FactorId::FinancialBarrier, rating(1))
            .with(FactorId::DigitalCompetencyBarrier, rating(5));
        assert_eq!(VrioMatrix::from_snapshot(&base), VrioMatrix::from_snapshot(&shifted));
    }
}
