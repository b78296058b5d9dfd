//! # Report Module
//!
//! Structured assessment report: the potential with its reading, factor
//! highlights, VRIO findings and the tier headline.
//!
//! The report only selects and orders catalog text. It holds no free-form
//! prose, so the same snapshot always yields the same report.

use crate::factor::{FactorId, FactorRole};
use crate::factor_set::RatingSnapshot;
use crate::primitives::{MAX_HIGHLIGHTS, Rating};
use crate::scoring::{PotentialScore, ScoringEngine};
use crate::tier::PotentialTier;
use crate::vrio::{CompetitiveImplication, VrioMatrix, VrioResource, VrioRow};
use serde::Serialize;
use std::cmp::Reverse;

const RULE_TOP: &str = "┌─────────────────────────────────────┐\n";
const RULE_MID: &str = "├─────────────────────────────────────┤\n";
const RULE_BOTTOM: &str = "└─────────────────────────────────────┘\n";

/// A factor singled out in the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FactorHighlight {
    pub factor: FactorId,
    pub name: &'static str,
    pub rating: Rating,
    pub summary: &'static str,
}

impl FactorHighlight {
    fn new(factor: FactorId, rating: Rating) -> Self {
        Self {
            factor,
            name: factor.name(),
            rating,
            summary: factor.level_summary(rating),
        }
    }
}

/// A VRIO row with its reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VrioFinding {
    pub resource: VrioResource,
    pub valuable: bool,
    pub rare: bool,
    pub inimitable: bool,
    pub organized: bool,
    pub implication: CompetitiveImplication,
    pub explanation: &'static str,
}

impl From<&VrioRow> for VrioFinding {
    fn from(row: &VrioRow) -> Self {
        let implication = row.implication();
        Self {
            resource: row.resource,
            valuable: row.valuable,
            rare: row.rare,
            inimitable: row.inimitable,
            organized: row.organized,
            implication,
            explanation: implication.explanation(),
        }
    }
}

/// The complete assessment report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssessmentReport {
    pub potential: PotentialScore,
    pub tier: PotentialTier,
    pub interpretation: &'static str,
    /// Supporting factors rated 4 or 5, strongest first.
    pub strengths: Vec<FactorHighlight>,
    /// Supporting factors rated 1 or 2, weakest first.
    pub development_areas: Vec<FactorHighlight>,
    /// Barriers rated 1 or 2, mildest first.
    pub favorable_conditions: Vec<FactorHighlight>,
    /// Barriers rated 4 or 5, most severe first.
    pub critical_challenges: Vec<FactorHighlight>,
    pub vrio: Vec<VrioFinding>,
    pub headline: &'static str,
}

impl AssessmentReport {
    /// Build the report for a complete snapshot.
    #[must_use]
    pub fn build(snapshot: &RatingSnapshot) -> Self {
        let potential = ScoringEngine::potential(snapshot);
        let tier = potential.tier();
        let advice = tier.advice();

        Self {
            potential,
            tier,
            interpretation: advice.interpretation,
            strengths: highlights(snapshot, FactorRole::Supporting, |v| v >= 4, true),
            development_areas: highlights(snapshot, FactorRole::Supporting, |v| v <= 2, false),
            favorable_conditions: highlights(snapshot, FactorRole::Barrier, |v| v <= 2, false),
            critical_challenges: highlights(snapshot, FactorRole::Barrier, |v| v >= 4, true),
            vrio: VrioMatrix::from_snapshot(snapshot)
                .rows
                .iter()
                .map(VrioFinding::from)
                .collect(),
            headline: advice.headline,
        }
    }

    /// Format as plain text with the standard template.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut output = String::new();

        output.push_str(RULE_TOP);
        output.push_str("│ POTENTIAL                           │\n");
        output.push_str(&format!(
            "│ - {} % ({} tier)\n│   {}\n",
            self.potential, self.tier, self.interpretation
        ));

        push_highlights(&mut output, "│ STRENGTHS                           │\n", &self.strengths);
        push_highlights(&mut output, "│ DEVELOPMENT AREAS                   │\n", &self.development_areas);
        push_highlights(&mut output, "│ FAVORABLE CONDITIONS                │\n", &self.favorable_conditions);
        push_highlights(&mut output, "│ CRITICAL CHALLENGES                 │\n", &self.critical_challenges);

        output.push_str(RULE_MID);
        output.push_str("│ VRIO FINDINGS                       │\n");
        for finding in &self.vrio {
            output.push_str(&format!(
                "│ - {} [V:{} R:{} I:{} O:{}] {}\n",
                finding.resource,
                mark(finding.valuable),
                mark(finding.rare),
                mark(finding.inimitable),
                mark(finding.organized),
                finding.implication
            ));
        }

        output.push_str(RULE_MID);
        output.push_str("│ NEXT STEPS                          │\n");
        output.push_str(&format!("│ - {}\n", self.headline));
        output.push_str(RULE_BOTTOM);

        output
    }
}

/// Check mark for a VRIO cell.
#[must_use]
pub const fn mark(value: bool) -> &'static str {
    if value { "✓" } else { "✗" }
}

fn highlights(
    snapshot: &RatingSnapshot,
    role: FactorRole,
    select: impl Fn(u8) -> bool,
    strongest_first: bool,
) -> Vec<FactorHighlight> {
    let mut selected: Vec<(FactorId, Rating)> = snapshot
        .by_role(role)
        .filter(|(_, r)| select(r.value()))
        .collect();

    // Stable sorts: ties keep catalog order.
    if strongest_first {
        selected.sort_by_key(|(_, r)| Reverse(*r));
    } else {
        selected.sort_by_key(|(_, r)| *r);
    }

    selected
        .into_iter()
        .take(MAX_HIGHLIGHTS)
        .map(|(f, r)| FactorHighlight::new(f, r))
        .collect()
}

fn push_highlights(output: &mut String, title: &str, items: &[FactorHighlight]) {
    output.push_str(RULE_MID);
    output.push_str(title);
    if items.is_empty() {
        output.push_str("│ - (none)                           │\n");
    } else {
        for item in items {
            output.push_str(&format!(
                "│ - {} ({}/5): {}\n",
                item.name, item.rating, item.summary
            ));
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
