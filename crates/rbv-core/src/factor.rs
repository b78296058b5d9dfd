//! # Factor Catalog
//!
//! The nine fixed factors of the assessment, their roles and the
//! descriptive text of every rating level.
//!
//! Supporting factors rate an internal capability: a higher rating means
//! more readiness. Barrier factors rate the severity of an obstacle: a
//! higher rating means less readiness.

use crate::error::AssessmentError;
use crate::primitives::Rating;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of factors in the assessment.
pub const FACTOR_COUNT: usize = 9;

/// Number of supporting factors.
pub const SUPPORTING_COUNT: u32 = 5;

/// Number of barrier factors.
pub const BARRIER_COUNT: u32 = 4;

/// Placeholder shown for a factor that has not been rated.
pub const NOT_YET_RATED: &str = "Not yet rated";

// =============================================================================
// ROLE
// =============================================================================

/// Whether a factor helps or hinders internationalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorRole {
    /// Higher rating increases readiness.
    Supporting,
    /// Higher rating decreases readiness.
    Barrier,
}

impl FactorRole {
    /// Lowercase label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Supporting => "supporting",
            Self::Barrier => "barrier",
        }
    }
}

impl fmt::Display for FactorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// SENTIMENT
// =============================================================================

/// How favorable a single rating is for internationalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Unfavorable,
    Neutral,
    Favorable,
}

impl Sentiment {
    /// Display color (red / amber / green).
    #[must_use]
    pub const fn color_hex(self) -> &'static str {
        match self {
            Self::Unfavorable => "#dc3545",
            Self::Neutral => "#ffc107",
            Self::Favorable => "#28a745",
        }
    }

    /// Lowercase label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Unfavorable => "unfavorable",
            Self::Neutral => "neutral",
            Self::Favorable => "favorable",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// FACTOR IDENTIFIERS
// =============================================================================

/// One of the nine fixed factors, in catalog order.
///
/// The derived `Ord` follows catalog order, so every `BTreeMap` keyed by
/// `FactorId` iterates supporting factors first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorId {
    Innovation,
    HumanCapital,
    FinancialStability,
    Network,
    Technology,
    FinancialBarrier,
    MarketKnowledgeBarrier,
    DigitalCompetencyBarrier,
    StrategyBarrier,
}

impl FactorId {
    /// All factors in catalog order.
    pub const ALL: [Self; FACTOR_COUNT] = [
        Self::Innovation,
        Self::HumanCapital,
        Self::FinancialStability,
        Self::Network,
        Self::Technology,
        Self::FinancialBarrier,
        Self::MarketKnowledgeBarrier,
        Self::DigitalCompetencyBarrier,
        Self::StrategyBarrier,
    ];

    /// Position in [`FactorId::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The factor's role.
    #[must_use]
    pub const fn role(self) -> FactorRole {
        match self {
            Self::Innovation
            | Self::HumanCapital
            | Self::FinancialStability
            | Self::Network
            | Self::Technology => FactorRole::Supporting,
            Self::FinancialBarrier
            | Self::MarketKnowledgeBarrier
            | Self::DigitalCompetencyBarrier
            | Self::StrategyBarrier => FactorRole::Barrier,
        }
    }

    /// Check if this is a barrier factor.
    #[must_use]
    pub const fn is_barrier(self) -> bool {
        matches!(self.role(), FactorRole::Barrier)
    }

    /// Stable machine identifier (matches the serde name).
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Innovation => "innovation",
            Self::HumanCapital => "human_capital",
            Self::FinancialStability => "financial_stability",
            Self::Network => "network",
            Self::Technology => "technology",
            Self::FinancialBarrier => "financial_barrier",
            Self::MarketKnowledgeBarrier => "market_knowledge_barrier",
            Self::DigitalCompetencyBarrier => "digital_competency_barrier",
            Self::StrategyBarrier => "strategy_barrier",
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Innovation => "Innovation capability",
            Self::HumanCapital => "Human capital and expertise",
            Self::FinancialStability => "Financial stability",
            Self::Network => "Network and partner cooperation",
            Self::Technology => "Technological sophistication",
            Self::FinancialBarrier => "Limited financial resources",
            Self::MarketKnowledgeBarrier => "Lack of market knowledge",
            Self::DigitalCompetencyBarrier => "Insufficient digital competencies",
            Self::StrategyBarrier => "Management and strategic shortcomings",
        }
    }

    /// Compact label for chart axes.
    #[must_use]
    pub const fn short_label(self) -> &'static str {
        match self {
            Self::Innovation => "Innovation",
            Self::HumanCapital => "Human capital",
            Self::FinancialStability => "Financial stab.",
            Self::Network => "Network",
            Self::Technology => "Tech. sophistication",
            Self::FinancialBarrier => "Financial constr.",
            Self::MarketKnowledgeBarrier => "Market knowl. gap",
            Self::DigitalCompetencyBarrier => "Digital comp. gap",
            Self::StrategyBarrier => "Strategy gaps",
        }
    }

    /// Full description of a rating level ("Level: detail").
    #[must_use]
    pub fn level_description(self, rating: Rating) -> &'static str {
        self.levels()[rating.index()]
    }

    /// The detail part of a level description, without the level prefix.
    #[must_use]
    pub fn level_summary(self, rating: Rating) -> &'static str {
        let full = self.level_description(rating);
        full.split_once(": ").map(|(_, detail)| detail).unwrap_or(full)
    }

    /// Sentiment of a rating for this factor.
    ///
    /// Barrier ratings are read inverted: a low obstacle is favorable.
    #[must_use]
    pub fn sentiment(self, rating: Rating) -> Sentiment {
        let value = rating.value();
        let (low, high) = match self.role() {
            FactorRole::Supporting => (Sentiment::Unfavorable, Sentiment::Favorable),
            FactorRole::Barrier => (Sentiment::Favorable, Sentiment::Unfavorable),
        };
        match value {
            0..=2 => low,
            3 => Sentiment::Neutral,
            _ => high,
        }
    }

    /// Supporting factors in catalog order.
    pub fn supporting() -> impl Iterator<Item = Self> {
        Self::ALL.into_iter().filter(|f| !f.is_barrier())
    }

    /// Barrier factors in catalog order.
    pub fn barriers() -> impl Iterator<Item = Self> {
        Self::ALL.into_iter().filter(|f| f.is_barrier())
    }

    /// Comma-separated identifiers.
    #[must_use]
    pub fn join(factors: &[Self]) -> String {
        factors
            .iter()
            .map(|f| f.id())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn levels(self) -> &'static [&'static str; 5] {
        match self {
            Self::Innovation => &[
                "Very low: no capacity to develop new products or services.",
                "Low: capable of minor, occasional improvements.",
                "Medium: continuously improves its products, but without a market breakthrough.",
                "High: develops innovative solutions that give a competitive edge.",
                "Outstanding: market-leading innovations and frequent breakthroughs.",
            ],
            Self::HumanCapital => &[
                "Very low: lacks international experience and language skills.",
                "Low: only a few staff members have international experience.",
                "Medium: skilled workforce with basic language skills, but no deeper expertise.",
                "High: highly skilled, multilingual team with international experience.",
                "Outstanding: management with exceptional expertise and a global network.",
            ],
            Self::FinancialStability => &[
                "Very low: unstable financial position, short of funds.",
                "Low: struggles to obtain financing, limited capacity to invest.",
                "Medium: stable finances, but larger investments need external funding.",
                "High: favorable financing terms, able to fund larger foreign-market investments.",
                "Outstanding: excellent financial position, significant own funds, easy access to capital.",
            ],
            Self::Network => &[
                "Very low: no international network.",
                "Low: limited, occasional contacts abroad.",
                "Medium: basic international contacts, but no strategic partners.",
                "High: strong international network and stable partner cooperation.",
                "Outstanding: broad global network and active strategic alliances.",
            ],
            Self::Technology => &[
                "Very low: outdated technology, no digital tools.",
                "Low: basic digital tools, but no integrated systems.",
                "Medium: modern but not leading-edge technology, digital processes partly automated.",
                "High: actively uses digital solutions and e-commerce channels.",
                "Outstanding: market-leading technology, full digital transformation, AI and automation.",
            ],
            Self::FinancialBarrier => &[
                "Very low obstacle: no significant constraint, expansion is easy to finance.",
                "Low obstacle: minor financing challenges that can be solved.",
                "Medium obstacle: significant but manageable financial constraints.",
                "High obstacle: financing is difficult and slows expansion.",
                "Severe obstacle: chronic shortage of funds prevents entering foreign markets.",
            ],
            Self::MarketKnowledgeBarrier => &[
                "Very low obstacle: in-depth knowledge of the target markets.",
                "Low obstacle: basic market knowledge with minor gaps.",
                "Medium obstacle: incomplete market knowledge that market research can fill.",
                "High obstacle: significant lack of market knowledge, high risk.",
                "Severe obstacle: no market knowledge at all, market entry likely to fail.",
            ],
            Self::DigitalCompetencyBarrier => &[
                "Very low obstacle: excellent digital competencies and online presence.",
                "Low obstacle: basic digital knowledge with room to improve.",
                "Medium obstacle: partly developed digital competencies, behind competitors.",
                "High obstacle: deficient digital tools and marketing strategies.",
                "Severe obstacle: complete digital backlog, no online presence.",
            ],
            Self::StrategyBarrier => &[
                "Very low obstacle: strong, flexible management with a well-defined strategy.",
                "Low obstacle: competent leadership that needs minor strategic refinement.",
                "Medium obstacle: basic strategic planning, but no international focus.",
                "High obstacle: poor management decisions, rigid strategy abroad.",
                "Severe obstacle: no international strategy and poor risk management.",
            ],
        }
    }
}

// =============================================================================
// CATALOG ENTRY
// =============================================================================

/// Everything a form needs to present one factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FactorInfo {
    pub id: FactorId,
    pub name: &'static str,
    pub short_label: &'static str,
    pub role: FactorRole,
    /// Level descriptions for ratings 1 through 5.
    pub levels: &'static [&'static str; 5],
}

impl FactorId {
    /// Catalog entry for this factor.
    #[must_use]
    pub fn info(self) -> FactorInfo {
        FactorInfo {
            id: self,
            name: self.name(),
            short_label: self.short_label(),
            role: self.role(),
            levels: self.levels(),
        }
    }

    /// The full catalog in order.
    #[must_use]
    pub fn catalog() -> Vec<FactorInfo> {
        Self::ALL.into_iter().map(Self::info).collect()
    }
}

impl fmt::Display for FactorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for FactorId {
    type Err = AssessmentError;

    /// Parse an identifier. Case and `-`/`_` differences are tolerated.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|f| f.id() == normalized)
            .ok_or_else(|| AssessmentError::UnknownFactor { name: s.to_string() })
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
    fn catalog_has_five_supporting_and_four_barriers() {
        assert_eq!(FactorId::supporting().count(), SUPPORTING_COUNT as usize);
        assert_eq!(FactorId::barriers().count(), BARRIER_COUNT as usize);
        assert_eq!(FactorId::ALL.len(), FACTOR_COUNT);
    }

    #[test]
    fn index_matches_catalog_position() {
        for (position, factor) in FactorId::ALL.iter().enumerate() {
            assert_eq!(factor.index(), position);
        }
    }

    #[test]
    fn parse_roundtrips_ids() {
        for factor in FactorId::ALL {
            assert_eq!(factor.id().parse::<FactorId>(), Ok(factor));
        }
        assert_eq!("Human-Capital".parse::<FactorId>(), Ok(FactorId::HumanCapital));
    }

    #[test]
    fn parse_rejects_unknown() {
        assert_eq!(
            "charisma".parse::<FactorId>(),
            Err(AssessmentError::UnknownFactor {
                name: "charisma".into()
            })
        );
    }

    #[test]
    fn serde_name_matches_id() {
        for factor in FactorId::ALL {
            let json = serde_json::to_string(&factor).unwrap_or_default();
            assert_eq!(json, format!("\"{}\"", factor.id()));
        }
    }

    #[test]
    fn every_level_has_summary() {
        for factor in FactorId::ALL {
            for r in Rating::all() {
                let full = factor.level_description(r);
                let summary = factor.level_summary(r);
                assert!(full.len() > summary.len(), "{factor} level {r}");
                assert!(!summary.is_empty());
            }
        }
    }

    #[test]
    fn supporting_sentiment() {
        let f = FactorId::Innovation;
        assert_eq!(f.sentiment(rating(1)), Sentiment::Unfavorable);
        assert_eq!(f.sentiment(rating(2)), Sentiment::Unfavorable);
        assert_eq!(f.sentiment(rating(3)), Sentiment::Neutral);
        assert_eq!(f.sentiment(rating(4)), Sentiment::Favorable);
        assert_eq!(f.sentiment(rating(5)), Sentiment::Favorable);
    }

    #[test]
    fn barrier_sentiment_is_inverted() {
        let f = FactorId::MarketKnowledgeBarrier;
        assert_eq!(f.sentiment(rating(1)), Sentiment::Favorable);
        assert_eq!(f.sentiment(rating(3)), Sentiment::Neutral);
        assert_eq!(f.sentiment(rating(5)), Sentiment::Unfavorable);
    }

    #[test]
    fn join_ids() {
        let joined = FactorId::join(&[FactorId::Innovation, FactorId::FinancialBarrier]);
        assert_eq!(joined, "innovation, financial_barrier");
    }

    #[test]
    fn catalog_lists_every_factor_with_levels() {
        let catalog = FactorId::catalog();
        assert_eq!(catalog.len(), FACTOR_COUNT);
        assert_eq!(catalog[0].id, FactorId::Innovation);
        assert_eq!(catalog[8].role, FactorRole::Barrier);
        assert!(catalog[8].levels[4].starts_with("Severe obstacle"));
    }
}
