//! # Advice Catalog
//!
//! Fixed guidance text selected by the potential tier: a headline, a short
//! interpretation of the score, and four practical recommendations.

use crate::tier::PotentialTier;
use serde::Serialize;

/// A titled recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub title: &'static str,
    pub detail: &'static str,
}

/// Guidance for one tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TierAdvice {
    pub tier: PotentialTier,
    pub headline: &'static str,
    pub interpretation: &'static str,
    pub recommendations: &'static [Recommendation],
}

static LOW: TierAdvice = TierAdvice {
    tier: PotentialTier::Low,
    headline: "Low internationalization potential. Strong focus is needed on developing internal resources!",
    interpretation: "This indicates low internationalization potential. The business currently needs \
        significant internal development and a reduction of its barriers before entering foreign \
        markets.",
    recommendations: &[
        Recommendation {
            title: "Strengthen the financial foundations",
            detail: "Review preferential loans and national or EU grant schemes, and build a realistic \
                budget for the first foreign-market steps.",
        },
        Recommendation {
            title: "Expand market knowledge and competencies",
            detail: "Start targeted research on potential target countries, covering competitors, \
                local customers, regulation and cultural differences.",
        },
        Recommendation {
            title: "Strengthen digital readiness and online presence",
            detail: "Invest in multilingual e-commerce and online marketing, and make the company \
                discoverable to foreign buyers.",
        },
        Recommendation {
            title: "Develop internal resources and capabilities",
            detail: "Identify the key resources rated low, such as innovation capacity or human \
                capital, and draw up a concrete development plan for them.",
        },
    ],
};

static MEDIUM: TierAdvice = TierAdvice {
    tier: PotentialTier::Medium,
    headline: "Medium internationalization potential. You have strengths, but overcoming the barriers is critical!",
    interpretation: "This shows medium internationalization potential. The business has strengths \
        to build on, but several areas still need attention for successful and sustainable \
        expansion.",
    recommendations: &[
        Recommendation {
            title: "Innovation and product development with an international focus",
            detail: "Adapt products and services to the specific needs and expectations of the \
                chosen target markets.",
        },
        Recommendation {
            title: "Targeted development of human capital",
            detail: "Provide training and language courses focused on international business \
                communication, negotiation and intercultural skills.",
        },
        Recommendation {
            title: "Deliberate network building and partner search",
            detail: "Take part in international business forums, trade fairs and exhibitions to \
                meet distributors and strategic partners.",
        },
        Recommendation {
            title: "Proactive handling of barriers",
            detail: "Identify the barriers that carry medium or high risk and prepare concrete \
                strategies to reduce or manage them.",
        },
    ],
};

static HIGH: TierAdvice = TierAdvice {
    tier: PotentialTier::High,
    headline: "High internationalization potential! Focus on sustainable growth and on securing a market-leading position.",
    interpretation: "This indicates high internationalization potential. The business has strong \
        foundations for international expansion and good chances in foreign markets; the task is \
        to keep and exploit this advantage.",
    recommendations: &[
        Recommendation {
            title: "Form strategic partnerships and alliances",
            detail: "Look for long-term, mutually beneficial alliances in the target markets, such \
                as reliable distributors or joint ventures.",
        },
        Recommendation {
            title: "Continuous innovation toward market leadership",
            detail: "Stay ahead of technology and market trends and collect customer feedback \
                systematically.",
        },
        Recommendation {
            title: "Refine risk management and diversify",
            detail: "Manage currency, political and legal risks consistently and spread activity \
                across several markets.",
        },
        Recommendation {
            title: "Build the brand and international presence",
            detail: "Invest in international brand awareness and a positive company image in the \
                target markets.",
        },
    ],
};

/// Advice for a tier.
#[must_use]
pub fn for_tier(tier: PotentialTier) -> &'static TierAdvice {
    match tier {
        PotentialTier::Low => &LOW,
        PotentialTier::Medium => &MEDIUM,
        PotentialTier::High => &HIGH,
    }
}
