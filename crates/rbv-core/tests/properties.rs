//! Property tests for the scoring engine and classifiers.

#![allow(clippy::unwrap_used, clippy::panic)]

use proptest::prelude::*;
use rbv_core::{
    Assessment, CompetitiveImplication, FactorId, FactorRole, MissingRatingPolicy, PotentialTier,
    Rating, RatingSnapshot, RatingUpdate, ScoringEngine, VrioMatrix, VrioResource,
};

fn rating() -> impl Strategy<Value = Rating> {
    (1i64..=5).prop_map(|v| Rating::new(v).unwrap())
}

fn snapshot() -> impl Strategy<Value = RatingSnapshot> {
    prop::array::uniform9(rating()).prop_map(|ratings| {
        RatingSnapshot::from_fn(|f| ratings[f.index()])
    })
}

fn factor() -> impl Strategy<Value = FactorId> {
    (0usize..FactorId::ALL.len()).prop_map(|i| FactorId::ALL[i])
}

proptest! {
    #[test]
    fn potential_stays_in_bounds(s in snapshot()) {
        let score = ScoringEngine::potential(&s);
        prop_assert!(score.tenths() <= 1000);
        // Every reachable score is a multiple of 0.5.
        prop_assert_eq!(score.tenths() % 5, 0);
    }

    #[test]
    fn potential_is_monotone_per_factor(s in snapshot(), f in factor()) {
        let current = s.get(f);
        if current < Rating::MAX {
            let raised = Rating::new(i64::from(current.value()) + 1).unwrap();
            let before = ScoringEngine::potential(&s);
            let after = ScoringEngine::potential(&s.with(f, raised));
            match f.role() {
                FactorRole::Supporting => prop_assert!(after >= before),
                FactorRole::Barrier => prop_assert!(after <= before),
            }
        }
    }

    #[test]
    fn tier_agrees_with_percent(s in snapshot()) {
        let score = ScoringEngine::potential(&s);
        prop_assert_eq!(score.tier(), PotentialTier::from_percent(score.percent()));
    }

    #[test]
    fn contributions_are_bounded_and_signed(s in snapshot()) {
        for c in ScoringEngine::contributions(&s) {
            prop_assert!((-100..=100).contains(&c.points.raw()));
            match c.role {
                FactorRole::Supporting => prop_assert!(c.points.raw() >= 0),
                FactorRole::Barrier => prop_assert!(c.points.raw() <= 0),
            }
        }
    }

    #[test]
    fn evaluation_is_idempotent(s in snapshot()) {
        prop_assert_eq!(ScoringEngine::evaluate(&s), ScoringEngine::evaluate(&s));
        prop_assert_eq!(VrioMatrix::from_snapshot(&s), VrioMatrix::from_snapshot(&s));
    }

    #[test]
    fn mutate_and_revert_restores_potential(s in snapshot(), f in factor(), r in rating()) {
        let mut assessment = Assessment::new(MissingRatingPolicy::RequireAll);
        for (factor, rating) in s.iter() {
            assessment.apply(RatingUpdate::set(factor, rating));
        }
        let before = assessment.score().unwrap();

        let previous = assessment.apply(RatingUpdate::set(f, r)).unwrap();
        assessment.apply(RatingUpdate::set(f, previous));

        prop_assert_eq!(assessment.score().unwrap(), before);
    }

    #[test]
    fn financial_resources_never_rare_or_inimitable(s in snapshot()) {
        let matrix = VrioMatrix::from_snapshot(&s);
        let row = matrix.row(VrioResource::FinancialResources).unwrap();
        prop_assert!(!row.rare);
        prop_assert!(!row.inimitable);
        prop_assert_ne!(row.implication(), CompetitiveImplication::SustainedAdvantage);
    }

    #[test]
    fn midpoint_policy_matches_explicit_threes(f in factor(), r in rating()) {
        let mut partial = Assessment::new(MissingRatingPolicy::Midpoint);
        partial.apply(RatingUpdate::set(f, r));

        let explicit = RatingSnapshot::uniform(Rating::MIDPOINT).with(f, r);
        prop_assert_eq!(partial.score().unwrap(), ScoringEngine::potential(&explicit));
    }
}

#[test]
fn reference_profiles() {
    let score = |v| ScoringEngine::potential(&RatingSnapshot::uniform(Rating::new(v).unwrap()));
    assert_eq!(score(1).to_string(), "40.0");
    assert_eq!(score(3).to_string(), "50.0");
    assert_eq!(score(5).to_string(), "60.0");
}

#[test]
fn extreme_profiles() {
    let worst = RatingSnapshot::from_fn(|f| if f.is_barrier() { Rating::MAX } else { Rating::MIN });
    let best = RatingSnapshot::from_fn(|f| if f.is_barrier() { Rating::MIN } else { Rating::MAX });
    assert_eq!(ScoringEngine::potential(&worst).to_string(), "0.0");
    assert_eq!(ScoringEngine::potential(&best).to_string(), "100.0");
}

#[test]
fn innovation_vrio_reference_rows() {
    let row = |v| {
        let s = RatingSnapshot::uniform(Rating::MIN).with(FactorId::Innovation, Rating::new(v).unwrap());
        *VrioMatrix::from_snapshot(&s).row(VrioResource::Innovation).unwrap()
    };
    assert_eq!(row(5).criteria(), (true, true, true, true));
    assert_eq!(row(3).criteria(), (true, false, false, false));
    assert_eq!(row(1).criteria(), (false, false, false, false));
}
