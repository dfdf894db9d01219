//! Goal analysis across full evaluations

use rust_decimal_macros::dec;

use super::fixtures;
use crate::evaluate::Evaluator;
use crate::model::{GoalDefinition, TimeToGoal};
use crate::money::to_f64;

fn ladder() -> Vec<GoalDefinition> {
    [
        dec!(500000),
        dec!(1000000),
        dec!(2500000),
        dec!(5000000),
        dec!(10000000),
        dec!(50000000),
    ]
    .into_iter()
    .enumerate()
    .map(|(i, target)| GoalDefinition::new(format!("Goal {i}"), target, 15))
    .collect()
}

#[test]
fn test_larger_targets_are_harder() {
    let result = Evaluator::new()
        .with_seed(21)
        .evaluate(&fixtures::balanced("b"), &ladder(), 15, 1_000)
        .unwrap();

    let outcomes = &result.goal_analysis;
    assert_eq!(outcomes.len(), 6);
    for pair in outcomes.windows(2) {
        assert!(pair[0].success_rate >= pair[1].success_rate);
        assert!(
            pair[0].time_to_goal.as_months_or_infinity()
                <= pair[1].time_to_goal.as_months_or_infinity()
        );
        assert!(pair[0].achievement_ratio >= pair[1].achievement_ratio);
    }
}

#[test]
fn test_goal_outcome_consistency() {
    let result = Evaluator::new()
        .with_seed(4)
        .evaluate(&fixtures::balanced("b"), &ladder(), 15, 800)
        .unwrap();

    for outcome in &result.goal_analysis {
        assert_eq!(outcome.median_achievement, result.portfolio_value.p50);
        let expected_ratio =
            to_f64(result.portfolio_value.p50) / to_f64(outcome.target_amount) * 100.0;
        assert!((outcome.achievement_ratio - expected_ratio).abs() < 1e-4);

        match outcome.time_to_goal {
            TimeToGoal::Months(months) => {
                assert!(months > 0.0);
                assert_eq!(outcome.reachable_within_horizon, months <= 180.0);
            }
            TimeToGoal::Unreachable => assert!(!outcome.reachable_within_horizon),
        }
        if outcome.success_rate == 100.0 {
            assert_eq!(outcome.average_shortfall, dec!(0));
        }
    }
}

#[test]
fn test_small_goal_reachable_large_goal_not() {
    let result = Evaluator::new()
        .with_seed(8)
        .evaluate(&fixtures::balanced("b"), &ladder(), 15, 500)
        .unwrap();

    // 20,000 a month at 10% reaches 500,000 in about two years
    let small = &result.goal_analysis[0];
    assert!(small.reachable_within_horizon);
    assert!(small.time_to_goal.months().unwrap() < 24.0);
    assert!(small.success_rate > 99.0);

    // 50,000,000 needs well over 15 years of contributions
    let large = &result.goal_analysis[5];
    assert!(!large.reachable_within_horizon);
    assert!(large.success_rate < 1.0);
}
