//! Goal achievement analysis over a Monte Carlo batch.

use crate::model::{GoalDefinition, GoalOutcome, TimeToGoal};
use crate::money::{to_f64, to_money};

use super::aggregate::percentile;

/// Monthly rates closer to zero than this use the linear fallback
const ZERO_RATE_EPSILON: f64 = 1e-12;

/// Months of steady contributions needed to reach `target`.
///
/// Solves the future value of an ordinary annuity for `n`:
/// `n = ln(1 + target * r / m) / ln(1 + r)`. With `r` near zero this
/// becomes `target / m`. No contributions, or a negative rate whose
/// asymptote sits below the target, is [`TimeToGoal::Unreachable`].
#[must_use]
pub fn time_to_goal(target: f64, monthly_investment: f64, monthly_rate: f64) -> TimeToGoal {
    if target <= 0.0 {
        return TimeToGoal::Months(0.0);
    }
    if monthly_investment <= 0.0 || !monthly_investment.is_finite() {
        return TimeToGoal::Unreachable;
    }

    if monthly_rate.abs() < ZERO_RATE_EPSILON {
        return TimeToGoal::Months(target / monthly_investment);
    }

    let argument = 1.0 + target * monthly_rate / monthly_investment;
    if argument <= 0.0 {
        return TimeToGoal::Unreachable;
    }

    let months = argument.ln() / (1.0 + monthly_rate).ln();
    if months.is_finite() && months >= 0.0 {
        TimeToGoal::Months(months)
    } else {
        TimeToGoal::Unreachable
    }
}

/// Evaluates goals against one batch of terminal values
#[derive(Debug, Clone, Copy)]
pub struct GoalAnalyzer<'a> {
    /// Terminal values sorted ascending
    sorted_final_values: &'a [f64],
    monthly_investment: f64,
    monthly_rate: f64,
}

impl<'a> GoalAnalyzer<'a> {
    #[must_use]
    pub fn new(sorted_final_values: &'a [f64], monthly_investment: f64, monthly_rate: f64) -> Self {
        Self {
            sorted_final_values,
            monthly_investment,
            monthly_rate,
        }
    }

    /// Analyze a goal whose horizon has already been resolved and validated
    #[must_use]
    pub fn analyze(&self, goal: &GoalDefinition, horizon_years: u32) -> GoalOutcome {
        let target = to_f64(goal.target_amount);
        let n = self.sorted_final_values.len();

        let successes = self
            .sorted_final_values
            .iter()
            .filter(|&&v| v >= target)
            .count();
        let shortfalls: Vec<f64> = self
            .sorted_final_values
            .iter()
            .filter(|&&v| v < target)
            .map(|&v| target - v)
            .collect();

        let success_rate = if n == 0 {
            0.0
        } else {
            successes as f64 * 100.0 / n as f64
        };
        let average_shortfall = if shortfalls.is_empty() {
            0.0
        } else {
            shortfalls.iter().sum::<f64>() / shortfalls.len() as f64
        };

        let median = percentile(self.sorted_final_values, 50.0);
        let achievement_ratio = if target > 0.0 {
            median / target * 100.0
        } else {
            0.0
        };

        let time_to_goal = time_to_goal(target, self.monthly_investment, self.monthly_rate);
        let reachable_within_horizon = time_to_goal
            .months()
            .is_some_and(|m| m <= f64::from(horizon_years) * 12.0);

        GoalOutcome {
            name: goal.name.clone(),
            target_amount: goal.target_amount,
            horizon_years,
            success_rate,
            average_shortfall: to_money(average_shortfall),
            median_achievement: to_money(median),
            achievement_ratio,
            time_to_goal,
            reachable_within_horizon,
        }
    }
}
