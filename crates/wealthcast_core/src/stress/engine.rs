//! Deterministic crisis impact and recovery projection.
//!
//! A stress test takes the median outcome of a Monte Carlo evaluation as the
//! portfolio's current value and replays a historical crisis on it:
//!
//! 1. The headline crash is spread over the asset classes with the
//!    [`StressConfig`] multipliers and weighted by the scenario's allocation.
//! 2. The shocked portfolio is projected month by month over the crisis's
//!    recovery window. The expected return ramps back linearly
//!    (`min(1, month / recovery_months)`) while contributions continue.
//! 3. Each goal from the evaluation is re-checked against the loss.
//!
//! Nothing here is random, so the same inputs always give the same result.

use rust_decimal::Decimal;

use crate::config::StressConfig;
use crate::error::{EvalError, ValidationError};
use crate::model::{
    AssetClassImpact, CrisisProfile, GoalImpact, GoalOutcome, ImmediateImpact, RecoveryAnalysis,
    RecoveryPoint, Scenario, SimulationResult, StressRiskMetrics, StressTestResult,
};
use crate::money::{to_f64, to_money};

use super::behavior::BehavioralAdvisor;
use super::catalog::validate_profile;

/// Convert a non-negative month count to whole months, rounding up
fn ceil_months(months: f64) -> Option<u32> {
    if months.is_finite() && months >= 0.0 && months <= f64::from(u32::MAX) {
        Some(months.ceil() as u32)
    } else {
        None
    }
}

/// Spread the crash over the asset classes
fn asset_class_impacts(
    scenario: &Scenario,
    crisis: &CrisisProfile,
    config: &StressConfig,
) -> Vec<AssetClassImpact> {
    let params = &scenario.parameters;
    let crash = crisis.market_crash_percentage;
    [
        ("equity", params.equity_allocation, config.equity_multiplier),
        ("debt", params.debt_allocation, config.debt_multiplier),
        ("alternatives", params.alternatives_allocation, config.alternatives_multiplier),
    ]
    .into_iter()
    .map(|(asset_class, allocation, multiplier)| {
        // An asset class can lose everything but no more
        let impact_percentage = (crash * multiplier).clamp(-100.0, 0.0);
        AssetClassImpact {
            asset_class: asset_class.to_string(),
            allocation,
            impact_percentage,
            contribution: allocation * impact_percentage / 100.0,
        }
    })
    .collect()
}

fn immediate_impact(current_value: f64, breakdown: Vec<AssetClassImpact>) -> ImmediateImpact {
    let loss_percentage = breakdown
        .iter()
        .map(|b| b.contribution)
        .sum::<f64>()
        .clamp(-100.0, 0.0);

    let original_value = to_money(current_value);
    let after = to_money(current_value * (1.0 + loss_percentage / 100.0)).min(original_value);

    ImmediateImpact {
        loss_percentage,
        loss_amount: original_value - after,
        portfolio_value_after_crisis: after,
        original_value,
        breakdown,
    }
}

/// Project the shocked portfolio forward.
///
/// The recorded trajectory covers the crisis's recovery window. If the
/// pre-crisis value is not regained inside it, projection continues at the
/// full expected return for up to `max_extra_months` more.
fn project_recovery(
    original: f64,
    after: f64,
    monthly_rate: f64,
    monthly_investment: f64,
    recovery_months: u32,
    max_extra_months: u32,
) -> RecoveryAnalysis {
    let loss = original - after;
    let mut value = after;
    let mut contributions = 0.0;
    let mut time_to_recover = (loss <= 0.0).then_some(0);
    let mut trajectory = Vec::with_capacity(recovery_months as usize);

    for month in 1..=recovery_months {
        let factor = (f64::from(month) / f64::from(recovery_months)).min(1.0);
        value = value * (1.0 + monthly_rate * factor) + monthly_investment;
        contributions += monthly_investment;

        if time_to_recover.is_none() && value >= original {
            time_to_recover = Some(month);
        }

        let recovery_percentage = if loss > 0.0 {
            (value - after) / loss * 100.0
        } else {
            100.0
        };
        trajectory.push(RecoveryPoint {
            month,
            portfolio_value: to_money(value),
            cumulative_contributions: to_money(contributions),
            recovery_percentage,
        });
    }
    let final_recovered_value = to_money(value);

    if time_to_recover.is_none() {
        for extra in 1..=max_extra_months {
            value = value * (1.0 + monthly_rate) + monthly_investment;
            if value >= original {
                time_to_recover = Some(recovery_months.saturating_add(extra));
                break;
            }
        }
    }

    RecoveryAnalysis {
        trajectory,
        time_to_recover_months: time_to_recover,
        final_recovered_value,
    }
}

/// Months of market growth alone needed to get back to the original value
fn time_to_breakeven(original: f64, after: f64, monthly_rate: f64) -> Option<u32> {
    if after >= original {
        return Some(0);
    }
    if monthly_rate <= 0.0 || after <= 0.0 {
        return None;
    }
    ceil_months((original / after).ln() / (1.0 + monthly_rate).ln())
}

fn goal_impact(goal: &GoalOutcome, loss: f64, after: Decimal, monthly_investment: f64) -> GoalImpact {
    let delay_months = if loss <= 0.0 {
        Some(0)
    } else if monthly_investment > 0.0 {
        ceil_months(loss / monthly_investment)
    } else {
        None
    };

    let horizon_months = f64::from(goal.horizon_years.max(1)) * 12.0;

    GoalImpact {
        goal_name: goal.name.clone(),
        delay_months,
        additional_monthly_contribution: to_money(loss / horizon_months),
        at_risk: after < goal.target_amount,
    }
}

/// Replay `crisis` on the median outcome of `result`.
///
/// `result` must come from evaluating `scenario`. The scenario and the crisis
/// profile are validated before anything is computed.
pub fn stress_test(
    scenario: &Scenario,
    result: &SimulationResult,
    crisis: &CrisisProfile,
    config: &StressConfig,
    advisor: &BehavioralAdvisor,
) -> Result<StressTestResult, EvalError> {
    scenario.validate()?;
    config.validate()?;
    validate_profile(crisis)?;
    if result.scenario_id != scenario.id {
        return Err(ValidationError::ScenarioMismatch {
            scenario: scenario.id.clone(),
            result: result.scenario_id.clone(),
        }
        .into());
    }

    let current_value = to_f64(result.median_value()).max(0.0);
    let breakdown = asset_class_impacts(scenario, crisis, config);
    let immediate_impact = immediate_impact(current_value, breakdown);

    let original = to_f64(immediate_impact.original_value);
    let after = to_f64(immediate_impact.portfolio_value_after_crisis);
    let loss = to_f64(immediate_impact.loss_amount);
    let monthly_rate = scenario.parameters.monthly_return_fraction();
    let monthly_investment = scenario.monthly_investment_f64();

    let recovery_analysis = project_recovery(
        original,
        after,
        monthly_rate,
        monthly_investment,
        crisis.recovery_time_months,
        config.max_recovery_projection_months,
    );

    let goal_impacts = result
        .goal_analysis
        .iter()
        .map(|goal| {
            goal_impact(
                goal,
                loss,
                immediate_impact.portfolio_value_after_crisis,
                monthly_investment,
            )
        })
        .collect();

    let recovery_window = f64::from(crisis.recovery_time_months) * config.recovery_window_fraction;
    let risk_metrics = StressRiskMetrics {
        max_drawdown: -immediate_impact.loss_percentage,
        time_to_breakeven_months: time_to_breakeven(original, after, monthly_rate),
        additional_required_contribution: to_money(loss / recovery_window),
    };

    let behavioral_considerations =
        advisor.advise(immediate_impact.loss_percentage, scenario.parameters.risk_level);

    tracing::debug!(
        scenario = %scenario.id,
        crisis = %crisis.id,
        loss_percentage = immediate_impact.loss_percentage,
        time_to_recover = ?recovery_analysis.time_to_recover_months,
        "Stress test complete"
    );

    Ok(StressTestResult {
        scenario_id: scenario.id.clone(),
        crisis_id: crisis.id.clone(),
        immediate_impact,
        recovery_analysis,
        goal_impacts,
        behavioral_considerations,
        risk_metrics,
    })
}
