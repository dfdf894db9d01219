//! Integration tests for the wealthcast engine
//!
//! Tests are organized by topic:
//! - `monte_carlo` - Batch statistics, percentile ordering and determinism
//! - `goals` - Goal success, shortfall and time-to-goal across a full evaluation
//! - `stress` - Crisis replay over the built-in catalog
//!
//! `fixtures` holds the scenario and result builders shared with the unit
//! tests in each module.

mod goals;
mod monte_carlo;

pub(crate) mod fixtures {
    use rust_decimal::Decimal;

    use crate::model::{
        CrisisId, CrisisProfile, GoalOutcome, RebalancingFrequency, ReturnDistribution,
        RiskLevel, RiskMetrics, Scenario, ScenarioId, ScenarioParameters, SimulationResult,
        TimeToGoal, ValueDistribution, WealthMetrics,
    };

    /// High risk tolerance, 15% volatility
    pub fn scenario(
        id: &str,
        equity: f64,
        debt: f64,
        alternatives: f64,
        expected_return: f64,
        monthly_investment: Decimal,
    ) -> Scenario {
        Scenario {
            id: ScenarioId::from(id),
            name: format!("Scenario {id}"),
            parameters: ScenarioParameters {
                equity_allocation: equity,
                debt_allocation: debt,
                alternatives_allocation: alternatives,
                expected_return,
                volatility: 15.0,
                max_drawdown: 30.0,
                rebalancing_frequency: RebalancingFrequency::Quarterly,
                risk_level: RiskLevel::High,
            },
            monthly_investment,
        }
    }

    /// 60/35/5 at 10% expected return and 14% volatility, 20,000 a month
    pub fn balanced(id: &str) -> Scenario {
        let mut s = scenario(id, 60.0, 35.0, 5.0, 10.0, Decimal::from(20_000));
        s.parameters.volatility = 14.0;
        s.parameters.risk_level = RiskLevel::Medium;
        s
    }

    pub fn crisis(id: &str, crash: f64, recovery_months: u32) -> CrisisProfile {
        CrisisProfile {
            id: CrisisId::from(id),
            name: id.to_string(),
            market_crash_percentage: crash,
            recovery_time_months: recovery_months,
            sector_impacts: Default::default(),
            description: String::new(),
            year: None,
        }
    }

    pub fn goal_outcome(name: &str, target: Decimal, horizon_years: u32) -> GoalOutcome {
        GoalOutcome {
            name: name.to_string(),
            target_amount: target,
            horizon_years,
            success_rate: 50.0,
            average_shortfall: Decimal::ZERO,
            median_achievement: Decimal::ZERO,
            achievement_ratio: 0.0,
            time_to_goal: TimeToGoal::Unreachable,
            reachable_within_horizon: false,
        }
    }

    /// A result whose every percentile equals `median`
    pub fn result_with_median(
        scenario: &Scenario,
        median: Decimal,
        goal_analysis: Vec<GoalOutcome>,
    ) -> SimulationResult {
        SimulationResult {
            scenario_id: scenario.id.clone(),
            simulation_count: 1,
            years_simulated: 10,
            seed: 0,
            total_invested: scenario.monthly_investment * Decimal::from(120),
            portfolio_value: ValueDistribution {
                p10: median,
                p25: median,
                p50: median,
                p75: median,
                p90: median,
                mean: median,
            },
            annualized_return: ReturnDistribution {
                p10: 0.0,
                p25: 0.0,
                p50: 0.0,
                p75: 0.0,
                p90: 0.0,
                mean: 0.0,
            },
            risk_metrics: RiskMetrics {
                volatility: scenario.parameters.volatility,
                max_drawdown_p95: 0.0,
                value_at_risk_95: 0.0,
                sharpe_ratio: 0.0,
                success_rate: 100.0,
            },
            goal_analysis,
            wealth_metrics: WealthMetrics {
                median_multiplier: 1.0,
                probability_of_loss: 0.0,
                average_gains: Decimal::ZERO,
                compound_growth_rate: 0.0,
            },
        }
    }
}
