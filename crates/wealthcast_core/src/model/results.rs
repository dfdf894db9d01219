//! Simulation results
//!
//! Contains the per-run terminal summaries produced by the Monte Carlo engine,
//! the optional full trajectory of a single run, and the aggregated
//! `SimulationResult` handed back to callers.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::goals::GoalOutcome;
use super::ids::ScenarioId;

/// Terminal statistics of one simulated path. Only these are retained per run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub final_value: f64,
    pub total_invested: f64,
    /// Largest peak-to-trough decline as a fraction (0.25 = 25%)
    pub max_drawdown: f64,
    /// Annualized return as a fraction
    pub annualized_return: f64,
}

impl RunSummary {
    #[must_use]
    pub fn total_gains(&self) -> f64 {
        self.final_value - self.total_invested
    }
}

/// One month of a simulated path
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    pub month: u32,
    pub value: f64,
    pub invested: f64,
    pub gains: f64,
    /// Drawdown from the running peak as a fraction
    pub drawdown: f64,
}

/// A full month-by-month path. Only built on request; Monte Carlo batches
/// keep [`RunSummary`] instead.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub points: Vec<TrajectoryPoint>,
}

impl Trajectory {
    #[must_use]
    pub fn final_value(&self) -> f64 {
        self.points.last().map_or(0.0, |p| p.value)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Terminal portfolio value percentiles
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueDistribution {
    pub p10: Decimal,
    pub p25: Decimal,
    pub p50: Decimal,
    pub p75: Decimal,
    pub p90: Decimal,
    pub mean: Decimal,
}

impl ValueDistribution {
    /// Percentiles in ascending order (mean excluded)
    #[must_use]
    pub fn ordered(&self) -> [Decimal; 5] {
        [self.p10, self.p25, self.p50, self.p75, self.p90]
    }
}

/// Annualized return percentiles (%)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReturnDistribution {
    pub p10: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p90: f64,
    pub mean: f64,
}

impl ReturnDistribution {
    #[must_use]
    pub fn ordered(&self) -> [f64; 5] {
        [self.p10, self.p25, self.p50, self.p75, self.p90]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskMetrics {
    /// Volatility assumption the scenario was run with (%)
    pub volatility: f64,
    /// 95th percentile of per-run maximum drawdown (%)
    pub max_drawdown_p95: f64,
    /// Loss of the 5th percentile outcome relative to the median (%)
    pub value_at_risk_95: f64,
    pub sharpe_ratio: f64,
    /// Percentage of runs ending above the amount invested
    pub success_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WealthMetrics {
    /// Median terminal value divided by total invested
    pub median_multiplier: f64,
    /// Percentage of runs ending below the amount invested
    pub probability_of_loss: f64,
    pub average_gains: Decimal,
    /// Annual growth rate implied by the median outcome (%)
    pub compound_growth_rate: f64,
}

/// Aggregated outcome of one Monte Carlo evaluation of a scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub scenario_id: ScenarioId,
    pub simulation_count: usize,
    pub years_simulated: u32,
    /// Base seed the batch was generated from
    pub seed: u64,
    pub total_invested: Decimal,
    pub portfolio_value: ValueDistribution,
    pub annualized_return: ReturnDistribution,
    pub risk_metrics: RiskMetrics,
    pub goal_analysis: Vec<GoalOutcome>,
    pub wealth_metrics: WealthMetrics,
}

impl SimulationResult {
    /// Median terminal value, used as the current portfolio value by stress tests
    #[must_use]
    pub fn median_value(&self) -> Decimal {
        self.portfolio_value.p50
    }
}
