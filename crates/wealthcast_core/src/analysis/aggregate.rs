//! Reduction of a Monte Carlo batch into distributions and metrics.

use crate::error::ValidationError;
use crate::model::{ReturnDistribution, RiskMetrics, RunSummary, ValueDistribution, WealthMetrics};
use crate::money::to_money;

/// Percentile of an ascending-sorted slice.
///
/// Index is `floor(p / 100 * N)` clamped to `N - 1`. Every percentile in this
/// crate goes through here so that p10 <= p25 <= ... <= p90 holds for any
/// batch.
#[must_use]
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let n = sorted.len();
    let idx = ((p / 100.0) * n as f64).floor().max(0.0) as usize;
    sorted[idx.min(n - 1)]
}

fn sorted_by<F: Fn(&RunSummary) -> f64>(runs: &[RunSummary], f: F) -> Vec<f64> {
    let mut values: Vec<f64> = runs.iter().map(f).collect();
    values.sort_by(f64::total_cmp);
    values
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Population standard deviation
fn std_dev(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Everything the aggregator derives from one batch
#[derive(Debug, Clone, PartialEq)]
pub struct BatchStatistics {
    pub total_invested: f64,
    pub portfolio_value: ValueDistribution,
    pub annualized_return: ReturnDistribution,
    pub risk_metrics: RiskMetrics,
    pub wealth_metrics: WealthMetrics,
    /// Terminal values sorted ascending, kept for goal analysis
    pub sorted_final_values: Vec<f64>,
}

impl BatchStatistics {
    #[must_use]
    pub fn median_final_value(&self) -> f64 {
        percentile(&self.sorted_final_values, 50.0)
    }
}

/// Aggregate a complete batch of runs.
///
/// `volatility` is the scenario's input volatility (%), echoed in the risk
/// metrics. `risk_free_rate` is annual (%).
pub fn aggregate(
    runs: &[RunSummary],
    years: u32,
    volatility: f64,
    risk_free_rate: f64,
) -> Result<BatchStatistics, ValidationError> {
    if runs.is_empty() {
        return Err(ValidationError::EmptyBatch);
    }
    let n = runs.len() as f64;
    // Every run contributes the same schedule
    let total_invested = runs[0].total_invested;

    let values = sorted_by(runs, |r| r.final_value);
    let returns = sorted_by(runs, |r| r.annualized_return);
    let drawdowns = sorted_by(runs, |r| r.max_drawdown);

    let portfolio_value = ValueDistribution {
        p10: to_money(percentile(&values, 10.0)),
        p25: to_money(percentile(&values, 25.0)),
        p50: to_money(percentile(&values, 50.0)),
        p75: to_money(percentile(&values, 75.0)),
        p90: to_money(percentile(&values, 90.0)),
        mean: to_money(mean(&values)),
    };

    let annualized_return = ReturnDistribution {
        p10: percentile(&returns, 10.0) * 100.0,
        p25: percentile(&returns, 25.0) * 100.0,
        p50: percentile(&returns, 50.0) * 100.0,
        p75: percentile(&returns, 75.0) * 100.0,
        p90: percentile(&returns, 90.0) * 100.0,
        mean: mean(&returns) * 100.0,
    };

    let p5 = percentile(&values, 5.0);
    let p50 = percentile(&values, 50.0);
    let value_at_risk_95 = if p50 > 0.0 {
        (1.0 - p5 / p50) * 100.0
    } else {
        0.0
    };

    let rf = risk_free_rate / 100.0;
    let excess: Vec<f64> = runs.iter().map(|r| r.annualized_return - rf).collect();
    let excess_mean = mean(&excess);
    let excess_sd = std_dev(&excess, excess_mean);
    let sharpe_ratio = if excess_sd > f64::EPSILON {
        excess_mean / excess_sd
    } else {
        0.0
    };

    let above = runs
        .iter()
        .filter(|r| r.final_value > r.total_invested)
        .count() as f64;
    let below = runs
        .iter()
        .filter(|r| r.final_value < r.total_invested)
        .count() as f64;

    let risk_metrics = RiskMetrics {
        volatility,
        max_drawdown_p95: percentile(&drawdowns, 95.0) * 100.0,
        value_at_risk_95,
        sharpe_ratio,
        success_rate: above * 100.0 / n,
    };

    let gains: Vec<f64> = runs.iter().map(RunSummary::total_gains).collect();
    let (median_multiplier, compound_growth_rate) = if total_invested > 0.0 {
        let multiplier = p50 / total_invested;
        let cagr = if years > 0 {
            (multiplier.max(0.0).powf(1.0 / f64::from(years)) - 1.0) * 100.0
        } else {
            0.0
        };
        (multiplier, cagr)
    } else {
        (0.0, 0.0)
    };

    let wealth_metrics = WealthMetrics {
        median_multiplier,
        probability_of_loss: below * 100.0 / n,
        average_gains: to_money(mean(&gains)),
        compound_growth_rate,
    };

    Ok(BatchStatistics {
        total_invested,
        portfolio_value,
        annualized_return,
        risk_metrics,
        wealth_metrics,
        sorted_final_values: values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(final_value: f64, total_invested: f64) -> RunSummary {
        RunSummary {
            final_value,
            total_invested,
            max_drawdown: 0.1,
            annualized_return: crate::simulation::annualized_return(final_value, total_invested, 10),
        }
    }

    #[test]
    fn test_percentile_indexing() {
        let sorted: Vec<f64> = (0..10).map(f64::from).collect();
        assert_eq!(percentile(&sorted, 0.0), 0.0);
        assert_eq!(percentile(&sorted, 10.0), 1.0);
        assert_eq!(percentile(&sorted, 50.0), 5.0);
        assert_eq!(percentile(&sorted, 95.0), 9.0);
        // Clamped to the last element
        assert_eq!(percentile(&sorted, 100.0), 9.0);
        assert_eq!(percentile(&[], 50.0), 0.0);
    }

    #[test]
    fn test_percentile_two_elements() {
        let sorted = [1.0, 2.0];
        assert_eq!(percentile(&sorted, 10.0), 1.0);
        assert_eq!(percentile(&sorted, 25.0), 1.0);
        assert_eq!(percentile(&sorted, 50.0), 2.0);
        assert_eq!(percentile(&sorted, 90.0), 2.0);
    }

    #[test]
    fn test_empty_batch_rejected() {
        assert_eq!(
            aggregate(&[], 10, 12.0, 6.0),
            Err(ValidationError::EmptyBatch)
        );
    }

    #[test]
    fn test_success_and_loss_rates() {
        let runs = vec![
            run(50.0, 100.0),
            run(100.0, 100.0), // tie: neither success nor loss
            run(150.0, 100.0),
            run(200.0, 100.0),
        ];
        let stats = aggregate(&runs, 10, 12.0, 6.0).unwrap();
        assert_eq!(stats.risk_metrics.success_rate, 50.0);
        assert_eq!(stats.wealth_metrics.probability_of_loss, 25.0);
        assert!(stats.risk_metrics.success_rate + stats.wealth_metrics.probability_of_loss <= 100.0);
    }

    #[test]
    fn test_value_at_risk_and_multiplier() {
        // 20 runs: 100, 200, ..., 2000
        let runs: Vec<RunSummary> = (1..=20).map(|i| run(f64::from(i) * 100.0, 1_000.0)).collect();
        let stats = aggregate(&runs, 10, 12.0, 6.0).unwrap();

        // p5 -> index 1 (200), p50 -> index 10 (1100)
        let expected_var = (1.0 - 200.0 / 1_100.0) * 100.0;
        assert!((stats.risk_metrics.value_at_risk_95 - expected_var).abs() < 1e-9);
        assert!((stats.wealth_metrics.median_multiplier - 1.1).abs() < 1e-12);
        let expected_cagr = (1.1f64.powf(0.1) - 1.0) * 100.0;
        assert!((stats.wealth_metrics.compound_growth_rate - expected_cagr).abs() < 1e-9);
        assert_eq!(stats.median_final_value(), 1_100.0);
    }

    #[test]
    fn test_identical_runs_degenerate_sharpe() {
        let runs = vec![run(150.0, 100.0); 10];
        let stats = aggregate(&runs, 10, 0.0, 6.0).unwrap();
        assert_eq!(stats.risk_metrics.sharpe_ratio, 0.0);
        assert_eq!(stats.portfolio_value.p10, stats.portfolio_value.p90);
        assert_eq!(stats.risk_metrics.success_rate, 100.0);
    }

    #[test]
    fn test_zero_invested_guards() {
        let runs = vec![run(0.0, 0.0); 5];
        let stats = aggregate(&runs, 10, 0.0, 6.0).unwrap();
        assert_eq!(stats.wealth_metrics.median_multiplier, 0.0);
        assert_eq!(stats.wealth_metrics.compound_growth_rate, 0.0);
        assert_eq!(stats.risk_metrics.value_at_risk_95, 0.0);
        assert_eq!(stats.risk_metrics.success_rate, 0.0);
        assert_eq!(stats.wealth_metrics.probability_of_loss, 0.0);
    }

    #[test]
    fn test_sharpe_sign() {
        let runs: Vec<RunSummary> = (0..50)
            .map(|i| RunSummary {
                final_value: 0.0,
                total_invested: 0.0,
                max_drawdown: 0.0,
                annualized_return: 0.10 + f64::from(i % 5) * 0.01,
            })
            .collect();
        let stats = aggregate(&runs, 10, 10.0, 6.0).unwrap();
        assert!(stats.risk_metrics.sharpe_ratio > 0.0);
    }
}
