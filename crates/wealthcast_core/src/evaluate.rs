//! Public evaluation entry points.
//!
//! [`Evaluator`] ties the engine together: it validates inputs, checks the
//! resource budget, runs the Monte Carlo batch, aggregates it, analyzes goals
//! and replays crises. The free functions [`evaluate`] and [`stress_test`]
//! use a default-configured evaluator.

use jiff::civil::Date;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::analysis::{GoalAnalyzer, aggregate};
use crate::config::EngineConfig;
use crate::error::{EvalError, ResourceError, Result, ValidationError};
use crate::model::{
    CrisisProfile, GoalDefinition, Scenario, ScenarioId, SimulationResult, StressTestResult,
};
use crate::money::to_money;
use crate::simulation::{MonteCarloProgress, PathSimulator, monte_carlo_simulate};
use crate::stress::{self, BehavioralAdvisor, CrisisCatalog};

/// Simulation horizon for a client of the given age: years to 65, at least 10
/// and at most 30.
#[must_use]
pub fn horizon_years_for_age(age: u32) -> u32 {
    65u32.saturating_sub(age).clamp(10, 30)
}

/// Notified after each scenario of a comparison finishes
pub trait ScenarioObserver {
    fn scenario_completed(&mut self, index: usize, total: usize, result: &SimulationResult);
}

impl<F> ScenarioObserver for F
where
    F: FnMut(usize, usize, &SimulationResult),
{
    fn scenario_completed(&mut self, index: usize, total: usize, result: &SimulationResult) {
        self(index, total, result);
    }
}

/// Results for several scenarios evaluated against the same goals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioComparison {
    /// In input order
    pub results: Vec<SimulationResult>,
    /// Highest median terminal value first
    pub ranking_by_median: Vec<ScenarioId>,
    /// Highest success rate first
    pub ranking_by_success_rate: Vec<ScenarioId>,
}

impl ScenarioComparison {
    fn new(results: Vec<SimulationResult>) -> Self {
        let rank = |key: fn(&SimulationResult) -> f64| -> Vec<ScenarioId> {
            let mut order: Vec<&SimulationResult> = results.iter().collect();
            // Stable sort keeps input order among ties
            order.sort_by(|a, b| key(b).total_cmp(&key(a)));
            order.into_iter().map(|r| r.scenario_id.clone()).collect()
        };
        let ranking_by_median = rank(|r| crate::money::to_f64(r.median_value()));
        let ranking_by_success_rate = rank(|r| r.risk_metrics.success_rate);

        Self {
            results,
            ranking_by_median,
            ranking_by_success_rate,
        }
    }

    #[must_use]
    pub fn get(&self, id: &ScenarioId) -> Option<&SimulationResult> {
        self.results.iter().find(|r| &r.scenario_id == id)
    }

    /// Scenario with the highest median terminal value
    #[must_use]
    pub fn best_by_median(&self) -> Option<&SimulationResult> {
        self.ranking_by_median.first().and_then(|id| self.get(id))
    }
}

/// Configured entry point to the engine
#[derive(Debug, Clone)]
pub struct Evaluator {
    config: EngineConfig,
    seed: Option<u64>,
    as_of: Date,
    progress: Option<MonteCarloProgress>,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator {
    /// Default configuration, a fresh random seed per evaluation, and today's
    /// date for resolving goal target years.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            seed: None,
            as_of: jiff::Zoned::now().date(),
            progress: None,
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Fix the base seed so evaluations are reproducible
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Date against which goal target years are resolved
    #[must_use]
    pub fn with_as_of(mut self, as_of: Date) -> Self {
        self.as_of = as_of;
        self
    }

    /// Report run progress and accept cancellation through `progress`
    #[must_use]
    pub fn with_progress(mut self, progress: MonteCarloProgress) -> Self {
        self.progress = Some(progress);
        self
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn default_simulation_count(&self) -> usize {
        self.config.default_simulation_count
    }

    fn check_budget(&self, simulation_count: usize, horizon_years: u32) -> Result<()> {
        let limits = &self.config.limits;
        if simulation_count > limits.max_simulations {
            return Err(ResourceError::TooManySimulations {
                requested: simulation_count,
                limit: limits.max_simulations,
            }
            .into());
        }
        if horizon_years > limits.max_horizon_years {
            return Err(ResourceError::HorizonTooLong {
                requested: horizon_years,
                limit: limits.max_horizon_years,
            }
            .into());
        }
        let months = horizon_years.saturating_mul(12);
        let steps = (simulation_count as u64).saturating_mul(u64::from(months));
        if steps > limits.max_total_steps {
            return Err(ResourceError::StepBudgetExceeded {
                simulations: simulation_count,
                months,
                steps,
                limit: limits.max_total_steps,
            }
            .into());
        }
        Ok(())
    }

    /// Validate everything `evaluate` consumes; returns each goal's horizon
    fn validate_inputs(
        &self,
        scenario: &Scenario,
        goals: &[GoalDefinition],
        horizon_years: u32,
        simulation_count: usize,
    ) -> Result<Vec<u32>> {
        self.config.validate()?;
        scenario.validate()?;
        if horizon_years == 0 {
            return Err(ValidationError::HorizonTooShort(0).into());
        }
        if simulation_count == 0 {
            return Err(ValidationError::NoSimulations.into());
        }
        let as_of_year = self.as_of.year();
        let horizons = goals
            .iter()
            .map(|goal| goal.validate(as_of_year))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        self.check_budget(simulation_count, horizon_years)?;
        Ok(horizons)
    }

    fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }

    /// Run the Monte Carlo evaluation of one scenario.
    ///
    /// All inputs are validated, and the resource budget checked, before any
    /// path is simulated.
    pub fn evaluate(
        &self,
        scenario: &Scenario,
        goals: &[GoalDefinition],
        horizon_years: u32,
        simulation_count: usize,
    ) -> Result<SimulationResult> {
        let horizons = self.validate_inputs(scenario, goals, horizon_years, simulation_count)?;
        self.evaluate_validated(
            scenario,
            goals,
            &horizons,
            horizon_years,
            simulation_count,
            self.resolve_seed(),
        )
    }

    fn evaluate_validated(
        &self,
        scenario: &Scenario,
        goals: &[GoalDefinition],
        goal_horizons: &[u32],
        horizon_years: u32,
        simulation_count: usize,
        seed: u64,
    ) -> Result<SimulationResult> {
        tracing::info!(
            scenario = %scenario.id,
            simulations = simulation_count,
            years = horizon_years,
            seed,
            "Evaluating scenario"
        );

        let simulator = PathSimulator::for_scenario(scenario, horizon_years)?;
        let runs = monte_carlo_simulate(&simulator, simulation_count, seed, self.progress.as_ref())
            .inspect_err(|e| {
                if matches!(e, EvalError::Cancelled) {
                    tracing::warn!(scenario = %scenario.id, "Evaluation cancelled");
                }
            })?;

        let params = &scenario.parameters;
        let stats = aggregate(
            &runs,
            horizon_years,
            params.volatility,
            self.config.risk_free_rate,
        )?;

        let analyzer = GoalAnalyzer::new(
            &stats.sorted_final_values,
            scenario.monthly_investment_f64(),
            params.monthly_return_fraction(),
        );
        let goal_analysis = goals
            .iter()
            .zip(goal_horizons)
            .map(|(goal, &years)| analyzer.analyze(goal, years))
            .collect();

        let result = SimulationResult {
            scenario_id: scenario.id.clone(),
            simulation_count,
            years_simulated: horizon_years,
            seed,
            total_invested: to_money(stats.total_invested),
            portfolio_value: stats.portfolio_value,
            annualized_return: stats.annualized_return,
            risk_metrics: stats.risk_metrics,
            goal_analysis,
            wealth_metrics: stats.wealth_metrics,
        };

        tracing::info!(
            scenario = %scenario.id,
            median = %result.portfolio_value.p50,
            success_rate = result.risk_metrics.success_rate,
            "Scenario evaluated"
        );
        Ok(result)
    }

    /// Replay one crisis on an evaluated scenario
    pub fn stress_test(
        &self,
        scenario: &Scenario,
        result: &SimulationResult,
        crisis: &CrisisProfile,
    ) -> Result<StressTestResult> {
        stress::stress_test(
            scenario,
            result,
            crisis,
            &self.config.stress,
            &BehavioralAdvisor::new(self.config.behavior),
        )
    }

    /// Replay every crisis in `catalog`, in catalog order
    pub fn stress_test_catalog(
        &self,
        scenario: &Scenario,
        result: &SimulationResult,
        catalog: &CrisisCatalog,
    ) -> Result<Vec<StressTestResult>> {
        catalog
            .iter()
            .map(|crisis| self.stress_test(scenario, result, crisis))
            .collect()
    }

    /// Evaluate several scenarios against the same goals and rank them.
    ///
    /// Every scenario is validated before the first one runs. All scenarios
    /// share one base seed, so they see the same underlying random draws.
    /// `observer` is notified after each scenario completes.
    pub fn compare<O: ScenarioObserver>(
        &self,
        scenarios: &[Scenario],
        goals: &[GoalDefinition],
        horizon_years: u32,
        simulation_count: usize,
        mut observer: O,
    ) -> Result<ScenarioComparison> {
        if scenarios.is_empty() {
            return Err(ValidationError::NoScenarios.into());
        }
        let mut seen = FxHashSet::default();
        let mut goal_horizons = Vec::new();
        for scenario in scenarios {
            if !seen.insert(&scenario.id) {
                return Err(ValidationError::DuplicateScenario(scenario.id.clone()).into());
            }
            goal_horizons = self.validate_inputs(scenario, goals, horizon_years, simulation_count)?;
        }

        let seed = self.resolve_seed();
        let total = scenarios.len();
        let mut results = Vec::with_capacity(total);
        for (index, scenario) in scenarios.iter().enumerate() {
            let result = self.evaluate_validated(
                scenario,
                goals,
                &goal_horizons,
                horizon_years,
                simulation_count,
                seed,
            )?;
            observer.scenario_completed(index, total, &result);
            results.push(result);
        }

        Ok(ScenarioComparison::new(results))
    }
}

/// Evaluate a scenario with the default configuration and a random seed
pub fn evaluate(
    scenario: &Scenario,
    goals: &[GoalDefinition],
    horizon_years: u32,
    simulation_count: usize,
) -> Result<SimulationResult> {
    Evaluator::new().evaluate(scenario, goals, horizon_years, simulation_count)
}

/// Stress test with the default configuration
pub fn stress_test(
    scenario: &Scenario,
    result: &SimulationResult,
    crisis: &CrisisProfile,
) -> Result<StressTestResult> {
    Evaluator::new().stress_test(scenario, result, crisis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::fixtures;
    use rust_decimal_macros::dec;

    #[test]
    fn test_horizon_for_age() {
        assert_eq!(horizon_years_for_age(25), 30);
        assert_eq!(horizon_years_for_age(35), 30);
        assert_eq!(horizon_years_for_age(40), 25);
        assert_eq!(horizon_years_for_age(55), 10);
        assert_eq!(horizon_years_for_age(60), 10);
        assert_eq!(horizon_years_for_age(80), 10);
    }

    #[test]
    fn test_budget_checks() {
        let mut config = EngineConfig::default();
        config.limits.max_simulations = 1_000;
        config.limits.max_horizon_years = 40;
        config.limits.max_total_steps = 100_000;
        let evaluator = Evaluator::new().with_config(config).with_seed(1);
        let scenario = fixtures::balanced("b");

        assert!(matches!(
            evaluator.evaluate(&scenario, &[], 10, 2_000),
            Err(EvalError::Resource(ResourceError::TooManySimulations { requested: 2_000, limit: 1_000 }))
        ));
        assert!(matches!(
            evaluator.evaluate(&scenario, &[], 50, 10),
            Err(EvalError::Resource(ResourceError::HorizonTooLong { .. }))
        ));
        // 1_000 runs x 120 months
        assert!(matches!(
            evaluator.evaluate(&scenario, &[], 10, 1_000),
            Err(EvalError::Resource(ResourceError::StepBudgetExceeded { steps: 120_000, .. }))
        ));
        assert!(evaluator.evaluate(&scenario, &[], 10, 500).is_ok());
    }

    #[test]
    fn test_validation_precedes_budget() {
        let mut scenario = fixtures::balanced("b");
        scenario.parameters.volatility = -1.0;
        let err = Evaluator::new()
            .with_seed(1)
            .evaluate(&scenario, &[], 10, usize::MAX)
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_goal_target_year_resolved_from_as_of() {
        let evaluator = Evaluator::new()
            .with_seed(3)
            .with_as_of(jiff::civil::date(2025, 6, 1));
        let goal = GoalDefinition {
            name: "Education".into(),
            target_amount: dec!(1000000),
            target_year: Some(2035),
            horizon_years: None,
        };
        let result = evaluator
            .evaluate(&fixtures::balanced("b"), &[goal], 15, 200)
            .unwrap();
        assert_eq!(result.goal_analysis[0].horizon_years, 10);

        let past = GoalDefinition {
            name: "Past".into(),
            target_amount: dec!(1000),
            target_year: Some(2020),
            horizon_years: None,
        };
        let err = evaluator
            .evaluate(&fixtures::balanced("b"), &[past], 15, 200)
            .unwrap_err();
        assert!(matches!(
            err,
            EvalError::Validation(ValidationError::GoalHorizonTooShort { years: -5, .. })
        ));
    }

    #[test]
    fn test_seed_recorded_and_reproducible() {
        let evaluator = Evaluator::new().with_seed(77);
        let scenario = fixtures::balanced("b");
        let a = evaluator.evaluate(&scenario, &[], 10, 300).unwrap();
        let b = evaluator.evaluate(&scenario, &[], 10, 300).unwrap();
        assert_eq!(a.seed, 77);
        assert_eq!(a, b);
    }

    #[test]
    fn test_compare_ranks_and_notifies() {
        let evaluator = Evaluator::new().with_seed(11);
        let scenarios = vec![
            fixtures::scenario("conservative", 20.0, 80.0, 0.0, 7.0, dec!(10000)),
            fixtures::scenario("aggressive", 90.0, 10.0, 0.0, 13.0, dec!(10000)),
        ];
        let mut seen = Vec::new();
        let comparison = evaluator
            .compare(&scenarios, &[], 15, 500, |index: usize, total: usize, r: &SimulationResult| {
                seen.push((index, total, r.scenario_id.clone()));
            })
            .unwrap();

        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], (0, 2, ScenarioId::from("conservative")));
        assert_eq!(comparison.results.len(), 2);
        assert_eq!(comparison.ranking_by_median[0], ScenarioId::from("aggressive"));
        assert_eq!(
            comparison.best_by_median().map(|r| &r.scenario_id),
            Some(&ScenarioId::from("aggressive"))
        );
        assert_eq!(comparison.ranking_by_success_rate.len(), 2);
    }

    #[test]
    fn test_compare_rejects_bad_input_before_running() {
        let evaluator = Evaluator::new().with_seed(1);
        let mut calls = 0;
        let mut bad = fixtures::balanced("bad");
        bad.monthly_investment = dec!(-1);
        let scenarios = vec![fixtures::balanced("ok"), bad];
        let err = evaluator
            .compare(&scenarios, &[], 10, 100, |_: usize, _: usize, _: &SimulationResult| calls += 1)
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(calls, 0);

        let dupes = vec![fixtures::balanced("x"), fixtures::balanced("x")];
        assert!(matches!(
            evaluator.compare(&dupes, &[], 10, 100, |_: usize, _: usize, _: &SimulationResult| {}),
            Err(EvalError::Validation(ValidationError::DuplicateScenario(_)))
        ));
        assert!(matches!(
            evaluator.compare(&[], &[], 10, 100, |_: usize, _: usize, _: &SimulationResult| {}),
            Err(EvalError::Validation(ValidationError::NoScenarios))
        ));
    }

    #[test]
    fn test_cancelled_evaluation() {
        let progress = MonteCarloProgress::new();
        progress.cancel();
        let evaluator = Evaluator::new().with_seed(1).with_progress(progress);
        assert!(matches!(
            evaluator.evaluate(&fixtures::balanced("b"), &[], 10, 100),
            Err(EvalError::Cancelled)
        ));
    }

    #[test]
    fn test_stress_test_catalog_covers_every_crisis() {
        let evaluator = Evaluator::new().with_seed(5);
        let scenario = fixtures::balanced("b");
        let result = evaluator.evaluate(&scenario, &[], 10, 200).unwrap();
        let catalog = CrisisCatalog::builtin().unwrap();
        let stresses = evaluator
            .stress_test_catalog(&scenario, &result, &catalog)
            .unwrap();
        assert_eq!(stresses.len(), catalog.len());
        for (stress, crisis) in stresses.iter().zip(catalog.iter()) {
            assert_eq!(stress.crisis_id, crisis.id);
        }
    }
}
