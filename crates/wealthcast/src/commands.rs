//! Command implementations, independent of argument parsing

use color_eyre::eyre::WrapErr;
use wealthcast_core::model::CrisisId;
use wealthcast_core::{CrisisCatalog, Evaluator, SimulationResult};

use crate::plan::PlanFile;
use crate::report::Report;

/// Overrides taken from the command line
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub seed: Option<u64>,
    pub simulations: Option<usize>,
}

/// Which crises a stress command replays
#[derive(Debug, Clone, PartialEq)]
pub enum CrisisSelection {
    One(CrisisId),
    All,
}

struct Session<'a> {
    plan: &'a PlanFile,
    evaluator: Evaluator,
    simulations: usize,
    horizon_years: u32,
}

impl<'a> Session<'a> {
    fn new(plan: &'a PlanFile, options: RunOptions) -> Self {
        let mut evaluator = Evaluator::new().with_config(plan.engine.clone());
        if let Some(seed) = options.seed {
            evaluator = evaluator.with_seed(seed);
        }
        if let Some(as_of) = plan.as_of {
            evaluator = evaluator.with_as_of(as_of);
        }
        let simulations = options
            .simulations
            .unwrap_or(plan.engine.default_simulation_count);

        Self {
            plan,
            evaluator,
            simulations,
            horizon_years: plan.client.horizon_years(),
        }
    }

    fn evaluate(&self, scenario: &wealthcast_core::Scenario) -> color_eyre::Result<SimulationResult> {
        self.evaluator
            .evaluate(
                scenario,
                &self.plan.client.goals,
                self.horizon_years,
                self.simulations,
            )
            .wrap_err_with(|| format!("evaluation of scenario {} failed", scenario.id))
    }
}

/// Evaluate one scenario, or all of them
pub fn evaluate(
    plan: &PlanFile,
    options: RunOptions,
    scenario: Option<&str>,
) -> color_eyre::Result<Report> {
    let session = Session::new(plan, options);
    let results = plan
        .select(scenario)?
        .into_iter()
        .map(|s| session.evaluate(s))
        .collect::<color_eyre::Result<Vec<_>>>()?;
    Ok(Report::Evaluations(results))
}

/// Evaluate each selected scenario, then replay the selected crises on it
pub fn stress(
    plan: &PlanFile,
    options: RunOptions,
    scenario: Option<&str>,
    crises: &CrisisSelection,
) -> color_eyre::Result<Report> {
    let session = Session::new(plan, options);
    let catalog = CrisisCatalog::builtin()?;
    if let CrisisSelection::One(id) = crises {
        // Fail on an unknown id before spending time on simulation
        catalog.require(id)?;
    }

    let mut results = Vec::new();
    for scenario in plan.select(scenario)? {
        let evaluation = session.evaluate(scenario)?;
        match crises {
            CrisisSelection::One(id) => {
                let crisis = catalog.require(id)?;
                results.push(session.evaluator.stress_test(scenario, &evaluation, crisis)?);
            }
            CrisisSelection::All => {
                results.extend(
                    session
                        .evaluator
                        .stress_test_catalog(scenario, &evaluation, &catalog)?,
                );
            }
        }
    }
    Ok(Report::StressTests(results))
}

/// Evaluate every scenario in the plan and rank them
pub fn compare(plan: &PlanFile, options: RunOptions) -> color_eyre::Result<Report> {
    let session = Session::new(plan, options);
    let comparison = session.evaluator.compare(
        &plan.scenarios,
        &plan.client.goals,
        session.horizon_years,
        session.simulations,
        |index: usize, total: usize, result: &SimulationResult| {
            tracing::info!(
                scenario = %result.scenario_id,
                done = index + 1,
                total,
                "Scenario complete"
            );
        },
    )?;
    Ok(Report::Comparison(comparison))
}

pub fn list_crises() -> color_eyre::Result<Report> {
    let catalog = CrisisCatalog::builtin()?;
    Ok(Report::Crises(catalog.iter().cloned().collect()))
}
