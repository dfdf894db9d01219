use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};
#[cfg(feature = "parallel")]
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::error::{EvalError, ValidationError};
use crate::model::{RunSummary, Scenario, ScenarioParameters, Trajectory, TrajectoryPoint};
use crate::returns::MonthlyReturnGenerator;

/// Runs per batch. Each batch owns one seeding generator, so results do not
/// depend on how batches are scheduled across threads.
pub const MAX_BATCH_SIZE: usize = 100;

/// Shared progress and cancellation state for a Monte Carlo batch.
///
/// Cloning shares the underlying counters, so a UI thread can hold one clone
/// while the engine updates another.
#[derive(Debug, Clone, Default)]
pub struct MonteCarloProgress {
    completed: Arc<AtomicUsize>,
    cancelled: Arc<AtomicBool>,
}

impl MonteCarloProgress {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from existing atomics
    pub fn from_atomics(completed: Arc<AtomicUsize>, cancelled: Arc<AtomicBool>) -> Self {
        Self {
            completed,
            cancelled,
        }
    }

    /// Number of runs finished so far
    #[must_use]
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }

    pub fn increment(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn reset(&self) {
        self.completed.store(0, Ordering::Relaxed);
        self.cancelled.store(false, Ordering::Relaxed);
    }

    /// Request cancellation; checked between runs
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Simulates single portfolio paths for one scenario.
///
/// Built once per evaluation; every run borrows it immutably, so runs share
/// no mutable state and can execute on any thread.
#[derive(Debug, Clone, Copy)]
pub struct PathSimulator {
    generator: MonthlyReturnGenerator,
    monthly_investment: f64,
    years: u32,
}

impl PathSimulator {
    pub fn new(
        params: &ScenarioParameters,
        monthly_investment: f64,
        years: u32,
    ) -> Result<Self, ValidationError> {
        if !monthly_investment.is_finite() {
            return Err(ValidationError::NotFinite {
                field: "monthly_investment",
                value: monthly_investment,
            });
        }
        if monthly_investment < 0.0 {
            return Err(ValidationError::NegativeContribution(monthly_investment));
        }
        if years == 0 {
            return Err(ValidationError::HorizonTooShort(0));
        }

        let generator = MonthlyReturnGenerator::new(
            params.annual_return_fraction(),
            params.annual_volatility_fraction(),
        )?;

        Ok(Self {
            generator,
            monthly_investment,
            years,
        })
    }

    pub fn for_scenario(scenario: &Scenario, years: u32) -> Result<Self, ValidationError> {
        scenario.validate()?;
        Self::new(&scenario.parameters, scenario.monthly_investment_f64(), years)
    }

    #[must_use]
    pub fn months(&self) -> u32 {
        self.years.saturating_mul(12)
    }

    #[must_use]
    pub fn years(&self) -> u32 {
        self.years
    }

    #[must_use]
    pub fn total_invested(&self) -> f64 {
        self.monthly_investment * f64::from(self.months())
    }

    /// Simulate one path, keeping only its terminal statistics
    pub fn run<R: Rng + ?Sized>(&self, rng: &mut R) -> RunSummary {
        self.run_with(rng, |_| {})
    }

    /// Simulate one path and record every month
    pub fn trajectory<R: Rng + ?Sized>(&self, rng: &mut R) -> (Trajectory, RunSummary) {
        let mut points = Vec::with_capacity(self.months() as usize);
        let summary = self.run_with(rng, |point| points.push(point));
        (Trajectory { points }, summary)
    }

    fn run_with<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        mut on_month: impl FnMut(TrajectoryPoint),
    ) -> RunSummary {
        let mut value = 0.0_f64;
        let mut peak = 0.0_f64;
        let mut max_drawdown = 0.0_f64;
        let mut invested = 0.0_f64;

        for month in 1..=self.months() {
            // A return below -100% would push the value negative
            let r = self.generator.sample(rng).max(-1.0);
            value *= 1.0 + r;
            value += self.monthly_investment;
            invested += self.monthly_investment;

            let drawdown = if value > peak {
                peak = value;
                0.0
            } else if peak > 0.0 {
                (peak - value) / peak
            } else {
                0.0
            };
            max_drawdown = max_drawdown.max(drawdown);

            on_month(TrajectoryPoint {
                month,
                value,
                invested,
                gains: value - invested,
                drawdown,
            });
        }

        let total_invested = self.total_invested();
        RunSummary {
            final_value: value,
            total_invested,
            max_drawdown,
            annualized_return: annualized_return(value, total_invested, self.years),
        }
    }
}

/// `(final / invested)^(1 / years) - 1`, or zero when nothing was invested
#[must_use]
pub fn annualized_return(final_value: f64, total_invested: f64, years: u32) -> f64 {
    if total_invested <= 0.0 || years == 0 {
        return 0.0;
    }
    let ratio = (final_value / total_invested).max(0.0);
    ratio.powf(1.0 / f64::from(years)) - 1.0
}

/// Simulate a single path for a scenario with the given seed
pub fn simulate_path(
    scenario: &Scenario,
    years: u32,
    seed: u64,
) -> Result<RunSummary, ValidationError> {
    let simulator = PathSimulator::for_scenario(scenario, years)?;
    let mut rng = SmallRng::seed_from_u64(seed);
    Ok(simulator.run(&mut rng))
}

/// Simulate a single path for a scenario and return every month
pub fn simulate_trajectory(
    scenario: &Scenario,
    years: u32,
    seed: u64,
) -> Result<Trajectory, ValidationError> {
    let simulator = PathSimulator::for_scenario(scenario, years)?;
    let mut rng = SmallRng::seed_from_u64(seed);
    Ok(simulator.trajectory(&mut rng).0)
}

/// Run `num_iterations` independent paths and return their terminal summaries
/// in a deterministic order for the given `seed`.
pub fn monte_carlo_simulate(
    simulator: &PathSimulator,
    num_iterations: usize,
    seed: u64,
    progress: Option<&MonteCarloProgress>,
) -> Result<Vec<RunSummary>, EvalError> {
    if num_iterations == 0 {
        return Err(ValidationError::NoSimulations.into());
    }

    let num_batches = num_iterations.div_ceil(MAX_BATCH_SIZE);
    tracing::debug!(
        iterations = num_iterations,
        batches = num_batches,
        months = simulator.months(),
        "Starting Monte Carlo batch"
    );

    let run_batch = |i: usize| -> Result<Vec<RunSummary>, EvalError> {
        let mut batch_rng = SmallRng::seed_from_u64(seed.wrapping_add(i as u64));

        let batch_size = if i == num_batches - 1 {
            num_iterations - i * MAX_BATCH_SIZE
        } else {
            MAX_BATCH_SIZE
        };

        let mut runs = Vec::with_capacity(batch_size);
        for _ in 0..batch_size {
            if progress.is_some_and(MonteCarloProgress::is_cancelled) {
                return Err(EvalError::Cancelled);
            }
            let mut rng = SmallRng::seed_from_u64(batch_rng.next_u64());
            runs.push(simulator.run(&mut rng));
            if let Some(p) = progress {
                p.increment();
            }
        }
        Ok(runs)
    };

    #[cfg(feature = "parallel")]
    let batches: Result<Vec<Vec<RunSummary>>, EvalError> =
        (0..num_batches).into_par_iter().map(run_batch).collect();
    #[cfg(not(feature = "parallel"))]
    let batches: Result<Vec<Vec<RunSummary>>, EvalError> =
        (0..num_batches).map(run_batch).collect();

    let runs: Vec<RunSummary> = batches?.into_iter().flatten().collect();
    Ok(runs)
}
