//! Investment scenario evaluation library
//!
//! This crate provides a Monte Carlo portfolio simulator paired with a
//! deterministic historical-crisis stress-test engine. It supports:
//! - Monthly portfolio paths driven by normally distributed returns
//! - Percentile distributions, risk metrics and wealth metrics per scenario
//! - Goal success probability, shortfall and time-to-goal estimates
//! - Crisis impact, recovery trajectories and behavioral guidance
//!
//! # Example
//!
//! ```ignore
//! use wealthcast_core::{Evaluator, CrisisCatalog};
//!
//! let evaluator = Evaluator::new().with_seed(42);
//! let result = evaluator.evaluate(&scenario, &goals, 20, 5_000)?;
//!
//! let catalog = CrisisCatalog::builtin()?;
//! let crisis = catalog.get(&"global-financial-crisis-2008".into()).unwrap();
//! let stress = evaluator.stress_test(&scenario, &result, crisis)?;
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod analysis;
pub mod error;
pub mod evaluate;
pub mod money;
pub mod returns;
pub mod simulation;
pub mod stress;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;
pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use config::EngineConfig;
pub use error::{CatalogError, EvalError, ResourceError, ValidationError};
pub use evaluate::{
    Evaluator, ScenarioComparison, ScenarioObserver, evaluate, horizon_years_for_age, stress_test,
};
pub use model::{
    CrisisId, CrisisProfile, GoalDefinition, RiskLevel, Scenario, ScenarioId, ScenarioParameters,
    SimulationResult, StressTestResult,
};
pub use simulation::MonteCarloProgress;
pub use stress::CrisisCatalog;
