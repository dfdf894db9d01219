use thiserror::Error;

use crate::model::{CrisisId, ScenarioId};

/// Malformed or out-of-range inputs, detected before any simulation work
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} must be a finite number, got {value}")]
    NotFinite { field: &'static str, value: f64 },
    #[error("volatility must be non-negative, got {0}")]
    NegativeVolatility(f64),
    #[error("expected return must be greater than -100%, got {0}")]
    ExpectedReturnTooLow(f64),
    #[error("{field} must be between 0 and 100, got {value}")]
    AllocationOutOfRange { field: &'static str, value: f64 },
    #[error("allocations must sum to 100 (got {0:.2})")]
    AllocationSum(f64),
    #[error("max drawdown target must be non-negative, got {0}")]
    NegativeDrawdownTarget(f64),
    #[error("monthly investment for scenario {scenario:?} must be non-negative, got {amount}")]
    NegativeMonthlyInvestment {
        scenario: ScenarioId,
        amount: rust_decimal::Decimal,
    },
    #[error("monthly contribution must be non-negative, got {0}")]
    NegativeContribution(f64),
    #[error("horizon must be at least one year, got {0}")]
    HorizonTooShort(i64),
    #[error("simulation count must be at least 1")]
    NoSimulations,
    #[error("cannot aggregate an empty batch of simulation runs")]
    EmptyBatch,
    #[error("goal {name:?} must have a positive target amount, got {amount}")]
    NonPositiveGoalTarget {
        name: String,
        amount: rust_decimal::Decimal,
    },
    #[error("goal {name:?} needs either a target year or a horizon in years")]
    MissingGoalHorizon { name: String },
    #[error("goal {name:?} resolves to a horizon of {years} years; at least 1 is required")]
    GoalHorizonTooShort { name: String, years: i64 },
    #[error("engine setting {field} is invalid: {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: &'static str,
    },
    #[error("simulation result is for scenario {result:?}, not {scenario:?}")]
    ScenarioMismatch {
        scenario: ScenarioId,
        result: ScenarioId,
    },
    #[error("at least one scenario is required for a comparison")]
    NoScenarios,
    #[error("scenario id {0:?} is used more than once")]
    DuplicateScenario(ScenarioId),
}

/// Requests that exceed the configured compute budget
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResourceError {
    #[error("simulation count {requested} exceeds the configured maximum of {limit}")]
    TooManySimulations { requested: usize, limit: usize },
    #[error("horizon of {requested} years exceeds the configured maximum of {limit}")]
    HorizonTooLong { requested: u32, limit: u32 },
    #[error(
        "{simulations} simulations over {months} months is {steps} monthly steps, above the budget of {limit}"
    )]
    StepBudgetExceeded {
        simulations: usize,
        months: u32,
        steps: u64,
        limit: u64,
    },
}

/// Problems loading the crisis profile table
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to parse crisis catalog: {0}")]
    Parse(#[from] serde_saphyr::Error),
    #[error("crisis {id:?} is invalid: {reason}")]
    InvalidProfile { id: CrisisId, reason: String },
    #[error("crisis id {0:?} appears more than once")]
    DuplicateId(CrisisId),
    #[error("unknown crisis {0:?}")]
    UnknownCrisis(CrisisId),
}

/// Errors surfaced by the evaluation entry points
#[derive(Debug, Error)]
pub enum EvalError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Resource(#[from] ResourceError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    /// Monte Carlo run was cancelled through its progress handle
    #[error("simulation cancelled")]
    Cancelled,
}

impl EvalError {
    /// Whether the caller supplied bad inputs (as opposed to hitting a limit or cancelling)
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, EvalError::Validation(_))
    }
}

pub type Result<T> = std::result::Result<T, EvalError>;
