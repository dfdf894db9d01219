//! Post-simulation analysis.
//!
//! `aggregate` reduces a finished Monte Carlo batch into percentile
//! distributions, risk metrics and wealth metrics. `goals` measures each client
//! goal against the same batch. Both take the full batch as a slice, so they
//! can only run once every path has completed.

mod aggregate;
mod goals;

pub use aggregate::{BatchStatistics, aggregate, percentile};
pub use goals::{GoalAnalyzer, time_to_goal};
