//! Client goals and per-goal outcomes

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A savings goal supplied by the client record.
///
/// The horizon comes either from `horizon_years` directly or from
/// `target_year` relative to the evaluation date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalDefinition {
    pub name: String,
    pub target_amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_year: Option<i16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horizon_years: Option<u32>,
}

impl GoalDefinition {
    #[must_use]
    pub fn new(name: impl Into<String>, target_amount: Decimal, horizon_years: u32) -> Self {
        Self {
            name: name.into(),
            target_amount,
            target_year: None,
            horizon_years: Some(horizon_years),
        }
    }

    /// Resolve the goal horizon in whole years. An explicit horizon wins over
    /// a target year.
    pub fn resolve_horizon(&self, as_of_year: i16) -> Result<u32, ValidationError> {
        let years = match (self.horizon_years, self.target_year) {
            (Some(h), _) => i64::from(h),
            (None, Some(year)) => i64::from(year) - i64::from(as_of_year),
            (None, None) => {
                return Err(ValidationError::MissingGoalHorizon {
                    name: self.name.clone(),
                });
            }
        };

        if years < 1 {
            return Err(ValidationError::GoalHorizonTooShort {
                name: self.name.clone(),
                years,
            });
        }
        // years >= 1 and bounded by u32 or i16 arithmetic above
        Ok(years as u32)
    }

    pub fn validate(&self, as_of_year: i16) -> Result<u32, ValidationError> {
        if self.target_amount <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveGoalTarget {
                name: self.name.clone(),
                amount: self.target_amount,
            });
        }
        self.resolve_horizon(as_of_year)
    }
}

/// Months needed to accumulate a target with steady contributions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "months", rename_all = "snake_case")]
pub enum TimeToGoal {
    Months(f64),
    /// No contributions, or a negative return that caps growth below the target
    Unreachable,
}

impl TimeToGoal {
    #[must_use]
    pub fn months(&self) -> Option<f64> {
        match self {
            TimeToGoal::Months(m) => Some(*m),
            TimeToGoal::Unreachable => None,
        }
    }

    /// Months as a plain number with `Unreachable` mapped to infinity, for
    /// ordering and comparisons.
    #[must_use]
    pub fn as_months_or_infinity(&self) -> f64 {
        self.months().unwrap_or(f64::INFINITY)
    }

    #[must_use]
    pub fn is_reachable(&self) -> bool {
        matches!(self, TimeToGoal::Months(_))
    }
}

/// Outcome of one goal across a Monte Carlo batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalOutcome {
    pub name: String,
    pub target_amount: Decimal,
    pub horizon_years: u32,
    /// Percentage of runs ending at or above the target
    pub success_rate: f64,
    /// Mean shortfall over the runs that missed the target
    pub average_shortfall: Decimal,
    /// Median terminal portfolio value
    pub median_achievement: Decimal,
    /// Median terminal value as a percentage of the target
    pub achievement_ratio: f64,
    pub time_to_goal: TimeToGoal,
    pub reachable_within_horizon: bool,
}
