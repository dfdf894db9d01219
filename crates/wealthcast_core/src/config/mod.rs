//! Engine configuration
//!
//! `EngineConfig` holds every tunable the engine uses. Every field has a
//! serde default, so a plan file only needs to name the values it overrides:
//!
//! ```yaml
//! engine:
//!   risk_free_rate: 7.0
//!   stress:
//!     equity_multiplier: 1.1
//! ```
//!
//! The stress multipliers and recovery window fraction have no documented
//! calibration basis and can be overridden per plan.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

fn default_risk_free_rate() -> f64 {
    6.0
}

fn default_simulation_count() -> usize {
    5_000
}

fn default_max_simulations() -> usize {
    200_000
}

fn default_max_horizon_years() -> u32 {
    100
}

fn default_max_total_steps() -> u64 {
    500_000_000
}

fn default_equity_multiplier() -> f64 {
    1.2
}

fn default_debt_multiplier() -> f64 {
    0.3
}

fn default_alternatives_multiplier() -> f64 {
    0.6
}

fn default_recovery_window_fraction() -> f64 {
    0.8
}

fn default_max_recovery_projection_months() -> u32 {
    360
}

fn default_panic_loss_percentage() -> f64 {
    25.0
}

fn default_hold_loss_percentage() -> f64 {
    15.0
}

/// Complete engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Annual risk-free rate used for the Sharpe ratio (%)
    #[serde(default = "default_risk_free_rate")]
    pub risk_free_rate: f64,
    /// Simulation count used when a caller does not specify one
    #[serde(default = "default_simulation_count")]
    pub default_simulation_count: usize,
    #[serde(default)]
    pub limits: ResourceLimits,
    #[serde(default)]
    pub stress: StressConfig,
    #[serde(default)]
    pub behavior: BehaviorThresholds,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: default_risk_free_rate(),
            default_simulation_count: default_simulation_count(),
            limits: ResourceLimits::default(),
            stress: StressConfig::default(),
            behavior: BehaviorThresholds::default(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.risk_free_rate.is_finite() {
            return Err(ValidationError::InvalidConfig {
                field: "risk_free_rate",
                reason: "must be finite",
            });
        }
        if self.default_simulation_count == 0 {
            return Err(ValidationError::InvalidConfig {
                field: "default_simulation_count",
                reason: "must be at least 1",
            });
        }
        self.stress.validate()?;
        self.behavior.validate()
    }
}

/// Upper bounds on the work a single evaluation may request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResourceLimits {
    #[serde(default = "default_max_simulations")]
    pub max_simulations: usize,
    #[serde(default = "default_max_horizon_years")]
    pub max_horizon_years: u32,
    /// Cap on simulations x months for one scenario
    #[serde(default = "default_max_total_steps")]
    pub max_total_steps: u64,
}

impl Default for ResourceLimits {
    fn default() -> Self {
        Self {
            max_simulations: default_max_simulations(),
            max_horizon_years: default_max_horizon_years(),
            max_total_steps: default_max_total_steps(),
        }
    }
}

/// Parameters of the deterministic crisis model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StressConfig {
    /// Multiple of the headline crash applied to equities
    #[serde(default = "default_equity_multiplier")]
    pub equity_multiplier: f64,
    #[serde(default = "default_debt_multiplier")]
    pub debt_multiplier: f64,
    #[serde(default = "default_alternatives_multiplier")]
    pub alternatives_multiplier: f64,
    /// Share of the nominal recovery window over which the additional
    /// contribution should make up the loss
    #[serde(default = "default_recovery_window_fraction")]
    pub recovery_window_fraction: f64,
    /// How far past the recovery window to keep projecting before giving up
    #[serde(default = "default_max_recovery_projection_months")]
    pub max_recovery_projection_months: u32,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            equity_multiplier: default_equity_multiplier(),
            debt_multiplier: default_debt_multiplier(),
            alternatives_multiplier: default_alternatives_multiplier(),
            recovery_window_fraction: default_recovery_window_fraction(),
            max_recovery_projection_months: default_max_recovery_projection_months(),
        }
    }
}

impl StressConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let multipliers = [
            ("stress.equity_multiplier", self.equity_multiplier),
            ("stress.debt_multiplier", self.debt_multiplier),
            ("stress.alternatives_multiplier", self.alternatives_multiplier),
        ];
        for (field, value) in multipliers {
            if !value.is_finite() || value < 0.0 {
                return Err(ValidationError::InvalidConfig {
                    field,
                    reason: "must be a non-negative finite number",
                });
            }
        }
        if !(self.recovery_window_fraction > 0.0 && self.recovery_window_fraction <= 1.0) {
            return Err(ValidationError::InvalidConfig {
                field: "stress.recovery_window_fraction",
                reason: "must be in (0, 1]",
            });
        }
        Ok(())
    }
}

/// Loss thresholds for the behavioral advisor (%)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BehaviorThresholds {
    #[serde(default = "default_panic_loss_percentage")]
    pub panic_loss_percentage: f64,
    #[serde(default = "default_hold_loss_percentage")]
    pub hold_loss_percentage: f64,
}

impl Default for BehaviorThresholds {
    fn default() -> Self {
        Self {
            panic_loss_percentage: default_panic_loss_percentage(),
            hold_loss_percentage: default_hold_loss_percentage(),
        }
    }
}

impl BehaviorThresholds {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(self.hold_loss_percentage.is_finite() && self.panic_loss_percentage.is_finite()) {
            return Err(ValidationError::InvalidConfig {
                field: "behavior",
                reason: "thresholds must be finite",
            });
        }
        if self.hold_loss_percentage > self.panic_loss_percentage {
            return Err(ValidationError::InvalidConfig {
                field: "behavior.hold_loss_percentage",
                reason: "must not exceed panic_loss_percentage",
            });
        }
        Ok(())
    }
}
