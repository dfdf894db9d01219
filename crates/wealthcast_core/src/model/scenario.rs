//! Scenario definitions supplied by the advisor
//!
//! A scenario is one candidate strategy: an asset allocation with its market
//! assumptions, plus the amount the client contributes each month.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ids::ScenarioId;
use crate::error::ValidationError;
use crate::money;

/// Tolerance when checking that allocations add up to 100%
const ALLOCATION_SUM_TOLERANCE: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl RiskLevel {
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
            RiskLevel::VeryHigh => "Very High",
        }
    }
}

/// How often the portfolio is rebalanced. Informational only; the simulator
/// models the blended portfolio directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RebalancingFrequency {
    Monthly,
    #[default]
    Quarterly,
    SemiAnnually,
    Annually,
    Never,
}

/// Market assumptions and allocation for a scenario.
///
/// All fields are percentages: `expected_return: 10.0` means 10% a year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioParameters {
    pub equity_allocation: f64,
    pub debt_allocation: f64,
    pub alternatives_allocation: f64,
    /// Expected annual return (%)
    pub expected_return: f64,
    /// Annual volatility (%)
    pub volatility: f64,
    /// Drawdown the client is prepared to tolerate (%)
    #[serde(default)]
    pub max_drawdown: f64,
    #[serde(default)]
    pub rebalancing_frequency: RebalancingFrequency,
    pub risk_level: RiskLevel,
}

impl ScenarioParameters {
    /// Expected annual return as a decimal fraction
    #[must_use]
    pub fn annual_return_fraction(&self) -> f64 {
        self.expected_return / 100.0
    }

    /// Annual volatility as a decimal fraction
    #[must_use]
    pub fn annual_volatility_fraction(&self) -> f64 {
        self.volatility / 100.0
    }

    /// Expected monthly return as a decimal fraction
    #[must_use]
    pub fn monthly_return_fraction(&self) -> f64 {
        self.annual_return_fraction() / 12.0
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let finite = [
            ("equity_allocation", self.equity_allocation),
            ("debt_allocation", self.debt_allocation),
            ("alternatives_allocation", self.alternatives_allocation),
            ("expected_return", self.expected_return),
            ("volatility", self.volatility),
            ("max_drawdown", self.max_drawdown),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(ValidationError::NotFinite { field, value });
            }
        }

        if self.volatility < 0.0 {
            return Err(ValidationError::NegativeVolatility(self.volatility));
        }
        if self.expected_return <= -100.0 {
            return Err(ValidationError::ExpectedReturnTooLow(self.expected_return));
        }
        if self.max_drawdown < 0.0 {
            return Err(ValidationError::NegativeDrawdownTarget(self.max_drawdown));
        }

        let allocations = [
            ("equity_allocation", self.equity_allocation),
            ("debt_allocation", self.debt_allocation),
            ("alternatives_allocation", self.alternatives_allocation),
        ];
        for (field, value) in allocations {
            if !(0.0..=100.0).contains(&value) {
                return Err(ValidationError::AllocationOutOfRange { field, value });
            }
        }

        let sum = self.equity_allocation + self.debt_allocation + self.alternatives_allocation;
        if (sum - 100.0).abs() > ALLOCATION_SUM_TOLERANCE {
            return Err(ValidationError::AllocationSum(sum));
        }

        Ok(())
    }
}

/// One candidate investment strategy under comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub id: ScenarioId,
    pub name: String,
    pub parameters: ScenarioParameters,
    /// Contribution added at the end of every month
    pub monthly_investment: Decimal,
}

impl Scenario {
    #[must_use]
    pub fn monthly_investment_f64(&self) -> f64 {
        money::to_f64(self.monthly_investment)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.parameters.validate()?;
        if self.monthly_investment < Decimal::ZERO {
            return Err(ValidationError::NegativeMonthlyInvestment {
                scenario: self.id.clone(),
                amount: self.monthly_investment,
            });
        }
        Ok(())
    }
}
