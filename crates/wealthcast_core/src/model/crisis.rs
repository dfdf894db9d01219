//! Crisis profiles and stress test output

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ids::{CrisisId, ScenarioId};

/// A historical market shock, loaded from the crisis catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrisisProfile {
    pub id: CrisisId,
    pub name: String,
    /// Headline peak-to-trough market move (%, negative)
    pub market_crash_percentage: f64,
    pub recovery_time_months: u32,
    /// Sector name -> move during the crisis (%)
    #[serde(default)]
    pub sector_impacts: BTreeMap<String, f64>,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i16>,
}

/// Contribution of one asset class to the immediate loss
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetClassImpact {
    pub asset_class: String,
    pub allocation: f64,
    /// Move applied to this asset class (%)
    pub impact_percentage: f64,
    /// Weighted contribution to the portfolio loss (percentage points)
    pub contribution: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImmediateImpact {
    /// Portfolio move (%, never positive)
    pub loss_percentage: f64,
    pub loss_amount: Decimal,
    pub portfolio_value_after_crisis: Decimal,
    pub original_value: Decimal,
    pub breakdown: Vec<AssetClassImpact>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecoveryPoint {
    pub month: u32,
    pub portfolio_value: Decimal,
    pub cumulative_contributions: Decimal,
    /// Share of the crisis loss won back so far (%)
    pub recovery_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoveryAnalysis {
    pub trajectory: Vec<RecoveryPoint>,
    /// First month the portfolio (with contributions) is back at its pre-crisis value
    pub time_to_recover_months: Option<u32>,
    pub final_recovered_value: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalImpact {
    pub goal_name: String,
    /// Extra months of contributions needed to replace the loss
    pub delay_months: Option<u32>,
    /// Extra monthly contribution that restores the loss over the goal horizon
    pub additional_monthly_contribution: Decimal,
    /// Post-crisis value is below the goal target
    pub at_risk: bool,
}

/// Qualitative reaction band picked by the behavioral advisor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BehavioralBand {
    PanicSell,
    HoldSteady,
    BuyMore,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehavioralConsiderations {
    pub band: BehavioralBand,
    pub likely_reaction: String,
    pub recommended_action: String,
    pub key_messages: Vec<String>,
    pub needs_emotional_support: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressRiskMetrics {
    /// Drawdown caused by the shock (%, positive)
    pub max_drawdown: f64,
    /// Months for market growth alone to restore the pre-crisis value
    pub time_to_breakeven_months: Option<u32>,
    /// Monthly top-up that recovers the loss within the scaled recovery window
    pub additional_required_contribution: Decimal,
}

/// Deterministic impact of one crisis on one scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressTestResult {
    pub scenario_id: ScenarioId,
    pub crisis_id: CrisisId,
    pub immediate_impact: ImmediateImpact,
    pub recovery_analysis: RecoveryAnalysis,
    pub goal_impacts: Vec<GoalImpact>,
    pub behavioral_considerations: BehavioralConsiderations,
    pub risk_metrics: StressRiskMetrics,
}
