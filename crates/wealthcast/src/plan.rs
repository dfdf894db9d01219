//! Plan files
//!
//! A plan is the YAML document the command line works from: the client's age
//! and goals, the candidate scenarios, and optional engine overrides.
//!
//! ```yaml
//! client:
//!   name: Example client
//!   age: 35
//!   goals:
//!     - name: Retirement
//!       target_amount: 30000000
//!       horizon_years: 25
//! scenarios:
//!   - id: balanced
//!     name: Balanced growth
//!     monthly_investment: 20000
//!     parameters:
//!       equity_allocation: 60
//!       debt_allocation: 35
//!       alternatives_allocation: 5
//!       expected_return: 10
//!       volatility: 14
//!       risk_level: medium
//! engine:
//!   risk_free_rate: 6.5
//! ```

use std::path::Path;

use color_eyre::eyre::{WrapErr, bail};
use serde::{Deserialize, Serialize};
use wealthcast_core::{EngineConfig, GoalDefinition, Scenario, ScenarioId, horizon_years_for_age};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub age: u32,
    #[serde(default)]
    pub goals: Vec<GoalDefinition>,
    /// Overrides the age-based simulation horizon
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horizon_years: Option<u32>,
}

impl ClientProfile {
    /// Simulation horizon: the explicit override, or the age-based default
    #[must_use]
    pub fn horizon_years(&self) -> u32 {
        self.horizon_years.unwrap_or_else(|| horizon_years_for_age(self.age))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanFile {
    pub client: ClientProfile,
    pub scenarios: Vec<Scenario>,
    /// Evaluation date for goal target years; defaults to today
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub as_of: Option<jiff::civil::Date>,
    #[serde(default)]
    pub engine: EngineConfig,
}

impl PlanFile {
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_saphyr::Error> {
        serde_saphyr::from_str(yaml)
    }

    pub fn load(path: &Path) -> color_eyre::Result<Self> {
        let content = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read plan file {}", path.display()))?;
        let plan = Self::from_yaml(&content)
            .wrap_err_with(|| format!("failed to parse plan file {}", path.display()))?;
        tracing::debug!(
            path = %path.display(),
            scenarios = plan.scenarios.len(),
            goals = plan.client.goals.len(),
            "Loaded plan"
        );
        Ok(plan)
    }

    /// The named scenario, or every scenario when `id` is `None`
    pub fn select(&self, id: Option<&str>) -> color_eyre::Result<Vec<&Scenario>> {
        match id {
            None => {
                if self.scenarios.is_empty() {
                    bail!("plan has no scenarios");
                }
                Ok(self.scenarios.iter().collect())
            }
            Some(id) => {
                let wanted = ScenarioId::from(id);
                match self.scenarios.iter().find(|s| s.id == wanted) {
                    Some(scenario) => Ok(vec![scenario]),
                    None => bail!(
                        "scenario {id:?} not found; plan has {}",
                        self.scenarios
                            .iter()
                            .map(|s| s.id.to_string())
                            .collect::<Vec<_>>()
                            .join(", ")
                    ),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tempfile::tempdir;
    use wealthcast_core::RiskLevel;

    const PLAN: &str = r#"
client:
  name: Test client
  age: 40
  goals:
    - name: Retirement
      target_amount: 30000000
      horizon_years: 25
    - name: Education
      target_amount: "2500000.50"
      target_year: 2035
scenarios:
  - id: balanced
    name: Balanced
    monthly_investment: 20000
    parameters:
      equity_allocation: 60
      debt_allocation: 35
      alternatives_allocation: 5
      expected_return: 10
      volatility: 14
      risk_level: medium
  - id: growth
    name: Growth
    monthly_investment: 25000
    parameters:
      equity_allocation: 85
      debt_allocation: 10
      alternatives_allocation: 5
      expected_return: 12.5
      volatility: 18
      max_drawdown: 35
      rebalancing_frequency: annually
      risk_level: very_high
as_of: 2025-01-15
engine:
  risk_free_rate: 6.5
  stress:
    recovery_window_fraction: 0.75
"#;

    #[test]
    fn test_parse_plan() {
        let plan = PlanFile::from_yaml(PLAN).unwrap();

        assert_eq!(plan.client.age, 40);
        assert_eq!(plan.client.horizon_years(), 25);
        assert_eq!(plan.client.goals.len(), 2);
        assert_eq!(plan.client.goals[0].target_amount, dec!(30000000));
        assert_eq!(plan.client.goals[1].target_amount, dec!(2500000.50));
        assert_eq!(plan.client.goals[1].target_year, Some(2035));

        assert_eq!(plan.scenarios.len(), 2);
        assert_eq!(plan.scenarios[0].monthly_investment, dec!(20000));
        assert_eq!(plan.scenarios[1].parameters.risk_level, RiskLevel::VeryHigh);
        assert_eq!(plan.as_of, Some(jiff::civil::date(2025, 1, 15)));

        assert_eq!(plan.engine.risk_free_rate, 6.5);
        assert_eq!(plan.engine.stress.recovery_window_fraction, 0.75);
        assert_eq!(plan.engine.stress.equity_multiplier, 1.2);
    }

    #[test]
    fn test_engine_section_optional() {
        let yaml = r#"
client:
  age: 62
scenarios: []
"#;
        let plan = PlanFile::from_yaml(yaml).unwrap();
        assert_eq!(plan.engine, EngineConfig::default());
        assert!(plan.client.goals.is_empty());
        // 65 - 62 is below the 10 year floor
        assert_eq!(plan.client.horizon_years(), 10);
        assert!(plan.select(None).is_err());
    }

    #[test]
    fn test_select_scenarios() {
        let plan = PlanFile::from_yaml(PLAN).unwrap();
        assert_eq!(plan.select(None).unwrap().len(), 2);

        let growth = plan.select(Some("growth")).unwrap();
        assert_eq!(growth.len(), 1);
        assert_eq!(growth[0].name, "Growth");

        let err = plan.select(Some("missing")).unwrap_err();
        assert!(err.to_string().contains("balanced, growth"));
    }

    #[test]
    fn test_sample_plan_is_valid() {
        let plan = PlanFile::from_yaml(include_str!("../plans/sample.yaml")).unwrap();
        assert_eq!(plan.client.horizon_years(), 27);
        assert_eq!(plan.select(None).unwrap().len(), 3);
        for scenario in &plan.scenarios {
            scenario.validate().unwrap();
        }
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("plan.yaml");
        std::fs::write(&path, PLAN).unwrap();

        let plan = PlanFile::load(&path).unwrap();
        assert_eq!(plan.scenarios[0].id, ScenarioId::from("balanced"));
    }

    #[test]
    fn test_load_reports_path() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope.yaml");
        let err = PlanFile::load(&missing).unwrap_err();
        assert!(err.to_string().contains("nope.yaml"));

        let broken = dir.path().join("broken.yaml");
        std::fs::write(&broken, "client: [").unwrap();
        let err = PlanFile::load(&broken).unwrap_err();
        assert!(err.to_string().contains("failed to parse plan file"));
    }
}
