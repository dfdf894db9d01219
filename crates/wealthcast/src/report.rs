//! Report rendering for the command line

use std::fmt::Write;

use clap::ValueEnum;
use color_eyre::eyre::eyre;
use rust_decimal::Decimal;
use serde::Serialize;
use wealthcast_core::model::TimeToGoal;
use wealthcast_core::{CrisisProfile, ScenarioComparison, SimulationResult, StressTestResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    Yaml,
    Json,
    #[default]
    Text,
}

/// Everything a command can print
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Report {
    Evaluations(Vec<SimulationResult>),
    StressTests(Vec<StressTestResult>),
    Comparison(ScenarioComparison),
    Crises(Vec<CrisisProfile>),
}

impl Report {
    pub fn render(&self, format: OutputFormat) -> color_eyre::Result<String> {
        Ok(match format {
            OutputFormat::Yaml => serde_saphyr::to_string(self)
                .map_err(|e| eyre!("failed to render YAML report: {e}"))?,
            OutputFormat::Json => {
                let mut json = serde_json::to_string_pretty(self)?;
                json.push('\n');
                json
            }
            OutputFormat::Text => self.to_text(),
        })
    }

    fn to_text(&self) -> String {
        let mut out = String::new();
        match self {
            Report::Evaluations(results) => {
                for result in results {
                    write_evaluation(&mut out, result);
                }
            }
            Report::StressTests(results) => {
                for result in results {
                    write_stress_test(&mut out, result);
                }
            }
            Report::Comparison(comparison) => write_comparison(&mut out, comparison),
            Report::Crises(crises) => write_crises(&mut out, crises),
        }
        out
    }
}

/// Thousands-separated amount, e.g. `1,234,567.89`
fn money(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let text = format!("{:.2}", rounded.abs());
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::new();
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}{grouped}.{fraction}")
}

fn months(value: Option<u32>) -> String {
    value.map_or_else(|| "never".to_string(), |m| format!("{m} months"))
}

// fmt::Write into a String is infallible

fn write_evaluation(out: &mut String, r: &SimulationResult) {
    let v = &r.portfolio_value;
    let ret = &r.annualized_return;
    let risk = &r.risk_metrics;
    let wealth = &r.wealth_metrics;

    let _ = writeln!(
        out,
        "Scenario {} ({} runs over {} years, seed {})",
        r.scenario_id, r.simulation_count, r.years_simulated, r.seed
    );
    let _ = writeln!(out, "  Total invested        {:>18}", money(r.total_invested));
    let _ = writeln!(out, "  Portfolio value");
    for (label, value) in [
        ("p10", v.p10),
        ("p25", v.p25),
        ("p50", v.p50),
        ("p75", v.p75),
        ("p90", v.p90),
        ("mean", v.mean),
    ] {
        let _ = writeln!(out, "    {label:<20}{:>18}", money(value));
    }
    let _ = writeln!(
        out,
        "  Annualized return     p10 {:.2}%  p50 {:.2}%  p90 {:.2}%",
        ret.p10, ret.p50, ret.p90
    );
    let _ = writeln!(
        out,
        "  Risk                  success {:.1}%  VaR95 {:.1}%  drawdown p95 {:.1}%  Sharpe {:.2}",
        risk.success_rate, risk.value_at_risk_95, risk.max_drawdown_p95, risk.sharpe_ratio
    );
    let _ = writeln!(
        out,
        "  Wealth                x{:.2} median multiple  {:.2}% CAGR  {:.1}% chance of loss",
        wealth.median_multiplier, wealth.compound_growth_rate, wealth.probability_of_loss
    );

    if !r.goal_analysis.is_empty() {
        let _ = writeln!(out, "  Goals");
    }
    for goal in &r.goal_analysis {
        let time = match goal.time_to_goal {
            TimeToGoal::Months(m) => format!("{:.0} months", m.ceil()),
            TimeToGoal::Unreachable => "unreachable".to_string(),
        };
        let _ = writeln!(
            out,
            "    {:<20}target {:>16}  success {:>5.1}%  shortfall {:>14}  time {}{}",
            goal.name,
            money(goal.target_amount),
            goal.success_rate,
            money(goal.average_shortfall),
            time,
            if goal.reachable_within_horizon {
                ""
            } else {
                " (beyond horizon)"
            }
        );
    }
    out.push('\n');
}

fn write_stress_test(out: &mut String, r: &StressTestResult) {
    let impact = &r.immediate_impact;
    let recovery = &r.recovery_analysis;
    let behavior = &r.behavioral_considerations;

    let _ = writeln!(out, "Crisis {} on scenario {}", r.crisis_id, r.scenario_id);
    let _ = writeln!(
        out,
        "  Immediate loss        {:.2}% ({} -> {})",
        impact.loss_percentage,
        money(impact.original_value),
        money(impact.portfolio_value_after_crisis)
    );
    for class in &impact.breakdown {
        let _ = writeln!(
            out,
            "    {:<20}{:>5.1}% at {:>6.1}% = {:>6.2} pts",
            class.asset_class, class.allocation, class.impact_percentage, class.contribution
        );
    }
    let _ = writeln!(
        out,
        "  Recovery              {} (value {} after {} months)",
        months(recovery.time_to_recover_months),
        money(recovery.final_recovered_value),
        recovery.trajectory.len()
    );
    let _ = writeln!(
        out,
        "  Breakeven (market)    {}",
        months(r.risk_metrics.time_to_breakeven_months)
    );
    let _ = writeln!(
        out,
        "  Extra contribution    {} / month",
        money(r.risk_metrics.additional_required_contribution)
    );
    for goal in &r.goal_impacts {
        let _ = writeln!(
            out,
            "    {:<20}delay {}  +{} / month{}",
            goal.goal_name,
            months(goal.delay_months),
            money(goal.additional_monthly_contribution),
            if goal.at_risk { "  AT RISK" } else { "" }
        );
    }
    let _ = writeln!(out, "  Likely reaction       {}", behavior.likely_reaction);
    let _ = writeln!(out, "  Recommendation        {}", behavior.recommended_action);
    for message in &behavior.key_messages {
        let _ = writeln!(out, "    - {message}");
    }
    out.push('\n');
}

fn write_comparison(out: &mut String, comparison: &ScenarioComparison) {
    let _ = writeln!(
        out,
        "{:<4}{:<24}{:>18}{:>10}{:>10}",
        "#", "Scenario", "Median", "Success", "VaR95"
    );
    for (rank, id) in comparison.ranking_by_median.iter().enumerate() {
        let Some(r) = comparison.get(id) else {
            continue;
        };
        let _ = writeln!(
            out,
            "{:<4}{:<24}{:>18}{:>9.1}%{:>9.1}%",
            rank + 1,
            id.to_string(),
            money(r.median_value()),
            r.risk_metrics.success_rate,
            r.risk_metrics.value_at_risk_95
        );
    }
    if let Some(best) = comparison.ranking_by_success_rate.first() {
        let _ = writeln!(out, "\nMost likely to beat contributions: {best}");
    }
}

fn write_crises(out: &mut String, crises: &[CrisisProfile]) {
    for crisis in crises {
        let year = crisis.year.map(|y| format!(" ({y})")).unwrap_or_default();
        let _ = writeln!(
            out,
            "{:<30}{:>7.1}%  {:>3} months  {}{}",
            crisis.id.to_string(),
            crisis.market_crash_percentage,
            crisis.recovery_time_months,
            crisis.name,
            year
        );
    }
}
