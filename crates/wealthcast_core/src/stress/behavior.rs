//! Behavioral guidance for clients living through a crisis.

use crate::config::BehaviorThresholds;
use crate::model::{BehavioralBand, BehavioralConsiderations, RiskLevel};

/// Maps a crisis loss and the client's risk tolerance to a reaction band
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BehavioralAdvisor {
    thresholds: BehaviorThresholds,
}

impl Default for BehavioralAdvisor {
    fn default() -> Self {
        Self::new(BehaviorThresholds::default())
    }
}

impl BehavioralAdvisor {
    #[must_use]
    pub fn new(thresholds: BehaviorThresholds) -> Self {
        Self { thresholds }
    }

    /// Bands are checked from most to least severe; the first match wins.
    #[must_use]
    pub fn band(&self, loss_percentage: f64, risk_level: RiskLevel) -> BehavioralBand {
        let loss = loss_percentage.abs();
        if loss > self.thresholds.panic_loss_percentage || risk_level == RiskLevel::Low {
            BehavioralBand::PanicSell
        } else if loss > self.thresholds.hold_loss_percentage || risk_level == RiskLevel::Medium {
            BehavioralBand::HoldSteady
        } else {
            BehavioralBand::BuyMore
        }
    }

    #[must_use]
    pub fn advise(&self, loss_percentage: f64, risk_level: RiskLevel) -> BehavioralConsiderations {
        let band = self.band(loss_percentage, risk_level);
        let loss = format!("{:.1}%", loss_percentage.abs());

        match band {
            BehavioralBand::PanicSell => BehavioralConsiderations {
                band,
                likely_reaction: format!(
                    "A {loss} drop is likely to cause significant anxiety and an urge to sell \
                     everything to stop further losses"
                ),
                recommended_action: "Stay invested and avoid selling at the bottom. Schedule a \
                                     review call before making any change to the plan"
                    .into(),
                key_messages: vec![
                    "Markets have recovered from every major crisis in this catalog".into(),
                    "Selling now turns a temporary decline into a permanent loss".into(),
                    "Continuing monthly investments buys more units at lower prices".into(),
                    "Your goals are long term and the plan already allows for downturns".into(),
                ],
                needs_emotional_support: true,
            },
            BehavioralBand::HoldSteady => BehavioralConsiderations {
                band,
                likely_reaction: format!(
                    "A {loss} drop may cause concern and second thoughts about the strategy"
                ),
                recommended_action: "Hold the current allocation and keep monthly investments \
                                     running"
                    .into(),
                key_messages: vec![
                    "Declines of this size are a normal part of investing".into(),
                    "Rebalancing back to target keeps risk where it was planned".into(),
                    "Short-term volatility does not change long-term goals".into(),
                ],
                needs_emotional_support: false,
            },
            BehavioralBand::BuyMore => BehavioralConsiderations {
                band,
                likely_reaction: format!(
                    "A {loss} drop is within tolerance and may look like an opportunity"
                ),
                recommended_action: "Consider a lump-sum top-up or a temporary increase in \
                                     monthly investments"
                    .into(),
                key_messages: vec![
                    "Lower prices raise expected long-term returns".into(),
                    "Extra contributions now shorten the recovery period".into(),
                ],
                needs_emotional_support: false,
            },
        }
    }
}
