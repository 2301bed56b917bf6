//! Decision aggregation.
//!
//! Reconciles the trend signal and the risk level into one final action via
//! an explicit, ordered rule table evaluated top-down with a mandatory
//! fallback. Order matters: the low-risk directional rules must be tried
//! before the high-risk override.

use crate::domain::risk::{RiskLevel, RiskResult};
use crate::domain::signal::{Signal, SignalResult};
use crate::domain::snapshot::round2;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    Buy,
    Sell,
    Hold,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Buy => write!(f, "BUY"),
            Action::Sell => write!(f, "SELL"),
            Action::Hold => write!(f, "HOLD"),
        }
    }
}

/// Both classifier results, carried verbatim for traceability.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentSummary {
    pub technical: SignalResult,
    pub risk: RiskResult,
}

/// The terminal artifact returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decision {
    #[serde(rename = "final_decision")]
    pub action: Action,
    pub confidence: f64,
    pub reasoning: String,
    pub agent_summary: AgentSummary,
}

/// How a matched rule derives its confidence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfidenceFormula {
    /// min(technical confidence * factor, cap)
    ScaledTechnical { factor: f64, cap: f64 },
    /// max(floor, 1 - risk score)
    InverseRisk { floor: f64 },
    Fixed(f64),
}

impl ConfidenceFormula {
    fn apply(&self, tech_confidence: f64, risk_score: f64) -> f64 {
        match *self {
            ConfidenceFormula::ScaledTechnical { factor, cap } => {
                (tech_confidence * factor).min(cap)
            }
            ConfidenceFormula::InverseRisk { floor } => (1.0 - risk_score).max(floor),
            ConfidenceFormula::Fixed(value) => value,
        }
    }
}

/// Action, confidence formula and reasoning produced by a matched rule.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub action: Action,
    pub confidence: ConfidenceFormula,
    pub reasoning: String,
}

/// One row of the precedence table. `None` patterns match any value.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionRule {
    pub signal: Option<Signal>,
    pub risk: Option<RiskLevel>,
    pub outcome: Outcome,
}

impl DecisionRule {
    fn matches(&self, signal: Signal, risk: RiskLevel) -> bool {
        self.signal.is_none_or(|s| s == signal) && self.risk.is_none_or(|r| r == risk)
    }
}

/// Ordered rule table with a mandatory fallback.
///
/// The default table intentionally has no row for a directional signal with
/// Medium risk; those combinations fall through to the fallback. Swapping in
/// a table that covers them is a construction-time change, not an engine
/// change.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionPolicy {
    pub rules: Vec<DecisionRule>,
    pub fallback: Outcome,
}

impl DecisionPolicy {
    /// The reference precedence table:
    /// bullish+low buy, bearish+low sell, any+high hold, neutral hold.
    pub fn default_table(
        trend_factor: f64,
        confidence_cap: f64,
        hold_floor: f64,
        fallback_confidence: f64,
    ) -> Self {
        Self {
            rules: vec![
                DecisionRule {
                    signal: Some(Signal::Bullish),
                    risk: Some(RiskLevel::Low),
                    outcome: Outcome {
                        action: Action::Buy,
                        confidence: ConfidenceFormula::ScaledTechnical {
                            factor: trend_factor,
                            cap: confidence_cap,
                        },
                        reasoning: "Technical indicators show a bullish trend and market \
                                    risk is low, supporting a buy decision."
                            .to_string(),
                    },
                },
                DecisionRule {
                    signal: Some(Signal::Bearish),
                    risk: Some(RiskLevel::Low),
                    outcome: Outcome {
                        action: Action::Sell,
                        confidence: ConfidenceFormula::ScaledTechnical {
                            factor: trend_factor,
                            cap: confidence_cap,
                        },
                        reasoning: "Technical indicators show a bearish trend and market \
                                    risk is low, supporting a sell decision."
                            .to_string(),
                    },
                },
                DecisionRule {
                    signal: None,
                    risk: Some(RiskLevel::High),
                    outcome: Outcome {
                        action: Action::Hold,
                        confidence: ConfidenceFormula::InverseRisk { floor: hold_floor },
                        reasoning: "Market risk is high, indicating elevated uncertainty. \
                                    Holding position is safer despite technical signals."
                            .to_string(),
                    },
                },
                DecisionRule {
                    signal: Some(Signal::Neutral),
                    risk: None,
                    outcome: Outcome {
                        action: Action::Hold,
                        confidence: ConfidenceFormula::Fixed(fallback_confidence),
                        reasoning: "Technical indicators do not show a clear trend. \
                                    Holding position is recommended."
                            .to_string(),
                    },
                },
            ],
            fallback: Outcome {
                action: Action::Hold,
                confidence: ConfidenceFormula::Fixed(fallback_confidence),
                reasoning: "Insufficient alignment between agents.".to_string(),
            },
        }
    }
}

impl Default for DecisionPolicy {
    fn default() -> Self {
        Self::default_table(1.1, 0.95, 0.4, 0.5)
    }
}

/// Walk the table top-down and apply the first matching rule.
///
/// Consumes the exposed (already rounded) confidence and risk score, so the
/// blended confidence is a function of what the caller can see.
pub fn aggregate(
    technical: &SignalResult,
    risk: &RiskResult,
    policy: &DecisionPolicy,
) -> Decision {
    let outcome = policy
        .rules
        .iter()
        .find(|rule| rule.matches(technical.signal, risk.risk_level))
        .map(|rule| &rule.outcome)
        .unwrap_or(&policy.fallback);

    Decision {
        action: outcome.action,
        confidence: round2(outcome.confidence.apply(technical.confidence, risk.risk_score)),
        reasoning: outcome.reasoning.clone(),
        agent_summary: AgentSummary {
            technical: technical.clone(),
            risk: risk.clone(),
        },
    }
}
