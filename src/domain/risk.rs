//! Volatility-derived risk classification.
//!
//! Normalizes volatility to a [0,1] risk score and buckets it into a
//! categorical risk level. Requires `volatility >= 0` by upstream contract.

use crate::domain::snapshot::{round2, FeatureSnapshot};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "LOW"),
            RiskLevel::Medium => write!(f, "MEDIUM"),
            RiskLevel::High => write!(f, "HIGH"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskResult {
    pub risk_level: RiskLevel,
    pub risk_score: f64,
    pub reason: String,
}

/// Tunable constants for the risk classifier.
///
/// `volatility_ceiling` is the daily standard deviation treated as maximal
/// observed risk; the thresholds bucket the normalized score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskPolicy {
    pub volatility_ceiling: f64,
    pub low_threshold: f64,
    pub high_threshold: f64,
}

impl Default for RiskPolicy {
    fn default() -> Self {
        Self {
            volatility_ceiling: 0.03,
            low_threshold: 0.33,
            high_threshold: 0.66,
        }
    }
}

/// Classify market risk at the snapshot.
///
/// Bucketing happens on the raw normalized score; only the exposed
/// `risk_score` is rounded. A raw score of exactly `low_threshold` is
/// already Medium, and exactly `high_threshold` is already High.
pub fn classify(snapshot: &FeatureSnapshot, policy: &RiskPolicy) -> RiskResult {
    let raw_score = (snapshot.volatility / policy.volatility_ceiling).min(1.0);

    let (risk_level, reason) = if raw_score < policy.low_threshold {
        (
            RiskLevel::Low,
            "Market volatility is low, indicating stable price movements \
             and lower short-term risk.",
        )
    } else if raw_score < policy.high_threshold {
        (
            RiskLevel::Medium,
            "Market volatility is moderate, suggesting increased uncertainty \
             and potential price swings.",
        )
    } else {
        (
            RiskLevel::High,
            "Market volatility is high, indicating significant uncertainty \
             and elevated risk.",
        )
    };

    RiskResult {
        risk_level,
        risk_score: round2(raw_score),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn snap(volatility: f64) -> FeatureSnapshot {
        FeatureSnapshot::new(100.0, 100.0, 100.0, volatility).unwrap()
    }

    #[test]
    fn low_volatility_is_low_risk() {
        // 0.003 / 0.03 = 0.10
        let result = classify(&snap(0.003), &RiskPolicy::default());
        assert_eq!(result.risk_level, RiskLevel::Low);
        assert_relative_eq!(result.risk_score, 0.10);
        assert!(result.reason.contains("low"));
    }

    #[test]
    fn moderate_volatility_is_medium_risk() {
        // 0.015 / 0.03 = 0.50
        let result = classify(&snap(0.015), &RiskPolicy::default());
        assert_eq!(result.risk_level, RiskLevel::Medium);
        assert_relative_eq!(result.risk_score, 0.50);
        assert!(result.reason.contains("moderate"));
    }

    #[test]
    fn high_volatility_is_high_risk() {
        // 0.027 / 0.03 = 0.90
        let result = classify(&snap(0.027), &RiskPolicy::default());
        assert_eq!(result.risk_level, RiskLevel::High);
        assert_relative_eq!(result.risk_score, 0.90);
        assert!(result.reason.contains("high"));
    }

    #[test]
    fn score_clamped_at_one() {
        let result = classify(&snap(0.09), &RiskPolicy::default());
        assert_eq!(result.risk_level, RiskLevel::High);
        assert_relative_eq!(result.risk_score, 1.0);
    }

    #[test]
    fn zero_volatility_scores_zero() {
        let result = classify(&snap(0.0), &RiskPolicy::default());
        assert_eq!(result.risk_level, RiskLevel::Low);
        assert_relative_eq!(result.risk_score, 0.0);
    }

    #[test]
    fn low_threshold_is_closed() {
        // A unit ceiling makes the raw score equal the volatility exactly:
        // a score of exactly 0.33 is Medium, not Low.
        let policy = RiskPolicy {
            volatility_ceiling: 1.0,
            ..RiskPolicy::default()
        };
        let result = classify(&snap(0.33), &policy);
        assert_eq!(result.risk_level, RiskLevel::Medium);
    }

    #[test]
    fn high_threshold_is_closed() {
        let policy = RiskPolicy {
            volatility_ceiling: 1.0,
            ..RiskPolicy::default()
        };
        let result = classify(&snap(0.66), &policy);
        assert_eq!(result.risk_level, RiskLevel::High);
    }

    #[test]
    fn buckets_on_raw_score_not_rounded() {
        // Raw score 0.3267 is Low even though it rounds to 0.33 for display.
        let result = classify(&snap(0.0098), &RiskPolicy::default());
        assert_eq!(result.risk_level, RiskLevel::Low);
        assert_relative_eq!(result.risk_score, 0.33);
    }

    #[test]
    fn idempotent() {
        let snapshot = snap(0.0123);
        let policy = RiskPolicy::default();
        assert_eq!(classify(&snapshot, &policy), classify(&snapshot, &policy));
    }

    #[test]
    fn risk_level_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&RiskLevel::High).unwrap(), "\"HIGH\"");
    }

    proptest! {
        #[test]
        fn score_always_normalized(volatility in 0.0f64..0.5) {
            let result = classify(&snap(volatility), &RiskPolicy::default());
            prop_assert!(result.risk_score >= 0.0);
            prop_assert!(result.risk_score <= 1.0);
        }

        #[test]
        fn level_matches_raw_score(volatility in 0.0f64..0.5) {
            let policy = RiskPolicy::default();
            let raw = (volatility / policy.volatility_ceiling).min(1.0);
            let result = classify(&snap(volatility), &policy);
            let expected = if raw < policy.low_threshold {
                RiskLevel::Low
            } else if raw < policy.high_threshold {
                RiskLevel::Medium
            } else {
                RiskLevel::High
            };
            prop_assert_eq!(result.risk_level, expected);
        }
    }
}
