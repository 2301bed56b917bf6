//! Trend signal classification.
//!
//! Maps the latest close and its two moving averages to a categorical
//! directional signal with a confidence score. Pure function of the
//! snapshot; never fails for a finite snapshot.

use crate::domain::snapshot::{round2, FeatureSnapshot};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Signal {
    Bullish,
    Bearish,
    Neutral,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Bullish => write!(f, "BULLISH"),
            Signal::Bearish => write!(f, "BEARISH"),
            Signal::Neutral => write!(f, "NEUTRAL"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalResult {
    pub signal: Signal,
    pub confidence: f64,
    pub reason: String,
}

/// Tunable constants for the signal classifier.
///
/// During an aligned trend, confidence is the base plus the snapshot's
/// volatility, capped at `confidence_cap`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalPolicy {
    pub base_confidence: f64,
    pub confidence_cap: f64,
    pub neutral_confidence: f64,
}

impl Default for SignalPolicy {
    fn default() -> Self {
        Self {
            base_confidence: 0.70,
            confidence_cap: 0.95,
            neutral_confidence: 0.50,
        }
    }
}

/// Classify the trend at the snapshot. First match wins:
/// close above both averages with short above long is bullish, the mirrored
/// ordering is bearish, anything else is neutral.
pub fn classify(snapshot: &FeatureSnapshot, policy: &SignalPolicy) -> SignalResult {
    if snapshot.close > snapshot.sma_short && snapshot.sma_short > snapshot.sma_long {
        return SignalResult {
            signal: Signal::Bullish,
            confidence: round2(trend_confidence(snapshot.volatility, policy)),
            reason: "Price is above both moving averages with the short average \
                     above the long, indicating a strong upward trend."
                .to_string(),
        };
    }

    if snapshot.close < snapshot.sma_short && snapshot.sma_short < snapshot.sma_long {
        return SignalResult {
            signal: Signal::Bearish,
            confidence: round2(trend_confidence(snapshot.volatility, policy)),
            reason: "Price is below both moving averages with the short average \
                     below the long, indicating a strong downward trend."
                .to_string(),
        };
    }

    SignalResult {
        signal: Signal::Neutral,
        confidence: round2(policy.neutral_confidence),
        reason: "Market shows no strong trend.".to_string(),
    }
}

fn trend_confidence(volatility: f64, policy: &SignalPolicy) -> f64 {
    (policy.base_confidence + volatility).min(policy.confidence_cap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn snap(close: f64, sma_short: f64, sma_long: f64, volatility: f64) -> FeatureSnapshot {
        FeatureSnapshot::new(close, sma_short, sma_long, volatility).unwrap()
    }

    #[test]
    fn bullish_when_close_above_aligned_averages() {
        let result = classify(&snap(110.0, 105.0, 100.0, 0.01), &SignalPolicy::default());
        assert_eq!(result.signal, Signal::Bullish);
        assert_relative_eq!(result.confidence, 0.71);
        assert!(result.reason.contains("upward"));
    }

    #[test]
    fn bearish_when_close_below_aligned_averages() {
        let result = classify(&snap(90.0, 95.0, 100.0, 0.02), &SignalPolicy::default());
        assert_eq!(result.signal, Signal::Bearish);
        assert_relative_eq!(result.confidence, 0.72);
        assert!(result.reason.contains("downward"));
    }

    #[test]
    fn neutral_when_averages_not_aligned() {
        // Close above short but short below long: no clear direction.
        let result = classify(&snap(110.0, 100.0, 105.0, 0.01), &SignalPolicy::default());
        assert_eq!(result.signal, Signal::Neutral);
        assert_relative_eq!(result.confidence, 0.50);
        assert!(result.reason.contains("no strong trend"));
    }

    #[test]
    fn neutral_when_close_equals_short_average() {
        let result = classify(&snap(100.0, 100.0, 95.0, 0.01), &SignalPolicy::default());
        assert_eq!(result.signal, Signal::Neutral);
    }

    #[test]
    fn confidence_capped_under_extreme_volatility() {
        let result = classify(&snap(110.0, 105.0, 100.0, 0.5), &SignalPolicy::default());
        assert_eq!(result.signal, Signal::Bullish);
        assert_relative_eq!(result.confidence, 0.95);
    }

    #[test]
    fn zero_volatility_gives_base_confidence() {
        let result = classify(&snap(110.0, 105.0, 100.0, 0.0), &SignalPolicy::default());
        assert_relative_eq!(result.confidence, 0.70);
    }

    #[test]
    fn idempotent() {
        let snapshot = snap(110.0, 105.0, 100.0, 0.013);
        let policy = SignalPolicy::default();
        assert_eq!(classify(&snapshot, &policy), classify(&snapshot, &policy));
    }

    #[test]
    fn signal_serializes_uppercase() {
        assert_eq!(
            serde_json::to_string(&Signal::Bullish).unwrap(),
            "\"BULLISH\""
        );
        assert_eq!(
            serde_json::to_string(&Signal::Neutral).unwrap(),
            "\"NEUTRAL\""
        );
    }

    proptest! {
        #[test]
        fn trend_confidence_stays_in_bounds(volatility in 0.0f64..1.0) {
            let policy = SignalPolicy::default();
            let result = classify(&snap(110.0, 105.0, 100.0, volatility), &policy);
            prop_assert_eq!(result.signal, Signal::Bullish);
            prop_assert!(result.confidence >= policy.base_confidence);
            prop_assert!(result.confidence <= policy.confidence_cap);
        }

        #[test]
        fn misaligned_orderings_are_neutral(
            close in 1.0f64..200.0,
            sma_short in 1.0f64..200.0,
            sma_long in 1.0f64..200.0,
        ) {
            let bullish = close > sma_short && sma_short > sma_long;
            let bearish = close < sma_short && sma_short < sma_long;
            prop_assume!(!bullish && !bearish);

            let result = classify(
                &snap(close, sma_short, sma_long, 0.01),
                &SignalPolicy::default(),
            );
            prop_assert_eq!(result.signal, Signal::Neutral);
            prop_assert_eq!(result.confidence, 0.50);
        }
    }
}
