//! Feature snapshot: the latest row of derived indicators.

use crate::domain::error::AdvisorError;
use serde::Serialize;

/// The single most-recent observation the classifiers run on.
///
/// All fields must be finite; construction fails fast on NaN or infinity.
/// Window sufficiency is the feature provider's responsibility, not
/// re-checked here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureSnapshot {
    pub close: f64,
    pub sma_short: f64,
    pub sma_long: f64,
    pub volatility: f64,
}

impl FeatureSnapshot {
    pub fn new(
        close: f64,
        sma_short: f64,
        sma_long: f64,
        volatility: f64,
    ) -> Result<Self, AdvisorError> {
        check_finite("close", close)?;
        check_finite("sma_short", sma_short)?;
        check_finite("sma_long", sma_long)?;
        check_finite("volatility", volatility)?;
        Ok(Self {
            close,
            sma_short,
            sma_long,
            volatility,
        })
    }
}

fn check_finite(field: &str, value: f64) -> Result<(), AdvisorError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(AdvisorError::MalformedSnapshot {
            field: field.to_string(),
            value,
        })
    }
}

/// Round to two decimals for exposed confidences and scores.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn valid_snapshot() {
        let snap = FeatureSnapshot::new(105.0, 100.0, 95.0, 0.015).unwrap();
        assert_relative_eq!(snap.close, 105.0);
        assert_relative_eq!(snap.volatility, 0.015);
    }

    #[test]
    fn nan_field_rejected() {
        let err = FeatureSnapshot::new(f64::NAN, 100.0, 95.0, 0.015).unwrap_err();
        match err {
            AdvisorError::MalformedSnapshot { field, .. } => assert_eq!(field, "close"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn infinite_field_rejected() {
        let err = FeatureSnapshot::new(105.0, 100.0, 95.0, f64::INFINITY).unwrap_err();
        match err {
            AdvisorError::MalformedSnapshot { field, value } => {
                assert_eq!(field, "volatility");
                assert!(value.is_infinite());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn round2_behavior() {
        assert_relative_eq!(round2(0.876), 0.88);
        assert_relative_eq!(round2(0.874), 0.87);
        assert_relative_eq!(round2(0.5), 0.5);
    }

    #[test]
    fn serializes_all_fields() {
        let snap = FeatureSnapshot::new(105.0, 100.0, 95.0, 0.015).unwrap();
        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["close"], 105.0);
        assert_eq!(json["sma_short"], 100.0);
        assert_eq!(json["sma_long"], 95.0);
        assert_eq!(json["volatility"], 0.015);
    }
}
