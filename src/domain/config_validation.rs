//! Configuration validation.
//!
//! Validates every tunable before any analysis runs, so a bad override
//! fails up front instead of skewing a recommendation.

use crate::domain::error::AdvisorError;
use crate::domain::period::Period;
use crate::ports::config_port::ConfigPort;

/// Validate all sections used by an analysis run.
pub fn validate_advisor_config(config: &dyn ConfigPort) -> Result<(), AdvisorError> {
    validate_data_config(config)?;
    validate_analysis_config(config)?;
    validate_signal_config(config)?;
    validate_risk_config(config)?;
    validate_decision_config(config)?;
    Ok(())
}

pub fn validate_data_config(config: &dyn ConfigPort) -> Result<(), AdvisorError> {
    match config.get_string("data", "csv_dir") {
        Some(dir) if !dir.trim().is_empty() => Ok(()),
        Some(_) => Err(invalid("data", "csv_dir", "csv_dir must not be empty")),
        None => Err(AdvisorError::ConfigMissing {
            section: "data".into(),
            key: "csv_dir".into(),
        }),
    }
}

pub fn validate_analysis_config(config: &dyn ConfigPort) -> Result<(), AdvisorError> {
    let sma_short = config.get_int("analysis", "sma_short", 20);
    if sma_short < 2 {
        return Err(invalid("analysis", "sma_short", "window must be at least 2"));
    }

    let sma_long = config.get_int("analysis", "sma_long", 50);
    if sma_long <= sma_short {
        return Err(invalid(
            "analysis",
            "sma_long",
            "long window must exceed the short window",
        ));
    }

    let volatility_window = config.get_int("analysis", "volatility_window", 20);
    if volatility_window < 2 {
        return Err(invalid(
            "analysis",
            "volatility_window",
            "window must be at least 2",
        ));
    }

    if let Some(period) = config.get_string("analysis", "default_period") {
        period
            .parse::<Period>()
            .map_err(|e| invalid("analysis", "default_period", &e.to_string()))?;
    }

    Ok(())
}

pub fn validate_signal_config(config: &dyn ConfigPort) -> Result<(), AdvisorError> {
    let base = config.get_double("signal", "base_confidence", 0.70);
    check_unit_interval("signal", "base_confidence", base)?;

    let cap = config.get_double("signal", "confidence_cap", 0.95);
    check_unit_interval("signal", "confidence_cap", cap)?;
    if cap < base {
        return Err(invalid(
            "signal",
            "confidence_cap",
            "cap must not be below base_confidence",
        ));
    }

    let neutral = config.get_double("signal", "neutral_confidence", 0.50);
    check_unit_interval("signal", "neutral_confidence", neutral)
}

pub fn validate_risk_config(config: &dyn ConfigPort) -> Result<(), AdvisorError> {
    let ceiling = config.get_double("risk", "volatility_ceiling", 0.03);
    if ceiling <= 0.0 || !ceiling.is_finite() {
        return Err(invalid(
            "risk",
            "volatility_ceiling",
            "ceiling must be positive",
        ));
    }

    let low = config.get_double("risk", "low_threshold", 0.33);
    let high = config.get_double("risk", "high_threshold", 0.66);
    if low <= 0.0 || low >= 1.0 {
        return Err(invalid(
            "risk",
            "low_threshold",
            "threshold must be between 0 and 1",
        ));
    }
    if high <= low || high > 1.0 {
        return Err(invalid(
            "risk",
            "high_threshold",
            "threshold must be above low_threshold and at most 1",
        ));
    }
    Ok(())
}

pub fn validate_decision_config(config: &dyn ConfigPort) -> Result<(), AdvisorError> {
    let factor = config.get_double("decision", "trend_factor", 1.1);
    if factor <= 0.0 || !factor.is_finite() {
        return Err(invalid(
            "decision",
            "trend_factor",
            "factor must be positive",
        ));
    }

    let cap = config.get_double("decision", "confidence_cap", 0.95);
    check_unit_interval("decision", "confidence_cap", cap)?;

    let floor = config.get_double("decision", "hold_floor", 0.4);
    check_unit_interval("decision", "hold_floor", floor)?;

    let fallback = config.get_double("decision", "fallback_confidence", 0.5);
    check_unit_interval("decision", "fallback_confidence", fallback)
}

fn check_unit_interval(section: &str, key: &str, value: f64) -> Result<(), AdvisorError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(section, key, "value must be between 0 and 1"))
    }
}

fn invalid(section: &str, key: &str, reason: &str) -> AdvisorError {
    AdvisorError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
