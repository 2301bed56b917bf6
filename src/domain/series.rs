//! Price series validation ahead of feature engineering.
//!
//! The classifiers assume a fully-formed snapshot, so the series feeding it
//! must be chronologically sorted, free of duplicate dates, long enough for
//! every rolling window, and numerically sane.

use crate::domain::error::AdvisorError;
use crate::domain::ohlcv::OhlcvBar;

/// Validate and normalize a raw bar series.
///
/// Sorts by date (stable), drops exact duplicate dates keeping the first
/// occurrence, and fails fast on an empty series, non-finite prices, or too
/// few bars for `minimum`.
pub fn validate_series(
    ticker: &str,
    mut bars: Vec<OhlcvBar>,
    minimum: usize,
) -> Result<Vec<OhlcvBar>, AdvisorError> {
    if bars.is_empty() {
        return Err(AdvisorError::NoData {
            ticker: ticker.to_string(),
        });
    }

    bars.sort_by_key(|b| b.date);
    bars.dedup_by_key(|b| b.date);

    for bar in &bars {
        for (name, value) in [
            ("open", bar.open),
            ("high", bar.high),
            ("low", bar.low),
            ("close", bar.close),
        ] {
            if !value.is_finite() {
                return Err(AdvisorError::Data {
                    reason: format!("non-finite {name} for {ticker} on {}", bar.date),
                });
            }
        }
    }

    if bars.len() < minimum {
        return Err(AdvisorError::InsufficientData {
            ticker: ticker.to_string(),
            bars: bars.len(),
            minimum,
        });
    }

    Ok(bars)
}
