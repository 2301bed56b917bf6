//! Feature engineering: derive the snapshot the classifiers consume.
//!
//! Indicators, evaluated at the most recent bar only:
//! - Simple moving averages of the close (short and long window)
//! - Daily returns (percent change)
//! - Volatility: rolling sample standard deviation of daily returns
//!
//! The volatility divisor is n-1 (sample, not population), matching the
//! reference feature computation.

use crate::domain::error::AdvisorError;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::snapshot::FeatureSnapshot;

/// Rolling-window lengths for the derived indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureParams {
    pub sma_short: usize,
    pub sma_long: usize,
    pub volatility_window: usize,
}

impl Default for FeatureParams {
    fn default() -> Self {
        Self {
            sma_short: 20,
            sma_long: 50,
            volatility_window: 20,
        }
    }
}

impl FeatureParams {
    /// Bars required for every window to be fully formed. The volatility
    /// window consumes returns, which need one extra bar.
    pub fn min_bars(&self) -> usize {
        self.sma_long
            .max(self.sma_short)
            .max(self.volatility_window + 1)
    }
}

/// Mean of the last `window` closes.
fn sma_at_end(closes: &[f64], window: usize) -> f64 {
    let tail = &closes[closes.len() - window..];
    tail.iter().sum::<f64>() / window as f64
}

/// Percent change between consecutive closes; one value per bar after the
/// first.
pub fn daily_returns(closes: &[f64]) -> Vec<f64> {
    closes
        .windows(2)
        .map(|pair| (pair[1] - pair[0]) / pair[0])
        .collect()
}

/// Sample standard deviation (n-1 divisor).
fn sample_stddev(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let variance = values
        .iter()
        .map(|v| {
            let diff = v - mean;
            diff * diff
        })
        .sum::<f64>()
        / (n - 1) as f64;
    variance.sqrt()
}

/// Derive the feature snapshot at the latest bar of a validated series.
///
/// Fails with `InsufficientData` when any window cannot be filled, and with
/// `MalformedSnapshot` when the derived values are non-finite (for example
/// a zero close producing an infinite return).
pub fn latest_snapshot(
    ticker: &str,
    bars: &[OhlcvBar],
    params: &FeatureParams,
) -> Result<FeatureSnapshot, AdvisorError> {
    let minimum = params.min_bars();
    if bars.len() < minimum {
        return Err(AdvisorError::InsufficientData {
            ticker: ticker.to_string(),
            bars: bars.len(),
            minimum,
        });
    }

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let close = *closes.last().unwrap();
    let sma_short = sma_at_end(&closes, params.sma_short);
    let sma_long = sma_at_end(&closes, params.sma_long);

    let returns = daily_returns(&closes);
    let volatility = sample_stddev(&returns[returns.len() - params.volatility_window..]);

    FeatureSnapshot::new(close, sma_short, sma_long, volatility)
}
