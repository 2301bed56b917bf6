#![allow(dead_code)]

use chrono::{Days, NaiveDate};
use stockadvisor::domain::error::AdvisorError;
pub use stockadvisor::domain::ohlcv::OhlcvBar;
use stockadvisor::ports::data_port::DataPort;
use std::collections::HashMap;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_bar(ticker: &str, day: NaiveDate, close: f64) -> OhlcvBar {
    OhlcvBar {
        ticker: ticker.to_string(),
        date: day,
        open: close,
        high: close * 1.01,
        low: close * 0.99,
        close,
        volume: 10_000,
    }
}

/// Bars with a constant daily return: zero return volatility, so a steadily
/// rising series classifies bullish/low-risk and a falling one
/// bearish/low-risk.
pub fn geometric_bars(
    ticker: &str,
    start: NaiveDate,
    count: usize,
    start_price: f64,
    daily_return: f64,
) -> Vec<OhlcvBar> {
    let mut price = start_price;
    (0..count)
        .map(|i| {
            let bar = make_bar(
                ticker,
                start.checked_add_days(Days::new(i as u64)).unwrap(),
                price,
            );
            price *= 1.0 + daily_return;
            bar
        })
        .collect()
}

/// Bars whose returns alternate between +amplitude and -amplitude: high
/// return volatility around a roughly flat price.
pub fn alternating_bars(
    ticker: &str,
    start: NaiveDate,
    count: usize,
    base_price: f64,
    amplitude: f64,
) -> Vec<OhlcvBar> {
    let mut price = base_price;
    (0..count)
        .map(|i| {
            let bar = make_bar(
                ticker,
                start.checked_add_days(Days::new(i as u64)).unwrap(),
                price,
            );
            let signed = if i % 2 == 0 { amplitude } else { -amplitude };
            price *= 1.0 + signed;
            bar
        })
        .collect()
}

/// Perfectly flat bars: neutral signal, zero volatility.
pub fn flat_bars(ticker: &str, start: NaiveDate, count: usize, price: f64) -> Vec<OhlcvBar> {
    geometric_bars(ticker, start, count, price, 0.0)
}

pub struct MockDataPort {
    pub data: HashMap<String, Vec<OhlcvBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, ticker: &str, bars: Vec<OhlcvBar>) -> Self {
        self.data.insert(ticker.to_string(), bars);
        self
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_daily(
        &self,
        ticker: &str,
        start: Option<NaiveDate>,
        end: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, AdvisorError> {
        if let Some(reason) = self.errors.get(ticker) {
            return Err(AdvisorError::Data {
                reason: reason.clone(),
            });
        }
        let bars = self
            .data
            .get(ticker)
            .ok_or_else(|| AdvisorError::NoData {
                ticker: ticker.to_string(),
            })?;
        Ok(bars
            .iter()
            .filter(|b| b.date <= end && start.is_none_or(|s| b.date >= s))
            .cloned()
            .collect())
    }

    fn list_tickers(&self) -> Result<Vec<String>, AdvisorError> {
        let mut tickers: Vec<String> = self.data.keys().cloned().collect();
        tickers.sort();
        Ok(tickers)
    }

    fn data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, AdvisorError> {
        Ok(self.data.get(ticker).and_then(|bars| {
            bars.first()
                .zip(bars.last())
                .map(|(first, last)| (first.date, last.date, bars.len()))
        }))
    }
}
