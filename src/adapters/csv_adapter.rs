//! CSV file data adapter.
//!
//! One `<TICKER>.csv` per instrument under a base directory, with a
//! `Date,Open,High,Low,Close,Volume` header. Rows with empty cells are
//! skipped (upstream exports leave gaps for missing values); unparseable
//! cells are errors.

use crate::domain::error::AdvisorError;
use crate::domain::ohlcv::OhlcvBar;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

const REQUIRED_COLUMNS: [&str; 6] = ["Date", "Open", "High", "Low", "Close", "Volume"];

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, ticker: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", ticker.to_uppercase()))
    }

    fn read_bars(&self, ticker: &str) -> Result<Vec<OhlcvBar>, AdvisorError> {
        let path = self.csv_path(ticker);
        let content = fs::read_to_string(&path).map_err(|e| AdvisorError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());

        let headers = rdr
            .headers()
            .map_err(|e| AdvisorError::Data {
                reason: format!("CSV header error in {}: {}", path.display(), e),
            })?
            .clone();

        let mut columns = [0usize; 6];
        for (slot, name) in columns.iter_mut().zip(REQUIRED_COLUMNS) {
            *slot = headers
                .iter()
                .position(|h| h.eq_ignore_ascii_case(name))
                .ok_or_else(|| AdvisorError::Data {
                    reason: format!("missing required column {name} in {}", path.display()),
                })?;
        }
        let [date_col, open_col, high_col, low_col, close_col, volume_col] = columns;

        let mut bars = Vec::new();
        for (line, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| AdvisorError::Data {
                reason: format!("CSV parse error in {}: {}", path.display(), e),
            })?;

            let cells: Vec<&str> = columns
                .iter()
                .map(|&i| record.get(i).unwrap_or("").trim())
                .collect();
            if cells.iter().any(|c| c.is_empty()) {
                tracing::warn!(
                    ticker,
                    row = line + 2,
                    "skipping row with missing values"
                );
                continue;
            }

            let date = NaiveDate::parse_from_str(record.get(date_col).unwrap().trim(), "%Y-%m-%d")
                .map_err(|e| AdvisorError::Data {
                    reason: format!("invalid date in {}: {}", path.display(), e),
                })?;

            let parse_price = |col: usize, name: &str| -> Result<f64, AdvisorError> {
                record
                    .get(col)
                    .unwrap()
                    .trim()
                    .parse()
                    .map_err(|e| AdvisorError::Data {
                        reason: format!("invalid {name} value in {}: {}", path.display(), e),
                    })
            };

            let open = parse_price(open_col, "open")?;
            let high = parse_price(high_col, "high")?;
            let low = parse_price(low_col, "low")?;
            let close = parse_price(close_col, "close")?;
            let volume: i64 = record
                .get(volume_col)
                .unwrap()
                .trim()
                .parse()
                .map_err(|e| AdvisorError::Data {
                    reason: format!("invalid volume value in {}: {}", path.display(), e),
                })?;

            bars.push(OhlcvBar {
                ticker: ticker.to_uppercase(),
                date,
                open,
                high,
                low,
                close,
                volume,
            });
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }
}

impl DataPort for CsvAdapter {
    fn fetch_daily(
        &self,
        ticker: &str,
        start: Option<NaiveDate>,
        end: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, AdvisorError> {
        let mut bars = self.read_bars(ticker)?;
        bars.retain(|b| b.date <= end && start.is_none_or(|s| b.date >= s));
        tracing::debug!(ticker, bars = bars.len(), "fetched daily bars");
        Ok(bars)
    }

    fn list_tickers(&self) -> Result<Vec<String>, AdvisorError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| AdvisorError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut tickers = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| AdvisorError::Data {
                reason: format!("directory entry error: {}", e),
            })?;
            let name = entry.file_name();
            let name_str = name.to_string_lossy();
            if let Some(stem) = name_str.strip_suffix(".csv") {
                tickers.push(stem.to_uppercase());
            }
        }

        tickers.sort();
        Ok(tickers)
    }

    fn data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, AdvisorError> {
        if !self.csv_path(ticker).exists() {
            return Ok(None);
        }
        let bars = self.read_bars(ticker)?;
        Ok(bars
            .first()
            .zip(bars.last())
            .map(|(first, last)| (first.date, last.date, bars.len())))
    }
}
