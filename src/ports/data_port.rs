//! Historical price data port trait.

use crate::domain::error::AdvisorError;
use crate::domain::ohlcv::OhlcvBar;
use chrono::NaiveDate;

/// Supplies historical daily bars. Retrieval, caching and retries all live
/// behind this seam; the analysis core never fetches.
pub trait DataPort {
    /// Daily bars for `ticker` in `[start, end]`, oldest first. A `start`
    /// of `None` means the full available history up to `end`.
    fn fetch_daily(
        &self,
        ticker: &str,
        start: Option<NaiveDate>,
        end: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, AdvisorError>;

    fn list_tickers(&self) -> Result<Vec<String>, AdvisorError>;

    /// First date, last date and bar count, or `None` when the ticker is
    /// unknown.
    fn data_range(&self, ticker: &str)
        -> Result<Option<(NaiveDate, NaiveDate, usize)>, AdvisorError>;
}
