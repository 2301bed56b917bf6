//! Lookback period parsing.
//!
//! Accepts the compact strings the analysis request carries: a count
//! followed by `d`, `mo` or `y` (for example `5d`, `6mo`, `1y`), or `max`
//! for the full available history. Months and years use calendar
//! arithmetic, clamping to the last day of the target month when needed.

use crate::domain::error::AdvisorError;
use chrono::{Days, Months, NaiveDate};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Days(u32),
    Months(u32),
    Years(u32),
    Max,
}

impl Period {
    /// Start date of the lookback window ending at `end`; `None` means
    /// unbounded (`max`).
    pub fn start_date(&self, end: NaiveDate) -> Option<NaiveDate> {
        match *self {
            Period::Days(n) => end.checked_sub_days(Days::new(n as u64)),
            Period::Months(n) => end.checked_sub_months(Months::new(n)),
            Period::Years(n) => end.checked_sub_months(Months::new(n * 12)),
            Period::Max => None,
        }
    }
}

impl FromStr for Period {
    type Err = AdvisorError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let normalized = input.trim().to_lowercase();
        if normalized == "max" {
            return Ok(Period::Max);
        }

        let digits_end = normalized
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(normalized.len());
        let (count_str, unit) = normalized.split_at(digits_end);

        let count: u32 = count_str.parse().map_err(|_| AdvisorError::PeriodInvalid {
            input: input.to_string(),
            reason: "expected a positive count before the unit".to_string(),
        })?;
        if count == 0 {
            return Err(AdvisorError::PeriodInvalid {
                input: input.to_string(),
                reason: "count must be positive".to_string(),
            });
        }

        match unit {
            "d" => Ok(Period::Days(count)),
            "mo" => Ok(Period::Months(count)),
            "y" => Ok(Period::Years(count)),
            _ => Err(AdvisorError::PeriodInvalid {
                input: input.to_string(),
                reason: "unknown unit (expected d, mo, y or max)".to_string(),
            }),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Period::Days(n) => write!(f, "{n}d"),
            Period::Months(n) => write!(f, "{n}mo"),
            Period::Years(n) => write!(f, "{n}y"),
            Period::Max => write!(f, "max"),
        }
    }
}
