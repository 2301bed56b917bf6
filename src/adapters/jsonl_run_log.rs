//! JSONL run log adapter.
//!
//! Appends one JSON object per analysis invocation to a log file. The log
//! is an audit trail for recommendations; it is never read back by the
//! advisor itself.

use crate::domain::error::AdvisorError;
use crate::ports::run_log_port::{AnalysisRecord, RunLogPort};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

pub struct JsonlRunLog {
    path: PathBuf,
}

impl JsonlRunLog {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl RunLogPort for JsonlRunLog {
    fn record(&self, record: &AnalysisRecord) -> Result<(), AdvisorError> {
        let line = serde_json::to_string(record).map_err(|e| AdvisorError::Data {
            reason: format!("failed to serialize analysis record: {}", e),
        })?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", line)?;

        tracing::debug!(
            ticker = %record.ticker,
            path = %self.path.display(),
            "recorded analysis run"
        );
        Ok(())
    }
}
