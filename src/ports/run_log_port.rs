//! Run log port trait: optional per-invocation observability.

use crate::domain::decision::Decision;
use crate::domain::error::AdvisorError;
use crate::domain::snapshot::FeatureSnapshot;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One recorded analysis invocation. The decision embeds both intermediate
/// results, so the record is self-contained.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisRecord {
    pub timestamp: DateTime<Utc>,
    pub ticker: String,
    pub period: String,
    pub snapshot: FeatureSnapshot,
    pub decision: Decision,
}

/// Sink for analysis records. Purely additive instrumentation; recording
/// never influences the decision itself.
pub trait RunLogPort {
    fn record(&self, record: &AnalysisRecord) -> Result<(), AdvisorError>;
}
