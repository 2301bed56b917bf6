//! Analysis engine: one snapshot in, one decision out.

use crate::domain::decision::{self, Decision, DecisionPolicy};
use crate::domain::error::AdvisorError;
use crate::domain::features::{self, FeatureParams};
use crate::domain::period::Period;
use crate::domain::risk::{self, RiskPolicy, RiskResult};
use crate::domain::series;
use crate::domain::signal::{self, SignalPolicy, SignalResult};
use crate::domain::snapshot::FeatureSnapshot;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;

/// All tunable constants in one place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdvisorPolicy {
    pub signal: SignalPolicy,
    pub risk: RiskPolicy,
    pub decision: DecisionPolicy,
}

/// Everything one evaluation produced, intermediate results included.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub snapshot: FeatureSnapshot,
    pub technical: SignalResult,
    pub risk: RiskResult,
    pub decision: Decision,
}

/// Run both classifiers (independent, order-insensitive) and aggregate.
/// Stateless and synchronous; safe to call concurrently for different
/// requests.
pub fn analyze(snapshot: FeatureSnapshot, policy: &AdvisorPolicy) -> Analysis {
    let technical = signal::classify(&snapshot, &policy.signal);
    let risk = risk::classify(&snapshot, &policy.risk);
    let decision = decision::aggregate(&technical, &risk, &policy.decision);

    Analysis {
        snapshot,
        technical,
        risk,
        decision,
    }
}

/// Full request-scoped pipeline: fetch, validate, derive features, analyze.
pub fn run_analysis(
    data_port: &dyn DataPort,
    ticker: &str,
    period: Period,
    end_date: NaiveDate,
    params: &FeatureParams,
    policy: &AdvisorPolicy,
) -> Result<Analysis, AdvisorError> {
    let start_date = period.start_date(end_date);
    let bars = data_port.fetch_daily(ticker, start_date, end_date)?;
    let bars = series::validate_series(ticker, bars, params.min_bars())?;
    let snapshot = features::latest_snapshot(ticker, &bars, params)?;
    Ok(analyze(snapshot, policy))
}
