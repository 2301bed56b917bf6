//! HTTP request handlers for the JSON API.

use axum::{extract::State, response::IntoResponse, Json};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::domain::decision::Decision;
use crate::domain::engine::run_analysis;
use crate::domain::period::Period;
use crate::ports::run_log_port::{AnalysisRecord, RunLogPort};

use super::{ApiError, AppState};

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub ticker: String,
    #[serde(default)]
    pub period: Option<String>,
}

pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

pub async fn analyze(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<Decision>, ApiError> {
    let ticker = request.ticker.trim().to_uppercase();
    if ticker.is_empty() {
        return Err(ApiError::bad_request("ticker must not be empty"));
    }

    let period = match request.period.as_deref() {
        Some(raw) => raw.parse::<Period>()?,
        None => state.default_period,
    };

    let end_date = Utc::now().date_naive();
    let analysis = run_analysis(
        &*state.data_port,
        &ticker,
        period,
        end_date,
        &state.params,
        &state.policy,
    )?;

    tracing::info!(
        %ticker,
        %period,
        action = %analysis.decision.action,
        confidence = analysis.decision.confidence,
        "analysis complete"
    );

    if let Some(run_log) = &state.run_log {
        run_log.record(&AnalysisRecord {
            timestamp: Utc::now(),
            ticker: ticker.clone(),
            period: period.to_string(),
            snapshot: analysis.snapshot,
            decision: analysis.decision.clone(),
        })?;
    }

    Ok(Json(analysis.decision))
}
