//! HTTP error responses for the JSON API.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::domain::error::AdvisorError;

/// Error envelope: `{"detail": "..."}` with a status from the error class.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, detail)
    }
}

impl From<AdvisorError> for ApiError {
    fn from(err: AdvisorError) -> Self {
        let status = match &err {
            AdvisorError::ConfigParse { .. }
            | AdvisorError::ConfigMissing { .. }
            | AdvisorError::ConfigInvalid { .. }
            | AdvisorError::PeriodInvalid { .. } => StatusCode::BAD_REQUEST,
            AdvisorError::NoData { .. } | AdvisorError::InsufficientData { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AdvisorError::Data { .. }
            | AdvisorError::MalformedSnapshot { .. }
            | AdvisorError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}
