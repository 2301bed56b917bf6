//! Web server adapter.
//!
//! Axum JSON API exposing the analysis pipeline: a health probe and one
//! inference endpoint returning the serialized decision.

mod error;
mod handlers;

pub use error::ApiError;
pub use handlers::*;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::domain::engine::AdvisorPolicy;
use crate::domain::features::FeatureParams;
use crate::domain::period::Period;
use crate::ports::data_port::DataPort;
use crate::ports::run_log_port::RunLogPort;

pub struct AppState {
    pub data_port: Arc<dyn DataPort + Send + Sync>,
    pub policy: AdvisorPolicy,
    pub params: FeatureParams,
    pub default_period: Period,
    pub run_log: Option<Arc<dyn RunLogPort + Send + Sync>>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/analyze", post(handlers::analyze))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}
