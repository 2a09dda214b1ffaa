//! Health check endpoint.

use axum::{extract::State, Json};
use serde::Serialize;

use docqa_extractors::Capabilities;

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub model: String,
    pub capabilities: Capabilities,
    pub supported_extensions: Vec<&'static str>,
    pub context_limit: usize,
}

/// Health check endpoint.
/// GET /health
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model: state.qa.model_name().to_string(),
        capabilities: state.extractor.capabilities(),
        supported_extensions: state.extractor.supported_extensions(),
        context_limit: state.qa.composer().context_limit(),
    }))
}
