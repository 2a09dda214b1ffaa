//! Error handling for the REST API server.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::fmt;

use docqa_core::error::DocQaError;
use docqa_extractors::ExtractError;

/// API error type.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: String,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    // Common error constructors
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.status, self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code,
                message: self.message,
                details: self.details,
            },
        };

        (self.status, Json(body)).into_response()
    }
}

// Convert from extraction errors
impl From<ExtractError> for ApiError {
    fn from(err: ExtractError) -> Self {
        let status = match err {
            ExtractError::UnsupportedFormat { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ExtractError::MissingCapability { .. } => StatusCode::NOT_IMPLEMENTED,
            ExtractError::DecodeFailure { .. } | ExtractError::ParseException { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
        };
        ApiError::new(status, err.code(), err.to_string())
    }
}

// Convert from docqa-core errors
impl From<DocQaError> for ApiError {
    fn from(err: DocQaError) -> Self {
        let suggestion = err.suggestion().map(str::to_string);
        let api_error = match err {
            DocQaError::EmptyQuestion => ApiError::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                "EMPTY_QUESTION",
                err.to_string(),
            ),
            DocQaError::NoDocument => {
                ApiError::new(StatusCode::BAD_REQUEST, "NO_DOCUMENT", err.to_string())
            }
            DocQaError::GenerationFailure { code, .. } => ApiError::new(
                StatusCode::BAD_GATEWAY,
                "GENERATION_FAILURE",
                err.to_string(),
            )
            .with_details(serde_json::json!({ "code": code.as_str() })),
            DocQaError::Configuration(_) | DocQaError::UnsupportedProvider { .. } => {
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "CONFIGURATION", err.to_string())
            }
            DocQaError::Io(_) | DocQaError::Serialization(_) | DocQaError::Internal(_) => {
                ApiError::internal(err.to_string())
            }
        };

        match (suggestion, api_error.details.is_some()) {
            (Some(suggestion), false) => {
                api_error.with_details(serde_json::json!({ "suggestion": suggestion }))
            }
            _ => api_error,
        }
    }
}

/// Result type alias for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;
