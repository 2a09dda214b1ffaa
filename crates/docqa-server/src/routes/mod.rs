//! Route definitions for the REST API.

mod ask;
mod extract;
mod health;
mod prompt;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::state::AppState;

/// Largest accepted upload.
pub const MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

/// Create the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Document extraction
        .route(
            "/extract",
            post(extract::extract_document).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        // Question answering
        .route("/prompt", post(prompt::compose_prompt))
        .route("/ask", post(ask::ask_question))
        // Attach state
        .with_state(state)
}

pub use ask::*;
pub use extract::*;
pub use health::*;
pub use prompt::*;
