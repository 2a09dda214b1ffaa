//! Question answering endpoint.

use axum::{extract::State, Json};
use serde::Serialize;

use docqa_core::traits::TokenUsage;

use super::prompt::QuestionRequest;
use crate::error::ApiResult;
use crate::state::AppState;

/// Response for an answered question.
#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub answer: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
}

/// Answer a question from the supplied document text.
/// POST /ask
pub async fn ask_question(
    State(state): State<AppState>,
    Json(request): Json<QuestionRequest>,
) -> ApiResult<Json<AskResponse>> {
    let answer = state
        .qa
        .ask(&request.document_text, &request.question)
        .await?;

    Ok(Json(AskResponse {
        answer: answer.text,
        model: answer.model,
        usage: answer.usage,
    }))
}
