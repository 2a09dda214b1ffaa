//! Prompt preview endpoint.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use docqa_core::types::Message;

use crate::error::ApiResult;
use crate::state::AppState;

/// Request body shared by `/prompt` and `/ask`.
#[derive(Debug, Deserialize)]
pub struct QuestionRequest {
    /// Text of the currently loaded document, held by the client.
    #[serde(default)]
    pub document_text: String,
    /// The question to answer.
    #[serde(default)]
    pub question: String,
}

/// Response for a composed prompt.
#[derive(Debug, Serialize)]
pub struct PromptResponse {
    /// Single-string encoding.
    pub prompt: String,
    /// Encoding actually sent to the model.
    pub messages: Vec<Message>,
}

/// Compose the prompt without calling the model.
/// POST /prompt
pub async fn compose_prompt(
    State(state): State<AppState>,
    Json(request): Json<QuestionRequest>,
) -> ApiResult<Json<PromptResponse>> {
    let prompt = state.qa.prepare(&request.document_text, &request.question)?;

    Ok(Json(PromptResponse {
        prompt: prompt.to_text(),
        messages: prompt.messages_for(state.qa.style()),
    }))
}
