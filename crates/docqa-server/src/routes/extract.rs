//! Document upload endpoint.

use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;
use tracing::{debug, info};

use docqa_extractors::{DocumentFormat, UploadedDocument};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Multipart field carrying the uploaded file.
const FILE_FIELD: &str = "file";

/// Response for an extracted document.
#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub name: String,
    pub format: DocumentFormat,
    pub text: String,
    pub preview: String,
    pub characters: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_count: Option<usize>,
    /// False when the extracted text is blank.
    pub loaded: bool,
}

/// Extract text from an uploaded document.
/// POST /extract
pub async fn extract_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<ExtractResponse>> {
    let document = read_upload(&mut multipart).await?;

    debug!(
        name = %document.name(),
        bytes = document.len(),
        "Processing file upload"
    );

    let extracted = state.extractor.extract(&document).await?;

    let response = ExtractResponse {
        name: document.name().to_string(),
        format: extracted.format,
        preview: extracted.preview(state.preview_chars).to_string(),
        characters: extracted.char_count(),
        page_count: extracted.page_count,
        loaded: !extracted.is_blank(),
        text: extracted.into_text(),
    };

    info!(
        name = %response.name,
        format = %response.format,
        characters = response.characters,
        loaded = response.loaded,
        "Document extracted"
    );

    Ok(Json(response))
}

async fn read_upload(multipart: &mut Multipart) -> ApiResult<UploadedDocument> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Failed to read multipart: {}", e)))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let name = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("Failed to read file: {}", e)))?;

        return Ok(UploadedDocument::new(name, bytes.to_vec()));
    }

    Err(ApiError::bad_request(format!(
        "No file uploaded. Send it in the '{}' multipart field.",
        FILE_FIELD
    )))
}
