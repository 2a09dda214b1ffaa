//! Google Gemini LLM provider implementation.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use docqa_core::error::{DocQaError, DocQaResult, ErrorCode};
use docqa_core::traits::{GenerationOptions, Llm, LlmConfig, LlmResponse, TokenUsage};
use docqa_core::types::{split_system, Message, MessageRole};

const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-1.5-flash-latest";

/// Gemini LLM provider.
pub struct GeminiLlm {
    client: Client,
    config: LlmConfig,
    base_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    contents: Vec<GeminiContent>,
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
    top_p: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    usage_metadata: Option<GeminiUsage>,
    #[serde(default)]
    prompt_feedback: Option<GeminiPromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsage {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
    message: String,
}

/// Header value for the key, kept out of `Debug` output.
fn api_key_header(api_key: &str) -> DocQaResult<HeaderValue> {
    let mut value = HeaderValue::from_str(api_key)
        .map_err(|_| DocQaError::Configuration("Invalid API key format".to_string()))?;
    value.set_sensitive(true);
    Ok(value)
}

impl GeminiLlm {
    /// Create a new Gemini LLM provider.
    pub fn new(config: LlmConfig) -> DocQaResult<Self> {
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("GEMINI_API_KEY").ok())
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                DocQaError::Configuration("Gemini API key not found. Set API_KEY or GEMINI_API_KEY environment variable or provide api_key in config.".to_string())
            })?;

        let mut headers = HeaderMap::new();
        headers.insert("x-goog-api-key", api_key_header(&api_key)?);

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| {
                DocQaError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| GEMINI_API_URL.to_string());
        url::Url::parse(&base_url).map_err(|e| {
            DocQaError::Configuration(format!("Invalid Gemini base URL '{}': {}", base_url, e))
        })?;

        let mut config = config;
        if config.model.is_empty() {
            config.model = DEFAULT_MODEL.to_string();
        }

        Ok(Self {
            client,
            config,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url, self.config.model
        )
    }

    fn build_request(&self, messages: &[Message], options: GenerationOptions) -> GeminiRequest {
        let (system, conversation) = split_system(messages);

        let contents = conversation
            .into_iter()
            .map(|m| GeminiContent {
                role: Some(
                    match m.role {
                        MessageRole::Assistant => "model",
                        _ => "user",
                    }
                    .to_string(),
                ),
                parts: vec![GeminiPart {
                    text: Some(m.content.clone()),
                }],
            })
            .collect();

        GeminiRequest {
            system_instruction: system.map(|text| GeminiContent {
                role: None,
                parts: vec![GeminiPart { text: Some(text) }],
            }),
            contents,
            generation_config: GeminiGenerationConfig {
                temperature: options.temperature.unwrap_or(self.config.temperature),
                max_output_tokens: options.max_tokens.unwrap_or(self.config.max_tokens),
                top_p: options.top_p.unwrap_or(self.config.top_p),
            },
        }
    }
}

/// Turn a successful response body into an [`LlmResponse`].
fn parse_response(body: &str) -> DocQaResult<LlmResponse> {
    let response: GeminiResponse = serde_json::from_str(body).map_err(|e| {
        DocQaError::generation_with_code(
            format!("Failed to parse response: {}", e),
            ErrorCode::LlmInvalidResponse,
        )
    })?;

    if let Some(reason) = response
        .prompt_feedback
        .and_then(|feedback| feedback.block_reason)
    {
        return Err(DocQaError::generation(format!(
            "Prompt blocked by Gemini: {}",
            reason
        )));
    }

    let content = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| {
            c.parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<String>()
        })
        .filter(|text| !text.is_empty());

    let usage = response.usage_metadata.map(|u| TokenUsage {
        prompt_tokens: u.prompt_token_count,
        completion_tokens: u.candidates_token_count,
        total_tokens: u.total_token_count,
    });

    Ok(LlmResponse { content, usage })
}

/// Extract the error message from an unsuccessful response body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<GeminiError>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string())
}

#[async_trait]
impl Llm for GeminiLlm {
    async fn generate(
        &self,
        messages: &[Message],
        options: Option<GenerationOptions>,
    ) -> DocQaResult<LlmResponse> {
        let request = self.build_request(messages, options.unwrap_or_default());

        debug!(model = %self.config.model, contents = request.contents.len(), "Calling Gemini");

        let response = self
            .client
            .post(self.endpoint())
            .json(&request)
            .send()
            .await
            .map_err(|e| DocQaError::connection("Gemini API request failed", e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DocQaError::connection("Failed to read response body", e))?;

        if !status.is_success() {
            return Err(DocQaError::from_http_status(
                status.as_u16(),
                &error_message(&body),
            ));
        }

        parse_response(&body)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> GeminiLlm {
        GeminiLlm::new(LlmConfig {
            api_key: Some("test-key".to_string()),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_api_key_header_is_sensitive() {
        let value = api_key_header("test-key").unwrap();
        assert!(value.is_sensitive());
        assert_eq!(value.to_str().unwrap(), "test-key");
        assert_eq!(format!("{:?}", value), "Sensitive");

        assert!(matches!(
            api_key_header("bad\nkey"),
            Err(DocQaError::Configuration(_))
        ));
    }

    #[test]
    fn test_defaults() {
        let llm = provider();
        assert_eq!(llm.model_name(), "gemini-1.5-flash-latest");
        assert_eq!(
            llm.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash-latest:generateContent"
        );
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let result = GeminiLlm::new(LlmConfig {
            api_key: Some("test-key".to_string()),
            base_url: Some("::nope".to_string()),
            ..Default::default()
        });
        assert!(matches!(result, Err(DocQaError::Configuration(_))));
    }

    #[test]
    fn test_single_text_request() {
        let llm = provider();
        let request = llm.build_request(&[Message::user("prompt text")], Default::default());
        let json = serde_json::to_value(&request).unwrap();

        assert!(json.get("systemInstruction").is_none());
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "prompt text");
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 2000);
    }

    #[test]
    fn test_system_instruction_request() {
        let llm = provider();
        let messages = [Message::system("rules"), Message::user("doc and question")];
        let options = GenerationOptions {
            temperature: Some(0.0),
            ..Default::default()
        };
        let json = serde_json::to_value(llm.build_request(&messages, options)).unwrap();

        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "rules");
        assert_eq!(json["contents"].as_array().unwrap().len(), 1);
        assert_eq!(json["generationConfig"]["temperature"], 0.0);
    }

    #[test]
    fn test_parse_response_joins_parts() {
        let body = r#"{
            "candidates": [{"content": {"role": "model", "parts": [{"text": "The sky "}, {"text": "is blue."}]}}],
            "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 4, "totalTokenCount": 16}
        }"#;
        let response = parse_response(body).unwrap();
        assert_eq!(response.content.as_deref(), Some("The sky is blue."));
        assert_eq!(response.usage.unwrap().total_tokens, 16);
    }

    #[test]
    fn test_parse_response_without_candidates() {
        let response = parse_response(r#"{"candidates": []}"#).unwrap();
        assert!(response.content.is_none());
    }

    #[test]
    fn test_parse_response_blocked() {
        let body = r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#;
        let err = parse_response(body).unwrap_err();
        assert!(err.is_generation_failure());
        assert!(err.to_string().contains("SAFETY"));
    }

    #[test]
    fn test_parse_response_malformed() {
        let err = parse_response("not json").unwrap_err();
        assert_eq!(err.code(), ErrorCode::LlmInvalidResponse);
    }

    #[test]
    fn test_error_message() {
        let body = r#"{"error": {"code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT"}}"#;
        assert_eq!(error_message(body), "API key not valid.");
        assert_eq!(error_message("plain failure"), "plain failure");
    }
}
