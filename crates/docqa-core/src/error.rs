//! Error types for docqa operations.
//!
//! Errors carry a structured code so callers (the HTTP layer in particular)
//! can branch on the kind of failure rather than on message text.

use thiserror::Error;

/// Result type alias for docqa operations.
pub type DocQaResult<T> = Result<T, DocQaError>;

/// Main error type for composition and generation.
#[derive(Error, Debug)]
pub enum DocQaError {
    /// The question was empty or whitespace-only.
    #[error("Please enter a question.")]
    EmptyQuestion,

    /// No document text is loaded.
    #[error("No document loaded. Upload a document to continue.")]
    NoDocument,

    /// The generation collaborator failed.
    #[error("Generation failed: {message}")]
    GenerationFailure {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Provider not supported.
    #[error("Provider not supported: {provider}")]
    UnsupportedProvider { provider: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error codes for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Validation (VAL_xxx)
    ValEmptyQuestion,
    ValNoDocument,

    // Authentication (AUTH_xxx)
    AuthInvalidKey,
    AuthMissingCredentials,

    // Rate Limit (RATE_xxx)
    RateLimitExceeded,

    // LLM (LLM_xxx)
    LlmConnectionFailed,
    LlmGenerationFailed,
    LlmInvalidResponse,
    LlmEmptyResponse,

    // Configuration (CFG_xxx)
    CfgInvalid,

    // Internal
    Internal,
}

impl ErrorCode {
    /// Get the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValEmptyQuestion => "VAL_001",
            ErrorCode::ValNoDocument => "VAL_002",
            ErrorCode::AuthInvalidKey => "AUTH_001",
            ErrorCode::AuthMissingCredentials => "AUTH_002",
            ErrorCode::RateLimitExceeded => "RATE_001",
            ErrorCode::LlmConnectionFailed => "LLM_001",
            ErrorCode::LlmGenerationFailed => "LLM_002",
            ErrorCode::LlmInvalidResponse => "LLM_003",
            ErrorCode::LlmEmptyResponse => "LLM_004",
            ErrorCode::CfgInvalid => "CFG_001",
            ErrorCode::Internal => "INT_001",
        }
    }
}

impl DocQaError {
    /// Create a generation failure.
    pub fn generation(message: impl Into<String>) -> Self {
        Self::GenerationFailure {
            message: message.into(),
            code: ErrorCode::LlmGenerationFailed,
            source: None,
        }
    }

    /// Create a generation failure with a specific code.
    pub fn generation_with_code(message: impl Into<String>, code: ErrorCode) -> Self {
        Self::GenerationFailure {
            message: message.into(),
            code,
            source: None,
        }
    }

    /// Create a transport-level generation failure, keeping the cause.
    pub fn connection(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::GenerationFailure {
            message: format!("{}: {}", message.into(), source),
            code: ErrorCode::LlmConnectionFailed,
            source: Some(Box::new(source)),
        }
    }

    /// The model answered with no text.
    pub fn empty_response() -> Self {
        Self::generation_with_code("The model returned an empty response", ErrorCode::LlmEmptyResponse)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Map an unsuccessful provider HTTP status into a generation failure.
    pub fn from_http_status(status: u16, body: &str) -> Self {
        let code = match status {
            401 | 403 => ErrorCode::AuthInvalidKey,
            429 => ErrorCode::RateLimitExceeded,
            400..=499 => ErrorCode::LlmInvalidResponse,
            _ => ErrorCode::LlmGenerationFailed,
        };
        Self::generation_with_code(format!("HTTP {}: {}", status, body), code)
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::EmptyQuestion => ErrorCode::ValEmptyQuestion,
            Self::NoDocument => ErrorCode::ValNoDocument,
            Self::GenerationFailure { code, .. } => *code,
            Self::Configuration(_) | Self::UnsupportedProvider { .. } => ErrorCode::CfgInvalid,
            _ => ErrorCode::Internal,
        }
    }

    /// Whether the external generation call is what failed.
    pub fn is_generation_failure(&self) -> bool {
        matches!(self, Self::GenerationFailure { .. })
    }

    /// Get a user-friendly suggestion for resolving this error.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::EmptyQuestion => Some("Type a question about the uploaded document"),
            Self::NoDocument => Some("Upload a .txt, .md, .pdf or .docx file first"),
            Self::GenerationFailure { code, .. } => match code {
                ErrorCode::AuthInvalidKey => Some("Please check your API key"),
                ErrorCode::RateLimitExceeded => Some("Please wait before asking again"),
                _ => Some("Please check your LLM provider configuration"),
            },
            Self::Configuration(_) => Some("Please check your configuration file and environment"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_question_error() {
        let err = DocQaError::EmptyQuestion;
        assert_eq!(err.code(), ErrorCode::ValEmptyQuestion);
        assert_eq!(err.to_string(), "Please enter a question.");
        assert!(err.suggestion().is_some());
    }

    #[test]
    fn test_generation_error() {
        let err = DocQaError::generation("upstream closed connection");
        assert_eq!(err.code(), ErrorCode::LlmGenerationFailed);
        assert!(err.is_generation_failure());
        assert!(err.to_string().contains("upstream closed connection"));
    }

    #[test]
    fn test_from_http_status() {
        assert_eq!(
            DocQaError::from_http_status(401, "bad key").code(),
            ErrorCode::AuthInvalidKey
        );
        assert_eq!(
            DocQaError::from_http_status(429, "slow down").code(),
            ErrorCode::RateLimitExceeded
        );
        assert_eq!(
            DocQaError::from_http_status(404, "no model").code(),
            ErrorCode::LlmInvalidResponse
        );
        assert_eq!(
            DocQaError::from_http_status(503, "down").code(),
            ErrorCode::LlmGenerationFailed
        );
    }

    #[test]
    fn test_error_code_as_str() {
        assert_eq!(ErrorCode::ValEmptyQuestion.as_str(), "VAL_001");
        assert_eq!(ErrorCode::LlmEmptyResponse.as_str(), "LLM_004");
    }
}
