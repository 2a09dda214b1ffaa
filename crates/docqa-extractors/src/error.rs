//! Extraction error types.

use std::any::Any;

use thiserror::Error;

use crate::types::DocumentFormat;

/// Errors that can occur while turning an uploaded file into text.
///
/// Every variant is something the caller is expected to branch on, so an
/// empty document is never one of them.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The file extension is not one of `.txt`, `.md`, `.pdf`, `.docx`.
    #[error("Unsupported file type: {extension}")]
    UnsupportedFormat { extension: String },

    /// The parser for this format was not compiled in.
    #[error("{library} not installed, cannot read {format} files")]
    MissingCapability {
        format: DocumentFormat,
        library: &'static str,
    },

    /// The bytes are not valid UTF-8 and the strict policy is in effect.
    #[error("Could not decode {format} file as UTF-8: {source}")]
    DecodeFailure {
        format: DocumentFormat,
        #[source]
        source: std::str::Utf8Error,
    },

    /// The underlying parser failed or panicked.
    #[error("Error reading file: {message}")]
    ParseException {
        format: DocumentFormat,
        message: String,
    },
}

impl ExtractError {
    /// Create an unsupported-format error for the given extension.
    pub fn unsupported(extension: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            extension: extension.into(),
        }
    }

    /// Create a missing-capability error for a format.
    pub fn missing(format: DocumentFormat) -> Self {
        Self::MissingCapability {
            format,
            library: format.library().unwrap_or("parser"),
        }
    }

    /// Create a parse error carrying the parser's message.
    pub fn parse(format: DocumentFormat, message: impl Into<String>) -> Self {
        Self::ParseException {
            format,
            message: message.into(),
        }
    }

    /// Convert a failed blocking task into a parse error.
    ///
    /// A panicking parser surfaces here, so its payload becomes the message.
    pub fn from_join(format: DocumentFormat, err: tokio::task::JoinError) -> Self {
        if err.is_panic() {
            let message = panic_message(err.into_panic());
            Self::parse(format, format!("parser panicked: {}", message))
        } else {
            Self::parse(format, err.to_string())
        }
    }

    /// Re-tag a format-carrying error with the format actually requested.
    ///
    /// Extractors shared between formats (`.txt` and `.md`) report their
    /// primary format; the dispatcher knows the real one.
    pub fn for_format(self, format: DocumentFormat) -> Self {
        match self {
            Self::DecodeFailure { source, .. } => Self::DecodeFailure { format, source },
            Self::ParseException { message, .. } => Self::ParseException { format, message },
            other => other,
        }
    }

    /// Stable code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            Self::MissingCapability { .. } => "MISSING_CAPABILITY",
            Self::DecodeFailure { .. } => "DECODE_FAILURE",
            Self::ParseException { .. } => "PARSE_EXCEPTION",
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Result type for extraction operations.
pub type ExtractResult<T> = Result<T, ExtractError>;
