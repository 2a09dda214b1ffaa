//! docqa-core - Core library for docqa.
//!
//! This crate provides the error types, configuration, prompt composition
//! and the ask flow for answering questions strictly from a document.
//!
//! # Example
//!
//! ```ignore
//! use docqa_core::{DocQaConfig, DocumentQa};
//!
//! let config = DocQaConfig::load()?;
//! let qa = DocumentQa::from_config(llm, &config.prompt)?;
//!
//! let answer = qa.ask("The sky is blue.", "What color is the sky?").await?;
//! println!("{}", answer.text);
//! ```

pub mod config;
pub mod error;
pub mod prompt;
pub mod qa;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use config::{
    DocQaConfig, ExtractionSettings, LlmProvider, LlmProviderConfig, PromptConfig, ServerConfig,
};
pub use error::{DocQaError, DocQaResult, ErrorCode};
pub use prompt::{
    truncate_chars, Prompt, PromptComposer, PromptStyle, DEFAULT_CONTEXT_LIMIT, REFUSAL_MESSAGE,
};
pub use qa::{Answer, DocumentQa};
pub use traits::{GenerationOptions, Llm, LlmConfig, LlmResponse, TokenUsage};
pub use types::{Message, MessageRole, SessionState};
