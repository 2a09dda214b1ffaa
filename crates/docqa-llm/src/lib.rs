//! docqa-llm - LLM provider implementations for docqa.
//!
//! # Supported Providers
//!
//! - **Gemini** - Google Gemini over the `generateContent` REST API
//! - **OpenAI** (feature: `openai`) - GPT-4o and compatible endpoints
//!
//! # Example
//!
//! ```ignore
//! use docqa_llm::LlmFactory;
//!
//! // Create a Gemini LLM from the loaded configuration
//! let llm = LlmFactory::from_config(&config.llm)?;
//!
//! // Or with a specific model
//! let llm = LlmFactory::gemini_with_model("gemini-1.5-pro")?;
//! ```

mod factory;
mod gemini;
mod openai;

pub use factory::LlmFactory;
pub use gemini::GeminiLlm;
pub use openai::OpenAIProvider;

// Re-export core types for convenience
pub use docqa_core::config::{LlmProvider, LlmProviderConfig};
pub use docqa_core::traits::{GenerationOptions, Llm, LlmConfig, LlmResponse};
