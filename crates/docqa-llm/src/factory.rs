//! Factory for creating LLM providers.

use std::sync::Arc;

use tracing::info;

use docqa_core::config::{LlmProvider, LlmProviderConfig};
use docqa_core::error::{DocQaError, DocQaResult};
use docqa_core::traits::{Llm, LlmConfig};

use crate::gemini::GeminiLlm;
use crate::openai::OpenAIProvider;

/// Factory for creating LLM providers.
pub struct LlmFactory;

impl LlmFactory {
    /// Create an LLM provider from the given configuration.
    pub fn create(provider: LlmProvider, config: LlmConfig) -> DocQaResult<Arc<dyn Llm>> {
        let llm: Arc<dyn Llm> = match provider {
            LlmProvider::Gemini => Arc::new(GeminiLlm::new(config)?),
            LlmProvider::OpenAI => Arc::new(OpenAIProvider::new(config)?),
        };
        info!(provider = %provider, model = llm.model_name(), "LLM provider ready");
        Ok(llm)
    }

    /// Create a provider from the full provider config, resolving the key
    /// from `API_KEY` or the provider's own variable.
    pub fn from_config(config: &LlmProviderConfig) -> DocQaResult<Arc<dyn Llm>> {
        let api_key = config.resolve_api_key().ok_or_else(|| {
            DocQaError::Configuration(format!(
                "API key not found. Set API_KEY or {} in the environment.",
                config.provider.api_key_env()
            ))
        })?;

        let llm_config = LlmConfig {
            model: config.model().to_string(),
            api_key: Some(api_key),
            ..config.config.clone()
        };
        Self::create(config.provider, llm_config)
    }

    /// Create a Gemini LLM provider with default configuration.
    pub fn gemini() -> DocQaResult<Arc<dyn Llm>> {
        Self::create(LlmProvider::Gemini, LlmConfig::default())
    }

    /// Create a Gemini LLM provider with a specific model.
    pub fn gemini_with_model(model: impl Into<String>) -> DocQaResult<Arc<dyn Llm>> {
        let config = LlmConfig {
            model: model.into(),
            ..Default::default()
        };
        Self::create(LlmProvider::Gemini, config)
    }

    /// Create an OpenAI LLM provider with a specific model.
    pub fn openai_with_model(model: impl Into<String>) -> DocQaResult<Arc<dyn Llm>> {
        let config = LlmConfig {
            model: model.into(),
            ..Default::default()
        };
        Self::create(LlmProvider::OpenAI, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_uses_provider_default_model() {
        let mut config = LlmProviderConfig::default();
        config.config.api_key = Some("key".to_string());
        let llm = LlmFactory::from_config(&config).unwrap();
        assert_eq!(llm.model_name(), "gemini-1.5-flash-latest");

        config.provider = LlmProvider::OpenAI;
        config.config.model = String::new();
        let llm = LlmFactory::from_config(&config).unwrap();
        assert_eq!(llm.model_name(), "gpt-4o-mini");
    }

    #[test]
    fn test_create_with_explicit_key() {
        let config = LlmConfig {
            model: "gemini-1.5-pro".to_string(),
            api_key: Some("key".to_string()),
            ..Default::default()
        };
        let llm = LlmFactory::create(LlmProvider::Gemini, config).unwrap();
        assert_eq!(llm.model_name(), "gemini-1.5-pro");
    }
}
