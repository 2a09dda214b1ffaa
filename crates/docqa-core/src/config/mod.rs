//! Configuration system for docqa.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use strum::{Display, EnumString};
use tracing::debug;

use crate::error::{DocQaError, DocQaResult};
use crate::prompt::{PromptStyle, DEFAULT_CONTEXT_LIMIT};
use crate::traits::LlmConfig;

/// Environment variable naming a config file.
pub const CONFIG_PATH_ENV: &str = "DOCQA_CONFIG";

/// Provider-agnostic credential variable, checked before the provider's own.
pub const API_KEY_ENV: &str = "API_KEY";

/// LLM provider type.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LlmProvider {
    #[default]
    Gemini,
    OpenAI,
}

impl LlmProvider {
    /// Model used when none is configured.
    pub fn default_model(&self) -> &'static str {
        match self {
            LlmProvider::Gemini => "gemini-1.5-flash-latest",
            LlmProvider::OpenAI => "gpt-4o-mini",
        }
    }

    /// Provider-specific credential variable.
    pub fn api_key_env(&self) -> &'static str {
        match self {
            LlmProvider::Gemini => "GEMINI_API_KEY",
            LlmProvider::OpenAI => "OPENAI_API_KEY",
        }
    }
}

/// Provider configuration with type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmProviderConfig {
    /// Provider type.
    #[serde(default)]
    pub provider: LlmProvider,
    /// Provider-specific configuration.
    #[serde(flatten)]
    pub config: LlmConfig,
}

impl Default for LlmProviderConfig {
    fn default() -> Self {
        let provider = LlmProvider::default();
        Self {
            provider,
            config: LlmConfig {
                model: provider.default_model().to_string(),
                ..Default::default()
            },
        }
    }
}

impl LlmProviderConfig {
    /// Configured model, or the provider default.
    pub fn model(&self) -> &str {
        if self.config.model.is_empty() {
            self.provider.default_model()
        } else {
            &self.config.model
        }
    }

    /// Resolve the API credential from config or the process environment.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.resolve_api_key_from(|key| std::env::var(key).ok())
    }

    /// Resolve the API credential using a custom lookup.
    pub fn resolve_api_key_from(&self, lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
        self.config
            .api_key
            .clone()
            .or_else(|| lookup(API_KEY_ENV))
            .or_else(|| lookup(self.provider.api_key_env()))
            .filter(|key| !key.trim().is_empty())
    }
}

/// Prompt composition configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    /// Maximum document characters per prompt.
    pub context_limit: usize,
    /// How prompts are encoded for the model.
    pub style: PromptStyle,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            context_limit: DEFAULT_CONTEXT_LIMIT,
            style: PromptStyle::default(),
        }
    }
}

/// Document extraction configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionSettings {
    /// Collapse whitespace runs after extraction.
    pub normalize_whitespace: bool,
    /// Drop invalid UTF-8 in text files instead of failing.
    pub lossy_utf8: bool,
    /// Include DOCX tables.
    pub include_tables: bool,
    /// Characters returned as a preview after upload.
    pub preview_chars: usize,
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            normalize_whitespace: false,
            lossy_utf8: false,
            include_tables: false,
            preview_chars: 2000,
        }
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// Main docqa configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DocQaConfig {
    /// LLM configuration.
    pub llm: LlmProviderConfig,
    /// Prompt configuration.
    pub prompt: PromptConfig,
    /// Extraction configuration.
    pub extraction: ExtractionSettings,
    /// Server configuration.
    pub server: ServerConfig,
}

impl DocQaConfig {
    /// Load configuration from a file (TOML, JSON, or YAML).
    pub fn from_file(path: impl AsRef<Path>) -> DocQaResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let ext = path.as_ref().extension().and_then(|e| e.to_str());

        match ext {
            Some("toml") => {
                toml::from_str(&content).map_err(|e| DocQaError::Configuration(e.to_string()))
            }
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| DocQaError::Configuration(e.to_string())),
            Some("yaml" | "yml") => serde_yaml::from_str(&content)
                .map_err(|e| DocQaError::Configuration(e.to_string())),
            _ => Err(DocQaError::Configuration(
                "Unsupported config file format. Use .toml, .json, or .yaml".to_string(),
            )),
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> DocQaResult<Self> {
        let mut config = Self::default();
        config.apply_env_from(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load the config file (if any) and then apply environment overrides.
    ///
    /// The file is `$DOCQA_CONFIG`, or `~/.docqa/config.toml` when it exists.
    pub fn load() -> DocQaResult<Self> {
        let path = std::env::var(CONFIG_PATH_ENV)
            .ok()
            .map(PathBuf::from)
            .or_else(|| Self::default_path().filter(|p| p.exists()));

        let mut config = match path {
            Some(path) => {
                debug!(path = %path.display(), "Loading configuration file");
                Self::from_file(path)?
            }
            None => Self::default(),
        };

        config.apply_env_from(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Default config file location.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".docqa").join("config.toml"))
    }

    /// Apply environment overrides using a custom lookup.
    pub fn apply_env_from(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> DocQaResult<()> {
        if let Some(provider) = lookup("DOCQA_PROVIDER") {
            let provider: LlmProvider = provider.parse().map_err(|_| {
                DocQaError::UnsupportedProvider {
                    provider: provider.clone(),
                }
            })?;
            // Switching provider drops a model that belonged to the old one.
            if self.llm.config.model == self.llm.provider.default_model() {
                self.llm.config.model = provider.default_model().to_string();
            }
            self.llm.provider = provider;
        }
        if let Some(model) = lookup("DOCQA_MODEL") {
            self.llm.config.model = model;
        }
        if let Some(api_key) = lookup(API_KEY_ENV) {
            self.llm.config.api_key = Some(api_key);
        }
        if let Some(base_url) = lookup("DOCQA_BASE_URL") {
            self.llm.config.base_url = Some(base_url);
        }
        if let Some(limit) = lookup("DOCQA_CONTEXT_LIMIT") {
            self.prompt.context_limit = parse_env("DOCQA_CONTEXT_LIMIT", &limit)?;
        }
        if let Some(flag) = lookup("DOCQA_NORMALIZE_WHITESPACE") {
            self.extraction.normalize_whitespace = parse_flag("DOCQA_NORMALIZE_WHITESPACE", &flag)?;
        }
        if let Some(flag) = lookup("DOCQA_LOSSY_UTF8") {
            self.extraction.lossy_utf8 = parse_flag("DOCQA_LOSSY_UTF8", &flag)?;
        }
        if let Some(host) = lookup("DOCQA_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("DOCQA_PORT") {
            self.server.port = parse_env("DOCQA_PORT", &port)?;
        }
        Ok(())
    }

    /// Check the configuration for values that can never work.
    pub fn validate(&self) -> DocQaResult<()> {
        if self.prompt.context_limit == 0 {
            return Err(DocQaError::configuration(
                "prompt.context_limit must be greater than zero",
            ));
        }
        if !(0.0..=2.0).contains(&self.llm.config.temperature) {
            return Err(DocQaError::configuration(format!(
                "llm.temperature must be between 0.0 and 2.0, got {}",
                self.llm.config.temperature
            )));
        }
        if let Some(ref base_url) = self.llm.config.base_url {
            url::Url::parse(base_url).map_err(|e| {
                DocQaError::configuration(format!("Invalid llm.base_url '{}': {}", base_url, e))
            })?;
        }
        Ok(())
    }

    /// Build configuration using builder pattern.
    pub fn builder() -> DocQaConfigBuilder {
        DocQaConfigBuilder::default()
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> DocQaResult<T>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| DocQaError::configuration(format!("Invalid {}='{}': {}", key, value, e)))
}

fn parse_flag(key: &str, value: &str) -> DocQaResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(DocQaError::configuration(format!(
            "Invalid {}='{}': expected true or false",
            key, value
        ))),
    }
}

/// Builder for DocQaConfig.
#[derive(Default)]
pub struct DocQaConfigBuilder {
    config: DocQaConfig,
}

impl DocQaConfigBuilder {
    /// Set LLM configuration.
    pub fn llm(mut self, config: LlmProviderConfig) -> Self {
        self.config.llm = config;
        self
    }

    /// Set the maximum document characters per prompt.
    pub fn context_limit(mut self, limit: usize) -> Self {
        self.config.prompt.context_limit = limit;
        self
    }

    /// Set the prompt encoding.
    pub fn prompt_style(mut self, style: PromptStyle) -> Self {
        self.config.prompt.style = style;
        self
    }

    /// Use the whitespace-normalizing extraction variant.
    pub fn normalize_whitespace(mut self, enabled: bool) -> Self {
        self.config.extraction.normalize_whitespace = enabled;
        self.config.extraction.lossy_utf8 = enabled;
        self
    }

    /// Set server configuration.
    pub fn server(mut self, config: ServerConfig) -> Self {
        self.config.server = config;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> DocQaConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = DocQaConfig::default();
        assert_eq!(config.llm.provider, LlmProvider::Gemini);
        assert_eq!(config.llm.model(), "gemini-1.5-flash-latest");
        assert_eq!(config.prompt.context_limit, 12_000);
        assert_eq!(config.prompt.style, PromptStyle::SingleText);
        assert!(!config.extraction.normalize_whitespace);
        assert_eq!(config.extraction.preview_chars, 2000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = DocQaConfig::default();
        config
            .apply_env_from(env(&[
                ("DOCQA_PROVIDER", "OpenAI"),
                ("DOCQA_CONTEXT_LIMIT", "3000"),
                ("DOCQA_NORMALIZE_WHITESPACE", "yes"),
                ("DOCQA_PORT", "9090"),
                ("API_KEY", "secret"),
            ]))
            .unwrap();

        assert_eq!(config.llm.provider, LlmProvider::OpenAI);
        assert_eq!(config.llm.model(), "gpt-4o-mini");
        assert_eq!(config.prompt.context_limit, 3000);
        assert!(config.extraction.normalize_whitespace);
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.llm.config.api_key.as_deref(), Some("secret"));
    }

    #[test]
    fn test_env_explicit_model_survives_provider_switch() {
        let mut config = DocQaConfig::default();
        config
            .apply_env_from(env(&[
                ("DOCQA_MODEL", "gpt-4.1"),
                ("DOCQA_PROVIDER", "openai"),
            ]))
            .unwrap();
        assert_eq!(config.llm.model(), "gpt-4.1");
    }

    #[test]
    fn test_env_rejects_bad_values() {
        let mut config = DocQaConfig::default();
        assert!(matches!(
            config.apply_env_from(env(&[("DOCQA_PROVIDER", "mistral")])),
            Err(DocQaError::UnsupportedProvider { .. })
        ));
        assert!(config
            .apply_env_from(env(&[("DOCQA_CONTEXT_LIMIT", "lots")]))
            .is_err());
        assert!(config
            .apply_env_from(env(&[("DOCQA_LOSSY_UTF8", "maybe")]))
            .is_err());
    }

    #[test]
    fn test_validate() {
        let config = DocQaConfig::builder().context_limit(0).build();
        assert!(config.validate().is_err());

        let mut config = DocQaConfig::default();
        config.llm.config.base_url = Some("not a url".to_string());
        assert!(config.validate().is_err());

        config.llm.config.base_url = Some("http://localhost:8081/v1beta".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_resolve_api_key_precedence() {
        let mut llm = LlmProviderConfig::default();
        assert_eq!(
            llm.resolve_api_key_from(env(&[("GEMINI_API_KEY", "provider")])),
            Some("provider".to_string())
        );
        assert_eq!(
            llm.resolve_api_key_from(env(&[("GEMINI_API_KEY", "provider"), ("API_KEY", "generic")])),
            Some("generic".to_string())
        );
        llm.config.api_key = Some("explicit".to_string());
        assert_eq!(
            llm.resolve_api_key_from(env(&[("API_KEY", "generic")])),
            Some("explicit".to_string())
        );
    }

    #[test]
    fn test_resolve_api_key_missing_or_blank() {
        let llm = LlmProviderConfig::default();
        assert_eq!(llm.resolve_api_key_from(env(&[])), None);
        assert_eq!(llm.resolve_api_key_from(env(&[("API_KEY", "  ")])), None);
    }

    #[test]
    fn test_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[llm]
provider = "openai"
model = "gpt-4o"
temperature = 0.0

[prompt]
context_limit = 6000
style = "system_and_user"

[extraction]
normalize_whitespace = true
"#
        )
        .unwrap();

        let config = DocQaConfig::from_file(file.path()).unwrap();
        assert_eq!(config.llm.provider, LlmProvider::OpenAI);
        assert_eq!(config.llm.model(), "gpt-4o");
        assert_eq!(config.prompt.context_limit, 6000);
        assert_eq!(config.prompt.style, PromptStyle::SystemAndUser);
        assert!(config.extraction.normalize_whitespace);
        assert_eq!(config.extraction.preview_chars, 2000);
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_from_yaml_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "prompt:\n  context_limit: 3000\n").unwrap();

        let config = DocQaConfig::from_file(file.path()).unwrap();
        assert_eq!(config.prompt.context_limit, 3000);
        assert_eq!(config.llm.provider, LlmProvider::Gemini);
    }

    #[test]
    fn test_from_file_unknown_extension() {
        let file = tempfile::Builder::new().suffix(".ini").tempfile().unwrap();
        assert!(matches!(
            DocQaConfig::from_file(file.path()),
            Err(DocQaError::Configuration(_))
        ));
    }
}
