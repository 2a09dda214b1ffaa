//! The ask flow: compose a prompt, call the model once, return the answer.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::PromptConfig;
use crate::error::{DocQaError, DocQaResult};
use crate::prompt::{Prompt, PromptComposer, PromptStyle};
use crate::traits::{GenerationOptions, Llm, TokenUsage};
use crate::types::SessionState;

/// An answer produced by the generation collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    /// Answer text as returned by the model.
    pub text: String,
    /// Model that produced it.
    pub model: String,
    /// Token usage, when the provider reports it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
}

/// Document question answering over a single LLM.
///
/// Stateless: every call takes the document text explicitly.
#[derive(Clone)]
pub struct DocumentQa {
    llm: Arc<dyn Llm>,
    composer: PromptComposer,
    style: PromptStyle,
    options: Option<GenerationOptions>,
}

impl DocumentQa {
    /// Create with the default composer and single-text prompts.
    pub fn new(llm: Arc<dyn Llm>) -> Self {
        Self {
            llm,
            composer: PromptComposer::default(),
            style: PromptStyle::default(),
            options: None,
        }
    }

    /// Create from prompt configuration.
    pub fn from_config(llm: Arc<dyn Llm>, config: &PromptConfig) -> DocQaResult<Self> {
        Ok(Self::new(llm)
            .with_composer(PromptComposer::new(config.context_limit)?)
            .with_style(config.style))
    }

    /// Use a specific composer.
    pub fn with_composer(mut self, composer: PromptComposer) -> Self {
        self.composer = composer;
        self
    }

    /// Use a specific prompt encoding.
    pub fn with_style(mut self, style: PromptStyle) -> Self {
        self.style = style;
        self
    }

    /// Pass generation overrides on every call.
    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// The composer in use.
    pub fn composer(&self) -> &PromptComposer {
        &self.composer
    }

    /// Prompt encoding in use.
    pub fn style(&self) -> PromptStyle {
        self.style
    }

    /// Model answering the questions.
    pub fn model_name(&self) -> &str {
        self.llm.model_name()
    }

    /// Validate inputs and compose the prompt without calling the model.
    pub fn prepare(&self, document_text: &str, question: &str) -> DocQaResult<Prompt> {
        if document_text.trim().is_empty() {
            return Err(DocQaError::NoDocument);
        }
        self.composer.compose(document_text, question)
    }

    /// Answer a question from the document text.
    ///
    /// Input errors short-circuit before the model is called. The model is
    /// called exactly once.
    pub async fn ask(&self, document_text: &str, question: &str) -> DocQaResult<Answer> {
        let prompt = self.prepare(document_text, question)?;
        let messages = prompt.messages_for(self.style);

        debug!(
            model = self.llm.model_name(),
            style = ?self.style,
            document_chars = prompt.document_chars(),
            "Sending prompt to model"
        );

        let response = self
            .llm
            .generate(&messages, self.options.clone())
            .await
            .map_err(|e| {
                warn!(model = self.llm.model_name(), error = %e, "Generation failed");
                match e {
                    DocQaError::GenerationFailure { .. } => e,
                    other => DocQaError::generation(other.to_string()),
                }
            })?;

        let text = match response.content {
            Some(text) if !text.trim().is_empty() => text,
            _ => return Err(DocQaError::empty_response()),
        };

        info!(
            model = self.llm.model_name(),
            answer_chars = text.chars().count(),
            "Answer generated"
        );

        Ok(Answer {
            text,
            model: self.llm.model_name().to_string(),
            usage: response.usage,
        })
    }

    /// Answer against a caller-owned session and return the updated session.
    ///
    /// On error the caller keeps its previous session unchanged.
    pub async fn ask_session(
        &self,
        session: &SessionState,
        question: &str,
    ) -> DocQaResult<SessionState> {
        let answer = self.ask(&session.document_text, question).await?;
        Ok(session.clone().with_answer(answer.text))
    }
}

impl std::fmt::Debug for DocumentQa {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentQa")
            .field("model", &self.llm.model_name())
            .field("composer", &self.composer)
            .field("style", &self.style)
            .finish()
    }
}
