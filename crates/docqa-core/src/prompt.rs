//! Prompt composition for document-grounded answering.
//!
//! A prompt is the role statement, the refusal instruction, a prefix of the
//! document text and the question, always in that order. The document slice
//! is a raw character-count cut, so it may end mid-word.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{DocQaError, DocQaResult};
use crate::types::Message;

/// Exact reply the model must give when the document lacks the answer.
pub const REFUSAL_MESSAGE: &str = "I cannot find the answer in the provided document.";

/// Default maximum number of document characters placed in a prompt.
pub const DEFAULT_CONTEXT_LIMIT: usize = 12_000;

const ROLE_STATEMENT: &str = "You are a strict document-grounded question answering system.";

const GROUNDING_INSTRUCTION: &str = "Answer ONLY using the document below.";

/// How a [`Prompt`] is encoded for the generation collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptStyle {
    /// One user message holding the whole template.
    #[default]
    SingleText,
    /// A system instruction plus a user message with document and question.
    SystemAndUser,
}

/// A composed prompt.
///
/// Both encodings carry the same content: `system` always precedes
/// `document`, which precedes `question`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    /// Role statement and refusal instruction.
    pub system: String,
    /// Document text after truncation.
    pub document: String,
    /// The question as submitted.
    pub question: String,
}

impl Prompt {
    /// Document and question block, without the instruction.
    pub fn user_content(&self) -> String {
        format!("DOCUMENT:\n{}\n\nQUESTION:\n{}", self.document, self.question)
    }

    /// Single-string encoding.
    pub fn to_text(&self) -> String {
        format!("{}\n\n{}\n", self.system, self.user_content())
    }

    /// System-instruction plus user-content encoding.
    pub fn to_messages(&self) -> Vec<Message> {
        vec![
            Message::system(self.system.clone()),
            Message::user(self.user_content()),
        ]
    }

    /// Encode in the given style.
    pub fn messages_for(&self, style: PromptStyle) -> Vec<Message> {
        match style {
            PromptStyle::SingleText => vec![Message::user(self.to_text())],
            PromptStyle::SystemAndUser => self.to_messages(),
        }
    }

    /// Number of document characters included.
    pub fn document_chars(&self) -> usize {
        self.document.chars().count()
    }
}

/// Builds prompts from document text and a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptComposer {
    context_limit: usize,
}

impl Default for PromptComposer {
    fn default() -> Self {
        Self {
            context_limit: DEFAULT_CONTEXT_LIMIT,
        }
    }
}

impl PromptComposer {
    /// Create a composer keeping at most `context_limit` document characters.
    ///
    /// Fails with a configuration error when `context_limit` is zero.
    pub fn new(context_limit: usize) -> DocQaResult<Self> {
        if context_limit == 0 {
            return Err(DocQaError::configuration(
                "context_limit must be greater than zero",
            ));
        }
        Ok(Self { context_limit })
    }

    /// Maximum document characters per prompt.
    pub fn context_limit(&self) -> usize {
        self.context_limit
    }

    /// The fixed instruction block.
    pub fn system_instruction() -> String {
        format!(
            "{}\n\n{}\nIf the answer is not present, reply exactly:\n\"{}\"",
            ROLE_STATEMENT, GROUNDING_INSTRUCTION, REFUSAL_MESSAGE
        )
    }

    /// Compose a prompt.
    ///
    /// Fails with [`DocQaError::EmptyQuestion`] before touching the document
    /// when the question is empty or whitespace-only.
    pub fn compose(&self, text: &str, question: &str) -> DocQaResult<Prompt> {
        if question.trim().is_empty() {
            return Err(DocQaError::EmptyQuestion);
        }

        let document = truncate_chars(text, self.context_limit);

        debug!(
            context_limit = self.context_limit,
            document_bytes = text.len(),
            included_bytes = document.len(),
            "Composed prompt"
        );

        Ok(Prompt {
            system: Self::system_instruction(),
            document: document.to_string(),
            question: question.to_string(),
        })
    }
}

/// Prefix of `text` holding at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
