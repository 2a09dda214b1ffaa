//! Per-user session state, owned by the caller.
//!
//! The core never stores a session. Callers hold a [`SessionState`] between
//! interactions and replace it with the value each transition returns.

use serde::{Deserialize, Serialize};

/// Current document text and last answer for one user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    /// Text of the most recently loaded document.
    #[serde(default)]
    pub document_text: String,
    /// Most recent answer, empty until a question is answered.
    #[serde(default)]
    pub answer: String,
}

impl SessionState {
    /// Create an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the document. Any previous answer is cleared.
    pub fn with_document(self, document_text: impl Into<String>) -> Self {
        Self {
            document_text: document_text.into(),
            answer: String::new(),
        }
    }

    /// Record the answer to the latest question.
    pub fn with_answer(self, answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            ..self
        }
    }

    /// Whether a non-blank document is loaded.
    pub fn has_document(&self) -> bool {
        !self.document_text.trim().is_empty()
    }

    /// Whether an answer is available for display.
    pub fn has_answer(&self) -> bool {
        !self.answer.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_empty() {
        let session = SessionState::new();
        assert!(!session.has_document());
        assert!(!session.has_answer());
    }

    #[test]
    fn test_new_document_clears_answer() {
        let session = SessionState::new()
            .with_document("first")
            .with_answer("an answer");
        assert!(session.has_answer());

        let session = session.with_document("second");
        assert_eq!(session.document_text, "second");
        assert!(!session.has_answer());
    }

    #[test]
    fn test_blank_document_is_not_loaded() {
        let session = SessionState::new().with_document(" \n\t ");
        assert!(!session.has_document());
    }
}
