//! Plain text and markdown extraction.

use async_trait::async_trait;

use crate::error::{ExtractError, ExtractResult};
use crate::normalize::decode_utf8_lossy;
use crate::types::{DocumentFormat, ExtractedText, Utf8Policy};
use crate::Extractor;

/// Decodes `.txt` and `.md` files as UTF-8.
#[derive(Debug, Clone, Default)]
pub struct TextExtractor {
    policy: Utf8Policy,
}

impl TextExtractor {
    /// Create a strict text extractor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a text extractor with the given decoding policy.
    pub fn with_policy(policy: Utf8Policy) -> Self {
        Self { policy }
    }

    /// Decoding policy in effect.
    pub fn policy(&self) -> Utf8Policy {
        self.policy
    }

    fn decode(&self, content: &[u8]) -> ExtractResult<String> {
        match self.policy {
            Utf8Policy::Strict => std::str::from_utf8(content)
                .map(str::to_owned)
                .map_err(|source| ExtractError::DecodeFailure {
                    format: DocumentFormat::Text,
                    source,
                }),
            Utf8Policy::Lossy => Ok(decode_utf8_lossy(content)),
        }
    }
}

#[async_trait]
impl Extractor for TextExtractor {
    async fn extract(&self, content: &[u8]) -> ExtractResult<ExtractedText> {
        let text = self.decode(content)?;
        Ok(ExtractedText::new(text, DocumentFormat::Text))
    }

    fn formats(&self) -> &[DocumentFormat] {
        &[DocumentFormat::Text, DocumentFormat::Markdown]
    }

    fn name(&self) -> &str {
        "utf-8"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_text_extractor_decodes_exactly() {
        let extractor = TextExtractor::new();
        let bytes = "# Title\n\nCafé menu\r\n".as_bytes();
        let result = extractor.extract(bytes).await.unwrap();
        assert_eq!(result.text.as_bytes(), bytes);
    }

    #[tokio::test]
    async fn test_text_extractor_strict_rejects_invalid() {
        let extractor = TextExtractor::new();
        let result = extractor.extract(b"ok\xffnot ok").await;
        assert!(matches!(result, Err(ExtractError::DecodeFailure { .. })));
    }

    #[tokio::test]
    async fn test_text_extractor_lossy_drops_invalid() {
        let extractor = TextExtractor::with_policy(Utf8Policy::Lossy);
        let result = extractor.extract(b"ok\xff ok").await.unwrap();
        assert_eq!(result.text, "ok ok");
    }

    #[tokio::test]
    async fn test_text_extractor_empty_is_ok() {
        let extractor = TextExtractor::new();
        let result = extractor.extract(&[]).await.unwrap();
        assert!(result.is_blank());
    }

    #[test]
    fn test_text_extractor_formats() {
        let extractor = TextExtractor::new();
        assert!(extractor.supports(DocumentFormat::Text));
        assert!(extractor.supports(DocumentFormat::Markdown));
        assert!(!extractor.supports(DocumentFormat::Pdf));
    }
}
