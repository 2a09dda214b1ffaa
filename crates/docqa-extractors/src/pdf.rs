//! PDF content extraction using pdf-extract.

use async_trait::async_trait;
use tracing::debug;

use crate::error::{ExtractError, ExtractResult};
use crate::types::{DocumentFormat, ExtractedText};
use crate::Extractor;

/// PDF text extractor using the pdf-extract library.
///
/// Pages are extracted in document order and concatenated. A page with no
/// text layer (scanned or image-only) contributes an empty string rather
/// than failing the document. Parsing runs in `spawn_blocking` so a slow
/// or panicking parser never stalls or unwinds into the async runtime.
#[derive(Debug, Clone, Default)]
pub struct PdfExtractor;

impl PdfExtractor {
    /// Create new PDF extractor.
    pub fn new() -> Self {
        Self
    }

    /// Extract per-page text synchronously (called within spawn_blocking).
    fn extract_pages(content: &[u8]) -> ExtractResult<Vec<String>> {
        // A zero-byte upload is a document with no pages.
        if content.is_empty() {
            return Ok(Vec::new());
        }

        pdf_extract::extract_text_from_mem_by_pages(content)
            .map_err(|e| ExtractError::parse(DocumentFormat::Pdf, e.to_string()))
    }
}

#[async_trait]
impl Extractor for PdfExtractor {
    async fn extract(&self, content: &[u8]) -> ExtractResult<ExtractedText> {
        let content = content.to_vec();

        let pages = tokio::task::spawn_blocking(move || Self::extract_pages(&content))
            .await
            .map_err(|e| ExtractError::from_join(DocumentFormat::Pdf, e))??;

        debug!(pages = pages.len(), "Extracted PDF pages");

        let page_count = pages.len();
        let text = pages.concat();

        Ok(ExtractedText::new(text, DocumentFormat::Pdf).with_page_count(page_count))
    }

    fn formats(&self) -> &[DocumentFormat] {
        &[DocumentFormat::Pdf]
    }

    fn name(&self) -> &str {
        "pdf-extract"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_extractor_creation() {
        let extractor = PdfExtractor::new();
        assert_eq!(extractor.name(), "pdf-extract");
        assert!(extractor.supports(DocumentFormat::Pdf));
        assert!(!extractor.supports(DocumentFormat::Docx));
    }

    #[tokio::test]
    async fn test_pdf_zero_bytes_is_empty_document() {
        let extractor = PdfExtractor::new();
        let result = extractor.extract(&[]).await.unwrap();
        assert_eq!(result.text, "");
        assert_eq!(result.page_count, Some(0));
    }

    #[tokio::test]
    async fn test_pdf_garbage_is_parse_exception() {
        let extractor = PdfExtractor::new();
        let result = extractor.extract(b"this is not a pdf").await;
        assert!(matches!(
            result,
            Err(ExtractError::ParseException {
                format: DocumentFormat::Pdf,
                ..
            })
        ));
    }
}
