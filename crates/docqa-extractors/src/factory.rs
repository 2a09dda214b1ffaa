//! Factory for creating extractors.

use std::sync::Arc;

use crate::error::{ExtractError, ExtractResult};
use crate::pipeline::ExtractorConfig;
use crate::text::TextExtractor;
use crate::types::{DocumentFormat, Utf8Policy};
use crate::Extractor;

#[cfg(feature = "pdf")]
use crate::PdfExtractor;

#[cfg(feature = "docx")]
use crate::DocxExtractor;

/// Factory for creating per-format extractors.
pub struct ExtractorFactory;

impl ExtractorFactory {
    /// Create a text/markdown extractor.
    pub fn text(policy: Utf8Policy) -> Arc<dyn Extractor> {
        Arc::new(TextExtractor::with_policy(policy))
    }

    /// Create a PDF extractor.
    #[cfg(feature = "pdf")]
    pub fn pdf() -> Arc<dyn Extractor> {
        Arc::new(PdfExtractor::new())
    }

    /// Create a DOCX extractor.
    #[cfg(feature = "docx")]
    pub fn docx() -> Arc<dyn Extractor> {
        Arc::new(DocxExtractor::new())
    }

    /// Create a DOCX extractor with custom configuration.
    #[cfg(feature = "docx")]
    pub fn docx_configured(separator: &str, include_tables: bool) -> Arc<dyn Extractor> {
        Arc::new(
            DocxExtractor::new()
                .with_separator(separator)
                .with_tables(include_tables),
        )
    }

    /// Create the extractor for a format under the given configuration.
    ///
    /// Fails with `MissingCapability` when the format's parser was not
    /// compiled in.
    pub fn for_format(
        format: DocumentFormat,
        config: &ExtractorConfig,
    ) -> ExtractResult<Arc<dyn Extractor>> {
        match format {
            DocumentFormat::Text | DocumentFormat::Markdown => Ok(Self::text(config.utf8_policy)),

            #[cfg(feature = "pdf")]
            DocumentFormat::Pdf => Ok(Self::pdf()),

            #[cfg(feature = "docx")]
            DocumentFormat::Docx => Ok(Self::docx_configured(
                config.paragraph_separator(),
                config.include_tables,
            )),

            #[allow(unreachable_patterns)]
            other => Err(ExtractError::missing(other)),
        }
    }

    /// Get all extractors available in this build.
    pub fn all(config: &ExtractorConfig) -> Vec<Arc<dyn Extractor>> {
        [DocumentFormat::Text, DocumentFormat::Pdf, DocumentFormat::Docx]
            .into_iter()
            .filter_map(|format| Self::for_format(format, config).ok())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_all_extractors() {
        let extractors = ExtractorFactory::all(&ExtractorConfig::default());

        #[cfg(all(feature = "pdf", feature = "docx"))]
        assert_eq!(extractors.len(), 3);

        #[cfg(all(feature = "pdf", not(feature = "docx")))]
        assert_eq!(extractors.len(), 2);

        #[cfg(all(feature = "docx", not(feature = "pdf")))]
        assert_eq!(extractors.len(), 2);

        #[cfg(not(any(feature = "pdf", feature = "docx")))]
        assert_eq!(extractors.len(), 1);
    }

    #[test]
    fn test_factory_text_covers_markdown() {
        let extractor =
            ExtractorFactory::for_format(DocumentFormat::Markdown, &ExtractorConfig::default())
                .unwrap();
        assert!(extractor.supports(DocumentFormat::Text));
        assert!(extractor.supports(DocumentFormat::Markdown));
    }

    #[cfg(feature = "docx")]
    #[test]
    fn test_factory_for_format_docx() {
        let extractor =
            ExtractorFactory::for_format(DocumentFormat::Docx, &ExtractorConfig::default());
        assert!(extractor.is_ok());
    }

    #[cfg(not(feature = "pdf"))]
    #[test]
    fn test_factory_pdf_missing_without_feature() {
        let result = ExtractorFactory::for_format(DocumentFormat::Pdf, &ExtractorConfig::default());
        assert!(matches!(result, Err(ExtractError::MissingCapability { .. })));
    }
}
