//! Extension-based dispatch from an upload to the right extractor.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::capabilities::Capabilities;
use crate::error::{ExtractError, ExtractResult};
use crate::types::{DocumentFormat, ExtractedText, UploadedDocument, Utf8Policy};
use crate::Extractor;

/// Extraction behaviour shared by all formats.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractorConfig {
    /// Collapse whitespace runs and trim after extraction.
    pub normalize_whitespace: bool,
    /// How invalid UTF-8 in text files is handled.
    pub utf8_policy: Utf8Policy,
    /// Include DOCX table rows in the output.
    pub include_tables: bool,
}

impl ExtractorConfig {
    /// Configuration of the whitespace-normalizing variant.
    ///
    /// Invalid UTF-8 is dropped and whitespace is collapsed.
    pub fn normalizing() -> Self {
        Self {
            normalize_whitespace: true,
            utf8_policy: Utf8Policy::Lossy,
            include_tables: false,
        }
    }

    /// Separator placed between DOCX paragraphs.
    pub fn paragraph_separator(&self) -> &'static str {
        if self.normalize_whitespace {
            " "
        } else {
            "\n"
        }
    }
}

/// Turns an [`UploadedDocument`] into [`ExtractedText`].
///
/// Dispatch is total over extensions: every upload ends in text or in
/// exactly one [`ExtractError`] variant.
pub struct DocumentExtractor {
    config: ExtractorConfig,
    capabilities: Capabilities,
    extractors: Vec<Arc<dyn Extractor>>,
}

impl DocumentExtractor {
    /// Create an extractor with the given configuration and every compiled-in parser.
    pub fn new(config: ExtractorConfig) -> Self {
        let extractors = crate::ExtractorFactory::all(&config);
        let capabilities = Capabilities::detect();

        debug!(
            pdf = capabilities.pdf,
            docx = capabilities.docx,
            "Document extractor capabilities detected"
        );

        Self {
            config,
            capabilities,
            extractors,
        }
    }

    /// Create an extractor with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(ExtractorConfig::default())
    }

    /// Narrow the usable capabilities.
    ///
    /// Formats that were not compiled in stay unavailable.
    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities.intersect(Capabilities::detect());
        self
    }

    /// Capabilities consulted before dispatch.
    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Active configuration.
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract text from an uploaded document.
    pub async fn extract(&self, document: &UploadedDocument) -> ExtractResult<ExtractedText> {
        let result = self.dispatch(document).await;

        if let Err(ref e) = result {
            warn!(
                name = %document.name(),
                code = e.code(),
                error = %e,
                "Document extraction failed"
            );
        }

        result
    }

    async fn dispatch(&self, document: &UploadedDocument) -> ExtractResult<ExtractedText> {
        let extension = document.extension();
        let format = DocumentFormat::from_extension(&extension)
            .ok_or_else(|| ExtractError::unsupported(extension.clone()))?;

        if !self.capabilities.supports(format) {
            return Err(ExtractError::missing(format));
        }

        let extractor = self
            .extractors
            .iter()
            .find(|e| e.supports(format))
            .ok_or_else(|| ExtractError::missing(format))?;

        debug!(
            name = %document.name(),
            format = %format,
            extractor = extractor.name(),
            bytes = document.len(),
            "Dispatching document extraction"
        );

        let mut extracted = extractor
            .extract(document.bytes())
            .await
            .map_err(|e| e.for_format(format))?;
        extracted.format = format;

        if self.config.normalize_whitespace {
            extracted = extracted.normalize();
        }

        debug!(
            format = %format,
            chars = extracted.char_count(),
            "Document extracted"
        );

        Ok(extracted)
    }

    /// Check if uploads of this format can currently be extracted.
    pub fn supports(&self, format: DocumentFormat) -> bool {
        self.capabilities.supports(format) && self.extractors.iter().any(|e| e.supports(format))
    }

    /// Extensions that currently extract, in display order.
    pub fn supported_extensions(&self) -> Vec<&'static str> {
        DocumentFormat::all_extensions()
            .iter()
            .copied()
            .filter(|ext| DocumentFormat::from_extension(ext).is_some_and(|f| self.supports(f)))
            .collect()
    }
}

impl Default for DocumentExtractor {
    fn default() -> Self {
        Self::with_defaults()
    }
}
