//! Server state management.

use std::sync::Arc;

use docqa_core::config::DocQaConfig;
use docqa_core::error::DocQaResult;
use docqa_core::qa::DocumentQa;
use docqa_core::traits::Llm;
use docqa_extractors::{DocumentExtractor, ExtractorConfig, Utf8Policy};

/// Shared application state.
///
/// Built once at startup and never mutated. Sessions live on the client.
#[derive(Clone)]
pub struct AppState {
    pub extractor: Arc<DocumentExtractor>,
    pub qa: DocumentQa,
    pub preview_chars: usize,
}

impl AppState {
    /// Create state from configuration and a generation collaborator.
    pub fn new(config: &DocQaConfig, llm: Arc<dyn Llm>) -> DocQaResult<Self> {
        let extraction = &config.extraction;
        let extractor = DocumentExtractor::new(ExtractorConfig {
            normalize_whitespace: extraction.normalize_whitespace,
            utf8_policy: if extraction.lossy_utf8 {
                Utf8Policy::Lossy
            } else {
                Utf8Policy::Strict
            },
            include_tables: extraction.include_tables,
        });

        Self::with_extractor(config, llm, extractor)
    }

    /// Create state with a prebuilt extractor.
    pub fn with_extractor(
        config: &DocQaConfig,
        llm: Arc<dyn Llm>,
        extractor: DocumentExtractor,
    ) -> DocQaResult<Self> {
        Ok(Self {
            extractor: Arc::new(extractor),
            qa: DocumentQa::from_config(llm, &config.prompt)?,
            preview_chars: config.extraction.preview_chars,
        })
    }
}
