//! docqa-extractors - Plain-text extraction from uploaded documents.
//!
//! Converts the bytes of a `.txt`, `.md`, `.pdf` or `.docx` upload into a
//! single plain-text string, dispatching on the filename extension.
//!
//! # Features
//!
//! - `pdf` (default) - PDF text extraction via pdf-extract
//! - `docx` (default) - DOCX text extraction via docx-rs
//!
//! Building without a feature leaves that format reported as a missing
//! capability instead of failing to compile.
//!
//! # Example
//!
//! ```ignore
//! use docqa_extractors::{DocumentExtractor, UploadedDocument};
//!
//! let extractor = DocumentExtractor::with_defaults();
//! let doc = UploadedDocument::new("notes.md", bytes);
//! let extracted = extractor.extract(&doc).await?;
//!
//! if extracted.is_blank() {
//!     // nothing to answer from
//! }
//! ```

mod capabilities;
mod error;
mod factory;
mod normalize;
mod pipeline;
mod text;
mod types;

#[cfg(feature = "pdf")]
mod pdf;

#[cfg(feature = "docx")]
mod docx;

pub use capabilities::Capabilities;
pub use error::{ExtractError, ExtractResult};
pub use factory::ExtractorFactory;
pub use normalize::{decode_utf8_lossy, normalize_whitespace};
pub use pipeline::{DocumentExtractor, ExtractorConfig};
pub use text::TextExtractor;
pub use types::{DocumentFormat, ExtractedText, UploadedDocument, Utf8Policy};

#[cfg(feature = "pdf")]
pub use pdf::PdfExtractor;

#[cfg(feature = "docx")]
pub use docx::DocxExtractor;

use async_trait::async_trait;

/// Core Extractor trait - every per-format extractor implements this.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Extract text content from bytes.
    async fn extract(&self, content: &[u8]) -> ExtractResult<ExtractedText>;

    /// Formats this extractor handles.
    fn formats(&self) -> &[DocumentFormat];

    /// Check if this extractor handles the given format.
    fn supports(&self, format: DocumentFormat) -> bool {
        self.formats().contains(&format)
    }

    /// Human-readable name for this extractor.
    fn name(&self) -> &str;
}
