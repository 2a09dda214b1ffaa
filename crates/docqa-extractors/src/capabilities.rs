//! Optional parser availability.

use serde::{Deserialize, Serialize};

use crate::types::DocumentFormat;

/// Which optional parsers are usable.
///
/// Detected once when an extractor is built and consulted before every
/// dispatch. Plain text is always available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    /// PDF parsing via pdf-extract.
    pub pdf: bool,
    /// DOCX parsing via docx-rs.
    pub docx: bool,
}

impl Capabilities {
    /// Capabilities compiled into this build.
    pub fn detect() -> Self {
        Self {
            pdf: cfg!(feature = "pdf"),
            docx: cfg!(feature = "docx"),
        }
    }

    /// Plain text only.
    pub fn text_only() -> Self {
        Self {
            pdf: false,
            docx: false,
        }
    }

    /// Keep only the capabilities present in both.
    pub fn intersect(self, other: Self) -> Self {
        Self {
            pdf: self.pdf && other.pdf,
            docx: self.docx && other.docx,
        }
    }

    /// Check if a format can be extracted.
    pub fn supports(&self, format: DocumentFormat) -> bool {
        match format {
            DocumentFormat::Text | DocumentFormat::Markdown => true,
            DocumentFormat::Pdf => self.pdf,
            DocumentFormat::Docx => self.docx,
        }
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::detect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_matches_features() {
        let caps = Capabilities::detect();
        assert_eq!(caps.pdf, cfg!(feature = "pdf"));
        assert_eq!(caps.docx, cfg!(feature = "docx"));
    }

    #[test]
    fn test_text_always_supported() {
        let caps = Capabilities::text_only();
        assert!(caps.supports(DocumentFormat::Text));
        assert!(caps.supports(DocumentFormat::Markdown));
        assert!(!caps.supports(DocumentFormat::Pdf));
        assert!(!caps.supports(DocumentFormat::Docx));
    }

    #[test]
    fn test_intersect_cannot_enable() {
        let requested = Capabilities {
            pdf: true,
            docx: true,
        };
        assert_eq!(requested.intersect(Capabilities::text_only()), Capabilities::text_only());

        let pdf_only = Capabilities {
            pdf: true,
            docx: false,
        };
        assert_eq!(requested.intersect(pdf_only), pdf_only);
    }
}
