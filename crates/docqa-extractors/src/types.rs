//! Core types for document extraction.

use std::path::Path;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::normalize::normalize_whitespace;

/// Document formats recognised by file extension.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DocumentFormat {
    /// Plain UTF-8 text (`.txt`).
    Text,
    /// Markdown, read as plain text (`.md`).
    Markdown,
    /// PDF document (`.pdf`).
    Pdf,
    /// Microsoft Word document (`.docx`).
    Docx,
}

impl DocumentFormat {
    /// Resolve a format from a file extension, with or without the leading dot.
    ///
    /// Matching is case-insensitive.
    pub fn from_extension(extension: &str) -> Option<Self> {
        let ext = extension.trim_start_matches('.').to_ascii_lowercase();
        match ext.as_str() {
            "txt" => Some(Self::Text),
            "md" => Some(Self::Markdown),
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            _ => None,
        }
    }

    /// Canonical extension, including the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Text => ".txt",
            Self::Markdown => ".md",
            Self::Pdf => ".pdf",
            Self::Docx => ".docx",
        }
    }

    /// Every extension accepted at the upload boundary.
    pub fn all_extensions() -> &'static [&'static str] {
        &[".txt", ".md", ".pdf", ".docx"]
    }

    /// Optional parsing library this format depends on.
    pub fn library(&self) -> Option<&'static str> {
        match self {
            Self::Text | Self::Markdown => None,
            Self::Pdf => Some("pdf-extract"),
            Self::Docx => Some("docx-rs"),
        }
    }
}

/// How undecodable UTF-8 in `.txt`/`.md` files is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Utf8Policy {
    /// Invalid sequences fail the extraction.
    #[default]
    Strict,
    /// Invalid sequences are dropped.
    Lossy,
}

/// A file received from the upload boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedDocument {
    name: String,
    bytes: Vec<u8>,
}

impl UploadedDocument {
    /// Create a new uploaded document.
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Original filename.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw file contents.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Lowercased extension including the leading dot, e.g. `".pdf"`.
    ///
    /// Returns an empty string when the name has no extension.
    pub fn extension(&self) -> String {
        Path::new(&self.name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e.to_ascii_lowercase()))
            .unwrap_or_default()
    }

    /// Format implied by the extension, if recognised.
    pub fn format(&self) -> Option<DocumentFormat> {
        DocumentFormat::from_extension(&self.extension())
    }

    /// Size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Check if the file is zero bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Plain text extracted from a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedText {
    /// The extracted text.
    pub text: String,

    /// Format the text came from.
    pub format: DocumentFormat,

    /// Number of pages parsed (PDF only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_count: Option<usize>,

    /// Whether whitespace normalization was applied.
    #[serde(default)]
    pub normalized: bool,
}

impl ExtractedText {
    /// Create new extracted text.
    pub fn new(text: impl Into<String>, format: DocumentFormat) -> Self {
        Self {
            text: text.into(),
            format,
            page_count: None,
            normalized: false,
        }
    }

    /// Add a page count.
    pub fn with_page_count(mut self, page_count: usize) -> Self {
        self.page_count = Some(page_count);
        self
    }

    /// Collapse whitespace runs and trim.
    pub fn normalize(mut self) -> Self {
        self.text = normalize_whitespace(&self.text);
        self.normalized = true;
        self
    }

    /// True when the text is empty or whitespace-only.
    ///
    /// Callers treat a blank extraction as a document that failed to load.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Length in characters.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// First `max_chars` characters of the text.
    pub fn preview(&self, max_chars: usize) -> &str {
        match self.text.char_indices().nth(max_chars) {
            Some((idx, _)) => &self.text[..idx],
            None => &self.text,
        }
    }

    /// Consume and return the text.
    pub fn into_text(self) -> String {
        self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_format_from_extension_is_case_insensitive() {
        assert_eq!(DocumentFormat::from_extension(".TXT"), Some(DocumentFormat::Text));
        assert_eq!(DocumentFormat::from_extension("Md"), Some(DocumentFormat::Markdown));
        assert_eq!(DocumentFormat::from_extension(".PdF"), Some(DocumentFormat::Pdf));
        assert_eq!(DocumentFormat::from_extension("docx"), Some(DocumentFormat::Docx));
        assert_eq!(DocumentFormat::from_extension(".csv"), None);
        assert_eq!(DocumentFormat::from_extension(".doc"), None);
        assert_eq!(DocumentFormat::from_extension(""), None);
    }

    #[test]
    fn test_format_extensions_resolve_back() {
        for format in DocumentFormat::iter() {
            assert_eq!(DocumentFormat::from_extension(format.extension()), Some(format));
            assert!(DocumentFormat::all_extensions().contains(&format.extension()));
        }
    }

    #[test]
    fn test_format_display() {
        assert_eq!(DocumentFormat::Pdf.to_string(), "pdf");
        assert_eq!(DocumentFormat::Markdown.to_string(), "markdown");
        assert_eq!("docx".parse::<DocumentFormat>().unwrap(), DocumentFormat::Docx);
    }

    #[test]
    fn test_uploaded_document_extension() {
        assert_eq!(UploadedDocument::new("Report.PDF", Vec::<u8>::new()).extension(), ".pdf");
        assert_eq!(UploadedDocument::new("notes.tar.md", Vec::<u8>::new()).extension(), ".md");
        assert_eq!(UploadedDocument::new("README", Vec::<u8>::new()).extension(), "");
        assert_eq!(UploadedDocument::new(".bashrc", Vec::<u8>::new()).extension(), "");
        assert_eq!(UploadedDocument::new("data.csv", Vec::<u8>::new()).format(), None);
    }

    #[test]
    fn test_preview_respects_char_boundaries() {
        let extracted = ExtractedText::new("héllo wörld", DocumentFormat::Text);
        assert_eq!(extracted.preview(2), "hé");
        assert_eq!(extracted.preview(100), "héllo wörld");
        assert_eq!(extracted.char_count(), 11);
    }

    #[test]
    fn test_is_blank() {
        assert!(ExtractedText::new("", DocumentFormat::Pdf).is_blank());
        assert!(ExtractedText::new(" \n\t", DocumentFormat::Pdf).is_blank());
        assert!(!ExtractedText::new("x", DocumentFormat::Pdf).is_blank());
    }

    #[test]
    fn test_normalize_marks_text() {
        let extracted = ExtractedText::new("  a \n\n b  ", DocumentFormat::Docx).normalize();
        assert_eq!(extracted.text, "a b");
        assert!(extracted.normalized);
    }
}
