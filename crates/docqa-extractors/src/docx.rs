//! DOCX content extraction using docx-rs.
//!
//! Extracts the text of every body paragraph in document order. Table
//! content is skipped unless explicitly requested.

use crate::error::{ExtractError, ExtractResult};
use crate::types::{DocumentFormat, ExtractedText};
use crate::Extractor;
use async_trait::async_trait;
use docx_rs::{DocumentChild, ParagraphChild, RunChild, TableChild, TableRowChild};

/// DOCX content extractor using docx-rs library.
///
/// Wraps synchronous docx-rs calls in spawn_blocking to avoid blocking the
/// async runtime.
#[derive(Debug, Clone)]
pub struct DocxExtractor {
    /// String placed between paragraphs.
    separator: String,
    /// Whether table rows are included as `a | b` lines.
    include_tables: bool,
}

impl Default for DocxExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl DocxExtractor {
    /// Create new DOCX extractor joining paragraphs with newlines.
    pub fn new() -> Self {
        Self {
            separator: "\n".to_string(),
            include_tables: false,
        }
    }

    /// Configure the paragraph separator.
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Configure whether to include table text.
    pub fn with_tables(mut self, include: bool) -> Self {
        self.include_tables = include;
        self
    }

    /// Extract text synchronously (called within spawn_blocking).
    fn extract_sync(content: &[u8], separator: &str, include_tables: bool) -> ExtractResult<String> {
        let docx = docx_rs::read_docx(content)
            .map_err(|e| ExtractError::parse(DocumentFormat::Docx, e.to_string()))?;

        let mut parts: Vec<String> = Vec::new();

        for child in &docx.document.children {
            match child {
                DocumentChild::Paragraph(p) => {
                    // Empty paragraphs are kept so blank lines survive the join.
                    parts.push(Self::extract_paragraph_text(p));
                }
                DocumentChild::Table(t) if include_tables => {
                    let table_text = Self::extract_table_text(t);
                    if !table_text.is_empty() {
                        parts.push(table_text);
                    }
                }
                _ => {}
            }
        }

        Ok(parts.join(separator))
    }

    /// Extract text from a paragraph.
    fn extract_paragraph_text(p: &docx_rs::Paragraph) -> String {
        let mut text = String::new();

        for child in &p.children {
            match child {
                ParagraphChild::Run(r) => Self::push_run_text(r, &mut text),
                ParagraphChild::Hyperlink(h) => {
                    for child in &h.children {
                        if let ParagraphChild::Run(r) = child {
                            Self::push_run_text(r, &mut text);
                        }
                    }
                }
                _ => {}
            }
        }

        text
    }

    fn push_run_text(r: &docx_rs::Run, text: &mut String) {
        for run_child in &r.children {
            match run_child {
                RunChild::Text(t) => text.push_str(&t.text),
                RunChild::Tab(_) => text.push('\t'),
                RunChild::Break(_) => text.push('\n'),
                _ => {}
            }
        }
    }

    /// Extract text from a table, one line per row.
    fn extract_table_text(t: &docx_rs::Table) -> String {
        let mut rows: Vec<String> = Vec::new();

        for row in &t.rows {
            let TableChild::TableRow(r) = row;
            let mut cells: Vec<String> = Vec::new();
            for cell in &r.cells {
                let TableRowChild::TableCell(c) = cell;
                let mut cell_text = String::new();
                for child in &c.children {
                    if let docx_rs::TableCellContent::Paragraph(p) = child {
                        let para = Self::extract_paragraph_text(p);
                        if !cell_text.is_empty() && !para.is_empty() {
                            cell_text.push(' ');
                        }
                        cell_text.push_str(&para);
                    }
                }
                cells.push(cell_text.trim().to_string());
            }
            rows.push(cells.join(" | "));
        }

        rows.join("\n")
    }
}

#[async_trait]
impl Extractor for DocxExtractor {
    async fn extract(&self, content: &[u8]) -> ExtractResult<ExtractedText> {
        let content = content.to_vec();
        let separator = self.separator.clone();
        let include_tables = self.include_tables;

        let text = tokio::task::spawn_blocking(move || {
            Self::extract_sync(&content, &separator, include_tables)
        })
        .await
        .map_err(|e| ExtractError::from_join(DocumentFormat::Docx, e))??;

        Ok(ExtractedText::new(text, DocumentFormat::Docx))
    }

    fn formats(&self) -> &[DocumentFormat] {
        &[DocumentFormat::Docx]
    }

    fn name(&self) -> &str {
        "docx-rs"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docx_rs::{Docx, Paragraph, Run, Table, TableCell, TableRow};

    fn build_docx(docx: Docx) -> Vec<u8> {
        let mut cursor = std::io::Cursor::new(Vec::new());
        docx.build().pack(&mut cursor).unwrap();
        cursor.into_inner()
    }

    fn paragraph(text: &str) -> Paragraph {
        Paragraph::new().add_run(Run::new().add_text(text))
    }

    #[test]
    fn test_docx_extractor_creation() {
        let extractor = DocxExtractor::new();
        assert_eq!(extractor.name(), "docx-rs");
        assert!(extractor.supports(DocumentFormat::Docx));
        assert!(!extractor.supports(DocumentFormat::Pdf));
    }

    #[tokio::test]
    async fn test_docx_extractor_empty_content() {
        let extractor = DocxExtractor::new();
        let result = extractor.extract(&[]).await;
        assert!(matches!(result, Err(ExtractError::ParseException { .. })));
    }

    #[tokio::test]
    async fn test_docx_paragraphs_joined_by_newline() {
        let bytes = build_docx(
            Docx::new()
                .add_paragraph(paragraph("First paragraph."))
                .add_paragraph(
                    Paragraph::new()
                        .add_run(Run::new().add_text("Second "))
                        .add_run(Run::new().add_text("paragraph.")),
                ),
        );

        let result = DocxExtractor::new().extract(&bytes).await.unwrap();
        assert_eq!(result.text, "First paragraph.\nSecond paragraph.");
    }

    #[tokio::test]
    async fn test_docx_custom_separator() {
        let bytes = build_docx(
            Docx::new()
                .add_paragraph(paragraph("one"))
                .add_paragraph(paragraph("two")),
        );

        let result = DocxExtractor::new()
            .with_separator(" ")
            .extract(&bytes)
            .await
            .unwrap();
        assert_eq!(result.text, "one two");
    }

    #[tokio::test]
    async fn test_docx_tables_skipped_by_default() {
        let table = Table::new(vec![TableRow::new(vec![
            TableCell::new().add_paragraph(paragraph("cell a")),
            TableCell::new().add_paragraph(paragraph("cell b")),
        ])]);
        let bytes = build_docx(
            Docx::new()
                .add_paragraph(paragraph("intro"))
                .add_table(table),
        );

        let plain = DocxExtractor::new().extract(&bytes).await.unwrap();
        assert_eq!(plain.text, "intro");

        let with_tables = DocxExtractor::new()
            .with_tables(true)
            .extract(&bytes)
            .await
            .unwrap();
        assert_eq!(with_tables.text, "intro\ncell a | cell b");
    }
}
