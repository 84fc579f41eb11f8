//! Document text extraction for uploaded job descriptions and resumes.
//!
//! Extraction is best-effort: an unreadable document yields empty (or
//! partial) text and a warning, never an error. Callers decide what an empty
//! document means for them.

use docx_rs::{
    read_docx, DocumentChild, Paragraph, ParagraphChild, Run, RunChild, Table, TableCellContent,
    TableChild, TableRowChild,
};
use tracing::warn;

const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Supported upload formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
}

impl DocumentKind {
    /// Resolves the kind from the file extension, falling back to the
    /// multipart content type when the name carries no known extension.
    pub fn detect(filename: &str, content_type: Option<&str>) -> Option<Self> {
        let lower = filename.trim().to_ascii_lowercase();
        if lower.ends_with(".pdf") {
            return Some(DocumentKind::Pdf);
        }
        if lower.ends_with(".docx") {
            return Some(DocumentKind::Docx);
        }
        match content_type {
            Some("application/pdf") => Some(DocumentKind::Pdf),
            Some(DOCX_MIME) => Some(DocumentKind::Docx),
            _ => None,
        }
    }
}

/// An uploaded document with its extracted text.
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    pub filename: String,
    pub text: String,
}

/// Extracts plain text from `data`. Never fails.
pub fn extract_text(data: &[u8], kind: DocumentKind) -> String {
    let raw = match kind {
        DocumentKind::Pdf => extract_pdf_text(data),
        DocumentKind::Docx => extract_docx_text(data),
    };
    normalize_document_text(&raw)
}

/// Runs `extract_text` on the blocking pool.
pub async fn extract_text_blocking(data: bytes::Bytes, kind: DocumentKind) -> String {
    match tokio::task::spawn_blocking(move || extract_text(&data, kind)).await {
        Ok(text) => text,
        Err(e) => {
            warn!("Document extraction task failed: {e}");
            String::new()
        }
    }
}

fn extract_pdf_text(data: &[u8]) -> String {
    // pdf-extract panics on some malformed inputs instead of returning Err
    match std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(data)) {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            warn!("Unable to extract text from PDF: {e}");
            String::new()
        }
        Err(_) => {
            warn!("PDF extraction aborted on a malformed document");
            String::new()
        }
    }
}

fn extract_docx_text(data: &[u8]) -> String {
    let docx = match read_docx(data) {
        Ok(docx) => docx,
        Err(e) => {
            warn!("Unable to read DOCX document: {e}");
            return String::new();
        }
    };

    let mut lines = Vec::new();
    for child in &docx.document.children {
        match child {
            DocumentChild::Paragraph(paragraph) => lines.push(paragraph_text(paragraph)),
            DocumentChild::Table(table) => collect_table_text(table, &mut lines),
            _ => {}
        }
    }
    lines.join("\n")
}

fn paragraph_text(paragraph: &Paragraph) -> String {
    let mut buffer = String::new();
    for child in &paragraph.children {
        match child {
            ParagraphChild::Run(run) => push_run_text(run, &mut buffer),
            ParagraphChild::Hyperlink(link) => {
                for child in &link.children {
                    if let ParagraphChild::Run(run) = child {
                        push_run_text(run, &mut buffer);
                    }
                }
            }
            _ => {}
        }
    }
    buffer
}

fn push_run_text(run: &Run, buffer: &mut String) {
    for child in &run.children {
        match child {
            RunChild::Text(text) => buffer.push_str(&text.text),
            RunChild::Tab(_) => buffer.push('\t'),
            RunChild::Break(_) => buffer.push('\n'),
            _ => {}
        }
    }
}

fn collect_table_text(table: &Table, lines: &mut Vec<String>) {
    for TableChild::TableRow(row) in &table.rows {
        for TableRowChild::TableCell(cell) in &row.cells {
            for content in &cell.children {
                match content {
                    TableCellContent::Paragraph(paragraph) => lines.push(paragraph_text(paragraph)),
                    TableCellContent::Table(inner) => collect_table_text(inner, lines),
                    _ => {}
                }
            }
        }
    }
}

fn normalize_document_text(text: &str) -> String {
    let normalized = text
        .replace('\u{0000}', "")
        .trim_start_matches('\u{FEFF}')
        .replace("\r\n", "\n")
        .replace('\r', "\n");

    let lines: Vec<&str> = normalized.lines().map(str::trim_end).collect();
    lines.join("\n").trim().to_string()
}

/// Builds a DOCX file with one paragraph per line.
#[cfg(test)]
pub(crate) fn docx_fixture(lines: &[&str]) -> Vec<u8> {
    let docx = lines.iter().fold(docx_rs::Docx::new(), |docx, line| {
        docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(*line)))
    });
    let mut buffer = std::io::Cursor::new(Vec::new());
    docx.build().pack(&mut buffer).expect("docx fixture packs");
    buffer.into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_by_extension_is_case_insensitive() {
        assert_eq!(DocumentKind::detect("CV.PDF", None), Some(DocumentKind::Pdf));
        assert_eq!(
            DocumentKind::detect("resume.Docx", None),
            Some(DocumentKind::Docx)
        );
    }

    #[test]
    fn test_detect_falls_back_to_content_type() {
        assert_eq!(
            DocumentKind::detect("upload", Some("application/pdf")),
            Some(DocumentKind::Pdf)
        );
        assert_eq!(DocumentKind::detect("upload", Some(DOCX_MIME)), Some(DocumentKind::Docx));
    }

    #[test]
    fn test_unsupported_types() {
        assert_eq!(DocumentKind::detect("notes.txt", Some("text/plain")), None);
        assert_eq!(DocumentKind::detect("resume.doc", None), None);
    }

    #[test]
    fn test_garbage_input_yields_empty_text() {
        assert_eq!(extract_text(b"not a pdf at all", DocumentKind::Pdf), "");
        assert_eq!(extract_text(b"not a zip either", DocumentKind::Docx), "");
    }

    #[test]
    fn test_docx_paragraphs_are_extracted() {
        let data = docx_fixture(&["Jane Doe", "5 years experience in Python"]);
        let text = extract_text(&data, DocumentKind::Docx);
        assert_eq!(text, "Jane Doe\n5 years experience in Python");
    }

    #[test]
    fn test_normalize_document_text() {
        let raw = "\u{FEFF}Line one  \r\nLine\u{0000} two\r\n\r\n";
        assert_eq!(normalize_document_text(raw), "Line one\nLine two");
    }
}
