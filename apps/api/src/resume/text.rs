//! Text extraction from uploaded resume documents.
//!
//! Decode failures never propagate: they are logged and surface as empty text,
//! which callers treat as the single "no extractable text" condition.

use std::io::{Cursor, Read, Write};

use bytes::Bytes;
use quick_xml::events::Event;
use quick_xml::Reader;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Doc,
    Docx,
}

impl DocumentFormat {
    /// Format declared by the file name's extension, if supported.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let (_, ext) = file_name.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "doc" => Some(Self::Doc),
            "docx" => Some(Self::Docx),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Doc => "doc",
            Self::Docx => "docx",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Doc => "application/msword",
            Self::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum TextExtractError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF decode error: {0}")]
    Pdf(String),

    #[error("DOCX archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("DOCX XML error: {0}")]
    Xml(#[from] quick_xml::Error),
}

/// Decodes `bytes` as `format`. Any failure yields an empty string.
pub fn extract_text(bytes: &[u8], format: DocumentFormat) -> String {
    let result = match format {
        DocumentFormat::Pdf => extract_pdf_text(bytes),
        // Legacy .doc goes through the DOCX decoder; binary Word files fail
        // here and end up as empty text.
        DocumentFormat::Doc | DocumentFormat::Docx => extract_docx_text(bytes),
    };
    match result {
        Ok(text) => {
            debug!("Extracted {} chars from {:?} document", text.len(), format);
            text
        }
        Err(e) => {
            warn!("Text extraction failed for {:?} document: {e}", format);
            String::new()
        }
    }
}

/// Runs [`extract_text`] on the blocking pool. A panic inside a decoder is
/// treated like any other decode failure.
pub async fn extract_text_blocking(bytes: Bytes, format: DocumentFormat) -> String {
    tokio::task::spawn_blocking(move || extract_text(&bytes, format))
        .await
        .unwrap_or_else(|e| {
            warn!("Text extraction task aborted for {:?} document: {e}", format);
            String::new()
        })
}

/// pdf-extract reads from a path; the temp file is removed when dropped.
fn extract_pdf_text(bytes: &[u8]) -> Result<String, TextExtractError> {
    let mut file = NamedTempFile::new()?;
    file.write_all(bytes)?;
    file.flush()?;
    pdf_extract::extract_text(file.path()).map_err(|e| TextExtractError::Pdf(e.to_string()))
}

fn extract_docx_text(bytes: &[u8]) -> Result<String, TextExtractError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")?
        .read_to_string(&mut xml)?;
    docx_xml_to_text(&xml)
}

/// Body paragraphs first, then non-empty table cells, one per line.
fn docx_xml_to_text(xml: &str) -> Result<String, TextExtractError> {
    let mut reader = Reader::from_str(xml);

    let mut paragraphs: Vec<String> = Vec::new();
    let mut cells: Vec<String> = Vec::new();
    let mut paragraph = String::new();
    let mut cell = String::new();
    let mut table_depth = 0usize;
    let mut in_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:tbl" => table_depth += 1,
                b"w:t" => in_text = true,
                b"w:p" => paragraph.clear(),
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:tab" => paragraph.push('\t'),
                b"w:br" => paragraph.push('\n'),
                _ => {}
            },
            Event::Text(t) if in_text => paragraph.push_str(&t.unescape()?),
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" if table_depth > 0 => {
                    if !cell.is_empty() {
                        cell.push('\n');
                    }
                    cell.push_str(&paragraph);
                }
                b"w:p" => {
                    if !paragraph.trim().is_empty() {
                        paragraphs.push(paragraph.clone());
                    }
                }
                b"w:tc" => {
                    if !cell.trim().is_empty() {
                        cells.push(cell.clone());
                    }
                    cell.clear();
                }
                b"w:tbl" => table_depth = table_depth.saturating_sub(1),
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    paragraphs.extend(cells);
    Ok(paragraphs.join("\n"))
}
