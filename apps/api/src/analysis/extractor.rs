//! Text extraction — uploaded bytes (PDF, DOCX, plain text) to normalized text.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::analysis::error::AnalysisError;
use crate::analysis::models::RawDocument;

pub const MIME_PDF: &str = "application/pdf";
pub const MIME_DOCX: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const MIME_MSWORD: &str = "application/msword";
const MIME_OCTET_STREAM: &str = "application/octet-stream";

/// WordprocessingML markup outweighs the text it carries; the inflated body
/// may be this many times the text limit before it is rejected.
const DOCX_MARKUP_FACTOR: usize = 8;

const ZERO_WIDTH: &[char] = &['\u{200b}', '\u{200c}', '\u{200d}', '\u{2060}', '\u{feff}'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    PlainText,
}

impl DocumentFormat {
    /// Resolves the reader for an upload. The declared MIME type wins; the
    /// file extension is consulted only when the type is missing or generic.
    /// No type and no recognizable extension means plain text.
    pub fn detect(mime: Option<&str>, file_name: Option<&str>) -> Result<Self, AnalysisError> {
        let mime = mime
            .map(|m| m.split(';').next().unwrap_or("").trim().to_ascii_lowercase())
            .filter(|m| !m.is_empty());

        match mime.as_deref() {
            Some(MIME_PDF) => Ok(DocumentFormat::Pdf),
            Some(MIME_DOCX) | Some(MIME_MSWORD) => Ok(DocumentFormat::Docx),
            Some(m) if m.starts_with("text/") => Ok(DocumentFormat::PlainText),
            Some(MIME_OCTET_STREAM) => Self::from_extension(file_name).ok_or_else(|| {
                AnalysisError::UnsupportedFormat(format!(
                    "{MIME_OCTET_STREAM} ({})",
                    file_name.unwrap_or("unnamed file")
                ))
            }),
            Some(other) => Err(AnalysisError::UnsupportedFormat(other.to_string())),
            None => Ok(Self::from_extension(file_name).unwrap_or(DocumentFormat::PlainText)),
        }
    }

    fn from_extension(file_name: Option<&str>) -> Option<Self> {
        let (_, ext) = file_name?.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(DocumentFormat::Pdf),
            "docx" | "doc" => Some(DocumentFormat::Docx),
            "txt" | "text" | "md" => Some(DocumentFormat::PlainText),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Docx => "docx",
            DocumentFormat::PlainText => "text",
        }
    }
}

/// Detects the format and extracts normalized text. `max_text_bytes` bounds
/// how far a compressed container may be inflated.
pub fn extract(
    bytes: &[u8],
    mime: Option<&str>,
    file_name: Option<&str>,
    max_text_bytes: usize,
) -> Result<RawDocument, AnalysisError> {
    let format = DocumentFormat::detect(mime, file_name)?;
    extract_as(bytes, format, max_text_bytes)
}

pub fn extract_as(
    bytes: &[u8],
    format: DocumentFormat,
    max_text_bytes: usize,
) -> Result<RawDocument, AnalysisError> {
    let raw = match format {
        DocumentFormat::Pdf => extract_pdf(bytes)?,
        DocumentFormat::Docx => extract_docx(bytes, max_text_bytes)?,
        DocumentFormat::PlainText => String::from_utf8_lossy(bytes).into_owned(),
    };

    let text = normalize_text(&raw);
    if format != DocumentFormat::PlainText && text.trim().is_empty() {
        return Err(AnalysisError::Extraction(format!(
            "the {} file contains no extractable text (scanned image or encrypted?)",
            format.as_str()
        )));
    }

    tracing::debug!(format = format.as_str(), chars = text.len(), "Extracted document text");
    Ok(RawDocument { text })
}

/// Unifies line endings and whitespace while keeping the line structure the
/// segmenter depends on.
pub fn normalize_text(raw: &str) -> String {
    let unified = raw
        .replace("\r\n", "\n")
        .replace(&['\r', '\u{0c}'][..], "\n")
        .replace('\u{a0}', " ")
        .replace(ZERO_WIDTH, "");

    unified
        .split('\n')
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
}

fn extract_pdf(bytes: &[u8]) -> Result<String, AnalysisError> {
    // pdf-extract panics on some malformed inputs instead of returning an error.
    match std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes)) {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(AnalysisError::Extraction(format!("failed to read PDF: {e}"))),
        Err(_) => Err(AnalysisError::Extraction(
            "PDF reader aborted on malformed input".to_string(),
        )),
    }
}

fn extract_docx(bytes: &[u8], max_text_bytes: usize) -> Result<String, AnalysisError> {
    let limit = max_text_bytes.saturating_mul(DOCX_MARKUP_FACTOR);
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| AnalysisError::Extraction(format!("not a valid DOCX container: {e}")))?;

    let entry = archive
        .by_name("word/document.xml")
        .map_err(|e| AnalysisError::Extraction(format!("DOCX has no document body: {e}")))?;

    let declared = usize::try_from(entry.size()).unwrap_or(usize::MAX);
    if declared > limit {
        return Err(AnalysisError::InputTooLarge {
            size: declared,
            limit,
        });
    }

    // The declared size is not trusted: never inflate past the limit.
    let mut body = Vec::new();
    entry
        .take(u64::try_from(limit).unwrap_or(u64::MAX).saturating_add(1))
        .read_to_end(&mut body)
        .map_err(|e| AnalysisError::Extraction(format!("unreadable DOCX document body: {e}")))?;
    if body.len() > limit {
        return Err(AnalysisError::InputTooLarge {
            size: body.len(),
            limit,
        });
    }

    let xml = String::from_utf8(body)
        .map_err(|e| AnalysisError::Extraction(format!("DOCX body is not UTF-8: {e}")))?;
    docx_xml_to_text(&xml)
}

/// Walks WordprocessingML: text runs are concatenated, every paragraph ends a
/// line, and in-run breaks/tabs are kept.
fn docx_xml_to_text(xml: &str) -> Result<String, AnalysisError> {
    let mut reader = Reader::from_str(xml);
    let mut text = String::new();
    let mut in_run = false;
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:r" => in_run = true,
                b"w:t" => in_text = true,
                _ => {}
            },
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:r" => in_run = false,
                b"w:t" => in_text = false,
                b"w:p" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Empty(e)) if in_run => match e.name().as_ref() {
                b"w:tab" => text.push('\t'),
                b"w:br" | b"w:cr" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text => {
                let chunk = t
                    .unescape()
                    .map_err(|e| AnalysisError::Extraction(format!("malformed DOCX text: {e}")))?;
                text.push_str(&chunk);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(AnalysisError::Extraction(format!(
                    "malformed DOCX XML at byte {}: {e}",
                    reader.buffer_position()
                )))
            }
            _ => {}
        }
    }

    Ok(text)
}
