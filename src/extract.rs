//! Text extraction for uploaded knowledge-base files.
//!
//! Two formats reach the core: plain UTF-8 text, and DOCX, whose paragraph
//! texts are extracted and joined with single spaces before being handed to
//! the store as one content string.

use std::io::Read;
use std::path::Path;
use thiserror::Error;

/// Maximum decompressed bytes read from a single ZIP entry (zip-bomb guard).
const MAX_XML_ENTRY_BYTES: u64 = 50 * 1024 * 1024;

/// Upload formats the extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    PlainText,
    Docx,
}

impl SourceFormat {
    /// Map a file extension to a format; `None` for unsupported types.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("txt") | Some("md") | Some("text") => Some(SourceFormat::PlainText),
            Some("docx") => Some(SourceFormat::Docx),
            _ => None,
        }
    }
}

/// Extraction failure. The upload flow maps these to the invalid-file
/// outcome; nothing here panics.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("file is not valid UTF-8 text")]
    InvalidUtf8,
    #[error("DOCX extraction failed: {0}")]
    Ooxml(String),
}

/// Extract plain text from uploaded bytes.
pub fn extract_text(bytes: &[u8], format: SourceFormat) -> Result<String, ExtractError> {
    match format {
        SourceFormat::PlainText => String::from_utf8(bytes.to_vec())
            .map_err(|_| ExtractError::InvalidUtf8),
        SourceFormat::Docx => extract_docx(bytes),
    }
}

/// Pull `word/document.xml` out of the DOCX archive and flatten its
/// paragraphs to a single space-joined string.
fn extract_docx(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes))
        .map_err(|e| ExtractError::Ooxml(e.to_string()))?;

    let entry = archive
        .by_name("word/document.xml")
        .map_err(|e| ExtractError::Ooxml(e.to_string()))?;

    let mut doc_xml = Vec::new();
    entry
        .take(MAX_XML_ENTRY_BYTES)
        .read_to_end(&mut doc_xml)
        .map_err(|e| ExtractError::Ooxml(e.to_string()))?;
    if doc_xml.len() as u64 >= MAX_XML_ENTRY_BYTES {
        return Err(ExtractError::Ooxml(
            "word/document.xml exceeds size limit".to_string(),
        ));
    }

    extract_paragraphs(&doc_xml)
}

/// Walk the document XML collecting `w:t` run text per `w:p` paragraph,
/// then join non-empty paragraphs with single spaces.
fn extract_paragraphs(xml: &[u8]) -> Result<String, ExtractError> {
    let mut reader = quick_xml::Reader::from_reader(xml);
    reader.config_mut().trim_text(false);

    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_text_run = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(quick_xml::events::Event::Start(e)) => {
                if e.local_name().as_ref() == b"t" {
                    in_text_run = true;
                }
            }
            Ok(quick_xml::events::Event::Text(t)) if in_text_run => {
                current.push_str(t.unescape().unwrap_or_default().as_ref());
            }
            Ok(quick_xml::events::Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_text_run = false,
                b"p" => {
                    let text = current.trim().to_string();
                    if !text.is_empty() {
                        paragraphs.push(text);
                    }
                    current.clear();
                }
                _ => {}
            },
            Ok(quick_xml::events::Event::Eof) => break,
            Err(e) => return Err(ExtractError::Ooxml(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    // A trailing paragraph without a closing tag should still count.
    let text = current.trim().to_string();
    if !text.is_empty() {
        paragraphs.push(text);
    }

    Ok(paragraphs.join(" "))
}
