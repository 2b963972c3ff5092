//! Plain-text extraction for uploaded lecture documents.
//!
//! The format is chosen from the file extension or an optional MIME hint: PDF text layers are read
//! with `pdf-extract`, Word documents by walking `word/document.xml`, and everything else is
//! decoded as UTF-8. Structured parse failures are reported, never papered over with raw bytes.

use quick_xml::Reader;
use quick_xml::events::Event;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Maximum decompressed size accepted for `word/document.xml`.
const MAX_DOCUMENT_XML_BYTES: u64 = 50 * 1024 * 1024;
const DOCX_BODY_ENTRY: &str = "word/document.xml";

/// A stored document handed over by the upload store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentLocation {
    /// Absolute or working-directory relative path to the file.
    pub path: PathBuf,
    /// Optional MIME type reported at upload time.
    pub mime_hint: Option<String>,
}

impl DocumentLocation {
    /// Locate a document by path alone.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            mime_hint: None,
        }
    }

    /// Attach a MIME hint.
    pub fn with_mime_hint(mut self, hint: impl Into<String>) -> Self {
        self.mime_hint = Some(hint.into());
        self
    }
}

/// Container formats understood by the extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// Portable Document Format.
    Pdf,
    /// Office Open XML word-processing document.
    Docx,
    /// Anything else, read as UTF-8 text.
    PlainText,
}

impl DocumentFormat {
    /// Pick the extraction strategy from the file extension and MIME hint.
    pub fn detect(path: &Path, mime_hint: Option<&str>) -> Self {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        let hint = mime_hint.map(str::to_ascii_lowercase).unwrap_or_default();

        if extension.as_deref() == Some("pdf") || hint.contains("pdf") {
            Self::Pdf
        } else if extension.as_deref() == Some("docx")
            || hint.contains("wordprocessingml.document")
        {
            Self::Docx
        } else {
            Self::PlainText
        }
    }
}

/// Errors raised while turning a stored document into text.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File we attempted to read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// A structured container was corrupt or unsupported.
    #[error("failed to parse {format:?} document: {reason}")]
    Parse {
        /// Format the file was parsed as.
        format: DocumentFormat,
        /// Parser diagnostic.
        reason: String,
    },
    /// The blocking extraction task did not complete.
    #[error("extraction task failed: {0}")]
    Task(String),
}

/// Read the document and return its plain text.
pub fn extract_text(document: &DocumentLocation) -> Result<String, ExtractionError> {
    let bytes = std::fs::read(&document.path).map_err(|source| ExtractionError::Io {
        path: document.path.clone(),
        source,
    })?;
    let format = DocumentFormat::detect(&document.path, document.mime_hint.as_deref());
    tracing::debug!(
        path = %document.path.display(),
        ?format,
        bytes = bytes.len(),
        "Extracting document text"
    );

    match format {
        DocumentFormat::Pdf => extract_pdf(&bytes),
        DocumentFormat::Docx => extract_docx(&bytes),
        DocumentFormat::PlainText => Ok(String::from_utf8_lossy(&bytes).into_owned()),
    }
}

/// Run [`extract_text`] on the blocking pool.
pub async fn extract_text_async(document: DocumentLocation) -> Result<String, ExtractionError> {
    tokio::task::spawn_blocking(move || extract_text(&document))
        .await
        .map_err(|error| ExtractionError::Task(error.to_string()))?
}

fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractionError> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|error| ExtractionError::Parse {
        format: DocumentFormat::Pdf,
        reason: error.to_string(),
    })
}

fn docx_error(reason: impl ToString) -> ExtractionError {
    ExtractionError::Parse {
        format: DocumentFormat::Docx,
        reason: reason.to_string(),
    }
}

fn extract_docx(bytes: &[u8]) -> Result<String, ExtractionError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).map_err(docx_error)?;
    let entry = archive.by_name(DOCX_BODY_ENTRY).map_err(docx_error)?;

    let mut xml = Vec::new();
    entry
        .take(MAX_DOCUMENT_XML_BYTES)
        .read_to_end(&mut xml)
        .map_err(docx_error)?;
    if xml.len() as u64 >= MAX_DOCUMENT_XML_BYTES {
        return Err(docx_error(format!("{DOCX_BODY_ENTRY} exceeds size limit")));
    }
    document_xml_text(&xml)
}

/// Collect `w:t` runs, mapping tabs, breaks, and paragraph ends to whitespace.
fn document_xml_text(xml: &[u8]) -> Result<String, ExtractionError> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut out = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf).map_err(docx_error)? {
            Event::Start(element) if element.local_name().as_ref() == b"t" => in_text = true,
            Event::End(element) => match element.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => out.push_str("\n\n"),
                _ => {}
            },
            Event::Empty(element) => match element.local_name().as_ref() {
                b"tab" => out.push('\t'),
                b"br" | b"cr" => out.push('\n'),
                _ => {}
            },
            Event::Text(text) if in_text => {
                out.push_str(&text.unescape().map_err(docx_error)?);
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(out.trim_end().to_string())
}
