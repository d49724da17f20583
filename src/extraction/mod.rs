//! Plain-text extraction from PDF and DOCX files.
//!
//! [`extract`] reports why extraction failed; [`extract_text`] logs the reason and collapses
//! every failure to `None`, so callers only learn whether text came back. Both are blocking and
//! should run on a blocking thread when called from async code.
//!
//! Paths are read as given. Callers own any sandboxing.

mod docx;
mod pdf;

pub use docx::extract_docx;
pub use pdf::{PageSource, collect_page_text, extract_pdf};

use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors produced while extracting text from a file.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The path does not exist.
    #[error("File does not exist: {}", .0.display())]
    NotFound(PathBuf),
    /// The extension is neither `.pdf` nor `.docx`.
    #[error("Unsupported file type: {0}. Only .pdf and .docx are supported.")]
    Unsupported(String),
    /// The file exists but could not be read.
    #[error("Failed to read file: {0}")]
    Io(String),
    /// The file was read but its structure could not be parsed.
    #[error("Failed to parse document: {0}")]
    ParseFailed(String),
    /// The document parsed but contained no text.
    #[error("Document contains no extractable text")]
    Empty,
}

/// Document formats the extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Portable Document Format.
    Pdf,
    /// Office Open XML word-processing document.
    Docx,
}

impl SourceKind {
    /// Classify a path by its lower-cased extension.
    pub fn from_path(path: &Path) -> Result<Self, ExtractionError> {
        let extension = path
            .extension()
            .and_then(|extension| extension.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "pdf" => Ok(Self::Pdf),
            "docx" => Ok(Self::Docx),
            "" => Err(ExtractionError::Unsupported(String::new())),
            other => Err(ExtractionError::Unsupported(format!(".{other}"))),
        }
    }

    /// Extension including the leading dot.
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Pdf => ".pdf",
            Self::Docx => ".docx",
        }
    }
}

/// Extract plain text from the PDF or DOCX file at `path`.
///
/// The result is trimmed and never empty.
pub fn extract(path: impl AsRef<Path>) -> Result<String, ExtractionError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ExtractionError::NotFound(path.to_path_buf()));
    }
    let kind = SourceKind::from_path(path)?;

    // Parsers may panic on malformed input; treat that like any other parse failure.
    panic::catch_unwind(AssertUnwindSafe(|| match kind {
        SourceKind::Pdf => extract_pdf(path),
        SourceKind::Docx => extract_docx(path),
    }))
    .unwrap_or_else(|_| {
        Err(ExtractionError::ParseFailed(format!(
            "{} parser panicked",
            kind.extension()
        )))
    })
}

/// Extract plain text, returning `None` on any failure after logging it.
pub fn extract_text(path: impl AsRef<Path>) -> Option<String> {
    let path = path.as_ref();
    match extract(path) {
        Ok(text) => {
            tracing::info!(path = %path.display(), chars = text.len(), "Successfully extracted text");
            Some(text)
        }
        Err(error @ ExtractionError::Unsupported(_)) => {
            tracing::warn!(path = %path.display(), "{error}");
            None
        }
        Err(ExtractionError::Empty) => {
            tracing::info!(path = %path.display(), "No text found in document");
            None
        }
        Err(error) => {
            tracing::error!(path = %path.display(), "{error}");
            None
        }
    }
}

fn non_empty(text: String) -> Result<String, ExtractionError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        Err(ExtractionError::Empty)
    } else {
        Ok(trimmed.to_string())
    }
}
