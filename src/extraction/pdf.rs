use super::{ExtractionError, non_empty};
use lopdf::Document;
use std::fmt::Display;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

/// A paginated document whose pages can be read one at a time.
pub trait PageSource {
    /// Error raised when a single page cannot be read.
    type Error: Display;

    /// Page numbers in reading order.
    fn page_numbers(&self) -> Vec<u32>;

    /// Text of one page.
    fn page_text(&self, page_number: u32) -> Result<String, Self::Error>;
}

impl PageSource for Document {
    type Error = lopdf::Error;

    fn page_numbers(&self) -> Vec<u32> {
        self.get_pages().keys().copied().collect()
    }

    fn page_text(&self, page_number: u32) -> Result<String, Self::Error> {
        self.extract_text(&[page_number])
    }
}

/// Extract the text of every readable page of the PDF at `path`.
pub fn extract_pdf(path: &Path) -> Result<String, ExtractionError> {
    tracing::info!(path = %path.display(), "Attempting to extract text from PDF");
    let document = Document::load(path)
        .map_err(|error| ExtractionError::ParseFailed(format!("failed to load PDF: {error}")))?;
    non_empty(collect_page_text(&document, path))
}

/// Concatenate page texts, each followed by a newline.
///
/// Pages that fail or panic are logged and skipped; pages with no text contribute nothing.
pub fn collect_page_text<S: PageSource>(source: &S, path: &Path) -> String {
    let mut text = String::new();
    for page_number in source.page_numbers() {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| source.page_text(page_number)));
        match outcome {
            Ok(Ok(page_text)) if page_text.is_empty() => {}
            Ok(Ok(page_text)) => {
                text.push_str(&page_text);
                text.push('\n');
            }
            Ok(Err(error)) => tracing::warn!(
                page = page_number,
                path = %path.display(),
                %error,
                "Could not extract text from page"
            ),
            Err(_) => tracing::warn!(
                page = page_number,
                path = %path.display(),
                "PDF parser panicked while extracting page"
            ),
        }
    }
    text
}
