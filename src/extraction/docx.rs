use super::{ExtractionError, non_empty};
use docx_rs::{DocumentChild, Paragraph, ParagraphChild, RunChild, read_docx};
use std::path::Path;

/// Extract the non-empty top-level paragraphs of the DOCX at `path`, one per line.
///
/// Hyperlink text is kept. Tables, headers and footers are not read.
pub fn extract_docx(path: &Path) -> Result<String, ExtractionError> {
    tracing::info!(path = %path.display(), "Attempting to extract text from DOCX");
    let bytes = std::fs::read(path)
        .map_err(|error| ExtractionError::Io(format!("failed to read DOCX: {error}")))?;
    let docx = read_docx(&bytes)
        .map_err(|error| ExtractionError::ParseFailed(format!("failed to parse DOCX: {error}")))?;

    let paragraphs: Vec<String> = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(paragraph) => Some(paragraph_text(paragraph)),
            _ => None,
        })
        .filter(|text| !text.is_empty())
        .collect();

    non_empty(paragraphs.join("\n"))
}

/// Text of one paragraph: its runs concatenated, including runs inside hyperlinks.
fn paragraph_text(paragraph: &Paragraph) -> String {
    let mut text = String::new();
    push_runs(&paragraph.children, &mut text);
    text
}

/// Tabs become `\t`; line breaks and carriage returns become `\n`.
fn push_runs(children: &[ParagraphChild], text: &mut String) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => {
                for run_child in &run.children {
                    match run_child {
                        RunChild::Text(t) => text.push_str(&t.text),
                        RunChild::Tab(_) => text.push('\t'),
                        RunChild::Break(_) | RunChild::CarriageReturn(_) => text.push('\n'),
                        _ => {}
                    }
                }
            }
            ParagraphChild::Hyperlink(link) => push_runs(&link.children, text),
            _ => {}
        }
    }
}
