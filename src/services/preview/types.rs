//! Preview types shared by the dispatcher and the decoders.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::csv::TextEncoding;

/// File kinds the dispatcher knows how to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Csv,
    Pdf,
    Docx,
}

impl FileKind {
    /// All supported kinds, in the order the upload picker lists them.
    pub fn all() -> [FileKind; 3] {
        [FileKind::Csv, FileKind::Pdf, FileKind::Docx]
    }

    /// The suffix, including the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            FileKind::Csv => ".csv",
            FileKind::Pdf => ".pdf",
            FileKind::Docx => ".docx",
        }
    }

    /// Detect the kind from a file name or object key.
    ///
    /// The match is a case-sensitive suffix check; file content is never
    /// inspected, so `report.CSV` is not a CSV file here.
    pub fn from_name(name: &str) -> Option<FileKind> {
        Self::all()
            .into_iter()
            .find(|kind| name.ends_with(kind.extension()))
    }
}

impl std::fmt::Display for FileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// A decoded CSV file: header row plus data rows, all as text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TablePreview {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TablePreview {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }
}

/// A decode failure turned into something the shell can show.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewFailure {
    /// Fixed, user-facing summary.
    pub message: String,
    /// The underlying decoder error.
    pub detail: String,
}

impl PreviewFailure {
    pub const MESSAGE: &'static str = "Unable to display file content.";

    pub fn new(error: &PreviewError) -> Self {
        Self {
            message: Self::MESSAGE.to_string(),
            detail: error.to_string(),
        }
    }
}

/// Outcome of previewing one file.
#[derive(Debug, Clone, PartialEq)]
pub enum Preview {
    /// CSV content as a grid.
    Table(TablePreview),
    /// PDF text, one entry per page in page order.
    Pages(Vec<String>),
    /// DOCX body paragraphs in document order.
    Paragraphs(Vec<String>),
    /// The extension is not one we preview. Not an error.
    Unsupported,
    /// A supported kind whose content could not be decoded.
    Failed(PreviewFailure),
}

impl Preview {
    pub const UNSUPPORTED_MESSAGE: &'static str = "Unsupported file type.";

    pub fn is_rendered(&self) -> bool {
        matches!(
            self,
            Preview::Table(_) | Preview::Pages(_) | Preview::Paragraphs(_)
        )
    }

    /// Text blocks for the PDF and DOCX outcomes.
    pub fn text_blocks(&self) -> Option<&[String]> {
        match self {
            Preview::Pages(blocks) | Preview::Paragraphs(blocks) => Some(blocks),
            _ => None,
        }
    }
}

/// Errors raised by the content decoders.
#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("file is empty")]
    EmptyFile,

    #[error("could not decode file as {}: {last_error}", join_labels(.tried))]
    Decode {
        tried: Vec<TextEncoding>,
        last_error: String,
    },

    #[error("malformed PDF: {0}")]
    Pdf(String),

    #[error("malformed DOCX: {0}")]
    Docx(String),
}

fn join_labels(encodings: &[TextEncoding]) -> String {
    encodings
        .iter()
        .map(|e| e.label())
        .collect::<Vec<_>>()
        .join(", ")
}
