//! File preview dispatch.
//!
//! Picks a decoder from the file name's extension, runs it and converts any
//! decoder failure into a [`Preview::Failed`] value:
//!
//! ```text
//!   name ──► FileKind::from_name ──┬── .csv  ──► csv::read_csv       ──► Preview::Table
//!                                  ├── .pdf  ──► pdf::extract_pages  ──► Preview::Pages
//!                                  ├── .docx ──► docx::extract_paragraphs ► Preview::Paragraphs
//!                                  └── other ─────────────────────────► Preview::Unsupported
//! ```

pub mod csv;
pub mod docx;
pub mod pdf;
mod types;

pub use self::csv::{DecodedCsv, PREVIEW_ENCODINGS, TextEncoding, UPLOAD_ENCODINGS, read_csv};
pub use types::{FileKind, Preview, PreviewError, PreviewFailure, TablePreview};

/// Render `content` according to the extension of `name`.
///
/// Never fails: decode errors come back as [`Preview::Failed`] and unknown
/// extensions as [`Preview::Unsupported`].
pub fn preview(content: &[u8], name: &str) -> Preview {
    let Some(kind) = FileKind::from_name(name) else {
        tracing::debug!("No preview for {}", name);
        return Preview::Unsupported;
    };

    let result = match kind {
        FileKind::Csv => read_csv(content, PREVIEW_ENCODINGS).map(|decoded| Preview::Table(decoded.table)),
        FileKind::Pdf => pdf::extract_pages(content).map(Preview::Pages),
        FileKind::Docx => docx::extract_paragraphs(content).map(Preview::Paragraphs),
    };

    result.unwrap_or_else(|e| {
        tracing::error!("Failed to preview {}: {}", name, e);
        Preview::Failed(PreviewFailure::new(&e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_renders_table() {
        let preview = preview(b"a,b\n1,2\n", "reports/q1.csv");
        assert_eq!(
            preview,
            Preview::Table(TablePreview::new(
                vec!["a".to_string(), "b".to_string()],
                vec![vec!["1".to_string(), "2".to_string()]],
            ))
        );
    }

    #[test]
    fn test_docx_renders_paragraphs() {
        let docx = docx::tests::build_docx("<w:p><w:r><w:t>Hello</w:t></w:r></w:p>");
        let preview = preview(&docx, "notes.docx");
        assert_eq!(preview, Preview::Paragraphs(vec!["Hello".to_string()]));
        assert!(preview.is_rendered());
    }

    #[test]
    fn test_pdf_renders_pages() {
        let pdf = pdf::tests::two_page_pdf("Quarterly", "Summary");
        let preview = preview(&pdf, "reports/q1.pdf");
        assert!(preview.is_rendered());
        match preview {
            Preview::Pages(pages) => {
                assert_eq!(pages.len(), 2);
                assert!(pages[0].contains("Quarterly"));
                assert!(pages[1].contains("Summary"));
            }
            other => panic!("expected pages, got {other:?}"),
        }
    }

    #[test]
    fn test_unsupported_regardless_of_content() {
        assert_eq!(preview(b"a,b\n1,2\n", "data.txt"), Preview::Unsupported);
        assert_eq!(preview(b"a,b\n1,2\n", "DATA.CSV"), Preview::Unsupported);
        assert_eq!(preview(b"", "image.png"), Preview::Unsupported);
        assert!(!Preview::Unsupported.is_rendered());
    }

    #[test]
    fn test_malformed_content_is_reported() {
        for name in ["broken.pdf", "broken.docx"] {
            match preview(b"definitely not that format", name) {
                Preview::Failed(failure) => {
                    assert_eq!(failure.message, PreviewFailure::MESSAGE);
                    assert!(!failure.detail.is_empty());
                }
                other => panic!("expected failure for {name}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_empty_csv_is_a_failure_not_unsupported() {
        match preview(b"", "empty.csv") {
            Preview::Failed(failure) => assert_eq!(failure.detail, "file is empty"),
            other => panic!("unexpected preview: {other:?}"),
        }
    }

    #[test]
    fn test_text_blocks() {
        let pages = Preview::Pages(vec!["one".to_string(), "two".to_string()]);
        assert_eq!(pages.text_blocks().map(|b| b.len()), Some(2));
        assert!(Preview::Unsupported.text_blocks().is_none());
    }
}
