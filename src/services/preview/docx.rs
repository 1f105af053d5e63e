//! DOCX paragraph extraction.
//!
//! A `.docx` file is a zip archive; the body lives in `word/document.xml`.
//! Only paragraphs that are direct children of `w:body` are returned, which
//! leaves out table cells, headers and text boxes.

use std::io::{Cursor, Read};

use quick_xml::Reader;
use quick_xml::events::Event;
use zip::ZipArchive;

use super::types::PreviewError;

const DOCUMENT_PART: &str = "word/document.xml";

/// Extract the body paragraphs of a DOCX document in document order.
///
/// Empty paragraphs are kept so that the rendered output keeps the
/// document's blank lines.
pub fn extract_paragraphs(content: &[u8]) -> Result<Vec<String>, PreviewError> {
    let mut archive =
        ZipArchive::new(Cursor::new(content)).map_err(|e| PreviewError::Docx(e.to_string()))?;

    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| PreviewError::Docx(format!("{}: {}", DOCUMENT_PART, e)))?
        .read_to_string(&mut xml)
        .map_err(|e| PreviewError::Docx(e.to_string()))?;

    parse_document(&xml)
}

fn parse_document(xml: &str) -> Result<Vec<String>, PreviewError> {
    let mut reader = Reader::from_str(xml);

    let mut stack: Vec<Vec<u8>> = Vec::new();
    // Number of open w:p elements; text counts only at depth 1.
    let mut paragraph_depth = 0usize;
    let mut current: Option<String> = None;
    let mut paragraphs = Vec::new();

    loop {
        let event = reader
            .read_event()
            .map_err(|e| PreviewError::Docx(format!("{} at {}", e, reader.buffer_position())))?;

        match event {
            Event::Start(e) => {
                let name = e.name().as_ref().to_vec();
                if name == b"w:p" {
                    if paragraph_depth == 0 && parent_is(&stack, b"w:body") {
                        current = Some(String::new());
                    }
                    paragraph_depth += 1;
                }
                stack.push(name);
            }
            Event::Empty(e) => {
                let name = e.name();
                match name.as_ref() {
                    b"w:p" if paragraph_depth == 0 && parent_is(&stack, b"w:body") => {
                        paragraphs.push(String::new());
                    }
                    b"w:tab" if paragraph_depth == 1 && parent_is(&stack, b"w:r") => {
                        push_text(&mut current, "\t");
                    }
                    b"w:br" | b"w:cr" if paragraph_depth == 1 && parent_is(&stack, b"w:r") => {
                        push_text(&mut current, "\n");
                    }
                    _ => {}
                }
            }
            Event::Text(t) => {
                if paragraph_depth == 1 && parent_is(&stack, b"w:t") {
                    let text = t
                        .unescape()
                        .map_err(|e| PreviewError::Docx(e.to_string()))?;
                    push_text(&mut current, &text);
                }
            }
            Event::End(_) => {
                if let Some(name) = stack.pop() {
                    if name == b"w:p" {
                        paragraph_depth = paragraph_depth.saturating_sub(1);
                        if paragraph_depth == 0 {
                            if let Some(text) = current.take() {
                                paragraphs.push(text);
                            }
                        }
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}

fn parent_is(stack: &[Vec<u8>], name: &[u8]) -> bool {
    stack.last().is_some_and(|parent| parent.as_slice() == name)
}

fn push_text(current: &mut Option<String>, text: &str) {
    if let Some(paragraph) = current.as_mut() {
        paragraph.push_str(text);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::{CompressionMethod, ZipWriter};

    /// Build a minimal DOCX archive around the given `w:body` content.
    pub(crate) fn build_docx(body: &str) -> Vec<u8> {
        let xml = format!(
            concat!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
                r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#,
                r#"<w:body>{}</w:body></w:document>"#
            ),
            body
        );

        let mut buf = Cursor::new(Vec::new());
        {
            let mut zip = ZipWriter::new(&mut buf);
            let options =
                SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
            zip.start_file(DOCUMENT_PART, options).unwrap();
            zip.write_all(xml.as_bytes()).unwrap();
            zip.finish().unwrap();
        }
        buf.into_inner()
    }

    #[test]
    fn test_paragraphs_in_order() {
        let docx = build_docx(concat!(
            "<w:p><w:r><w:t>First</w:t></w:r></w:p>",
            "<w:p><w:r><w:t xml:space=\"preserve\">Second </w:t></w:r><w:r><w:t>line</w:t></w:r></w:p>",
        ));
        let paragraphs = extract_paragraphs(&docx).unwrap();
        assert_eq!(paragraphs, vec!["First", "Second line"]);
    }

    #[test]
    fn test_empty_paragraphs_are_kept() {
        let docx = build_docx(concat!(
            "<w:p><w:r><w:t>Title</w:t></w:r></w:p>",
            "<w:p/>",
            "<w:p><w:pPr><w:jc w:val=\"left\"/></w:pPr></w:p>",
            "<w:p><w:r><w:t>Body</w:t></w:r></w:p>",
        ));
        let paragraphs = extract_paragraphs(&docx).unwrap();
        assert_eq!(paragraphs, vec!["Title", "", "", "Body"]);
    }

    #[test]
    fn test_tabs_breaks_and_entities() {
        let docx = build_docx(concat!(
            "<w:p><w:pPr><w:tabs><w:tab w:val=\"left\" w:pos=\"720\"/></w:tabs></w:pPr>",
            "<w:r><w:t>a</w:t><w:tab/><w:t>b</w:t><w:br/><w:t>Q&amp;A</w:t></w:r></w:p>",
        ));
        let paragraphs = extract_paragraphs(&docx).unwrap();
        assert_eq!(paragraphs, vec!["a\tb\nQ&A"]);
    }

    #[test]
    fn test_table_paragraphs_are_skipped() {
        let docx = build_docx(concat!(
            "<w:p><w:r><w:t>Before</w:t></w:r></w:p>",
            "<w:tbl><w:tr><w:tc><w:p><w:r><w:t>Cell</w:t></w:r></w:p></w:tc></w:tr></w:tbl>",
            "<w:p><w:r><w:t>After</w:t></w:r></w:p>",
        ));
        let paragraphs = extract_paragraphs(&docx).unwrap();
        assert_eq!(paragraphs, vec!["Before", "After"]);
    }

    #[test]
    fn test_not_a_zip() {
        let err = extract_paragraphs(b"plain text").unwrap_err();
        assert!(matches!(err, PreviewError::Docx(_)));
    }

    #[test]
    fn test_missing_document_part() {
        let mut buf = Cursor::new(Vec::new());
        {
            let mut zip = ZipWriter::new(&mut buf);
            zip.start_file("other.xml", SimpleFileOptions::default().compression_method(CompressionMethod::Stored))
                .unwrap();
            zip.write_all(b"<x/>").unwrap();
            zip.finish().unwrap();
        }
        let err = extract_paragraphs(&buf.into_inner()).unwrap_err();
        assert!(err.to_string().contains("word/document.xml"));
    }
}
