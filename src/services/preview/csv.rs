//! CSV decoding with an ordered encoding fallback.

use serde::{Deserialize, Serialize};

use super::types::{PreviewError, TablePreview};

/// Text encodings tried when decoding CSV bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextEncoding {
    Utf8,
    Latin1,
    Iso8859_1,
}

/// Encodings used when previewing an object.
pub const PREVIEW_ENCODINGS: &[TextEncoding] = &[TextEncoding::Utf8];

/// Encodings used when reading a CSV for a warehouse row upload, in order.
pub const UPLOAD_ENCODINGS: &[TextEncoding] = &[
    TextEncoding::Utf8,
    TextEncoding::Latin1,
    TextEncoding::Iso8859_1,
];

impl TextEncoding {
    pub fn label(&self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Latin1 => "latin1",
            TextEncoding::Iso8859_1 => "iso-8859-1",
        }
    }

    fn decode(&self, bytes: &[u8]) -> Result<String, String> {
        match self {
            TextEncoding::Utf8 => std::str::from_utf8(bytes)
                .map(|s| s.strip_prefix('\u{feff}').unwrap_or(s).to_string())
                .map_err(|e| format!("'utf-8' codec can't decode: {}", e)),
            // Every byte is a valid code point in both single-byte encodings.
            TextEncoding::Latin1 | TextEncoding::Iso8859_1 => {
                Ok(bytes.iter().map(|&b| char::from(b)).collect())
            }
        }
    }
}

impl std::fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// A CSV table and the encoding that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedCsv {
    pub table: TablePreview,
    pub encoding: TextEncoding,
}

/// Decode and parse CSV bytes, trying `encodings` in order.
///
/// Returns the first encoding that both decodes and parses. Content with no
/// non-whitespace bytes after an optional UTF-8 byte order mark is reported
/// as [`PreviewError::EmptyFile`] before any decode is attempted.
pub fn read_csv(content: &[u8], encodings: &[TextEncoding]) -> Result<DecodedCsv, PreviewError> {
    let body = content.strip_prefix(UTF8_BOM).unwrap_or(content);
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(PreviewError::EmptyFile);
    }

    let mut last_error = String::from("no encodings to try");
    for encoding in encodings {
        let parsed = encoding.decode(content).and_then(|text| parse_table(&text));
        match parsed {
            Ok(table) => {
                tracing::debug!(
                    "Decoded CSV as {} ({} rows)",
                    encoding.label(),
                    table.row_count()
                );
                return Ok(DecodedCsv {
                    table,
                    encoding: *encoding,
                });
            }
            Err(e) => {
                tracing::debug!("CSV decode as {} failed: {}", encoding.label(), e);
                last_error = e;
            }
        }
    }

    Err(PreviewError::Decode {
        tried: encodings.to_vec(),
        last_error,
    })
}

/// Parse decoded text into a header row plus data rows.
///
/// Short rows are padded with empty cells; long rows are an error.
fn parse_table(text: &str) -> Result<TablePreview, String> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| e.to_string())?
        .iter()
        .map(str::to_string)
        .collect();

    if headers.is_empty() {
        return Err("no columns to parse from file".to_string());
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| e.to_string())?;
        if record.len() > headers.len() {
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            return Err(format!(
                "expected {} fields in line {}, saw {}",
                headers.len(),
                line,
                record.len()
            ));
        }

        let mut row: Vec<String> = record.iter().map(str::to_string).collect();
        row.resize(headers.len(), String::new());
        rows.push(row);
    }

    Ok(TablePreview::new(headers, rows))
}
