//! PDF text extraction.

use std::panic::{self, AssertUnwindSafe};

use super::types::PreviewError;

/// Extract plain text from a PDF, one string per page in page order.
///
/// The extractor can panic on malformed documents; the panic is caught here
/// and reported as an ordinary decode failure.
pub fn extract_pages(content: &[u8]) -> Result<Vec<String>, PreviewError> {
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(content)
    }));

    match result {
        Ok(Ok(pages)) => Ok(pages),
        Ok(Err(e)) => Err(PreviewError::Pdf(e.to_string())),
        Err(payload) => Err(PreviewError::Pdf(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "PDF parser aborted".to_string()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A two-page PDF with one line of Helvetica text per page.
    pub(crate) fn two_page_pdf(first: &str, second: &str) -> Vec<u8> {
        let content = |text: &str| {
            let ops = format!("BT /F1 12 Tf 20 100 Td ({}) Tj ET", text);
            format!("<< /Length {} >>\nstream\n{}\nendstream", ops.len(), ops)
        };
        let page = |contents: u32| {
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 200 200] \
                 /Resources << /Font << /F1 7 0 R >> >> /Contents {} 0 R >>",
                contents
            )
        };
        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R 5 0 R] /Count 2 >>".to_string(),
            page(4),
            content(first),
            page(6),
            content(second),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica \
             /Encoding /WinAnsiEncoding >>"
                .to_string(),
        ];

        let mut pdf = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::new();
        for (idx, body) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            pdf.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", idx + 1, body).as_bytes());
        }

        let xref = pdf.len();
        let mut trailer = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
        for offset in offsets {
            trailer.push_str(&format!("{:010} 00000 n \n", offset));
        }
        trailer.push_str(&format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref
        ));
        pdf.extend_from_slice(trailer.as_bytes());
        pdf
    }

    #[test]
    fn test_pages_in_order() {
        let pages = extract_pages(&two_page_pdf("Hello", "World")).unwrap();
        assert_eq!(pages.len(), 2);
        assert!(pages[0].contains("Hello"));
        assert!(pages[1].contains("World"));
        assert!(!pages[0].contains("World"));
    }

    #[test]
    fn test_garbage_is_reported() {
        let err = extract_pages(b"this is not a pdf").unwrap_err();
        assert!(matches!(err, PreviewError::Pdf(_)));
    }

    #[test]
    fn test_truncated_header_is_reported() {
        let err = extract_pages(b"%PDF-1.4\n1 0 obj\n<<").unwrap_err();
        assert!(err.to_string().starts_with("malformed PDF"));
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn std::any::Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");

        let payload: Box<dyn std::any::Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(payload.as_ref()), "bang");

        let payload: Box<dyn std::any::Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(payload.as_ref()), "PDF parser aborted");
    }
}
