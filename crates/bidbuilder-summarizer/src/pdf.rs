//! Text extraction from uploaded PDF documents.

use crate::error::SummarizeError;

/// Extract the text of every page, in order.
///
/// Parsing is CPU-bound; async callers should run it on a blocking thread.
pub fn extract_text(bytes: &[u8]) -> Result<String, SummarizeError> {
    if !bytes.starts_with(b"%PDF") {
        return Err(SummarizeError::Document("not a PDF file".into()));
    }

    pdf_extract::extract_text_from_mem(bytes).map_err(|e| SummarizeError::Document(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_pdf_bytes_are_rejected() {
        let err = extract_text(b"hello, plain text").unwrap_err();
        assert!(matches!(err, SummarizeError::Document(_)));
    }
}
