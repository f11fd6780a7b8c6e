use std::path::Path;

use tracing::debug;

use super::{ExtractionError, PageTextSource};

/// Embedded-text extraction via `pdf-extract`.
pub struct PdfTextSource;

impl PageTextSource for PdfTextSource {
    fn page_texts(&self, path: &Path) -> Result<Vec<String>, ExtractionError> {
        let bytes = std::fs::read(path)?;
        debug!("PDF file size: {} bytes", bytes.len());
        extract_pages_from_mem(&bytes)
    }
}

/// `pdf-extract` (and its font parsers) can panic on malformed input, so the
/// call runs under `catch_unwind`.
fn extract_pages_from_mem(bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
    match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(bytes)
    })) {
        Ok(Ok(pages)) => Ok(pages),
        Ok(Err(e)) => Err(ExtractionError::Pdf(e.to_string())),
        Err(_panic) => Err(ExtractionError::Panicked),
    }
}
