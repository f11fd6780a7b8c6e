//! Text Extractor — turns a résumé PDF on disk into plain text.
//!
//! Flow: direct per-page extraction → (only if that yields nothing) render pages
//!       to images and OCR them.
//!
//! Both paths are best-effort: failures are logged and the chain moves on. The
//! caller always gets a string back, possibly empty.

use std::path::Path;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

pub mod ocr;
pub mod pdf_text;

pub use ocr::TesseractOcr;
pub use pdf_text::PdfTextSource;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("PDF extraction panicked, likely on a malformed font or glyph")]
    Panicked,

    #[error("{0} is not installed")]
    ToolUnavailable(&'static str),

    #[error("{tool} failed: {message}")]
    Tool { tool: &'static str, message: String },
}

/// Which path produced the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    Direct,
    Ocr,
    /// Neither path produced any text.
    None,
}

#[derive(Debug, Clone)]
pub struct ExtractedText {
    pub text: String,
    pub method: ExtractionMethod,
    pub page_count: usize,
}

/// Structured (embedded) text, one string per page.
pub trait PageTextSource: Send + Sync {
    fn page_texts(&self, path: &Path) -> Result<Vec<String>, ExtractionError>;
}

/// Rasterize-and-recognize, one string per page.
pub trait OcrEngine: Send + Sync {
    fn recognize_pages(&self, path: &Path) -> Result<Vec<String>, ExtractionError>;
}

/// The fallback chain. Holds one direct source and one OCR engine.
pub struct TextExtractor {
    direct: Box<dyn PageTextSource>,
    ocr: Box<dyn OcrEngine>,
}

impl TextExtractor {
    pub fn new(direct: Box<dyn PageTextSource>, ocr: Box<dyn OcrEngine>) -> Self {
        Self { direct, ocr }
    }

    /// Direct extraction first; OCR only when it yields nothing but whitespace.
    pub fn extract(&self, path: &Path) -> ExtractedText {
        let mut page_count = 0;

        match self.direct.page_texts(path) {
            Ok(pages) => {
                page_count = pages.len();
                let text: String = pages.concat();
                if !text.trim().is_empty() {
                    info!(
                        "Direct extraction succeeded for {}: {} pages, {} chars",
                        path.display(),
                        page_count,
                        text.chars().count()
                    );
                    return ExtractedText {
                        text: text.trim().to_string(),
                        method: ExtractionMethod::Direct,
                        page_count,
                    };
                }
            }
            Err(e) => warn!("Direct text extraction failed for {}: {e}", path.display()),
        }

        info!("Falling back to OCR for image-based PDF {}", path.display());

        match self.ocr.recognize_pages(path) {
            Ok(pages) => {
                page_count = page_count.max(pages.len());
                let text = join_ocr_pages(&pages);
                if !text.is_empty() {
                    return ExtractedText {
                        text,
                        method: ExtractionMethod::Ocr,
                        page_count,
                    };
                }
                warn!("OCR produced no text for {}", path.display());
            }
            Err(e) => warn!("OCR failed for {}: {e}", path.display()),
        }

        ExtractedText {
            text: String::new(),
            method: ExtractionMethod::None,
            page_count,
        }
    }
}

/// Each OCR page is followed by a newline; the whole is trimmed.
fn join_ocr_pages(pages: &[String]) -> String {
    let mut text = String::new();
    for page in pages {
        text.push_str(page);
        text.push('\n');
    }
    text.trim().to_string()
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    /// Scripted direct source. `None` simulates a library failure.
    pub struct FakeDirect(pub Option<Vec<String>>);

    impl PageTextSource for FakeDirect {
        fn page_texts(&self, _path: &Path) -> Result<Vec<String>, ExtractionError> {
            self.0
                .clone()
                .ok_or_else(|| ExtractionError::Pdf("corrupt xref table".to_string()))
        }
    }

    /// Scripted OCR engine that counts how often it was asked.
    pub struct FakeOcr {
        pub pages: Option<Vec<String>>,
        pub calls: Arc<AtomicUsize>,
    }

    impl FakeOcr {
        pub fn new(pages: Option<Vec<String>>) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    pages,
                    calls: calls.clone(),
                },
                calls,
            )
        }
    }

    impl OcrEngine for FakeOcr {
        fn recognize_pages(&self, _path: &Path) -> Result<Vec<String>, ExtractionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.pages
                .clone()
                .ok_or(ExtractionError::ToolUnavailable("tesseract"))
        }
    }

    /// Minimal single-page PDF with one line of Helvetica text.
    pub fn one_page_pdf(text: &str) -> Vec<u8> {
        let stream = format!("BT /F1 24 Tf 72 720 Td ({text}) Tj ET");
        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Resources << /Font << /F1 5 0 R >> >> /Contents 4 0 R >>"
                .to_string(),
            format!("<< /Length {} >>\nstream\n{stream}\nendstream", stream.len()),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica \
             /Encoding /WinAnsiEncoding >>"
                .to_string(),
        ];

        let mut pdf = String::from("%PDF-1.4\n");
        let mut offsets = Vec::with_capacity(objects.len());
        for (i, body) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            pdf.push_str(&format!("{} 0 obj\n{body}\nendobj\n", i + 1));
        }

        let xref_offset = pdf.len();
        pdf.push_str(&format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1));
        for offset in offsets {
            pdf.push_str(&format!("{offset:010} 00000 n \n"));
        }
        pdf.push_str(&format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
            objects.len() + 1
        ));
        pdf.into_bytes()
    }

    pub fn fake_extractor(
        direct: Option<Vec<String>>,
        ocr: Option<Vec<String>>,
    ) -> (TextExtractor, Arc<AtomicUsize>) {
        let (ocr, calls) = FakeOcr::new(ocr);
        (
            TextExtractor::new(Box::new(FakeDirect(direct)), Box::new(ocr)),
            calls,
        )
    }
}
