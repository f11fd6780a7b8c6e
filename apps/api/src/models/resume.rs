use bytes::Bytes;
use serde::Serialize;

use crate::extraction::{ExtractedText, ExtractionMethod};

/// An uploaded résumé and the text derived from it. Lives for one request.
#[derive(Debug, Clone)]
pub struct ResumeDocument {
    pub file_name: String,
    pub bytes: Bytes,
    pub text: String,
    pub method: ExtractionMethod,
    pub page_count: usize,
}

/// What API callers see about the document; the raw bytes stay server-side.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentSummary {
    pub file_name: String,
    pub size_bytes: usize,
    pub method: ExtractionMethod,
    pub page_count: usize,
    pub characters: usize,
}

impl ResumeDocument {
    pub fn new(file_name: String, bytes: Bytes, extracted: ExtractedText) -> Self {
        Self {
            file_name,
            bytes,
            text: extracted.text,
            method: extracted.method,
            page_count: extracted.page_count,
        }
    }

    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }

    pub fn summary(&self) -> DocumentSummary {
        DocumentSummary {
            file_name: self.file_name.clone(),
            size_bytes: self.bytes.len(),
            method: self.method,
            page_count: self.page_count,
            characters: self.text.chars().count(),
        }
    }
}
