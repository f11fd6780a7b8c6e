use std::sync::Arc;

use crate::config::Config;
use crate::extraction::TextExtractor;
use crate::llm_client::TextGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Model seam. Production: `LlmClient` (Gemini).
    pub llm: Arc<dyn TextGenerator>,
    /// Direct-then-OCR extraction chain. Runs on blocking threads.
    pub extractor: Arc<TextExtractor>,
}
