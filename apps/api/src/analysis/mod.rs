// Résumé analysis: prompt construction, model call, response parsing, HTTP handlers.
// All model calls go through llm_client::TextGenerator.

pub mod analyzer;
pub mod handlers;
pub mod parser;
pub mod prompts;
