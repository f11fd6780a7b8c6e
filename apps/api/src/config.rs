use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::llm_client::DEFAULT_MODEL;

const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Fails at startup if the model API key is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub port: u16,
    pub rust_log: String,
    /// Directory the uploaded PDF is written to while it is being analyzed.
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub ocr_dpi: u32,
    pub ocr_lang: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: require_env("GEMINI_API_KEY")
                .or_else(|_| require_env("GOOGLE_API_KEY"))
                .context("Set GEMINI_API_KEY (or GOOGLE_API_KEY) to a Gemini API key")?,
            gemini_model: std::env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            port: parse_env("PORT", 8080).context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            upload_dir: std::env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| std::env::temp_dir()),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)
                .context("MAX_UPLOAD_BYTES must be a byte count")?,
            ocr_dpi: parse_env("OCR_DPI", 300).context("OCR_DPI must be a positive integer")?,
            ocr_lang: std::env::var("OCR_LANG").unwrap_or_else(|_| "eng".to_string()),
        })
    }
}

/// A set-but-blank variable counts as unset.
fn require_env(key: &str) -> Result<String> {
    let value = std::env::var(key)
        .with_context(|| format!("Required environment variable '{key}' is not set"))?;
    if value.trim().is_empty() {
        anyhow::bail!("Required environment variable '{key}' is empty");
    }
    Ok(value)
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Could not parse '{raw}' for {key}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_falls_back_to_default_when_unset() {
        let value: u32 = parse_env("RESUME_ANALYZER_TEST_UNSET_VAR", 42).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        std::env::set_var("RESUME_ANALYZER_TEST_BAD_PORT", "eighty");
        let result: Result<u16> = parse_env("RESUME_ANALYZER_TEST_BAD_PORT", 8080);
        assert!(result.is_err());
        std::env::remove_var("RESUME_ANALYZER_TEST_BAD_PORT");
    }

    #[test]
    fn test_parse_env_trims_whitespace() {
        std::env::set_var("RESUME_ANALYZER_TEST_DPI", " 150 ");
        let value: u32 = parse_env("RESUME_ANALYZER_TEST_DPI", 300).unwrap();
        assert_eq!(value, 150);
        std::env::remove_var("RESUME_ANALYZER_TEST_DPI");
    }

    #[test]
    fn test_require_env_rejects_blank_value() {
        std::env::set_var("RESUME_ANALYZER_TEST_BLANK_KEY", "  ");
        assert!(require_env("RESUME_ANALYZER_TEST_BLANK_KEY").is_err());

        std::env::set_var("RESUME_ANALYZER_TEST_FALLBACK_KEY", "key-123");
        let key = require_env("RESUME_ANALYZER_TEST_BLANK_KEY")
            .or_else(|_| require_env("RESUME_ANALYZER_TEST_FALLBACK_KEY"))
            .unwrap();
        assert_eq!(key, "key-123");

        std::env::remove_var("RESUME_ANALYZER_TEST_BLANK_KEY");
        std::env::remove_var("RESUME_ANALYZER_TEST_FALLBACK_KEY");
    }
}
