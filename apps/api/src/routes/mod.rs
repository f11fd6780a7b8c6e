pub mod health;

use axum::{extract::DefaultBodyLimit, routing::get, routing::post, Router};

use crate::analysis::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/analyze", post(handlers::handle_analyze))
        .route("/api/v1/analyze/text", post(handlers::handle_analyze_text))
        .route("/api/v1/extract", post(handlers::handle_extract))
        .layer(body_limit)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    use super::*;
    use crate::analysis::analyzer::test_support::ScriptedGenerator;
    use crate::config::Config;
    use crate::extraction::test_support::fake_extractor;

    #[tokio::test]
    async fn test_health_reports_ok() {
        let (extractor, _) = fake_extractor(None, None);
        let state = AppState {
            config: Config {
                gemini_api_key: "k".to_string(),
                gemini_model: "m".to_string(),
                port: 0,
                rust_log: "info".to_string(),
                upload_dir: std::env::temp_dir(),
                max_upload_bytes: 1024,
                ocr_dpi: 300,
                ocr_lang: "eng".to_string(),
            },
            llm: Arc::new(ScriptedGenerator::replying("")),
            extractor: Arc::new(extractor),
        };

        let response = build_router(state)
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["status"], "ok");
    }
}
