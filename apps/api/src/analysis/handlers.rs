//! Axum route handlers for the Analysis API.

use std::io::Write;

use anyhow::Context;
use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::analysis::analyzer::analyze_resume;
use crate::errors::AppError;
use crate::models::analysis::AnalysisResult;
use crate::models::resume::{DocumentSummary, ResumeDocument};
use crate::state::AppState;

const PDF_SIGNATURE: &[u8] = b"%PDF";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AnalyzeTextRequest {
    pub resume_text: String,
    pub job_description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub analysis_id: Uuid,
    pub analyzed_at: DateTime<Utc>,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<DocumentSummary>,
    pub analysis: AnalysisResult,
}

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub document: DocumentSummary,
    pub text: String,
}

/// Fields pulled out of the multipart form.
struct UploadForm {
    file_name: String,
    bytes: Bytes,
    job_description: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/analyze
///
/// Multipart form: `resume` (PDF file), `job_description` (optional text).
/// Extracts the text (direct, then OCR) and returns the structured evaluation.
pub async fn handle_analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let analysis_id = Uuid::new_v4();
    let upload = read_upload(multipart).await?;
    let job_description = upload.job_description.clone();

    let document = extract_document(&state, upload).await?;
    if !document.has_text() {
        return Err(AppError::NoTextFound);
    }

    info!(
        "Analyzing {} ({analysis_id}): {:?}, {} chars, job description: {}",
        document.file_name,
        document.method,
        document.text.chars().count(),
        job_description.is_some()
    );

    let analysis = analyze_resume(
        state.llm.as_ref(),
        &document.text,
        job_description.as_deref(),
    )
    .await?;

    Ok(Json(AnalyzeResponse {
        analysis_id,
        analyzed_at: Utc::now(),
        model: state.llm.model().to_string(),
        document: Some(document.summary()),
        analysis,
    }))
}

/// POST /api/v1/analyze/text
///
/// Same analysis for résumé text the caller already has.
pub async fn handle_analyze_text(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeTextRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    if request.resume_text.trim().is_empty() {
        return Err(AppError::Validation(
            "resume_text cannot be empty".to_string(),
        ));
    }

    let analysis = analyze_resume(
        state.llm.as_ref(),
        &request.resume_text,
        request.job_description.as_deref(),
    )
    .await?;

    Ok(Json(AnalyzeResponse {
        analysis_id: Uuid::new_v4(),
        analyzed_at: Utc::now(),
        model: state.llm.model().to_string(),
        document: None,
        analysis,
    }))
}

/// POST /api/v1/extract
///
/// Runs only the extraction chain. An empty `text` is a valid answer here.
pub async fn handle_extract(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ExtractResponse>, AppError> {
    let upload = read_upload(multipart).await?;
    let document = extract_document(&state, upload).await?;

    Ok(Json(ExtractResponse {
        document: document.summary(),
        text: document.text,
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

async fn read_upload(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut resume: Option<(String, Bytes)> = None;
    let mut job_description: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("resume") => {
                let file_name = field.file_name().unwrap_or("resume.pdf").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Could not read resume: {e}")))?;
                resume = Some((file_name, data));
            }
            Some("job_description") => {
                let text = field.text().await.map_err(|e| {
                    AppError::Validation(format!("Could not read job_description: {e}"))
                })?;
                job_description = Some(text).filter(|t| !t.trim().is_empty());
            }
            _ => {}
        }
    }

    let (file_name, bytes) = resume
        .ok_or_else(|| AppError::Validation("Please upload a PDF resume.".to_string()))?;

    if bytes.is_empty() {
        return Err(AppError::Validation(
            "The uploaded file is empty.".to_string(),
        ));
    }
    if !bytes.starts_with(PDF_SIGNATURE) {
        return Err(AppError::Validation(
            "Only PDF resumes are supported.".to_string(),
        ));
    }

    Ok(UploadForm {
        file_name,
        bytes,
        job_description,
    })
}

/// Writes the upload to a temp file in `UPLOAD_DIR`, runs the extraction chain on a
/// blocking thread, and removes the file again when done.
async fn extract_document(
    state: &AppState,
    upload: UploadForm,
) -> Result<ResumeDocument, AppError> {
    let extractor = state.extractor.clone();
    let upload_dir = state.config.upload_dir.clone();
    let bytes = upload.bytes.clone();

    let extracted = tokio::task::spawn_blocking(move || -> anyhow::Result<_> {
        let mut file = tempfile::Builder::new()
            .prefix("resume-")
            .suffix(".pdf")
            .tempfile_in(&upload_dir)
            .with_context(|| format!("Failed to create upload file in {}", upload_dir.display()))?;
        file.write_all(&bytes)
            .and_then(|_| file.flush())
            .context("Failed to write uploaded resume to disk")?;

        Ok(extractor.extract(file.path()))
    })
    .await
    .context("Extraction task did not complete")??;

    Ok(ResumeDocument::new(upload.file_name, upload.bytes, extracted))
}
