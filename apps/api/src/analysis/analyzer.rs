//! Résumé Analysis — builds the review prompt, calls the model, parses the answer.
//!
//! Flow: build_prompt → TextGenerator::generate → parse_analysis.

use tracing::{info, warn};

use crate::analysis::parser::parse_analysis;
use crate::analysis::prompts::{ANALYSIS_PROMPT_TEMPLATE, JOB_COMPARISON_TEMPLATE};
use crate::errors::AppError;
use crate::llm_client::prompts::{FORMAT_INSTRUCTION, REVIEWER_SYSTEM};
use crate::llm_client::TextGenerator;
use crate::models::analysis::AnalysisResult;

/// Builds the review prompt. The job comparison addendum is appended only when
/// `job_description` has non-whitespace content.
pub fn build_prompt(resume_text: &str, job_description: Option<&str>) -> String {
    let mut prompt = ANALYSIS_PROMPT_TEMPLATE
        .replace("{format_instruction}", FORMAT_INSTRUCTION)
        .replace("{resume_text}", resume_text.trim());

    if let Some(jd) = job_description.map(str::trim).filter(|jd| !jd.is_empty()) {
        prompt.push_str(&JOB_COMPARISON_TEMPLATE.replace("{job_description}", jd));
    }

    prompt
}

/// Runs one analysis round-trip against the model.
///
/// Model failures become `AppError::Llm`; parsing never fails.
pub async fn analyze_resume(
    generator: &dyn TextGenerator,
    resume_text: &str,
    job_description: Option<&str>,
) -> Result<AnalysisResult, AppError> {
    let prompt = build_prompt(resume_text, job_description);

    let raw = generator
        .generate(&prompt, REVIEWER_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(e.to_string()))?;

    let result = parse_analysis(&raw);
    if result.is_unstructured() {
        warn!("Model answer matched none of the expected sections; returning raw text only");
    } else {
        info!(
            "Analysis parsed: score={:?}, skills_present={}, skills_missing={}, courses={}",
            result.score,
            result.skills_present.len(),
            result.skills_missing.len(),
            result.recommended_courses.len()
        );
    }

    Ok(result)
}


#[cfg(test)]
mod tests {
    use super::test_support::ScriptedGenerator;
    use super::*;

    const RESUME: &str = "Jane Doe\nBackend Engineer at Acme 2019-2024\nRust, Go, PostgreSQL";

    #[test]
    fn test_prompt_embeds_resume_and_format_headers() {
        let prompt = build_prompt(RESUME, None);

        assert!(prompt.contains("Backend Engineer at Acme"));
        for header in [
            "ATS_SCORE:",
            "SKILLS_PRESENT:",
            "SKILLS_MISSING:",
            "STRENGTHS:",
            "WEAKNESSES:",
            "RECOMMENDED_COURSES:",
            "SUMMARY:",
        ] {
            assert!(prompt.contains(header), "prompt missing {header}");
        }
        assert!(!prompt.contains("{resume_text}"));
        assert!(!prompt.contains("{format_instruction}"));
    }

    #[test]
    fn test_job_description_addendum_only_when_present() {
        let without = build_prompt(RESUME, None);
        let blank = build_prompt(RESUME, Some("   \n"));
        let with = build_prompt(RESUME, Some("Staff Rust Engineer, Kubernetes required"));

        assert!(!without.contains("Job Description:"));
        assert_eq!(without, blank);
        assert!(with.contains("Job Description:\nStaff Rust Engineer, Kubernetes required"));
        assert!(with.starts_with(&without));
    }

    #[tokio::test]
    async fn test_analyze_resume_parses_model_answer() {
        let generator = ScriptedGenerator::replying(
            "ATS_SCORE: 90\nSKILLS_PRESENT:\n- Rust\nSKILLS_MISSING:\n- Kubernetes\nSUMMARY:\nStrong.",
        );

        let result = analyze_resume(&generator, RESUME, Some("Platform engineer"))
            .await
            .unwrap();

        assert_eq!(result.score, Some(90));
        assert_eq!(result.skills_present, vec!["Rust"]);
        assert_eq!(result.skills_missing, vec!["Kubernetes"]);
        assert!(result.strengths.is_empty());
        assert_eq!(result.summary, "Strong.");

        let prompt = generator.last_prompt().unwrap();
        assert!(prompt.contains("Platform engineer"));
    }

    #[tokio::test]
    async fn test_analyze_resume_surfaces_model_failure() {
        let generator = ScriptedGenerator::failing(403, "API key not valid");

        let err = analyze_resume(&generator, RESUME, None).await.unwrap_err();

        match err {
            AppError::Llm(msg) => assert!(msg.contains("API key not valid"), "got {msg}"),
            other => panic!("expected Llm error, got {other:?}"),
        }
    }
}
