// All LLM prompt constants for the Analysis module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Résumé review prompt template.
/// Replace: {format_instruction}, {resume_text}
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"Review the provided resume and share your evaluation.

Mention:
1. An ATS compatibility score from 0 to 100.
2. Skills the candidate already has.
3. Skills the candidate is missing or should improve.
4. Strengths and weaknesses of the resume.
5. Relevant courses to take.
6. A short overall summary.

{format_instruction}

ATS_SCORE: <integer 0-100>
SKILLS_PRESENT:
- <skill>
SKILLS_MISSING:
- <skill>
STRENGTHS:
- <strength>
WEAKNESSES:
- <weakness>
RECOMMENDED_COURSES:
- <course>
SUMMARY:
<two to four sentences>

Resume:
{resume_text}"#;

/// Appended when the caller supplies a job description.
/// Replace: {job_description}
pub const JOB_COMPARISON_TEMPLATE: &str = r#"

Additionally, compare this resume to the following job description.

Job Description:
{job_description}

Base ATS_SCORE on how well the resume matches this job. List under SKILLS_MISSING the
job requirements the resume does not show, and highlight the strengths and weaknesses of
the applicant in relation to the job requirements."#;
