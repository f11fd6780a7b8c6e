// Shared prompt constants and prompt-building utilities.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// Reviewer persona used as the system instruction for résumé evaluation.
pub const REVIEWER_SYSTEM: &str = "You are an experienced HR professional with technical \
    expertise in roles such as Data Science, Data Analyst, DevOps, Machine Learning Engineer, \
    Prompt Engineer, AI Engineer, Full Stack Web Developer, Big Data Engineer, Marketing Analyst, \
    Human Resource Manager, and Software Developer. \
    You review resumes the way an Applicant Tracking System and a hiring manager would. \
    Be specific, honest and constructive.";

/// Instruction that pins the answer to the delimited section format.
pub const FORMAT_INSTRUCTION: &str = "\
    CRITICAL: Answer using ONLY the section headers shown below, each on its own line, \
    in the order shown. Put every list item on its own line starting with \"- \". \
    Do NOT use markdown tables, code fences or any other headers. \
    If a section has nothing to report, write the header and leave it empty.";
