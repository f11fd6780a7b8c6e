//! Response Parser — turns the model's free-form answer into an `AnalysisResult`.
//!
//! Two shapes are understood:
//! 1. A JSON object (optionally inside code fences), keys matched like headers.
//! 2. The delimited layout requested by the prompt: `HEADER:` lines followed by
//!    `- item` lines. Markdown decoration (`##`, `**`, numbering) is tolerated.
//!
//! Under a list header only bullet or numbered lines become items; prose is skipped.
//! Nothing here returns an error. Whatever cannot be recognized stays at its default.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::llm_client::strip_json_fences;
use crate::models::analysis::AnalysisResult;

static SYMBOL_BULLET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-*•+]\s+").unwrap());

static NUMBERING_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\(?\d{1,2}[.)]\s+").unwrap());

static PARENTHETICAL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\([^)]*\)").unwrap());

static INTEGER_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());

/// Longest label still considered a header. Longer text before a colon is content.
const MAX_HEADER_LEN: usize = 48;

/// Score labels that may carry trailing qualifiers, e.g. `ATS score out of 100`.
const SCORE_PREFIXES: &[&str] = &[
    "ats score",
    "ats compatibility score",
    "overall score",
    "resume score",
];

/// Lower-case words allowed inside a Title Case heading.
const MINOR_WORDS: &[&str] = &["a", "an", "and", "for", "in", "of", "on", "or", "the", "to"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Score,
    SkillsPresent,
    SkillsMissing,
    Strengths,
    Weaknesses,
    Courses,
    Summary,
}

/// Parses a model answer. Never fails; see module docs.
pub fn parse_analysis(raw: &str) -> AnalysisResult {
    let mut result =
        parse_json_analysis(raw).unwrap_or_else(|| parse_delimited_analysis(raw));
    result.raw_response = raw.trim().to_string();
    result
}

// ────────────────────────────────────────────────────────────────────────────
// Header recognition
// ────────────────────────────────────────────────────────────────────────────

fn normalize_label(label: &str) -> String {
    let without_parens = PARENTHETICAL_REGEX.replace_all(label, " ");
    let cleaned: String = without_parens
        .chars()
        .filter(|c| !matches!(c, '*' | '#' | '`'))
        .map(|c| if matches!(c, '_' | '-') { ' ' } else { c })
        .collect();
    cleaned
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn classify_label(label: &str) -> Option<Section> {
    let normalized = normalize_label(label);
    let section = match normalized.as_str() {
        "ats score" | "score" | "ats compatibility score" | "overall score" | "resume score" => {
            Section::Score
        }
        "skills present" | "present skills" | "current skills" | "existing skills"
        | "skills the candidate already has" | "skills" | "skills found" => {
            Section::SkillsPresent
        }
        "skills missing" | "missing skills" | "skills to improve" | "skill gaps"
        | "skills gap" | "skills to develop" => Section::SkillsMissing,
        "strengths" | "strength" | "key strengths" => Section::Strengths,
        "weaknesses" | "weakness" | "areas for improvement" | "areas to improve" => {
            Section::Weaknesses
        }
        "recommended courses" | "courses" | "relevant courses" | "course recommendations"
        | "recommendations" => Section::Courses,
        "summary" | "overall summary" | "overall assessment" | "verdict" => Section::Summary,
        other
            if SCORE_PREFIXES
                .iter()
                .any(|p| other.strip_prefix(*p).is_some_and(|r| r.starts_with(' '))) =>
        {
            Section::Score
        }
        _ => return None,
    };
    Some(section)
}

/// `ATS_SCORE` or `SUMMARY`: the exact spelling the prompt asks for.
fn is_canonical(label: &str) -> bool {
    let label = label.trim().trim_matches(|c| c == '*' || c == '_');
    label.contains('_')
        || (label.chars().any(char::is_alphabetic) && !label.chars().any(char::is_lowercase))
}

/// `Formatting Notes` or `EDUCATION`, as opposed to `The candidate shows`.
fn looks_like_title(label: &str) -> bool {
    let words: Vec<&str> = label.split_whitespace().collect();
    !words.is_empty()
        && words.len() <= 5
        && words.iter().enumerate().all(|(i, word)| {
            (i > 0 && MINOR_WORDS.contains(&word.to_lowercase().as_str()))
                || word.chars().next().is_some_and(char::is_uppercase)
        })
}

enum LineKind<'a> {
    /// A recognized header plus whatever followed its colon.
    Header(Section, &'a str),
    /// Shaped like a header (markdown heading, bold label, or a Title Case `Label:`)
    /// but not one we know. Closes the open section.
    UnknownHeader,
    Content,
}

/// Inside the summary, an undecorated `Label: text` line is prose unless the label is
/// spelled the way the prompt asks for. Inside any section, `2. Label: text` is an item.
fn classify_line(line: &str, current: Option<Section>) -> LineKind<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() || SYMBOL_BULLET_REGEX.is_match(trimmed) {
        return LineKind::Content;
    }

    let heading = trimmed.starts_with('#');
    let without_hashes = trimmed.trim_start_matches('#').trim_start();
    let (numbered, body) = match NUMBERING_REGEX.find(without_hashes) {
        Some(m) => (true, &without_hashes[m.end()..]),
        None => (false, without_hashes),
    };
    let bold = body.starts_with("**") || body.starts_with("__");

    let (label, rest, has_colon) = match body.split_once(':') {
        Some((label, rest)) => (label, strip_emphasis(rest), true),
        None => (body, "", false),
    };
    if label.len() > MAX_HEADER_LEN && !heading {
        return LineKind::Content;
    }

    let plain_numbered_item = numbered && !heading && !bold && !rest.is_empty();
    match classify_label(label) {
        Some(_) if plain_numbered_item && current.is_some() => LineKind::Content,
        Some(section)
            if heading
                || bold
                || rest.is_empty()
                || is_canonical(label)
                || current != Some(Section::Summary) =>
        {
            LineKind::Header(section, rest)
        }
        Some(_) => LineKind::Content,
        None if heading => LineKind::UnknownHeader,
        None if bold && !numbered && has_colon && rest.is_empty() => LineKind::UnknownHeader,
        None if !bold && has_colon && rest.is_empty() && looks_like_title(label) => {
            LineKind::UnknownHeader
        }
        None => LineKind::Content,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Delimited layout
// ────────────────────────────────────────────────────────────────────────────

fn parse_delimited_analysis(raw: &str) -> AnalysisResult {
    let mut result = AnalysisResult::default();
    let mut summary_lines: Vec<String> = Vec::new();
    let mut current: Option<Section> = None;

    for line in raw.lines() {
        match classify_line(line, current) {
            LineKind::Header(section, inline) => {
                current = Some(section);
                apply_inline(&mut result, &mut summary_lines, section, inline);
            }
            LineKind::UnknownHeader => current = None,
            LineKind::Content => {
                let Some(section) = current else { continue };
                match section {
                    Section::Score => {
                        if result.score.is_none() {
                            result.score = parse_score(line);
                        }
                    }
                    Section::Summary => {
                        let text = strip_emphasis(line);
                        if !text.is_empty() {
                            summary_lines.push(text.to_string());
                        }
                    }
                    list => {
                        if let Some(item) = bulleted_item(line) {
                            list_mut(&mut result, list).push(item);
                        }
                    }
                }
            }
        }
    }

    result.summary = summary_lines.join(" ");
    result
}

fn apply_inline(
    result: &mut AnalysisResult,
    summary_lines: &mut Vec<String>,
    section: Section,
    inline: &str,
) {
    if inline.is_empty() {
        return;
    }
    match section {
        Section::Score => result.score = parse_score(inline),
        Section::Summary => summary_lines.push(inline.to_string()),
        list => list_mut(result, list).extend(split_inline_list(inline)),
    }
}

fn list_mut(result: &mut AnalysisResult, section: Section) -> &mut Vec<String> {
    match section {
        Section::SkillsPresent => &mut result.skills_present,
        Section::SkillsMissing => &mut result.skills_missing,
        Section::Strengths => &mut result.strengths,
        Section::Weaknesses => &mut result.weaknesses,
        Section::Courses => &mut result.recommended_courses,
        Section::Score | Section::Summary => {
            unreachable!("score and summary are not list sections")
        }
    }
}

fn list_item(line: &str) -> Option<String> {
    let trimmed = line.trim();
    let without_bullet = match SYMBOL_BULLET_REGEX
        .find(trimmed)
        .or_else(|| NUMBERING_REGEX.find(trimmed))
    {
        Some(m) => &trimmed[m.end()..],
        None => trimmed,
    };
    let item = strip_emphasis(without_bullet);
    if item.is_empty() || item.eq_ignore_ascii_case("none") || item == "N/A" {
        None
    } else {
        Some(item.to_string())
    }
}

/// A list line proper: `- item`, `* item` or `2. item`. Prose yields `None`.
fn bulleted_item(line: &str) -> Option<String> {
    let trimmed = line.trim();
    if SYMBOL_BULLET_REGEX.is_match(trimmed) || NUMBERING_REGEX.is_match(trimmed) {
        list_item(trimmed)
    } else {
        None
    }
}

/// `Python, SQL; Docker` → three items.
fn split_inline_list(inline: &str) -> Vec<String> {
    inline
        .split([',', ';'])
        .filter_map(list_item)
        .collect()
}

fn strip_emphasis(text: &str) -> &str {
    text.trim().trim_matches(['*', '_']).trim()
}

/// First integer in `text`, kept only if it is a valid 0 – 100 score.
fn parse_score(text: &str) -> Option<u8> {
    INTEGER_REGEX
        .find(text)
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .filter(|n| *n <= 100)
        .map(|n| n as u8)
}

// ────────────────────────────────────────────────────────────────────────────
// JSON layout
// ────────────────────────────────────────────────────────────────────────────

fn parse_json_analysis(raw: &str) -> Option<AnalysisResult> {
    let value: Value = serde_json::from_str(strip_json_fences(raw)).ok()?;
    let object = value.as_object()?;

    let mut result = AnalysisResult::default();
    for (key, value) in object {
        let Some(section) = classify_label(key) else {
            continue;
        };
        match section {
            Section::Score => result.score = json_score(value),
            Section::Summary => {
                result.summary = match value {
                    Value::String(s) => s.trim().to_string(),
                    Value::Array(items) => json_list(items).join(" "),
                    _ => String::new(),
                }
            }
            list => {
                let items = match value {
                    Value::Array(items) => json_list(items),
                    Value::String(s) => split_inline_list(s),
                    _ => Vec::new(),
                };
                list_mut(&mut result, list).extend(items);
            }
        }
    }
    Some(result)
}

fn json_score(value: &Value) -> Option<u8> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .filter(|f| (0.0..=100.0).contains(f))
            .map(|f| f.round() as u8),
        Value::String(s) => parse_score(s),
        _ => None,
    }
}

/// Strings are kept; objects contribute their first string field (e.g. `{"name": ...}`).
fn json_list(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => list_item(s),
            Value::Object(fields) => fields
                .values()
                .find_map(|v| v.as_str())
                .and_then(list_item),
            _ => None,
        })
        .collect()
}
