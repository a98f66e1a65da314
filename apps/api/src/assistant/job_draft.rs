//! Free-text job drafts as typed by a client, before they become a job post.
//!
//! Everything here is pure: placeholder detection, budget and deadline parsing,
//! and keyword inference of skills and seniority.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::ExperienceLevel;

/// Known skill vocabulary, in suggestion order.
pub const SKILL_SUGGESTIONS: [&str; 15] = [
    "Java",
    "Kotlin",
    "Android SDK",
    "Data Structures",
    "Algorithm Design",
    "Performance Optimization",
    "Graph Algorithms",
    "Dynamic Programming",
    "UI/UX",
    "REST APIs",
    "Testing",
    "Git",
    "Agile",
    "SQL",
    "Firebase",
];

const FALLBACK_SUGGESTIONS: usize = 5;
const MIN_TITLE_CHARS: usize = 3;
const MIN_DESCRIPTION_CHARS: usize = 10;
const MIN_SKILLS: usize = 2;

const PLACEHOLDER_PHRASES: [&str; 4] = ["i don't know", "i dont know", "n/a", "unknown"];
const PLACEHOLDER_WORDS: [&str; 2] = ["done", "idk"];

const DEADLINE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%B %d, %Y", "%b %d, %Y"];

const EXPERT_KEYWORDS: [&str; 5] = [
    "graph",
    "dynamic programming",
    "performance",
    "optimization",
    "architecture",
];
const MID_KEYWORDS: [&str; 9] = [
    "android sdk",
    "java",
    "kotlin",
    "testing",
    "ui",
    "ux",
    "rest",
    "api",
    "firebase",
];

/// Skills arrive either as a JSON list or as one comma-separated string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SkillsInput {
    List(Vec<String>),
    Text(String),
}

impl Default for SkillsInput {
    fn default() -> Self {
        SkillsInput::List(Vec::new())
    }
}

impl SkillsInput {
    /// Trimmed, non-empty entries with placeholders dropped.
    pub fn to_list(&self) -> Vec<String> {
        let raw: Vec<&str> = match self {
            SkillsInput::List(items) => items.iter().map(String::as_str).collect(),
            SkillsInput::Text(text) => text.split(',').collect(),
        };
        raw.into_iter()
            .map(str::trim)
            .filter(|s| !s.is_empty() && !is_placeholder(s))
            .map(str::to_string)
            .collect()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct JobDraft {
    pub title: String,
    pub description: String,
    pub skills: SkillsInput,
    pub budget: String,
    pub deadline: String,
    pub experience_level: Option<ExperienceLevel>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobField {
    Title,
    Description,
    Skills,
    Budget,
    Deadline,
}

impl fmt::Display for JobField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JobField::Title => "title",
            JobField::Description => "description",
            JobField::Skills => "skills",
            JobField::Budget => "budget",
            JobField::Deadline => "deadline",
        };
        f.write_str(name)
    }
}

/// A draft that passed validation, with its free text parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedDraft {
    pub title: String,
    pub description: String,
    pub skills: Vec<String>,
    pub budget_min: f64,
    pub budget_max: f64,
    pub deadline: NaiveDate,
    pub experience_level: ExperienceLevel,
}

/// Non-answers like "I don't know" or "n/a". "done" only counts on its own.
pub fn is_placeholder(text: &str) -> bool {
    let lower = text.trim().to_lowercase();
    PLACEHOLDER_WORDS.contains(&lower.as_str())
        || PLACEHOLDER_PHRASES.iter().any(|p| lower.contains(p))
}

fn long_enough(text: &str, min_chars: usize) -> bool {
    let text = text.trim();
    text.chars().count() >= min_chars && !is_placeholder(text)
}

/// Pulls the numbers out of text like "$500", "1,000 - 2,000" or "800 USD".
/// Returns (min, max); a single number is both.
pub fn parse_budget(text: &str) -> Option<(f64, f64)> {
    if is_placeholder(text) {
        return None;
    }

    let mut numbers = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        let joins_digits = matches!(c, ',' | '.')
            && !current.is_empty()
            && chars.peek().is_some_and(|n| n.is_ascii_digit());
        if c.is_ascii_digit() || (c == '.' && joins_digits && !current.contains('.')) {
            current.push(c);
        } else if c == ',' && joins_digits {
            // thousands separator
        } else if !current.is_empty() {
            numbers.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        numbers.push(current);
    }

    let values: Vec<f64> = numbers.iter().filter_map(|n| n.parse().ok()).collect();
    let first = *values.first()?;
    let second = values.get(1).copied().unwrap_or(first);
    Some((first.min(second), first.max(second)))
}

pub fn parse_deadline(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    DEADLINE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
}

/// Expert if any skill mentions advanced topics, mid for common app-development
/// skills, junior otherwise.
pub fn infer_level(skills: &[String]) -> ExperienceLevel {
    let mentions = |keywords: &[&str]| {
        skills.iter().any(|s| {
            let s = s.to_lowercase();
            keywords.iter().any(|k| s.contains(k))
        })
    };
    if mentions(&EXPERT_KEYWORDS) {
        ExperienceLevel::Expert
    } else if mentions(&MID_KEYWORDS) {
        ExperienceLevel::Mid
    } else {
        ExperienceLevel::Junior
    }
}

/// Vocabulary skills mentioned in the text; the first few suggestions when none are.
pub fn infer_skills(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    let found: Vec<String> = SKILL_SUGGESTIONS
        .iter()
        .filter(|s| lower.contains(&s.to_lowercase()))
        .map(|s| s.to_string())
        .collect();
    if found.is_empty() {
        SKILL_SUGGESTIONS[..FALLBACK_SUGGESTIONS]
            .iter()
            .map(|s| s.to_string())
            .collect()
    } else {
        found
    }
}

/// Checks every field and reports all invalid ones together.
pub fn validate(draft: &JobDraft) -> Result<ValidatedDraft, Vec<JobField>> {
    let mut invalid = Vec::new();

    if !long_enough(&draft.title, MIN_TITLE_CHARS) {
        invalid.push(JobField::Title);
    }
    if !long_enough(&draft.description, MIN_DESCRIPTION_CHARS) {
        invalid.push(JobField::Description);
    }
    let skills = draft.skills.to_list();
    if skills.len() < MIN_SKILLS {
        invalid.push(JobField::Skills);
    }
    let budget = parse_budget(&draft.budget);
    if budget.is_none() {
        invalid.push(JobField::Budget);
    }
    let deadline = parse_deadline(&draft.deadline);
    if deadline.is_none() {
        invalid.push(JobField::Deadline);
    }

    match (budget, deadline) {
        (Some((budget_min, budget_max)), Some(deadline)) if invalid.is_empty() => {
            let experience_level = draft
                .experience_level
                .unwrap_or_else(|| infer_level(&skills));
            Ok(ValidatedDraft {
                title: draft.title.trim().to_string(),
                description: draft.description.trim().to_string(),
                skills,
                budget_min,
                budget_max,
                deadline,
                experience_level,
            })
        }
        _ => Err(invalid),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> JobDraft {
        JobDraft {
            title: "Android budgeting app".to_string(),
            description: "Build an expense tracker with offline sync".to_string(),
            skills: SkillsInput::Text("Kotlin, Firebase".to_string()),
            budget: "$1,000 - $2,500".to_string(),
            deadline: "2025-07-20".to_string(),
            experience_level: None,
        }
    }

    #[test]
    fn test_placeholders() {
        assert!(is_placeholder("I don't know"));
        assert!(is_placeholder("  N/A "));
        assert!(is_placeholder("unknown yet"));
        assert!(is_placeholder("done"));
        assert!(!is_placeholder("Abandoned cart emails"));
        assert!(!is_placeholder("Kotlin"));
    }

    #[test]
    fn test_parse_budget_variants() {
        assert_eq!(parse_budget("$500"), Some((500.0, 500.0)));
        assert_eq!(parse_budget("1,000 - 2,000"), Some((1000.0, 2000.0)));
        assert_eq!(parse_budget("800"), Some((800.0, 800.0)));
        assert_eq!(parse_budget("between 3000 and 1500.50"), Some((1500.5, 3000.0)));
        assert_eq!(parse_budget("about 200, maybe 300"), Some((200.0, 300.0)));
        assert_eq!(parse_budget("whatever it costs"), None);
        assert_eq!(parse_budget("n/a"), None);
    }

    #[test]
    fn test_parse_deadline_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 7, 20);
        assert_eq!(parse_deadline("2025-07-20"), expected);
        assert_eq!(parse_deadline("20/07/2025"), expected);
        assert_eq!(parse_deadline("20-07-2025"), expected);
        assert_eq!(parse_deadline("July 20, 2025"), expected);
        assert_eq!(parse_deadline("next month"), None);
        assert_eq!(parse_deadline("31/02/2025"), None);
    }

    #[test]
    fn test_infer_level() {
        let skills = |xs: &[&str]| xs.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        assert_eq!(
            infer_level(&skills(&["Kotlin", "Graph Algorithms"])),
            ExperienceLevel::Expert
        );
        assert_eq!(infer_level(&skills(&["REST APIs", "Git"])), ExperienceLevel::Mid);
        assert_eq!(infer_level(&skills(&["Copywriting"])), ExperienceLevel::Junior);
    }

    #[test]
    fn test_infer_skills_from_text() {
        assert_eq!(
            infer_skills("Senior dev with java, SQL and git experience"),
            vec!["Java", "Git", "SQL"]
        );
        assert_eq!(
            infer_skills("I bake cakes"),
            vec!["Java", "Kotlin", "Android SDK", "Data Structures", "Algorithm Design"]
        );
    }

    #[test]
    fn test_skills_input_accepts_list_or_text() {
        let list: SkillsInput = serde_json::from_str(r#"["Rust", " ", "n/a", "SQL"]"#).unwrap();
        assert_eq!(list.to_list(), vec!["Rust", "SQL"]);
        let text: SkillsInput = serde_json::from_str(r#""Rust, ,SQL,done""#).unwrap();
        assert_eq!(text.to_list(), vec!["Rust", "SQL"]);
    }

    #[test]
    fn test_validate_accepts_complete_draft() {
        let v = validate(&draft()).unwrap();
        assert_eq!(v.skills, vec!["Kotlin", "Firebase"]);
        assert_eq!((v.budget_min, v.budget_max), (1000.0, 2500.0));
        assert_eq!(v.experience_level, ExperienceLevel::Mid);
    }

    #[test]
    fn test_validate_prefers_requested_level() {
        let d = JobDraft {
            experience_level: Some(ExperienceLevel::Senior),
            ..draft()
        };
        assert_eq!(validate(&d).unwrap().experience_level, ExperienceLevel::Senior);
    }

    #[test]
    fn test_validate_reports_every_invalid_field() {
        let d = JobDraft {
            title: "I don't know".to_string(),
            description: "short".to_string(),
            skills: SkillsInput::List(vec!["Kotlin".to_string()]),
            budget: "unknown".to_string(),
            deadline: "soon".to_string(),
            experience_level: None,
        };
        assert_eq!(
            validate(&d).unwrap_err(),
            vec![
                JobField::Title,
                JobField::Description,
                JobField::Skills,
                JobField::Budget,
                JobField::Deadline
            ]
        );
    }

    #[test]
    fn test_empty_body_fails_every_field() {
        let d: JobDraft = serde_json::from_str("{}").unwrap();
        assert_eq!(validate(&d).unwrap_err().len(), 5);
    }
}
