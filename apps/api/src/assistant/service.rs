//! LLM-backed assistant operations.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::assistant::job_draft::{self, JobDraft, ValidatedDraft};
use crate::assistant::prompts::{ADVISE_PROMPT_TEMPLATE, POLISH_JOB_PROMPT_TEMPLATE};
use crate::errors::AppError;
use crate::llm_client::prompts::{JSON_ONLY_SYSTEM, PLATFORM_INSTRUCTION};
use crate::llm_client::LlmClient;
use crate::models::ExperienceLevel;

#[derive(Debug, Deserialize)]
struct PolishedSummary {
    summary: String,
    /// Models sometimes answer "1,500" instead of 1500.
    #[serde(default)]
    suggested_budget: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct PolishedJob {
    pub summary: String,
    pub suggested_budget: Option<f64>,
    pub experience_level: ExperienceLevel,
    pub skills: Vec<String>,
    pub budget_min: f64,
    pub budget_max: f64,
    pub deadline: NaiveDate,
}

fn budget_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => job_draft::parse_budget(s).map(|(min, max)| (min + max) / 2.0),
        _ => None,
    }
}

pub fn polish_prompt(draft: &ValidatedDraft, raw_budget: &str) -> String {
    POLISH_JOB_PROMPT_TEMPLATE
        .replace("{title}", &draft.title)
        .replace("{description}", &draft.description)
        .replace("{skills}", &draft.skills.join(", "))
        .replace("{budget}", raw_budget.trim())
        .replace("{deadline}", &draft.deadline.format("%Y-%m-%d").to_string())
        .replace("{level}", draft.experience_level.as_str())
}

/// Validates the draft, then asks the LLM for a summary and budget suggestion.
pub async fn polish_job(llm: &LlmClient, draft: &JobDraft) -> Result<PolishedJob, AppError> {
    let validated = job_draft::validate(draft).map_err(|fields| {
        let names: Vec<String> = fields.iter().map(|f| f.to_string()).collect();
        AppError::Validation(format!("Invalid job fields: {}", names.join(", ")))
    })?;

    let system = format!("{PLATFORM_INSTRUCTION}\n\n{JSON_ONLY_SYSTEM}");
    let polished: PolishedSummary = llm
        .generate_json(&polish_prompt(&validated, &draft.budget), &system)
        .await
        .map_err(|e| AppError::Llm(format!("Job polishing failed: {e}")))?;

    info!(
        "Polished job '{}' ({} skills, level {})",
        validated.title,
        validated.skills.len(),
        validated.experience_level.as_str()
    );

    Ok(PolishedJob {
        summary: polished.summary,
        suggested_budget: polished.suggested_budget.as_ref().and_then(budget_value),
        experience_level: validated.experience_level,
        skills: validated.skills,
        budget_min: validated.budget_min,
        budget_max: validated.budget_max,
        deadline: validated.deadline,
    })
}

pub async fn advise(llm: &LlmClient, description: &str) -> Result<String, AppError> {
    if description.trim().is_empty() {
        return Err(AppError::Validation("description cannot be empty".to_string()));
    }
    let prompt = ADVISE_PROMPT_TEMPLATE.replace("{description}", description.trim());
    let response = llm
        .generate(&prompt, Some(PLATFORM_INSTRUCTION))
        .await
        .map_err(|e| AppError::Llm(format!("Advice failed: {e}")))?;
    Ok(response.text_or_fallback())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_budget_value_accepts_numbers_and_text() {
        assert_eq!(budget_value(&json!(1500)), Some(1500.0));
        assert_eq!(budget_value(&json!("$1,000 - $2,000")), Some(1500.0));
        assert_eq!(budget_value(&json!(null)), None);
    }

    #[test]
    fn test_polish_prompt_fills_every_placeholder() {
        let draft = ValidatedDraft {
            title: "Delivery tracker".to_string(),
            description: "Android app for couriers".to_string(),
            skills: vec!["Kotlin".to_string(), "Firebase".to_string()],
            budget_min: 800.0,
            budget_max: 800.0,
            deadline: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
            experience_level: ExperienceLevel::Mid,
        };
        let prompt = polish_prompt(&draft, " $800 ");
        assert!(prompt.contains("Skills: Kotlin, Firebase"));
        assert!(prompt.contains("Budget: $800\n"));
        assert!(prompt.contains("Deadline: 2025-09-01"));
        assert!(prompt.contains("Experience level: mid"));
        for placeholder in ["{title}", "{description}", "{skills}", "{budget}", "{deadline}", "{level}"] {
            assert!(!prompt.contains(placeholder));
        }
    }

    #[test]
    fn test_polished_summary_tolerates_missing_budget() {
        let parsed: PolishedSummary =
            serde_json::from_str(r#"{"summary": "We need a Kotlin developer."}"#).unwrap();
        assert!(parsed.suggested_budget.is_none());
    }
}
