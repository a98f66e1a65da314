//! Axum route handlers for the job-post assistant.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::assistant::job_draft::{infer_level, infer_skills, JobDraft};
use crate::assistant::service::{advise, polish_job, PolishedJob};
use crate::errors::AppError;
use crate::extract::AppJson;
use crate::models::ExperienceLevel;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeSkillsRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeSkillsResponse {
    pub skills: Vec<String>,
    pub experience_level: ExperienceLevel,
}

#[derive(Debug, Deserialize)]
pub struct AdviseRequest {
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct AdviseResponse {
    pub response: String,
}

/// POST /api/assistant/polish-job
///
/// Validates a free-text job draft and returns an LLM-written summary.
/// Invalid fields are all reported in one 400.
pub async fn handle_polish_job(
    State(state): State<AppState>,
    AppJson(draft): AppJson<JobDraft>,
) -> Result<Json<PolishedJob>, AppError> {
    Ok(Json(polish_job(&state.llm, &draft).await?))
}

/// POST /api/assistant/analyze-skills
pub async fn handle_analyze_skills(
    AppJson(request): AppJson<AnalyzeSkillsRequest>,
) -> Result<Json<AnalyzeSkillsResponse>, AppError> {
    if request.text.trim().is_empty() {
        return Err(AppError::Validation("text cannot be empty".to_string()));
    }
    let skills = infer_skills(&request.text);
    let experience_level = infer_level(&skills);
    Ok(Json(AnalyzeSkillsResponse {
        skills,
        experience_level,
    }))
}

/// POST /api/assistant/advise
pub async fn handle_advise(
    State(state): State<AppState>,
    AppJson(request): AppJson<AdviseRequest>,
) -> Result<Json<AdviseResponse>, AppError> {
    let response = advise(&state.llm, &request.description).await?;
    Ok(Json(AdviseResponse { response }))
}
