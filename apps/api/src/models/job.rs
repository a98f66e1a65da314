use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::{ExperienceLevel, JobStatus};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobPostRow {
    pub id: Uuid,
    pub client_id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub budget_min: Option<f64>,
    pub budget_max: Option<f64>,
    pub deadline: Option<NaiveDate>,
    pub required_experience_level: Option<ExperienceLevel>,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A job skill joined with the skill's name.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobSkillRow {
    pub job_id: Uuid,
    pub skill_id: Uuid,
    pub name: String,
    pub is_required: bool,
    pub importance_weight: Option<f64>,
}
