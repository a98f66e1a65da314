//! Job posts and the skills they require.

use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::marketplace::validation::{budget_bounds, non_empty_if_present, non_negative, require_non_empty};
use crate::models::job::{JobPostRow, JobSkillRow};
use crate::models::{ExperienceLevel, JobStatus};

#[derive(Debug, Deserialize)]
pub struct CreateJobRequest {
    pub client_id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub budget_min: Option<f64>,
    pub budget_max: Option<f64>,
    pub deadline: Option<NaiveDate>,
    pub required_experience_level: Option<ExperienceLevel>,
    pub status: Option<JobStatus>,
}

impl CreateJobRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        require_non_empty("title", &self.title)?;
        budget_bounds(self.budget_min, self.budget_max)
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateJobRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub budget_min: Option<f64>,
    pub budget_max: Option<f64>,
    pub deadline: Option<NaiveDate>,
    pub required_experience_level: Option<ExperienceLevel>,
    pub status: Option<JobStatus>,
}

impl UpdateJobRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        non_empty_if_present("title", self.title.as_deref())?;
        budget_bounds(self.budget_min, self.budget_max)
    }

    /// Checks the budget the job will have once this patch is applied to `current`.
    pub fn validate_against(&self, current: &JobPostRow) -> Result<(), AppError> {
        self.validate()?;
        budget_bounds(
            self.budget_min.or(current.budget_min),
            self.budget_max.or(current.budget_max),
        )
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct JobListQuery {
    pub status: Option<JobStatus>,
    pub client_id: Option<Uuid>,
}

pub async fn list_jobs(pool: &PgPool, query: &JobListQuery) -> Result<Vec<JobPostRow>, sqlx::Error> {
    sqlx::query_as::<_, JobPostRow>(
        r#"
        SELECT * FROM job_posts
        WHERE ($1::job_status_enum IS NULL OR status = $1)
          AND ($2::uuid IS NULL OR client_id = $2)
        ORDER BY created_at DESC
        "#,
    )
    .bind(query.status)
    .bind(query.client_id)
    .fetch_all(pool)
    .await
}

pub async fn get_job(pool: &PgPool, id: Uuid) -> Result<Option<JobPostRow>, sqlx::Error> {
    sqlx::query_as::<_, JobPostRow>("SELECT * FROM job_posts WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn create_job(pool: &PgPool, req: &CreateJobRequest) -> Result<JobPostRow, sqlx::Error> {
    sqlx::query_as::<_, JobPostRow>(
        r#"
        INSERT INTO job_posts
            (client_id, title, description, budget_min, budget_max, deadline,
             required_experience_level, status)
        VALUES ($1, $2, $3, $4, $5, $6, $7, COALESCE($8, 'open'::job_status_enum))
        RETURNING *
        "#,
    )
    .bind(req.client_id)
    .bind(req.title.trim())
    .bind(&req.description)
    .bind(req.budget_min)
    .bind(req.budget_max)
    .bind(req.deadline)
    .bind(req.required_experience_level)
    .bind(req.status)
    .fetch_one(pool)
    .await
}

pub async fn update_job(
    pool: &PgPool,
    id: Uuid,
    req: &UpdateJobRequest,
) -> Result<Option<JobPostRow>, sqlx::Error> {
    sqlx::query_as::<_, JobPostRow>(
        r#"
        UPDATE job_posts
        SET title = COALESCE($2, title),
            description = COALESCE($3, description),
            budget_min = COALESCE($4, budget_min),
            budget_max = COALESCE($5, budget_max),
            deadline = COALESCE($6, deadline),
            required_experience_level = COALESCE($7, required_experience_level),
            status = COALESCE($8, status),
            updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(req.title.as_deref().map(str::trim))
    .bind(&req.description)
    .bind(req.budget_min)
    .bind(req.budget_max)
    .bind(req.deadline)
    .bind(req.required_experience_level)
    .bind(req.status)
    .fetch_optional(pool)
    .await
}

pub async fn delete_job(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM job_posts WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

// ────────────────────────────────────────────────────────────────────────────
// Job skills
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AttachJobSkillRequest {
    pub skill_id: Uuid,
    pub is_required: Option<bool>,
    pub importance_weight: Option<f64>,
}

impl AttachJobSkillRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        non_negative("importance_weight", self.importance_weight)
    }
}

pub async fn list_job_skills(pool: &PgPool, job_id: Uuid) -> Result<Vec<JobSkillRow>, sqlx::Error> {
    sqlx::query_as::<_, JobSkillRow>(
        r#"
        SELECT js.job_id, js.skill_id, s.name, js.is_required, js.importance_weight
        FROM job_skills js
        JOIN skills s ON s.id = js.skill_id
        WHERE js.job_id = $1
        ORDER BY s.name
        "#,
    )
    .bind(job_id)
    .fetch_all(pool)
    .await
}

/// Adds the skill, or updates its flags when it is already attached.
pub async fn attach_job_skill(
    pool: &PgPool,
    job_id: Uuid,
    req: &AttachJobSkillRequest,
) -> Result<JobSkillRow, sqlx::Error> {
    sqlx::query_as::<_, JobSkillRow>(
        r#"
        WITH upserted AS (
            INSERT INTO job_skills (job_id, skill_id, is_required, importance_weight)
            VALUES ($1, $2, COALESCE($3, true), $4)
            ON CONFLICT (job_id, skill_id)
            DO UPDATE SET is_required = EXCLUDED.is_required,
                          importance_weight = EXCLUDED.importance_weight
            RETURNING *
        )
        SELECT u.job_id, u.skill_id, s.name, u.is_required, u.importance_weight
        FROM upserted u
        JOIN skills s ON s.id = u.skill_id
        "#,
    )
    .bind(job_id)
    .bind(req.skill_id)
    .bind(req.is_required)
    .bind(req.importance_weight)
    .fetch_one(pool)
    .await
}

pub async fn detach_job_skill(pool: &PgPool, job_id: Uuid, skill_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM job_skills WHERE job_id = $1 AND skill_id = $2")
        .bind(job_id)
        .bind(skill_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_job_deserializes_dates_and_enums() {
        let req: CreateJobRequest = serde_json::from_value(serde_json::json!({
            "client_id": Uuid::new_v4(),
            "title": "Build a React App",
            "description": "Need a React developer for a new project",
            "budget_min": 1000.0,
            "budget_max": 2000.0,
            "deadline": "2024-07-01",
            "required_experience_level": "mid",
            "status": "open"
        }))
        .unwrap();
        assert!(req.validate().is_ok());
        assert_eq!(req.deadline, NaiveDate::from_ymd_opt(2024, 7, 1));
        assert_eq!(req.required_experience_level, Some(ExperienceLevel::Mid));
    }

    #[test]
    fn test_create_job_rejects_inverted_budget() {
        let req: CreateJobRequest = serde_json::from_value(serde_json::json!({
            "title": "Logo",
            "budget_min": 500.0,
            "budget_max": 100.0
        }))
        .unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_update_job_rejects_blank_title() {
        let req: UpdateJobRequest =
            serde_json::from_value(serde_json::json!({ "title": "  " })).unwrap();
        assert!(req.validate().is_err());
    }

    fn stored_job(budget_min: Option<f64>, budget_max: Option<f64>) -> JobPostRow {
        JobPostRow {
            id: Uuid::new_v4(),
            client_id: None,
            title: "Landing page".to_string(),
            description: None,
            budget_min,
            budget_max,
            deadline: None,
            required_experience_level: None,
            status: JobStatus::Open,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_one_sided_budget_patch_is_checked_against_stored_bounds() {
        let job = stored_job(Some(50.0), Some(100.0));

        let raise_min: UpdateJobRequest =
            serde_json::from_value(serde_json::json!({ "budget_min": 500.0 })).unwrap();
        assert!(raise_min.validate_against(&job).is_err());

        let lower_max: UpdateJobRequest =
            serde_json::from_value(serde_json::json!({ "budget_max": 20.0 })).unwrap();
        assert!(lower_max.validate_against(&job).is_err());

        let widen: UpdateJobRequest =
            serde_json::from_value(serde_json::json!({ "budget_max": 150.0 })).unwrap();
        assert!(widen.validate_against(&job).is_ok());
    }

    #[test]
    fn test_budget_patch_on_job_without_budget() {
        let job = stored_job(None, None);
        let req: UpdateJobRequest =
            serde_json::from_value(serde_json::json!({ "budget_min": 500.0 })).unwrap();
        assert!(req.validate_against(&job).is_ok());
    }

    #[test]
    fn test_update_job_status_only() {
        let req: UpdateJobRequest =
            serde_json::from_value(serde_json::json!({ "status": "in_progress" })).unwrap();
        assert!(req.validate().is_ok());
        assert_eq!(req.status, Some(JobStatus::InProgress));
    }
}
