use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::marketplace::validation::non_negative;
use crate::models::application::ApplicationRow;
use crate::models::ApplicationStatus;

/// `freelancer_id` is mandatory; a missing one is rejected at deserialization.
#[derive(Debug, Deserialize)]
pub struct CreateApplicationRequest {
    pub job_id: Uuid,
    pub freelancer_id: Uuid,
    pub cover_letter: Option<String>,
    pub proposed_rate: Option<f64>,
}

impl CreateApplicationRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        non_negative("proposed_rate", self.proposed_rate)
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateApplicationRequest {
    pub cover_letter: Option<String>,
    pub proposed_rate: Option<f64>,
    pub status: Option<ApplicationStatus>,
}

impl UpdateApplicationRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        non_negative("proposed_rate", self.proposed_rate)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ApplicationListQuery {
    pub job_id: Option<Uuid>,
    pub freelancer_id: Option<Uuid>,
}

pub async fn list_applications(
    pool: &PgPool,
    query: &ApplicationListQuery,
) -> Result<Vec<ApplicationRow>, sqlx::Error> {
    sqlx::query_as::<_, ApplicationRow>(
        r#"
        SELECT * FROM applications
        WHERE ($1::uuid IS NULL OR job_id = $1)
          AND ($2::uuid IS NULL OR freelancer_id = $2)
        ORDER BY created_at DESC
        "#,
    )
    .bind(query.job_id)
    .bind(query.freelancer_id)
    .fetch_all(pool)
    .await
}

pub async fn get_application(
    pool: &PgPool,
    id: Uuid,
) -> Result<Option<ApplicationRow>, sqlx::Error> {
    sqlx::query_as::<_, ApplicationRow>("SELECT * FROM applications WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn create_application(
    pool: &PgPool,
    req: &CreateApplicationRequest,
) -> Result<ApplicationRow, sqlx::Error> {
    sqlx::query_as::<_, ApplicationRow>(
        r#"
        INSERT INTO applications (job_id, freelancer_id, cover_letter, proposed_rate)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(req.job_id)
    .bind(req.freelancer_id)
    .bind(&req.cover_letter)
    .bind(req.proposed_rate)
    .fetch_one(pool)
    .await
}

pub async fn update_application(
    pool: &PgPool,
    id: Uuid,
    req: &UpdateApplicationRequest,
) -> Result<Option<ApplicationRow>, sqlx::Error> {
    sqlx::query_as::<_, ApplicationRow>(
        r#"
        UPDATE applications
        SET cover_letter = COALESCE($2, cover_letter),
            proposed_rate = COALESCE($3, proposed_rate),
            status = COALESCE($4, status)
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&req.cover_letter)
    .bind(req.proposed_rate)
    .bind(req.status)
    .fetch_optional(pool)
    .await
}

pub async fn delete_application(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM applications WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_application_requires_freelancer_id() {
        let parsed: Result<CreateApplicationRequest, _> =
            serde_json::from_value(serde_json::json!({
                "job_id": Uuid::new_v4(),
                "cover_letter": "I have built three marketplaces."
            }));
        assert!(parsed.is_err());
    }

    #[test]
    fn test_create_application_rejects_negative_rate() {
        let req = CreateApplicationRequest {
            job_id: Uuid::new_v4(),
            freelancer_id: Uuid::new_v4(),
            cover_letter: None,
            proposed_rate: Some(-20.0),
        };
        assert!(req.validate().is_err());
    }
}
