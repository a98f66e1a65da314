use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::marketplace::validation::require_non_empty;
use crate::models::project::ProjectRow;

#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub profile_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    /// Public URL of an already-uploaded image.
    pub image_url: Option<String>,
}

impl CreateProjectRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        require_non_empty("title", &self.title)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ProjectListQuery {
    pub profile_id: Option<Uuid>,
}

pub async fn list_projects(
    pool: &PgPool,
    query: &ProjectListQuery,
) -> Result<Vec<ProjectRow>, sqlx::Error> {
    sqlx::query_as::<_, ProjectRow>(
        r#"
        SELECT * FROM projects
        WHERE ($1::uuid IS NULL OR profile_id = $1)
        ORDER BY created_at DESC
        "#,
    )
    .bind(query.profile_id)
    .fetch_all(pool)
    .await
}

pub async fn get_project(pool: &PgPool, id: Uuid) -> Result<Option<ProjectRow>, sqlx::Error> {
    sqlx::query_as::<_, ProjectRow>("SELECT * FROM projects WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn create_project(
    pool: &PgPool,
    req: &CreateProjectRequest,
) -> Result<ProjectRow, sqlx::Error> {
    sqlx::query_as::<_, ProjectRow>(
        r#"
        INSERT INTO projects (profile_id, title, description, image_url)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(req.profile_id)
    .bind(req.title.trim())
    .bind(&req.description)
    .bind(&req.image_url)
    .fetch_one(pool)
    .await
}

pub async fn delete_project(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM projects WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
