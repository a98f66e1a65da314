use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::marketplace::validation::{non_empty_if_present, require_non_empty};
use crate::models::skill::SkillRow;

#[derive(Debug, Deserialize)]
pub struct CreateSkillRequest {
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
}

impl CreateSkillRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        require_non_empty("name", &self.name)
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateSkillRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
}

impl UpdateSkillRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        non_empty_if_present("name", self.name.as_deref())
    }
}

pub async fn list_skills(pool: &PgPool) -> Result<Vec<SkillRow>, sqlx::Error> {
    sqlx::query_as::<_, SkillRow>("SELECT * FROM skills ORDER BY name")
        .fetch_all(pool)
        .await
}

pub async fn get_skill(pool: &PgPool, id: Uuid) -> Result<Option<SkillRow>, sqlx::Error> {
    sqlx::query_as::<_, SkillRow>("SELECT * FROM skills WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn create_skill(pool: &PgPool, req: &CreateSkillRequest) -> Result<SkillRow, sqlx::Error> {
    sqlx::query_as::<_, SkillRow>(
        "INSERT INTO skills (name, category, description) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(req.name.trim())
    .bind(&req.category)
    .bind(&req.description)
    .fetch_one(pool)
    .await
}

pub async fn update_skill(
    pool: &PgPool,
    id: Uuid,
    req: &UpdateSkillRequest,
) -> Result<Option<SkillRow>, sqlx::Error> {
    sqlx::query_as::<_, SkillRow>(
        r#"
        UPDATE skills
        SET name = COALESCE($2, name),
            category = COALESCE($3, category),
            description = COALESCE($4, description)
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(req.name.as_deref().map(str::trim))
    .bind(&req.category)
    .bind(&req.description)
    .fetch_optional(pool)
    .await
}

pub async fn delete_skill(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM skills WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
