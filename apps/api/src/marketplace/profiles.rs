//! Profiles, freelancer profiles, and freelancer skills.

use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::marketplace::validation::{non_negative, rating_in_range};
use crate::models::profile::{FreelancerProfileRow, FreelancerSkillRow, ProfileRow};
use crate::models::{ExperienceLevel, UserType};

// ────────────────────────────────────────────────────────────────────────────
// Profiles
// ────────────────────────────────────────────────────────────────────────────

/// The id is the authenticated user's id, so the caller supplies it.
#[derive(Debug, Deserialize)]
pub struct CreateProfileRequest {
    pub id: Uuid,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub user_type: Option<UserType>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub user_type: Option<UserType>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProfileListQuery {
    pub user_type: Option<UserType>,
}

pub async fn list_profiles(
    pool: &PgPool,
    query: &ProfileListQuery,
) -> Result<Vec<ProfileRow>, sqlx::Error> {
    sqlx::query_as::<_, ProfileRow>(
        r#"
        SELECT * FROM profiles
        WHERE ($1::user_type_enum IS NULL OR user_type = $1)
        ORDER BY created_at DESC
        "#,
    )
    .bind(query.user_type)
    .fetch_all(pool)
    .await
}

pub async fn get_profile(pool: &PgPool, id: Uuid) -> Result<Option<ProfileRow>, sqlx::Error> {
    sqlx::query_as::<_, ProfileRow>("SELECT * FROM profiles WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn create_profile(
    pool: &PgPool,
    req: &CreateProfileRequest,
) -> Result<ProfileRow, sqlx::Error> {
    sqlx::query_as::<_, ProfileRow>(
        r#"
        INSERT INTO profiles (id, email, full_name, avatar_url, user_type)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(req.id)
    .bind(&req.email)
    .bind(&req.full_name)
    .bind(&req.avatar_url)
    .bind(req.user_type)
    .fetch_one(pool)
    .await
}

pub async fn update_profile(
    pool: &PgPool,
    id: Uuid,
    req: &UpdateProfileRequest,
) -> Result<Option<ProfileRow>, sqlx::Error> {
    sqlx::query_as::<_, ProfileRow>(
        r#"
        UPDATE profiles
        SET email = COALESCE($2, email),
            full_name = COALESCE($3, full_name),
            avatar_url = COALESCE($4, avatar_url),
            user_type = COALESCE($5, user_type),
            updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&req.email)
    .bind(&req.full_name)
    .bind(&req.avatar_url)
    .bind(req.user_type)
    .fetch_optional(pool)
    .await
}

pub async fn delete_profile(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM profiles WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

// ────────────────────────────────────────────────────────────────────────────
// Freelancer profiles
// ────────────────────────────────────────────────────────────────────────────

/// `id` must be an existing profile id.
#[derive(Debug, Deserialize)]
pub struct CreateFreelancerRequest {
    pub id: Uuid,
    pub bio: Option<String>,
    pub hourly_rate: Option<f64>,
    pub experience_level: Option<ExperienceLevel>,
    pub rating: Option<f64>,
    pub portfolio_url: Option<String>,
    pub availability_hours_per_week: Option<i32>,
    pub completed_projects: Option<i32>,
}

impl CreateFreelancerRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        non_negative("hourly_rate", self.hourly_rate)?;
        rating_in_range(self.rating)
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateFreelancerRequest {
    pub bio: Option<String>,
    pub hourly_rate: Option<f64>,
    pub experience_level: Option<ExperienceLevel>,
    pub rating: Option<f64>,
    pub portfolio_url: Option<String>,
    pub availability_hours_per_week: Option<i32>,
    pub completed_projects: Option<i32>,
}

impl UpdateFreelancerRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        non_negative("hourly_rate", self.hourly_rate)?;
        rating_in_range(self.rating)
    }
}

pub async fn list_freelancers(pool: &PgPool) -> Result<Vec<FreelancerProfileRow>, sqlx::Error> {
    sqlx::query_as::<_, FreelancerProfileRow>(
        "SELECT * FROM freelancer_profiles ORDER BY rating DESC NULLS LAST",
    )
    .fetch_all(pool)
    .await
}

pub async fn get_freelancer(
    pool: &PgPool,
    id: Uuid,
) -> Result<Option<FreelancerProfileRow>, sqlx::Error> {
    sqlx::query_as::<_, FreelancerProfileRow>("SELECT * FROM freelancer_profiles WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn create_freelancer(
    pool: &PgPool,
    req: &CreateFreelancerRequest,
) -> Result<FreelancerProfileRow, sqlx::Error> {
    sqlx::query_as::<_, FreelancerProfileRow>(
        r#"
        INSERT INTO freelancer_profiles
            (id, bio, hourly_rate, experience_level, rating, portfolio_url,
             availability_hours_per_week, completed_projects)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(req.id)
    .bind(&req.bio)
    .bind(req.hourly_rate)
    .bind(req.experience_level)
    .bind(req.rating)
    .bind(&req.portfolio_url)
    .bind(req.availability_hours_per_week)
    .bind(req.completed_projects)
    .fetch_one(pool)
    .await
}

pub async fn update_freelancer(
    pool: &PgPool,
    id: Uuid,
    req: &UpdateFreelancerRequest,
) -> Result<Option<FreelancerProfileRow>, sqlx::Error> {
    sqlx::query_as::<_, FreelancerProfileRow>(
        r#"
        UPDATE freelancer_profiles
        SET bio = COALESCE($2, bio),
            hourly_rate = COALESCE($3, hourly_rate),
            experience_level = COALESCE($4, experience_level),
            rating = COALESCE($5, rating),
            portfolio_url = COALESCE($6, portfolio_url),
            availability_hours_per_week = COALESCE($7, availability_hours_per_week),
            completed_projects = COALESCE($8, completed_projects)
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&req.bio)
    .bind(req.hourly_rate)
    .bind(req.experience_level)
    .bind(req.rating)
    .bind(&req.portfolio_url)
    .bind(req.availability_hours_per_week)
    .bind(req.completed_projects)
    .fetch_optional(pool)
    .await
}

pub async fn delete_freelancer(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM freelancer_profiles WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

// ────────────────────────────────────────────────────────────────────────────
// Freelancer skills
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AttachFreelancerSkillRequest {
    pub skill_id: Uuid,
    pub proficiency_level: Option<i32>,
    pub years_experience: Option<i32>,
}

impl AttachFreelancerSkillRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if matches!(self.proficiency_level, Some(p) if !(1..=5).contains(&p)) {
            return Err(AppError::Validation(
                "proficiency_level must be between 1 and 5".to_string(),
            ));
        }
        if matches!(self.years_experience, Some(y) if y < 0) {
            return Err(AppError::Validation(
                "years_experience cannot be negative".to_string(),
            ));
        }
        Ok(())
    }
}

pub async fn list_freelancer_skills(
    pool: &PgPool,
    freelancer_id: Uuid,
) -> Result<Vec<FreelancerSkillRow>, sqlx::Error> {
    sqlx::query_as::<_, FreelancerSkillRow>(
        r#"
        SELECT fs.freelancer_id, fs.skill_id, s.name, fs.proficiency_level, fs.years_experience
        FROM freelancer_skills fs
        JOIN skills s ON s.id = fs.skill_id
        WHERE fs.freelancer_id = $1
        ORDER BY s.name
        "#,
    )
    .bind(freelancer_id)
    .fetch_all(pool)
    .await
}

/// Adds the skill, or updates proficiency/years when it is already attached.
pub async fn attach_freelancer_skill(
    pool: &PgPool,
    freelancer_id: Uuid,
    req: &AttachFreelancerSkillRequest,
) -> Result<FreelancerSkillRow, sqlx::Error> {
    sqlx::query_as::<_, FreelancerSkillRow>(
        r#"
        WITH upserted AS (
            INSERT INTO freelancer_skills (freelancer_id, skill_id, proficiency_level, years_experience)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (freelancer_id, skill_id)
            DO UPDATE SET proficiency_level = EXCLUDED.proficiency_level,
                          years_experience = EXCLUDED.years_experience
            RETURNING *
        )
        SELECT u.freelancer_id, u.skill_id, s.name, u.proficiency_level, u.years_experience
        FROM upserted u
        JOIN skills s ON s.id = u.skill_id
        "#,
    )
    .bind(freelancer_id)
    .bind(req.skill_id)
    .bind(req.proficiency_level)
    .bind(req.years_experience)
    .fetch_one(pool)
    .await
}

pub async fn detach_freelancer_skill(
    pool: &PgPool,
    freelancer_id: Uuid,
    skill_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let result =
        sqlx::query("DELETE FROM freelancer_skills WHERE freelancer_id = $1 AND skill_id = $2")
            .bind(freelancer_id)
            .bind(skill_id)
            .execute(pool)
            .await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_freelancer_validation_rejects_bad_rating() {
        let req: CreateFreelancerRequest = serde_json::from_value(serde_json::json!({
            "id": Uuid::new_v4(),
            "hourly_rate": 45.0,
            "experience_level": "senior",
            "rating": 6.0
        }))
        .unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_freelancer_update_allows_partial_body() {
        let req: UpdateFreelancerRequest =
            serde_json::from_value(serde_json::json!({ "bio": "Rust backend developer" })).unwrap();
        assert!(req.validate().is_ok());
        assert!(req.hourly_rate.is_none());
    }

    #[test]
    fn test_attach_skill_validation() {
        let ok = AttachFreelancerSkillRequest {
            skill_id: Uuid::new_v4(),
            proficiency_level: Some(5),
            years_experience: Some(3),
        };
        assert!(ok.validate().is_ok());

        let bad = AttachFreelancerSkillRequest {
            proficiency_level: Some(9),
            ..ok
        };
        assert!(bad.validate().is_err());
    }
}
