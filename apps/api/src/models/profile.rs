use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::{ExperienceLevel, UserType};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProfileRow {
    pub id: Uuid,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub user_type: Option<UserType>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Freelancer-specific profile. Shares its id with the owning `ProfileRow`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FreelancerProfileRow {
    pub id: Uuid,
    pub bio: Option<String>,
    pub hourly_rate: Option<f64>,
    pub experience_level: Option<ExperienceLevel>,
    pub rating: Option<f64>,
    pub portfolio_url: Option<String>,
    pub availability_hours_per_week: Option<i32>,
    pub completed_projects: Option<i32>,
}

/// A freelancer skill joined with the skill's name.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FreelancerSkillRow {
    pub freelancer_id: Uuid,
    pub skill_id: Uuid,
    pub name: String,
    pub proficiency_level: Option<i32>,
    pub years_experience: Option<i32>,
}
