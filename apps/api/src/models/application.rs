use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::ApplicationStatus;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationRow {
    pub id: Uuid,
    pub job_id: Uuid,
    pub freelancer_id: Uuid,
    pub cover_letter: Option<String>,
    pub proposed_rate: Option<f64>,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
}
