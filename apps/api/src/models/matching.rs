use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::MatchStatus;

/// A persisted job/freelancer match. `compatibility_score` is stored as a 0-1 fraction.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MatchRow {
    pub id: Uuid,
    pub job_id: Uuid,
    pub freelancer_id: Uuid,
    pub compatibility_score: f64,
    pub status: MatchStatus,
    pub created_at: DateTime<Utc>,
}
