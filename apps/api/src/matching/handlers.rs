//! Axum route handlers for matching.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::extract::AppJson;
use crate::matching::service::{find_matches, score_pair, FreelancerMatch, MatchQuery};
use crate::models::matching::MatchRow;
use crate::models::MatchStatus;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MatchListQuery {
    pub job_id: Option<Uuid>,
    pub freelancer_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMatchRequest {
    pub status: MatchStatus,
}

/// GET /api/jobs/:id/matches
///
/// Ranks every freelancer against the job, best first.
/// `?persist=true` also records the returned matches.
pub async fn handle_job_matches(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Query(query): Query<MatchQuery>,
) -> Result<Json<Vec<FreelancerMatch>>, AppError> {
    let matches = find_matches(&state.db, state.match_scorer.as_ref(), job_id, &query).await?;
    Ok(Json(matches))
}

/// GET /api/jobs/:id/matches/:freelancer_id
pub async fn handle_score_pair(
    State(state): State<AppState>,
    Path((job_id, freelancer_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<FreelancerMatch>, AppError> {
    let m = score_pair(&state.db, state.match_scorer.as_ref(), job_id, freelancer_id).await?;
    Ok(Json(m))
}

/// GET /api/matches
pub async fn handle_list_matches(
    State(state): State<AppState>,
    Query(query): Query<MatchListQuery>,
) -> Result<Json<Vec<MatchRow>>, AppError> {
    let rows = sqlx::query_as::<_, MatchRow>(
        r#"
        SELECT * FROM matches
        WHERE ($1::uuid IS NULL OR job_id = $1)
          AND ($2::uuid IS NULL OR freelancer_id = $2)
        ORDER BY compatibility_score DESC, created_at DESC
        "#,
    )
    .bind(query.job_id)
    .bind(query.freelancer_id)
    .fetch_all(&state.db)
    .await?;
    Ok(Json(rows))
}

/// GET /api/matches/:id
pub async fn handle_get_match(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MatchRow>, AppError> {
    let row = sqlx::query_as::<_, MatchRow>("SELECT * FROM matches WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Match {id} not found")))?;
    Ok(Json(row))
}

/// PATCH /api/matches/:id
pub async fn handle_update_match(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(req): AppJson<UpdateMatchRequest>,
) -> Result<Json<MatchRow>, AppError> {
    let row = sqlx::query_as::<_, MatchRow>(
        "UPDATE matches SET status = $1 WHERE id = $2 RETURNING *",
    )
    .bind(req.status)
    .bind(id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Match {id} not found")))?;
    Ok(Json(row))
}

/// DELETE /api/matches/:id
pub async fn handle_delete_match(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let result = sqlx::query("DELETE FROM matches WHERE id = $1")
        .bind(id)
        .execute(&state.db)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Match {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}
