//! Axum route handlers for the RAG API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::extract::AppJson;
use crate::rag::pipeline::answer;
use crate::rag::sync::{sync_knowledge_base, SyncReport};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub prompt: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub response: String,
}

/// GET /api/rag/ping
pub async fn handle_ping() -> Json<Value> {
    Json(json!({ "message": "pong" }))
}

/// POST /api/rag/ask
///
/// Answers a prompt with the closest knowledge-base entries as context.
pub async fn handle_ask(
    State(state): State<AppState>,
    AppJson(request): AppJson<AskRequest>,
) -> Result<Json<AskResponse>, AppError> {
    let prompt = request
        .prompt
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Missing prompt".to_string()))?;

    let response = answer(
        &state.db,
        state.embedder.as_ref(),
        &state.llm,
        &prompt,
        state.config.rag_match_count,
    )
    .await?;

    Ok(Json(AskResponse { response }))
}

/// POST /api/rag/sync
///
/// Re-embeds the platform docs and every profile into the knowledge base.
pub async fn handle_sync(State(state): State<AppState>) -> Result<Json<SyncReport>, AppError> {
    let report = sync_knowledge_base(&state.db, state.embedder.as_ref()).await?;
    Ok(Json(report))
}
