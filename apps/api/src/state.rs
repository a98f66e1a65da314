use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::matching::scoring::MatchScorer;
use crate::rag::embedder::Embedder;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub llm: LlmClient,
    /// Sentence embedder for RAG prompts and knowledge-base sync.
    pub embedder: Arc<dyn Embedder>,
    /// Pluggable compatibility scorer. Default: WeightedMatchScorer.
    pub match_scorer: Arc<dyn MatchScorer>,
    pub config: Config,
}
