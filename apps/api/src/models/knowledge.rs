use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

/// One row returned by the `match_knowledge` similarity function.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct KnowledgeMatchRow {
    pub id: i64,
    pub content: String,
    pub metadata: Value,
    pub similarity: f64,
}
