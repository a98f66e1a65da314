//! pgvector access for the knowledge base.
//!
//! Vectors are bound as their text form (`[0.1,0.2,...]`) and cast with `::vector`,
//! so no pgvector-specific sqlx type is needed.

use serde_json::Value;
use sqlx::PgPool;

use crate::models::knowledge::KnowledgeMatchRow;

/// Renders an embedding in pgvector's text input format.
pub fn vector_literal(embedding: &[f32]) -> String {
    let parts: Vec<String> = embedding.iter().map(|x| x.to_string()).collect();
    format!("[{}]", parts.join(","))
}

/// Nearest knowledge-base rows by cosine similarity, best first.
pub async fn match_knowledge(
    pool: &PgPool,
    embedding: &[f32],
    match_count: i32,
) -> Result<Vec<KnowledgeMatchRow>, sqlx::Error> {
    sqlx::query_as::<_, KnowledgeMatchRow>(
        "SELECT id, content, metadata, similarity FROM match_knowledge($1::vector, $2)",
    )
    .bind(vector_literal(embedding))
    .bind(match_count)
    .fetch_all(pool)
    .await
}

/// Inserts a document, replacing embedding and metadata when the content already exists.
pub async fn upsert_document(
    pool: &PgPool,
    content: &str,
    embedding: &[f32],
    metadata: &Value,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO knowledge_base (content, embedding, metadata)
        VALUES ($1, $2::vector, $3)
        ON CONFLICT (content)
        DO UPDATE SET embedding = EXCLUDED.embedding, metadata = EXCLUDED.metadata
        "#,
    )
    .bind(content)
    .bind(vector_literal(embedding))
    .bind(metadata)
    .execute(pool)
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_literal_format() {
        assert_eq!(vector_literal(&[0.5, -1.0, 0.25]), "[0.5,-1,0.25]");
        assert_eq!(vector_literal(&[]), "[]");
    }
}
