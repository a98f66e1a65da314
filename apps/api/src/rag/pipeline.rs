//! Prompt answering: embed → retrieve → compose → generate.

use sqlx::PgPool;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::models::knowledge::KnowledgeMatchRow;
use crate::rag::embedder::Embedder;
use crate::rag::retrieval::match_knowledge;

const CONTEXT_SEPARATOR: &str = "\n---\n";

pub fn build_context(matches: &[KnowledgeMatchRow]) -> String {
    matches
        .iter()
        .map(|m| m.content.as_str())
        .collect::<Vec<_>>()
        .join(CONTEXT_SEPARATOR)
}

/// Context first, then the user's prompt. An empty context sends the prompt alone.
pub fn compose_prompt(context: &str, prompt: &str) -> String {
    if context.is_empty() {
        prompt.to_string()
    } else {
        format!("{context}{CONTEXT_SEPARATOR}{prompt}")
    }
}

pub async fn answer(
    pool: &PgPool,
    embedder: &dyn Embedder,
    llm: &LlmClient,
    prompt: &str,
    match_count: i32,
) -> Result<String, AppError> {
    let embedding = embedder
        .embed(prompt)
        .await
        .map_err(|e| AppError::Embedding(e.to_string()))?;

    let matches = match_knowledge(pool, &embedding, match_count).await?;
    info!("Retrieved {} knowledge entries for prompt", matches.len());
    for m in &matches {
        debug!("  match id={} similarity={:.3}", m.id, m.similarity);
    }

    let full_prompt = compose_prompt(&build_context(&matches), prompt);
    let response = llm
        .generate(&full_prompt, None)
        .await
        .map_err(|e| AppError::Llm(e.to_string()))?;

    Ok(response.text_or_fallback())
}
