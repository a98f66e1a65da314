//! Sentence embeddings for knowledge-base documents and user prompts.
//!
//! The default `HttpEmbedder` calls a Hugging Face style feature-extraction
//! endpoint (all-MiniLM-L6-v2, 384 dimensions). Responses are either one pooled
//! vector or one vector per token; the latter is mean-pooled here. Every vector
//! leaves this module L2-normalized so cosine distance in pgvector behaves.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("embedding API returned no vectors")]
    Empty,

    #[error("expected {expected} dimensions, got {actual}")]
    Dimension { expected: usize, actual: usize },
}

#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    fn dimensions(&self) -> usize;
}

// ────────────────────────────────────────────────────────────────────────────
// HttpEmbedder
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct FeatureExtractionRequest<'a> {
    inputs: &'a str,
}

/// Either a pooled sentence vector or a token-by-dimension matrix.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FeatureExtractionResponse {
    Pooled(Vec<f32>),
    Tokens(Vec<Vec<f32>>),
    Batched(Vec<Vec<Vec<f32>>>),
}

#[derive(Clone)]
pub struct HttpEmbedder {
    client: Client,
    url: String,
    api_key: Option<String>,
    dimensions: usize,
}

impl HttpEmbedder {
    pub fn new(
        url: String,
        api_key: Option<String>,
        dimensions: usize,
    ) -> Result<Self, EmbeddingError> {
        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()?,
            url,
            api_key,
            dimensions,
        })
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut request = self
            .client
            .post(&self.url)
            .json(&FeatureExtractionRequest { inputs: text });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: FeatureExtractionResponse = response.json().await?;
        let vector = pool_and_normalize(body)?;
        debug!("Embedded {} chars into {} dims", text.len(), vector.len());

        check_dimensions(vector, self.dimensions)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

fn pool_and_normalize(body: FeatureExtractionResponse) -> Result<Vec<f32>, EmbeddingError> {
    let pooled = match body {
        FeatureExtractionResponse::Pooled(v) => v,
        FeatureExtractionResponse::Tokens(tokens) => mean_pool(&tokens)?,
        FeatureExtractionResponse::Batched(mut batch) => {
            if batch.is_empty() {
                return Err(EmbeddingError::Empty);
            }
            mean_pool(&batch.swap_remove(0))?
        }
    };
    if pooled.is_empty() {
        return Err(EmbeddingError::Empty);
    }
    Ok(l2_normalize(pooled))
}

fn mean_pool(tokens: &[Vec<f32>]) -> Result<Vec<f32>, EmbeddingError> {
    let first = tokens.first().ok_or(EmbeddingError::Empty)?;
    let width = first.len();
    let mut sum = vec![0.0f32; width];
    for token in tokens {
        if token.len() != width {
            return Err(EmbeddingError::Dimension {
                expected: width,
                actual: token.len(),
            });
        }
        for (acc, x) in sum.iter_mut().zip(token) {
            *acc += x;
        }
    }
    let n = tokens.len() as f32;
    Ok(sum.into_iter().map(|x| x / n).collect())
}

pub fn l2_normalize(mut v: Vec<f32>) -> Vec<f32> {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        v.iter_mut().for_each(|x| *x /= norm);
    }
    v
}

fn check_dimensions(vector: Vec<f32>, expected: usize) -> Result<Vec<f32>, EmbeddingError> {
    if vector.len() != expected {
        return Err(EmbeddingError::Dimension {
            expected,
            actual: vector.len(),
        });
    }
    Ok(vector)
}
