//! Embedder — maps chunk texts to 1536-dim dense vectors.
//!
//! The `Embedder` trait is the seam: `AppState` carries an
//! `Arc<dyn Embedder>`, so the OpenAI-backed implementation can be swapped
//! in tests without touching callers. Outputs always align positionally
//! with inputs.

use async_trait::async_trait;
use rand::Rng;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

const EMBEDDINGS_URL: &str = "https://api.openai.com/v1/embeddings";
/// Recorded in chunk metadata so a future model swap is traceable.
pub const EMBEDDING_MODEL: &str = "text-embedding-3-small";
pub const EMBEDDING_DIMENSIONS: usize = 1536;

/// Texts per API request.
const BATCH_SIZE: usize = 100;
const MAX_ATTEMPTS: u32 = 5;
const BASE_DELAY_MS: u64 = 1000;
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum EmbedError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Embedding failed after {attempts} attempts: {last_error}")]
    Exhausted { attempts: u32, last_error: String },

    #[error("Expected {expected} dimensions, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("Response missing embedding at index {0}")]
    MissingIndex(usize),
}

/// Produces one vector per input text, positionally aligned.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError>;

    fn model(&self) -> &'static str {
        EMBEDDING_MODEL
    }
}

// ────────────────────────────────────────────────────────────────────────────
// OpenAI implementation
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingItem>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingItem {
    index: usize,
    embedding: Vec<f32>,
}

/// OpenAI embeddings client with exponential-backoff retry.
#[derive(Clone)]
pub struct OpenAiEmbedder {
    client: Client,
    api_key: String,
}

impl OpenAiEmbedder {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }

    /// One API call for up to BATCH_SIZE texts, retried with backoff.
    async fn call_with_retry(&self, batch: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
        let mut last_error = String::new();

        for attempt in 0..MAX_ATTEMPTS {
            if attempt > 0 {
                let delay = backoff_delay_ms(attempt, rand::thread_rng().gen_range(0.8..=1.2));
                warn!(
                    "Embedding attempt {} failed ({last_error}), retrying after {delay}ms",
                    attempt
                );
                tokio::time::sleep(std::time::Duration::from_millis(delay)).await;
            }

            match self.call_once(batch).await {
                Ok(vectors) => return Ok(vectors),
                Err(EmbedError::Api { status, message }) if !is_retriable_status(status) => {
                    return Err(EmbedError::Api { status, message });
                }
                Err(e) => last_error = e.to_string(),
            }
        }

        Err(EmbedError::Exhausted {
            attempts: MAX_ATTEMPTS,
            last_error,
        })
    }

    async fn call_once(&self, batch: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
        let response = self
            .client
            .post(EMBEDDINGS_URL)
            .bearer_auth(&self.api_key)
            .json(&EmbeddingRequest {
                model: EMBEDDING_MODEL,
                input: batch,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(EmbedError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: EmbeddingResponse = response.json().await?;

        // The API tags each embedding with its input index; restore order
        // explicitly rather than trusting response ordering.
        let mut vectors: Vec<Option<Vec<f32>>> = vec![None; batch.len()];
        for item in parsed.data {
            if item.embedding.len() != EMBEDDING_DIMENSIONS {
                return Err(EmbedError::DimensionMismatch {
                    expected: EMBEDDING_DIMENSIONS,
                    got: item.embedding.len(),
                });
            }
            if item.index < vectors.len() {
                vectors[item.index] = Some(item.embedding);
            }
        }

        vectors
            .into_iter()
            .enumerate()
            .map(|(i, v)| v.ok_or(EmbedError::MissingIndex(i)))
            .collect()
    }
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!(count = texts.len(), "Embedding texts");

        // Fan batches out concurrently; try_join_all preserves input order.
        let futures = texts
            .chunks(BATCH_SIZE)
            .map(|batch| self.call_with_retry(batch));
        let batches = futures::future::try_join_all(futures).await?;

        let vectors: Vec<Vec<f32>> = batches.into_iter().flatten().collect();
        debug_assert_eq!(vectors.len(), texts.len());
        Ok(vectors)
    }
}

/// attempt 1 → ~1s, attempt 2 → ~2s, attempt 3 → ~4s … scaled by a
/// ±20% jitter factor.
fn backoff_delay_ms(attempt: u32, jitter: f64) -> u64 {
    let base = BASE_DELAY_MS * (1u64 << (attempt - 1));
    (base as f64 * jitter) as u64
}

fn is_retriable_status(status: u16) -> bool {
    status == 429 || (500..600).contains(&status)
}
