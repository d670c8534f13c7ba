//! Embedding collaborator: trait, remote client, and vector similarity.
//!
//! The dense retrieval strategy depends on an [`Embedder`] that can encode
//! a batch of passages and a single query into fixed-size vectors. The
//! shipped implementation, [`RemoteEmbedder`], calls an OpenAI-compatible
//! embeddings endpoint with retry and backoff.
//!
//! # Retry Strategy
//!
//! - HTTP 429 (rate limited) and 5xx (server error) → retry
//! - HTTP 4xx (client error, not 429) → fail immediately
//! - Network errors → retry
//! - Backoff: 1s, 2s, 4s, 8s, 16s, 32s (capped at 2^5)

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::config::EmbeddingConfig;
use crate::error::CollaboratorError;

/// An embedding service that turns text into fixed-size vectors.
///
/// Batch encoding must preserve input order; cosine similarity over the
/// returned vectors is computed by the caller.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// The model identifier (e.g. `"text-embedding-3-small"`).
    fn model_name(&self) -> &str;

    /// Vector dimensionality (e.g. `1536`).
    fn dims(&self) -> usize;

    /// Encode a batch of texts, one vector per input, in input order.
    async fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, CollaboratorError>;

    /// Encode a single query text.
    async fn encode(&self, text: &str) -> Result<Vec<f32>, CollaboratorError> {
        self.encode_batch(&[text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| CollaboratorError::Malformed {
                service: "embedding",
                detail: "empty embedding response".to_string(),
            })
    }
}

/// Embedding client for an OpenAI-compatible `/v1/embeddings` endpoint.
///
/// Requires the `OPENAI_API_KEY` environment variable. Large inputs are
/// sent in `batch_size` slices; transient failures are retried with
/// exponential backoff up to `max_retries` attempts per slice.
pub struct RemoteEmbedder {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    dims: usize,
    batch_size: usize,
    max_retries: u32,
    timeout_secs: u64,
}

impl RemoteEmbedder {
    /// Create a remote embedder from configuration.
    ///
    /// Fails fast if `model` or `dims` is not configured, if the API key is
    /// missing from the environment, or if the HTTP client cannot be built.
    pub fn new(config: &EmbeddingConfig) -> anyhow::Result<Self> {
        let model = config
            .model
            .clone()
            .ok_or_else(|| anyhow::anyhow!("embedding.model required for remote embedder"))?;
        let dims = config
            .dims
            .ok_or_else(|| anyhow::anyhow!("embedding.dims required for remote embedder"))?;
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| anyhow::anyhow!("OPENAI_API_KEY environment variable not set"))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key,
            model,
            dims,
            batch_size: config.batch_size.max(1),
            max_retries: config.max_retries,
            timeout_secs: config.timeout_secs,
        })
    }

    /// Send one batch to the endpoint with retry and backoff.
    async fn request_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, CollaboratorError> {
        let body = serde_json::json!({
            "model": self.model,
            "input": texts,
        });

        let mut last_err = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = Duration::from_secs(1 << (attempt - 1).min(5));
                tokio::time::sleep(delay).await;
            }

            let resp = self
                .client
                .post(&self.endpoint)
                .bearer_auth(&self.api_key)
                .json(&body)
                .send()
                .await;

            match resp {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        let parsed: EmbeddingsResponse =
                            response
                                .json()
                                .await
                                .map_err(|e| CollaboratorError::Malformed {
                                    service: "embedding",
                                    detail: e.to_string(),
                                })?;
                        return order_embeddings(parsed, texts.len());
                    }

                    let body_text = response.text().await.unwrap_or_default();
                    let err = CollaboratorError::Api {
                        service: "embedding",
                        status: status.as_u16(),
                        body: body_text,
                    };

                    // Rate limited or server error: retry. Other client
                    // errors are permanent.
                    if status.as_u16() == 429 || status.is_server_error() {
                        last_err = Some(err);
                        continue;
                    }
                    return Err(err);
                }
                Err(e) => {
                    last_err = Some(CollaboratorError::from_reqwest(
                        "embedding",
                        self.timeout_secs,
                        e,
                    ));
                    continue;
                }
            }
        }

        Err(last_err.unwrap_or(CollaboratorError::Unavailable("embedding")))
    }
}

#[derive(Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingRow>,
}

#[derive(Deserialize)]
struct EmbeddingRow {
    index: usize,
    embedding: Vec<f32>,
}

#[async_trait]
impl Embedder for RemoteEmbedder {
    fn model_name(&self) -> &str {
        &self.model
    }

    fn dims(&self) -> usize {
        self.dims
    }

    async fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, CollaboratorError> {
        let mut vectors = Vec::with_capacity(texts.len());
        for batch in texts.chunks(self.batch_size) {
            vectors.extend(self.request_batch(batch).await?);
        }
        Ok(vectors)
    }
}

/// Sort rows by index and check the count matches the input batch.
fn order_embeddings(
    parsed: EmbeddingsResponse,
    expected: usize,
) -> Result<Vec<Vec<f32>>, CollaboratorError> {
    let mut rows = parsed.data;
    if rows.len() != expected {
        return Err(CollaboratorError::Malformed {
            service: "embedding",
            detail: format!("expected {} embeddings, got {}", expected, rows.len()),
        });
    }
    rows.sort_by_key(|r| r.index);
    Ok(rows.into_iter().map(|r| r.embedding).collect())
}

/// Compute cosine similarity between two embedding vectors.
///
/// Returns a value in `[-1.0, 1.0]`; `0.0` for empty vectors or vectors
/// of different lengths.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    let denom = norm_a * norm_b;
    if denom < f32::EPSILON {
        return 0.0;
    }

    dot / denom
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cosine_identical() {
        let v = vec![1.0, 2.0, 3.0];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_orthogonal() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![0.0, 1.0, 0.0];
        assert!(cosine_similarity(&a, &b).abs() < 1e-6);
    }

    #[test]
    fn cosine_opposite() {
        let a = vec![1.0, 0.0];
        let b = vec![-1.0, 0.0];
        assert!((cosine_similarity(&a, &b) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_empty_or_mismatched() {
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        assert_eq!(cosine_similarity(&[1.0, 2.0], &[1.0]), 0.0);
    }

    #[test]
    fn embeddings_reordered_by_index() {
        let parsed = EmbeddingsResponse {
            data: vec![
                EmbeddingRow {
                    index: 1,
                    embedding: vec![1.0],
                },
                EmbeddingRow {
                    index: 0,
                    embedding: vec![0.0],
                },
            ],
        };
        let vecs = order_embeddings(parsed, 2).unwrap();
        assert_eq!(vecs[0], vec![0.0]);
        assert_eq!(vecs[1], vec![1.0]);
    }

    #[test]
    fn embedding_count_mismatch_is_malformed() {
        let parsed = EmbeddingsResponse {
            data: vec![EmbeddingRow {
                index: 0,
                embedding: vec![0.0],
            }],
        };
        let err = order_embeddings(parsed, 2).unwrap_err();
        assert!(matches!(err, CollaboratorError::Malformed { .. }));
    }
}
