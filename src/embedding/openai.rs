use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{EmbeddingError, EmbeddingProvider};
use crate::retry::RetryPolicy;

/// Default OpenAI API endpoint.
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";

/// Embedding provider backed by the OpenAI `/v1/embeddings` endpoint.
pub struct OpenAiEmbedder {
    http: reqwest::Client,
    auth_header: String,
    base_url: String,
    model: String,
    dimension: usize,
    retry: RetryPolicy,
}

impl std::fmt::Debug for OpenAiEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiEmbedder")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("dimension", &self.dimension)
            .field("retry", &self.retry)
            .finish()
    }
}

impl OpenAiEmbedder {
    /// Creates an embedder for `model`, expecting `dimension`-length vectors.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, dimension: usize) -> Self {
        Self {
            http: reqwest::Client::new(),
            auth_header: format!("Bearer {}", api_key.into()),
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            model: model.into(),
            dimension,
            retry: RetryPolicy::disabled(),
        }
    }

    /// Overrides the API endpoint (self-hosted gateways, test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Enables retry with backoff for rate-limited responses. The search
    /// path leaves this disabled.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Returns the configured model identifier.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Returns the expected vector dimensionality.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    fn embeddings_url(&self) -> String {
        format!("{}/v1/embeddings", self.base_url)
    }

    async fn request_embedding(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let url = self.embeddings_url();
        let body = EmbeddingRequest {
            model: &self.model,
            input: text,
        };

        let response = self
            .http
            .post(&url)
            .header("Authorization", &self.auth_header)
            .json(&body)
            .send()
            .await
            .map_err(|e| EmbeddingError::RequestFailed {
                url: url.clone(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| status.to_string());
            return Err(EmbeddingError::ApiStatus {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: EmbeddingResponse =
            response
                .json()
                .await
                .map_err(|e| EmbeddingError::MalformedResponse {
                    reason: e.to_string(),
                })?;

        extract_vector(parsed, self.dimension)
    }
}

impl EmbeddingProvider for OpenAiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        debug!(text_len = text.len(), model = %self.model, "requesting embedding");

        self.retry
            .run(EmbeddingError::is_rate_limited, || {
                self.request_embedding(text)
            })
            .await
    }
}

fn extract_vector(
    response: EmbeddingResponse,
    expected_dim: usize,
) -> Result<Vec<f32>, EmbeddingError> {
    let vector = response
        .data
        .into_iter()
        .next()
        .map(|d| d.embedding)
        .ok_or_else(|| EmbeddingError::MalformedResponse {
            reason: "response contained no embedding data".to_string(),
        })?;

    if vector.len() != expected_dim {
        return Err(EmbeddingError::InvalidDimension {
            expected: expected_dim,
            actual: vector.len(),
        });
    }

    Ok(vector)
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}
