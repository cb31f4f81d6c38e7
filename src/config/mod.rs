//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `CLIPSEEK_*` environment
//! variables; only the provider API keys are required.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::time::Duration;

use crate::constants::{
    DEFAULT_COLLECTION_NAME, DEFAULT_EMBEDDING_MODEL, DEFAULT_QDRANT_URL,
    DEFAULT_RELEVANCE_THRESHOLD, DEFAULT_RERANK_MODEL, DEFAULT_RERANK_TOP_N,
    DEFAULT_SIMILARITY_THRESHOLD, DEFAULT_TOP_K, EMBEDDING_CACHE_MAX_SIZE, EMBEDDING_CACHE_TTL,
    EMBEDDING_DIM, RESULT_CACHE_MAX_SIZE, RESULT_CACHE_TTL,
};
use crate::retry::RetryPolicy;

/// Pipeline configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `CLIPSEEK_*` overrides on top of
/// defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// OpenAI API key. Required (no default).
    pub openai_api_key: String,

    /// OpenAI endpoint. Default: `https://api.openai.com`.
    pub openai_base_url: String,

    /// Embedding model identifier. Default: `text-embedding-ada-002`.
    pub embedding_model: String,

    /// Embedding dimensionality; must match the collection's vector size.
    /// Default: `1536`.
    pub embedding_dim: usize,

    /// Cohere API key. Required (no default).
    pub cohere_api_key: String,

    /// Cohere endpoint. Default: `https://api.cohere.com`.
    pub cohere_base_url: String,

    /// Rerank model identifier. Default: `rerank-v3.5`.
    pub rerank_model: String,

    /// Maximum results kept after reranking. Default: `6`.
    pub rerank_top_n: usize,

    /// Minimum rerank relevance score. Default: `0.3`.
    pub relevance_threshold: f32,

    /// Qdrant endpoint URL. Default: `http://localhost:6334`.
    pub qdrant_url: String,

    /// Qdrant collection holding the corpus. Default: `video-chapters`.
    pub collection: String,

    /// Nearest neighbors requested per query. Default: `6`.
    pub top_k: u64,

    /// Minimum index similarity score. Default: `0.8`.
    pub similarity_threshold: f32,

    /// Max entries in the result cache. Default: `1000`.
    pub result_cache_size: usize,

    /// TTL for cached result sets. Default: one year.
    pub result_cache_ttl: Duration,

    /// Max entries in the embedding cache. Default: `500`.
    pub embedding_cache_size: usize,

    /// TTL for cached embeddings. Default: 24 hours.
    pub embedding_cache_ttl: Duration,

    /// Total attempts for rate-limited provider calls. Default: `1`
    /// (no retry; the search path propagates errors).
    pub retry_max_attempts: u32,

    /// Base backoff delay between retry attempts. Default: 1 second.
    pub retry_base_delay: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            openai_api_key: String::new(),
            openai_base_url: crate::embedding::DEFAULT_OPENAI_BASE_URL.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            embedding_dim: EMBEDDING_DIM,
            cohere_api_key: String::new(),
            cohere_base_url: crate::rerank::DEFAULT_COHERE_BASE_URL.to_string(),
            rerank_model: DEFAULT_RERANK_MODEL.to_string(),
            rerank_top_n: DEFAULT_RERANK_TOP_N,
            relevance_threshold: DEFAULT_RELEVANCE_THRESHOLD,
            qdrant_url: DEFAULT_QDRANT_URL.to_string(),
            collection: DEFAULT_COLLECTION_NAME.to_string(),
            top_k: DEFAULT_TOP_K,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            result_cache_size: RESULT_CACHE_MAX_SIZE,
            result_cache_ttl: RESULT_CACHE_TTL,
            embedding_cache_size: EMBEDDING_CACHE_MAX_SIZE,
            embedding_cache_ttl: EMBEDDING_CACHE_TTL,
            retry_max_attempts: 1,
            retry_base_delay: Duration::from_secs(1),
        }
    }
}

impl Config {
    const ENV_OPENAI_API_KEY: &'static str = "CLIPSEEK_OPENAI_API_KEY";
    const ENV_OPENAI_BASE_URL: &'static str = "CLIPSEEK_OPENAI_BASE_URL";
    const ENV_EMBEDDING_MODEL: &'static str = "CLIPSEEK_EMBEDDING_MODEL";
    const ENV_EMBEDDING_DIM: &'static str = "CLIPSEEK_EMBEDDING_DIM";
    const ENV_COHERE_API_KEY: &'static str = "CLIPSEEK_COHERE_API_KEY";
    const ENV_COHERE_BASE_URL: &'static str = "CLIPSEEK_COHERE_BASE_URL";
    const ENV_RERANK_MODEL: &'static str = "CLIPSEEK_RERANK_MODEL";
    const ENV_RERANK_TOP_N: &'static str = "CLIPSEEK_RERANK_TOP_N";
    const ENV_RELEVANCE_THRESHOLD: &'static str = "CLIPSEEK_RELEVANCE_THRESHOLD";
    const ENV_QDRANT_URL: &'static str = "CLIPSEEK_QDRANT_URL";
    const ENV_COLLECTION: &'static str = "CLIPSEEK_COLLECTION";
    const ENV_TOP_K: &'static str = "CLIPSEEK_TOP_K";
    const ENV_SIMILARITY_THRESHOLD: &'static str = "CLIPSEEK_SIMILARITY_THRESHOLD";
    const ENV_RESULT_CACHE_SIZE: &'static str = "CLIPSEEK_RESULT_CACHE_SIZE";
    const ENV_RESULT_CACHE_TTL_SECS: &'static str = "CLIPSEEK_RESULT_CACHE_TTL_SECS";
    const ENV_EMBEDDING_CACHE_SIZE: &'static str = "CLIPSEEK_EMBEDDING_CACHE_SIZE";
    const ENV_EMBEDDING_CACHE_TTL_SECS: &'static str = "CLIPSEEK_EMBEDDING_CACHE_TTL_SECS";
    const ENV_RETRY_MAX_ATTEMPTS: &'static str = "CLIPSEEK_RETRY_MAX_ATTEMPTS";
    const ENV_RETRY_BASE_DELAY_MS: &'static str = "CLIPSEEK_RETRY_BASE_DELAY_MS";

    /// Loads configuration from environment variables (falling back to
    /// defaults). Only the two API keys are required.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            openai_api_key: Self::require_string_from_env(Self::ENV_OPENAI_API_KEY)?,
            openai_base_url: Self::parse_string_from_env(
                Self::ENV_OPENAI_BASE_URL,
                defaults.openai_base_url,
            ),
            embedding_model: Self::parse_string_from_env(
                Self::ENV_EMBEDDING_MODEL,
                defaults.embedding_model,
            ),
            embedding_dim: Self::parse_from_env(Self::ENV_EMBEDDING_DIM, defaults.embedding_dim),
            cohere_api_key: Self::require_string_from_env(Self::ENV_COHERE_API_KEY)?,
            cohere_base_url: Self::parse_string_from_env(
                Self::ENV_COHERE_BASE_URL,
                defaults.cohere_base_url,
            ),
            rerank_model: Self::parse_string_from_env(
                Self::ENV_RERANK_MODEL,
                defaults.rerank_model,
            ),
            rerank_top_n: Self::parse_from_env(Self::ENV_RERANK_TOP_N, defaults.rerank_top_n),
            relevance_threshold: Self::parse_from_env(
                Self::ENV_RELEVANCE_THRESHOLD,
                defaults.relevance_threshold,
            ),
            qdrant_url: Self::parse_string_from_env(Self::ENV_QDRANT_URL, defaults.qdrant_url),
            collection: Self::parse_string_from_env(Self::ENV_COLLECTION, defaults.collection),
            top_k: Self::parse_from_env(Self::ENV_TOP_K, defaults.top_k),
            similarity_threshold: Self::parse_from_env(
                Self::ENV_SIMILARITY_THRESHOLD,
                defaults.similarity_threshold,
            ),
            result_cache_size: Self::parse_from_env(
                Self::ENV_RESULT_CACHE_SIZE,
                defaults.result_cache_size,
            ),
            result_cache_ttl: Self::parse_secs_from_env(
                Self::ENV_RESULT_CACHE_TTL_SECS,
                defaults.result_cache_ttl,
            ),
            embedding_cache_size: Self::parse_from_env(
                Self::ENV_EMBEDDING_CACHE_SIZE,
                defaults.embedding_cache_size,
            ),
            embedding_cache_ttl: Self::parse_secs_from_env(
                Self::ENV_EMBEDDING_CACHE_TTL_SECS,
                defaults.embedding_cache_ttl,
            ),
            retry_max_attempts: Self::parse_from_env(
                Self::ENV_RETRY_MAX_ATTEMPTS,
                defaults.retry_max_attempts,
            ),
            retry_base_delay: Self::parse_millis_from_env(
                Self::ENV_RETRY_BASE_DELAY_MS,
                defaults.retry_base_delay,
            ),
        })
    }

    /// Validates ranges and basic invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Cosine similarity can be negative depending on the index metric.
        Self::check_threshold(
            "similarity_threshold",
            self.similarity_threshold,
            -1.0,
            1.0,
        )?;
        Self::check_threshold("relevance_threshold", self.relevance_threshold, 0.0, 1.0)?;

        Self::check_non_zero("embedding_dim", self.embedding_dim as u64)?;
        Self::check_non_zero("top_k", self.top_k)?;
        Self::check_non_zero("rerank_top_n", self.rerank_top_n as u64)?;
        Self::check_non_zero("result_cache_size", self.result_cache_size as u64)?;
        Self::check_non_zero("embedding_cache_size", self.embedding_cache_size as u64)?;

        Ok(())
    }

    /// Retry policy for rate-limited provider calls.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.retry_max_attempts, self.retry_base_delay)
    }

    fn check_threshold(
        name: &'static str,
        value: f32,
        min: f32,
        max: f32,
    ) -> Result<(), ConfigError> {
        if !value.is_finite() || !(min..=max).contains(&value) {
            return Err(ConfigError::InvalidThreshold {
                name,
                value,
                min,
                max,
            });
        }
        Ok(())
    }

    fn check_non_zero(name: &'static str, value: u64) -> Result<(), ConfigError> {
        if value == 0 {
            return Err(ConfigError::InvalidSize { name });
        }
        Ok(())
    }

    fn require_string_from_env(var_name: &'static str) -> Result<String, ConfigError> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::MissingEnvVar { name: var_name })
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name).unwrap_or(default)
    }

    fn parse_from_env<T: std::str::FromStr>(var_name: &str, default: T) -> T {
        env::var(var_name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    fn parse_secs_from_env(var_name: &str, default: Duration) -> Duration {
        env::var(var_name)
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(default)
    }

    fn parse_millis_from_env(var_name: &str, default: Duration) -> Duration {
        env::var(var_name)
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(default)
    }
}
