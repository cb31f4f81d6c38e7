//! Crate-wide defaults for the retrieval pipeline.
//!
//! Runtime overrides live in [`crate::config::Config`]; these are the values
//! used when nothing else is configured.

use std::time::Duration;

/// Embedding dimensionality expected by the vector index.
pub const EMBEDDING_DIM: usize = 1536;

/// Embedding model requested from the provider. Its output dimensionality
/// must match [`EMBEDDING_DIM`].
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-ada-002";

/// Number of nearest neighbors requested from the vector index.
pub const DEFAULT_TOP_K: u64 = 6;

/// Minimum index similarity score for a candidate to reach the reranker.
/// Applied as a hard cut, not a re-weighting.
pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.8;

/// Minimum cross-encoder relevance score for a candidate to appear in
/// final results. Lives on a different scale than the index score.
pub const DEFAULT_RELEVANCE_THRESHOLD: f32 = 0.3;

/// Cross-encoder model requested from the rerank endpoint.
pub const DEFAULT_RERANK_MODEL: &str = "rerank-v3.5";

/// Maximum number of results returned from a rerank pass.
pub const DEFAULT_RERANK_TOP_N: usize = 6;

/// Qdrant collection holding the transcript-chapter corpus.
pub const DEFAULT_COLLECTION_NAME: &str = "video-chapters";

/// Default Qdrant endpoint.
pub const DEFAULT_QDRANT_URL: &str = "http://localhost:6334";

/// Max entries in the final-result cache.
pub const RESULT_CACHE_MAX_SIZE: usize = 1000;

/// TTL for cached result sets. The corpus is fixed, so results stay valid
/// for a long time.
pub const RESULT_CACHE_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Max entries in the question-embedding cache.
pub const EMBEDDING_CACHE_MAX_SIZE: usize = 500;

/// TTL for cached question embeddings.
pub const EMBEDDING_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);
