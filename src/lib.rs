//! Clipseek library crate (used by embedding hosts and integration tests).
//!
//! Cached semantic retrieval over video-transcript chapters: a question is
//! embedded, matched against a vector index, filtered by a similarity
//! threshold, reranked by a cross-encoder, and memoized at two tiers
//! (final results and raw embeddings).
//!
//! # Public API Surface
//!
//! The exports are organized by module:
//!
//! ## Orchestration
//! - [`SearchPipeline`], [`PipelineConfig`], [`SearchError`] - The
//!   end-to-end retrieval pipeline
//!
//! ## Components
//! - [`OpenAiEmbedder`], [`EmbeddingProvider`] - Question embedding
//! - [`QdrantIndex`], [`VectorIndex`], [`ChapterCandidate`] - Vector search
//! - [`CohereReranker`], [`RerankProvider`] - Cross-encoder reranking
//!
//! ## Infrastructure
//! - [`QueryCache`], [`CacheStats`] - TTL + LRU memoization
//! - [`Config`], [`ConfigError`] - Environment configuration
//! - [`RetryPolicy`] - Rate-limit retry with linear backoff
//! - Hashing and HTML-entity helpers for cache keys and payload text
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod cache;
pub mod config;
pub mod constants;
pub mod embedding;
pub mod hashing;
pub mod rerank;
pub mod retry;
pub mod search;
pub mod text;
pub mod vectordb;

pub use cache::{CacheStats, QueryCache};
pub use config::{Config, ConfigError};
pub use constants::{
    DEFAULT_COLLECTION_NAME, DEFAULT_EMBEDDING_MODEL, DEFAULT_QDRANT_URL,
    DEFAULT_RELEVANCE_THRESHOLD, DEFAULT_RERANK_MODEL, DEFAULT_RERANK_TOP_N,
    DEFAULT_SIMILARITY_THRESHOLD, DEFAULT_TOP_K, EMBEDDING_CACHE_MAX_SIZE, EMBEDDING_CACHE_TTL,
    EMBEDDING_DIM, RESULT_CACHE_MAX_SIZE, RESULT_CACHE_TTL,
};
pub use embedding::{EmbeddingError, EmbeddingProvider, OpenAiEmbedder};
#[cfg(any(test, feature = "mock"))]
pub use embedding::MockEmbeddingProvider;
pub use hashing::hash_question;
pub use rerank::{CohereReranker, RerankError, RerankProvider};
#[cfg(any(test, feature = "mock"))]
pub use rerank::MockReranker;
pub use retry::RetryPolicy;
pub use search::{PipelineConfig, SearchError, SearchPipeline};
pub use text::decode_entities;
pub use vectordb::{ChapterCandidate, QdrantIndex, VectorDbError, VectorIndex};
#[cfg(any(test, feature = "mock"))]
pub use vectordb::MockVectorIndex;
