use thiserror::Error;

use crate::embedding::EmbeddingError;
use crate::rerank::RerankError;
use crate::vectordb::VectorDbError;

/// Errors surfaced by [`super::SearchPipeline`].
///
/// Component errors are wrapped, never swallowed or downgraded; a failed
/// step aborts the whole call and nothing partial is cached. Calling
/// `search` before `initialize` surfaces as
/// [`VectorDbError::NotInitialized`] inside the [`SearchError::Index`]
/// variant.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The embedding provider failed.
    #[error("embedding provider error: {0}")]
    Embedding(#[from] EmbeddingError),

    /// The vector index failed (or was not initialized).
    #[error("vector index error: {0}")]
    Index(#[from] VectorDbError),

    /// The reranker failed.
    #[error("reranker error: {0}")]
    Rerank(#[from] RerankError),
}

impl SearchError {
    /// Returns `true` when the failure is the initialize-before-search
    /// contract being violated rather than a provider fault.
    pub fn is_not_initialized(&self) -> bool {
        matches!(self, Self::Index(VectorDbError::NotInitialized { .. }))
    }
}
