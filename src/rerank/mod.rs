//! Cross-encoder reranking of retrieved candidates.
//!
//! [`RerankProvider`] is the seam the pipeline depends on;
//! [`CohereReranker`] is the production implementation over the Cohere
//! `/v2/rerank` endpoint. Reranking trades one extra network call for
//! precision: the cross-encoder sees the query and candidate text together
//! and scores on a finer scale than the vector index.

mod cohere;
mod error;

#[cfg(any(test, feature = "mock"))]
mod mock;

pub use cohere::{CohereReranker, DEFAULT_COHERE_BASE_URL};
pub use error::RerankError;

#[cfg(any(test, feature = "mock"))]
pub use mock::MockReranker;

use crate::vectordb::ChapterCandidate;

/// Re-scores and re-orders candidates by relevance to the query.
///
/// Implementations must return the empty list for empty input without
/// making an external call, overwrite each kept candidate's `score` with
/// the relevance score, drop candidates below the relevance threshold, cap
/// the result at the configured maximum, and order descending with the
/// reranker's own (stable) tie order.
pub trait RerankProvider: Send + Sync {
    /// Reranks `candidates` against `query`.
    fn rerank(
        &self,
        query: &str,
        candidates: Vec<ChapterCandidate>,
    ) -> impl Future<Output = Result<Vec<ChapterCandidate>, RerankError>> + Send;
}
