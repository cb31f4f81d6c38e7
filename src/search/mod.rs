//! Retrieval orchestration.
//!
//! [`SearchPipeline`] composes the embedding provider, vector index, and
//! reranker behind two memoization caches. Components are constructed by
//! the host and injected; the pipeline owns only cache-key policy and the
//! order of operations.

mod error;
mod pipeline;

#[cfg(test)]
mod tests;

pub use error::SearchError;
pub use pipeline::{PipelineConfig, SearchPipeline};
