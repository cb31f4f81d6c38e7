//! Question embedding.
//!
//! [`EmbeddingProvider`] is the seam the pipeline depends on;
//! [`OpenAiEmbedder`] is the production implementation over the OpenAI
//! `/v1/embeddings` endpoint.

mod error;
mod openai;

#[cfg(any(test, feature = "mock"))]
mod mock;

pub use error::EmbeddingError;
pub use openai::{DEFAULT_OPENAI_BASE_URL, OpenAiEmbedder};

#[cfg(any(test, feature = "mock"))]
pub use mock::MockEmbeddingProvider;

/// Turns question text into a fixed-length dense vector.
///
/// Identical text must yield interchangeable vectors across calls (semantic
/// stability, not bit-exact reproducibility). Implementations do not retry
/// on the search path; failures propagate to the caller.
pub trait EmbeddingProvider: Send + Sync {
    /// Embeds `text` into a vector of the provider's configured
    /// dimensionality.
    fn embed(
        &self,
        text: &str,
    ) -> impl Future<Output = Result<Vec<f32>, EmbeddingError>> + Send;
}
