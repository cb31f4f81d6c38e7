//! Vector similarity search over the transcript-chapter corpus.
//!
//! [`VectorIndex`] is the seam the pipeline depends on; [`QdrantIndex`] is
//! the production implementation over a Qdrant collection. The index is
//! assumed to already exist and be populated; ingestion lives elsewhere.

mod client;
mod error;
mod model;

#[cfg(any(test, feature = "mock"))]
mod mock;


pub use client::{QdrantIndex, VectorIndex};
pub use error::VectorDbError;
pub use model::ChapterCandidate;

#[cfg(any(test, feature = "mock"))]
pub use mock::MockVectorIndex;
