//! Expiring key→value store for pipeline memoization.
//!
//! Two independent [`QueryCache`] instances back the pipeline: one for
//! question embeddings, one for final ranked result sets. Entries expire
//! lazily (checked at access time, no background sweeper) and the store
//! evicts the least-recently-used entry under capacity pressure.

mod store;

#[cfg(test)]
mod tests;

pub use store::{CacheStats, QueryCache};
