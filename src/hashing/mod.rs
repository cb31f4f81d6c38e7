//! BLAKE3 hashing for cache keys.
//!
//! Cache keys are a pure function of the question text: identical questions
//! always map to the same 32-byte key. Namespace separation (embeddings vs.
//! result sets) comes from using separate [`crate::cache::QueryCache`]
//! instances, not from the key itself.

/// Hashes a question into the 32-byte cache key.
#[inline]
pub fn hash_question(question: &str) -> [u8; 32] {
    *blake3::hash(question.as_bytes()).as_bytes()
}
