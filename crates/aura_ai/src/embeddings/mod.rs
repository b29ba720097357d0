use aura_core::domain::Embedding;
use aura_core::error::AppError;

pub mod cache;
pub mod hashed;
pub mod ollama_embed;

pub use cache::{CacheStats, CachedEmbedder};
pub use hashed::HashedEmbedder;
pub use ollama_embed::OllamaEmbedder;

/// Maps text to fixed-size vectors.
///
/// Contract: identical input gives identical output, every vector from one instance has the
/// same non-zero dimension, and vectors are comparable by cosine similarity. Errors mean the
/// model could not be used; callers must not substitute zero vectors.
pub trait Embedder: Send + Sync {
    fn model(&self) -> &str;

    fn embed(&self, input: &str) -> Result<Embedding, AppError>;

    fn embed_batch(&self, inputs: &[&str]) -> Result<Vec<Embedding>, AppError> {
        inputs.iter().map(|t| self.embed(t)).collect()
    }
}

impl<E: Embedder + ?Sized> Embedder for std::sync::Arc<E> {
    fn model(&self) -> &str {
        (**self).model()
    }

    fn embed(&self, input: &str) -> Result<Embedding, AppError> {
        (**self).embed(input)
    }

    fn embed_batch(&self, inputs: &[&str]) -> Result<Vec<Embedding>, AppError> {
        (**self).embed_batch(inputs)
    }
}

/// Truncate to at most `max_bytes`, backing off to a char boundary.
pub(crate) fn clip_input(input: &str, max_bytes: usize) -> &str {
    if input.len() <= max_bytes {
        return input;
    }
    let mut end = max_bytes;
    while !input.is_char_boundary(end) {
        end -= 1;
    }
    &input[..end]
}
