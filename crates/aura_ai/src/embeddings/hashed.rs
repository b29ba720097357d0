use aura_core::domain::Embedding;
use aura_core::error::{codes, AppError};
use sha2::{Digest, Sha256};

use super::Embedder;

pub const DEFAULT_DIMS: usize = 384;

/// Deterministic feature-hashing embedder.
///
/// Each lowercased word is hashed into a signed bucket, so identical text produces identical
/// vectors and texts sharing many words land close together. No model, no network: used
/// for offline runs and tests.
#[derive(Debug, Clone)]
pub struct HashedEmbedder {
    dims: usize,
    model: String,
}

impl HashedEmbedder {
    pub fn new(dims: usize) -> Result<Self, AppError> {
        if dims == 0 {
            return Err(AppError::new(
                codes::CONFIG_INVALID,
                "Hashed embedder dims must be greater than zero",
            ));
        }
        Ok(Self {
            dims,
            model: format!("hashed-{dims}"),
        })
    }

    pub fn dims(&self) -> usize {
        self.dims
    }
}

impl Default for HashedEmbedder {
    fn default() -> Self {
        Self {
            dims: DEFAULT_DIMS,
            model: format!("hashed-{DEFAULT_DIMS}"),
        }
    }
}

fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
}

impl Embedder for HashedEmbedder {
    fn model(&self) -> &str {
        &self.model
    }

    fn embed(&self, input: &str) -> Result<Embedding, AppError> {
        let mut v = vec![0.0f32; self.dims];
        for token in tokens(input) {
            let digest = Sha256::digest(token.as_bytes());
            let mut idx_bytes = [0u8; 8];
            idx_bytes.copy_from_slice(&digest[..8]);
            let idx = (u64::from_le_bytes(idx_bytes) % self.dims as u64) as usize;
            let sign = if digest[8] & 1 == 0 { 1.0 } else { -1.0 };
            v[idx] += sign;
        }
        Ok(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aura_core::similarity::cosine_similarity;

    #[test]
    fn identical_text_has_identical_vectors() {
        let e = HashedEmbedder::default();
        let a = e.embed("Water boils at 100 degrees Celsius.").expect("embed");
        let b = e.embed("water BOILS at 100 degrees celsius").expect("embed");
        assert_eq!(a, b);
        assert_eq!(a.len(), DEFAULT_DIMS);
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn unrelated_text_scores_low() {
        let e = HashedEmbedder::default();
        let a = e.embed("The sky is blue.").expect("embed");
        let b = e.embed("Water boils at 100 degrees Celsius.").expect("embed");
        assert!(cosine_similarity(&a, &b) < 0.5);
    }

    #[test]
    fn punctuation_only_text_is_a_zero_vector() {
        let e = HashedEmbedder::new(16).expect("dims");
        let v = e.embed("?! ...").expect("embed");
        assert_eq!(v.len(), 16);
        assert!(v.iter().all(|x| *x == 0.0));
    }

    #[test]
    fn zero_dims_is_rejected() {
        assert!(HashedEmbedder::new(0).is_err());
    }
}
