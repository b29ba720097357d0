//! In-process embedding cache.
//!
//! Pure optimization: results are identical with or without it. Keys are
//! SHA256(model, text) so different models never share entries. When full, the least
//! recently used entry is evicted.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use aura_core::domain::Embedding;
use aura_core::error::AppError;
use lru::LruCache;
use sha2::{Digest, Sha256};

use super::Embedder;

pub struct CachedEmbedder<E> {
    inner: E,
    entries: Mutex<LruCache<String, Embedding>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
}

fn cache_key(model: &str, text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(model.as_bytes());
    hasher.update([0u8]);
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}

impl<E: Embedder> CachedEmbedder<E> {
    /// A capacity of 0 is treated as 1.
    pub fn new(inner: E, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner,
            entries: Mutex::new(LruCache::new(capacity)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn inner(&self) -> &E {
        &self.inner
    }

    pub fn stats(&self) -> CacheStats {
        let (entries, capacity) = self
            .entries
            .lock()
            .map(|c| (c.len(), c.cap().get()))
            .unwrap_or((0, 0));
        CacheStats {
            entries,
            capacity,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    pub fn clear(&self) {
        if let Ok(mut c) = self.entries.lock() {
            c.clear();
        }
    }

    fn lookup(&self, key: &str) -> Option<Embedding> {
        let found = match self.entries.lock() {
            Ok(mut c) => c.get(key).cloned(),
            Err(_) => None,
        };
        let counter = if found.is_some() { &self.hits } else { &self.misses };
        counter.fetch_add(1, Ordering::Relaxed);
        found
    }

    fn store(&self, key: String, embedding: Embedding) {
        // A poisoned lock only loses caching, never correctness.
        if let Ok(mut c) = self.entries.lock() {
            c.put(key, embedding);
        }
    }
}

impl<E: Embedder> Embedder for CachedEmbedder<E> {
    fn model(&self) -> &str {
        self.inner.model()
    }

    fn embed(&self, input: &str) -> Result<Embedding, AppError> {
        let key = cache_key(self.inner.model(), input);
        if let Some(hit) = self.lookup(&key) {
            return Ok(hit);
        }
        let v = self.inner.embed(input)?;
        self.store(key, v.clone());
        Ok(v)
    }

    fn embed_batch(&self, inputs: &[&str]) -> Result<Vec<Embedding>, AppError> {
        let keys: Vec<String> = inputs
            .iter()
            .map(|t| cache_key(self.inner.model(), t))
            .collect();
        let mut out: Vec<Option<Embedding>> = keys.iter().map(|k| self.lookup(k)).collect();

        let missing: Vec<usize> = (0..inputs.len()).filter(|i| out[*i].is_none()).collect();
        if !missing.is_empty() {
            let texts: Vec<&str> = missing.iter().map(|i| inputs[*i]).collect();
            let fresh = self.inner.embed_batch(&texts)?;
            if fresh.len() != texts.len() {
                return Err(AppError::scoring_unavailable("Embedder returned wrong batch size")
                    .with_details(format!("expected={}; got={}", texts.len(), fresh.len())));
            }
            for (i, v) in missing.into_iter().zip(fresh) {
                self.store(keys[i].clone(), v.clone());
                out[i] = Some(v);
            }
        }

        out.into_iter()
            .map(|v| v.ok_or_else(|| AppError::scoring_unavailable("Embedding missing after batch")))
            .collect()
    }
}
