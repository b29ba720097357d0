use aura_core::error::AppError;
use tracing::{debug, warn};

use super::{RawCandidate, SourceProvider};

/// Tries providers in order; the first non-empty result wins.
///
/// A failing provider is logged and skipped. If every provider fails or comes back empty,
/// the chain returns an empty list rather than an error.
pub struct FallbackChain {
    providers: Vec<Box<dyn SourceProvider>>,
}

impl FallbackChain {
    pub fn new(providers: Vec<Box<dyn SourceProvider>>) -> Self {
        Self { providers }
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl SourceProvider for FallbackChain {
    fn name(&self) -> &str {
        "fallback_chain"
    }

    fn search(&self, query: &str, limit: usize) -> Result<Vec<RawCandidate>, AppError> {
        for provider in &self.providers {
            match provider.search(query, limit) {
                Ok(found) if !found.is_empty() => {
                    debug!(provider = provider.name(), count = found.len(), "candidates found");
                    return Ok(found);
                }
                Ok(_) => debug!(provider = provider.name(), "no candidates; trying next provider"),
                Err(e) => warn!(provider = provider.name(), error = %e, "search provider failed"),
            }
        }
        Ok(Vec::new())
    }
}
