use aura_core::domain::{CandidateSource, ValidationWarning};
use aura_core::error::{codes, AppError};
use serde::{Deserialize, Serialize};

pub mod chain;
pub mod fixed;
pub mod scrape;
pub mod serpapi;

pub use chain::FallbackChain;
pub use fixed::StaticProvider;
pub use scrape::ScrapeProvider;
pub use serpapi::SerpApiProvider;

/// A candidate as a backend reported it. Either field may be missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawCandidate {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub snippet: Option<String>,
}

impl RawCandidate {
    pub fn new(url: impl Into<String>, snippet: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            snippet: Some(snippet.into()),
        }
    }
}

/// Supplies candidate web sources for a query.
///
/// Implementations may return fewer than `limit` results, including none. The pipeline
/// treats an `Err` the same as an empty result.
pub trait SourceProvider: Send + Sync {
    fn name(&self) -> &str;

    fn search(&self, query: &str, limit: usize) -> Result<Vec<RawCandidate>, AppError>;
}

/// Turn raw candidates into usable sources, skipping malformed entries individually.
///
/// Entries without a url or without a snippet field are dropped with a warning. Entries with
/// an empty snippet are kept as-is; the selector skips them.
pub fn normalize_candidates(raw: Vec<RawCandidate>) -> (Vec<CandidateSource>, Vec<ValidationWarning>) {
    let mut out = Vec::new();
    let mut warnings = Vec::new();

    for (i, c) in raw.into_iter().enumerate() {
        let url = c.url.as_deref().map(str::trim).unwrap_or("");
        if url.is_empty() {
            warnings.push(
                ValidationWarning::new(codes::CANDIDATE_MISSING_URL, "Candidate without url skipped")
                    .with_details(format!("index={i}")),
            );
            continue;
        }
        let Some(snippet) = c.snippet else {
            warnings.push(
                ValidationWarning::new(codes::CANDIDATE_MISSING_SNIPPET, "Candidate without snippet skipped")
                    .with_details(format!("index={i}; url={url}")),
            );
            continue;
        };
        out.push(CandidateSource::new(url, snippet.trim()));
    }

    (out, warnings)
}
