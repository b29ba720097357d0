use std::fs;
use std::path::Path;

use aura_core::error::{codes, AppError};

use super::{RawCandidate, SourceProvider};

/// Returns a fixed candidate list regardless of the query.
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    candidates: Vec<RawCandidate>,
}

impl StaticProvider {
    pub fn new(candidates: Vec<RawCandidate>) -> Self {
        Self { candidates }
    }

    /// Load a JSON array of `{url, snippet}` objects.
    pub fn from_json_file(path: &Path) -> Result<Self, AppError> {
        let raw = fs::read_to_string(path).map_err(|e| {
            AppError::new(codes::INPUT_READ_FAILED, "Failed to read sources file")
                .with_details(format!("path={}; err={e}", path.display()))
        })?;
        let candidates: Vec<RawCandidate> = serde_json::from_str(&raw).map_err(|e| {
            AppError::new(codes::INPUT_READ_FAILED, "Failed to parse sources file")
                .with_details(format!("path={}; err={e}", path.display()))
        })?;
        Ok(Self { candidates })
    }
}

impl SourceProvider for StaticProvider {
    fn name(&self) -> &str {
        "static"
    }

    fn search(&self, _query: &str, limit: usize) -> Result<Vec<RawCandidate>, AppError> {
        Ok(self.candidates.iter().take(limit).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_to_limit() {
        let p = StaticProvider::new(vec![
            RawCandidate::new("https://1", "a"),
            RawCandidate::new("https://2", "b"),
        ]);
        assert_eq!(p.search("q", 1).expect("search").len(), 1);
        assert_eq!(p.search("q", 10).expect("search").len(), 2);
    }

    #[test]
    fn loads_candidates_from_json_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("sources.json");
        fs::write(&path, r#"[{"url":"https://a","snippet":"alpha"},{"url":"https://b"}]"#).expect("write");

        let p = StaticProvider::from_json_file(&path).expect("load");
        let got = p.search("ignored", 5).expect("search");
        assert_eq!(got.len(), 2);
        assert_eq!(got[1].snippet, None);

        fs::write(&path, "not json").expect("write");
        let err = StaticProvider::from_json_file(&path).expect_err("bad json");
        assert_eq!(err.code, codes::INPUT_READ_FAILED);
    }
}
