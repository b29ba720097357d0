use std::time::Duration;

use aura_core::error::{codes, AppError};
use serde::Deserialize;
use tracing::debug;

use super::{RawCandidate, SourceProvider};

pub const SERPAPI_ENDPOINT: &str = "https://serpapi.com/search.json";

/// Google results through SerpAPI. Without an API key the provider is inert and returns
/// no candidates.
#[derive(Debug, Clone)]
pub struct SerpApiProvider {
    api_key: Option<String>,
    endpoint: String,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct SerpApiResponse {
    #[serde(default)]
    organic_results: Vec<OrganicResult>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OrganicResult {
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    snippet: Option<String>,
}

impl SerpApiProvider {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            endpoint: SERPAPI_ENDPOINT.to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

fn parse_results(body: &str, limit: usize) -> Result<Vec<RawCandidate>, AppError> {
    let resp: SerpApiResponse = serde_json::from_str(body).map_err(|e| {
        AppError::new(codes::SEARCH_FAILED, "Failed to decode SerpAPI response")
            .with_details(e.to_string())
    })?;
    if let Some(err) = resp.error {
        // SerpAPI reports "no results" as an error string; anything else is a real failure.
        if err.contains("hasn't returned any results") {
            return Ok(Vec::new());
        }
        return Err(AppError::new(codes::SEARCH_FAILED, "SerpAPI returned an error").with_details(err));
    }
    Ok(resp
        .organic_results
        .into_iter()
        .take(limit)
        .map(|r| RawCandidate {
            url: r.link,
            snippet: r.snippet,
        })
        .collect())
}

impl SourceProvider for SerpApiProvider {
    fn name(&self) -> &str {
        "serpapi"
    }

    fn search(&self, query: &str, limit: usize) -> Result<Vec<RawCandidate>, AppError> {
        let Some(key) = self.api_key.as_deref() else {
            debug!("SerpAPI key not configured; skipping");
            return Ok(Vec::new());
        };

        let num = limit.to_string();
        let resp = ureq::get(&self.endpoint)
            .timeout(self.timeout)
            .query("engine", "google")
            .query("q", query)
            .query("num", &num)
            .query("api_key", key)
            .call();

        let body = match resp {
            Ok(r) => r.into_string().map_err(|e| {
                AppError::new(codes::SEARCH_FAILED, "Failed to read SerpAPI response")
                    .with_details(e.to_string())
            })?,
            Err(ureq::Error::Status(status, r)) => {
                let body = r.into_string().unwrap_or_default();
                return Err(AppError::new(codes::SEARCH_FAILED, "SerpAPI request failed")
                    .with_details(format!("status={status}; body={}", body.chars().take(200).collect::<String>())));
            }
            Err(e) => {
                return Err(AppError::new(codes::SEARCH_FAILED, "Failed to call SerpAPI")
                    .with_details(e.to_string())
                    .with_retryable(true));
            }
        };

        parse_results(&body, limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_organic_results_and_truncates() {
        let body = r#"{
            "organic_results": [
                {"link": "https://a.example", "snippet": "alpha"},
                {"link": "https://b.example"},
                {"snippet": "no link"},
                {"link": "https://d.example", "snippet": "delta"}
            ]
        }"#;
        let got = parse_results(body, 3).expect("parse");
        assert_eq!(
            got,
            vec![
                RawCandidate::new("https://a.example", "alpha"),
                RawCandidate {
                    url: Some("https://b.example".to_string()),
                    snippet: None
                },
                RawCandidate {
                    url: None,
                    snippet: Some("no link".to_string())
                },
            ]
        );
    }

    #[test]
    fn no_results_error_is_empty_and_other_errors_fail() {
        let empty = r#"{"error": "Google hasn't returned any results for this query."}"#;
        assert!(parse_results(empty, 5).expect("parse").is_empty());

        let bad = r#"{"error": "Invalid API key."}"#;
        let err = parse_results(bad, 5).expect_err("should fail");
        assert_eq!(err.code, codes::SEARCH_FAILED);

        assert!(parse_results("{}", 5).expect("parse").is_empty());
    }

    #[test]
    fn missing_key_is_inert() {
        let p = SerpApiProvider::new(Some("  ".to_string()));
        assert!(!p.is_configured());
        assert!(p.search("anything", 5).expect("search").is_empty());
    }
}
