//! Fallback candidate source: scrape a web search results page, then pull a snippet out of
//! each linked page's `<p>` text.

use std::time::Duration;

use aura_core::error::{codes, AppError};
use scraper::{Html, Selector};
use tracing::{debug, warn};
use url::Url;

use super::{RawCandidate, SourceProvider};

pub const DEFAULT_RESULTS_URL: &str = "https://html.duckduckgo.com/html/";
pub const DEFAULT_SNIPPET_MAX_CHARS: usize = 400;
const USER_AGENT: &str = "Mozilla/5.0 (compatible; AURA/1.0)";

#[derive(Debug, Clone)]
pub struct ScrapeProvider {
    results_url: String,
    snippet_max_chars: usize,
    timeout: Duration,
}

impl ScrapeProvider {
    pub fn new(snippet_max_chars: usize, timeout: Duration) -> Self {
        Self {
            results_url: DEFAULT_RESULTS_URL.to_string(),
            snippet_max_chars,
            timeout,
        }
    }

    fn get(&self, url: &str) -> Result<ureq::Response, ureq::Error> {
        ureq::get(url)
            .timeout(self.timeout)
            .set("User-Agent", USER_AGENT)
            .call()
    }

    /// Fetch a page and reduce it to a snippet. Any failure yields an empty snippet, which
    /// the selector later ignores.
    pub fn fetch_snippet(&self, url: &str) -> String {
        let resp = match self.get(url) {
            Ok(r) if r.status() == 200 => r,
            Ok(r) => {
                debug!(url, status = r.status(), "snippet fetch returned non-200");
                return String::new();
            }
            Err(e) => {
                warn!(url, error = %e, "failed to fetch snippet");
                return String::new();
            }
        };
        match resp.into_string() {
            Ok(body) => paragraph_text(&body, self.snippet_max_chars),
            Err(e) => {
                warn!(url, error = %e, "failed to read snippet body");
                String::new()
            }
        }
    }
}

impl Default for ScrapeProvider {
    fn default() -> Self {
        Self::new(DEFAULT_SNIPPET_MAX_CHARS, Duration::from_secs(5))
    }
}

fn selector(css: &str) -> Result<Selector, AppError> {
    Selector::parse(css).map_err(|e| {
        AppError::new(codes::SEARCH_FAILED, "Invalid CSS selector").with_details(format!("{css}: {e}"))
    })
}

/// Result links on the page may be redirect wrappers (`/l/?uddg=<target>`); unwrap them.
pub(crate) fn resolve_result_href(href: &str) -> Option<String> {
    let absolute = if href.starts_with("//") {
        format!("https:{href}")
    } else {
        href.to_string()
    };
    let parsed = Url::parse(&absolute).ok()?;
    if let Some((_, target)) = parsed.query_pairs().find(|(k, _)| k == "uddg") {
        let target = Url::parse(&target).ok()?;
        return matches!(target.scheme(), "http" | "https").then(|| target.to_string());
    }
    matches!(parsed.scheme(), "http" | "https").then(|| parsed.to_string())
}

pub(crate) fn result_links(html: &str, limit: usize) -> Result<Vec<String>, AppError> {
    let doc = Html::parse_document(html);
    let sel = selector("a.result__a")?;
    let mut out: Vec<String> = Vec::new();
    for a in doc.select(&sel) {
        let Some(url) = a.value().attr("href").and_then(resolve_result_href) else {
            continue;
        };
        if !out.contains(&url) {
            out.push(url);
        }
        if out.len() >= limit {
            break;
        }
    }
    Ok(out)
}

/// Join trimmed `<p>` texts with single spaces and keep the first `max_chars` characters.
pub(crate) fn paragraph_text(html: &str, max_chars: usize) -> String {
    let doc = Html::parse_document(html);
    let Ok(sel) = selector("p") else {
        return String::new();
    };
    let text = doc
        .select(&sel)
        .map(|p| p.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    text.chars().take(max_chars).collect()
}

impl SourceProvider for ScrapeProvider {
    fn name(&self) -> &str {
        "scrape"
    }

    fn search(&self, query: &str, limit: usize) -> Result<Vec<RawCandidate>, AppError> {
        let resp = ureq::get(&self.results_url)
            .timeout(self.timeout)
            .set("User-Agent", USER_AGENT)
            .query("q", query)
            .call()
            .map_err(|e| {
                AppError::new(codes::SEARCH_FAILED, "Failed to fetch search results page")
                    .with_details(e.to_string())
                    .with_retryable(true)
            })?;
        let body = resp.into_string().map_err(|e| {
            AppError::new(codes::SEARCH_FAILED, "Failed to read search results page")
                .with_details(e.to_string())
        })?;

        let links = result_links(&body, limit)?;
        debug!(count = links.len(), "scraped result links");

        Ok(links
            .into_iter()
            .map(|url| {
                let snippet = self.fetch_snippet(&url);
                RawCandidate::new(url, snippet)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn unwraps_redirect_links() {
        assert_eq!(
            resolve_result_href("//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com%2Fpage&rut=abc").as_deref(),
            Some("https://example.com/page")
        );
        assert_eq!(
            resolve_result_href("https://example.org/x").as_deref(),
            Some("https://example.org/x")
        );
        assert_eq!(resolve_result_href("javascript:void(0)"), None);
        assert_eq!(resolve_result_href("/relative"), None);
    }

    #[test]
    fn extracts_unique_result_links_up_to_limit() {
        let html = r#"<html><body>
            <a class="result__a" href="https://a.example/">A</a>
            <a class="other" href="https://ignored.example/">X</a>
            <a class="result__a" href="https://a.example/">A again</a>
            <a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fb.example%2F">B</a>
            <a class="result__a" href="https://c.example/">C</a>
        </body></html>"#;
        let links = result_links(html, 2).expect("links");
        assert_eq!(links, vec!["https://a.example/", "https://b.example/"]);
    }

    #[test]
    fn paragraph_text_joins_and_truncates() {
        let html = "<html><body><h1>Title</h1><p>  First para. </p><div><p>Second <b>bold</b> para.</p></div><p>   </p></body></html>";
        assert_eq!(paragraph_text(html, 400), "First para. Second bold para.");
        assert_eq!(paragraph_text(html, 5), "First");
        assert_eq!(paragraph_text("<html><body>no paragraphs</body></html>", 400), "");
    }
}
