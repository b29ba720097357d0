use serde::{Deserialize, Serialize};

use crate::advice::SimilarityBand;
use crate::domain::CheckResult;

pub const DEFAULT_TOP_K: u32 = 5;
pub const MAX_TOP_K: u32 = 20;

fn default_top_k() -> u32 {
    DEFAULT_TOP_K
}

/// Boundary request: `{ text, top_k }`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckRequest {
    pub text: String,
    #[serde(default = "default_top_k")]
    pub top_k: u32,
}

impl CheckRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            top_k: DEFAULT_TOP_K,
        }
    }

    pub fn with_top_k(mut self, top_k: u32) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn effective_top_k(&self) -> u32 {
        self.top_k.clamp(1, MAX_TOP_K)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceHit {
    pub url: String,
    pub snippet: String,
    pub score: f64,
}

/// Boundary response. Scores are rounded: 2 places for the aggregate, 4 for each source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckResponse {
    pub plagiarism_score: f64,
    pub sources: Vec<SourceHit>,
    pub rewrite_suggestion: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rewritten_text: Option<String>,
}

pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

impl CheckResponse {
    pub fn from_result(result: &CheckResult, rewrite_suggestion: impl Into<String>) -> Self {
        Self {
            plagiarism_score: round_to(result.plagiarism_score, 2),
            sources: result
                .evidence
                .iter()
                .map(|e| SourceHit {
                    url: e.url.clone(),
                    snippet: e.snippet.clone(),
                    score: round_to(f64::from(e.similarity), 4),
                })
                .collect(),
            rewrite_suggestion: rewrite_suggestion.into(),
            rewritten_text: None,
        }
    }

    pub fn with_rewritten_text(mut self, text: Option<String>) -> Self {
        self.rewritten_text = text;
        self
    }
}

fn escape_cell(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ")
}

fn clip(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max_chars).collect();
    out.push_str("...");
    out
}

/// Render a deterministic Markdown report for one check.
///
/// Evidence rows keep the result's ranking, so output is snapshot-testable.
pub fn render_markdown(result: &CheckResult, response: &CheckResponse, generated_at: &str) -> String {
    let band = SimilarityBand::for_score(result.plagiarism_score);
    let mut md = String::new();

    md.push_str("# Originality Report\n\n");
    md.push_str(&format!("Generated: {generated_at}\n\n"));
    md.push_str(&format!(
        "**Plagiarism score:** {:.2} / 100 ({})\n\n",
        response.plagiarism_score,
        band.label()
    ));
    md.push_str(&format!(
        "Fragments checked: {} | Candidate sources: {} | Matches: {}\n\n",
        result.fragment_count,
        result.candidate_count,
        result.evidence.len()
    ));

    md.push_str("## Evidence\n\n");
    if result.evidence.is_empty() {
        md.push_str("No matching sources found.\n\n");
    } else {
        md.push_str("| # | Similarity | Source | Fragment |\n");
        md.push_str("|---|---|---|---|\n");
        for (i, e) in result.evidence.iter().enumerate() {
            md.push_str(&format!(
                "| {} | {:.4} | {} | {} |\n",
                i + 1,
                e.similarity,
                escape_cell(&e.url),
                escape_cell(&clip(&e.fragment, 120))
            ));
        }
        md.push('\n');
    }

    if !result.warnings.is_empty() {
        md.push_str("## Warnings\n\n");
        for w in &result.warnings {
            md.push_str(&format!("- `{}` {}\n", w.code, w.message));
        }
        md.push('\n');
    }

    md.push_str("## Suggestion\n\n");
    md.push_str(&response.rewrite_suggestion);
    md.push('\n');
    if let Some(text) = response.rewritten_text.as_deref() {
        md.push_str("\n### Suggested rewrite\n\n");
        md.push_str(text.trim());
        md.push('\n');
    }

    md
}
