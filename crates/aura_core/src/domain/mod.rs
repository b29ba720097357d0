use serde::{Deserialize, Serialize};

/// Dense vector for one fragment or one snippet. Dimension is fixed per embedder.
pub type Embedding = Vec<f32>;

/// A sentence-level span of the input text.
///
/// Notes:
/// - `text` is trimmed and never empty.
/// - `offset` is the byte offset of `text` inside the (newline-normalized) input, when known.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Fragment {
    pub text: String,
    pub offset: Option<usize>,
}

impl Fragment {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            offset: None,
        }
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }
}

/// A web document considered for comparison. `snippet` may be empty.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CandidateSource {
    pub url: String,
    pub snippet: String,
}

impl CandidateSource {
    pub fn new(url: impl Into<String>, snippet: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            snippet: snippet.into(),
        }
    }

    pub fn has_snippet(&self) -> bool {
        !self.snippet.trim().is_empty()
    }
}

/// An item paired with the embedding computed for it during one check.
#[derive(Debug, Clone, PartialEq)]
pub struct Encoded<T> {
    pub item: T,
    pub embedding: Embedding,
}

impl<T> Encoded<T> {
    pub fn new(item: T, embedding: Embedding) -> Self {
        Self { item, embedding }
    }
}

/// One fragment/source pair whose similarity met the threshold.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchEvidence {
    pub url: String,
    pub fragment: String,
    pub snippet: String,
    pub similarity: f32,
}

/// Outcome of one check. `evidence` is ordered by descending similarity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckResult {
    pub plagiarism_score: f64,
    pub evidence: Vec<MatchEvidence>,
    pub fragment_count: usize,
    pub candidate_count: usize,
    pub warnings: Vec<ValidationWarning>,
}

impl CheckResult {
    /// "No similarity found": score 0 and no evidence.
    pub fn empty(fragment_count: usize) -> Self {
        Self {
            plagiarism_score: 0.0,
            evidence: Vec::new(),
            fragment_count,
            candidate_count: 0,
            warnings: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationWarning {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
}

impl ValidationWarning {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}
