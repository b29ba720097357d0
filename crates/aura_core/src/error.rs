use serde::{Deserialize, Serialize};
use std::fmt;

/// Error codes shared by every layer. Callers match on these, never on messages.
pub mod codes {
    pub const INPUT_EMPTY: &str = "INPUT_EMPTY";
    pub const INPUT_READ_FAILED: &str = "INPUT_READ_FAILED";
    pub const REQUEST_INVALID: &str = "REQUEST_INVALID";
    pub const SCORING_UNAVAILABLE: &str = "SCORING_UNAVAILABLE";
    pub const SEARCH_FAILED: &str = "SEARCH_FAILED";
    pub const CANDIDATE_MISSING_URL: &str = "CANDIDATE_MISSING_URL";
    pub const CANDIDATE_MISSING_SNIPPET: &str = "CANDIDATE_MISSING_SNIPPET";
    pub const REWRITE_FAILED: &str = "REWRITE_FAILED";
    pub const CONFIG_INVALID: &str = "CONFIG_INVALID";
    pub const CONFIG_READ_FAILED: &str = "CONFIG_READ_FAILED";
    pub const CHECK_TIMED_OUT: &str = "CHECK_TIMED_OUT";
    pub const TIME_FORMAT_FAILED: &str = "TIME_FORMAT_FAILED";
    pub const AI_REMOTE_NOT_ALLOWED: &str = "AI_REMOTE_NOT_ALLOWED";
    pub const AI_OLLAMA_UNREACHABLE: &str = "AI_OLLAMA_UNREACHABLE";
    pub const AI_OLLAMA_UNHEALTHY: &str = "AI_OLLAMA_UNHEALTHY";
}

/// Single structured error shape used across crates and exposed at the service boundary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppError {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
    pub retryable: bool,
}

impl AppError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            retryable: false,
        }
    }

    /// Shorthand for the "could not measure" condition. A check that fails this way must
    /// never be reported as a score of 0.
    pub fn scoring_unavailable(message: impl Into<String>) -> Self {
        Self::new(codes::SCORING_UNAVAILABLE, message)
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_retryable(mut self, retryable: bool) -> Self {
        self.retryable = retryable;
        self
    }

    pub fn is(&self, code: &str) -> bool {
        self.code == code
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.details.as_deref() {
            Some(d) => write!(f, "[{}] {} ({d})", self.code, self.message),
            None => write!(f, "[{}] {}", self.code, self.message),
        }
    }
}

impl std::error::Error for AppError {}
