pub mod advice;
pub mod config;
pub mod domain;
pub mod error;
pub mod report;
pub mod score;
pub mod segment;
pub mod select;
pub mod similarity;

#[cfg(test)]
mod tests {
    use super::error::{codes, AppError};

    #[test]
    fn app_error_is_structured() {
        let err = AppError::scoring_unavailable("model down")
            .with_details("status=503")
            .with_retryable(true);
        assert_eq!(err.code, codes::SCORING_UNAVAILABLE);
        assert_eq!(err.message, "model down");
        assert!(err.retryable);
        assert!(err.is(codes::SCORING_UNAVAILABLE));
        assert_eq!(err.to_string(), "[SCORING_UNAVAILABLE] model down (status=503)");
    }

    #[test]
    fn app_error_serializes_for_the_boundary() {
        let err = AppError::new(codes::INPUT_EMPTY, "Empty text input");
        let json = serde_json::to_value(&err).expect("json");
        assert_eq!(json["code"], "INPUT_EMPTY");
        assert_eq!(json["retryable"], false);
        assert!(json["details"].is_null());
    }

    #[test]
    fn error_codes_are_unique_and_self_named() {
        let all = [
            ("INPUT_EMPTY", codes::INPUT_EMPTY),
            ("INPUT_READ_FAILED", codes::INPUT_READ_FAILED),
            ("REQUEST_INVALID", codes::REQUEST_INVALID),
            ("SCORING_UNAVAILABLE", codes::SCORING_UNAVAILABLE),
            ("SEARCH_FAILED", codes::SEARCH_FAILED),
            ("CANDIDATE_MISSING_URL", codes::CANDIDATE_MISSING_URL),
            ("CANDIDATE_MISSING_SNIPPET", codes::CANDIDATE_MISSING_SNIPPET),
            ("REWRITE_FAILED", codes::REWRITE_FAILED),
            ("CONFIG_INVALID", codes::CONFIG_INVALID),
            ("CONFIG_READ_FAILED", codes::CONFIG_READ_FAILED),
            ("CHECK_TIMED_OUT", codes::CHECK_TIMED_OUT),
            ("TIME_FORMAT_FAILED", codes::TIME_FORMAT_FAILED),
            ("AI_REMOTE_NOT_ALLOWED", codes::AI_REMOTE_NOT_ALLOWED),
            ("AI_OLLAMA_UNREACHABLE", codes::AI_OLLAMA_UNREACHABLE),
            ("AI_OLLAMA_UNHEALTHY", codes::AI_OLLAMA_UNHEALTHY),
        ];
        let mut seen = std::collections::HashSet::new();
        for (name, code) in all {
            assert_eq!(name, code);
            assert!(seen.insert(code), "duplicate code {code}");
        }
    }
}
