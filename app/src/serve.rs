//! Line-delimited JSON over stdio: one `CheckRequest` per input line, one reply per line.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use aura_core::error::{codes, AppError};
use aura_core::report::{CheckRequest, CheckResponse};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{run_request, AppState};

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ServeReply {
    Ok(CheckResponse),
    Error(AppError),
}

impl From<Result<CheckResponse, AppError>> for ServeReply {
    fn from(r: Result<CheckResponse, AppError>) -> Self {
        match r {
            Ok(resp) => ServeReply::Ok(resp),
            Err(e) => ServeReply::Error(e),
        }
    }
}

fn io_error(e: io::Error) -> AppError {
    AppError::new(codes::INPUT_READ_FAILED, "serve stream failed").with_details(e.to_string())
}

fn send(out: &mut impl Write, reply: &ServeReply) -> Result<(), AppError> {
    let json = serde_json::to_string(reply).map_err(|e| {
        AppError::new(codes::REQUEST_INVALID, "Failed to encode reply").with_details(e.to_string())
    })?;
    writeln!(out, "{json}").map_err(io_error)?;
    out.flush().map_err(io_error)
}

/// Answer one raw line. Malformed requests become `REQUEST_INVALID` replies.
pub fn handle_line(state: &Arc<AppState>, line: &str) -> ServeReply {
    let request: CheckRequest = match serde_json::from_str(line) {
        Ok(r) => r,
        Err(e) => {
            warn!(error = %e, "unparseable request line");
            return ServeReply::Error(
                AppError::new(codes::REQUEST_INVALID, "Request is not a valid check request")
                    .with_details(e.to_string()),
            );
        }
    };
    run_request(state, request).map(|o| o.response).into()
}

/// Serve until `input` is exhausted. Returns the number of replies written.
pub fn run<R: BufRead, W: Write>(state: Arc<AppState>, input: R, mut output: W) -> Result<usize, AppError> {
    let mut answered = 0usize;
    for line in input.lines() {
        let line = line.map_err(io_error)?;
        if line.trim().is_empty() {
            continue;
        }
        let reply = handle_line(&state, &line);
        debug!(ok = matches!(reply, ServeReply::Ok(_)), "request handled");
        send(&mut output, &reply)?;
        answered += 1;
    }
    info!(answered, "input closed; serve loop finished");
    Ok(answered)
}

pub fn run_stdio(state: Arc<AppState>) -> Result<usize, AppError> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    run(state, stdin.lock(), stdout.lock())
}

#[cfg(test)]
mod tests {
    use super::*;
    use aura_ai::embeddings::HashedEmbedder;
    use aura_ai::rewrite::RewriteAdvisor;
    use aura_ai::search::{RawCandidate, StaticProvider};
    use pretty_assertions::assert_eq;
    use serde_json::Value;

    use crate::settings::Settings;

    fn state() -> Arc<AppState> {
        Arc::new(AppState::with_parts(
            Settings::default(),
            Arc::new(HashedEmbedder::default()),
            Arc::new(StaticProvider::new(vec![RawCandidate::new(
                "https://cats.example",
                "Cats sleep most of the day.",
            )])),
            RewriteAdvisor::advice_only(),
        ))
    }

    #[test]
    fn one_reply_per_non_blank_line() {
        let input = "{\"text\":\"Cats sleep most of the day.\"}\n\n   \nnot json\n{\"text\":\"\"}\n";
        let mut out: Vec<u8> = Vec::new();
        let answered = run(state(), input.as_bytes(), &mut out).expect("serve");
        assert_eq!(answered, 3);

        let lines: Vec<Value> = String::from_utf8(out)
            .expect("utf8")
            .lines()
            .map(|l| serde_json::from_str(l).expect("json line"))
            .collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["ok"]["plagiarism_score"], Value::from(100.0));
        assert_eq!(lines[0]["ok"]["sources"][0]["url"], "https://cats.example");
        assert_eq!(lines[1]["error"]["code"], codes::REQUEST_INVALID);
        assert_eq!(lines[2]["error"]["code"], codes::INPUT_EMPTY);
    }
}
