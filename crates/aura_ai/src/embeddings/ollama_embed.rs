use std::time::Duration;

use aura_core::domain::Embedding;
use aura_core::error::AppError;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{clip_input, Embedder};
use crate::ollama::OllamaClient;

pub const DEFAULT_MODEL: &str = "all-minilm";
const MAX_INPUT_BYTES: usize = 12_000;

#[derive(Debug, Clone)]
pub struct OllamaEmbedder {
    client: OllamaClient,
    model: String,
    timeout: Duration,
}

impl OllamaEmbedder {
    pub fn new(client: OllamaClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Clone, Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: Vec<&'a str>,
}

#[derive(Debug, Clone, Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

fn check_response(expected: usize, embeddings: &[Embedding]) -> Result<(), AppError> {
    if embeddings.len() != expected {
        return Err(AppError::scoring_unavailable("Embeddings response count mismatch")
            .with_details(format!("expected={expected}; got={}", embeddings.len())));
    }
    let Some(first) = embeddings.first() else {
        return Ok(());
    };
    if first.is_empty() {
        return Err(AppError::scoring_unavailable("Embeddings response was empty"));
    }
    if let Some(bad) = embeddings.iter().position(|e| e.len() != first.len()) {
        return Err(AppError::scoring_unavailable("Embeddings response dims mismatch")
            .with_details(format!("index={bad}; expected={}; got={}", first.len(), embeddings[bad].len())));
    }
    Ok(())
}

impl Embedder for OllamaEmbedder {
    fn model(&self) -> &str {
        &self.model
    }

    fn embed(&self, input: &str) -> Result<Embedding, AppError> {
        let mut out = self.embed_batch(&[input])?;
        out.pop()
            .ok_or_else(|| AppError::scoring_unavailable("Embeddings response was empty"))
    }

    fn embed_batch(&self, inputs: &[&str]) -> Result<Vec<Embedding>, AppError> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }
        // Ollama rejects empty prompts; a single space embeds as "nothing".
        let input: Vec<&str> = inputs
            .iter()
            .map(|t| if t.is_empty() { " " } else { clip_input(t, MAX_INPUT_BYTES) })
            .collect();

        debug!(model = %self.model, count = input.len(), "requesting embeddings");
        let req = EmbedRequest {
            model: &self.model,
            input,
        };
        let body = serde_json::to_value(req).map_err(|e| {
            AppError::scoring_unavailable("Failed to encode embeddings request")
                .with_details(e.to_string())
        })?;

        let resp = ureq::post(&self.client.endpoint("api/embed"))
            .timeout(self.timeout)
            .send_json(body);

        match resp {
            Ok(r) if r.status() == 200 => {
                let v: EmbedResponse = r.into_json().map_err(|e| {
                    AppError::scoring_unavailable("Failed to decode embeddings response")
                        .with_details(e.to_string())
                })?;
                check_response(inputs.len(), &v.embeddings)?;
                Ok(v.embeddings)
            }
            Ok(r) => Err(AppError::scoring_unavailable("Embeddings request failed")
                .with_details(format!("status={}", r.status()))),
            Err(ureq::Error::Status(status, _)) => {
                Err(AppError::scoring_unavailable("Embeddings request failed")
                    .with_details(format!("status={status}")))
            }
            Err(e) => Err(AppError::scoring_unavailable("Failed to call embeddings endpoint")
                .with_details(e.to_string())
                .with_retryable(true)),
        }
    }
}
