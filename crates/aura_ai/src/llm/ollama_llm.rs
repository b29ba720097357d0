use std::time::Duration;

use aura_core::error::{codes, AppError};
use serde::{Deserialize, Serialize};

use super::Llm;
use crate::ollama::OllamaClient;

#[derive(Debug, Clone)]
pub struct OllamaLlm {
    client: OllamaClient,
    temperature: f32,
    max_tokens: u32,
}

impl OllamaLlm {
    pub fn new(client: OllamaClient) -> Self {
        Self {
            client,
            temperature: 0.35,
            max_tokens: 400,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Debug, Clone, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Clone, Deserialize)]
struct GenerateResponse {
    response: String,
}

impl Llm for OllamaLlm {
    fn generate(&self, model: &str, prompt: &str) -> Result<String, AppError> {
        let req = GenerateRequest {
            model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: self.temperature,
                num_predict: self.max_tokens,
            },
        };
        let body = serde_json::to_value(req).map_err(|e| {
            AppError::new(codes::REWRITE_FAILED, "Failed to encode generate request")
                .with_details(e.to_string())
        })?;

        let resp = ureq::post(&self.client.endpoint("api/generate"))
            .timeout(Duration::from_secs(60))
            .send_json(body);

        match resp {
            Ok(r) if r.status() == 200 => {
                let v: GenerateResponse = r.into_json().map_err(|e| {
                    AppError::new(codes::REWRITE_FAILED, "Failed to decode generate response")
                        .with_details(e.to_string())
                })?;
                let text = v.response.trim();
                if text.is_empty() {
                    return Err(AppError::new(codes::REWRITE_FAILED, "Generate response was empty"));
                }
                Ok(text.to_string())
            }
            Ok(r) => Err(AppError::new(codes::REWRITE_FAILED, "Generate request failed")
                .with_details(format!("status={}", r.status()))),
            Err(ureq::Error::Status(status, _)) => {
                Err(AppError::new(codes::REWRITE_FAILED, "Generate request failed")
                    .with_details(format!("status={status}")))
            }
            Err(e) => Err(AppError::new(codes::REWRITE_FAILED, "Failed to call generate endpoint")
                .with_details(e.to_string())
                .with_retryable(true)),
        }
    }
}
