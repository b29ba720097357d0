use std::time::Duration;

use aura_core::error::{codes, AppError};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:11434";

#[derive(Debug, Clone)]
pub struct OllamaClient {
    base_url: String,
}

impl OllamaClient {
    /// Create a client for a local Ollama daemon. Only `127.0.0.1` is accepted: input text
    /// is sent to the model verbatim and must not leave the machine through this path.
    pub fn new(base_url: &str) -> Result<Self, AppError> {
        let base_url = base_url.trim_end_matches('/').to_string();

        let port_ok = match base_url.strip_prefix("http://127.0.0.1:") {
            Some(port) => port.parse::<u16>().map(|p| p != 0).unwrap_or(false),
            None => base_url == "http://127.0.0.1",
        };
        if !port_ok {
            return Err(AppError::new(
                codes::AI_REMOTE_NOT_ALLOWED,
                "Ollama base URL must be localhost (127.0.0.1)",
            )
            .with_details(format!("base_url={base_url}")));
        }

        Ok(Self { base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub fn health_check(&self) -> Result<(), AppError> {
        let resp = ureq::get(&self.endpoint("api/tags"))
            .timeout(Duration::from_millis(800))
            .call();

        match resp {
            Ok(r) if r.status() == 200 => Ok(()),
            Ok(r) => Err(
                AppError::new(codes::AI_OLLAMA_UNHEALTHY, "Ollama health check failed")
                    .with_details(format!("status={}", r.status())),
            ),
            Err(ureq::Error::Status(status, _)) => Err(AppError::new(
                codes::AI_OLLAMA_UNHEALTHY,
                "Ollama health check failed",
            )
            .with_details(format!("status={status}"))),
            Err(e) => Err(AppError::new(
                codes::AI_OLLAMA_UNREACHABLE,
                "Failed to reach Ollama on 127.0.0.1",
            )
            .with_details(e.to_string())
            .with_retryable(true)),
        }
    }
}
