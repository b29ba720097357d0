use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use aura_ai::embeddings::{CachedEmbedder, Embedder, HashedEmbedder, OllamaEmbedder};
use aura_ai::llm::OllamaLlm;
use aura_ai::ollama::OllamaClient;
use aura_ai::rewrite::RewriteAdvisor;
use aura_ai::search::{FallbackChain, ScrapeProvider, SerpApiProvider, SourceProvider};
use aura_ai::{run_check, CheckContext};
use aura_core::domain::CheckResult;
use aura_core::error::{codes, AppError};
use aura_core::report::{CheckRequest, CheckResponse};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::{debug, info};

pub mod logging;
pub mod serve;
pub mod settings;

use settings::{EmbedBackend, Settings};

#[derive(Debug, serde::Serialize)]
pub struct AiHealthStatus {
    pub ok: bool,
    pub message: String,
    pub build: String,
}

/// Crate version plus the git commit embedded at build time, when one was available.
pub fn build_info() -> String {
    match option_env!("GIT_COMMIT_HASH") {
        Some(hash) => format!("{} ({})", env!("CARGO_PKG_VERSION"), &hash[..hash.len().min(12)]),
        None => env!("CARGO_PKG_VERSION").to_string(),
    }
}

/// Everything a check needs, built once per process and shared across requests.
pub struct AppState {
    pub settings: Settings,
    pub embedder: Arc<dyn Embedder>,
    pub provider: Arc<dyn SourceProvider>,
    pub advisor: RewriteAdvisor,
}

/// Internal result plus the boundary response derived from it.
#[derive(Debug, Clone)]
pub struct CheckOutcome {
    pub result: CheckResult,
    pub response: CheckResponse,
}

fn build_embedder(settings: &Settings) -> Result<Arc<dyn Embedder>, AppError> {
    let embed = &settings.embed;
    let base: Arc<dyn Embedder> = match embed.backend {
        EmbedBackend::Ollama => {
            let client = OllamaClient::new(&embed.ollama_url)?;
            Arc::new(OllamaEmbedder::new(client, embed.model.clone()))
        }
        EmbedBackend::Hashed => Arc::new(HashedEmbedder::new(embed.hashed_dims)?),
    };
    if embed.cache_capacity == 0 {
        return Ok(base);
    }
    Ok(Arc::new(CachedEmbedder::new(base, embed.cache_capacity)))
}

fn build_provider(settings: &Settings) -> Arc<dyn SourceProvider> {
    let search = &settings.search;
    let timeout = Duration::from_secs(search.timeout_secs.max(1));
    let mut providers: Vec<Box<dyn SourceProvider>> = vec![Box::new(
        SerpApiProvider::new(search.serpapi_api_key.clone()).with_timeout(timeout),
    )];
    if search.fallback_enabled {
        providers.push(Box::new(ScrapeProvider::new(search.snippet_max_chars, timeout)));
    }
    Arc::new(FallbackChain::new(providers))
}

fn build_advisor(settings: &Settings) -> Result<RewriteAdvisor, AppError> {
    if !settings.rewrite.enabled {
        return Ok(RewriteAdvisor::advice_only());
    }
    let client = OllamaClient::new(&settings.embed.ollama_url)?;
    Ok(RewriteAdvisor::with_generator(
        Arc::new(OllamaLlm::new(client)),
        settings.rewrite.model.clone(),
    ))
}

impl AppState {
    pub fn from_settings(settings: Settings) -> Result<Self, AppError> {
        settings.validate()?;
        let embedder = build_embedder(&settings)?;
        let provider = build_provider(&settings);
        let advisor = build_advisor(&settings)?;
        debug!(
            model = embedder.model(),
            provider = provider.name(),
            rewrite = settings.rewrite.enabled,
            "app state ready"
        );
        Ok(Self {
            settings,
            embedder,
            provider,
            advisor,
        })
    }

    /// Assemble state from explicit capabilities, bypassing the network-backed defaults.
    pub fn with_parts(
        settings: Settings,
        embedder: Arc<dyn Embedder>,
        provider: Arc<dyn SourceProvider>,
        advisor: RewriteAdvisor,
    ) -> Self {
        Self {
            settings,
            embedder,
            provider,
            advisor,
        }
    }

    pub fn replace_provider(&mut self, provider: Arc<dyn SourceProvider>) {
        self.provider = provider;
    }

    fn context(&self) -> CheckContext<'_> {
        CheckContext {
            embedder: self.embedder.as_ref(),
            provider: self.provider.as_ref(),
            scoring: &self.settings.scoring,
        }
    }

    pub fn deadline(&self) -> Option<Duration> {
        (self.settings.check_timeout_secs > 0).then(|| Duration::from_secs(self.settings.check_timeout_secs))
    }
}

pub fn check_outcome(state: &AppState, request: &CheckRequest) -> Result<CheckOutcome, AppError> {
    if request.text.trim().is_empty() {
        return Err(AppError::new(codes::INPUT_EMPTY, "Input text is empty"));
    }

    let result = run_check(state.context(), request)?;
    let suggestion = state.advisor.suggest(result.plagiarism_score, &request.text);
    info!(band = ?suggestion.band, rewritten = suggestion.rewritten_text.is_some(), "advice ready");

    let response = CheckResponse::from_result(&result, suggestion.advice)
        .with_rewritten_text(suggestion.rewritten_text);
    Ok(CheckOutcome { result, response })
}

/// Boundary command: `{text, top_k}` in, rounded response out.
pub fn check_text(state: &AppState, request: &CheckRequest) -> Result<CheckResponse, AppError> {
    check_outcome(state, request).map(|o| o.response)
}

/// Run a check on a worker thread and give up after `deadline`.
///
/// On timeout the worker is left to finish on its own and its result is discarded.
pub fn check_with_deadline(
    state: Arc<AppState>,
    request: CheckRequest,
    deadline: Duration,
) -> Result<CheckOutcome, AppError> {
    let (tx, rx) = mpsc::channel();
    thread::Builder::new()
        .name("aura-check".to_string())
        .spawn(move || {
            let _ = tx.send(check_outcome(&state, &request));
        })
        .map_err(|e| {
            AppError::scoring_unavailable("Failed to start check worker").with_details(e.to_string())
        })?;

    match rx.recv_timeout(deadline) {
        Ok(outcome) => outcome,
        Err(mpsc::RecvTimeoutError::Timeout) => Err(AppError::new(
            codes::CHECK_TIMED_OUT,
            "Check did not finish before the deadline",
        )
        .with_details(format!("deadline_ms={}", deadline.as_millis()))
        .with_retryable(true)),
        Err(mpsc::RecvTimeoutError::Disconnected) => {
            Err(AppError::scoring_unavailable("Check worker stopped without a result"))
        }
    }
}

/// Check with the configured deadline, if any.
pub fn run_request(state: &Arc<AppState>, request: CheckRequest) -> Result<CheckOutcome, AppError> {
    match state.deadline() {
        Some(d) => check_with_deadline(Arc::clone(state), request, d),
        None => check_outcome(state, &request),
    }
}

pub fn ai_health_check(settings: &Settings) -> Result<AiHealthStatus, AppError> {
    let client = OllamaClient::new(&settings.embed.ollama_url)?;
    client.health_check()?;
    Ok(AiHealthStatus {
        ok: true,
        message: format!("Ollama reachable at {}", client.base_url()),
        build: build_info(),
    })
}

pub fn now_rfc3339_utc() -> Result<String, AppError> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(|e| AppError::new(codes::TIME_FORMAT_FAILED, "Failed to format time").with_details(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use aura_ai::search::{RawCandidate, StaticProvider};
    use pretty_assertions::assert_eq;

    fn hashed_state(candidates: Vec<RawCandidate>) -> AppState {
        AppState::with_parts(
            Settings::default(),
            Arc::new(HashedEmbedder::default()),
            Arc::new(StaticProvider::new(candidates)),
            RewriteAdvisor::advice_only(),
        )
    }

    #[test]
    fn empty_input_is_rejected_at_the_boundary() {
        let state = hashed_state(vec![]);
        let err = check_text(&state, &CheckRequest::new("  \n ")).expect_err("should fail");
        assert_eq!(err.code, codes::INPUT_EMPTY);
    }

    #[test]
    fn response_carries_advice_for_band() {
        let state = hashed_state(vec![RawCandidate::new(
            "https://example.com/water",
            "Water boils at 100 degrees Celsius.",
        )]);
        let resp = check_text(&state, &CheckRequest::new("Water boils at 100 degrees Celsius.")).expect("check");
        assert_eq!(resp.plagiarism_score, 100.0);
        assert_eq!(resp.sources.len(), 1);
        assert!(resp.rewrite_suggestion.contains("heavily plagiarized"));
        assert_eq!(resp.rewritten_text, None);
    }

    #[test]
    fn hashed_backend_builds_without_network() {
        let mut settings = Settings::default();
        settings.embed.backend = EmbedBackend::Hashed;
        settings.embed.hashed_dims = 32;
        let state = AppState::from_settings(settings).expect("state");
        assert_eq!(state.embedder.model(), "hashed-32");
    }

    #[test]
    fn remote_ollama_url_is_refused() {
        let mut settings = Settings::default();
        settings.embed.ollama_url = "http://10.0.0.5:11434".to_string();
        let err = AppState::from_settings(settings).err().expect("should fail");
        assert_eq!(err.code, codes::AI_REMOTE_NOT_ALLOWED);
    }

    #[test]
    fn build_info_starts_with_crate_version() {
        assert!(build_info().starts_with(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn timestamp_is_rfc3339() {
        let ts = now_rfc3339_utc().expect("time");
        assert!(ts.contains('T'));
        assert!(ts.ends_with('Z'));
    }
}
