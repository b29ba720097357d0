use std::fs;
use std::path::{Path, PathBuf};

use aura_ai::embeddings::hashed::DEFAULT_DIMS;
use aura_ai::embeddings::ollama_embed::DEFAULT_MODEL;
use aura_ai::ollama::DEFAULT_BASE_URL;
use aura_ai::search::scrape::DEFAULT_SNIPPET_MAX_CHARS;
use aura_core::config::{ScoringConfig, Threshold};
use aura_core::error::{codes, AppError};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_FILE: &str = "aura.toml";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EmbedBackend {
    Ollama,
    Hashed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SearchSettings {
    pub serpapi_api_key: Option<String>,
    /// Scrape a results page when SerpAPI is missing or comes back empty.
    pub fallback_enabled: bool,
    pub snippet_max_chars: usize,
    pub timeout_secs: u64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            serpapi_api_key: None,
            fallback_enabled: true,
            snippet_max_chars: DEFAULT_SNIPPET_MAX_CHARS,
            timeout_secs: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EmbedSettings {
    pub backend: EmbedBackend,
    pub ollama_url: String,
    pub model: String,
    pub hashed_dims: usize,
    /// Entries kept by the in-process embedding cache (0 disables it).
    pub cache_capacity: usize,
}

impl Default for EmbedSettings {
    fn default() -> Self {
        Self {
            backend: EmbedBackend::Ollama,
            ollama_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            hashed_dims: DEFAULT_DIMS,
            cache_capacity: 4096,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RewriteSettings {
    pub enabled: bool,
    pub model: String,
}

impl Default for RewriteSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            model: "llama3.2".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub scoring: ScoringConfig,
    pub search: SearchSettings,
    pub embed: EmbedSettings,
    pub rewrite: RewriteSettings,
    /// Whole-check deadline; 0 means none.
    pub check_timeout_secs: u64,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            scoring: ScoringConfig::default(),
            search: SearchSettings::default(),
            embed: EmbedSettings::default(),
            rewrite: RewriteSettings::default(),
            check_timeout_secs: 60,
            log_filter: "info".to_string(),
        }
    }
}

fn invalid(message: impl Into<String>, details: impl Into<String>) -> AppError {
    AppError::new(codes::CONFIG_INVALID, message).with_details(details)
}

impl Settings {
    pub fn from_toml_str(raw: &str) -> Result<Self, AppError> {
        toml::from_str(raw).map_err(|e| invalid("Failed to parse settings", e.to_string()))
    }

    pub fn from_file(path: &Path) -> Result<Self, AppError> {
        let raw = fs::read_to_string(path).map_err(|e| {
            AppError::new(codes::CONFIG_READ_FAILED, "Failed to read settings file")
                .with_details(format!("path={}; err={e}", path.display()))
        })?;
        Self::from_toml_str(&raw).map_err(|e| {
            let details = e.details.clone().unwrap_or_default();
            e.with_details(format!("path={}; err={details}", path.display()))
        })
    }

    /// Defaults, then the settings file, then `.env`, then process environment.
    ///
    /// An explicit `path` must exist; otherwise `aura.toml` in the working directory is used
    /// when present.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let mut settings = match path {
            Some(p) => Self::from_file(p)?,
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    Self::from_file(&default_path)?
                } else {
                    Self::default()
                }
            }
        };

        // A missing .env file is normal.
        let _ = dotenvy::dotenv();
        settings.apply_env(|key| std::env::var(key).ok())?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<(), AppError> {
        if let Some(key) = lookup("SERPAPI_API_KEY") {
            self.search.serpapi_api_key = Some(key);
        }
        if let Some(raw) = lookup("AURA_THRESHOLD") {
            let value: f32 = raw
                .trim()
                .parse()
                .map_err(|_| invalid("AURA_THRESHOLD is not a number", format!("value={raw}")))?;
            self.scoring.threshold = Threshold::new(value)?;
        }
        if let Some(url) = lookup("AURA_OLLAMA_URL") {
            self.embed.ollama_url = url;
        }
        if let Some(model) = lookup("AURA_EMBED_MODEL") {
            self.embed.model = model;
        }
        if let Some(filter) = lookup("AURA_LOG") {
            self.log_filter = filter;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), AppError> {
        self.scoring.validate()?;
        if self.search.snippet_max_chars == 0 {
            return Err(invalid("search.snippet_max_chars must be greater than zero", "value=0"));
        }
        if self.embed.backend == EmbedBackend::Hashed && self.embed.hashed_dims == 0 {
            return Err(invalid("embed.hashed_dims must be greater than zero", "value=0"));
        }
        if self.embed.model.trim().is_empty() {
            return Err(invalid("embed.model must not be empty", "value=\"\""));
        }
        Ok(())
    }
}
