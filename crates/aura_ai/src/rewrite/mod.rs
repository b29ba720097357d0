use std::sync::Arc;

use aura_core::advice::SimilarityBand;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::llm::Llm;

mod prompts;

/// Band advice plus an optional generated rewrite.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RewriteSuggestion {
    pub band: SimilarityBand,
    pub advice: String,
    pub rewritten_text: Option<String>,
}

/// Maps a final score to advice and, when a generator is attached, asks it for a rewrite.
///
/// Generation only runs for bands that want one. Its failure is logged and leaves
/// `rewritten_text` empty; it never changes the score or the advice.
#[derive(Clone, Default)]
pub struct RewriteAdvisor {
    generator: Option<(Arc<dyn Llm>, String)>,
}

impl RewriteAdvisor {
    pub fn advice_only() -> Self {
        Self { generator: None }
    }

    pub fn with_generator(llm: Arc<dyn Llm>, model: impl Into<String>) -> Self {
        Self {
            generator: Some((llm, model.into())),
        }
    }

    pub fn suggest(&self, score: f64, text: &str) -> RewriteSuggestion {
        let band = SimilarityBand::for_score(score);
        let rewritten_text = match &self.generator {
            Some((llm, model)) if band.wants_rewrite() && !text.trim().is_empty() => {
                let prompt = prompts::rewrite_prompt(score, band.label(), text.trim());
                match llm.generate(model, &prompt) {
                    Ok(out) => Some(out),
                    Err(e) => {
                        warn!(error = %e, "rewrite generation failed");
                        None
                    }
                }
            }
            _ => None,
        };

        RewriteSuggestion {
            band,
            advice: band.advice().to_string(),
            rewritten_text,
        }
    }
}
