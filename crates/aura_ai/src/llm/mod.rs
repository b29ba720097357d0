use aura_core::error::AppError;

pub mod ollama_llm;

pub use ollama_llm::OllamaLlm;

/// Text generation capability, consumed as a black box.
pub trait Llm: Send + Sync {
    fn generate(&self, model: &str, prompt: &str) -> Result<String, AppError>;
}
