pub mod check;
pub mod embeddings;
pub mod llm;
pub mod ollama;
pub mod rewrite;
pub mod search;

pub use check::{run_check, CheckContext};
