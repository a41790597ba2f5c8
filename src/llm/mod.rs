//! Completion backends used to summarize chunks.
//!
//! - `completion`: the [`CompletionBackend`] trait and request type
//! - `error`: the closed [`CompletionError`] set
//! - `openai`: OpenAI-compatible chat completions over reqwest
//! - `ollama`: local Ollama models through Rig
//! - `extractive`: offline lead-sentence extraction

pub mod completion;
pub mod error;
pub mod extractive;
pub mod ollama;
pub mod openai;

#[cfg(test)]
pub(crate) mod mock;

use std::sync::Arc;

pub use completion::{CompletionBackend, CompletionFuture, CompletionRequest};
pub use error::CompletionError;
pub use extractive::ExtractiveBackend;
pub use ollama::OllamaBackend;
pub use openai::OpenAiChatBackend;

use crate::memory::core::config::{LlmConfig, LlmProvider};
use crate::memory::core::errors::{MemoryError, MemoryResult};

/// Build the backend selected by `config.provider`.
///
/// # Errors
/// Returns an error if the selected backend cannot be constructed.
pub fn build_backend(config: &LlmConfig) -> MemoryResult<Arc<dyn CompletionBackend>> {
    let backend: Arc<dyn CompletionBackend> = match config.provider {
        LlmProvider::OpenAi => Arc::new(OpenAiChatBackend::new(config)?),
        LlmProvider::Ollama => Arc::new(OllamaBackend::new(config)?),
        LlmProvider::Extractive => Arc::new(
            ExtractiveBackend::new().map_err(|err| MemoryError::InvalidConfig(err.to_string()))?,
        ),
    };
    tracing::info!(backend = backend.name(), model = %config.model, "Completion backend ready");
    Ok(backend)
}
