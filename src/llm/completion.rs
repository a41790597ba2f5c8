//! Completion capability abstraction.

use std::future::Future;
use std::pin::Pin;

use crate::llm::error::CompletionError;

/// Boxed future type for completion calls.
pub type CompletionFuture<'a> =
    Pin<Box<dyn Future<Output = Result<String, CompletionError>> + Send + 'a>>;

/// A single prompt sent to a completion backend.
#[derive(Clone, Debug, PartialEq)]
pub struct CompletionRequest {
    /// Model identifier.
    pub model: String,
    /// Prompt text, sent as one user message.
    pub prompt: String,
    /// Maximum output length in tokens.
    pub max_tokens: u64,
    /// Sampling temperature.
    pub temperature: f64,
}

/// Trait abstraction over text completion services.
pub trait CompletionBackend: Send + Sync {
    /// Run one request and return the generated text.
    ///
    /// # Errors
    /// Returns a [`CompletionError`] describing why no text was produced.
    fn complete(&self, request: CompletionRequest) -> CompletionFuture<'_>;

    /// Short backend name for logs.
    fn name(&self) -> &'static str;
}
