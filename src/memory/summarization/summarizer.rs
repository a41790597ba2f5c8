//! Two-sentence summarization of chunks.
//!
//! Failures never reach the caller: a failed completion becomes an empty
//! string, and an empty completion becomes [`SUMMARY_FAILED`].

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::llm::completion::{CompletionBackend, CompletionRequest};
use crate::llm::error::CompletionError;
use crate::memory::core::config::LlmConfig;

/// Summary stored when no usable completion came back.
pub const SUMMARY_FAILED: &str = "Summary generation failed.";

/// Build the summary prompt for `text`.
#[must_use]
pub fn summary_prompt(text: &str) -> String {
    format!("Please provide a two-sentence summary of the following text:\n\n{text}")
}

/// Summarization client over a completion backend.
pub struct Summarizer {
    backend: Arc<dyn CompletionBackend>,
    model: String,
    max_tokens: u64,
    temperature: f64,
    timeout: Duration,
}

impl Summarizer {
    /// Create a summarizer using the model settings from `config`.
    #[must_use]
    pub fn new(config: &LlmConfig, backend: Arc<dyn CompletionBackend>) -> Self {
        Self {
            backend,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            timeout: config.timeout(),
        }
    }

    /// Override the per-call timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run one completion, bounded by the timeout.
    ///
    /// # Errors
    /// Returns the backend error, or [`CompletionError::Timeout`] when the
    /// call outlives the timeout.
    pub async fn try_complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let request = CompletionRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        tokio::time::timeout(self.timeout, self.backend.complete(request))
            .await
            .map_err(|_| CompletionError::Timeout)?
            .map(|text| text.trim().to_string())
    }

    /// Run one completion; any failure is logged and yields an empty string.
    pub async fn complete(&self, prompt: &str) -> String {
        match self.try_complete(prompt).await {
            Ok(text) => text,
            Err(err) => {
                warn!(backend = self.backend.name(), %err, "Completion call failed");
                String::new()
            }
        }
    }

    /// Summarize `text` in two sentences.
    ///
    /// Always returns non-empty text.
    pub async fn summarize(&self, text: &str) -> String {
        let summary = self.complete(&summary_prompt(text)).await;
        if summary.is_empty() {
            debug!("Falling back to sentinel summary");
            SUMMARY_FAILED.to_string()
        } else {
            summary
        }
    }
}
