//! Offline lead-sentence backend.
//!
//! Answers a summary prompt with the first sentences of the supplied text,
//! so the agent can run without any completion service.

use regex::Regex;

use crate::llm::completion::{CompletionBackend, CompletionFuture, CompletionRequest};
use crate::llm::error::CompletionError;

/// Number of sentences kept by default.
pub const DEFAULT_LEAD_SENTENCES: usize = 2;

/// Backend returning the leading sentences of the prompt body.
pub struct ExtractiveBackend {
    sentence: Regex,
    sentences: usize,
}

impl ExtractiveBackend {
    /// Create a backend keeping [`DEFAULT_LEAD_SENTENCES`] sentences.
    ///
    /// # Errors
    /// Returns an error if the sentence pattern fails to compile.
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            sentence: Regex::new(r"[^.!?]+(?:[.!?]+|$)")?,
            sentences: DEFAULT_LEAD_SENTENCES,
        })
    }

    /// Keep `sentences` sentences instead of the default.
    #[must_use]
    pub fn with_sentences(mut self, sentences: usize) -> Self {
        self.sentences = sentences.max(1);
        self
    }

    /// Leading sentences of `text`, joined by single spaces.
    #[must_use]
    pub fn lead(&self, text: &str) -> String {
        self.sentence
            .find_iter(text)
            .map(|m| m.as_str().split_whitespace().collect::<Vec<_>>().join(" "))
            .filter(|sentence| !sentence.is_empty())
            .take(self.sentences)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl CompletionBackend for ExtractiveBackend {
    fn complete(&self, request: CompletionRequest) -> CompletionFuture<'_> {
        let body = prompt_body(&request.prompt);
        let lead = self.lead(body);
        Box::pin(async move {
            if lead.is_empty() {
                Err(CompletionError::MalformedResponse(
                    "prompt carries no sentence to extract".to_string(),
                ))
            } else {
                Ok(lead)
            }
        })
    }

    fn name(&self) -> &'static str {
        "extractive"
    }
}

/// Text after the prompt's instruction header, or the whole prompt.
fn prompt_body(prompt: &str) -> &str {
    prompt
        .split_once("\n\n")
        .map_or(prompt, |(_, body)| body)
}
