//! Scripted completion backends for tests.

use std::sync::Mutex;

use crate::llm::completion::{CompletionBackend, CompletionFuture, CompletionRequest};
use crate::llm::error::CompletionError;

type Responder = dyn Fn(&CompletionRequest) -> Result<String, CompletionError> + Send + Sync;

/// Backend answering every request through a closure and recording calls.
pub(crate) struct MockBackend {
    responder: Box<Responder>,
    calls: Mutex<Vec<CompletionRequest>>,
}

impl MockBackend {
    pub(crate) fn new<F>(responder: F) -> Self
    where
        F: Fn(&CompletionRequest) -> Result<String, CompletionError> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Always answer with `text`.
    pub(crate) fn fixed(text: &str) -> Self {
        let text = text.to_string();
        Self::new(move |_| Ok(text.clone()))
    }

    /// Always fail with `err`.
    pub(crate) fn failing(err: CompletionError) -> Self {
        Self::new(move |_| Err(err.clone()))
    }

    /// Echo the first two sentences of the prompt body.
    pub(crate) fn echo_two_sentences() -> Self {
        Self::new(|request| {
            let body = request
                .prompt
                .split_once("\n\n")
                .map_or(request.prompt.as_str(), |(_, body)| body);
            let sentences: Vec<String> = body
                .split_inclusive('.')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .take(2)
                .map(ToString::to_string)
                .collect();
            Ok(sentences.join(" "))
        })
    }

    pub(crate) fn calls(&self) -> Vec<CompletionRequest> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

impl CompletionBackend for MockBackend {
    fn complete(&self, request: CompletionRequest) -> CompletionFuture<'_> {
        let result = (self.responder)(&request);
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(request);
        }
        Box::pin(async move { result })
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// Backend whose calls never complete.
pub(crate) struct StalledBackend;

impl CompletionBackend for StalledBackend {
    fn complete(&self, _request: CompletionRequest) -> CompletionFuture<'_> {
        Box::pin(std::future::pending())
    }

    fn name(&self) -> &'static str {
        "stalled"
    }
}
