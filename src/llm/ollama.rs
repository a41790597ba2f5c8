//! Ollama completion backend through Rig.

use reqwest::Client as ReqwestClient;
use rig::client::CompletionClient;
use rig::completion::CompletionModel;
use rig::message::AssistantContent;
use rig::providers::ollama;
use tracing::debug;

use crate::llm::completion::{CompletionBackend, CompletionFuture, CompletionRequest};
use crate::llm::error::CompletionError;
use crate::memory::core::config::LlmConfig;
use crate::memory::core::errors::{MemoryError, MemoryResult};

/// Completion backend bound to one Ollama model.
///
/// The model is fixed at construction; the `model` field of incoming
/// requests is only logged.
pub struct OllamaBackend {
    model: ollama::CompletionModel,
}

impl OllamaBackend {
    /// Create a backend from the completion settings.
    ///
    /// # Errors
    /// Returns an error if the Ollama client cannot be built.
    pub fn new(config: &LlmConfig) -> MemoryResult<Self> {
        let builder = ollama::Client::<ReqwestClient>::builder().api_key(rig::client::Nothing);
        let builder = if let Some(base_url) = &config.base_url {
            builder.base_url(base_url)
        } else {
            builder
        };
        let client = builder.build().map_err(MemoryError::from)?;
        let model = client.completion_model(config.model.clone());

        Ok(Self { model })
    }

    async fn send(&self, request: CompletionRequest) -> Result<String, CompletionError> {
        debug!(model = %request.model, "Sending Ollama completion");

        let completion = self
            .model
            .completion_request(request.prompt)
            .temperature(request.temperature)
            .max_tokens_opt(Some(request.max_tokens))
            .build();

        let response = self
            .model
            .completion(completion)
            .await
            .map_err(map_rig_error)?;

        Ok(extract_text(&response.choice))
    }
}

impl CompletionBackend for OllamaBackend {
    fn complete(&self, request: CompletionRequest) -> CompletionFuture<'_> {
        Box::pin(self.send(request))
    }

    fn name(&self) -> &'static str {
        "ollama"
    }
}

/// Map a Rig completion failure onto [`CompletionError`].
fn map_rig_error(err: rig::completion::CompletionError) -> CompletionError {
    use rig::completion::CompletionError as RigError;
    use rig::http_client::Error as HttpError;

    match err {
        RigError::JsonError(err) => CompletionError::MalformedResponse(err.to_string()),
        RigError::ResponseError(message) => CompletionError::MalformedResponse(message),
        RigError::HttpError(
            HttpError::InvalidStatusCode(status)
            | HttpError::InvalidStatusCodeWithMessage(status, _),
        ) => CompletionError::from_status(status.as_u16(), None),
        RigError::HttpError(HttpError::Instance(source)) => source
            .downcast_ref::<reqwest::Error>()
            .map_or_else(
                || CompletionError::Unavailable(source.to_string()),
                CompletionError::from_transport,
            ),
        other => CompletionError::Unavailable(other.to_string()),
    }
}

/// Extract text from assistant response.
fn extract_text(choice: &rig::OneOrMany<AssistantContent>) -> String {
    let mut out = String::new();
    for content in choice.iter() {
        if let AssistantContent::Text(text) = content {
            out.push_str(&text.text);
        }
    }
    out
}
