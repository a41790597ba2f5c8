//! OpenAI-compatible chat completions backend.
//!
//! Sends one user message to `POST {base_url}/chat/completions` with a
//! bearer credential and returns the first choice's message content.

use std::time::Duration;

use reqwest::Client;
use reqwest::header::RETRY_AFTER;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::llm::completion::{CompletionBackend, CompletionFuture, CompletionRequest};
use crate::llm::error::CompletionError;
use crate::memory::core::config::{API_KEY_ENV, LlmConfig};
use crate::memory::core::errors::{MemoryError, MemoryResult};

/// Default API base.
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Connection setup timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u64,
    temperature: f64,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// Chat completions client authenticated with an API key.
pub struct OpenAiChatBackend {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiChatBackend {
    /// Create a backend from the completion settings.
    ///
    /// # Errors
    /// Returns an error if the API key is missing, the base URL is invalid,
    /// or the HTTP client cannot be built.
    pub fn new(config: &LlmConfig) -> MemoryResult<Self> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| MemoryError::InvalidConfig(format!("{API_KEY_ENV} is not set")))?
            .to_string();

        let base_url = config
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_OPENAI_BASE_URL)
            .trim_end_matches('/')
            .to_string();
        Url::parse(&base_url)?;

        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            client,
            api_key,
            base_url,
        })
    }

    async fn send(&self, request: CompletionRequest) -> Result<String, CompletionError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatRequest {
            model: &request.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| CompletionError::from_transport(&err))?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.trim().parse::<u64>().ok());
            return Err(CompletionError::from_status(status.as_u16(), retry_after));
        }

        let text = response
            .text()
            .await
            .map_err(|err| CompletionError::from_transport(&err))?;
        parse_chat_response(&text)
    }
}

impl CompletionBackend for OpenAiChatBackend {
    fn complete(&self, request: CompletionRequest) -> CompletionFuture<'_> {
        Box::pin(self.send(request))
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}

/// Extract the first choice's content from a chat completions body.
fn parse_chat_response(body: &str) -> Result<String, CompletionError> {
    let parsed: ChatResponse = serde_json::from_str(body)
        .map_err(|err| CompletionError::MalformedResponse(err.to_string()))?;
    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .ok_or_else(|| {
            CompletionError::MalformedResponse("missing choices[0].message.content".to_string())
        })
}
