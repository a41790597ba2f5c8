//! Configuration for the note agent.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::memory::core::errors::{MemoryError, MemoryResult};

/// Environment variable holding the memory capacity.
pub const CAPACITY_ENV: &str = "PRISM_MEMORY_CAPACITY";
/// Environment variable selecting the completion provider.
pub const PROVIDER_ENV: &str = "PRISM_LLM_PROVIDER";
/// Environment variable holding the model identifier.
pub const MODEL_ENV: &str = "PRISM_MODEL";
/// Environment variable holding the API credential.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
/// Environment variable overriding the provider base URL.
pub const BASE_URL_ENV: &str = "PRISM_LLM_BASE_URL";
/// Environment variable holding the sampling temperature.
pub const TEMPERATURE_ENV: &str = "PRISM_LLM_TEMPERATURE";
/// Environment variable holding the output token budget.
pub const MAX_TOKENS_ENV: &str = "PRISM_LLM_MAX_TOKENS";
/// Environment variable holding the completion timeout.
pub const TIMEOUT_ENV: &str = "PRISM_LLM_TIMEOUT_SECONDS";

/// Top-level configuration for the agent.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Memory store settings.
    pub memory: MemoryConfig,
    /// Completion model settings.
    pub llm: LlmConfig,
}

impl AgentConfig {
    /// Read the configuration from the process environment.
    ///
    /// Unset variables keep their defaults.
    ///
    /// # Errors
    /// Returns an error if a variable is set but cannot be parsed.
    pub fn from_env() -> MemoryResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    ///
    /// # Errors
    /// Returns an error if a value is present but cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> MemoryResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(capacity) = parse_var(&lookup, CAPACITY_ENV)? {
            config.memory.capacity = capacity;
        }
        if let Some(provider) = parse_var(&lookup, PROVIDER_ENV)? {
            config.llm.provider = provider;
        }
        if let Some(model) = non_empty(&lookup, MODEL_ENV) {
            config.llm.model = model;
        }
        config.llm.api_key = non_empty(&lookup, API_KEY_ENV);
        config.llm.base_url = non_empty(&lookup, BASE_URL_ENV);
        if let Some(temperature) = parse_var(&lookup, TEMPERATURE_ENV)? {
            config.llm.temperature = temperature;
        }
        if let Some(max_tokens) = parse_var(&lookup, MAX_TOKENS_ENV)? {
            config.llm.max_tokens = max_tokens;
        }
        if let Some(timeout) = parse_var(&lookup, TIMEOUT_ENV)? {
            config.llm.timeout_seconds = timeout;
        }

        Ok(config)
    }

    /// Validate configuration invariants.
    ///
    /// # Errors
    /// Returns an error if any values are out of range or invalid.
    pub fn validate(&self) -> MemoryResult<()> {
        if self.memory.capacity == 0 {
            return Err(MemoryError::InvalidConfig(
                "memory.capacity must be > 0".to_string(),
            ));
        }

        if self.llm.model.trim().is_empty() {
            return Err(MemoryError::InvalidConfig(
                "llm.model must not be empty".to_string(),
            ));
        }

        if self.llm.max_tokens == 0 {
            return Err(MemoryError::InvalidConfig(
                "llm.max_tokens must be > 0".to_string(),
            ));
        }

        if self.llm.timeout_seconds == 0 {
            return Err(MemoryError::InvalidConfig(
                "llm.timeout_seconds must be > 0".to_string(),
            ));
        }

        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(MemoryError::InvalidConfig(format!(
                "llm.temperature must be in 0.0..=2.0, got {}",
                self.llm.temperature
            )));
        }

        if self.llm.provider == LlmProvider::OpenAi
            && self.llm.api_key.as_deref().is_none_or(|key| key.trim().is_empty())
        {
            return Err(MemoryError::InvalidConfig(format!(
                "the openai provider needs {API_KEY_ENV}; set it or use {PROVIDER_ENV}=extractive"
            )));
        }

        if let Some(base_url) = &self.llm.base_url {
            Url::parse(base_url)?;
        }

        Ok(())
    }
}

/// Memory store settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Maximum number of chunks retained at once.
    pub capacity: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self { capacity: 1000 }
    }
}

/// Completion provider selector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LlmProvider {
    /// OpenAI-compatible chat completions endpoint.
    #[default]
    OpenAi,
    /// Local Ollama server.
    Ollama,
    /// Offline lead-sentence extraction, no network.
    Extractive,
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::OpenAi => "openai",
            Self::Ollama => "ollama",
            Self::Extractive => "extractive",
        })
    }
}

impl FromStr for LlmProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" | "open_ai" => Ok(Self::OpenAi),
            "ollama" => Ok(Self::Ollama),
            "extractive" => Ok(Self::Extractive),
            other => Err(format!("unknown provider {other:?}")),
        }
    }
}

/// Completion model settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Which backend serves completions.
    pub provider: LlmProvider,
    /// Model identifier sent with each request.
    pub model: String,
    /// API credential, never serialized.
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    /// Optional custom base URL.
    pub base_url: Option<String>,
    /// Temperature for generation.
    pub temperature: f64,
    /// Maximum output tokens.
    pub max_tokens: u64,
    /// Upper bound on a single completion call, in seconds.
    pub timeout_seconds: u64,
}

impl LlmConfig {
    /// Completion timeout as a [`Duration`].
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::OpenAi,
            model: "gpt-4".to_string(),
            api_key: None,
            base_url: None,
            temperature: 0.7,
            max_tokens: 150,
            timeout_seconds: 30,
        }
    }
}

impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_var<F, T>(lookup: &F, key: &str) -> MemoryResult<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: fmt::Display,
{
    non_empty(lookup, key)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|err| MemoryError::InvalidConfig(format!("{key}={raw:?}: {err}")))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AgentConfig::default();
        assert_eq!(config.memory.capacity, 1000);
        assert_eq!(config.llm.model, "gpt-4");
        assert_eq!(config.llm.provider, LlmProvider::OpenAi);
        assert_eq!(config.llm.max_tokens, 150);
        assert!((config.llm.temperature - 0.7).abs() < f64::EPSILON);
    }

    #[test]
    fn test_from_lookup_reads_all_values() -> MemoryResult<()> {
        let lookup = lookup_from(&[
            (CAPACITY_ENV, "5"),
            (PROVIDER_ENV, "Ollama"),
            (MODEL_ENV, "llama3"),
            (BASE_URL_ENV, "http://127.0.0.1:11434"),
            (TEMPERATURE_ENV, "0.2"),
            (MAX_TOKENS_ENV, "64"),
            (TIMEOUT_ENV, "9"),
        ]);
        let config = AgentConfig::from_lookup(lookup)?;
        assert_eq!(config.memory.capacity, 5);
        assert_eq!(config.llm.provider, LlmProvider::Ollama);
        assert_eq!(config.llm.model, "llama3");
        assert_eq!(config.llm.max_tokens, 64);
        assert_eq!(config.llm.timeout(), Duration::from_secs(9));
        config.validate()
    }

    #[test]
    fn test_from_lookup_rejects_garbage() {
        let lookup = lookup_from(&[(CAPACITY_ENV, "many")]);
        assert!(matches!(
            AgentConfig::from_lookup(lookup),
            Err(MemoryError::InvalidConfig(_))
        ));

        let lookup = lookup_from(&[(PROVIDER_ENV, "claude-on-a-toaster")]);
        assert!(AgentConfig::from_lookup(lookup).is_err());
    }

    #[test]
    fn test_validate_requires_api_key_for_openai() {
        let config = AgentConfig::default();
        assert!(config.validate().is_err());

        let mut config = AgentConfig::default();
        config.llm.api_key = Some("sk-test".to_string());
        assert!(config.validate().is_ok());

        let mut config = AgentConfig::default();
        config.llm.provider = LlmProvider::Extractive;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_ranges() {
        let mut config = AgentConfig::default();
        config.llm.provider = LlmProvider::Extractive;
        config.memory.capacity = 0;
        assert!(config.validate().is_err());

        config.memory.capacity = 1;
        config.llm.temperature = 3.5;
        assert!(config.validate().is_err());

        config.llm.temperature = 0.7;
        config.llm.base_url = Some("not a url".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let mut config = LlmConfig::default();
        config.api_key = Some("sk-very-secret".to_string());
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("sk-very-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
