use std::time::Duration;

use async_trait::async_trait;
use kilo_core::config::{LlmConfig, LlmProvider};
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longest slice of a provider error body kept in the error detail.
const ERROR_BODY_LIMIT: usize = 512;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: ChatRole::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: ChatRole::User, content: content.into() }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CompletionError {
    #[error("completion provider timed out")]
    Timeout,
    #[error("completion provider unreachable: {0}")]
    Transport(String),
    #[error("completion provider rejected credentials (status {0})")]
    Authentication(u16),
    #[error("completion provider returned status {status}: {body}")]
    Provider { status: u16, body: String },
    #[error("completion provider returned a malformed response: {0}")]
    Malformed(String),
    #[error("completion provider returned no content")]
    EmptyChoice,
}

impl CompletionError {
    /// Short machine-readable label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Transport(_) => "transport",
            Self::Authentication(_) => "authentication",
            Self::Provider { .. } => "provider_status",
            Self::Malformed(_) => "malformed_response",
            Self::EmptyChoice => "empty_choice",
        }
    }
}

#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError>;
}

#[derive(Clone, Debug)]
pub struct OpenAiClientSettings {
    pub base_url: String,
    pub api_key: Option<SecretString>,
    pub timeout: Duration,
}

impl From<&LlmConfig> for OpenAiClientSettings {
    fn from(config: &LlmConfig) -> Self {
        let api_key = match config.provider {
            LlmProvider::OpenAi => config.api_key.clone(),
            LlmProvider::Ollama => None,
        };
        Self {
            base_url: config.base_url.clone(),
            api_key,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

/// Client for OpenAI-compatible `/chat/completions` endpoints (OpenAI, Ollama).
#[derive(Clone)]
pub struct OpenAiChatClient {
    client: Client,
    endpoint: String,
    api_key: Option<SecretString>,
}

impl OpenAiChatClient {
    pub fn new(settings: OpenAiClientSettings) -> Result<Self, CompletionError> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|error| CompletionError::Transport(error.to_string()))?;
        let endpoint = format!("{}/chat/completions", settings.base_url.trim_end_matches('/'));
        Ok(Self { client, endpoint, api_key: settings.api_key })
    }

    pub fn from_config(config: &LlmConfig) -> Result<Self, CompletionError> {
        Self::new(OpenAiClientSettings::from(config))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatCompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChoice {
    message: ChatCompletionMessage,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionMessage {
    content: Option<String>,
}

fn map_transport_error(error: reqwest::Error) -> CompletionError {
    if error.is_timeout() {
        CompletionError::Timeout
    } else {
        CompletionError::Transport(error.to_string())
    }
}

fn truncate_body(body: &str) -> String {
    body.chars().take(ERROR_BODY_LIMIT).collect()
}

#[async_trait]
impl LlmClient for OpenAiChatClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        let mut builder = self.client.post(&self.endpoint).json(request);
        if let Some(api_key) = &self.api_key {
            builder = builder.bearer_auth(api_key.expose_secret());
        }

        let response = builder.send().await.map_err(map_transport_error)?;
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(CompletionError::Authentication(status.as_u16()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::Provider {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let raw = response.text().await.map_err(map_transport_error)?;
        let parsed: ChatCompletionResponse = serde_json::from_str(&raw)
            .map_err(|error| CompletionError::Malformed(error.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(CompletionError::EmptyChoice)
    }
}
