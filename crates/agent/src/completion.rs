use std::sync::Arc;

use kilo_core::config::LlmConfig;
use serde::Serialize;
use tracing::warn;

use crate::llm::{ChatMessage, CompletionError, CompletionRequest, LlmClient};

/// In-character reply used whenever the provider call fails.
pub const FALLBACK_RESPONSE: &str = "Having a quick technical moment - can you try that again? I'm here to help with anything Tahoe Enterprise related!";

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CompletionSettings {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self { model: "gpt-4".to_string(), temperature: 0.8, max_tokens: 350 }
    }
}

impl From<&LlmConfig> for CompletionSettings {
    fn from(config: &LlmConfig) -> Self {
        Self {
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }
}

/// Reply text plus the provider failure it replaced, if any.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletionOutcome {
    pub text: String,
    pub error: Option<CompletionError>,
}

impl CompletionOutcome {
    pub fn answered(text: String) -> Self {
        Self { text, error: None }
    }

    pub fn fallback(error: CompletionError) -> Self {
        Self { text: FALLBACK_RESPONSE.to_string(), error: Some(error) }
    }

    pub fn is_fallback(&self) -> bool {
        self.error.is_some()
    }
}

#[derive(Clone)]
pub struct CompletionClient {
    llm: Arc<dyn LlmClient>,
    settings: CompletionSettings,
}

impl CompletionClient {
    pub fn new(llm: Arc<dyn LlmClient>, settings: CompletionSettings) -> Self {
        Self { llm, settings }
    }

    pub fn settings(&self) -> &CompletionSettings {
        &self.settings
    }

    /// Never fails: provider errors become the fallback reply with the error attached.
    pub async fn complete(&self, system_prompt: &str, message: &str) -> CompletionOutcome {
        let request = CompletionRequest {
            model: self.settings.model.clone(),
            messages: vec![ChatMessage::system(system_prompt), ChatMessage::user(message)],
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        };

        match self.llm.complete(&request).await {
            Ok(text) => CompletionOutcome::answered(text),
            Err(error) => {
                warn!(
                    event_name = "agent.completion.fallback",
                    error_kind = error.kind(),
                    error = %error,
                    model = %self.settings.model,
                    "completion provider failed; returning fallback reply"
                );
                CompletionOutcome::fallback(error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use super::{CompletionClient, CompletionSettings, FALLBACK_RESPONSE};
    use crate::llm::{ChatRole, CompletionError, CompletionRequest, LlmClient};

    struct ScriptedLlm {
        result: Result<String, CompletionError>,
        seen: Mutex<Vec<CompletionRequest>>,
    }

    impl ScriptedLlm {
        fn new(result: Result<String, CompletionError>) -> Self {
            Self { result, seen: Mutex::new(Vec::new()) }
        }
    }

    #[async_trait]
    impl LlmClient for ScriptedLlm {
        async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
            self.seen.lock().expect("lock").push(request.clone());
            self.result.clone()
        }
    }

    #[tokio::test]
    async fn answered_reply_passes_through_with_configured_sampling() {
        let llm = Arc::new(ScriptedLlm::new(Ok("let's run it up".to_string())));
        let client = CompletionClient::new(
            llm.clone(),
            CompletionSettings { model: "gpt-4o".to_string(), temperature: 0.3, max_tokens: 64 },
        );

        let outcome = client.complete("persona", "yo").await;
        assert_eq!(outcome.text, "let's run it up");
        assert!(!outcome.is_fallback());

        let seen = llm.seen.lock().expect("lock");
        assert_eq!(seen[0].model, "gpt-4o");
        assert_eq!(seen[0].max_tokens, 64);
        assert_eq!(seen[0].messages[0].role, ChatRole::System);
        assert_eq!(seen[0].messages[0].content, "persona");
        assert_eq!(seen[0].messages[1].role, ChatRole::User);
        assert_eq!(seen[0].messages[1].content, "yo");
    }

    #[tokio::test]
    async fn timeout_falls_back_for_every_message() {
        let client = CompletionClient::new(
            Arc::new(ScriptedLlm::new(Err(CompletionError::Timeout))),
            CompletionSettings::default(),
        );

        for message in ["hi", "I want a website", "", "buy this design?"] {
            let outcome = client.complete("persona", message).await;
            assert_eq!(outcome.text, FALLBACK_RESPONSE);
            assert_eq!(outcome.error, Some(CompletionError::Timeout));
        }
    }

    #[tokio::test]
    async fn provider_is_called_once_per_message() {
        let llm = Arc::new(ScriptedLlm::new(Err(CompletionError::Authentication(401))));
        let client = CompletionClient::new(llm.clone(), CompletionSettings::default());

        let outcome = client.complete("persona", "hello").await;
        assert!(outcome.is_fallback());
        assert_eq!(llm.seen.lock().expect("lock").len(), 1, "failed calls are not retried");
    }
}
