use std::sync::Arc;

use chrono::{DateTime, Utc};
use kilo_core::domain::chat::{ChatTurn, SessionId};
use kilo_core::domain::customer::CustomerData;
use kilo_core::domain::store::StoreId;
use kilo_core::errors::DomainError;
use kilo_core::intent::{IntentAction, IntentTagger};
use kilo_db::repositories::ChatTurnRepository;
use serde::Serialize;
use tracing::{error, info};

use crate::completion::CompletionClient;
use crate::executor::{ActionExecutor, ActionResult};
use crate::prompt::PersonaPromptBuilder;

pub const AGENT_NAME: &str = "KILO";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChatRequest {
    pub store_id: StoreId,
    pub message: String,
    pub session_id: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub correlation_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChatReply {
    pub success: bool,
    pub response: String,
    pub actions: Vec<IntentAction>,
    pub action_results: Vec<ActionResult>,
    pub session_id: SessionId,
    pub agent: &'static str,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// One customer message in, one reply out: prompt, completion, tagging,
/// persistence and action execution.
#[derive(Clone)]
pub struct AgentRuntime {
    prompts: PersonaPromptBuilder,
    completion: CompletionClient,
    tagger: Arc<IntentTagger>,
    executor: ActionExecutor,
    turns: Arc<dyn ChatTurnRepository>,
}

impl AgentRuntime {
    pub fn new(
        prompts: PersonaPromptBuilder,
        completion: CompletionClient,
        tagger: IntentTagger,
        executor: ActionExecutor,
        turns: Arc<dyn ChatTurnRepository>,
    ) -> Self {
        Self { prompts, completion, tagger: Arc::new(tagger), executor, turns }
    }

    pub fn tagger(&self) -> &IntentTagger {
        &self.tagger
    }

    pub async fn handle_message(&self, request: ChatRequest) -> Result<ChatReply, DomainError> {
        if request.message.trim().is_empty() {
            return Err(DomainError::MissingField("message"));
        }

        let now = Utc::now();
        let store_id = request.store_id;
        let session_id = SessionId::from_request(request.session_id.as_deref(), now);
        let correlation_id = request.correlation_id.as_str();

        let prompt = self.prompts.build(store_id).await;
        let outcome = self.completion.complete(&prompt.system_prompt, &request.message).await;

        // A fallback reply is not a real exchange, so nothing is tagged from it.
        let actions = if outcome.is_fallback() {
            Vec::new()
        } else {
            self.tagger.tag(&request.message, Some(outcome.text.as_str()))
        };

        let turn =
            ChatTurn::new(store_id, session_id.clone(), request.message.clone(), outcome.text.clone());
        if let Err(save_error) = self.turns.append(turn).await {
            error!(
                event_name = "agent.chat_turn.save_failed",
                correlation_id,
                store_id = %store_id,
                session_id = %session_id.0,
                error = %save_error,
                "failed to persist chat turn; replying anyway"
            );
        }

        let customer = CustomerData::new(request.email, request.name, request.message);
        let mut action_results = Vec::new();
        for action in actions.iter().filter(|action| action.priority.is_actionable()) {
            action_results.push(self.executor.execute(store_id, action, &customer).await);
        }

        info!(
            event_name = "agent.chat.handled",
            correlation_id,
            store_id = %store_id,
            session_id = %session_id.0,
            fallback = outcome.is_fallback(),
            actions = actions.len(),
            executed = action_results.len(),
            rules_version = self.tagger.rules_version(),
            "chat message handled"
        );

        Ok(ChatReply {
            success: true,
            response: outcome.text,
            actions,
            action_results,
            session_id,
            agent: AGENT_NAME,
            timestamp: now,
            error: outcome.error.map(|error| error.to_string()),
        })
    }
}
