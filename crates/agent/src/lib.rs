//! KILO agent - message handling pipeline
//!
//! Turns one customer message into one reply:
//! 1. **Prompt** (`prompt`) - persona template plus the store's active knowledge
//! 2. **Completion** (`completion`, `llm`) - provider call, mapped to the fallback reply on failure
//! 3. **Tagging** - keyword rules from `kilo_core::intent`
//! 4. **Execution** (`executor`) - lead and draft-order writes for high/medium actions
//!
//! `AgentRuntime` (see `runtime`) wires these together and persists the chat turn.
//! Every collaborator is injected as a trait object so tests run against fakes.

pub mod completion;
pub mod executor;
pub mod llm;
pub mod prompt;
pub mod runtime;

pub use completion::{CompletionClient, CompletionOutcome, CompletionSettings, FALLBACK_RESPONSE};
pub use executor::{ActionExecutor, ActionResult};
pub use llm::{CompletionError, LlmClient, OpenAiChatClient};
pub use prompt::{PersonaPrompt, PersonaPromptBuilder};
pub use runtime::{AgentRuntime, ChatReply, ChatRequest, AGENT_NAME};
