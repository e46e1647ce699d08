pub mod config;
pub mod domain;
pub mod errors;
pub mod intent;

pub use domain::chat::{ChatTurn, SessionId};
pub use domain::customer::CustomerData;
pub use domain::knowledge::KnowledgeDocument;
pub use domain::lead::{DraftOrder, LeadRecord, LeadType, CAPTURED_LEAD_INTENT_SCORE};
pub use domain::store::StoreId;
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use intent::{IntentAction, IntentKind, IntentTagger, Priority, RuleTable};
