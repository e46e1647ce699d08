use async_trait::async_trait;
use thiserror::Error;

use kilo_core::domain::chat::ChatTurn;
use kilo_core::domain::knowledge::KnowledgeDocument;
use kilo_core::domain::lead::{DraftOrder, LeadRecord};
use kilo_core::domain::store::StoreId;

pub mod chat;
pub mod knowledge;
pub mod lead;
pub mod memory;
pub mod order;

pub use chat::SqlChatTurnRepository;
pub use knowledge::SqlKnowledgeRepository;
pub use lead::SqlLeadRepository;
pub use memory::{
    InMemoryChatTurnRepository, InMemoryDraftOrderRepository, InMemoryKnowledgeRepository,
    InMemoryLeadRepository,
};
pub use order::SqlDraftOrderRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("rejected write: {0}")]
    Rejected(String),
}

/// Row ids handed back by inserts. Nothing else is read back after a write.
pub type RowId = i64;

#[async_trait]
pub trait KnowledgeRepository: Send + Sync {
    async fn list_active(&self, store_id: StoreId)
        -> Result<Vec<KnowledgeDocument>, RepositoryError>;
    async fn save(&self, document: KnowledgeDocument) -> Result<RowId, RepositoryError>;
}

#[async_trait]
pub trait ChatTurnRepository: Send + Sync {
    async fn append(&self, turn: ChatTurn) -> Result<RowId, RepositoryError>;
    async fn count_for_store(&self, store_id: StoreId) -> Result<i64, RepositoryError>;
}

#[async_trait]
pub trait LeadRepository: Send + Sync {
    async fn insert(&self, lead: LeadRecord) -> Result<RowId, RepositoryError>;
    async fn count_for_store(&self, store_id: StoreId) -> Result<i64, RepositoryError>;
}

#[async_trait]
pub trait DraftOrderRepository: Send + Sync {
    async fn create(&self, order: DraftOrder) -> Result<RowId, RepositoryError>;
    async fn count_for_store(&self, store_id: StoreId) -> Result<i64, RepositoryError>;
}
