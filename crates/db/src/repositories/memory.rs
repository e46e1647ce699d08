use tokio::sync::RwLock;

use kilo_core::domain::chat::ChatTurn;
use kilo_core::domain::knowledge::KnowledgeDocument;
use kilo_core::domain::lead::{DraftOrder, LeadRecord};
use kilo_core::domain::store::StoreId;

use super::{
    ChatTurnRepository, DraftOrderRepository, KnowledgeRepository, LeadRepository,
    RepositoryError, RowId,
};

fn next_id(len: usize) -> RowId {
    RowId::try_from(len).unwrap_or(RowId::MAX - 1) + 1
}

#[derive(Default)]
pub struct InMemoryKnowledgeRepository {
    documents: RwLock<Vec<KnowledgeDocument>>,
}

impl InMemoryKnowledgeRepository {
    pub fn with_documents(documents: Vec<KnowledgeDocument>) -> Self {
        Self { documents: RwLock::new(documents) }
    }
}

#[async_trait::async_trait]
impl KnowledgeRepository for InMemoryKnowledgeRepository {
    async fn list_active(
        &self,
        store_id: StoreId,
    ) -> Result<Vec<KnowledgeDocument>, RepositoryError> {
        let documents = self.documents.read().await;
        Ok(documents
            .iter()
            .filter(|document| document.store_id == store_id && document.is_active)
            .cloned()
            .collect())
    }

    async fn save(&self, document: KnowledgeDocument) -> Result<RowId, RepositoryError> {
        let mut documents = self.documents.write().await;
        documents.push(document);
        Ok(next_id(documents.len() - 1))
    }
}

#[derive(Default)]
pub struct InMemoryChatTurnRepository {
    turns: RwLock<Vec<ChatTurn>>,
}

impl InMemoryChatTurnRepository {
    pub async fn turns(&self) -> Vec<ChatTurn> {
        self.turns.read().await.clone()
    }
}

#[async_trait::async_trait]
impl ChatTurnRepository for InMemoryChatTurnRepository {
    async fn append(&self, turn: ChatTurn) -> Result<RowId, RepositoryError> {
        let mut turns = self.turns.write().await;
        turns.push(turn);
        Ok(next_id(turns.len() - 1))
    }

    async fn count_for_store(&self, store_id: StoreId) -> Result<i64, RepositoryError> {
        let turns = self.turns.read().await;
        Ok(turns.iter().filter(|turn| turn.store_id == store_id).count() as i64)
    }
}

#[derive(Default)]
pub struct InMemoryLeadRepository {
    leads: RwLock<Vec<LeadRecord>>,
}

impl InMemoryLeadRepository {
    pub async fn leads(&self) -> Vec<LeadRecord> {
        self.leads.read().await.clone()
    }
}

#[async_trait::async_trait]
impl LeadRepository for InMemoryLeadRepository {
    async fn insert(&self, lead: LeadRecord) -> Result<RowId, RepositoryError> {
        if lead.email.trim().is_empty() {
            return Err(RepositoryError::Rejected("lead email is required".to_string()));
        }
        let mut leads = self.leads.write().await;
        leads.push(lead);
        Ok(next_id(leads.len() - 1))
    }

    async fn count_for_store(&self, store_id: StoreId) -> Result<i64, RepositoryError> {
        let leads = self.leads.read().await;
        Ok(leads.iter().filter(|lead| lead.store_id == store_id).count() as i64)
    }
}

#[derive(Default)]
pub struct InMemoryDraftOrderRepository {
    orders: RwLock<Vec<DraftOrder>>,
}

impl InMemoryDraftOrderRepository {
    pub async fn orders(&self) -> Vec<DraftOrder> {
        self.orders.read().await.clone()
    }
}

#[async_trait::async_trait]
impl DraftOrderRepository for InMemoryDraftOrderRepository {
    async fn create(&self, order: DraftOrder) -> Result<RowId, RepositoryError> {
        let mut orders = self.orders.write().await;
        orders.push(order);
        Ok(next_id(orders.len() - 1))
    }

    async fn count_for_store(&self, store_id: StoreId) -> Result<i64, RepositoryError> {
        let orders = self.orders.read().await;
        Ok(orders.iter().filter(|order| order.store_id == store_id).count() as i64)
    }
}
