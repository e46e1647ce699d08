use serde::Serialize;

use kilo_core::domain::store::StoreId;

use crate::repositories::{
    ChatTurnRepository, DraftOrderRepository, LeadRepository, RepositoryError,
};

/// Per-store activity counters shown on the stats endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub store_id: StoreId,
    pub total_chats: i64,
    pub vip_leads: i64,
    pub draft_orders: i64,
}

impl StoreStats {
    pub async fn collect(
        store_id: StoreId,
        turns: &dyn ChatTurnRepository,
        leads: &dyn LeadRepository,
        orders: &dyn DraftOrderRepository,
    ) -> Result<Self, RepositoryError> {
        Ok(Self {
            store_id,
            total_chats: turns.count_for_store(store_id).await?,
            vip_leads: leads.count_for_store(store_id).await?,
            draft_orders: orders.count_for_store(store_id).await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use kilo_core::domain::chat::{ChatTurn, SessionId};
    use kilo_core::domain::lead::{DraftOrder, LeadRecord, LeadType};
    use kilo_core::domain::store::StoreId;

    use super::StoreStats;
    use crate::connection::connect_with_settings;
    use crate::migrations::run_pending;
    use crate::repositories::{
        ChatTurnRepository, DraftOrderRepository, LeadRepository, SqlChatTurnRepository,
        SqlDraftOrderRepository, SqlLeadRepository,
    };

    #[tokio::test]
    async fn counts_are_scoped_to_the_store() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        run_pending(&pool).await.expect("migrate");

        let turns = SqlChatTurnRepository::new(pool.clone());
        let leads = SqlLeadRepository::new(pool.clone());
        let orders = SqlDraftOrderRepository::new(pool.clone());

        for store in [StoreId(1), StoreId(1), StoreId(2)] {
            turns
                .append(ChatTurn::new(store, SessionId("s".to_string()), "hi", "yo"))
                .await
                .expect("turn");
        }
        leads
            .insert(
                LeadRecord::captured(StoreId(1), "a@b.com", None, LeadType::B2bBulk, "bulk")
                    .expect("lead"),
            )
            .await
            .expect("insert lead");
        orders
            .create(DraftOrder::placeholder(StoreId(2), None, None, "checkout"))
            .await
            .expect("order");

        let stats = StoreStats::collect(StoreId(1), &turns, &leads, &orders).await.expect("stats");
        assert_eq!(
            stats,
            StoreStats { store_id: StoreId(1), total_chats: 2, vip_leads: 1, draft_orders: 0 }
        );
    }
}
