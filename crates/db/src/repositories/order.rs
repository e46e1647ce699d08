use kilo_core::domain::lead::DraftOrder;
use kilo_core::domain::store::StoreId;

use super::{DraftOrderRepository, RepositoryError, RowId};
use crate::DbPool;

pub struct SqlDraftOrderRepository {
    pool: DbPool,
}

impl SqlDraftOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl DraftOrderRepository for SqlDraftOrderRepository {
    async fn create(&self, order: DraftOrder) -> Result<RowId, RepositoryError> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO draft_orders (store_id, email, name, note, status, created_at)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING id",
        )
        .bind(order.store_id.0)
        .bind(&order.email)
        .bind(&order.name)
        .bind(&order.note)
        .bind(&order.status)
        .bind(order.created_at.to_rfc3339())
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn count_for_store(&self, store_id: StoreId) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM draft_orders WHERE store_id = ?")
            .bind(store_id.0)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
