use kilo_core::domain::chat::ChatTurn;
use kilo_core::domain::store::StoreId;

use super::{ChatTurnRepository, RepositoryError, RowId};
use crate::DbPool;

pub struct SqlChatTurnRepository {
    pool: DbPool,
}

impl SqlChatTurnRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ChatTurnRepository for SqlChatTurnRepository {
    async fn append(&self, turn: ChatTurn) -> Result<RowId, RepositoryError> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO chat_sessions (store_id, session_id, customer_message, ai_response, created_at)
             VALUES (?, ?, ?, ?, ?)
             RETURNING id",
        )
        .bind(turn.store_id.0)
        .bind(&turn.session_id.0)
        .bind(&turn.customer_message)
        .bind(&turn.ai_response)
        .bind(turn.created_at.to_rfc3339())
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn count_for_store(&self, store_id: StoreId) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM chat_sessions WHERE store_id = ?")
            .bind(store_id.0)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use kilo_core::domain::chat::{ChatTurn, SessionId};
    use kilo_core::domain::store::StoreId;

    use super::SqlChatTurnRepository;
    use crate::repositories::ChatTurnRepository;
    use crate::{connect_with_settings, migrations};

    #[tokio::test]
    async fn append_returns_increasing_ids_and_counts_per_store() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");
        let repo = SqlChatTurnRepository::new(pool.clone());

        let session = SessionId("session_1".to_string());
        let first = repo
            .append(ChatTurn::new(StoreId(3), session.clone(), "hi", "yo"))
            .await
            .expect("first turn");
        let second = repo
            .append(ChatTurn::new(StoreId(3), session, "bulk order?", "locked in"))
            .await
            .expect("second turn");

        assert!(second > first);
        assert_eq!(repo.count_for_store(StoreId(3)).await.expect("count"), 2);
        assert_eq!(repo.count_for_store(StoreId(4)).await.expect("count"), 0);

        pool.close().await;
    }
}
