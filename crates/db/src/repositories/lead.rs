use kilo_core::domain::lead::LeadRecord;
use kilo_core::domain::store::StoreId;

use super::{LeadRepository, RepositoryError, RowId};
use crate::DbPool;

pub struct SqlLeadRepository {
    pool: DbPool,
}

impl SqlLeadRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl LeadRepository for SqlLeadRepository {
    async fn insert(&self, lead: LeadRecord) -> Result<RowId, RepositoryError> {
        if lead.email.trim().is_empty() {
            return Err(RepositoryError::Rejected("lead email is required".to_string()));
        }

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO vip_leads (store_id, email, name, lead_type, intent_score, chat_context,
                                    consent_email, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING id",
        )
        .bind(lead.store_id.0)
        .bind(&lead.email)
        .bind(&lead.name)
        .bind(lead.lead_type.as_str())
        .bind(lead.intent_score)
        .bind(&lead.chat_context)
        .bind(lead.consent_email)
        .bind(lead.created_at.to_rfc3339())
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn count_for_store(&self, store_id: StoreId) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM vip_leads WHERE store_id = ?")
            .bind(store_id.0)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use sqlx::Row;

    use kilo_core::domain::lead::{LeadRecord, LeadType};
    use kilo_core::domain::store::StoreId;

    use super::SqlLeadRepository;
    use crate::repositories::LeadRepository;
    use crate::{connect_with_settings, migrations};

    #[tokio::test]
    async fn insert_persists_lead_columns() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");
        let repo = SqlLeadRepository::new(pool.clone());

        let lead = LeadRecord::captured(
            StoreId(9),
            "a@b.com",
            Some("Ava".to_string()),
            LeadType::VipCustom,
            "custom embroidery for my crew",
        )
        .expect("lead");
        let id = repo.insert(lead).await.expect("insert lead");

        let row = sqlx::query(
            "SELECT email, name, lead_type, intent_score, consent_email FROM vip_leads WHERE id = ?",
        )
        .bind(id)
        .fetch_one(&pool)
        .await
        .expect("fetch lead");

        assert_eq!(row.get::<String, _>("email"), "a@b.com");
        assert_eq!(row.get::<Option<String>, _>("name").as_deref(), Some("Ava"));
        assert_eq!(row.get::<String, _>("lead_type"), "vip_custom");
        assert_eq!(row.get::<i64, _>("intent_score"), 85);
        assert!(row.get::<bool, _>("consent_email"));
        assert_eq!(repo.count_for_store(StoreId(9)).await.expect("count"), 1);

        pool.close().await;
    }
}
