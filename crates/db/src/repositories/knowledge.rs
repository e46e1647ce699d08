use chrono::Utc;
use sqlx::Row;

use kilo_core::domain::knowledge::KnowledgeDocument;
use kilo_core::domain::store::StoreId;

use super::{KnowledgeRepository, RepositoryError, RowId};
use crate::DbPool;

pub struct SqlKnowledgeRepository {
    pool: DbPool,
}

impl SqlKnowledgeRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Flips the active flag; inactive documents stop feeding the prompt.
    pub async fn set_active(&self, id: RowId, active: bool) -> Result<bool, RepositoryError> {
        let result = sqlx::query("UPDATE kb_documents SET is_active = ? WHERE id = ?")
            .bind(active)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn row_to_document(row: &sqlx::sqlite::SqliteRow) -> Result<KnowledgeDocument, RepositoryError> {
    let store_id: i64 =
        row.try_get("store_id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let doc_type: String =
        row.try_get("doc_type").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let title: String = row.try_get("title").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let content: String =
        row.try_get("content").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let is_active: bool =
        row.try_get("is_active").map_err(|e| RepositoryError::Decode(e.to_string()))?;

    Ok(KnowledgeDocument { store_id: StoreId(store_id), doc_type, title, content, is_active })
}

#[async_trait::async_trait]
impl KnowledgeRepository for SqlKnowledgeRepository {
    async fn list_active(
        &self,
        store_id: StoreId,
    ) -> Result<Vec<KnowledgeDocument>, RepositoryError> {
        let rows: Vec<sqlx::sqlite::SqliteRow> = sqlx::query(
            "SELECT store_id, doc_type, title, content, is_active
             FROM kb_documents
             WHERE store_id = ? AND is_active = 1
             ORDER BY id ASC",
        )
        .bind(store_id.0)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_document).collect::<Result<Vec<_>, _>>()
    }

    async fn save(&self, document: KnowledgeDocument) -> Result<RowId, RepositoryError> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO kb_documents (store_id, doc_type, title, content, is_active, created_at)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING id",
        )
        .bind(document.store_id.0)
        .bind(&document.doc_type)
        .bind(&document.title)
        .bind(&document.content)
        .bind(document.is_active)
        .bind(Utc::now().to_rfc3339())
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }
}
