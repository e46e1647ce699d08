use chrono::Utc;
use kilo_core::domain::store::StoreId;
use tracing::info;

use crate::connection::DbPool;
use crate::repositories::RepositoryError;

/// Deterministic knowledge-base seed describing the three business pillars.
const SEED_DOCUMENTS: &[SeedDocument] = &[
    SeedDocument {
        doc_type: "brand",
        title: "Clothing brand",
        content: "Premium streetwear for young entrepreneurs. Drops sell out, so preorders lock in sizes.",
    },
    SeedDocument {
        doc_type: "service",
        title: "B2B services",
        content: "Website creation, business automation and AI solutions. Bulk team orders get volume pricing.",
    },
    SeedDocument {
        doc_type: "service",
        title: "VIP custom work",
        content: "One-off pieces, custom embroidery and unique designs. Turnaround is two to three weeks.",
    },
    SeedDocument {
        doc_type: "faq",
        title: "Shipping",
        content: "Orders ship within three business days. Tracking is emailed once the label prints.",
    },
];

struct SeedDocument {
    doc_type: &'static str,
    title: &'static str,
    content: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeedResult {
    pub store_id: StoreId,
    pub inserted: usize,
    pub already_present: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerificationResult {
    pub all_present: bool,
    pub checks: Vec<(&'static str, bool)>,
}

pub struct KnowledgeSeedDataset;

impl KnowledgeSeedDataset {
    /// Inserts any seed document the store does not already have (matched by title).
    pub async fn load(pool: &DbPool, store_id: StoreId) -> Result<SeedResult, RepositoryError> {
        let now = Utc::now().to_rfc3339();
        let mut inserted = 0;

        for document in SEED_DOCUMENTS {
            let result = sqlx::query(
                "INSERT INTO kb_documents (store_id, doc_type, title, content, is_active, created_at)
                 SELECT ?1, ?2, ?3, ?4, 1, ?5
                 WHERE NOT EXISTS (SELECT 1 FROM kb_documents WHERE store_id = ?1 AND title = ?3)",
            )
            .bind(store_id.0)
            .bind(document.doc_type)
            .bind(document.title)
            .bind(document.content)
            .bind(&now)
            .execute(pool)
            .await?;
            inserted += result.rows_affected() as usize;
        }

        info!(
            event_name = "db.seed.knowledge_loaded",
            store_id = store_id.0,
            inserted,
            "knowledge seed dataset loaded"
        );

        Ok(SeedResult { store_id, inserted, already_present: SEED_DOCUMENTS.len() - inserted })
    }

    pub async fn verify(
        pool: &DbPool,
        store_id: StoreId,
    ) -> Result<VerificationResult, RepositoryError> {
        let mut checks = Vec::with_capacity(SEED_DOCUMENTS.len());

        for document in SEED_DOCUMENTS {
            let present: i64 = sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM kb_documents WHERE store_id = ?1 AND title = ?2 AND is_active = 1)",
            )
            .bind(store_id.0)
            .bind(document.title)
            .fetch_one(pool)
            .await?;
            checks.push((document.title, present == 1));
        }

        let all_present = checks.iter().all(|(_, passed)| *passed);
        Ok(VerificationResult { all_present, checks })
    }
}
