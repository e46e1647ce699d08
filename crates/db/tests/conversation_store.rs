use kilo_core::domain::chat::{ChatTurn, SessionId};
use kilo_core::domain::knowledge::KnowledgeDocument;
use kilo_core::domain::lead::{DraftOrder, LeadRecord, LeadType, CAPTURED_LEAD_INTENT_SCORE};
use kilo_core::domain::store::StoreId;
use kilo_db::repositories::{
    ChatTurnRepository, DraftOrderRepository, KnowledgeRepository, LeadRepository,
    RepositoryError, SqlChatTurnRepository, SqlDraftOrderRepository, SqlKnowledgeRepository,
    SqlLeadRepository,
};
use kilo_db::{connect_with_settings, migrations, DbPool, KnowledgeSeedDataset, StoreStats};

async fn migrated_pool() -> DbPool {
    let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
    migrations::run_pending(&pool).await.expect("migrations");
    pool
}

#[tokio::test]
async fn seeded_store_feeds_knowledge_and_keeps_other_stores_apart() {
    let pool = migrated_pool().await;
    KnowledgeSeedDataset::load(&pool, StoreId(1)).await.expect("seed");

    let knowledge = SqlKnowledgeRepository::new(pool.clone());
    knowledge
        .save(KnowledgeDocument::new(StoreId(2), "faq", "Returns", "No returns on custom work"))
        .await
        .expect("save");

    let store_one = knowledge.list_active(StoreId(1)).await.expect("list");
    assert_eq!(store_one.len(), 4);
    assert!(store_one.iter().all(|document| document.store_id == StoreId(1)));

    let store_two = knowledge.list_active(StoreId(2)).await.expect("list");
    assert_eq!(store_two.len(), 1);
    assert_eq!(store_two[0].context_line(), "[faq] Returns: No returns on custom work");

    pool.close().await;
}

#[tokio::test]
async fn one_chat_exchange_writes_turn_lead_and_order() {
    let pool = migrated_pool().await;
    let turns = SqlChatTurnRepository::new(pool.clone());
    let leads = SqlLeadRepository::new(pool.clone());
    let orders = SqlDraftOrderRepository::new(pool.clone());
    let store = StoreId(3);
    let message = "My company wants to order 40 hoodies";

    turns
        .append(ChatTurn::new(store, SessionId("session_1".to_string()), message, "Locked in."))
        .await
        .expect("turn");
    let lead_id = leads
        .insert(
            LeadRecord::captured(store, "ops@acme.test", None, LeadType::B2bBulk, message)
                .expect("lead"),
        )
        .await
        .expect("insert lead");
    orders
        .create(DraftOrder::placeholder(store, Some("ops@acme.test".to_string()), None, message))
        .await
        .expect("order");

    let (lead_type, score, consent): (String, i64, bool) =
        sqlx::query_as("SELECT lead_type, intent_score, consent_email FROM vip_leads WHERE id = ?1")
            .bind(lead_id)
            .fetch_one(&pool)
            .await
            .expect("lead row");
    assert_eq!(lead_type, "b2b_bulk");
    assert_eq!(score, CAPTURED_LEAD_INTENT_SCORE);
    assert!(consent);

    let stats = StoreStats::collect(store, &turns, &leads, &orders).await.expect("stats");
    assert_eq!((stats.total_chats, stats.vip_leads, stats.draft_orders), (1, 1, 1));

    pool.close().await;
}

#[tokio::test]
async fn lead_without_email_never_reaches_the_table() {
    let pool = migrated_pool().await;
    let leads = SqlLeadRepository::new(pool.clone());

    let mut lead = LeadRecord::captured(StoreId(1), "a@b.com", None, LeadType::VipCustom, "custom")
        .expect("lead");
    lead.email = "   ".to_string();

    let error = leads.insert(lead).await.expect_err("blank email must be rejected");
    assert!(matches!(error, RepositoryError::Rejected(_)));
    assert_eq!(leads.count_for_store(StoreId(1)).await.expect("count"), 0);

    pool.close().await;
}
