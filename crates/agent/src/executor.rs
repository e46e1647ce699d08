use std::sync::Arc;

use kilo_core::domain::customer::CustomerData;
use kilo_core::domain::lead::{DraftOrder, LeadRecord, LeadType};
use kilo_core::domain::store::StoreId;
use kilo_core::intent::{IntentAction, IntentKind};
use kilo_db::repositories::{DraftOrderRepository, LeadRepository, RowId};
use serde::Serialize;
use tracing::{error, info};

/// Outcome of executing one tagged action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ActionResult {
    LeadCaptured { lead_id: RowId, lead_type: LeadType },
    EmailRequired,
    DraftOrderCreated { order_id: RowId },
    NoActionTaken,
    Failed { error: String },
}

#[derive(Clone)]
pub struct ActionExecutor {
    leads: Arc<dyn LeadRepository>,
    orders: Arc<dyn DraftOrderRepository>,
}

impl ActionExecutor {
    pub fn new(leads: Arc<dyn LeadRepository>, orders: Arc<dyn DraftOrderRepository>) -> Self {
        Self { leads, orders }
    }

    pub async fn execute(
        &self,
        store_id: StoreId,
        action: &IntentAction,
        customer: &CustomerData,
    ) -> ActionResult {
        match action.kind {
            IntentKind::CaptureB2bLead => {
                self.capture_lead(store_id, customer, LeadType::B2bBulk).await
            }
            IntentKind::CaptureVipLead => {
                self.capture_lead(store_id, customer, LeadType::VipCustom).await
            }
            IntentKind::CreateDraftOrder => self.create_draft_order(store_id, customer).await,
            IntentKind::MarkEngagedCustomer => ActionResult::NoActionTaken,
        }
    }

    async fn capture_lead(
        &self,
        store_id: StoreId,
        customer: &CustomerData,
        lead_type: LeadType,
    ) -> ActionResult {
        let Some(email) = customer.contact_email() else {
            return ActionResult::EmailRequired;
        };
        let lead = match LeadRecord::captured(
            store_id,
            email,
            customer.display_name().map(str::to_string),
            lead_type,
            customer.message.clone(),
        ) {
            Ok(lead) => lead,
            Err(_) => return ActionResult::EmailRequired,
        };

        match self.leads.insert(lead).await {
            Ok(lead_id) => {
                info!(
                    event_name = "agent.action.lead_captured",
                    store_id = %store_id,
                    lead_id,
                    lead_type = lead_type.as_str(),
                    "lead captured"
                );
                ActionResult::LeadCaptured { lead_id, lead_type }
            }
            Err(write_error) => {
                error!(
                    event_name = "agent.action.lead_failed",
                    store_id = %store_id,
                    lead_type = lead_type.as_str(),
                    error = %write_error,
                    "lead insert failed"
                );
                ActionResult::Failed { error: write_error.to_string() }
            }
        }
    }

    async fn create_draft_order(&self, store_id: StoreId, customer: &CustomerData) -> ActionResult {
        let order = DraftOrder::placeholder(
            store_id,
            customer.contact_email().map(str::to_string),
            customer.display_name().map(str::to_string),
            customer.message.clone(),
        );

        match self.orders.create(order).await {
            Ok(order_id) => {
                info!(
                    event_name = "agent.action.draft_order_created",
                    store_id = %store_id,
                    order_id,
                    "draft order placeholder created"
                );
                ActionResult::DraftOrderCreated { order_id }
            }
            Err(write_error) => {
                error!(
                    event_name = "agent.action.draft_order_failed",
                    store_id = %store_id,
                    error = %write_error,
                    "draft order insert failed"
                );
                ActionResult::Failed { error: write_error.to_string() }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use kilo_core::domain::customer::CustomerData;
    use kilo_core::domain::lead::{DraftOrder, LeadType};
    use kilo_core::domain::store::StoreId;
    use kilo_core::intent::{IntentAction, IntentKind, Priority};
    use kilo_db::repositories::{
        DraftOrderRepository, InMemoryDraftOrderRepository, InMemoryLeadRepository,
        RepositoryError, RowId,
    };

    use super::{ActionExecutor, ActionResult};

    fn action(kind: IntentKind) -> IntentAction {
        IntentAction { kind, priority: Priority::High, reason: "test".to_string() }
    }

    fn executor() -> (ActionExecutor, Arc<InMemoryLeadRepository>, Arc<InMemoryDraftOrderRepository>)
    {
        let leads = Arc::new(InMemoryLeadRepository::default());
        let orders = Arc::new(InMemoryDraftOrderRepository::default());
        (ActionExecutor::new(leads.clone(), orders.clone()), leads, orders)
    }

    struct BrokenOrders;

    #[async_trait]
    impl DraftOrderRepository for BrokenOrders {
        async fn create(&self, _order: DraftOrder) -> Result<RowId, RepositoryError> {
            Err(RepositoryError::Rejected("disk full".to_string()))
        }

        async fn count_for_store(&self, _store_id: StoreId) -> Result<i64, RepositoryError> {
            Ok(0)
        }
    }

    #[tokio::test]
    async fn b2b_lead_without_email_requires_email_and_writes_nothing() {
        let (executor, leads, _) = executor();
        let customer = CustomerData::new(None, Some("Ana".to_string()), "need a website");

        let result = executor.execute(StoreId(1), &action(IntentKind::CaptureB2bLead), &customer).await;
        assert_eq!(result, ActionResult::EmailRequired);

        let blank = CustomerData::new(Some("   ".to_string()), None, "need a website");
        let result = executor.execute(StoreId(1), &action(IntentKind::CaptureB2bLead), &blank).await;
        assert_eq!(result, ActionResult::EmailRequired);

        assert!(leads.leads().await.is_empty());
    }

    #[tokio::test]
    async fn b2b_lead_with_email_is_captured_as_bulk_with_fixed_score() {
        let (executor, leads, _) = executor();
        let customer = CustomerData::new(Some("a@b.com".to_string()), None, "bulk hoodies");

        let result = executor.execute(StoreId(1), &action(IntentKind::CaptureB2bLead), &customer).await;
        assert_eq!(result, ActionResult::LeadCaptured { lead_id: 1, lead_type: LeadType::B2bBulk });

        let stored = leads.leads().await;
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].email, "a@b.com");
        assert_eq!(stored[0].lead_type, LeadType::B2bBulk);
        assert_eq!(stored[0].intent_score, 85);
        assert_eq!(stored[0].chat_context, "bulk hoodies");
        assert!(stored[0].consent_email);
    }

    #[tokio::test]
    async fn vip_lead_is_captured_as_custom() {
        let (executor, leads, _) = executor();
        let customer =
            CustomerData::new(Some("vip@b.com".to_string()), Some("Kai".to_string()), "custom");

        let result = executor.execute(StoreId(2), &action(IntentKind::CaptureVipLead), &customer).await;
        assert!(matches!(result, ActionResult::LeadCaptured { lead_type: LeadType::VipCustom, .. }));
        assert_eq!(leads.leads().await[0].name.as_deref(), Some("Kai"));
    }

    #[tokio::test]
    async fn draft_order_is_created_without_email() {
        let (executor, _, orders) = executor();
        let customer = CustomerData::new(None, None, "checkout now");

        let result =
            executor.execute(StoreId(5), &action(IntentKind::CreateDraftOrder), &customer).await;
        assert_eq!(result, ActionResult::DraftOrderCreated { order_id: 1 });

        let stored = orders.orders().await;
        assert_eq!(stored[0].status, "draft");
        assert_eq!(stored[0].note, "checkout now");
    }

    #[tokio::test]
    async fn engagement_takes_no_action() {
        let (executor, leads, orders) = executor();
        let customer = CustomerData::new(Some("a@b.com".to_string()), None, "how?");

        let result =
            executor.execute(StoreId(1), &action(IntentKind::MarkEngagedCustomer), &customer).await;
        assert_eq!(result, ActionResult::NoActionTaken);
        assert!(leads.leads().await.is_empty());
        assert!(orders.orders().await.is_empty());
    }

    #[tokio::test]
    async fn write_failure_is_reported_not_raised() {
        let executor =
            ActionExecutor::new(Arc::new(InMemoryLeadRepository::default()), Arc::new(BrokenOrders));
        let customer = CustomerData::new(None, None, "buy");

        let result =
            executor.execute(StoreId(1), &action(IntentKind::CreateDraftOrder), &customer).await;
        assert_eq!(result, ActionResult::Failed { error: "rejected write: disk full".to_string() });
    }

    #[test]
    fn results_serialize_with_status_tag() {
        let captured = serde_json::to_value(ActionResult::LeadCaptured {
            lead_id: 4,
            lead_type: LeadType::B2bBulk,
        })
        .expect("serialize");
        assert_eq!(captured["status"], "lead_captured");
        assert_eq!(captured["lead_id"], 4);
        assert_eq!(captured["lead_type"], "b2b_bulk");

        let missing = serde_json::to_value(ActionResult::EmailRequired).expect("serialize");
        assert_eq!(missing, serde_json::json!({ "status": "email_required" }));
    }
}
