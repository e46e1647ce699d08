//! Customer-facing JSON routes.
//!
//! - `GET  /`                       service banner
//! - `POST /chat/{store_id}`        run one message through the agent pipeline
//! - `GET  /store/{store_id}/stats` chat, lead and draft-order counts

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use kilo_agent::{AgentRuntime, ChatReply, ChatRequest, AGENT_NAME};
use kilo_core::domain::store::StoreId;
use kilo_core::errors::{ApplicationError, InterfaceError};
use kilo_db::repositories::{ChatTurnRepository, DraftOrderRepository, LeadRepository};
use kilo_db::StoreStats;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use uuid::Uuid;

#[derive(Clone)]
pub struct ChatState {
    pub runtime: AgentRuntime,
    pub turns: Arc<dyn ChatTurnRepository>,
    pub leads: Arc<dyn LeadRepository>,
    pub orders: Arc<dyn DraftOrderRepository>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ChatBody {
    /// `null` and absent both count as no message.
    pub message: Option<String>,
    pub session_id: Option<String>,
    pub customer: Option<CustomerBody>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CustomerBody {
    pub email: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Banner {
    pub service: &'static str,
    pub status: &'static str,
    pub agent: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: StoreStats,
    pub status: &'static str,
    pub agent: &'static str,
    pub last_updated: String,
}

type ApiError = (StatusCode, Json<ErrorBody>);

pub fn router(state: ChatState) -> Router {
    Router::new()
        .route("/", get(banner))
        .route("/chat/{store_id}", post(chat))
        .route("/store/{store_id}/stats", get(store_stats))
        .with_state(state)
}

pub async fn banner() -> Json<Banner> {
    Json(Banner {
        service: "KILO AI Employee",
        status: "online",
        agent: AGENT_NAME,
        message: "Ready to execute for your business",
    })
}

pub async fn chat(
    Path(store_id): Path<i64>,
    State(state): State<ChatState>,
    Json(body): Json<ChatBody>,
) -> Result<Json<ChatReply>, ApiError> {
    let correlation_id = format!("req-{}", Uuid::new_v4());
    let customer = body.customer.unwrap_or_default();
    let request = ChatRequest {
        store_id: StoreId(store_id),
        message: body.message.unwrap_or_default(),
        session_id: body.session_id,
        email: customer.email,
        name: customer.name,
        correlation_id: correlation_id.clone(),
    };

    let reply = state.runtime.handle_message(request).await.map_err(|rejection| {
        warn!(
            event_name = "server.chat.rejected",
            correlation_id = %correlation_id,
            store_id,
            error = %rejection,
            "chat request rejected"
        );
        error_response(ApplicationError::from(rejection).into_interface(&correlation_id))
    })?;

    Ok(Json(reply))
}

pub async fn store_stats(
    Path(store_id): Path<i64>,
    State(state): State<ChatState>,
) -> Result<Json<StatsResponse>, ApiError> {
    let stats = StoreStats::collect(
        StoreId(store_id),
        state.turns.as_ref(),
        state.leads.as_ref(),
        state.orders.as_ref(),
    )
    .await
    .map_err(|repository_error| {
        let correlation_id = format!("req-{}", Uuid::new_v4());
        error!(
            event_name = "server.stats.failed",
            correlation_id = %correlation_id,
            store_id,
            error = %repository_error,
            "store stats query failed"
        );
        error_response(
            ApplicationError::Persistence(repository_error.to_string())
                .into_interface(&correlation_id),
        )
    })?;

    Ok(Json(StatsResponse {
        stats,
        status: "online",
        agent: AGENT_NAME,
        last_updated: Utc::now().to_rfc3339(),
    }))
}

fn error_response(interface: InterfaceError) -> ApiError {
    let status = match interface {
        InterfaceError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        InterfaceError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
    };
    (
        status,
        Json(ErrorBody {
            error: interface.user_message().to_string(),
            correlation_id: Some(interface.correlation_id().to_string()),
        }),
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::Body,
        extract::{Path, State},
        http::{Request, StatusCode},
        Json,
    };
    use kilo_agent::llm::CompletionRequest;
    use kilo_agent::{
        ActionExecutor, AgentRuntime, CompletionClient, CompletionError, CompletionSettings,
        LlmClient, PersonaPromptBuilder, FALLBACK_RESPONSE,
    };
    use kilo_core::domain::lead::DraftOrder;
    use kilo_core::domain::store::StoreId;
    use kilo_core::intent::IntentTagger;
    use kilo_db::repositories::{
        ChatTurnRepository, DraftOrderRepository, InMemoryChatTurnRepository,
        InMemoryDraftOrderRepository, InMemoryKnowledgeRepository, InMemoryLeadRepository,
        LeadRepository, RepositoryError, RowId,
    };
    use tower::ServiceExt;

    use super::{chat, router, store_stats, ChatBody, ChatState, CustomerBody};

    struct CannedLlm(Result<String, CompletionError>);

    #[async_trait]
    impl LlmClient for CannedLlm {
        async fn complete(&self, _request: &CompletionRequest) -> Result<String, CompletionError> {
            self.0.clone()
        }
    }

    struct OfflineOrders;

    #[async_trait]
    impl DraftOrderRepository for OfflineOrders {
        async fn create(&self, _order: DraftOrder) -> Result<RowId, RepositoryError> {
            Err(RepositoryError::Rejected("offline".to_string()))
        }

        async fn count_for_store(&self, _store_id: StoreId) -> Result<i64, RepositoryError> {
            Err(RepositoryError::Rejected("offline".to_string()))
        }
    }

    fn state_with(
        llm: Result<String, CompletionError>,
        orders: Arc<dyn DraftOrderRepository>,
    ) -> ChatState {
        let turns: Arc<dyn ChatTurnRepository> = Arc::new(InMemoryChatTurnRepository::default());
        let leads: Arc<dyn LeadRepository> = Arc::new(InMemoryLeadRepository::default());
        let runtime = AgentRuntime::new(
            PersonaPromptBuilder::new(Arc::new(InMemoryKnowledgeRepository::default())),
            CompletionClient::new(Arc::new(CannedLlm(llm)), CompletionSettings::default()),
            IntentTagger::default(),
            ActionExecutor::new(leads.clone(), orders.clone()),
            turns.clone(),
        );
        ChatState { runtime, turns, leads, orders }
    }

    fn state(llm: Result<String, CompletionError>) -> ChatState {
        state_with(llm, Arc::new(InMemoryDraftOrderRepository::default()))
    }

    fn body(message: &str) -> ChatBody {
        ChatBody { message: Some(message.to_string()), ..ChatBody::default() }
    }

    #[tokio::test]
    async fn empty_message_is_rejected_with_fixed_error() {
        let (status, Json(error)) = chat(Path(1), State(state(Ok("yo".to_string()))), Json(body("")))
            .await
            .expect_err("empty message must be rejected");

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error.error, "No message provided");
        assert!(error.correlation_id.is_some());
    }

    #[tokio::test]
    async fn lead_intent_with_email_is_captured() {
        let state = state(Ok("Locked in.".to_string()));
        let request = ChatBody {
            message: Some("I need a website for my business".to_string()),
            session_id: Some("session_1".to_string()),
            customer: Some(CustomerBody { email: Some("a@b.com".to_string()), name: None }),
        };

        let Json(reply) = chat(Path(4), State(state.clone()), Json(request)).await.expect("reply");

        assert_eq!(reply.response, "Locked in.");
        assert_eq!(reply.session_id.0, "session_1");
        let json = serde_json::to_value(&reply).expect("serialize");
        assert_eq!(json["action_results"][0]["status"], "lead_captured");
        assert_eq!(state.leads.count_for_store(StoreId(4)).await.expect("count"), 1);
        assert_eq!(state.turns.count_for_store(StoreId(4)).await.expect("count"), 1);
    }

    #[tokio::test]
    async fn provider_failure_returns_fallback_with_error_detail() {
        let Json(reply) = chat(
            Path(1),
            State(state(Err(CompletionError::Timeout))),
            Json(body("hello?")),
        )
        .await
        .expect("fallback is still a reply");

        assert_eq!(reply.response, FALLBACK_RESPONSE);
        assert!(reply.error.is_some());
        assert!(reply.actions.is_empty());
    }

    #[tokio::test]
    async fn stats_count_store_activity() {
        let state = state(Ok("yo".to_string()));
        let _reply =
            chat(Path(2), State(state.clone()), Json(body("checkout please"))).await.expect("reply");

        let Json(stats) = store_stats(Path(2), State(state)).await.expect("stats");
        let json = serde_json::to_value(&stats).expect("serialize");

        assert_eq!(json["store_id"], 2);
        assert_eq!(json["total_chats"], 1);
        assert_eq!(json["vip_leads"], 0);
        assert_eq!(json["draft_orders"], 1);
        assert_eq!(json["agent"], "KILO");
    }

    #[tokio::test]
    async fn stats_failure_maps_to_service_unavailable() {
        let state = state_with(Ok("yo".to_string()), Arc::new(OfflineOrders));

        let (status, Json(error)) =
            store_stats(Path(2), State(state)).await.expect_err("stats must fail");
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(error.correlation_id.is_some());
    }

    #[tokio::test]
    async fn router_serves_banner_and_missing_message_over_http() {
        let app = router(state(Ok("yo".to_string())));

        let banner = app
            .clone()
            .oneshot(Request::builder().uri("/").body(Body::empty()).expect("request"))
            .await
            .expect("banner response");
        assert_eq!(banner.status(), StatusCode::OK);

        let missing = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/chat/1")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"session_id":"s"}"#))
                    .expect("request"),
            )
            .await
            .expect("chat response");
        assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
    }

    async fn post_chat(
        app: axum::Router,
        payload: &'static str,
    ) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/chat/1")
                    .header("content-type", "application/json")
                    .body(Body::from(payload))
                    .expect("request"),
            )
            .await
            .expect("chat response");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.expect("body");
        (status, serde_json::from_slice(&bytes).expect("json body"))
    }

    #[tokio::test]
    async fn null_message_gets_the_same_rejection_as_a_missing_one() {
        let app = router(state(Ok("yo".to_string())));

        for payload in [r#"{"message":null}"#, r#"{"message":"   "}"#, r#"{}"#] {
            let (status, json) = post_chat(app.clone(), payload).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "payload {payload}");
            assert_eq!(json["error"], "No message provided", "payload {payload}");
        }
    }

    #[tokio::test]
    async fn null_customer_and_session_are_treated_as_absent() {
        let app = router(state(Ok("Locked in.".to_string())));

        let (status, json) = post_chat(
            app,
            r#"{"message":"I need a website","session_id":null,"customer":null}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["response"], "Locked in.");
        assert_eq!(json["action_results"][0]["status"], "email_required");
        assert!(json["session_id"].as_str().unwrap_or_default().starts_with("session_"));
    }
}
