use std::sync::Arc;

use axum::Router;
use kilo_agent::{
    ActionExecutor, AgentRuntime, CompletionClient, CompletionError, CompletionSettings,
    OpenAiChatClient, PersonaPromptBuilder,
};
use kilo_core::config::{AppConfig, ConfigError, LoadOptions};
use kilo_core::intent::IntentTagger;
use kilo_db::repositories::{
    ChatTurnRepository, DraftOrderRepository, LeadRepository, SqlChatTurnRepository,
    SqlDraftOrderRepository, SqlKnowledgeRepository, SqlLeadRepository,
};
use kilo_db::{connect_with_config, migrations, DbPool};
use thiserror::Error;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::chat::{self, ChatState};
use crate::health;
use crate::widget::{self, WidgetState};

pub struct Application {
    pub config: AppConfig,
    pub db_pool: DbPool,
    pub chat: ChatState,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database connection failed: {0}")]
    DatabaseConnect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),
    #[error("completion client setup failed: {0}")]
    Completion(#[source] CompletionError),
}

impl Application {
    /// Every HTTP route, with permissive CORS so the widget can be embedded anywhere.
    pub fn router(&self) -> Router {
        chat::router(self.chat.clone())
            .merge(widget::router(WidgetState::new(&self.config.server.public_base_url)))
            .merge(health::router(self.db_pool.clone()))
            .layer(CorsLayer::permissive())
    }
}

pub async fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config).await
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        llm_provider = config.llm.provider.as_str(),
        model = %config.llm.model,
        "starting application bootstrap"
    );

    let db_pool =
        connect_with_config(&config.database).await.map_err(BootstrapError::DatabaseConnect)?;
    info!(
        event_name = "system.bootstrap.database_connected",
        correlation_id = "bootstrap",
        "database connection established"
    );

    migrations::run_pending(&db_pool).await.map_err(BootstrapError::Migration)?;
    info!(
        event_name = "system.bootstrap.migrations_applied",
        correlation_id = "bootstrap",
        "database migrations applied"
    );

    let llm = OpenAiChatClient::from_config(&config.llm).map_err(BootstrapError::Completion)?;
    let turns: Arc<dyn ChatTurnRepository> = Arc::new(SqlChatTurnRepository::new(db_pool.clone()));
    let leads: Arc<dyn LeadRepository> = Arc::new(SqlLeadRepository::new(db_pool.clone()));
    let orders: Arc<dyn DraftOrderRepository> =
        Arc::new(SqlDraftOrderRepository::new(db_pool.clone()));

    let runtime = AgentRuntime::new(
        PersonaPromptBuilder::new(Arc::new(SqlKnowledgeRepository::new(db_pool.clone()))),
        CompletionClient::new(Arc::new(llm), CompletionSettings::from(&config.llm)),
        IntentTagger::default(),
        ActionExecutor::new(leads.clone(), orders.clone()),
        turns.clone(),
    );

    Ok(Application {
        config,
        db_pool,
        chat: ChatState { runtime, turns, leads, orders },
    })
}
