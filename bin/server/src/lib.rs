//! taskmate HTTP server.
//!
//! Wires the Postgres store implementations, the Cohere gateway, and
//! the conversation orchestrator into an axum application. The caller's
//! identity arrives pre-verified from the upstream auth layer; this
//! server never handles credentials itself.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod routes;
pub mod state;

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use taskmate_ai::CohereChatGateway;
use taskmate_assistant::{ChatOrchestrator, ToolDispatcher};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::db::{PgConversationStore, PgMessageStore, PgProfileStore, PgTaskStore};
use crate::error::StartupError;
use crate::state::AppState;

/// Loads configuration, connects the stores, and serves until shutdown.
///
/// # Errors
///
/// Returns a [`StartupError`] report when configuration, the database,
/// the gateway client, or the listener cannot be brought up.
pub async fn run() -> taskmate_core::Result<(), StartupError> {
    let config = ServerConfig::from_env().map_err(|e| StartupError::ConfigLoad {
        details: e.to_string(),
    })?;
    tracing::info!("Loaded configuration");

    let db_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .map_err(|e| StartupError::DatabaseConnect {
            details: e.to_string(),
        })?;

    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .map_err(|e| StartupError::Migrate {
            details: e.to_string(),
        })?;

    let conversations = Arc::new(PgConversationStore::new(db_pool.clone()));
    let messages = Arc::new(PgMessageStore::new(db_pool.clone()));
    let tasks = Arc::new(PgTaskStore::new(db_pool.clone()));
    let profiles = Arc::new(PgProfileStore::new(db_pool));

    let gateway =
        Arc::new(
            CohereChatGateway::new(config.gateway).map_err(|e| StartupError::GatewayInit {
                details: e.to_string(),
            })?,
        );

    let orchestrator = ChatOrchestrator::new(
        conversations.clone(),
        messages.clone(),
        gateway,
        ToolDispatcher::new(tasks, profiles),
    )
    .map_err(|e| StartupError::RegistryInit {
        details: e.to_string(),
    })?;

    let app_state = AppState::new(orchestrator, conversations, messages);
    let app = routes::router(app_state).layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .map_err(|e| StartupError::Bind {
            addr: config.listen_addr.clone(),
            details: e.to_string(),
        })?;

    tracing::info!("listening on http://{}", config.listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| StartupError::Serve {
            details: e.to_string(),
        })?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to install shutdown handler");
    }
}
