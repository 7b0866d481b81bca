use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use serde::Serialize;
use tower_http::LatencyUnit;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};

use crate::config::Config;
use crate::controllers::{self, AppState};
use crate::migrations::Migrator;
use crate::response::ApiResponse;

/// The calstar API server: configuration plus a migrated database.
pub struct App {
    pub config: Config,
    pub db: DatabaseConnection,
}

impl App {
    /// Load configuration from the environment, connect and migrate.
    pub async fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let config = Config::from_env()?;
        Self::with_config(config).await
    }

    /// Connect with the given config and run pending migrations.
    pub async fn with_config(config: Config) -> Result<Self, Box<dyn std::error::Error>> {
        let db = crate::db::connect(&config).await?;

        tracing::info!("Running pending database migrations...");
        Migrator::up(&db, None).await?;
        tracing::info!("Migrations complete.");

        Ok(App { config, db })
    }

    /// Wrap an existing connection. Migrations are the caller's business.
    pub fn from_parts(config: Config, db: DatabaseConnection) -> Self {
        App { config, db }
    }

    /// Build the Axum router with state and request tracing applied.
    pub fn router(&self) -> Router {
        let state = AppState {
            db: self.db.clone(),
            config: Arc::new(self.config.clone()),
        };
        let level = if self.config.is_dev() {
            tracing::Level::INFO
        } else {
            tracing::Level::DEBUG
        };

        Router::new()
            .route("/", get(welcome))
            .merge(controllers::routes())
            .with_state(state)
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(DefaultMakeSpan::new().level(level))
                    .on_request(DefaultOnRequest::new().level(level))
                    .on_response(
                        DefaultOnResponse::new()
                            .level(level)
                            .latency_unit(LatencyUnit::Millis),
                    ),
            )
    }

    /// Serve until ctrl-c.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        let addr = self.config.server_addr();
        let router = self.router();

        let listener = tokio::net::TcpListener::bind(&addr).await?;
        tracing::info!(%addr, environment = %self.config.environment, "calstar server running");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down calstar server...");
}

#[derive(Serialize)]
struct WelcomeMessage {
    service: &'static str,
    version: &'static str,
    status: &'static str,
}

/// Service banner at `/`.
async fn welcome() -> ApiResponse<WelcomeMessage> {
    ApiResponse::success(WelcomeMessage {
        service: "calstar",
        version: env!("CARGO_PKG_VERSION"),
        status: "running",
    })
}
