//! assetdesk server entry point.

use std::sync::Arc;

use anyhow::Context;
use assetdesk_api::{AppState, build_router};
use assetdesk_common::{Config, config::LogFormat};
use axum::{Router, extract::State, http::StatusCode, routing::get};
use sea_orm::DatabaseConnection;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Largest accepted request body.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

/// Install the global subscriber. `RUST_LOG` wins over the configured filter.
fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    let registry = tracing_subscriber::registry().with(filter);

    match config.logging.format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

/// Liveness probe; also checks the database answers.
async fn healthz(State(db): State<Arc<DatabaseConnection>>) -> (StatusCode, &'static str) {
    match db.ping().await {
        Ok(()) => (StatusCode::OK, "ok"),
        Err(e) => {
            warn!(error = %e, "Health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "database unavailable")
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Configuration comes first so logging can honour it
    let config = Config::load().context("failed to load configuration")?;
    init_tracing(&config);

    info!("Starting assetdesk server...");

    let db = assetdesk_db::init(&config)
        .await
        .context("failed to connect to database")?;
    info!("Connected to database");

    info!("Running database migrations...");
    assetdesk_db::migrate(&db).await?;
    info!("Migrations completed");

    let db = Arc::new(db);
    let state = AppState::new(Arc::clone(&db));

    if let Some(bootstrap) = &config.bootstrap {
        match state.user_service.ensure_bootstrap_admin(bootstrap).await? {
            Some(admin) => info!(email = %admin.email, "Bootstrap admin provisioned"),
            None => info!("Admin account already present, skipping bootstrap"),
        }
    }

    let app = Router::new()
        .route("/healthz", get(healthz).with_state(db))
        .merge(build_router(state))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    let addr = config.server.addr();
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
