//! Job Board API Gateway
//!
//! The HTTP entry point for the job board.
//! Handles:
//! - Cookie and bearer-token authentication with role guards
//! - Rate limiting of the credential endpoints
//! - Request routing to the service layer
//! - Observability (logging, metrics, tracing)

mod app;
mod extract;
mod handlers;
mod middleware;

use std::net::SocketAddr;
use std::sync::Arc;

use jobboard_common::{
    auth::JwtManager,
    config::AppConfig,
    db::{DbPool, Repository},
    errors::{self, AppError},
    metrics, Services,
};
use metrics_exporter_prometheus::PrometheusBuilder;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::app::{create_router, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load()?;

    init_tracing(&config);
    info!(
        "Starting Job Board API Gateway v{} ({})",
        jobboard_common::VERSION,
        config.server.environment
    );

    errors::expose_internal_details(!config.is_production());

    let jwt_secret = config.auth.jwt_secret.clone().ok_or_else(|| {
        error!("auth.jwt_secret is not set");
        AppError::Configuration {
            message: "auth.jwt_secret must be set (APP__AUTH__JWT_SECRET)".to_string(),
        }
    })?;

    // Initialize metrics
    if config.observability.metrics_port > 0 {
        let metrics_addr = SocketAddr::from(([0, 0, 0, 0], config.observability.metrics_port));
        PrometheusBuilder::new()
            .set_buckets(metrics::LATENCY_BUCKETS)?
            .with_http_listener(metrics_addr)
            .install()?;
        info!("Metrics exporter listening on {}", metrics_addr);
    } else {
        warn!("Metrics exporter disabled");
    }
    metrics::register_metrics();

    // Initialize database connection
    info!("Connecting to database...");
    let db = DbPool::new(&config.database).await?;
    if config.database.run_migrations {
        db.migrate().await?;
    }

    let jwt = Arc::new(JwtManager::new(&jwt_secret, config.auth.jwt_expiration_secs));
    let services = Services::new(Repository::new(db.clone()), jwt, &config);

    let config = Arc::new(config);
    let state = AppState::new(config.clone(), db, services);

    // Build the router
    let app = create_router(state);

    // Start the server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.observability.log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    if config.observability.json_logging {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, starting shutdown..."),
        _ = terminate => info!("Received SIGTERM, starting shutdown..."),
    }
}
