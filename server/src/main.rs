//! Workshop booking HTTP server.

use atelier_core::{BookingEnvironment, BookingService};
use atelier_postgres::PostgresWorkshopStore;
use atelier_server::{AppState, Config, auth::StaticTokenResolver, build_router, metrics};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tokio::sync::oneshot;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env is optional
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_new(&config.server.log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting workshop booking server");
    info!(
        address = %config.server.address(),
        metrics_address = %config.server.metrics_address(),
        max_connections = config.database.max_connections,
        admin_tokens = config.auth.admin_tokens.len(),
        "Configuration loaded"
    );

    // Metrics
    let metrics_addr: SocketAddr = config.server.metrics_address().parse()?;
    metrics::install_exporter(metrics_addr)?;
    metrics::register_business_metrics();

    // Database
    info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .acquire_timeout(config.database.connect_timeout())
        .connect(&config.database.url)
        .await?;
    let store = PostgresWorkshopStore::from_pool(pool);
    info!("Database connected");

    if config.database.run_migrations {
        store.migrate().await?;
        info!("Migrations applied");
    }

    let service = BookingService::new(BookingEnvironment::new(Arc::new(store)));

    let resolver = StaticTokenResolver::new(&config.auth.admin_tokens);
    if resolver.is_empty() {
        warn!("No admin tokens configured; administration endpoints will reject every request");
    }

    let app = build_router(
        AppState::new(service, Arc::new(resolver)),
        &config.server.cors_allowed_origins,
    );

    let addr = config.server.address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(address = %addr, "Server listening");

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
    });

    tokio::select! {
        result = &mut server => {
            // Exited without a signal
            result??;
            info!("Server stopped");
            return Ok(());
        }
        () = shutdown_signal() => {}
    }

    let _ = shutdown_tx.send(());
    let timeout = config.server.shutdown_timeout();
    match tokio::time::timeout(timeout, server).await {
        Ok(result) => {
            result??;
            info!("Server stopped");
        }
        Err(_) => {
            warn!(
                timeout_secs = timeout.as_secs(),
                "In-flight requests did not finish before the shutdown timeout"
            );
        }
    }

    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
///
/// A handler that cannot be installed is logged and never fires.
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
        () = ctrl_c => {
            info!("Received Ctrl+C signal, shutting down gracefully...");
        },
        () = terminate => {
            info!("Received SIGTERM signal, shutting down gracefully...");
        },
    }
}
