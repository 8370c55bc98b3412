//! Shelfwire server: real-time notification and activity fan-out engine.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use shelfwire_core::config::AppConfig;
use shelfwire_core::error::AppError;
use shelfwire_database::repositories::activity::ActivityRepository;
use shelfwire_database::repositories::follow::FollowRepository;
use shelfwire_database::repositories::notification::NotificationRepository;
use shelfwire_database::{ActivityStore, DatabasePool, FollowGraph, NotificationStore};
use shelfwire_realtime::connection::registry::ConnectionRegistry;
use shelfwire_realtime::dispatcher::NotificationDispatcher;
use shelfwire_service::activity::ActivityFeedService;
use shelfwire_service::notification::NotificationManagementService;
use shelfwire_worker::jobs::retention::RetentionSweeper;
use shelfwire_worker::scheduler::CronScheduler;

#[tokio::main]
async fn main() {
    let env = std::env::var("SHELFWIRE_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Shelfwire v{}", env!("CARGO_PKG_VERSION"));

    // ── Database connection + migrations ─────────────────────────
    let db = DatabasePool::connect(&config.database).await?;
    shelfwire_database::migration::run_migrations(db.pool()).await?;

    // ── Stores ───────────────────────────────────────────────────
    let notification_store: Arc<dyn NotificationStore> =
        Arc::new(NotificationRepository::new(db.pool().clone()));
    let activity_store: Arc<dyn ActivityStore> =
        Arc::new(ActivityRepository::new(db.pool().clone()));
    let follow_graph: Arc<dyn FollowGraph> = Arc::new(FollowRepository::new(db.pool().clone()));

    // ── Realtime engine ──────────────────────────────────────────
    let registry = Arc::new(ConnectionRegistry::new(config.realtime.clone()));
    let dispatcher = Arc::new(NotificationDispatcher::new(
        Arc::clone(&registry),
        Arc::clone(&notification_store),
        Arc::clone(&activity_store),
        Arc::clone(&follow_graph),
    ));

    // ── Services ─────────────────────────────────────────────────
    let notification_service = Arc::new(NotificationManagementService::new(Arc::clone(
        &notification_store,
    )));
    let activity_service = Arc::new(ActivityFeedService::new(
        Arc::clone(&activity_store),
        Arc::clone(&follow_graph),
    ));

    // ── Retention scheduler ──────────────────────────────────────
    let mut scheduler = if config.retention.enabled {
        let scheduler = CronScheduler::new(config.retention.clone()).await?;
        scheduler
            .register_retention_sweep(RetentionSweeper::new(
                Arc::clone(&notification_service),
                Arc::clone(&activity_service),
                config.retention.clone(),
            ))
            .await?;
        scheduler.start().await?;
        Some(scheduler)
    } else {
        tracing::info!("Retention sweep disabled");
        None
    };

    // ── HTTP server ──────────────────────────────────────────────
    let app_state = shelfwire_api::state::AppState {
        config: Arc::new(config.clone()),
        registry: Arc::clone(&registry),
        dispatcher,
        notification_service,
        activity_service,
    };

    let app = shelfwire_api::router::build_router(app_state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("Shelfwire server listening on {addr}");

    // The signal task broadcasts shutdown; one receiver starts the
    // connection drain, the other arms the grace deadline so a stuck
    // drain cannot hold the process open past the configured timeout.
    let (shutdown_tx, mut drain_rx) = tokio::sync::watch::channel(false);
    let mut deadline_rx = drain_rx.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    });

    let grace = std::time::Duration::from_secs(config.server.shutdown_grace_seconds);
    let serve = axum::serve(listener, app).with_graceful_shutdown(async move {
        let _ = drain_rx.changed().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
    });

    tokio::select! {
        result = serve => {
            result.map_err(|e| AppError::internal(format!("Server error: {e}")))?;
        }
        _ = async {
            let _ = deadline_rx.changed().await;
            tokio::time::sleep(grace).await;
        } => {
            tracing::warn!(
                "Graceful shutdown did not finish within {}s, closing anyway",
                config.server.shutdown_grace_seconds
            );
        }
    }

    if let Some(scheduler) = scheduler.as_mut() {
        scheduler.shutdown().await?;
    }
    db.close().await;

    tracing::info!("Shelfwire server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
