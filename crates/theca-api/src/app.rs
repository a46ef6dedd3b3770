//! Server bootstrap: builds state, binds both listeners, and drives
//! graceful shutdown.

use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{error, info, warn};

use theca_auth::PasswordHasher;
use theca_core::config::{AppConfig, DatabaseBackend};
use theca_core::error::{AppError, ErrorCode};
use theca_database::migration::run_migrations;
use theca_database::connection;
use theca_database::{MemoryUserRepository, PgPool, PgUserRepository, UserStore};

use crate::router::{build_admin_router, build_public_router};
use crate::state::AppState;

/// Runs the Theca server until SIGINT/SIGTERM.
///
/// Both listeners stop accepting on the signal and drain in-flight
/// requests. If draining exceeds `server.shutdown_grace_seconds` the
/// remaining connections are dropped.
pub async fn run_server(config: AppConfig) -> Result<(), AppError> {
    info!("Starting Theca server...");
    let config = Arc::new(config);

    let (store, db) = build_store(&config).await?;
    let state = AppState::new(Arc::clone(&config), store, PasswordHasher::new());

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let rps_task = Arc::clone(&state.rps).spawn(config.metrics.tick(), shutdown_rx.clone());

    let public_listener = bind(&config.server.public_addr()).await?;
    let admin_listener = bind(&config.server.admin_addr()).await?;
    info!(public = %config.server.public_addr(), admin = %config.server.admin_addr(), "Theca listening");
    state.metrics.record_info("server_started");

    let public = axum::serve(public_listener, build_public_router(state.clone()))
        .with_graceful_shutdown(wait_for_shutdown(shutdown_rx.clone()));
    let admin = axum::serve(admin_listener, build_admin_router(state))
        .with_graceful_shutdown(wait_for_shutdown(shutdown_rx));

    let public_task = tokio::spawn(async move {
        if let Err(e) = public.await {
            error!(error = %e, "Public listener failed");
        }
    });
    let admin_task = tokio::spawn(async move {
        if let Err(e) = admin.await {
            error!(error = %e, "Admin listener failed");
        }
    });
    let aborts = [public_task.abort_handle(), admin_task.abort_handle()];

    shutdown_signal().await;
    let _ = shutdown_tx.send(true);

    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let drained = tokio::time::timeout(grace, async {
        let _ = tokio::join!(public_task, admin_task, rps_task);
    })
    .await;

    if drained.is_err() {
        warn!(grace_seconds = grace.as_secs(), "Shutdown grace period exceeded, forcing exit");
        for handle in aborts {
            handle.abort();
        }
    }

    if let Some(pool) = db {
        pool.close().await;
        info!("Database pool closed");
    }

    info!("Server shutdown complete");
    Ok(())
}

async fn build_store(config: &AppConfig) -> Result<(Arc<dyn UserStore>, Option<PgPool>), AppError> {
    match config.database.backend {
        DatabaseBackend::Postgres => {
            let pool = connection::connect(&config.database).await?;
            run_migrations(&pool).await?;
            let store: Arc<dyn UserStore> = Arc::new(PgUserRepository::new(pool.clone()));
            Ok((store, Some(pool)))
        }
        DatabaseBackend::Memory => {
            warn!("Using the in-memory user store; data is lost on exit");
            let store: Arc<dyn UserStore> = Arc::new(MemoryUserRepository::new());
            Ok((store, None))
        }
    }
}

async fn bind(addr: &str) -> Result<TcpListener, AppError> {
    TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::with_source(ErrorCode::InternalError, format!("Failed to bind {addr}"), e))
}

async fn wait_for_shutdown(mut rx: watch::Receiver<bool>) {
    while !*rx.borrow_and_update() {
        if rx.changed().await.is_err() {
            break;
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, initiating graceful shutdown"),
        _ = terminate => info!("Received SIGTERM, initiating graceful shutdown"),
    }
}
