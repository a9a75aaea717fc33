use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tracing::{info, warn};

use crate::app::{app, AppState};
use crate::auth::JwtKeys;
use crate::config::{AppConfig, StorageBackend};
use crate::database::{DatabaseManager, Store};
use crate::services::OwnershipPolicy;

pub async fn handle(mut config: AppConfig, port: Option<u16>) -> anyhow::Result<()> {
    if let Some(port) = port {
        config.server.port = port;
    }

    let store = match config.database.backend {
        StorageBackend::Postgres => {
            let pool = DatabaseManager::connect(&config.database)
                .await
                .context("connecting to the database")?;
            DatabaseManager::migrate(&pool)
                .await
                .context("applying the schema")?;
            Store::postgres(pool)
        }
        StorageBackend::Memory => {
            warn!("Using the in-memory store; data is lost on shutdown");
            Store::memory()
        }
    };

    let jwt = JwtKeys::from_config(&config.security).context("loading JWT keys")?;
    let policy = OwnershipPolicy::from_flag(config.security.admin_override);
    if policy.admin_override() {
        warn!("Admin override is enabled: admins may modify any resource");
    }

    let state = AppState::new(store, jwt, policy, config.security.password_cost);
    let router = app(state, &config);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", config.server.host, config.server.port))?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!("todo-api listening on http://{}", addr);

    let signalled = Arc::new(Notify::new());
    let server = axum::serve(listener, router).with_graceful_shutdown(shutdown_signal(signalled.clone()));

    drain(server, signalled, config.shutdown_grace()).await
}

/// Runs the server; once a shutdown signal arrives, in-flight requests get
/// `grace` to finish before the process stops waiting for them.
async fn drain<F>(server: F, signalled: Arc<Notify>, grace: Duration) -> anyhow::Result<()>
where
    F: std::future::IntoFuture<Output = std::io::Result<()>>,
{
    let server = server.into_future();
    tokio::pin!(server);

    tokio::select! {
        result = &mut server => {
            result.context("server error")?;
        }
        _ = signalled.notified() => {
            match tokio::time::timeout(grace, &mut server).await {
                Ok(result) => result.context("server error")?,
                Err(_) => warn!("Shutdown grace period of {:?} elapsed; dropping open connections", grace),
            }
        }
    }

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal(signalled: Arc<Notify>) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining requests");
    signalled.notify_one();
}
