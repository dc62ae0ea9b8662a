use std::time::Duration;

use anyhow::Context;
use axum::http::HeaderValue;
use todo_api::config::Config;
use todo_api::http::routing::{self, AppState};
use todo_api::infrastructure::{jwt::TokenIssuer, sqlite_repo::SqliteRepository};
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;
    let repo = SqliteRepository::open(&config.database_url)
        .await
        .with_context(|| format!("failed to open store at {}", config.database_url))?;
    let cors_origin = HeaderValue::from_str(&config.cors_origin).context("invalid CORS_ORIGIN")?;
    let state = AppState::new(repo, TokenIssuer::new(&config.jwt_secret));
    let router = routing::app(state, cors_origin);

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "listening");

    let (stop_tx, mut stop_rx) = watch::channel(false);
    let server = axum::serve(listener, router).with_graceful_shutdown(async move {
        shutdown_signal().await;
        let _ = stop_tx.send(true);
    });
    // In-flight requests get SHUTDOWN_GRACE to drain once the signal arrives.
    let deadline = async move {
        let _ = stop_rx.changed().await;
        tokio::time::sleep(SHUTDOWN_GRACE).await;
    };

    tokio::select! {
        res = async move { server.await } => res?,
        _ = deadline => tracing::warn!("drain window elapsed, forcing shutdown"),
    }
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };
    #[cfg(unix)]
    let terminate = async {
        if let Ok(mut sig) = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            sig.recv().await;
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutting down, draining requests");
}
