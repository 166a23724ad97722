//! webstats standalone binary.
//!
//! Serves the dashboard for this process itself: identity from
//! `WEBSTATS_NAME`/`WEBSTATS_OWNER`, settings from
//! `data/webstats/settings.json`, template from `template_path`.

use std::sync::Arc;

use tracing_subscriber::{fmt, EnvFilter};

use webstats_core::error::Result;
use webstats_server::config::{self, JsonFileStore};
use webstats_server::host::{HostIdentity, LogNotifySink, ProcessStatsProvider};
use webstats_server::{StartGate, StatusServer};

#[tokio::main]
async fn main() {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    if let Err(e) = run().await {
        tracing::error!(code = e.code().as_str(), error = %e, "webstats failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let store = JsonFileStore::default();
    let settings = config::load_or_init(&store)?;

    let name = std::env::var("WEBSTATS_NAME").unwrap_or_else(|_| "webstats".into());
    let owner = std::env::var("WEBSTATS_OWNER").unwrap_or_else(|_| "operator".into());
    let provider = Arc::new(ProcessStatsProvider::new(HostIdentity::new(name, owner)));

    let gate = StartGate::from_settings(&settings);
    let server = StatusServer::builder()
        .settings(settings)
        .provider(provider)
        .notify(Arc::new(LogNotifySink))
        .build()?;

    server.serve_until(gate, shutdown_signal()).await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to install SIGTERM handler");
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
    tracing::info!("signal received, starting graceful shutdown");
}
