//! cardhook entry point.
//!
//! This binary is the composition root. Responsibilities:
//!
//! 1. **Read configuration** from the environment ([`config::Config`]).
//! 2. **Wire observability**: `tracing-subscriber` with a JSON layer and an
//!    optional OpenTelemetry OTLP exporter ([`telemetry`]).
//! 3. **Construct infrastructure**: a [`trello::TrelloClient`] as the
//!    `bridge::CardGateway`, and a [`listener::WebhookVerifier`] for the
//!    GitHub secret.
//! 4. **Serve** the webhook endpoint until Ctrl-C / SIGTERM.

mod config;
mod telemetry;

use std::sync::Arc;

use anyhow::Context;
use listener::{AppState, WebhookVerifier};
use tokio::net::TcpListener;
use tracing::{info, warn};
use trello::TrelloClient;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let telemetry = telemetry::init(&config)?;

    let result = run(config).await;
    if let Err(e) = &result {
        tracing::error!(error = %e, "cardhook stopped with an error");
    }

    telemetry.shutdown();
    result
}

async fn run(config: Config) -> anyhow::Result<()> {
    info!(version = env!("CARGO_PKG_VERSION"), bind = %config.bind, "Starting cardhook");

    let gateway = TrelloClient::new(config.trello)
        .context("failed to build Trello client")?
        .with_base_url(config.trello_api_url);

    let verifier = WebhookVerifier::new(config.github_secret);
    if !verifier.is_configured() {
        warn!("GITHUB_SECRET is not set; every delivery will be rejected");
    }

    let state = AppState {
        gateway: Arc::new(gateway),
        verifier,
    };

    let socket = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    info!(address = %config.bind, "Listening for GitHub webhooks");

    listener::serve(socket, state, shutdown_signal())
        .await
        .context("webhook server failed")?;

    info!("cardhook stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
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
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received");
}
