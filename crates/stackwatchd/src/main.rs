//! stackwatchd — the stackwatch exporter daemon.
//!
//! Polls the orchestrator API on a fixed interval and serves the derived
//! status gauges on a Prometheus-scrapable endpoint:
//! - upstream API client (basic credentials from the environment)
//! - poll driver (immediate first tick, then every `poll_interval`)
//! - metrics server (`/metrics` + HTML index)
//!
//! # Usage
//!
//! ```text
//! STACKWATCH_API_URL=http://orchestrator:8080/v1 \
//! STACKWATCH_ACCESS_KEY=... STACKWATCH_SECRET_KEY=... stackwatchd
//! ```

mod config;
mod driver;

use std::net::SocketAddr;
use std::sync::Arc;

use prometheus::Registry;
use tracing::info;

use stackwatch_api::ApiClient;
use stackwatch_metrics::StatusGauges;
use stackwatch_poller::GraphWalker;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,stackwatch=debug".parse().unwrap()),
        )
        .init();

    let config = Config::from_env()?;
    info!(api_url = %config.api_url, "stackwatch exporter starting");

    // Gauge registry, owned here and injected into the publisher and the
    // metrics server.
    let registry = Registry::new();
    let gauges = StatusGauges::register(&registry)?;
    info!("status gauges registered");

    let client = Arc::new(ApiClient::new(
        &config.access_key,
        &config.secret_key,
        config.fetch_timeout,
    )?);
    let walker = GraphWalker::new(client, &config.api_url);
    info!("upstream client initialized");

    let driver = tokio::spawn(driver::run(walker, gauges, config.poll_interval));

    let router = stackwatch_metrics::build_router(registry);
    let addr = SocketAddr::from(([0, 0, 0, 0], config.listen_port));
    info!(%addr, "metrics server starting");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    driver.abort();
    info!("stackwatch exporter stopped");
    Ok(())
}

/// Resolves on ctrl-c or SIGTERM. No in-flight tick is drained.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install ctrl-c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    info!("shutdown signal received");
}
