//! Metrics HTTP server.
//!
//! Serves the registry in the Prometheus text exposition format at
//! `/metrics`, with a small HTML index at `/` pointing scrapers and
//! humans at it.

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::get;
use prometheus::{Encoder, Registry, TextEncoder};
use tracing::error;

const INDEX_PAGE: &str = "<html>\
<head><title>stackwatch exporter</title></head>\
<body><h1>stackwatch exporter</h1>\
<p><a href='/metrics'>Metrics</a></p>\
</body></html>";

/// Shared state for the metrics routes.
#[derive(Clone)]
pub struct MetricsState {
    registry: Registry,
}

/// Build the exporter's router: `/` index and `/metrics` exposition.
pub fn build_router(registry: Registry) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/metrics", get(render_metrics))
        .with_state(MetricsState { registry })
}

async fn index() -> Html<&'static str> {
    Html(INDEX_PAGE)
}

async fn render_metrics(State(state): State<MetricsState>) -> Result<String, StatusCode> {
    let mut buffer = Vec::new();
    TextEncoder::new()
        .encode(&state.registry.gather(), &mut buffer)
        .map_err(|err| {
            error!(error = %err, "failed to encode metrics");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    String::from_utf8(buffer).map_err(|err| {
        error!(error = %err, "metrics exposition is not valid UTF-8");
        StatusCode::INTERNAL_SERVER_ERROR
    })
}
