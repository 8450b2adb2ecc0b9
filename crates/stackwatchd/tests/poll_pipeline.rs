//! End-to-end pipeline tests.
//!
//! Runs the walk → reduce → publish → scrape sequence against a local
//! fixture API, asserting the exact gauge samples a scraper would see.

use std::sync::Arc;
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::body::Body;
use axum::http::Request;
use axum::routing::get;
use prometheus::Registry;
use serde_json::json;
use tower::ServiceExt;

use stackwatch_api::ApiClient;
use stackwatch_metrics::{StatusGauges, build_router};
use stackwatch_poller::GraphWalker;

fn test_client() -> Arc<ApiClient> {
    Arc::new(ApiClient::new("access", "secret", Duration::from_secs(2)).unwrap())
}

/// Serve a minimal cluster: one project, one environment `prod` with two
/// services (`web` active, `db` inactive), one active host `node1`.
async fn fixture_api() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());

    let projects = {
        let base = base.clone();
        move || {
            let body = json!({"data": [{"links": {
                "environments": format!("{base}/environments"),
                "hosts": format!("{base}/hosts"),
            }}]});
            async move { Json(body) }
        }
    };
    let environments = {
        let base = base.clone();
        move || {
            let body = json!({"data": [
                {"id": "1", "name": "prod",
                 "links": {"services": format!("{base}/s1")}},
            ]});
            async move { Json(body) }
        }
    };

    let app = Router::new()
        .route("/projects", get(projects))
        .route("/environments", get(environments))
        .route(
            "/s1",
            get(|| async {
                Json(json!({"data": [
                    {"name": "web", "state": "active", "environmentId": "1"},
                    {"name": "db", "state": "inactive", "environmentId": "1"},
                ]}))
            }),
        )
        .route(
            "/hosts",
            get(|| async { Json(json!({"data": [{"name": "node1", "state": "active"}]})) }),
        );

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    base
}

async fn scrape(registry: Registry) -> String {
    let response = build_router(registry)
        .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn tick_publishes_expected_samples() {
    let base = fixture_api().await;
    let walker = GraphWalker::new(test_client(), &base);

    let registry = Registry::new();
    let gauges = StatusGauges::register(&registry).unwrap();

    let outcome = walker.poll().await.unwrap();
    gauges.publish(&outcome);

    let text = scrape(registry).await;
    // One inactive service drags the environment aggregate to 0.
    assert!(text.contains("stackwatch_environment_status{name=\"prod\"} 0"));
    assert!(text.contains("stackwatch_service_status{name=\"prod/web\"} 1"));
    assert!(text.contains("stackwatch_service_status{name=\"prod/db\"} 0"));
    assert!(text.contains("stackwatch_host_status{name=\"node1\"} 1"));
}

#[tokio::test]
async fn repeated_ticks_are_idempotent() {
    let base = fixture_api().await;
    let walker = GraphWalker::new(test_client(), &base);

    let registry = Registry::new();
    let gauges = StatusGauges::register(&registry).unwrap();

    gauges.publish(&walker.poll().await.unwrap());
    let first = scrape(registry.clone()).await;

    gauges.publish(&walker.poll().await.unwrap());
    let second = scrape(registry).await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn failed_tick_publishes_nothing() {
    // Five environments; one services link points at a closed port.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());

    let projects = {
        let base = base.clone();
        move || {
            let body = json!({"data": [{"links": {
                "environments": format!("{base}/environments"),
                "hosts": format!("{base}/hosts"),
            }}]});
            async move { Json(body) }
        }
    };
    let environments = {
        let base = base.clone();
        move || {
            let mut entries = Vec::new();
            for n in 1..=5 {
                let services = if n == 5 {
                    "http://127.0.0.1:1/services".to_string()
                } else {
                    format!("{base}/services")
                };
                entries.push(json!({
                    "id": format!("{n}"),
                    "name": format!("env{n}"),
                    "links": {"services": services},
                }));
            }
            async move { Json(json!({"data": entries})) }
        }
    };
    let app = Router::new()
        .route("/projects", get(projects))
        .route("/environments", get(environments))
        .route(
            "/services",
            get(|| async {
                Json(json!({"data": [
                    {"name": "svc", "state": "active", "environmentId": "1"},
                ]}))
            }),
        )
        .route(
            "/hosts",
            get(|| async { Json(json!({"data": [{"name": "node1", "state": "active"}]})) }),
        );
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let walker = GraphWalker::new(test_client(), &base);
    let registry = Registry::new();
    let gauges = StatusGauges::register(&registry).unwrap();

    let result = walker.poll().await;
    assert!(result.is_err());
    if let Ok(outcome) = result {
        gauges.publish(&outcome);
    }

    // The tick failed wholesale: no sample from the four healthy
    // environments either.
    let text = scrape(registry).await;
    assert!(!text.contains("{name="), "unexpected samples: {text}");
}
