mod common;

use axum::Router;
use axum::routing::get;
use axum_test::TestServer;
use common::MockConnectInfoLayer;
use serde_json::Value;
use visit_counter::api::handlers::health_handler;
use visit_counter::api::routes::visit_routes;
use visit_counter::state::AppState;

fn test_server(state: AppState) -> TestServer {
    let app = Router::new()
        .merge(visit_routes())
        .route("/health", get(health_handler))
        .layer(MockConnectInfoLayer)
        .with_state(state);

    TestServer::new(app).unwrap()
}

#[tokio::test]
async fn test_ping_records_peer_address() {
    let backends = common::create_backends();
    let server = test_server(common::create_test_state(&backends));

    let response = server.get("/ping").await;

    response.assert_status_ok();
    response.assert_text("pong");
    assert_eq!(backends.store.ips(), vec!["127.0.0.1"]);
}

#[tokio::test]
async fn test_ping_ignores_forwarded_for_by_default() {
    let backends = common::create_backends();
    let server = test_server(common::create_test_state(&backends));

    server
        .get("/ping")
        .add_header("X-Forwarded-For", "203.0.113.7")
        .await
        .assert_status_ok();

    assert_eq!(backends.store.ips(), vec!["127.0.0.1"]);
}

#[tokio::test]
async fn test_ping_behind_proxy_uses_forwarded_for() {
    let backends = common::create_backends();
    let state = common::create_test_state(&backends).with_behind_proxy(true);
    let server = test_server(state);

    server
        .get("/ping")
        .add_header("X-Forwarded-For", "203.0.113.7, 10.0.0.1")
        .await
        .assert_status_ok();

    assert_eq!(backends.store.ips(), vec!["203.0.113.7"]);
}

#[tokio::test]
async fn test_visits_returns_plain_count() {
    let backends = common::create_backends();
    let server = test_server(common::create_test_state(&backends));

    server.get("/ping").await.assert_status_ok();
    server.get("/ping").await.assert_status_ok();

    let response = server.get("/visits").await;

    response.assert_status_ok();
    response.assert_text("2");
}

#[tokio::test]
async fn test_visits_without_any_visit_is_zero() {
    let backends = common::create_backends();
    let server = test_server(common::create_test_state(&backends));

    let response = server.get("/visits").await;

    response.assert_status_ok();
    response.assert_text("0");
}

#[tokio::test]
async fn test_ping_store_failure_returns_500() {
    let backends = common::create_backends();
    backends.store.set_fail_writes(true);
    let server = test_server(common::create_test_state(&backends));

    let response = server.get("/ping").await;

    response.assert_status_internal_server_error();
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "internal_error");
    assert_eq!(backends.cache.value(), None);
}

#[tokio::test]
async fn test_visits_store_failure_returns_500() {
    let backends = common::create_backends();
    backends.store.set_fail_reads(true);
    let server = test_server(common::create_test_state(&backends));

    let response = server.get("/visits").await;

    response.assert_status_internal_server_error();
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "internal_error");
}

#[tokio::test]
async fn test_cache_outage_is_invisible_to_clients() {
    let backends = common::create_backends();
    backends.cache.set_failing(true);
    let server = test_server(common::create_test_state(&backends));

    server.get("/ping").await.assert_status_ok();

    let response = server.get("/visits").await;

    response.assert_status_ok();
    response.assert_text("1");
}

#[tokio::test]
async fn test_dev_mode_visits_is_sentinel() {
    let server = test_server(common::create_dev_state());

    server.get("/ping").await.assert_text("pong");

    let response = server.get("/visits").await;

    response.assert_status_ok();
    response.assert_text("-1");
}

#[tokio::test]
async fn test_health_reports_healthy() {
    let backends = common::create_backends();
    let server = test_server(common::create_test_state(&backends));

    let response = server.get("/health").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["mode"], "normal");
    assert_eq!(body["checks"]["store"]["status"], "ok");
    assert_eq!(body["checks"]["cache"]["status"], "ok");
}

#[tokio::test]
async fn test_health_degraded_when_cache_down() {
    let backends = common::create_backends();
    backends.cache.set_failing(true);
    let server = test_server(common::create_test_state(&backends));

    let response = server.get("/health").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["checks"]["cache"]["status"], "error");
}

#[tokio::test]
async fn test_health_unhealthy_when_store_down() {
    let backends = common::create_backends();
    backends.store.set_fail_reads(true);
    let server = test_server(common::create_test_state(&backends));

    let response = server.get("/health").await;

    response.assert_status_service_unavailable();
    let body: Value = response.json();
    assert_eq!(body["status"], "unhealthy");
}

#[tokio::test]
async fn test_health_dev_mode() {
    let server = test_server(common::create_dev_state());

    let response = server.get("/health").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["mode"], "dev");
}
