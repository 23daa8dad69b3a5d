//! Tests for CodingClient::health_check().
//!
//! Uses wiremock for the reachable cases and a closed port for the
//! unreachable case.

use claimflow_client::{ClientConfig, CodingClient, HealthStatus};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(url: &str) -> CodingClient {
    let mut config = ClientConfig::for_url(url).unwrap();
    config.timeout_secs = 2;
    CodingClient::new(config).unwrap()
}

#[tokio::test]
async fn health_check_reachable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"status":"ok"}"#))
        .expect(1)
        .mount(&server)
        .await;

    let report = client_for(&server.uri()).health_check().await;
    assert!(report.is_healthy());
    assert_eq!(report.url.path(), "/health");
}

#[tokio::test]
async fn health_check_degraded_on_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let report = client_for(&server.uri()).health_check().await;
    assert!(matches!(report.status, HealthStatus::Degraded { .. }));
    assert!(report.status.to_string().contains("503"));
}

#[tokio::test]
async fn health_check_unreachable() {
    let report = client_for("http://127.0.0.1:1").health_check().await;
    assert!(!report.is_healthy());
    assert!(matches!(report.status, HealthStatus::Unreachable { .. }));
}
