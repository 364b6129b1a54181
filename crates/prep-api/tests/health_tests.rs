use crate::common::{TestClient, TestStateBuilder};
use axum::http::StatusCode;
use serde_json::Value;

#[tokio::test]
async fn test_health() {
    let client = TestClient::from_state(TestStateBuilder::new().build_lazy());

    client.get("/health").await.assert_status(StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_route_returns_json_404() {
    let client = TestClient::from_state(TestStateBuilder::new().build_lazy());

    let response = client.get("/api/flashcards").await;
    response.assert_status(StatusCode::NOT_FOUND);

    let json: Value = response.json();
    assert!(json["error"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn test_routes_live_under_api_prefix() {
    let client = TestClient::from_state(TestStateBuilder::new().build_lazy());

    // Same route without the prefix falls through to the 404 handler
    let response = client.get("/ai/motivation").await;
    response.assert_status(StatusCode::NOT_FOUND);

    let response = client.get("/api/ai/motivation").await;
    response.assert_status(StatusCode::OK);
}

#[tokio::test]
async fn test_ready_with_database() {
    let state = TestStateBuilder::new()
        .build()
        .await
        .expect("Failed to create test state");
    let client = TestClient::from_state(state);

    let response = client.get("/health/ready").await;
    response.assert_status(StatusCode::OK);

    let json: Value = response.json();
    assert_eq!(json["status"], "ready");
}
