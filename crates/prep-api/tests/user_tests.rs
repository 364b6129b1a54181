use crate::common::{TestClient, TestStateBuilder, db, test_data};
use axum::http::StatusCode;
use prep_db::models::User;
use serde_json::{Value, json};

#[tokio::test]
async fn test_create_user_rejects_invalid_email() {
    let client = TestClient::from_state(TestStateBuilder::new().build_lazy());

    let body = json!({ "email": "not-an-email", "name": "Asha" });
    let response = client.post_json("/api/users", &body).await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let json: Value = response.json();
    assert!(json["error"].as_str().unwrap().contains("email"));
}

#[tokio::test]
async fn test_create_user_rejects_unknown_prep_level() {
    let client = TestClient::from_state(TestStateBuilder::new().build_lazy());

    let body = json!({ "email": "asha@example.com", "name": "Asha", "prepLevel": "class10" });
    let response = client.post_json("/api/users", &body).await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_user_rejects_malformed_id() {
    let client = TestClient::from_state(TestStateBuilder::new().build_lazy());

    let response = client.get("/api/users/not-a-uuid").await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_user_is_idempotent_per_email() {
    let state = TestStateBuilder::new()
        .build()
        .await
        .expect("Failed to create test state");
    let pool = state.pool.clone();
    let client = TestClient::from_state(state);

    let email = test_data::unique_email("aspirant");
    let body = json!({ "email": email.to_uppercase(), "name": "Aspirant", "prepLevel": "dropper" });

    let first = client.post_json("/api/users", &body).await;
    first.assert_status(StatusCode::OK);
    let first: User = first.json();
    assert_eq!(first.email, email.to_lowercase());
    assert_eq!(first.prep_level, "dropper");

    let second: User = client.post_json("/api/users", &body).await.json();
    assert_eq!(first.id, second.id);

    let fetched = client.get(&format!("/api/users/{}", first.id)).await;
    fetched.assert_status(StatusCode::OK);
    let fetched: User = fetched.json();
    assert_eq!(fetched.email, first.email);

    db::delete_user(&pool, &first).await.unwrap();
}

#[tokio::test]
async fn test_get_unknown_user_returns_404() {
    let state = TestStateBuilder::new()
        .build()
        .await
        .expect("Failed to create test state");
    let client = TestClient::from_state(state);

    let response = client
        .get(&format!("/api/users/{}", uuid::Uuid::new_v4()))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}
