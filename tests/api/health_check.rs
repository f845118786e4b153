use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::{MockBackend, spawn_app};

#[tokio::test]
async fn health_check_works() {
    let backend = MockBackend::json(StatusCode::OK, json!([])).await;
    let app = spawn_app(&backend).await;

    let response = app.get("/health_check").await;

    assert!(response.status().is_success());
    assert_eq!(response.text().await.unwrap(), "Service healthy");
    assert_eq!(backend.hits(), 0);
}
