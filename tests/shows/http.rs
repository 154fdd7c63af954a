//! Actions over HTTP.

use std::sync::Arc;

use calchart_store::actions::{router, ActionService};
use serde_json::{json, Value};

use crate::support::store;

async fn spawn_server() -> String {
    let app = router(Arc::new(ActionService::new(store())));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

async fn post(base: &str, action: &str, user: Option<&str>, body: Value) -> (u16, Value) {
    let client = reqwest::Client::new();
    let mut request = client.post(format!("{base}/actions/{action}")).json(&body);
    if let Some(user) = user {
        request = request.header("x-calchart-user-id", user);
    }
    let response = request.send().await.unwrap();
    let status = response.status().as_u16();
    (status, response.json().await.unwrap())
}

#[tokio::test]
async fn health_lists_actions() {
    let base = spawn_server().await;
    let body: Value = reqwest::get(format!("{base}/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["ok"], json!(true));
    let actions = body["actions"].as_array().unwrap();
    assert_eq!(actions.len(), 6);
    assert!(actions.contains(&json!("save_show")));
}

#[tokio::test]
async fn create_then_view_over_http() {
    let base = spawn_server().await;

    let (status, body) = post(&base, "create_show", Some("stunt"), json!({ "name": "Spring Show", "isBand": true })).await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({ "slug": "spring-show", "isBand": true }));

    let (status, body) = post(&base, "get_show", Some("stunt"), json!({ "slug": "spring-show" })).await;
    assert_eq!(status, 200);
    assert_eq!(body["isInitialized"], json!(false));

    let (status, body) = post(&base, "get_show", Some("outsider"), json!({ "slug": "spring-show" })).await;
    assert_eq!(status, 403);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn error_statuses_over_http() {
    let base = spawn_server().await;

    let (status, _) = post(&base, "get_show", None, json!({ "slug": "x" })).await;
    assert_eq!(status, 401);

    let (status, body) = post(&base, "get_show", Some("u1"), json!({ "slug": "x" })).await;
    assert_eq!(status, 404);
    assert_eq!(body, json!({ "message": "show not found: x" }));

    let (status, _) = post(&base, "nope", Some("u1"), json!({})).await;
    assert_eq!(status, 404);
}
