use std::sync::Arc;

use spotcat::{server, types::AuthorizationState};
use tokio::sync::Mutex;

async fn spawn_server(state: Arc<Mutex<Option<AuthorizationState>>>) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, server::router(state)).await.unwrap();
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn test_callback_records_code_when_state_matches() {
    let state = Arc::new(Mutex::new(Some(AuthorizationState::new("expected"))));
    let base = spawn_server(Arc::clone(&state)).await;

    let body = reqwest::get(format!("{}/callback?code=abc&state=expected", base))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains("Authorization received"));

    let lock = state.lock().await;
    let recorded = lock.as_ref().unwrap();
    assert_eq!(recorded.code.as_deref(), Some("abc"));
    assert!(recorded.error.is_none());
    assert!(recorded.is_settled());
}

#[tokio::test]
async fn test_callback_rejects_state_mismatch() {
    let state = Arc::new(Mutex::new(Some(AuthorizationState::new("expected"))));
    let base = spawn_server(Arc::clone(&state)).await;

    reqwest::get(format!("{}/callback?code=abc&state=forged", base))
        .await
        .unwrap();

    let lock = state.lock().await;
    let recorded = lock.as_ref().unwrap();
    assert!(recorded.code.is_none());
    assert_eq!(recorded.error.as_deref(), Some("state mismatch"));
}

#[tokio::test]
async fn test_callback_records_denied_authorization() {
    let state = Arc::new(Mutex::new(Some(AuthorizationState::new("expected"))));
    let base = spawn_server(Arc::clone(&state)).await;

    reqwest::get(format!("{}/callback?error=access_denied&state=expected", base))
        .await
        .unwrap();

    let lock = state.lock().await;
    assert_eq!(
        lock.as_ref().unwrap().error.as_deref(),
        Some("access_denied")
    );
}

#[tokio::test]
async fn test_health() {
    let base = spawn_server(Arc::new(Mutex::new(None))).await;

    let json: serde_json::Value = reqwest::get(format!("{}/health", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["name"], "spotcat");
}
