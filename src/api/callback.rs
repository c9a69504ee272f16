use std::{collections::HashMap, sync::Arc};

use axum::{Extension, extract::Query, response::Html};
use tokio::sync::Mutex;

use crate::{types::AuthorizationState, warning};

/// Receives the redirect from the consent page and records the authorization
/// code once the echoed `state` matches.
pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(shared_state): Extension<Arc<Mutex<Option<AuthorizationState>>>>,
) -> Html<&'static str> {
    let mut lock = shared_state.lock().await;
    let Some(auth_state) = lock.as_mut() else {
        return Html("<h4>No authorization in progress.</h4>");
    };

    if let Some(error) = params.get("error") {
        warning!("Authorization was denied: {}", error);
        auth_state.error = Some(error.clone());
        return Html("<h4>Authorization denied.</h4>");
    }

    if params.get("state").map(String::as_str) != Some(auth_state.expected_state.as_str()) {
        warning!("Callback state does not match the authorization request");
        auth_state.error = Some("state mismatch".to_string());
        return Html("<h4>State mismatch, authorization rejected.</h4>");
    }

    match params.get("code").filter(|code| !code.is_empty()) {
        Some(code) => {
            auth_state.code = Some(code.clone());
            Html("<h2>Authorization received.</h2><p>You can close this window.</p>")
        }
        None => {
            auth_state.error = Some("missing code".to_string());
            Html("<h4>Missing authorization code.</h4>")
        }
    }
}
