use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use tokio::sync::Mutex;

use crate::{
    cli::spinner,
    config::{self, Endpoints},
    error, info,
    server::start_api_server,
    spotify::{
        auth::{AuthorizationCodeProvider, TokenProvider},
        http::ReqwestExecutor,
    },
    success,
    types::{AuthorizationState, Token},
    warning,
};

const CALLBACK_TIMEOUT: Duration = Duration::from_secs(120);

/// Walks the user through the consent page and exchanges the returned code.
///
/// The refresh token goes to stdout exactly once, as a `.env` line, and is
/// never passed to the logger.
pub async fn authorize() {
    let credentials = match config::credentials_from_env() {
        Ok(credentials) => credentials,
        Err(e) => error!("Invalid configuration: {}", e),
    };
    let endpoints = Endpoints::from_env();

    let Some((auth_url, expected_state)) = credentials.authorize_url(&endpoints.authorize_url)
    else {
        error!("SPOTIFY_API_REDIRECT_URI must be set to authorize");
    };

    let shared_state = Arc::new(Mutex::new(Some(AuthorizationState::new(expected_state))));

    let server_state = Arc::clone(&shared_state);
    let addr = config::server_addr();
    tokio::spawn(async move {
        if let Err(e) = start_api_server(&addr, server_state).await {
            warning!("Callback server stopped: {}", e);
        }
    });

    if webbrowser::open(&auth_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    let pb = spinner("Waiting for authorization...");
    let outcome = wait_for_callback(shared_state).await;
    pb.finish_and_clear();

    let code = match outcome {
        Some(AuthorizationState {
            code: Some(code), ..
        }) => code,
        Some(AuthorizationState {
            error: Some(e), ..
        }) => error!("Authorization failed: {}", e),
        _ => error!("Authorization timed out."),
    };

    let provider = AuthorizationCodeProvider::new(
        credentials.with_authorization_code(code),
        &endpoints.token_url,
        Arc::new(ReqwestExecutor::new()),
    );

    if let Err(e) = provider.authenticate().await {
        error!("Cannot exchange authorization code. Err: {}", e);
    }

    success!("Authorization successful!");
    match provider.refresh_token() {
        Some(refresh_token) => {
            warning!("The next line is a secret. Do not share it or paste it into logs.");
            println!("{}", env_entry(&refresh_token));
            info!(
                "Store it in {} to skip this step next time.",
                config::env_path().display()
            );
        }
        None => warning!("The token endpoint returned no refresh token."),
    }
}

/// `.env` line that seeds the authorization-code provider on later runs.
pub fn env_entry(refresh_token: &Token) -> String {
    format!("SPOTIFY_API_REFRESH_TOKEN={}", refresh_token.value())
}

async fn wait_for_callback(
    shared_state: Arc<Mutex<Option<AuthorizationState>>>,
) -> Option<AuthorizationState> {
    let start = Instant::now();

    while start.elapsed() < CALLBACK_TIMEOUT {
        let lock = shared_state.lock().await;
        if let Some(state) = lock.as_ref().filter(|s| s.is_settled()) {
            return Some(state.clone());
        }
        drop(lock);
        tokio::time::sleep(Duration::from_millis(500)).await;
    }

    None
}
