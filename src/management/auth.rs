use std::{
    future::Future,
    sync::atomic::{AtomicU64, Ordering},
};

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::{
    error::AuthError,
    types::{Token, TokenResponse, TokenState, TokenStatus},
    utils,
};

/// Access tokens are treated as expired this many seconds early.
pub const EXPIRY_MARGIN_SECS: u64 = 240;

/// Lifetime assumed when the token endpoint omits `expires_in`.
pub const DEFAULT_EXPIRES_IN_SECS: u64 = 3600;

/// Owns a [`TokenState`] and serialises every exchange that mutates it.
///
/// The snapshot lives behind a synchronous lock that is only taken for short,
/// non-awaiting sections. Exchanges go through an async gate; a caller that
/// queued behind a successful exchange reuses its token instead of hitting the
/// token endpoint again.
///
/// Grants that fail a precondition ([`AuthError::is_precondition`]) leave the
/// state untouched.
pub struct TokenManager {
    state: Mutex<TokenState>,
    flight: tokio::sync::Mutex<()>,
    generation: AtomicU64,
    keeps_refresh_token: bool,
}

impl TokenManager {
    pub fn new() -> Self {
        Self::with_state(TokenState::default())
    }

    /// Never stores a refresh token, even when the token endpoint sends one.
    pub fn access_only() -> Self {
        TokenManager {
            keeps_refresh_token: false,
            ..Self::new()
        }
    }

    /// Starts unauthenticated but already holding a refresh token.
    pub fn with_refresh_token(refresh_token: &str) -> Self {
        Self::with_state(TokenState {
            refresh_token: Some(Token::refresh(refresh_token)),
            ..TokenState::default()
        })
    }

    fn with_state(state: TokenState) -> Self {
        TokenManager {
            state: Mutex::new(state),
            flight: tokio::sync::Mutex::new(()),
            generation: AtomicU64::new(0),
            keeps_refresh_token: true,
        }
    }

    pub fn current_token(&self) -> Token {
        self.state.lock().access_token.clone()
    }

    pub fn refresh_token(&self) -> Option<Token> {
        self.state.lock().refresh_token.clone()
    }

    pub fn status(&self) -> TokenStatus {
        self.state.lock().status
    }

    pub fn snapshot(&self) -> TokenState {
        self.state.lock().clone()
    }

    pub fn is_expired(&self) -> bool {
        let state = self.state.lock();
        if state.status != TokenStatus::Authenticated {
            return true;
        }

        let now = utils::unix_now();
        now.saturating_add(EXPIRY_MARGIN_SECS)
            >= state.obtained_at.saturating_add(state.expires_in)
    }

    /// Runs `grant` under the single-flight gate and commits its outcome.
    ///
    /// `grant` receives the state as it was when the gate was acquired.
    pub async fn exchange<F, Fut>(&self, grant: F) -> Result<Token, AuthError>
    where
        F: FnOnce(TokenState) -> Fut,
        Fut: Future<Output = Result<TokenResponse, AuthError>>,
    {
        let observed = self.generation.load(Ordering::Acquire);
        let _flight = self.flight.lock().await;

        if self.generation.load(Ordering::Acquire) != observed {
            if let Some(token) = self.authenticated_token() {
                debug!("reusing token from a concurrent exchange");
                return Ok(token);
            }
        }

        let outcome = match grant(self.snapshot()).await {
            Err(e) if e.is_precondition() => return Err(e),
            outcome => outcome,
        };
        let committed = self.commit(outcome);
        self.generation.fetch_add(1, Ordering::AcqRel);
        committed
    }

    fn authenticated_token(&self) -> Option<Token> {
        let state = self.state.lock();
        match state.status {
            TokenStatus::Authenticated => Some(state.access_token.clone()),
            _ => None,
        }
    }

    fn commit(&self, outcome: Result<TokenResponse, AuthError>) -> Result<Token, AuthError> {
        let mut state = self.state.lock();
        match outcome {
            Ok(response) => {
                state.access_token = Token::access(response.access_token);
                let refresh_token = response
                    .refresh_token
                    .filter(|t| self.keeps_refresh_token && !t.is_empty());
                if let Some(refresh_token) = refresh_token {
                    state.refresh_token = Some(Token::refresh(refresh_token));
                }
                state.status = TokenStatus::Authenticated;
                state.obtained_at = utils::unix_now();
                state.expires_in = response.expires_in.unwrap_or(DEFAULT_EXPIRES_IN_SECS);
                info!(expires_in = state.expires_in, "access token obtained");
                Ok(state.access_token.clone())
            }
            Err(e) => {
                state.access_token = Token::empty();
                state.status = TokenStatus::Failed;
                warn!(error = %e, "token exchange failed");
                Err(e)
            }
        }
    }
}

impl Default for TokenManager {
    fn default() -> Self {
        Self::new()
    }
}
