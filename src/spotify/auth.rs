use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::{
    error::AuthError,
    management::TokenManager,
    spotify::http::{HttpExecutor, HttpRequest},
    types::{Credentials, Method, Token, TokenResponse, TokenStatus},
    utils,
};

/// Access-token lifecycle shared by both grant flows.
///
/// `current_token` never touches the network; callers decide when to call
/// `authenticate` or `refresh`. Both of those are single-flight per provider.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Last known access token, empty before the first successful exchange.
    fn current_token(&self) -> Token;

    fn status(&self) -> TokenStatus;

    /// True when no usable token is held or the held one is about to expire.
    fn is_expired(&self) -> bool;

    /// Runs the full grant exchange. The only way out of [`TokenStatus::Failed`].
    async fn authenticate(&self) -> Result<Token, AuthError>;

    /// Obtains a fresh access token without user interaction.
    async fn refresh(&self) -> Result<Token, AuthError>;
}

/// `client_credentials` grant: application-only access, no refresh token.
pub struct ClientCredentialsProvider<E: HttpExecutor> {
    credentials: Credentials,
    token_url: String,
    executor: Arc<E>,
    tokens: TokenManager,
}

impl<E: HttpExecutor> ClientCredentialsProvider<E> {
    pub fn new(credentials: Credentials, token_url: impl Into<String>, executor: Arc<E>) -> Self {
        Self {
            credentials,
            token_url: token_url.into(),
            executor,
            tokens: TokenManager::access_only(),
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// `recover` allows the grant to run from [`TokenStatus::Failed`].
    async fn grant(&self, recover: bool) -> Result<Token, AuthError> {
        self.tokens
            .exchange(|state| async move {
                if !recover && state.status == TokenStatus::Failed {
                    return Err(AuthError::RequiresAuthentication);
                }
                request_grant(
                    self.executor.as_ref(),
                    &self.token_url,
                    &self.credentials,
                    "grant_type=client_credentials".to_string(),
                )
                .await
            })
            .await
    }
}

#[async_trait]
impl<E: HttpExecutor> TokenProvider for ClientCredentialsProvider<E> {
    fn current_token(&self) -> Token {
        self.tokens.current_token()
    }

    fn status(&self) -> TokenStatus {
        self.tokens.status()
    }

    fn is_expired(&self) -> bool {
        self.tokens.is_expired()
    }

    async fn authenticate(&self) -> Result<Token, AuthError> {
        self.grant(true).await
    }

    /// There is no refresh token for this grant, so refreshing re-runs it.
    async fn refresh(&self) -> Result<Token, AuthError> {
        if self.tokens.status() == TokenStatus::Failed {
            return Err(AuthError::RequiresAuthentication);
        }
        self.grant(false).await
    }
}

/// `authorization_code` grant: user-delegated access with a refresh token.
pub struct AuthorizationCodeProvider<E: HttpExecutor> {
    credentials: Credentials,
    token_url: String,
    executor: Arc<E>,
    tokens: TokenManager,
}

impl<E: HttpExecutor> AuthorizationCodeProvider<E> {
    /// A refresh token carried by `credentials` seeds the state, so `refresh`
    /// works before the first `authenticate`.
    pub fn new(credentials: Credentials, token_url: impl Into<String>, executor: Arc<E>) -> Self {
        let tokens = match credentials.refresh_token() {
            Some(refresh_token) => TokenManager::with_refresh_token(refresh_token),
            None => TokenManager::new(),
        };

        Self {
            credentials,
            token_url: token_url.into(),
            executor,
            tokens,
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn refresh_token(&self) -> Option<Token> {
        self.tokens.refresh_token()
    }

    /// Redeems the held refresh token. The state is re-read under the gate, so
    /// a refresh queued behind a failed exchange still refuses unless
    /// `recover` is set.
    async fn refresh_grant(&self, recover: bool) -> Result<Token, AuthError> {
        self.tokens
            .exchange(|state| async move {
                if !recover && state.status == TokenStatus::Failed {
                    return Err(AuthError::RequiresAuthentication);
                }
                let refresh_token = state.refresh_token.ok_or(AuthError::NoRefreshToken)?;
                let body = format!(
                    "grant_type=refresh_token&refresh_token={}",
                    utils::encode_form_value(refresh_token.value())
                );
                request_grant(
                    self.executor.as_ref(),
                    &self.token_url,
                    &self.credentials,
                    body,
                )
                .await
            })
            .await
    }
}

#[async_trait]
impl<E: HttpExecutor> TokenProvider for AuthorizationCodeProvider<E> {
    fn current_token(&self) -> Token {
        self.tokens.current_token()
    }

    fn status(&self) -> TokenStatus {
        self.tokens.status()
    }

    fn is_expired(&self) -> bool {
        self.tokens.is_expired()
    }

    /// Exchanges the configured authorization code. Without a code, a held
    /// refresh token is redeemed instead.
    async fn authenticate(&self) -> Result<Token, AuthError> {
        let code = match self.credentials.authorization_code() {
            Some(code) => code,
            None if self.tokens.refresh_token().is_some() => return self.refresh_grant(true).await,
            None => return Err(AuthError::MissingAuthorizationCode),
        };
        let redirect_uri = self
            .credentials
            .redirect_uri()
            .ok_or(AuthError::MissingRedirectUri)?;

        let body = format!(
            "grant_type=authorization_code&code={code}&redirect_uri={redirect_uri}",
            code = utils::encode_form_value(code),
            redirect_uri = utils::encode_form_value(redirect_uri)
        );

        self.tokens
            .exchange(|_| {
                request_grant(
                    self.executor.as_ref(),
                    &self.token_url,
                    &self.credentials,
                    body,
                )
            })
            .await
    }

    async fn refresh(&self) -> Result<Token, AuthError> {
        if self.tokens.status() == TokenStatus::Failed {
            return Err(AuthError::RequiresAuthentication);
        }
        if self.tokens.refresh_token().is_none() {
            return Err(AuthError::NoRefreshToken);
        }

        self.refresh_grant(false).await
    }
}

/// Posts one grant to the token endpoint and extracts the token fields.
async fn request_grant<E: HttpExecutor + ?Sized>(
    executor: &E,
    token_url: &str,
    credentials: &Credentials,
    body: String,
) -> Result<TokenResponse, AuthError> {
    let grant_type = body
        .split('&')
        .next()
        .and_then(|pair| pair.strip_prefix("grant_type="))
        .unwrap_or_default()
        .to_string();
    debug!(grant_type = %grant_type, url = %token_url, "requesting token");

    let request = HttpRequest {
        method: Method::Post,
        url: token_url.to_string(),
        headers: vec![
            (
                "Authorization".to_string(),
                credentials.basic_auth_header(),
            ),
            (
                "Content-Type".to_string(),
                "application/x-www-form-urlencoded".to_string(),
            ),
        ],
        body: Some(body),
    };

    let response = executor.send(request).await?;
    if !response.is_success() {
        return Err(AuthError::TokenExchangeFailed {
            reason: format!(
                "token endpoint answered {}: {}",
                response.status,
                describe_token_error(&response.body)
            ),
        });
    }

    let token: TokenResponse =
        serde_json::from_str(&response.body).map_err(|e| AuthError::TokenExchangeFailed {
            reason: format!("malformed token response: {}", e),
        })?;

    if token.access_token.is_empty() {
        return Err(AuthError::TokenExchangeFailed {
            reason: "token response carries no access_token".to_string(),
        });
    }

    Ok(token)
}

fn describe_token_error(body: &str) -> String {
    let json: serde_json::Value = match serde_json::from_str(body) {
        Ok(json) => json,
        Err(_) => return "unreadable error body".to_string(),
    };

    let error = json["error"].as_str().unwrap_or("unknown_error");
    match json["error_description"].as_str() {
        Some(description) => format!("{} ({})", error, description),
        None => error.to_string(),
    }
}
