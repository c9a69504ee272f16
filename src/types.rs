use std::fmt;

use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::{error::ConfigError, utils};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenKind {
    Access,
    Refresh,
}

/// A bearer credential. The value never shows up in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Token {
    value: String,
    kind: TokenKind,
}

impl Token {
    pub fn access(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            kind: TokenKind::Access,
        }
    }

    pub fn refresh(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            kind: TokenKind::Refresh,
        }
    }

    pub fn empty() -> Self {
        Self::access("")
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("kind", &self.kind)
            .field("value", &if self.is_empty() { "<empty>" } else { "<redacted>" })
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenStatus {
    Unauthenticated,
    Authenticated,
    Failed,
}

/// Lifecycle snapshot of one token provider.
#[derive(Debug, Clone)]
pub struct TokenState {
    pub access_token: Token,
    pub refresh_token: Option<Token>,
    pub status: TokenStatus,
    pub obtained_at: u64,
    pub expires_in: u64,
}

impl Default for TokenState {
    fn default() -> Self {
        Self {
            access_token: Token::empty(),
            refresh_token: None,
            status: TokenStatus::Unauthenticated,
            obtained_at: 0,
            expires_in: 0,
        }
    }
}

/// Fields consumed from a token endpoint response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub scope: Option<String>,
    pub expires_in: Option<u64>,
}

/// Static application identity.
///
/// Built once through [`Credentials::new`] and the `with_*` methods, which
/// consume and return the value, so a constructed instance is never mutated.
#[derive(Clone)]
pub struct Credentials {
    client_id: String,
    client_secret: String,
    authorization_code: Option<String>,
    redirect_uri: Option<String>,
    scope: Option<String>,
    state: Option<String>,
    show_dialog: bool,
    refresh_token: Option<String>,
}

impl Credentials {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let client_id = client_id.into();
        let client_secret = client_secret.into();
        if client_id.trim().is_empty() || client_secret.trim().is_empty() {
            return Err(ConfigError::EmptyClientCredentials);
        }

        Ok(Self {
            client_id,
            client_secret,
            authorization_code: None,
            redirect_uri: None,
            scope: None,
            state: None,
            show_dialog: false,
            refresh_token: None,
        })
    }

    pub fn with_authorization_code(mut self, code: impl Into<String>) -> Self {
        self.authorization_code = non_empty(code.into());
        self
    }

    pub fn with_redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
        self.redirect_uri = non_empty(redirect_uri.into());
        self
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = non_empty(scope.into());
        self
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = non_empty(state.into());
        self
    }

    pub fn with_show_dialog(mut self, show_dialog: bool) -> Self {
        self.show_dialog = show_dialog;
        self
    }

    pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = non_empty(refresh_token.into());
        self
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    pub fn authorization_code(&self) -> Option<&str> {
        self.authorization_code.as_deref()
    }

    pub fn redirect_uri(&self) -> Option<&str> {
        self.redirect_uri.as_deref()
    }

    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    pub fn show_dialog(&self) -> bool {
        self.show_dialog
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    /// True when the user-delegated grant can be used.
    pub fn has_user_grant(&self) -> bool {
        self.authorization_code.is_some() || self.refresh_token.is_some()
    }

    /// `Basic base64(client_id:client_secret)` for the token endpoint.
    pub fn basic_auth_header(&self) -> String {
        format!(
            "Basic {}",
            utils::base64_encode(
                format!("{}:{}", self.client_id, self.client_secret).as_bytes(),
                false
            )
        )
    }

    /// Builds the consent URL the user has to visit to obtain an authorization code.
    ///
    /// Returns the URL together with the `state` value that the callback must echo.
    pub fn authorize_url(&self, authorize_endpoint: &str) -> Option<(String, String)> {
        let redirect_uri = self.redirect_uri.as_deref()?;
        let state = self
            .state
            .clone()
            .unwrap_or_else(utils::generate_state);

        let mut url = format!(
            "{authorize_endpoint}?client_id={client_id}&response_type=code&redirect_uri={redirect_uri}&state={state}",
            client_id = utils::encode_form_value(&self.client_id),
            redirect_uri = utils::encode_form_value(redirect_uri),
            state = utils::encode_form_value(&state),
        );
        if let Some(scope) = &self.scope {
            url.push_str(&format!("&scope={}", utils::encode_form_value(scope)));
        }
        if self.show_dialog {
            url.push_str("&show_dialog=true");
        }

        Some((url, state))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("has_authorization_code", &self.authorization_code.is_some())
            .field("redirect_uri", &self.redirect_uri)
            .field("scope", &self.scope)
            .field("show_dialog", &self.show_dialog)
            .field("has_refresh_token", &self.refresh_token.is_some())
            .finish()
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

/// A fully resolved request, relative to the API base url.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub method: Method,
    pub segments: Vec<String>,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl RequestDescriptor {
    pub fn path(&self) -> String {
        self.segments.join("/")
    }

    pub fn query_string(&self) -> String {
        self.query
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// `path[?query]`, e.g. `albums/1doe?limit=50&offset=0`.
    pub fn path_and_query(&self) -> String {
        if self.query.is_empty() {
            self.path()
        } else {
            format!("{}?{}", self.path(), self.query_string())
        }
    }

    pub fn url(&self, api_url: &str) -> String {
        format!(
            "{}/{}",
            api_url.trim_end_matches('/'),
            self.path_and_query()
        )
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// What a catalog call hands back: the resolved URL and the raw response.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub url: String,
    pub status: u16,
    pub body: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorEnvelope {
    pub error: ApiErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub status: u16,
    #[serde(default)]
    pub message: String,
}

#[derive(Tabled)]
pub struct ResourceTableRow {
    pub resource: String,
    pub path: String,
    #[tabled(rename = "self path")]
    pub self_path: String,
    #[tabled(rename = "sub-objects")]
    pub sub_objects: String,
    #[tabled(rename = "query keys")]
    pub query_keys: String,
    pub actions: String,
}

/// Shared between the authorize command and the callback handler.
#[derive(Debug, Clone, Default)]
pub struct AuthorizationState {
    pub expected_state: String,
    pub code: Option<String>,
    pub error: Option<String>,
}

impl AuthorizationState {
    pub fn new(expected_state: impl Into<String>) -> Self {
        Self {
            expected_state: expected_state.into(),
            ..Self::default()
        }
    }

    pub fn is_settled(&self) -> bool {
        self.code.is_some() || self.error.is_some()
    }
}
