//! Error types for the catalog client.
//!
//! Failures fall into three families that callers are expected to treat
//! differently:
//!
//! - [`ValidationError`] - the arguments describe a request the API does not
//!   support. Raised locally, before any network activity, and never retryable.
//! - [`AuthError`] - the token endpoint refused or garbled a grant exchange, or
//!   the provider is not in a state that allows the requested transition.
//! - [`NetworkError`] - the HTTP executor could not complete the round trip.
//!
//! [`ClientError`] wraps all of them for the [`ApiClient`](crate::spotify::client::ApiClient)
//! façade and adds API-level failures reported in a response body.

use thiserror::Error;

/// A request was rejected before it was built.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("unknown resource '{0}'")]
    UnknownResource(String),

    #[error("{resource} does not support {method} requests")]
    UnsupportedMethod {
        resource: &'static str,
        method: &'static str,
    },

    #[error("'{sub_object}' is not a valid sub-object for {resource}")]
    UnknownSubObject {
        resource: &'static str,
        sub_object: String,
    },

    #[error("'{action}' is not a valid action for {resource}")]
    UnknownAction {
        resource: &'static str,
        action: String,
    },

    #[error("{resource} accepts at most {limit} ids per request, got {count}")]
    TooManyIds {
        resource: &'static str,
        count: usize,
        limit: usize,
    },

    #[error("{resource}{} only accepts a single id", display_sub_object(.sub_object))]
    SingleIdOnly {
        resource: &'static str,
        sub_object: String,
    },

    #[error("{resource} requires an id")]
    MissingId { resource: &'static str },

    #[error("{resource} requires a user id")]
    MissingUser { resource: &'static str },

    #[error("{resource} does not take an id")]
    UnexpectedId { resource: &'static str },

    #[error("empty id in id list for {resource}")]
    EmptyId { resource: &'static str },

    #[error("{resource} has no current-user shorthand")]
    SelfNotSupported { resource: &'static str },

    #[error("conflicting arguments for {resource}: {reason}")]
    ConflictingArguments {
        resource: &'static str,
        reason: &'static str,
    },

    #[error("'{key}' is not a valid parameter for {resource}")]
    UnknownParameter { resource: &'static str, key: String },

    #[error("{resource} requires the '{key}' parameter")]
    MissingParameter {
        resource: &'static str,
        key: &'static str,
    },

    #[error("{resource} does not accept '{argument}'")]
    UnsupportedArgument {
        resource: &'static str,
        argument: &'static str,
    },

    #[error("{resource} requires a request body")]
    MissingBody { resource: &'static str },

    #[error("search needs a query string or at least one filter")]
    EmptySearch,

    #[error("'{0}' is not a search filter, use one of album, artist, track or year")]
    UnknownFilterKey(String),

    #[error("'{0}' is not a searchable type")]
    UnknownSearchType(String),

    #[error("'{0}' is not a browse category, use categories, featured-playlists or new-releases")]
    UnknownBrowseCategory(String),
}

fn display_sub_object(sub_object: &str) -> String {
    if sub_object.is_empty() {
        String::new()
    } else {
        format!("/{}", sub_object)
    }
}

/// Transport-level failure reported by an [`HttpExecutor`](crate::spotify::http::HttpExecutor).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    #[error("connection failed: {message}")]
    ConnectionFailed { message: String },

    #[error("request timed out")]
    Timeout,

    #[error("invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("failed to read response body: {message}")]
    Body { message: String },
}

/// Grant exchange or token lifecycle failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("token exchange failed: {reason}")]
    TokenExchangeFailed { reason: String },

    #[error("no refresh token held, authenticate first")]
    NoRefreshToken,

    #[error("no authorization code configured")]
    MissingAuthorizationCode,

    #[error("no redirect uri configured")]
    MissingRedirectUri,

    #[error("previous token exchange failed, call authenticate() to recover")]
    RequiresAuthentication,

    #[error("token endpoint unreachable: {0}")]
    Transport(#[from] NetworkError),
}

impl AuthError {
    /// Raised before a grant reaches the token endpoint. These never change
    /// the provider's state.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::NoRefreshToken
                | Self::MissingAuthorizationCode
                | Self::MissingRedirectUri
                | Self::RequiresAuthentication
        )
    }
}

/// Missing or malformed configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    MissingVar(&'static str),

    #[error("{name} has an invalid value: {value}")]
    InvalidVar { name: &'static str, value: String },

    #[error("client id and client secret must not be empty")]
    EmptyClientCredentials,
}

/// Everything an [`ApiClient`](crate::spotify::client::ApiClient) call can fail with.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{status} {reason}: {message} ({url})")]
    Api {
        status: u16,
        reason: &'static str,
        message: String,
        url: String,
    },
}

impl ClientError {
    /// Validation and configuration errors are deterministic; everything else
    /// may succeed on a later attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Validation(_) | Self::Config(_) => false,
            Self::Auth(AuthError::Transport(_)) => true,
            Self::Auth(_) => false,
            Self::Network(_) => true,
            Self::Api { status, .. } => *status == 429 || *status >= 500,
        }
    }
}
