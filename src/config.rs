//! Configuration loaded from the environment.
//!
//! Values come from the process environment, optionally seeded from a `.env`
//! file in the platform's local data directory (`<data_local_dir>/spotcat/.env`):
//!
//! - Linux: `~/.local/share/spotcat/.env`
//! - macOS: `~/Library/Application Support/spotcat/.env`
//! - Windows: `%LOCALAPPDATA%/spotcat/.env`
//!
//! Variables already present in the environment win over the file.

use std::{env, path::PathBuf};

use crate::{error::ConfigError, types::Credentials};

pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_AUTHORIZE_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8888";

pub fn env_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("spotcat/.env");
    path
}

/// Loads `<data_local_dir>/spotcat/.env` into the environment.
///
/// The directory is created when missing. A missing file is not an error, a
/// malformed one is.
pub async fn load_env() -> Result<(), String> {
    let path = env_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    match dotenv::from_path(&path) {
        Ok(()) => Ok(()),
        Err(dotenv::Error::Io(_)) => Ok(()),
        Err(e) => Err(format!("failed to parse {}: {}", path.display(), e)),
    }
}

/// The three Spotify endpoints a client talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub api_url: String,
    pub token_url: String,
    pub authorize_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            authorize_url: DEFAULT_AUTHORIZE_URL.to_string(),
        }
    }
}

impl Endpoints {
    /// Defaults overridden by `SPOTIFY_API_URL`, `SPOTIFY_API_TOKEN_URL` and
    /// `SPOTIFY_API_AUTH_URL`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_url: optional("SPOTIFY_API_URL").unwrap_or(defaults.api_url),
            token_url: optional("SPOTIFY_API_TOKEN_URL").unwrap_or(defaults.token_url),
            authorize_url: optional("SPOTIFY_API_AUTH_URL").unwrap_or(defaults.authorize_url),
        }
    }
}

/// Assembles [`Credentials`] from the `SPOTIFY_API_*` variables.
///
/// Client id and secret are required; everything else is optional and only
/// matters for the authorization-code grant.
pub fn credentials_from_env() -> Result<Credentials, ConfigError> {
    let mut credentials = Credentials::new(
        required("SPOTIFY_API_AUTH_CLIENT_ID")?,
        required("SPOTIFY_API_AUTH_CLIENT_SECRET")?,
    )?;

    if let Some(code) = optional("SPOTIFY_API_AUTH_CODE") {
        credentials = credentials.with_authorization_code(code);
    }
    if let Some(redirect_uri) = optional("SPOTIFY_API_REDIRECT_URI") {
        credentials = credentials.with_redirect_uri(redirect_uri);
    }
    if let Some(scope) = optional("SPOTIFY_API_AUTH_SCOPE") {
        credentials = credentials.with_scope(scope);
    }
    if let Some(state) = optional("SPOTIFY_API_AUTH_STATE") {
        credentials = credentials.with_state(state);
    }
    if let Some(show_dialog) = optional("SPOTIFY_API_SHOW_DIALOG") {
        credentials = credentials.with_show_dialog(parse_bool(
            "SPOTIFY_API_SHOW_DIALOG",
            &show_dialog,
        )?);
    }
    if let Some(refresh_token) = optional("SPOTIFY_API_REFRESH_TOKEN") {
        credentials = credentials.with_refresh_token(refresh_token);
    }

    Ok(credentials)
}

/// Address the authorization callback server binds to.
pub fn server_addr() -> String {
    optional("SERVER_ADDRESS").unwrap_or_else(|| DEFAULT_SERVER_ADDRESS.to_string())
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    optional(name).ok_or(ConfigError::MissingVar(name))
}

fn optional(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub fn parse_bool(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidVar {
            name,
            value: value.to_string(),
        }),
    }
}
