use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    config::{self, Endpoints},
    error,
    spotify::client::ApiClient,
};

mod auth;
mod request;
mod resources;

pub use auth::authorize;
pub use auth::env_entry;
pub use request::browse;
pub use request::get;
pub use request::player;
pub use request::search;
pub use resources::resources;

pub(crate) fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb
}

/// Client for the configured credentials; exits when they are incomplete.
pub(crate) fn client() -> ApiClient {
    match config::credentials_from_env() {
        Ok(credentials) => ApiClient::from_credentials(credentials, &Endpoints::from_env()),
        Err(e) => error!("Invalid configuration: {}", e),
    }
}
