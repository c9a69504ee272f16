//! Spotify Web API catalog client.
//!
//! Authenticates with the client-credentials or authorization-code grant and
//! builds validated requests for the catalog resources (albums, artists,
//! tracks, playlists, shows, episodes, player, search, browse and profile).
//!
//! # Modules
//!
//! - `api` - handlers for the local authorization callback server
//! - `cli` - command implementations used by the `spotcat` binary
//! - `config` - environment and `.env` configuration
//! - `error` - typed errors for validation, auth, transport and config
//! - `management` - token state and single-flight exchanges
//! - `server` - the callback server itself
//! - `spotify` - token providers, request builders and the [`ApiClient`](spotify::client::ApiClient)
//! - `types` - shared data structures
//! - `utils` - encoding and parsing helpers
//!
//! # Example
//!
//! ```no_run
//! use spotcat::{config, spotify::{client::ApiClient, resources::Resource, request::RequestArgs}};
//!
//! #[tokio::main]
//! async fn main() -> spotcat::Res<()> {
//!     config::load_env().await?;
//!     let client = ApiClient::from_credentials(
//!         config::credentials_from_env()?,
//!         &config::Endpoints::from_env(),
//!     );
//!     let response = client
//!         .get(Resource::Artists, &RequestArgs::new().id("0OdUWJ0sBjDrqHygGUXeCF"))
//!         .await?;
//!     println!("{}", response.body);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

/// Boxed-error result for top-level code that mixes error types.
///
/// # Example
///
/// ```
/// use spotcat::Res;
///
/// async fn fetch_data() -> Res<String> {
///     Ok("data".to_string())
/// }
/// ```
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// `println!` with a blue `o` marker, for progress and hints.
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// `println!` with a green check mark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a red `!` line and exits with status 1.
///
/// Only the binary's command handlers use this; library code returns typed
/// errors instead. Since it diverges, it can stand in a `match` arm:
///
/// ```ignore
/// let credentials = match config::credentials_from_env() {
///     Ok(credentials) => credentials,
///     Err(e) => error!("Cannot read credentials. Err: {}", e),
/// };
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Yellow `!` line for problems the command can carry on after.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
