mod auth;

pub use auth::DEFAULT_EXPIRES_IN_SECS;
pub use auth::EXPIRY_MARGIN_SECS;
pub use auth::TokenManager;
