//! Handlers for the local server that receives the authorization redirect.

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
