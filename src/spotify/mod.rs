//! # Spotify Web API client
//!
//! Everything needed to talk to the catalog part of the Web API, layered so
//! that each part can be used (and tested) on its own:
//!
//! ```text
//! ApiClient (client)
//!     ├── TokenProvider (auth)        client credentials / authorization code
//!     ├── request::build (request)    validated RequestDescriptor
//!     │     ├── search                q/type assembly
//!     │     └── browse                categories, featured playlists, new releases
//!     │           ↓
//!     │     registry (resources)      one declarative row per resource
//!     └── HttpExecutor (http)         reqwest by default
//! ```
//!
//! ## Request construction
//!
//! [`request::build`] never performs I/O. Invalid combinations (unknown
//! sub-objects, too many ids, current-user scope mixed with ids, ...) are
//! rejected with a [`ValidationError`](crate::error::ValidationError) before a
//! path exists, so [`client::ApiClient`] never sends a half-built request or
//! spends a token on one.
//!
//! ## Tokens
//!
//! Both providers keep their state in a
//! [`TokenManager`](crate::management::TokenManager). Exchanges are
//! single-flight: concurrent callers waiting on an in-flight exchange reuse
//! its result. Tokens are treated as expired four minutes early.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use spotcat::{config::{self, Endpoints}, spotify::{client::ApiClient, request::RequestArgs, resources::Resource}};
//!
//! let credentials = config::credentials_from_env()?;
//! let client = ApiClient::from_credentials(credentials, &Endpoints::from_env());
//!
//! let response = client
//!     .get(Resource::Albums, &RequestArgs::new().id("4aawyAB9vmqN3uQ7FjRGTy").sub_object("tracks"))
//!     .await?
//!     .error_for_status()?;
//! println!("{}", response.body);
//! ```

pub mod auth;
pub mod browse;
pub mod client;
pub mod http;
pub mod request;
pub mod resources;
pub mod search;
