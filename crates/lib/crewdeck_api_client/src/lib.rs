//! # crewdeck_api_client
//!
//! HTTP layer for the Crewdeck backend API.
//!
//! [`ApiClient`] owns the transport concerns the rest of the SDK should never
//! think about: bearer-token attachment, the cookie jar for the cookie-based
//! flows, deduplication of contended requests, freshness-gated session
//! revalidation, and the transparent refresh-and-retry dance on 401.
//! The typed endpoint bindings live under [`endpoints`].

pub mod client;
pub mod config;
pub mod endpoints;
pub mod envelope;
pub mod error;
pub mod routes;
pub mod tokens;

pub use client::{ApiClient, RequestOptions};
pub use config::ApiConfig;
pub use envelope::Envelope;
pub use error::ApiError;
pub use tokens::{TokenStore, guard_freshness, wrapper_freshness};

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
