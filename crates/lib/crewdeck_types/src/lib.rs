//! # crewdeck_types
//!
//! Domain types shared across the Crewdeck client SDK.
//!
//! These are the normalized shapes the rest of the SDK works with, distinct
//! from whatever envelope the backend wraps them in. The backend remains the
//! sole source of truth; everything here is a cached client-side copy.

pub mod auth;
pub mod invitation;
pub mod product;
pub mod rbac;
pub mod subscription;
pub mod user;

pub use auth::TokenPair;
pub use invitation::{Invitation, InvitationStatus};
pub use product::Product;
pub use rbac::{ADMIN_ROLE, Permission, Role};
pub use subscription::SubscriptionStatus;
pub use user::{User, UserPayload};

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
