//! # crewdeck_core
//!
//! Session, permission, and guard logic for the Crewdeck client SDK.
//!
//! The embedding UI owns rendering and navigation; this crate owns the rules:
//! who is signed in, what they may see, and where they should be sent next.
//! All services are explicit context-passed objects with a defined lifecycle
//! (created at app start, reset at logout) — there are no globals.

pub mod error;
pub mod guard;
pub mod permissions;
pub mod session;
pub mod storage;

pub use error::{GuardError, PermissionError, SessionError};
pub use guard::{
    Guard, GuardContext, GuardDecision, GuardRequirements, PermissionDecision, PermissionGuard,
    PermissionRequirement, Route,
};
pub use permissions::{PermissionService, PermissionState};
pub use session::{SessionService, SessionState};
pub use storage::{MemoryStorage, SessionStorage};

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_not_empty() {
        assert!(!version().is_empty());
    }
}
