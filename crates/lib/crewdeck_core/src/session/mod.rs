//! Session state and its owning service.

pub mod scheduler;
pub mod store;

pub use store::SessionService;

use crewdeck_types::User;

/// Snapshot of the session store.
///
/// `is_authenticated` is true iff `user` is present; both are persisted,
/// the loading/error flags are not.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub user: Option<User>,
    pub is_authenticated: bool,
    pub is_loading: bool,
    pub is_refreshing: bool,
    pub error: Option<String>,
}
