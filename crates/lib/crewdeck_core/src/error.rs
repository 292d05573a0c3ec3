//! Core error types.

use crewdeck_api_client::ApiError;
use thiserror::Error;

/// Session service errors.
#[derive(Debug, Clone, Error)]
pub enum SessionError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// The backend answered a login/acceptance flow without a user object.
    #[error("Auth response missing user")]
    IncompleteAuth,
}

/// Permission service errors.
#[derive(Debug, Clone, Error)]
pub enum PermissionError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// System roles (e.g. "admin") cannot be edited or deleted.
    #[error("System roles cannot be modified")]
    SystemRole,
}

/// Guard-internal errors. These are never surfaced: the guard logs and
/// fails open so a transient error cannot lock a user out of a page.
#[derive(Debug, Clone, Error)]
pub enum GuardError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Api(#[from] ApiError),
}
