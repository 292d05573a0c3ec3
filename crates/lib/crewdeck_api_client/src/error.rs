//! API client error types.

use thiserror::Error;

/// Errors surfaced by the HTTP layer.
///
/// `Clone` is required so that deduplicated callers awaiting the same
/// in-flight request can each receive the failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// Transport-level failure: DNS, connect, reset. The request may never
    /// have reached the backend.
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response. `message` comes from the response body when the
    /// backend provided one.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// 401 on a call that could not (or may not) be recovered by a refresh.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The token refresh itself was rejected; the session is gone.
    #[error("Session expired")]
    SessionExpired,

    /// The backend answered 2xx but the body did not parse.
    #[error("Response decode error: {0}")]
    Decode(String),

    /// 2xx response with `success: false` in the envelope.
    #[error("{0}")]
    Rejected(String),
}

impl ApiError {
    /// Whether this error means the session itself is no longer usable
    /// (as opposed to a transient transport problem).
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            Self::SessionExpired
                | Self::Unauthorized(_)
                | Self::Status { status: 401, .. }
                | Self::Status { status: 403, .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_failures_are_classified() {
        assert!(ApiError::SessionExpired.is_auth_failure());
        assert!(ApiError::Unauthorized("x".into()).is_auth_failure());
        assert!(
            ApiError::Status {
                status: 403,
                message: "forbidden".into()
            }
            .is_auth_failure()
        );
        assert!(!ApiError::Network("reset".into()).is_auth_failure());
        assert!(
            !ApiError::Status {
                status: 500,
                message: "boom".into()
            }
            .is_auth_failure()
        );
    }
}
