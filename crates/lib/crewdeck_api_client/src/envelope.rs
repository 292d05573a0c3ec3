//! Backend response envelope: `{ success, message?, data?/user? }`.

use serde::Deserialize;

use crate::error::ApiError;

/// Standard Crewdeck response envelope.
///
/// Some endpoints name the payload field `data`, the auth endpoints use
/// `user`; the alias absorbs both.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    // No `default` here: it would put a `T: Default` bound on the derive,
    // and serde already maps a missing field to `None` for `Option`.
    #[serde(alias = "user")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// Unwrap the payload, converting `success: false` into an error.
    pub fn into_data(self) -> Result<T, ApiError> {
        if !self.success {
            return Err(ApiError::Rejected(
                self.message
                    .unwrap_or_else(|| "Request was rejected by the server".to_string()),
            ));
        }
        self.data
            .ok_or_else(|| ApiError::Decode("envelope missing payload".to_string()))
    }

    /// For fire-and-forget endpoints where only `success` matters.
    pub fn into_ack(self) -> Result<Option<String>, ApiError> {
        if self.success {
            Ok(self.message)
        } else {
            Err(ApiError::Rejected(
                self.message
                    .unwrap_or_else(|| "Request was rejected by the server".to_string()),
            ))
        }
    }
}
