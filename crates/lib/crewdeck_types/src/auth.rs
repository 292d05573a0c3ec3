//! Token pair issued by the auth backend.

use serde::{Deserialize, Serialize};

/// Access + refresh token pair.
///
/// The access token rides in the `Authorization` header for SPA-style calls;
/// the refresh token is echoed back to the refresh endpoint. The backend also
/// sets httpOnly cookies for the `/me` and `/logout` flows, which the HTTP
/// layer carries in its cookie jar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    #[serde(alias = "accessToken")]
    pub access_token: String,
    #[serde(alias = "refreshToken")]
    pub refresh_token: String,
}

impl TokenPair {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }
}
