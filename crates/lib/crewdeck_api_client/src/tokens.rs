//! Shared token and validation-freshness state.
//!
//! One [`TokenStore`] is shared between the HTTP layer and the session
//! service so both consult the same `last_validated` timestamp; only the
//! freshness window differs per caller.

use std::sync::RwLock;

use chrono::{DateTime, Duration, Utc};
use crewdeck_types::TokenPair;

/// Freshness window for wrapper-triggered revalidation: 15 minutes.
pub const WRAPPER_FRESHNESS_SECS: i64 = 15 * 60;

/// Freshness window for guard-triggered revalidation: 5 minutes.
pub const GUARD_FRESHNESS_SECS: i64 = 5 * 60;

/// Wrapper-side freshness window as a `Duration`.
pub fn wrapper_freshness() -> Duration {
    Duration::seconds(WRAPPER_FRESHNESS_SECS)
}

/// Guard-side freshness window as a `Duration`.
pub fn guard_freshness() -> Duration {
    Duration::seconds(GUARD_FRESHNESS_SECS)
}

#[derive(Debug, Default)]
struct TokenStateInner {
    tokens: Option<TokenPair>,
    last_validated: Option<DateTime<Utc>>,
}

/// Process-wide token state. Set operations are last-write-wins.
#[derive(Debug, Default)]
pub struct TokenStore {
    inner: RwLock<TokenStateInner>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_tokens(&self, tokens: TokenPair) {
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        inner.tokens = Some(tokens);
    }

    /// Drop tokens and the validation timestamp.
    pub fn clear(&self) {
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        inner.tokens = None;
        inner.last_validated = None;
    }

    pub fn tokens(&self) -> Option<TokenPair> {
        self.inner
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .tokens
            .clone()
    }

    pub fn access_token(&self) -> Option<String> {
        self.tokens().map(|t| t.access_token)
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.tokens().map(|t| t.refresh_token)
    }

    pub fn has_tokens(&self) -> bool {
        self.inner
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .tokens
            .is_some()
    }

    /// Record a successful session validation at "now".
    pub fn mark_validated(&self) {
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        inner.last_validated = Some(Utc::now());
    }

    pub fn last_validated(&self) -> Option<DateTime<Utc>> {
        self.inner
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .last_validated
    }

    /// Whether the last validation happened within `window`.
    pub fn is_fresh(&self, window: Duration) -> bool {
        self.last_validated()
            .is_some_and(|at| Utc::now() - at < window)
    }
}
