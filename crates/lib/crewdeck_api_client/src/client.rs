//! Request core: bearer attachment, dedup, revalidation, 401 recovery.

use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use reqwest::{Method, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

use crewdeck_types::{User, UserPayload};

use crate::config::ApiConfig;
use crate::endpoints::auth::AuthPayload;
use crate::envelope::Envelope;
use crate::error::ApiError;
use crate::routes;
use crate::tokens::{self, TokenStore};

/// A deduplicated in-flight request, shared between concurrent callers.
type InflightFuture = Shared<BoxFuture<'static, Result<Value, ApiError>>>;

/// Whether a request has already been retried after a token refresh.
///
/// A retried request can never trigger a second refresh, which is what
/// bounds the 401 recovery to exactly one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RetryState {
    Initial,
    Retried,
}

/// Per-request behavior switches.
#[derive(Debug, Clone, Copy)]
pub struct RequestOptions {
    /// Attach the bearer token, revalidate when stale, recover from 401.
    pub requires_auth: bool,
    /// Skip the pre-flight revalidation (used by the validation call itself).
    pub skip_revalidate: bool,
}

impl RequestOptions {
    /// An authenticated call with the full wrapper behavior.
    pub fn authed() -> Self {
        Self {
            requires_auth: true,
            skip_revalidate: false,
        }
    }

    /// A public call: no bearer, no revalidation, 401s returned as-is.
    /// Login goes through here so a failed login never triggers a refresh.
    pub fn public() -> Self {
        Self {
            requires_auth: false,
            skip_revalidate: true,
        }
    }

    fn authed_no_revalidate() -> Self {
        Self {
            requires_auth: true,
            skip_revalidate: true,
        }
    }
}

/// HTTP client for the Crewdeck backend.
///
/// Cheap to clone; clones share the cookie jar, token store, and in-flight
/// request map.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: ApiConfig,
    tokens: Arc<TokenStore>,
    inflight: Arc<DashMap<String, InflightFuture>>,
}

impl ApiClient {
    /// Build a client. The cookie jar is enabled because the `/me` and
    /// `/logout` flows authenticate via httpOnly cookies in addition to the
    /// bearer token.
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|e| ApiError::Network(format!("client init: {e}")))?;
        Ok(Self {
            http,
            config,
            tokens: Arc::new(TokenStore::new()),
            inflight: Arc::new(DashMap::new()),
        })
    }

    /// The shared token store.
    pub fn token_store(&self) -> &Arc<TokenStore> {
        &self.tokens
    }

    /// The active configuration.
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.resolve_base_url(), path)
    }

    /// Perform a request and return the parsed JSON body.
    ///
    /// For auth-requiring calls this is the full wrapper: stale-session
    /// revalidation up front, bearer attachment, and on a 401 one token
    /// refresh followed by one retry. Refresh failure clears the token state
    /// and surfaces [`ApiError::SessionExpired`].
    ///
    /// Returns a boxed future: this call is mutually recursive with
    /// [`Self::validate_session`] and [`Self::refresh_session`], and the
    /// type erasure is what keeps the future types finite and `Send`.
    pub fn request_json<'a>(
        &'a self,
        method: Method,
        path: &'a str,
        body: Option<&'a Value>,
        opts: RequestOptions,
    ) -> BoxFuture<'a, Result<Value, ApiError>> {
        Box::pin(self.execute(method, path, body, opts))
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        opts: RequestOptions,
    ) -> Result<Value, ApiError> {
        if opts.requires_auth
            && !opts.skip_revalidate
            && !self.tokens.is_fresh(tokens::wrapper_freshness())
        {
            // Best effort: if revalidation fails the request below will
            // answer 401 and go through the refresh path anyway.
            if let Err(e) = self.validate_session().await {
                debug!(error = %e, "pre-flight revalidation failed");
            }
        }

        let mut retry = RetryState::Initial;
        loop {
            let mut req = self.http.request(method.clone(), self.url(path));
            if opts.requires_auth
                && let Some(token) = self.tokens.access_token()
            {
                req = req.bearer_auth(token);
            }
            if let Some(body) = body {
                req = req.json(body);
            }

            let resp = req
                .send()
                .await
                .map_err(|e| ApiError::Network(e.to_string()))?;
            let status = resp.status();

            if status == StatusCode::UNAUTHORIZED
                && opts.requires_auth
                && retry == RetryState::Initial
            {
                match self.refresh_session().await {
                    Ok(_) => {
                        retry = RetryState::Retried;
                        continue;
                    }
                    Err(e) => {
                        warn!(error = %e, "token refresh failed; clearing session");
                        self.tokens.clear();
                        return Err(ApiError::SessionExpired);
                    }
                }
            }

            let text = resp
                .text()
                .await
                .map_err(|e| ApiError::Network(e.to_string()))?;
            let value: Value = if text.is_empty() {
                Value::Null
            } else {
                serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))?
            };

            if !status.is_success() {
                let message = value
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("Request failed with status {status}"));
                return Err(if status == StatusCode::UNAUTHORIZED {
                    if opts.requires_auth && retry == RetryState::Retried {
                        // The refreshed token was rejected too; the session
                        // is unusable.
                        warn!("retry after refresh still unauthorized; clearing session");
                        self.tokens.clear();
                    }
                    ApiError::Unauthorized(message)
                } else {
                    ApiError::Status {
                        status: status.as_u16(),
                        message,
                    }
                });
            }

            return Ok(value);
        }
    }

    /// Typed convenience over [`Self::request_json`]: unwrap the standard
    /// envelope and deserialize its payload.
    pub async fn request_data<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        opts: RequestOptions,
    ) -> Result<T, ApiError>
    where
        T: serde::de::DeserializeOwned,
    {
        let value = self.request_json(method, path, body, opts).await?;
        let envelope: Envelope<T> =
            serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))?;
        envelope.into_data()
    }

    /// Like [`Self::request_data`] for endpoints whose payload is irrelevant.
    pub async fn request_ack(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        opts: RequestOptions,
    ) -> Result<Option<String>, ApiError> {
        let value = self.request_json(method, path, body, opts).await?;
        let envelope: Envelope<Value> =
            serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))?;
        envelope.into_ack()
    }

    /// Fetch `/api/auth/me` and mark the session validated on success.
    ///
    /// Concurrent callers share one network request; the in-flight entry is
    /// removed on completion whether it succeeded or failed.
    pub async fn validate_session(&self) -> Result<User, ApiError> {
        let key = format!("GET {}", routes::AUTH_ME);
        let client = self.clone();
        let value = self
            .deduped(&key, move || {
                Box::pin(async move {
                    client
                        .request_json(
                            Method::GET,
                            routes::AUTH_ME,
                            None,
                            RequestOptions::authed_no_revalidate(),
                        )
                        .await
                })
            })
            .await?;
        let envelope: Envelope<UserPayload> =
            serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))?;
        let user = envelope.into_data()?.into_user();
        self.tokens.mark_validated();
        Ok(user)
    }

    /// Exchange the refresh token for new tokens, updating the token store.
    /// Deduplicated the same way as [`Self::validate_session`].
    pub async fn refresh_session(&self) -> Result<AuthPayload, ApiError> {
        let key = format!("POST {}", routes::AUTH_REFRESH);
        let client = self.clone();
        let value = self
            .deduped(&key, move || {
                Box::pin(async move {
                    let body = client
                        .tokens
                        .refresh_token()
                        .map(|token| serde_json::json!({ "refreshToken": token }));
                    client
                        .request_json(
                            Method::POST,
                            routes::AUTH_REFRESH,
                            body.as_ref(),
                            RequestOptions::public(),
                        )
                        .await
                })
            })
            .await?;
        let envelope: Envelope<AuthPayload> =
            serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))?;
        let data = envelope.into_data()?;
        if let Some(pair) = data.token_pair() {
            self.tokens.set_tokens(pair);
        }
        self.tokens.mark_validated();
        Ok(data)
    }

    /// Run `make()` unless an identical request is already in flight, in
    /// which case await the existing one. Entries are keyed `METHOD path`
    /// and removed on completion regardless of outcome.
    async fn deduped<F>(&self, key: &str, make: F) -> Result<Value, ApiError>
    where
        F: FnOnce() -> BoxFuture<'static, Result<Value, ApiError>>,
    {
        let fut = match self.inflight.entry(key.to_string()) {
            Entry::Occupied(entry) => {
                debug!(key, "joining in-flight request");
                entry.get().clone()
            }
            Entry::Vacant(entry) => {
                let fut = make().shared();
                entry.insert(fut.clone());
                fut
            }
        };
        let result = fut.clone().await;
        // Only remove our own entry; a later request may have replaced it.
        self.inflight.remove_if(key, |_, existing| existing.ptr_eq(&fut));
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_options_never_revalidate() {
        let opts = RequestOptions::public();
        assert!(!opts.requires_auth);
        assert!(opts.skip_revalidate);
    }

    #[test]
    fn authed_options_revalidate_by_default() {
        let opts = RequestOptions::authed();
        assert!(opts.requires_auth);
        assert!(!opts.skip_revalidate);
    }
}
