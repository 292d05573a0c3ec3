//! The session service: owns authentication state, persistence, and the
//! background refresh task.

use std::sync::{Arc, RwLock, Weak};
use std::time::Duration;

use tracing::{debug, info, warn};

use crewdeck_api_client::{ApiClient, TokenStore, guard_freshness};
use crewdeck_types::{TokenPair, User};

use crate::error::SessionError;
use crate::session::SessionState;
use crate::session::scheduler::{RefreshScheduler, default_refresh_interval};
use crate::storage::{AUTHENTICATED_KEY, SessionStorage, USER_KEY};

/// Authoritative session state for one app instance.
///
/// Constructed once at startup and shared via `Arc`. The service persists
/// `user` and `is_authenticated` into its [`SessionStorage`] on every change
/// so [`Self::restore`] can rehydrate the last session before any network
/// round trip.
pub struct SessionService {
    api: ApiClient,
    storage: Arc<dyn SessionStorage>,
    state: RwLock<SessionState>,
    scheduler: RefreshScheduler,
}

impl SessionService {
    /// Build a service with the default 14-minute refresh interval.
    pub fn new(api: ApiClient, storage: Arc<dyn SessionStorage>) -> Self {
        Self::with_refresh_interval(api, storage, default_refresh_interval())
    }

    /// Build a service with a custom refresh interval (tests shorten it).
    pub fn with_refresh_interval(
        api: ApiClient,
        storage: Arc<dyn SessionStorage>,
        interval: Duration,
    ) -> Self {
        Self {
            api,
            storage,
            state: RwLock::new(SessionState::default()),
            scheduler: RefreshScheduler::new(interval),
        }
    }

    /// The underlying API client.
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    fn tokens(&self) -> &Arc<TokenStore> {
        self.api.token_store()
    }

    /// A snapshot of the current state.
    pub fn state(&self) -> SessionState {
        self.state
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn current_user(&self) -> Option<User> {
        self.state
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .user
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .is_authenticated
    }

    pub fn has_tokens(&self) -> bool {
        self.tokens().has_tokens()
    }

    /// Rehydrate persisted state. Returns whether a previous session was
    /// found. The restored flag is advisory until the next validation.
    pub fn restore(&self) -> bool {
        let user = self
            .storage
            .get(USER_KEY)
            .and_then(|json| serde_json::from_str::<User>(&json).ok());
        let authenticated = self
            .storage
            .get(AUTHENTICATED_KEY)
            .is_some_and(|v| v == "true");
        if user.is_none() && !authenticated {
            return false;
        }
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        state.is_authenticated = authenticated && user.is_some();
        state.user = user;
        state.is_authenticated
    }

    /// Replace the current user, persist, and clear any stale error.
    pub fn set_user(&self, user: Option<User>) {
        {
            let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
            state.is_authenticated = user.is_some();
            state.user = user.clone();
            state.error = None;
        }
        match &user {
            Some(user) => {
                if let Ok(json) = serde_json::to_string(user) {
                    self.storage.set(USER_KEY, &json);
                }
                self.storage.set(AUTHENTICATED_KEY, "true");
            }
            None => {
                self.storage.remove(USER_KEY);
                self.storage.remove(AUTHENTICATED_KEY);
            }
        }
    }

    fn set_error(&self, message: String) {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        state.error = Some(message);
    }

    fn set_loading(&self, loading: bool) {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        state.is_loading = loading;
    }

    fn set_refreshing(&self, refreshing: bool) {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        state.is_refreshing = refreshing;
    }

    /// Drop all local session state without calling the backend.
    fn clear_session(&self) {
        self.tokens().clear();
        self.set_user(None);
        self.storage.clear();
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        *state = SessionState::default();
    }

    /// Establish a session from tokens obtained out of band (email
    /// verification, invitation acceptance).
    pub fn init_auth(&self, user: User, tokens: TokenPair) {
        self.tokens().set_tokens(tokens);
        self.tokens().mark_validated();
        self.set_user(Some(user));
    }

    /// Sign in with email and password.
    ///
    /// A failed login surfaces the backend message unchanged and never
    /// touches the refresh flow.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, SessionError> {
        self.set_loading(true);
        let result = self.api.login(email, password).await;
        self.set_loading(false);
        match result {
            Ok(payload) => {
                if let Some(pair) = payload.token_pair() {
                    self.tokens().set_tokens(pair);
                }
                self.tokens().mark_validated();
                let user = payload.into_user().ok_or(SessionError::IncompleteAuth)?;
                self.set_user(Some(user.clone()));
                info!(user = %user.email, "signed in");
                Ok(user)
            }
            Err(e) => {
                self.set_error(e.to_string());
                Err(e.into())
            }
        }
    }

    /// Validate the session against the backend, honoring the 5-minute
    /// freshness window unless `force` is set. Returns whether the session
    /// is valid afterwards. Never errors: an auth failure clears the
    /// session, a transient failure leaves it untouched.
    pub async fn validate_auth(&self, force: bool) -> bool {
        if !force && self.is_authenticated() && self.tokens().is_fresh(guard_freshness()) {
            debug!("session recently validated; skipping");
            return true;
        }
        match self.api.validate_session().await {
            Ok(user) => {
                self.set_user(Some(user));
                true
            }
            Err(e) if e.is_auth_failure() => {
                debug!(error = %e, "session validation rejected; clearing session");
                self.clear_session();
                false
            }
            Err(e) => {
                warn!(error = %e, "session validation failed");
                self.set_error(e.to_string());
                false
            }
        }
    }

    /// Validate with the freshness window. The startup entry point.
    pub async fn check_auth(&self) -> bool {
        self.set_loading(true);
        let valid = self.validate_auth(false).await;
        self.set_loading(false);
        valid
    }

    /// Sign out. The backend call runs first, but local state, storage, and
    /// the refresh task are cleared regardless of its outcome; a network
    /// failure is reported only after the session is gone.
    pub async fn logout(&self) -> Result<(), SessionError> {
        let result = self.api.logout().await;
        self.scheduler.shutdown();
        self.clear_session();
        info!("signed out");
        result.map(|_| ()).map_err(SessionError::from)
    }

    /// Retain the background refresh task. The first retain spawns it; later
    /// retains only bump the count, so overlapping guards share one task.
    pub fn retain_refresh(self: Arc<Self>) {
        let interval = self.scheduler.interval();
        let weak = Arc::downgrade(&self);
        self.scheduler
            .retain(move || tokio::spawn(run_refresh_loop(weak, interval)));
    }

    /// Release one retain; the task stops when the count reaches zero.
    pub fn release_refresh(&self) {
        self.scheduler.release();
    }

    /// Whether the refresh task is currently live.
    pub fn is_refresh_scheduled(&self) -> bool {
        self.scheduler.is_running()
    }

    /// One refresh attempt. An auth failure ends the session; anything else
    /// is logged and left for the next tick.
    pub(crate) async fn refresh_tick(&self) {
        self.set_refreshing(true);
        match self.api.refresh_session().await {
            Ok(payload) => {
                debug!("token refresh succeeded");
                if let Some(user) = payload.into_user() {
                    self.set_user(Some(user));
                }
            }
            Err(e) if e.is_auth_failure() => {
                warn!(error = %e, "token refresh rejected; clearing session");
                self.clear_session();
            }
            Err(e) => {
                warn!(error = %e, "token refresh failed; will retry next tick");
            }
        }
        self.set_refreshing(false);
    }
}

async fn run_refresh_loop(session: Weak<SessionService>, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    // The first tick completes immediately; the session was just validated.
    ticker.tick().await;
    loop {
        ticker.tick().await;
        match session.upgrade() {
            Some(session) => session.refresh_tick().await,
            None => break,
        }
    }
}
