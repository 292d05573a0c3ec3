//! The permission service: loads and caches the current user's grants and
//! the role catalogue.

use std::sync::{Arc, RwLock};

use tracing::{debug, warn};

use crewdeck_api_client::ApiClient;
use crewdeck_api_client::endpoints::rbac::{PermissionCategory, RoleInput};
use crewdeck_types::Role;

use crate::error::PermissionError;
use crate::permissions::fallback;
use crate::permissions::state::{PermissionState, group_grants};
use crate::session::SessionService;

/// Caches the signed-in user's grants and roles and mediates role
/// administration. Checks read the local cache only; [`Self::ensure_loaded`]
/// does the lazy first fetch.
pub struct PermissionService {
    api: ApiClient,
    session: Arc<SessionService>,
    state: RwLock<PermissionState>,
}

impl PermissionService {
    pub fn new(api: ApiClient, session: Arc<SessionService>) -> Self {
        Self {
            api,
            session,
            state: RwLock::new(PermissionState::default()),
        }
    }

    /// A snapshot of the current state.
    pub fn state(&self) -> PermissionState {
        self.state
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut PermissionState) -> R) -> R {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        f(&mut state)
    }

    /// Whether `name` in `category` is granted, consulting only the cache.
    /// The session user's role backs up the admin short-circuit so admins
    /// pass even before the first fetch completes.
    pub fn has_permission(&self, category: &str, name: &str) -> bool {
        if self.session_user_is_admin() {
            return true;
        }
        self.state
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .has_permission(category, name)
    }

    /// Whether the current user holds the named role, from the cache.
    pub fn has_role(&self, name: &str) -> bool {
        self.state
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .has_role(name)
    }

    pub fn is_admin(&self) -> bool {
        self.session_user_is_admin()
            || self
                .state
                .read()
                .unwrap_or_else(|e| e.into_inner())
                .is_admin()
    }

    fn session_user_is_admin(&self) -> bool {
        self.session.current_user().is_some_and(|u| u.is_admin())
    }

    /// Whether the first fetch has completed.
    pub fn is_loaded(&self) -> bool {
        self.state.read().unwrap_or_else(|e| e.into_inner()).is_loaded
    }

    /// Fetch the caller's grants and role names. Signed-out callers get an
    /// empty cache and no network traffic.
    pub async fn fetch_permissions(&self) -> Result<(), PermissionError> {
        if !self.session.is_authenticated() {
            debug!("not authenticated; clearing permission cache");
            self.with_state(|s| *s = PermissionState::default());
            return Ok(());
        }
        self.with_state(|s| s.is_loading = true);
        let result = async {
            let grants = self.api.my_permissions().await?;
            let role_names = self.api.my_roles().await?;
            Ok::<_, PermissionError>((grants, role_names))
        }
        .await;
        match result {
            Ok((grants, role_names)) => {
                self.with_state(|s| {
                    s.grants = group_grants(grants);
                    s.role_names = role_names;
                    s.is_loading = false;
                    s.is_loaded = true;
                    s.error = None;
                });
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "failed to load permissions");
                self.with_state(|s| {
                    s.is_loading = false;
                    s.error = Some(e.to_string());
                });
                Err(e)
            }
        }
    }

    /// Fetch grants once; later calls hit the cache.
    pub async fn ensure_loaded(&self) -> Result<(), PermissionError> {
        if self.is_loaded() {
            return Ok(());
        }
        self.fetch_permissions().await
    }

    /// Drop the cache (logout, role change).
    pub fn reset(&self) {
        self.with_state(|s| *s = PermissionState::default());
    }

    /// Load the role catalogue into the cache and return it.
    pub async fn load_roles(&self) -> Result<Vec<Role>, PermissionError> {
        let roles = self.api.fetch_roles().await?;
        self.with_state(|s| s.roles = roles.clone());
        Ok(roles)
    }

    /// Refuse mutations of system roles before they reach the backend.
    fn guard_system_role(&self, id: &str) -> Result<(), PermissionError> {
        let is_system = self
            .state
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .roles
            .iter()
            .any(|r| r.id == id && r.is_system);
        if is_system {
            return Err(PermissionError::SystemRole);
        }
        Ok(())
    }

    /// Create a role and refresh the catalogue.
    pub async fn create_role(&self, input: &RoleInput) -> Result<Role, PermissionError> {
        let role = self.api.create_role(input).await?;
        self.load_roles().await?;
        Ok(role)
    }

    /// Update a role and refresh the catalogue. System roles are refused.
    pub async fn update_role(&self, id: &str, input: &RoleInput) -> Result<Role, PermissionError> {
        self.guard_system_role(id)?;
        let role = self.api.update_role(id, input).await?;
        self.load_roles().await?;
        Ok(role)
    }

    /// Delete a role and refresh the catalogue. System roles are refused.
    pub async fn delete_role(&self, id: &str) -> Result<(), PermissionError> {
        self.guard_system_role(id)?;
        self.api.delete_role(id).await?;
        self.load_roles().await?;
        Ok(())
    }

    /// Replace a role's granted permission set and refresh the catalogue.
    /// System roles are refused.
    pub async fn update_role_permissions(
        &self,
        id: &str,
        permission_ids: &[String],
    ) -> Result<Role, PermissionError> {
        self.guard_system_role(id)?;
        let role = self.api.update_role_permissions(id, permission_ids).await?;
        self.load_roles().await?;
        Ok(role)
    }

    /// Load the permission taxonomy, falling back to the built-in category
    /// list when the backend call fails. The error is still recorded.
    pub async fn load_permission_categories(&self) -> Vec<PermissionCategory> {
        match self.api.fetch_permission_categories().await {
            Ok(categories) => {
                self.with_state(|s| {
                    s.categories = categories.clone();
                    s.error = None;
                });
                categories
            }
            Err(e) => {
                warn!(error = %e, "failed to load permission categories; using defaults");
                let categories = fallback::default_categories();
                self.with_state(|s| {
                    s.categories = categories.clone();
                    s.error = Some(e.to_string());
                });
                categories
            }
        }
    }
}
