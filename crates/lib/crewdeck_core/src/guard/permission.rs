//! The permission guard.
//!
//! Independent of the onboarding guard: gates on a permission or role name,
//! answering from the local cache and lazily fetching on a miss. Denial is
//! silent by design; the UI shows its fallback (or nothing), never an error.

use std::sync::Arc;

use tracing::debug;

use crate::permissions::PermissionService;

/// What the guarded content requires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermissionRequirement {
    /// A specific grant, addressed by category and permission name.
    Permission { category: String, name: String },
    /// Any user holding the named role.
    Role(String),
}

/// Outcome of a permission guard pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionDecision {
    /// Render the guarded content.
    Allow,
    /// Render the fallback (or nothing).
    Fallback,
}

/// Gate on a permission or role.
pub struct PermissionGuard {
    permissions: Arc<PermissionService>,
}

impl PermissionGuard {
    pub fn new(permissions: Arc<PermissionService>) -> Self {
        Self { permissions }
    }

    fn satisfied(&self, requirement: &PermissionRequirement) -> bool {
        match requirement {
            PermissionRequirement::Permission { category, name } => {
                self.permissions.has_permission(category, name)
            }
            PermissionRequirement::Role(name) => self.permissions.has_role(name),
        }
    }

    /// Decide whether the requirement is met. Cache first; one lazy fetch on
    /// a miss before falling back. Fetch failures degrade to the fallback.
    pub async fn evaluate(&self, requirement: &PermissionRequirement) -> PermissionDecision {
        if self.satisfied(requirement) {
            return PermissionDecision::Allow;
        }
        if !self.permissions.is_loaded() {
            if let Err(e) = self.permissions.ensure_loaded().await {
                debug!(error = %e, "permission fetch failed; showing fallback");
            }
            if self.satisfied(requirement) {
                return PermissionDecision::Allow;
            }
        }
        PermissionDecision::Fallback
    }
}
