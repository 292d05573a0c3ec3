//! User model and the onboarding gating flags derived from it.

use serde::{Deserialize, Serialize};

use crate::rbac::Role;
use crate::subscription::{self, SubscriptionStatus};

/// A Crewdeck user account, normalized from the backend payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default, alias = "isVerified")]
    pub is_verified: bool,
    #[serde(default, alias = "isInvited")]
    pub is_invited: bool,
    #[serde(default, alias = "hasCompanyInfo")]
    pub has_company_info: bool,
    #[serde(
        default,
        alias = "subscriptionStatus",
        deserialize_with = "subscription::lenient"
    )]
    pub subscription_status: Option<SubscriptionStatus>,
}

impl User {
    /// Whether the user's primary role is the admin role.
    pub fn is_admin(&self) -> bool {
        self.role.as_ref().is_some_and(Role::is_admin)
    }

    /// Whether the user holds a subscription in an entitled state.
    pub fn has_active_subscription(&self) -> bool {
        self.subscription_status
            .is_some_and(|s| s.is_entitled())
    }

    /// Whether the company-info onboarding step is still outstanding.
    ///
    /// Invited users never see onboarding. Users with no role yet are treated
    /// as admins-to-be (they are mid-signup).
    pub fn needs_company_info(&self) -> bool {
        !self.is_invited
            && !self.has_company_info
            && self.role.as_ref().map_or(true, Role::is_admin)
    }

    /// Whether the subscription onboarding step is still outstanding.
    ///
    /// Only admins carry the subscription step. Users with no role yet are
    /// gated once their company info is in; users with a non-admin role
    /// never are.
    pub fn needs_subscription(&self) -> bool {
        let role_gate = self
            .role
            .as_ref()
            .map_or(self.has_company_info, Role::is_admin);
        !self.is_invited && role_gate && !self.has_active_subscription()
    }
}

/// Backend user payload, either flat or wrapped in `{ "user": … }`.
///
/// The dashboard backend is inconsistent about which shape it returns, so the
/// ambiguity is resolved once here and nothing downstream ever sees it.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum UserPayload {
    Nested { user: User },
    Flat(User),
}

impl UserPayload {
    pub fn into_user(self) -> User {
        match self {
            Self::Nested { user } => user,
            Self::Flat(user) => user,
        }
    }
}
