//! Backend route paths, centralized so endpoint bindings and tests agree.

pub const AUTH_REGISTER: &str = "/api/auth/register";
pub const AUTH_LOGIN: &str = "/api/auth/login";
pub const AUTH_LOGOUT: &str = "/api/auth/logout";
pub const AUTH_REFRESH: &str = "/api/auth/refresh";
pub const AUTH_ME: &str = "/api/auth/me";
pub const AUTH_VERIFY_EMAIL: &str = "/api/auth/verify-email";
pub const AUTH_RESEND_VERIFICATION: &str = "/api/auth/resend-verification";
pub const AUTH_FORGOT_PASSWORD: &str = "/api/auth/forgot-password";
pub const AUTH_RESET_PASSWORD: &str = "/api/auth/reset-password";
pub const AUTH_COMPANY_INFO: &str = "/api/auth/company-info";
pub const AUTH_SUBSCRIPTION: &str = "/api/auth/subscription";
pub const AUTH_VERIFY_INVITATION: &str = "/api/auth/verify-invitation";
pub const AUTH_ACCEPT_INVITATION: &str = "/api/auth/accept-invitation";

pub const PRODUCTS: &str = "/api/products";

pub fn product(id: &str) -> String {
    format!("{PRODUCTS}/{id}")
}

pub const RBAC_ROLES: &str = "/api/rbac/roles";
pub const RBAC_PERMISSION_CATEGORIES: &str = "/api/rbac/permissions/categories";
pub const RBAC_MY_PERMISSIONS: &str = "/api/rbac/users/me/permissions";
pub const RBAC_MY_PRIMARY_ROLE: &str = "/api/rbac/users/me/primary-role";
pub const RBAC_MY_ROLES: &str = "/api/rbac/users/me/roles";

pub fn rbac_role(id: &str) -> String {
    format!("{RBAC_ROLES}/{id}")
}

pub fn rbac_role_permissions(id: &str) -> String {
    format!("{RBAC_ROLES}/{id}/permissions")
}

pub const INVITATIONS: &str = "/api/invitations";

pub fn invitation(id: &str) -> String {
    format!("{INVITATIONS}/{id}")
}

pub fn invitation_resend(id: &str) -> String {
    format!("{INVITATIONS}/{id}/resend")
}
