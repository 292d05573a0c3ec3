//! Role and permission (RBAC) endpoints.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crewdeck_types::{Permission, Role};

use crate::client::{ApiClient, RequestOptions};
use crate::error::ApiError;
use crate::routes;

/// A permission category with its member permissions, as served by
/// `GET /api/rbac/permissions/categories`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionCategory {
    #[serde(alias = "category")]
    pub name: String,
    #[serde(default)]
    pub permissions: Vec<Permission>,
}

/// A single grant row from `GET /api/rbac/users/me/permissions`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PermissionGrant {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub granted: bool,
}

/// Create/update body for a role.
#[derive(Debug, Clone, Serialize)]
pub struct RoleInput {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ApiClient {
    /// `GET /api/rbac/roles`.
    pub async fn fetch_roles(&self) -> Result<Vec<Role>, ApiError> {
        self.request_data(
            Method::GET,
            routes::RBAC_ROLES,
            None,
            RequestOptions::authed(),
        )
        .await
    }

    /// `POST /api/rbac/roles`.
    pub async fn create_role(&self, input: &RoleInput) -> Result<Role, ApiError> {
        let body = serde_json::to_value(input).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.request_data(
            Method::POST,
            routes::RBAC_ROLES,
            Some(&body),
            RequestOptions::authed(),
        )
        .await
    }

    /// `PUT /api/rbac/roles/:id`.
    pub async fn update_role(&self, id: &str, input: &RoleInput) -> Result<Role, ApiError> {
        let body = serde_json::to_value(input).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.request_data(
            Method::PUT,
            &routes::rbac_role(id),
            Some(&body),
            RequestOptions::authed(),
        )
        .await
    }

    /// `DELETE /api/rbac/roles/:id`.
    pub async fn delete_role(&self, id: &str) -> Result<Option<String>, ApiError> {
        self.request_ack(
            Method::DELETE,
            &routes::rbac_role(id),
            None,
            RequestOptions::authed(),
        )
        .await
    }

    /// `PUT /api/rbac/roles/:id/permissions` — replace the granted set.
    pub async fn update_role_permissions(
        &self,
        id: &str,
        permission_ids: &[String],
    ) -> Result<Role, ApiError> {
        let body = json!({ "permissions": permission_ids });
        self.request_data(
            Method::PUT,
            &routes::rbac_role_permissions(id),
            Some(&body),
            RequestOptions::authed(),
        )
        .await
    }

    /// `GET /api/rbac/permissions/categories` — the permission taxonomy.
    pub async fn fetch_permission_categories(
        &self,
    ) -> Result<Vec<PermissionCategory>, ApiError> {
        self.request_data(
            Method::GET,
            routes::RBAC_PERMISSION_CATEGORIES,
            None,
            RequestOptions::authed(),
        )
        .await
    }

    /// `GET /api/rbac/users/me/permissions` — the caller's grants.
    pub async fn my_permissions(&self) -> Result<Vec<PermissionGrant>, ApiError> {
        self.request_data(
            Method::GET,
            routes::RBAC_MY_PERMISSIONS,
            None,
            RequestOptions::authed(),
        )
        .await
    }

    /// `GET /api/rbac/users/me/roles` — the caller's role names.
    pub async fn my_roles(&self) -> Result<Vec<String>, ApiError> {
        self.request_data(
            Method::GET,
            routes::RBAC_MY_ROLES,
            None,
            RequestOptions::authed(),
        )
        .await
    }

    /// `GET /api/rbac/users/me/primary-role`.
    pub async fn my_primary_role(&self) -> Result<Option<Role>, ApiError> {
        self.request_data(
            Method::GET,
            routes::RBAC_MY_PRIMARY_ROLE,
            None,
            RequestOptions::authed(),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_accepts_either_key() {
        let c: PermissionCategory =
            serde_json::from_str(r#"{"category":"products","permissions":[]}"#).unwrap();
        assert_eq!(c.name, "products");
        let c: PermissionCategory = serde_json::from_str(r#"{"name":"users"}"#).unwrap();
        assert_eq!(c.name, "users");
    }

    #[test]
    fn grant_defaults_to_not_granted() {
        let g: PermissionGrant =
            serde_json::from_str(r#"{"name":"products.view","category":"products"}"#).unwrap();
        assert!(!g.granted);
    }
}
