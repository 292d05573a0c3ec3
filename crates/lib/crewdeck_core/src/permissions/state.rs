//! Pure permission state and lookups.

use std::collections::HashMap;

use crewdeck_api_client::endpoints::rbac::{PermissionCategory, PermissionGrant};
use crewdeck_types::{ADMIN_ROLE, Role};

/// Grants grouped by category, then permission name.
pub type GrantMap = HashMap<String, HashMap<String, bool>>;

/// Group flat grant rows into the category → name → granted map the
/// lookups below expect.
pub fn group_grants(grants: Vec<PermissionGrant>) -> GrantMap {
    let mut map: GrantMap = HashMap::new();
    for grant in grants {
        map.entry(grant.category)
            .or_default()
            .insert(grant.name, grant.granted);
    }
    map
}

/// Snapshot of the permission store.
///
/// Lookups are pure functions over this snapshot; the service refreshes it
/// from the backend.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PermissionState {
    pub grants: GrantMap,
    pub roles: Vec<Role>,
    /// The current user's role names, from `/users/me/roles`.
    pub role_names: Vec<String>,
    pub categories: Vec<PermissionCategory>,
    pub is_loading: bool,
    pub is_loaded: bool,
    pub error: Option<String>,
}

impl PermissionState {
    /// Whether `name` in `category` is granted. Admins pass every check.
    pub fn has_permission(&self, category: &str, name: &str) -> bool {
        if self.is_admin() {
            return true;
        }
        self.grants
            .get(category)
            .and_then(|names| names.get(name))
            .copied()
            .unwrap_or(false)
    }

    /// Whether the current user holds the named role.
    pub fn has_role(&self, name: &str) -> bool {
        self.role_names.iter().any(|r| r == name)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(ADMIN_ROLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grant(category: &str, name: &str, granted: bool) -> PermissionGrant {
        serde_json::from_value(serde_json::json!({
            "name": name,
            "category": category,
            "granted": granted,
        }))
        .unwrap()
    }

    #[test]
    fn grouping_nests_by_category() {
        let grants = group_grants(vec![
            grant("products", "products.view", true),
            grant("products", "products.delete", false),
            grant("users", "users.view", true),
        ]);
        assert_eq!(grants["products"]["products.view"], true);
        assert_eq!(grants["products"]["products.delete"], false);
        assert_eq!(grants["users"].len(), 1);
    }

    #[test]
    fn missing_grants_are_denied() {
        let state = PermissionState {
            grants: group_grants(vec![grant("products", "products.view", true)]),
            ..Default::default()
        };
        assert!(state.has_permission("products", "products.view"));
        assert!(!state.has_permission("products", "products.delete"));
        assert!(!state.has_permission("invoices", "invoices.view"));
    }

    #[test]
    fn admin_role_grants_everything() {
        let state = PermissionState {
            role_names: vec![ADMIN_ROLE.to_string()],
            ..Default::default()
        };
        assert!(state.is_admin());
        assert!(state.has_permission("anything", "at.all"));
    }

    #[test]
    fn role_lookup_is_exact() {
        let state = PermissionState {
            role_names: vec!["manager".to_string()],
            ..Default::default()
        };
        assert!(state.has_role("manager"));
        assert!(!state.has_role("Manager"));
        assert!(!state.is_admin());
    }
}
