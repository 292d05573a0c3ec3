//! Built-in permission taxonomy.
//!
//! Served when `GET /api/rbac/permissions/categories` fails, so the role
//! editor can still render a sensible checkbox grid offline.

use crewdeck_api_client::endpoints::rbac::PermissionCategory;
use crewdeck_types::Permission;

const ACTIONS: [&str; 4] = ["view", "create", "edit", "delete"];

fn permission(category: &str, action: &str) -> Permission {
    let name = format!("{category}.{action}");
    Permission {
        id: name.clone(),
        name,
        category: category.to_string(),
        description: None,
    }
}

fn category(name: &str, actions: &[&str]) -> PermissionCategory {
    PermissionCategory {
        name: name.to_string(),
        permissions: actions.iter().map(|a| permission(name, a)).collect(),
    }
}

/// The default category list, mirroring what the backend seeds.
pub fn default_categories() -> Vec<PermissionCategory> {
    vec![
        category("dashboard", &["view"]),
        category("products", &ACTIONS),
        category("roles", &ACTIONS),
        category("users", &ACTIONS),
        category("invitations", &ACTIONS),
    ]
}
