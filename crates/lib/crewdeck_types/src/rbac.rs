//! Role and permission models.

use serde::{Deserialize, Serialize};

/// Name of the built-in administrator role.
///
/// Any role with this name short-circuits permission checks and drives the
/// onboarding gates (only admins are walked through company info / payment).
pub const ADMIN_ROLE: &str = "admin";

/// A single grantable permission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub id: String,
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// A role with its granted permissions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// System roles (e.g. "admin") are immutable client-side.
    #[serde(default, alias = "isSystem")]
    pub is_system: bool,
    #[serde(default, alias = "isDefault")]
    pub is_default: bool,
    #[serde(default)]
    pub permissions: Vec<Permission>,
}

impl Role {
    pub fn is_admin(&self) -> bool {
        self.name == ADMIN_ROLE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_deserializes_camel_case_flags() {
        let role: Role = serde_json::from_str(
            r#"{"id":"r1","name":"admin","isSystem":true,"isDefault":false}"#,
        )
        .unwrap();
        assert!(role.is_system);
        assert!(!role.is_default);
        assert!(role.is_admin());
        assert!(role.permissions.is_empty());
    }

    #[test]
    fn role_deserializes_snake_case_flags() {
        let role: Role =
            serde_json::from_str(r#"{"id":"r2","name":"member","is_system":false}"#).unwrap();
        assert!(!role.is_system);
        assert!(!role.is_admin());
    }
}
