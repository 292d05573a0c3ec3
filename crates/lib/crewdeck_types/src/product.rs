//! Product/service catalog entry.

use serde::{Deserialize, Serialize};

/// A product or service offered by the company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    /// Billing unit, e.g. "hour" or "unit".
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default = "default_active", alias = "isActive")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_is_active_defaults_to_true() {
        let p: Product =
            serde_json::from_str(r#"{"id":"p1","name":"Labor","price":85.0}"#).unwrap();
        assert!(p.is_active);
        assert_eq!(p.unit, None);
    }
}
