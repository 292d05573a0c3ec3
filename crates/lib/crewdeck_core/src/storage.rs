//! Session persistence seam.
//!
//! Stands in for the browser's local storage: a small string KV the session
//! service persists `user` + `is_authenticated` into, so a restarted app can
//! reconstruct its last known session before the first network round trip.

use std::collections::HashMap;
use std::sync::RwLock;

/// Storage key for the persisted user JSON.
pub const USER_KEY: &str = "crewdeck.session.user";

/// Storage key for the persisted authentication flag.
pub const AUTHENTICATED_KEY: &str = "crewdeck.session.authenticated";

/// String key-value persistence for session state.
pub trait SessionStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
    /// Remove everything. Logout calls this unconditionally.
    fn clear(&self);
}

/// In-memory storage, the default. A webview or desktop shell substitutes
/// its own implementation backed by real local storage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(key);
    }

    fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }
}
