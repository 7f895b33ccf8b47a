//! Durable local preferences.
//!
//! A single-key-value surface standing in for the browser's local storage.
//! The only key the core uses is `userType`, holding the chosen role so it
//! survives a reload; it is written on role selection and on role resolution
//! from a user record, and removed on sign-out.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::profile::Role;

/// Key names for local preferences
pub mod keys {
    /// The role the visitor chose before authenticating
    pub const USER_TYPE: &str = "userType";
}

/// Durable local preference store
pub struct PrefsStore {
    /// In-memory storage (for development/testing)
    /// In production, this is backed by the platform's durable local storage
    memory: RwLock<HashMap<String, String>>,
}

impl PrefsStore {
    /// Create an empty prefs store
    pub fn new() -> Self {
        Self {
            memory: RwLock::new(HashMap::new()),
        }
    }

    /// Store a value
    pub fn set(&self, key: &str, value: &str) {
        self.memory.write().insert(key.to_string(), value.to_string());
    }

    /// Retrieve a value
    pub fn get(&self, key: &str) -> Option<String> {
        self.memory.read().get(key).cloned()
    }

    /// Remove a value, returning whether it existed
    pub fn remove(&self, key: &str) -> bool {
        self.memory.write().remove(key).is_some()
    }

    // ========================================================================
    // ROLE HELPERS
    // ========================================================================

    /// The stored role, if one was chosen and parses
    pub fn role(&self) -> Option<Role> {
        self.get(keys::USER_TYPE).and_then(|s| Role::parse(&s))
    }

    /// Persist the chosen role
    pub fn set_role(&self, role: Role) {
        self.set(keys::USER_TYPE, role.as_str());
    }

    /// Clear the chosen role
    pub fn clear_role(&self) {
        self.remove(keys::USER_TYPE);
    }
}

impl Default for PrefsStore {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let prefs = PrefsStore::new();

        assert!(prefs.get("missing").is_none());
        prefs.set("k", "v");
        assert_eq!(prefs.get("k").as_deref(), Some("v"));
        assert!(prefs.remove("k"));
        assert!(!prefs.remove("k"));
    }

    #[test]
    fn test_choose_role_is_idempotent() {
        let prefs = PrefsStore::new();

        prefs.set_role(Role::Startup);
        let first = prefs.get(keys::USER_TYPE);
        prefs.set_role(Role::Startup);
        let second = prefs.get(keys::USER_TYPE);

        assert_eq!(first, second);
        assert_eq!(prefs.role(), Some(Role::Startup));
    }

    #[test]
    fn test_garbage_role_string_reads_as_none() {
        let prefs = PrefsStore::new();
        prefs.set(keys::USER_TYPE, "superuser");
        assert_eq!(prefs.role(), None);
    }
}
