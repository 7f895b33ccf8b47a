//! # Store Module
//!
//! The profile store boundary and durable local preferences.
//!
//! ## Store Layout
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        PROFILE STORE                                    │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  Tree-structured key-value store, slash-separated paths:                │
//! │                                                                         │
//! │    users/{id}        ─ role-independent user record                     │
//! │    startups/{id}     ─ startup profile                                  │
//! │    investors/{id}    ─ investor profile                                 │
//! │    students/{id}     ─ student profile                                  │
//! │                                                                         │
//! │  Operations:                                                            │
//! │    • read(path)            point read                                   │
//! │    • write(path, record)   whole-record replace (no field merge)        │
//! │    • subscribe(collection) full collection snapshot on every change     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Records are partitioned by `{collection}/{identity id}`, so concurrent
//! writers never contend on the same key under normal use. The collection
//! subscription is the only standing read in the core and must be released
//! when the consuming view is torn down.

mod memory;
mod prefs;

pub use memory::MemoryStore;
pub use prefs::{keys as prefs_keys, PrefsStore};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::watch;

use crate::error::Result;

/// A full snapshot of one collection, in insertion order
#[derive(Debug, Clone, Default)]
pub struct CollectionSnapshot {
    /// (child key, record) pairs as received from the store
    pub records: Vec<(String, Value)>,
}

/// Gateway to the hosted profile store
///
/// Implementations wrap a hosted document store. The in-memory
/// [`MemoryStore`] backs development and tests.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Point read of the record at `path`, if present
    async fn read(&self, path: &str) -> Result<Option<Value>>;

    /// Write the record at `path`, fully replacing any existing record
    async fn write(&self, path: &str, record: Value) -> Result<()>;

    /// Subscribe to a collection
    ///
    /// The receiver holds the current snapshot immediately and observes a
    /// fresh full snapshot on every change. Dropping the receiver releases
    /// the subscription.
    fn subscribe(&self, collection: &str) -> watch::Receiver<CollectionSnapshot>;
}

/// Path construction helpers
pub mod paths {
    use crate::profile::Role;

    /// Path of the role-independent user record
    pub fn user(id: &str) -> String {
        format!("users/{}", id)
    }

    /// Path of a role-specific profile record
    pub fn profile(role: Role, id: &str) -> String {
        format!("{}/{}", role.collection(), id)
    }
}

#[cfg(test)]
mod tests {
    use crate::profile::Role;

    #[test]
    fn test_paths() {
        assert_eq!(super::paths::user("u1"), "users/u1");
        assert_eq!(super::paths::profile(Role::Startup, "u1"), "startups/u1");
        assert_eq!(super::paths::profile(Role::Investor, "u2"), "investors/u2");
        assert_eq!(super::paths::profile(Role::Student, "u3"), "students/u3");
    }
}
