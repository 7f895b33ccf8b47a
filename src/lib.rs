//! # Venture Core
//!
//! The session, route-access, and matching core for the Venture incubator
//! platform. UI shells render whatever this core returns; everything
//! presentational lives outside the crate.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        VENTURE CORE MODULES                             │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────┐  ┌──────────────┐    │
//! │  │    Auth     │  │   Profile   │  │   Session   │  │    Routes    │    │
//! │  │             │  │             │  │             │  │              │    │
//! │  │ - Identity  │  │ - Roles     │  │ - Lifecycle │  │ - Classify   │    │
//! │  │ - Gateway   │  │ - Records   │  │ - Sign-in/  │  │ - Guard      │    │
//! │  │ - Events    │  │ - Validate  │  │   out       │  │ - Redirects  │    │
//! │  └──────┬──────┘  └──────┬──────┘  └──────┬──────┘  └──────┬───────┘    │
//! │         │                │                │                │            │
//! │         └────────────────┴────────────────┴────────────────┘            │
//! │                                   │                                     │
//! │  ┌─────────────┐  ┌─────────────┐ │ ┌─────────────────────────────────┐ │
//! │  │    Store    │  │  Matching   │ │ │       External collaborators    │ │
//! │  │             │  │             │◄┘ │                                 │ │
//! │  │ - KV paths  │  │ - Selector  │   │ - Hosted identity provider      │ │
//! │  │ - Snapshots │  │ - Live feed │   │ - Hosted document store         │ │
//! │  │ - Prefs     │  │             │   │ - Durable local storage         │ │
//! │  └─────────────┘  └─────────────┘   └─────────────────────────────────┘ │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Hierarchy
//!
//! - [`error`] - Error types for the entire library
//! - [`time`] - Timestamp helpers
//! - [`auth`] - Identity types and the identity-provider gateway
//! - [`profile`] - Roles, domains, and role-specific profile records
//! - [`store`] - Profile-store boundary and durable local prefs
//! - [`session`] - The authoritative session value and its single writer
//! - [`routes`] - Path classification and the route-guard decision
//! - [`matching`] - Startup/investor matching and the live match feed
//!
//! ## Data Flow
//!
//! UI event (navigation, form submit) → session mutation or store write →
//! route guard recomputes its decision → the shell renders accordingly. All
//! collaborator calls are asynchronous; the only standing subscriptions are
//! the identity-change listener (one per session) and the match feed (one
//! per open dashboard, released on teardown).
//!
//! ## Wiring
//!
//! ```ignore
//! use std::sync::Arc;
//! use venture_core::{
//!     auth::MemoryGateway,
//!     routes::RouteGuard,
//!     session::SessionService,
//!     store::{MemoryStore, PrefsStore},
//! };
//!
//! let gateway = Arc::new(MemoryGateway::new());
//! let store = Arc::new(MemoryStore::new());
//! let prefs = Arc::new(PrefsStore::new());
//!
//! let session = SessionService::new(gateway, store.clone(), prefs);
//! session.spawn_listener();
//! let guard = RouteGuard::new(store, session.clone());
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod auth;
pub mod error;
pub mod matching;
pub mod profile;
pub mod routes;
pub mod session;
pub mod store;
/// Timestamp helpers shared across record writers.
pub mod time;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use auth::{AuthGateway, Identity, Provider};
pub use error::{Error, Result};
pub use profile::{Domain, ProfileRecord, Role};
pub use routes::{RouteDecision, RouteGuard};
pub use session::{Session, SessionService};

// ============================================================================
// VERSION INFO
// ============================================================================

/// Returns the version of Venture Core
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

// ============================================================================
// TESTS
// ============================================================================
