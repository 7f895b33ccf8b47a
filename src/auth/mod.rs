//! # Auth Module
//!
//! Identity types and the gateway to the external identity provider.
//!
//! ## Identity Flow
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         IDENTITY FLOW                                   │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │   sign_up / sign_in / sign_in_with_provider                             │
//! │            │                                                            │
//! │            ▼                                                            │
//! │   ┌─────────────────┐      credential check        ┌────────────────┐   │
//! │   │   AuthGateway   │ ───────────────────────────► │    Identity    │   │
//! │   │   (external)    │                              │    Provider    │   │
//! │   └────────┬────────┘ ◄─────────────────────────── └────────────────┘   │
//! │            │                 Identity | error                           │
//! │            ▼                                                            │
//! │   watch::channel(Option<Identity>)                                      │
//! │            │                                                            │
//! │            ▼                                                            │
//! │   SessionService (single subscriber, single session writer)             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The core never inspects provider-specific error codes; any non-success is
//! surfaced as one of the auth variants of [`crate::Error`]. Session state is
//! never mutated directly by a sign-in call — updates always flow through the
//! identity-change channel so there is a single source of truth.

mod memory;

pub use memory::MemoryGateway;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::error::Result;

/// Which credential mechanism an identity was created with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Provider {
    /// Email + password credentials
    #[serde(rename = "email")]
    Password,
    /// Federated Google sign-in
    #[serde(rename = "google")]
    Google,
}

impl Provider {
    /// Convert to the string stored in user records
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Password => "email",
            Provider::Google => "google",
        }
    }
}

/// A signed-in user as reported by the identity provider
///
/// Opaque from the core's perspective: the provider owns it, and the only
/// local mutation is dropping the reference on sign-out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Provider-assigned opaque id
    pub id: String,
    /// Email address
    pub email: String,
    /// Display name, if the provider supplied one
    pub display_name: Option<String>,
    /// Which mechanism created this identity
    pub provider: Provider,
}

/// Gateway to the external identity provider
///
/// Implementations wrap a hosted auth service. The in-memory
/// [`MemoryGateway`] backs development and tests.
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Create a new identity from email/password credentials
    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity>;

    /// Sign in with email/password credentials
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity>;

    /// Sign in through a federated provider
    async fn sign_in_with_provider(&self, provider: Provider) -> Result<Identity>;

    /// Sign out the current identity
    ///
    /// Callers wrap this in a timeout; the gateway itself has none.
    async fn sign_out(&self) -> Result<()>;

    /// Subscribe to identity changes
    ///
    /// The receiver observes `Some(identity)` on sign-in/sign-up and `None`
    /// on sign-out. Multiple subscribers are supported; the initial value is
    /// the provider's current state.
    fn subscribe(&self) -> watch::Receiver<Option<Identity>>;
}
