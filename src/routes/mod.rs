//! # Routes Module
//!
//! Path classification and the per-navigation access decision.
//!
//! ## Decision State Machine
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       ROUTE GUARD DECISION                              │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  navigation(path, session)                                              │
//! │        │                                                                │
//! │        ├── session.loading ───────────────────────────► Checking        │
//! │        │                                                                │
//! │        ├── no identity                                                  │
//! │        │      ├── public path ────────────────────────► Allowed         │
//! │        │      └── protected path ─────────────────────► RedirectAuth    │
//! │        │            (target: /auth if a role was chosen, else           │
//! │        │             /selection)                                        │
//! │        │                                                                │
//! │        ├── identity + dashboard path                                    │
//! │        │      │   existence check at {role}/{id}, re-run on EVERY       │
//! │        │      │   navigation (never cached across navigations)          │
//! │        │      ├── record present ─────────────────────► Allowed         │
//! │        │      ├── record absent / read error ────────► RedirectOnboard  │
//! │        │      │     (target: own-role dashboard, which renders the      │
//! │        │      │      onboarding form)                                   │
//! │        │      └── role unknown ───────────────────────► RedirectOnboard │
//! │        │            (target: /selection — identity without a record)    │
//! │        │                                                                │
//! │        └── identity + any other path ─────────────────► Allowed         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `Checking` renders a neutral placeholder and never redirects. The two
//! redirect states are terminal for the navigation — the guard does not
//! render children. A completeness check whose identity changed while the
//! read was in flight is discarded and reported as `Checking` so it can be
//! re-run against the fresh session.

use std::sync::Arc;

use crate::profile::Role;
use crate::session::{Session, SessionService};
use crate::store::{paths, ProfileStore};

/// What kind of access a path requires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// Reachable by anyone, signed in or not
    Public,
    /// Requires a signed-in identity
    Protected,
    /// Requires a signed-in identity with a completed role profile
    Dashboard(Role),
}

/// Classify a requested path
///
/// Unknown paths fall back to the public home shell, mirroring the app's
/// wildcard redirect to `/`.
pub fn classify(path: &str) -> RouteClass {
    match path {
        "/" | "/contact" | "/selection" | "/auth" | "/terms" | "/privacy" | "/access-denied" => {
            RouteClass::Public
        }
        "/services" | "/portfolio" | "/portfolios" | "/colaborations" | "/assets" | "/about" => {
            RouteClass::Protected
        }
        "/startup-dashboard" => RouteClass::Dashboard(Role::Startup),
        "/investor-dashboard" => RouteClass::Dashboard(Role::Investor),
        "/student-dashboard" => RouteClass::Dashboard(Role::Student),
        _ => RouteClass::Public,
    }
}

/// Outcome of a navigation attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// Session still loading or check superseded; render a neutral
    /// placeholder, do not redirect
    Checking,
    /// Render the requested view
    Allowed,
    /// Navigate to the auth flow
    RedirectAuth {
        /// `/auth` when a role was already chosen, `/selection` otherwise
        target: &'static str,
    },
    /// Navigate to onboarding
    RedirectOnboarding {
        /// The user's own-role dashboard (which renders the onboarding
        /// form), or `/selection` when the role itself is unknown
        target: &'static str,
    },
}

/// Decides reachability of requested views
pub struct RouteGuard {
    store: Arc<dyn ProfileStore>,
    session: Arc<SessionService>,
}

impl RouteGuard {
    /// Create a guard over the given session and store
    pub fn new(store: Arc<dyn ProfileStore>, session: Arc<SessionService>) -> Self {
        Self { store, session }
    }

    /// Decide a navigation attempt
    pub async fn decide(&self, path: &str) -> RouteDecision {
        let session = self.session.current();

        if session.loading {
            return RouteDecision::Checking;
        }

        match classify(path) {
            RouteClass::Public => RouteDecision::Allowed,
            RouteClass::Protected | RouteClass::Dashboard(_) if session.identity.is_none() => {
                RouteDecision::RedirectAuth {
                    target: if session.role.is_some() {
                        "/auth"
                    } else {
                        "/selection"
                    },
                }
            }
            RouteClass::Protected => RouteDecision::Allowed,
            RouteClass::Dashboard(_) => self.check_onboarding(&session).await,
        }
    }

    /// Re-check onboarding completeness against the store
    ///
    /// Run on every dashboard navigation so a form submitted in another tab
    /// is picked up immediately.
    async fn check_onboarding(&self, session: &Session) -> RouteDecision {
        // identity presence established by the caller
        let identity_id = match &session.identity {
            Some(identity) => identity.id.clone(),
            None => return RouteDecision::Checking,
        };

        // An identity without a known role is the signup-gap case: the
        // account exists but no record was ever written. Send them back to
        // role selection instead of looping between redirects.
        let role = match session.role {
            Some(role) => role,
            None => {
                return RouteDecision::RedirectOnboarding {
                    target: "/selection",
                }
            }
        };

        let complete = match self.store.read(&paths::profile(role, &identity_id)).await {
            Ok(Some(_)) => true,
            Ok(None) => false,
            Err(e) => {
                // Err toward showing the onboarding form again rather than
                // blocking access entirely.
                tracing::warn!("Onboarding check failed for {}: {}", identity_id, e);
                false
            }
        };

        // Discard the result if the signed-in identity changed while the
        // read was in flight.
        if !self.session.note_onboarding(&identity_id, complete) {
            return RouteDecision::Checking;
        }

        if complete {
            RouteDecision::Allowed
        } else {
            RouteDecision::RedirectOnboarding {
                target: role.dashboard_path(),
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AuthGateway, MemoryGateway};
    use crate::profile::{fixtures, Domain};
    use crate::store::{MemoryStore, PrefsStore};

    struct Harness {
        gateway: Arc<MemoryGateway>,
        store: Arc<MemoryStore>,
        service: Arc<SessionService>,
        guard: RouteGuard,
    }

    fn harness() -> Harness {
        let gateway = Arc::new(MemoryGateway::new());
        let store = Arc::new(MemoryStore::new());
        let prefs = Arc::new(PrefsStore::new());
        let service = SessionService::new(gateway.clone(), store.clone(), prefs);
        service.spawn_listener();
        let guard = RouteGuard::new(store.clone(), service.clone());
        Harness {
            gateway,
            store,
            service,
            guard,
        }
    }

    async fn wait_ready(service: &SessionService) {
        let mut rx = service.subscribe();
        rx.wait_for(|s| !s.loading).await.unwrap();
    }

    async fn wait_signed_in(service: &SessionService) {
        let mut rx = service.subscribe();
        rx.wait_for(|s| s.identity.is_some()).await.unwrap();
    }

    #[test]
    fn test_classification() {
        assert_eq!(classify("/"), RouteClass::Public);
        assert_eq!(classify("/terms"), RouteClass::Public);
        assert_eq!(classify("/services"), RouteClass::Protected);
        assert_eq!(
            classify("/startup-dashboard"),
            RouteClass::Dashboard(Role::Startup)
        );
        // Unknown paths fall back to the public home shell.
        assert_eq!(classify("/no-such-page"), RouteClass::Public);
    }

    #[tokio::test]
    async fn test_loading_session_checks() {
        let h = harness();
        // Before the listener resolves the first identity event.
        assert_eq!(h.guard.decide("/services").await, RouteDecision::Checking);
    }

    #[tokio::test]
    async fn test_anonymous_public_paths_allowed() {
        let h = harness();
        wait_ready(&h.service).await;

        for path in ["/", "/contact", "/terms", "/privacy"] {
            assert_eq!(h.guard.decide(path).await, RouteDecision::Allowed, "{}", path);
        }
    }

    #[tokio::test]
    async fn test_anonymous_protected_paths_redirect_to_auth() {
        let h = harness();
        wait_ready(&h.service).await;

        for path in ["/services", "/assets", "/startup-dashboard"] {
            assert_eq!(
                h.guard.decide(path).await,
                RouteDecision::RedirectAuth {
                    target: "/selection"
                },
                "{}",
                path
            );
        }

        // Once a role is chosen, the auth redirect targets the sign-in view.
        h.service.choose_role(Role::Startup);
        assert_eq!(
            h.guard.decide("/services").await,
            RouteDecision::RedirectAuth { target: "/auth" }
        );
    }

    #[tokio::test]
    async fn test_dashboard_without_record_redirects_to_onboarding() {
        let h = harness();

        h.service
            .complete_signup("alice@example.com", "hunter2", Role::Startup, "Alice")
            .await
            .unwrap();
        wait_signed_in(&h.service).await;

        assert_eq!(
            h.guard.decide("/startup-dashboard").await,
            RouteDecision::RedirectOnboarding {
                target: "/startup-dashboard"
            }
        );
    }

    #[tokio::test]
    async fn test_dashboard_with_record_allowed() {
        let h = harness();

        h.service
            .complete_signup("alice@example.com", "hunter2", Role::Startup, "Alice")
            .await
            .unwrap();
        wait_signed_in(&h.service).await;
        h.service
            .submit_profile(fixtures::startup_profile("Acme", Domain::Technology))
            .await
            .unwrap();

        assert_eq!(
            h.guard.decide("/startup-dashboard").await,
            RouteDecision::Allowed
        );
    }

    #[tokio::test]
    async fn test_role_less_identity_redirects_to_selection() {
        let h = harness();

        // Identity exists but no record was ever written (the signup gap).
        h.gateway.sign_up("gap@example.com", "hunter2").await.unwrap();
        wait_signed_in(&h.service).await;

        assert_eq!(
            h.guard.decide("/student-dashboard").await,
            RouteDecision::RedirectOnboarding {
                target: "/selection"
            }
        );
    }

    #[tokio::test]
    async fn test_read_error_errs_toward_onboarding() {
        let h = harness();

        h.service
            .complete_signup("alice@example.com", "hunter2", Role::Investor, "Alice")
            .await
            .unwrap();
        wait_signed_in(&h.service).await;

        h.store.set_fail_reads(true);
        assert_eq!(
            h.guard.decide("/investor-dashboard").await,
            RouteDecision::RedirectOnboarding {
                target: "/investor-dashboard"
            }
        );
    }

    #[tokio::test]
    async fn test_completeness_rechecked_every_navigation() {
        let h = harness();

        h.service
            .complete_signup("alice@example.com", "hunter2", Role::Startup, "Alice")
            .await
            .unwrap();
        wait_signed_in(&h.service).await;

        assert!(matches!(
            h.guard.decide("/startup-dashboard").await,
            RouteDecision::RedirectOnboarding { .. }
        ));

        // Form submitted "in another tab": the next navigation sees it.
        h.service
            .submit_profile(fixtures::startup_profile("Acme", Domain::Finance))
            .await
            .unwrap();
        assert_eq!(
            h.guard.decide("/startup-dashboard").await,
            RouteDecision::Allowed
        );
    }

    #[tokio::test]
    async fn test_student_signup_reload_allows_dashboard() {
        let h = harness();

        h.service
            .complete_signup("dev@example.com", "hunter2", Role::Student, "Dev")
            .await
            .unwrap();
        wait_signed_in(&h.service).await;
        h.service
            .submit_profile(fixtures::student_profile("Dev"))
            .await
            .unwrap();

        // Reload: fresh session service and guard over the same backends.
        let prefs2 = Arc::new(PrefsStore::new());
        let service2 = SessionService::new(h.gateway.clone(), h.store.clone(), prefs2);
        service2.spawn_listener();
        let mut rx = service2.subscribe();
        rx.wait_for(|s| s.identity.is_some()).await.unwrap();

        let guard2 = RouteGuard::new(h.store.clone(), service2);
        assert_eq!(
            guard2.decide("/student-dashboard").await,
            RouteDecision::Allowed
        );
    }
}
