//! # Session Module
//!
//! The single authoritative session value and the service that keeps it
//! consistent with the identity provider and the profile store.
//!
//! ## Session Lifecycle
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        SESSION LIFECYCLE                                │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  1. Start                                                               │
//! │     ┌──────────────┐                                                    │
//! │     │ loading=true │  role seeded from durable prefs                    │
//! │     │ identity=None│                                                    │
//! │     └──────┬───────┘                                                    │
//! │            │  first identity-change event                               │
//! │            ▼                                                            │
//! │  2. Resolve                                                             │
//! │     ┌──────────────┐   signed in: read users/{id} to recover the role   │
//! │     │ loading=false│   record present → adopt role, persist to prefs    │
//! │     │              │   record absent  → keep the prefs role             │
//! │     │              │   read failed    → role unchanged, still resolves  │
//! │     └──────┬───────┘                                                    │
//! │            │                                                            │
//! │            ▼                                                            │
//! │  3. Active                                                              │
//! │     choose_role / complete_signup / submit_profile / sign_in /          │
//! │     sign_in_with_provider / sign_out                                    │
//! │                                                                         │
//! │  Sign-out: local role and prefs are cleared FIRST, then the provider    │
//! │  call runs under a 10s timeout. On timeout the local clear stands (no   │
//! │  rollback) and the caller performs exactly one hard redirect to /auth.  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The subscription handler owns the identity and role-recovery updates;
//! `choose_role` and `complete_signup` additionally publish the chosen role
//! so the UI reflects it before the next identity event. The handler treats
//! an existing user record as authoritative and otherwise preserves whatever
//! role is already published, so the two writers never fight. Everything
//! else (route guard, match feed, UI shells) reads through the watch
//! channel.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::auth::{AuthGateway, Identity, Provider};
use crate::error::{Error, Result};
use crate::profile::{ProfileRecord, Role, UserRecord};
use crate::store::{paths, PrefsStore, ProfileStore};

/// How long a sign-out may take before it is treated as failed
pub const SIGN_OUT_TIMEOUT: Duration = Duration::from_secs(10);

/// The derived view of "who is signed in, in what role, fully onboarded?"
#[derive(Debug, Clone)]
pub struct Session {
    /// The signed-in identity, if any
    pub identity: Option<Identity>,
    /// The user's role, from the user record or durable prefs
    pub role: Option<Role>,
    /// Last observed onboarding state; `None` until a guard check ran.
    ///
    /// Advisory only — the route guard re-checks the store on every
    /// dashboard navigation rather than trusting this value.
    pub onboarding_complete: Option<bool>,
    /// True from process start until the first identity-change event
    /// resolves (including the role lookup when an identity is present)
    pub loading: bool,
}

/// Maintains the [`Session`] and keeps it consistent with the identity
/// provider and the profile store
pub struct SessionService {
    gateway: Arc<dyn AuthGateway>,
    store: Arc<dyn ProfileStore>,
    prefs: Arc<PrefsStore>,
    session_tx: watch::Sender<Session>,
    /// Set when a sign-out finished (or timed out); consumed by the caller
    /// performing the one hard redirect to the auth view.
    signout_redirect_pending: AtomicBool,
}

impl SessionService {
    /// Create the service
    ///
    /// The session starts with `loading = true` and the role seeded from
    /// durable prefs. Call [`spawn_listener`](Self::spawn_listener) to start
    /// processing identity changes.
    pub fn new(
        gateway: Arc<dyn AuthGateway>,
        store: Arc<dyn ProfileStore>,
        prefs: Arc<PrefsStore>,
    ) -> Arc<Self> {
        let initial = Session {
            identity: None,
            role: prefs.role(),
            onboarding_complete: None,
            loading: true,
        };
        let (session_tx, _) = watch::channel(initial);

        Arc::new(Self {
            gateway,
            store,
            prefs,
            session_tx,
            signout_redirect_pending: AtomicBool::new(false),
        })
    }

    /// Start the identity-change listener
    ///
    /// Subscribes once to the gateway and serializes every session
    /// transition through this single task.
    pub fn spawn_listener(self: &Arc<Self>) -> JoinHandle<()> {
        let service = Arc::clone(self);
        let mut identity_rx = service.gateway.subscribe();
        tokio::spawn(async move {
            loop {
                let identity = identity_rx.borrow_and_update().clone();
                service.apply_identity_change(identity).await;
                if identity_rx.changed().await.is_err() {
                    break;
                }
            }
        })
    }

    /// Subscribe to session changes
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.session_tx.subscribe()
    }

    /// The current session value
    pub fn current(&self) -> Session {
        self.session_tx.borrow().clone()
    }

    // ========================================================================
    // IDENTITY-CHANGE HANDLING (the single session writer)
    // ========================================================================

    async fn apply_identity_change(&self, identity: Option<Identity>) {
        match identity {
            Some(identity) => {
                // Recover the chosen role from the role-independent record.
                // Only an existing record is authoritative; when it is
                // missing or unreadable the role is filled in at send time
                // below, so a signup or role choice that lands while the
                // read is in flight is never clobbered.
                let record_role = match self.store.read(&paths::user(&identity.id)).await {
                    Ok(Some(value)) => match serde_json::from_value::<UserRecord>(value) {
                        Ok(record) => {
                            self.prefs.set_role(record.user_type);
                            Some(record.user_type)
                        }
                        Err(e) => {
                            tracing::warn!("Malformed user record for {}: {}", identity.id, e);
                            None
                        }
                    },
                    Ok(None) => None,
                    Err(e) => {
                        // Loading still resolves rather than hanging the
                        // shell; role falls back to prefs below.
                        tracing::warn!("Role lookup failed for {}: {}", identity.id, e);
                        None
                    }
                };

                tracing::info!("Identity changed: {} ({:?})", identity.email, record_role);
                self.session_tx.send_modify(|s| {
                    s.identity = Some(identity);
                    s.role = record_role.or(s.role).or_else(|| self.prefs.role());
                    s.onboarding_complete = None;
                    s.loading = false;
                });
            }
            None => {
                self.prefs.clear_role();
                self.session_tx.send_modify(|s| {
                    s.identity = None;
                    s.role = None;
                    s.onboarding_complete = None;
                    s.loading = false;
                });
            }
        }
    }

    /// Record the outcome of an onboarding-completeness check
    ///
    /// Discards the result if the signed-in identity changed since the check
    /// was issued, so a slow response never lands on the wrong user.
    pub fn note_onboarding(&self, checked_identity_id: &str, complete: bool) -> bool {
        let fresh = self
            .session_tx
            .borrow()
            .identity
            .as_ref()
            .is_some_and(|i| i.id == checked_identity_id);
        if fresh {
            self.session_tx
                .send_modify(|s| s.onboarding_complete = Some(complete));
        } else {
            tracing::debug!("Discarding stale onboarding check for {}", checked_identity_id);
        }
        fresh
    }

    // ========================================================================
    // OPERATIONS
    // ========================================================================

    /// Choose a role before authenticating
    ///
    /// Written to durable prefs immediately so it survives a reload;
    /// idempotent, needs no identity, and never contacts the store. The role
    /// stored inside the user record re-asserts itself on the next identity
    /// change.
    pub fn choose_role(&self, role: Role) {
        self.prefs.set_role(role);
        self.session_tx.send_modify(|s| s.role = Some(role));
    }

    /// Create an account and write the combined user record
    ///
    /// Either both the identity and the `users/{id}` record exist afterwards,
    /// or the caller sees an error. The record write is not retried: a
    /// failure here leaves an identity without a record, which the route
    /// guard resolves by routing that user back to role selection.
    pub async fn complete_signup(
        &self,
        email: &str,
        password: &str,
        role: Role,
        name: &str,
    ) -> Result<Identity> {
        let identity = self.gateway.sign_up(email, password).await?;

        let record = UserRecord {
            name: name.to_string(),
            email: email.to_string(),
            user_type: role,
            created_at: crate::time::now_rfc3339(),
            auth_provider: Provider::Password,
        };
        self.store
            .write(&paths::user(&identity.id), serde_json::to_value(&record)?)
            .await
            .map_err(|e| Error::ProfileWrite(e.to_string()))?;

        self.prefs.set_role(role);
        self.session_tx.send_modify(|s| s.role = Some(role));

        tracing::info!("Signup complete for {} as {}", email, role.as_str());
        Ok(identity)
    }

    /// Submit the role-specific onboarding profile
    ///
    /// Validates at the boundary, then fully replaces the record at
    /// `{role}/{id}`. Presence of that record is what flips the route
    /// guard's onboarding check.
    pub async fn submit_profile(&self, profile: ProfileRecord) -> Result<()> {
        profile.validate()?;

        let identity = self.current().identity.ok_or(Error::NoIdentity)?;
        let role = profile.role();

        let mut value = serde_json::to_value(&profile)?;
        if let Some(map) = value.as_object_mut() {
            map.insert("userId".into(), identity.id.clone().into());
            map.insert("createdAt".into(), crate::time::now_rfc3339().into());
        }

        self.store
            .write(&paths::profile(role, &identity.id), value)
            .await
            .map_err(|e| Error::ProfileWrite(e.to_string()))?;

        self.session_tx
            .send_modify(|s| s.onboarding_complete = Some(true));

        tracing::info!("Profile submitted at {}", paths::profile(role, &identity.id));
        Ok(())
    }

    /// Sign in with email/password
    ///
    /// The session updates through the identity-change subscription, not
    /// here.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<()> {
        self.gateway.sign_in(email, password).await?;
        Ok(())
    }

    /// Sign in through a federated provider
    ///
    /// First federated sign-in writes a fresh user record with the locally
    /// chosen role; later sign-ins adopt the role already in the record.
    pub async fn sign_in_with_provider(&self, provider: Provider, role: Role) -> Result<()> {
        let identity = self.gateway.sign_in_with_provider(provider).await?;

        match self.store.read(&paths::user(&identity.id)).await {
            Ok(Some(_)) => {
                // Record exists; the subscription path adopts its role.
            }
            Ok(None) => {
                let record = UserRecord {
                    name: identity.display_name.clone().unwrap_or_default(),
                    email: identity.email.clone(),
                    user_type: role,
                    created_at: crate::time::now_rfc3339(),
                    auth_provider: Provider::Google,
                };
                self.store
                    .write(&paths::user(&identity.id), serde_json::to_value(&record)?)
                    .await
                    .map_err(|e| Error::ProfileWrite(e.to_string()))?;
                self.prefs.set_role(role);
            }
            Err(e) => {
                tracing::warn!("User record lookup failed after provider sign-in: {}", e);
            }
        }
        Ok(())
    }

    /// Sign out
    ///
    /// Local role state is cleared first so the UI reacts immediately; the
    /// provider call then runs under [`SIGN_OUT_TIMEOUT`]. A timeout returns
    /// [`Error::SignOutTimeout`] with the local clear left standing — a
    /// stuck sign-out must not leave the UI showing a signed-in shell.
    pub async fn sign_out(&self) -> Result<()> {
        self.prefs.clear_role();
        self.session_tx.send_modify(|s| {
            s.role = None;
            s.onboarding_complete = None;
        });

        let result = tokio::time::timeout(SIGN_OUT_TIMEOUT, self.gateway.sign_out()).await;
        self.signout_redirect_pending.store(true, Ordering::SeqCst);

        match result {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => {
                tracing::warn!("Sign-out failed: {}", e);
                Err(e)
            }
            Err(_) => {
                tracing::warn!("Sign-out timed out after {:?}", SIGN_OUT_TIMEOUT);
                Err(Error::SignOutTimeout)
            }
        }
    }

    /// Consume the pending post-sign-out redirect, if any
    ///
    /// Returns the auth path exactly once after a sign-out completes or
    /// times out, so the shell never issues duplicate redirects.
    pub fn take_signout_redirect(&self) -> Option<&'static str> {
        if self.signout_redirect_pending.swap(false, Ordering::SeqCst) {
            Some("/auth")
        } else {
            None
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
