//! In-memory identity provider.
//!
//! Backs development and tests the same way a hosted provider would:
//! accounts keyed by email, a single current identity, and a watch channel
//! carrying identity changes. Failure modes (provider offline, sign-out that
//! never returns) can be toggled to exercise the session's error paths.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;
use tokio::sync::watch;
use uuid::Uuid;

use super::{AuthGateway, Identity, Provider};
use crate::error::{Error, Result};

struct Account {
    password: String,
    identity: Identity,
}

/// In-memory [`AuthGateway`] implementation
pub struct MemoryGateway {
    accounts: RwLock<HashMap<String, Account>>,
    /// Preset federated account, if any ("the Google popup's outcome")
    provider_account: RwLock<Option<Identity>>,
    current_tx: watch::Sender<Option<Identity>>,
    offline: AtomicBool,
    hang_sign_out: AtomicBool,
}

impl MemoryGateway {
    /// Create a gateway with no accounts and nobody signed in
    pub fn new() -> Self {
        let (current_tx, _) = watch::channel(None);
        Self {
            accounts: RwLock::new(HashMap::new()),
            provider_account: RwLock::new(None),
            current_tx,
            offline: AtomicBool::new(false),
            hang_sign_out: AtomicBool::new(false),
        }
    }

    /// Preset the identity a federated sign-in will produce
    pub fn set_provider_account(&self, email: &str, display_name: &str) {
        *self.provider_account.write() = Some(Identity {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            display_name: Some(display_name.to_string()),
            provider: Provider::Google,
        });
    }

    /// Simulate the provider being unreachable
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Make `sign_out` never complete (exercises the caller's timeout)
    pub fn set_hang_sign_out(&self, hang: bool) {
        self.hang_sign_out.store(hang, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(Error::ProviderUnreachable("provider offline".into()));
        }
        Ok(())
    }
}

impl Default for MemoryGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl AuthGateway for MemoryGateway {
    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity> {
        self.check_online()?;

        let mut accounts = self.accounts.write();
        if accounts.contains_key(email) {
            return Err(Error::EmailInUse(email.to_string()));
        }

        let identity = Identity {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            display_name: None,
            provider: Provider::Password,
        };
        accounts.insert(
            email.to_string(),
            Account {
                password: password.to_string(),
                identity: identity.clone(),
            },
        );
        drop(accounts);

        tracing::info!("Created account for {}", email);
        self.current_tx.send_replace(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity> {
        self.check_online()?;

        let accounts = self.accounts.read();
        let account = accounts.get(email).ok_or(Error::InvalidCredentials)?;
        if account.password != password {
            return Err(Error::InvalidCredentials);
        }
        let identity = account.identity.clone();
        drop(accounts);

        self.current_tx.send_replace(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_in_with_provider(&self, provider: Provider) -> Result<Identity> {
        self.check_online()?;

        if provider != Provider::Google {
            return Err(Error::ProviderUnreachable(format!(
                "unsupported provider: {}",
                provider.as_str()
            )));
        }

        let identity = self
            .provider_account
            .read()
            .clone()
            .ok_or(Error::PopupClosed)?;

        self.current_tx.send_replace(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<()> {
        if self.hang_sign_out.load(Ordering::SeqCst) {
            // Never resolves; the session's timeout is the only way out.
            futures::future::pending::<()>().await;
        }
        self.check_online()?;

        self.current_tx.send_replace(None);
        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.current_tx.subscribe()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sign_up_then_sign_in() {
        let gateway = MemoryGateway::new();

        let created = gateway.sign_up("alice@example.com", "hunter2").await.unwrap();
        assert_eq!(created.provider, Provider::Password);

        let signed_in = gateway.sign_in("alice@example.com", "hunter2").await.unwrap();
        assert_eq!(signed_in.id, created.id);
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let gateway = MemoryGateway::new();

        gateway.sign_up("alice@example.com", "hunter2").await.unwrap();
        let err = gateway.sign_up("alice@example.com", "other").await.unwrap_err();
        assert_eq!(err, Error::EmailInUse("alice@example.com".into()));
    }

    #[tokio::test]
    async fn test_bad_password_rejected() {
        let gateway = MemoryGateway::new();

        gateway.sign_up("alice@example.com", "hunter2").await.unwrap();
        let err = gateway.sign_in("alice@example.com", "wrong").await.unwrap_err();
        assert_eq!(err, Error::InvalidCredentials);
    }

    #[tokio::test]
    async fn test_subscription_sees_changes() {
        let gateway = MemoryGateway::new();
        let rx = gateway.subscribe();
        assert!(rx.borrow().is_none());

        gateway.sign_up("alice@example.com", "hunter2").await.unwrap();
        assert!(rx.borrow().is_some());

        gateway.sign_out().await.unwrap();
        assert!(rx.borrow().is_none());
    }

    #[tokio::test]
    async fn test_offline_surfaces_error() {
        let gateway = MemoryGateway::new();
        gateway.set_offline(true);

        let err = gateway.sign_in("a@b.c", "x").await.unwrap_err();
        assert!(matches!(err, Error::ProviderUnreachable(_)));
    }

    #[tokio::test]
    async fn test_provider_sign_in_requires_account() {
        let gateway = MemoryGateway::new();

        let err = gateway.sign_in_with_provider(Provider::Google).await.unwrap_err();
        assert_eq!(err, Error::PopupClosed);

        gateway.set_provider_account("carol@example.com", "Carol");
        let identity = gateway.sign_in_with_provider(Provider::Google).await.unwrap();
        assert_eq!(identity.provider, Provider::Google);
        assert_eq!(identity.display_name.as_deref(), Some("Carol"));
    }
}
