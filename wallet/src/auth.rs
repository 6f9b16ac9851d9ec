// Identity handling: the provider handshake is external, the session
// state is ours.

use anyhow::Result;
use async_trait::async_trait;
use gallery_common::account::{Account, Principal};
use log::{debug, trace};
use tokio::sync::RwLock;

/// Identity collaborator.
///
/// `login` suspends until the provider redirect completes or the user
/// cancels; session persistence (if any) is the provider's concern.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Run the provider handshake and return the signed-in principal
    async fn login(&self) -> Result<Principal>;

    async fn logout(&self) -> Result<()>;

    /// Identity currently held by the provider, if any
    fn current_identity(&self) -> Option<Principal>;
}

/// In-memory session state for the gallery.
///
/// An explicit context object: it is handed by reference into the store
/// and the mutation operations rather than looked up ambiently. The
/// owning wallet clears and refetches all token state whenever the
/// identity changes, since ledger visibility may differ per identity.
pub struct Session {
    identity: RwLock<Option<Principal>>,
    administrator: Principal,
}

impl Session {
    pub fn new(administrator: Principal) -> Self {
        Self {
            identity: RwLock::new(None),
            administrator,
        }
    }

    pub async fn identity(&self) -> Option<Principal> {
        self.identity.read().await.clone()
    }

    /// The signed-in identity as a ledger account (default subaccount)
    pub async fn account(&self) -> Option<Account> {
        self.identity
            .read()
            .await
            .clone()
            .map(Account::from_owner)
    }

    pub async fn is_authenticated(&self) -> bool {
        self.identity.read().await.is_some()
    }

    /// Whether the signed-in identity is the configured administrator
    pub async fn is_administrator(&self) -> bool {
        self.identity
            .read()
            .await
            .as_ref()
            .map(|identity| *identity == self.administrator)
            .unwrap_or(false)
    }

    pub fn administrator(&self) -> &Principal {
        &self.administrator
    }

    /// Replace the session identity. Returns true if it changed.
    pub async fn set_identity(&self, identity: Option<Principal>) -> bool {
        let mut guard = self.identity.write().await;
        if *guard == identity {
            trace!("identity unchanged");
            return false;
        }

        match &identity {
            Some(principal) => debug!("identity changed to {}", principal),
            None => debug!("identity cleared"),
        }
        *guard = identity;
        true
    }
}
