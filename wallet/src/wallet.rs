// The gallery client: session handling, collection metadata and the
// mutation operations against the ledger.
//
// Every mutation validates its input before any network call, submits a
// single-element request batch with all optional fields stated
// explicitly, surfaces ledger errors verbatim and reconciles by
// refetching. There is no optimistic local mutation: the ledger is the
// sole source of truth, so a partially applied mutation can never leave
// the store diverged.

use std::sync::Arc;

use chrono::Utc;
use gallery_common::{
    account::{Account, Principal},
    api::{
        ApprovalInfo, ApproveTokenRequest, BurnRequest, MintRequest, RevokeTokenRequest,
        TokenResult, TransferRequest,
    },
    error::{GalleryError, GalleryResult},
    metadata::{build_token_metadata, normalize_metadata, CollectionInfo, TokenRecord},
};
use log::{debug, trace, warn};
use tokio::sync::RwLock;

use crate::{
    auth::{IdentityProvider, Session},
    config::WalletConfig,
    ledger_api::LedgerApi,
    state::OperationState,
    store::TokenStore,
};

/// Client for one NFT collection on a remote ledger.
///
/// Owns the session, the token store and the cached collection
/// metadata; the ledger and identity collaborators are injected.
pub struct GalleryWallet<L: LedgerApi> {
    ledger: Arc<L>,
    session: Session,
    store: TokenStore<L>,
    collection: RwLock<Option<CollectionInfo>>,
    operation: RwLock<OperationState>,
}

impl<L: LedgerApi> GalleryWallet<L> {
    pub fn new(ledger: Arc<L>, config: WalletConfig) -> Self {
        Self {
            store: TokenStore::new(Arc::clone(&ledger)),
            ledger,
            session: Session::new(config.administrator),
            collection: RwLock::new(None),
            operation: RwLock::new(OperationState::Idle),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub(crate) fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn store(&self) -> &TokenStore<L> {
        &self.store
    }

    /// Phase of the most recent mutation
    pub async fn operation_state(&self) -> OperationState {
        self.operation.read().await.clone()
    }

    // ========================================
    // Session lifecycle
    // ========================================

    /// Run the provider handshake and attach the returned identity
    pub async fn login(&self, provider: &dyn IdentityProvider) -> GalleryResult<()> {
        trace!("login");
        let principal = provider.login().await?;
        self.sign_in(principal).await
    }

    /// End the provider session and detach the identity
    pub async fn logout(&self, provider: &dyn IdentityProvider) -> GalleryResult<()> {
        trace!("logout");
        provider.logout().await?;
        self.sign_out().await
    }

    /// Attach an identity. A change invalidates and refetches all token
    /// state, since ledger visibility may differ per identity.
    pub async fn sign_in(&self, identity: Principal) -> GalleryResult<()> {
        if self.session.set_identity(Some(identity)).await {
            self.invalidate().await;
            self.refresh().await?;
        }
        Ok(())
    }

    /// Detach the identity and fall back to the anonymous view
    pub async fn sign_out(&self) -> GalleryResult<()> {
        if self.session.set_identity(None).await {
            self.invalidate().await;
            self.refresh().await?;
        }
        Ok(())
    }

    async fn invalidate(&self) {
        self.store.clear().await;
        *self.collection.write().await = None;
    }

    /// Reconcile the store with the ledger
    pub async fn refresh(&self) -> GalleryResult<()> {
        self.store.fetch_all().await?;
        if let Some(account) = self.session.account().await {
            self.store.fetch_mine(&account).await?;
        }
        Ok(())
    }

    // ========================================
    // Read side
    // ========================================

    /// Collection metadata, fetched once per identity and cached
    pub async fn collection_info(&self) -> GalleryResult<CollectionInfo> {
        if let Some(info) = self.collection.read().await.clone() {
            return Ok(info);
        }

        debug!("fetching collection metadata");
        let (name, symbol, description, logo, entries) = futures::try_join!(
            self.ledger.collection_name(),
            self.ledger.collection_symbol(),
            self.ledger.collection_description(),
            self.ledger.collection_logo(),
            self.ledger.collection_metadata(),
        )?;

        let info = CollectionInfo {
            name,
            symbol,
            description,
            logo,
            attributes: normalize_metadata(entries),
        };
        *self.collection.write().await = Some(info.clone());
        Ok(info)
    }

    pub async fn tokens(&self) -> Vec<TokenRecord> {
        self.store.all().await
    }

    pub async fn my_tokens(&self) -> Vec<TokenRecord> {
        self.store.mine().await
    }

    /// A single token, from the store or fetched directly.
    ///
    /// The ledger must report both metadata and owner for the
    /// identifier; anything less is [`GalleryError::NotFound`].
    pub async fn token_detail(&self, token_id: u64) -> GalleryResult<TokenRecord> {
        if let Some(record) = self.store.token(token_id).await {
            return Ok(record);
        }

        trace!("token {} not cached, fetching directly", token_id);
        let ids = [token_id];
        let (entries, owners) = futures::try_join!(
            self.ledger.token_metadata(&ids),
            self.ledger.owner_of(&ids)
        )?;

        let owner = owners
            .into_iter()
            .next()
            .flatten()
            .ok_or(GalleryError::NotFound(token_id))?;
        let metadata = entries
            .into_iter()
            .next()
            .flatten()
            .ok_or(GalleryError::NotFound(token_id))?;

        Ok(TokenRecord {
            id: token_id,
            metadata: Some(normalize_metadata(metadata)),
            owner,
        })
    }

    /// Whether the signed-in identity owns the token, per the
    /// last-known record
    pub async fn is_owner(&self, token_id: u64) -> bool {
        let account = match self.session.account().await {
            Some(account) => account,
            None => return false,
        };
        match self.store.token(token_id).await {
            Some(record) => record.owner.same_holder(&account),
            None => false,
        }
    }

    pub async fn is_administrator(&self) -> bool {
        self.session.is_administrator().await
    }

    // ========================================
    // Guards
    // ========================================

    /// Owner guard for mutations. This is a UI-level check against the
    /// last-known record; the ledger re-enforces ownership on its side.
    pub(crate) async fn require_owner(&self, token_id: u64) -> GalleryResult<Account> {
        let account = self
            .session
            .account()
            .await
            .ok_or(GalleryError::NotAuthenticated)?;
        let record = self
            .store
            .token(token_id)
            .await
            .ok_or(GalleryError::NotFound(token_id))?;

        if !record.owner.same_holder(&account) {
            return Err(GalleryError::NotOwner);
        }
        Ok(account)
    }

    pub(crate) async fn require_administrator(&self) -> GalleryResult<Principal> {
        let identity = self
            .session
            .identity()
            .await
            .ok_or(GalleryError::NotAuthenticated)?;
        if identity != *self.session.administrator() {
            return Err(GalleryError::NotAdministrator);
        }
        Ok(identity)
    }

    // ========================================
    // Mutations
    // ========================================

    /// Transfer a token to another account
    pub async fn transfer(&self, token_id: u64, recipient: &str) -> GalleryResult<()> {
        self.begin().await;
        let result = self.transfer_inner(token_id, recipient).await;
        self.finish(result).await
    }

    async fn transfer_inner(&self, token_id: u64, recipient: &str) -> GalleryResult<()> {
        trace!("transfer token {} to {}", token_id, recipient);
        let to = Account::from_owner(Principal::from_text(recipient)?);
        self.require_owner(token_id).await?;

        let batch = self
            .ledger
            .transfer(TransferRequest {
                token_id,
                from_subaccount: None,
                to,
                memo: None,
                created_at_time: None,
            })
            .await?;
        Self::first_outcome(batch)?;

        self.refresh().await
    }

    /// Grant a spender the right to transfer the token.
    ///
    /// `expires_at` is a nanosecond timestamp and must be in the future.
    pub async fn approve(
        &self,
        token_id: u64,
        spender: &str,
        expires_at: Option<u64>,
    ) -> GalleryResult<()> {
        self.begin().await;
        let result = self.approve_inner(token_id, spender, expires_at).await;
        self.finish(result).await
    }

    async fn approve_inner(
        &self,
        token_id: u64,
        spender: &str,
        expires_at: Option<u64>,
    ) -> GalleryResult<()> {
        trace!("approve {} on token {}", spender, token_id);
        let spender = Account::from_owner(Principal::from_text(spender)?);
        if let Some(expiry) = expires_at {
            let now = Utc::now().timestamp_nanos_opt().unwrap_or(i64::MAX) as u64;
            if expiry <= now {
                return Err(GalleryError::InvalidExpiry);
            }
        }
        self.require_owner(token_id).await?;

        let batch = self
            .ledger
            .approve_token(ApproveTokenRequest {
                token_id,
                approval_info: ApprovalInfo {
                    from_subaccount: None,
                    spender,
                    memo: None,
                    expires_at,
                    created_at_time: None,
                },
            })
            .await?;
        Self::first_outcome(batch)?;

        self.refresh().await
    }

    /// Revoke an approval. Omitting the spender revokes every approval
    /// on the token.
    pub async fn revoke(&self, token_id: u64, spender: Option<&str>) -> GalleryResult<()> {
        self.begin().await;
        let result = self.revoke_inner(token_id, spender).await;
        self.finish(result).await
    }

    async fn revoke_inner(&self, token_id: u64, spender: Option<&str>) -> GalleryResult<()> {
        trace!("revoke approvals on token {}", token_id);
        let spender = match spender {
            Some(text) => Some(Account::from_owner(Principal::from_text(text)?)),
            None => None,
        };
        self.require_owner(token_id).await?;

        let batch = self
            .ledger
            .revoke_token_approvals(RevokeTokenRequest {
                token_id,
                from_subaccount: None,
                spender,
                memo: None,
                created_at_time: None,
            })
            .await?;
        Self::first_outcome(batch)?;

        self.refresh().await
    }

    /// Mint a new token (administrator only).
    ///
    /// The identifier submitted is the ledger's total supply at the time
    /// of the call; there is no reservation step, so two concurrent
    /// mints can compute the same identifier and the ledger decides the
    /// outcome of the second one. Omitting the recipient mints to the
    /// collection's own custodial account. Returns the identifier that
    /// was submitted.
    pub async fn mint(
        &self,
        recipient: Option<&str>,
        name: &str,
        description: &str,
        image_url: &str,
    ) -> GalleryResult<u64> {
        self.begin().await;
        let result = self.mint_inner(recipient, name, description, image_url).await;
        self.finish(result).await
    }

    async fn mint_inner(
        &self,
        recipient: Option<&str>,
        name: &str,
        description: &str,
        image_url: &str,
    ) -> GalleryResult<u64> {
        trace!("mint '{}'", name);
        self.require_administrator().await?;

        if name.is_empty() {
            return Err(GalleryError::MissingField("name"));
        }
        if description.is_empty() {
            return Err(GalleryError::MissingField("description"));
        }
        if image_url.is_empty() {
            return Err(GalleryError::MissingField("image_url"));
        }
        let owner = match recipient {
            Some(text) => Some(Account::from_owner(Principal::from_text(text)?)),
            None => None,
        };

        let token_id = self.ledger.total_supply().await?;
        debug!("minting token {} ('{}')", token_id, name);

        let batch = self
            .ledger
            .mint(MintRequest {
                token_id,
                owner,
                metadata: build_token_metadata(name, description, image_url),
                memo: None,
                overwrite: true,
                created_at_time: None,
            })
            .await?;
        Self::first_outcome(batch)?;

        self.store.fetch_all().await?;
        Ok(token_id)
    }

    /// Burn a token (administrator only)
    pub async fn burn(&self, token_id: u64) -> GalleryResult<()> {
        self.begin().await;
        let result = self.burn_inner(token_id).await;
        self.finish(result).await
    }

    async fn burn_inner(&self, token_id: u64) -> GalleryResult<()> {
        trace!("burn token {}", token_id);
        self.require_administrator().await?;

        let response = self
            .ledger
            .burn(BurnRequest {
                token_ids: vec![token_id],
                from_subaccount: None,
                memo: None,
                created_at_time: None,
            })
            .await?;

        if !response.failed_tokens.is_empty() {
            warn!(
                "burn reported {} failed token(s)",
                response.failed_tokens.len()
            );
            return Err(GalleryError::BurnFailed(response.failed_tokens));
        }

        self.store.fetch_all().await?;
        Ok(())
    }

    // ========================================
    // Plumbing
    // ========================================

    async fn begin(&self) {
        *self.operation.write().await = OperationState::InFlight;
    }

    async fn finish<T>(&self, result: GalleryResult<T>) -> GalleryResult<T> {
        let mut operation = self.operation.write().await;
        match &result {
            Ok(_) => *operation = OperationState::Succeeded,
            Err(error) => *operation = OperationState::Failed(error.to_string()),
        }
        result
    }

    /// Interpret the first element of a mutation result batch.
    ///
    /// An absent element means the ledger accepted the request without
    /// reporting an index; only an explicit err variant is a failure.
    fn first_outcome<E>(batch: Vec<Option<TokenResult<E>>>) -> GalleryResult<Option<u64>>
    where
        GalleryError: From<E>,
    {
        match batch.into_iter().next().flatten() {
            Some(TokenResult::Ok(index)) => Ok(Some(index)),
            Some(TokenResult::Err(error)) => Err(error.into()),
            None => Ok(None),
        }
    }
}
