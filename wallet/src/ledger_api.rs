// Typed interface to the remote ledger.
//
// Mirrors the ledger's actor methods one to one. The implementor owns
// the transport: request signing, encoding and delivery all happen
// behind this trait, and the ledger remains the sole authority on
// ownership and authorization.

use anyhow::Result;
use async_trait::async_trait;
use gallery_common::{
    account::Account,
    api::{
        ApproveError, ApproveTokenRequest, BurnRequest, BurnResponse, MetadataEntries,
        MintError, MintRequest, RevokeError, RevokeTokenRequest, TokenApproval, TokenResult,
        TransferError, TransferRequest,
    },
};

/// Ledger collaborator consumed by the gallery client.
///
/// Query batches are positionally aligned: the result sequence has the
/// same length and order as the requested identifier sequence, with
/// `None` marking an identifier the ledger knows nothing about.
/// Mutations take single-element request batches and return
/// single-element result batches per the ledger's convention.
#[async_trait]
pub trait LedgerApi: Send + Sync {
    // ========================================
    // Token queries
    // ========================================

    /// Enumerate token identifiers, optionally resuming after `prev`
    async fn tokens(&self, prev: Option<u64>, take: Option<usize>) -> Result<Vec<u64>>;

    /// Metadata entries per requested identifier, positionally aligned
    async fn token_metadata(&self, token_ids: &[u64]) -> Result<Vec<Option<MetadataEntries>>>;

    /// Owner per requested identifier, positionally aligned
    async fn owner_of(&self, token_ids: &[u64]) -> Result<Vec<Option<Account>>>;

    /// Token identifiers held by an account
    async fn tokens_of(
        &self,
        account: &Account,
        prev: Option<u64>,
        take: Option<usize>,
    ) -> Result<Vec<u64>>;

    async fn total_supply(&self) -> Result<u64>;

    // ========================================
    // Collection queries
    // ========================================

    async fn collection_name(&self) -> Result<String>;

    async fn collection_symbol(&self) -> Result<String>;

    async fn collection_description(&self) -> Result<Option<String>>;

    async fn collection_logo(&self) -> Result<Option<String>>;

    async fn collection_metadata(&self) -> Result<MetadataEntries>;

    // ========================================
    // Approvals
    // ========================================

    /// Active approvals for the given tokens
    async fn token_approvals(
        &self,
        token_ids: &[u64],
        prev: Option<u64>,
        take: Option<usize>,
    ) -> Result<Vec<TokenApproval>>;

    // ========================================
    // Mutations (single-element batches)
    // ========================================

    async fn transfer(
        &self,
        request: TransferRequest,
    ) -> Result<Vec<Option<TokenResult<TransferError>>>>;

    async fn approve_token(
        &self,
        request: ApproveTokenRequest,
    ) -> Result<Vec<Option<TokenResult<ApproveError>>>>;

    async fn revoke_token_approvals(
        &self,
        request: RevokeTokenRequest,
    ) -> Result<Vec<Option<TokenResult<RevokeError>>>>;

    async fn mint(&self, request: MintRequest) -> Result<Vec<Option<TokenResult<MintError>>>>;

    async fn burn(&self, request: BurnRequest) -> Result<BurnResponse>;
}
