// Typed counterparts of the ledger's call interface.
//
// Every optional wire field is an explicit Option so requests always
// state presence or absence. Mutations follow the ledger's batch-call
// convention: a request batch maps positionally onto a result batch of
// optional ok/err variants. The gallery only ever submits single-element
// batches.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{account::Account, value::WireValue};

/// Raw metadata entries for one token, as returned by the ledger
pub type MetadataEntries = Vec<(String, WireValue)>;

// ========================================
// Batch result convention
// ========================================

/// Per-element outcome of a mutation batch.
///
/// `Ok` carries the ledger-assigned transaction index. Tag casing
/// follows the ledger's wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TokenResult<E> {
    #[serde(rename = "ok")]
    Ok(u64),
    #[serde(rename = "err")]
    Err(E),
}

impl<E> TokenResult<E> {
    pub fn into_result(self) -> Result<u64, E> {
        match self {
            TokenResult::Ok(index) => Ok(index),
            TokenResult::Err(error) => Err(error),
        }
    }
}

// ========================================
// Transfer
// ========================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferRequest {
    pub token_id: u64,
    pub from_subaccount: Option<Vec<u8>>,
    pub to: Account,
    pub memo: Option<Vec<u8>>,
    pub created_at_time: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum TransferError {
    #[error("token does not exist")]
    NonExistingTokenId,

    #[error("invalid recipient account")]
    InvalidRecipient,

    #[error("caller is not authorized to transfer this token")]
    Unauthorized,

    #[error("request creation time is too far in the past")]
    TooOld,

    #[error("request created in the future (ledger time {ledger_time})")]
    CreatedInFuture { ledger_time: u64 },

    #[error("duplicate of transaction {duplicate_of}")]
    Duplicate { duplicate_of: u64 },

    #[error("ledger error {error_code}: {message}")]
    GenericError { error_code: u64, message: String },
}

// ========================================
// Approvals
// ========================================

/// Approval details shared by the approve request and the query result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovalInfo {
    pub from_subaccount: Option<Vec<u8>>,
    pub spender: Account,
    pub memo: Option<Vec<u8>>,
    pub expires_at: Option<u64>,
    pub created_at_time: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApproveTokenRequest {
    pub token_id: u64,
    pub approval_info: ApprovalInfo,
}

/// One active approval on a token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenApproval {
    pub token_id: u64,
    pub approval_info: ApprovalInfo,
}

#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum ApproveError {
    #[error("token does not exist")]
    NonExistingTokenId,

    #[error("invalid spender account")]
    InvalidSpender,

    #[error("caller is not authorized to approve this token")]
    Unauthorized,

    #[error("request creation time is too far in the past")]
    TooOld,

    #[error("request created in the future (ledger time {ledger_time})")]
    CreatedInFuture { ledger_time: u64 },

    #[error("ledger error {error_code}: {message}")]
    GenericError { error_code: u64, message: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevokeTokenRequest {
    pub token_id: u64,
    pub from_subaccount: Option<Vec<u8>>,
    /// `None` revokes every approval on the token
    pub spender: Option<Account>,
    pub memo: Option<Vec<u8>>,
    pub created_at_time: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum RevokeError {
    #[error("no matching approval exists")]
    ApprovalDoesNotExist,

    #[error("token does not exist")]
    NonExistingTokenId,

    #[error("caller is not authorized to revoke approvals on this token")]
    Unauthorized,

    #[error("request creation time is too far in the past")]
    TooOld,

    #[error("ledger error {error_code}: {message}")]
    GenericError { error_code: u64, message: String },
}

// ========================================
// Mint / burn extension
// ========================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MintRequest {
    pub token_id: u64,
    /// `None` mints to the collection's own custodial account
    pub owner: Option<Account>,
    pub metadata: WireValue,
    pub memo: Option<Vec<u8>>,
    /// Whether an existing token under the same identifier may be replaced
    #[serde(rename = "override")]
    pub overwrite: bool,
    pub created_at_time: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum MintError {
    #[error("supply cap reached")]
    SupplyCapReached,

    #[error("token identifier already exists")]
    TokenIdAlreadyExists,

    #[error("caller is not authorized to mint")]
    Unauthorized,

    #[error("ledger error {error_code}: {message}")]
    GenericError { error_code: u64, message: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BurnRequest {
    pub token_ids: Vec<u64>,
    pub from_subaccount: Option<Vec<u8>>,
    pub memo: Option<Vec<u8>>,
    pub created_at_time: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum BurnError {
    #[error("token does not exist")]
    NonExistingTokenId,

    #[error("caller is not authorized to burn this token")]
    Unauthorized,

    #[error("ledger error {error_code}: {message}")]
    GenericError { error_code: u64, message: String },
}

/// A token the ledger refused to burn, with the reason
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedBurn {
    pub token_id: u64,
    pub error: BurnError,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BurnResponse {
    pub burned: Vec<u64>,
    pub failed_tokens: Vec<FailedBurn>,
}
