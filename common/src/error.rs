use thiserror::Error;

use crate::api::{ApproveError, FailedBurn, MintError, RevokeError, TransferError};

pub type GalleryResult<T> = Result<T, GalleryError>;

/// Errors surfaced by the gallery client.
///
/// Validation failures resolve locally before any network call. Ledger
/// errors are surfaced verbatim with no retry: mutations are not safe to
/// resubmit blindly, so every failure requires explicit re-initiation.
#[derive(Debug, Error)]
pub enum GalleryError {
    /// A wire value carried zero or more than one tag
    #[error("malformed ledger value")]
    MalformedValue,

    /// User-supplied text did not parse as a principal
    #[error("invalid principal identifier: {0}")]
    InvalidIdentifier(String),

    /// An approval expiry was not in the future
    #[error("expiry timestamp is not in the future")]
    InvalidExpiry,

    /// A required form field was left empty
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("no identity is signed in")]
    NotAuthenticated,

    #[error("signed-in identity does not own this token")]
    NotOwner,

    #[error("signed-in identity is not the administrator")]
    NotAdministrator,

    /// The ledger knows no metadata or owner for the token
    #[error("token {0} not found")]
    NotFound(u64),

    #[error("transfer rejected: {0}")]
    Transfer(#[from] TransferError),

    #[error("approval rejected: {0}")]
    Approve(#[from] ApproveError),

    #[error("revocation rejected: {0}")]
    Revoke(#[from] RevokeError),

    #[error("mint rejected: {0}")]
    Mint(#[from] MintError),

    /// The ledger reported per-token burn failures
    #[error("burn failed for {} token(s)", .0.len())]
    BurnFailed(Vec<FailedBurn>),

    #[error(transparent)]
    Any(#[from] anyhow::Error),
}

impl GalleryError {
    /// Whether the error was resolved locally, before any network call
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            GalleryError::MalformedValue
                | GalleryError::InvalidIdentifier(_)
                | GalleryError::InvalidExpiry
                | GalleryError::MissingField(_)
                | GalleryError::NotAuthenticated
                | GalleryError::NotOwner
                | GalleryError::NotAdministrator
        )
    }
}
