// Accounts as the ledger addresses them: a principal plus an optional
// subaccount discriminator.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    config::{MAX_PRINCIPAL_TEXT_LENGTH, PRINCIPAL_GROUP_LENGTH},
    error::{GalleryError, GalleryResult},
};

/// An opaque identity handle in its textual form.
///
/// Principals identify both the signed-in user and transfer/approval
/// counterparties. The gallery only checks the textual shape; checksum
/// verification belongs to the signing transport.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(String);

impl Principal {
    /// Parse a principal from user-supplied text.
    ///
    /// Expected shape: lowercase letters and digits in dash-separated
    /// groups of five, with a trailing group of one to five.
    pub fn from_text(text: &str) -> GalleryResult<Self> {
        let invalid = || GalleryError::InvalidIdentifier(text.to_string());

        if text.is_empty() || text.len() > MAX_PRINCIPAL_TEXT_LENGTH {
            return Err(invalid());
        }

        let groups: Vec<&str> = text.split('-').collect();
        for (index, group) in groups.iter().enumerate() {
            let last = index == groups.len() - 1;
            if group.is_empty() || group.len() > PRINCIPAL_GROUP_LENGTH {
                return Err(invalid());
            }
            if !last && group.len() != PRINCIPAL_GROUP_LENGTH {
                return Err(invalid());
            }
            if !group
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
            {
                return Err(invalid());
            }
        }

        Ok(Self(text.to_string()))
    }

    /// The anonymous principal used before any identity is attached
    pub fn anonymous() -> Self {
        Self("2vxsx-fae".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Principal {
    type Err = GalleryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_text(s)
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A ledger account: principal plus optional subaccount.
///
/// The ledger treats an absent subaccount, an empty one and an all-zero
/// one as the same default account. [`Account::same_holder`] is the
/// canonical equivalence check and must be used for every owner-gated
/// decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub owner: Principal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subaccount: Option<Vec<u8>>,
}

impl Account {
    pub fn new(owner: Principal, subaccount: Option<Vec<u8>>) -> Self {
        Self { owner, subaccount }
    }

    /// Account under the principal's default subaccount
    pub fn from_owner(owner: Principal) -> Self {
        Self {
            owner,
            subaccount: None,
        }
    }

    /// The subaccount with the default forms collapsed to `None`
    pub fn effective_subaccount(&self) -> Option<&[u8]> {
        match &self.subaccount {
            Some(bytes) if !bytes.is_empty() && bytes.iter().any(|b| *b != 0) => {
                Some(bytes.as_slice())
            }
            _ => None,
        }
    }

    /// Whether two accounts denote the same holder.
    ///
    /// True iff the owners match and the subaccounts match after
    /// collapsing absent/empty/all-zero to the default. Distinct
    /// non-empty subaccounts never match.
    pub fn same_holder(&self, other: &Account) -> bool {
        self.owner == other.owner && self.effective_subaccount() == other.effective_subaccount()
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.effective_subaccount() {
            Some(subaccount) => write!(f, "{}.{}", self.owner, hex::encode(subaccount)),
            None => write!(f, "{}", self.owner),
        }
    }
}
