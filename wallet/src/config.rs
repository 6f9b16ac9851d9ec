use gallery_common::account::Principal;
use serde::{Deserialize, Serialize};

/// Static wallet configuration, injected at construction.
///
/// The administrator handle gates the mint/burn extension; it is part of
/// the deployment, not of any signed-in session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Principal allowed to mint and burn
    pub administrator: Principal,
}

impl WalletConfig {
    pub fn new(administrator: Principal) -> Self {
        Self { administrator }
    }
}
