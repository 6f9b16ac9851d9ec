// Approval reconciliation for a token's detail view.
//
// Approval state is never patched locally: every mutation refetches the
// active list from the ledger.

use gallery_common::{api::TokenApproval, error::GalleryResult};
use log::trace;

use crate::{ledger_api::LedgerApi, wallet::GalleryWallet};

impl<L: LedgerApi> GalleryWallet<L> {
    /// Active approvals on a token.
    ///
    /// Only the token's owner may list them; the owner check runs
    /// against the current identity before any network call.
    pub async fn list_approvals(&self, token_id: u64) -> GalleryResult<Vec<TokenApproval>> {
        self.require_owner(token_id).await?;
        trace!("listing approvals for token {}", token_id);
        self.ledger().token_approvals(&[token_id], None, None).await.map_err(Into::into)
    }

    /// Revoke an approval (or all of them when `spender` is absent) and
    /// return the refreshed approval list.
    pub async fn revoke_approval(
        &self,
        token_id: u64,
        spender: Option<&str>,
    ) -> GalleryResult<Vec<TokenApproval>> {
        self.revoke(token_id, spender).await?;
        self.list_approvals(token_id).await
    }
}
