// In-memory view of the collection, reconciled against ledger truth.
//
// The store is the only mutable shared state in the client. Every write
// is a wholesale replacement performed by the completion of a fetch;
// nothing patches records in place.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use gallery_common::{
    account::Account,
    error::{GalleryError, GalleryResult},
    metadata::{normalize_metadata, TokenRecord},
};
use log::{debug, trace};
use tokio::sync::RwLock;

use crate::ledger_api::LedgerApi;

#[derive(Default)]
struct Collections {
    all: Vec<TokenRecord>,
    mine: Vec<TokenRecord>,
    // ticket of the fetch that last replaced each collection
    all_applied: u64,
    mine_applied: u64,
}

/// Holds the collection's token set and the signed-in user's subset.
///
/// Fetches are idempotent and safe to run concurrently: each one draws a
/// monotonically increasing ticket when it starts, and a completion only
/// replaces a collection if no newer fetch (or invalidation) has applied
/// since. Last to complete wins; stale in-flight results are discarded.
/// Nothing is cancelled.
pub struct TokenStore<L: LedgerApi> {
    ledger: Arc<L>,
    inner: RwLock<Collections>,
    ticket: AtomicU64,
}

impl<L: LedgerApi> TokenStore<L> {
    pub fn new(ledger: Arc<L>) -> Self {
        Self {
            ledger,
            inner: RwLock::new(Collections::default()),
            ticket: AtomicU64::new(0),
        }
    }

    fn next_ticket(&self) -> u64 {
        self.ticket.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Refetch the whole collection and replace the "all tokens" set.
    ///
    /// Enumerates identifiers, then requests metadata and owners
    /// concurrently and joins before touching the store. Results are
    /// positionally aligned with the identifier sequence. Any gap in the
    /// owner sequence fails the whole refresh; the store is never
    /// partially replaced.
    pub async fn fetch_all(&self) -> GalleryResult<Vec<TokenRecord>> {
        let ticket = self.next_ticket();
        trace!("fetch_all (ticket {})", ticket);

        let ids = self.ledger.tokens(None, None).await?;
        let (entries, owners) = futures::try_join!(
            self.ledger.token_metadata(&ids),
            self.ledger.owner_of(&ids)
        )?;

        let mut records = Vec::with_capacity(ids.len());
        for (index, id) in ids.iter().copied().enumerate() {
            let owner = owners
                .get(index)
                .cloned()
                .flatten()
                .ok_or(GalleryError::NotFound(id))?;
            let metadata = entries
                .get(index)
                .cloned()
                .flatten()
                .map(normalize_metadata);
            records.push(TokenRecord {
                id,
                metadata,
                owner,
            });
        }

        let mut inner = self.inner.write().await;
        if ticket > inner.all_applied {
            inner.all_applied = ticket;
            inner.all = records.clone();
            debug!("store now holds {} token(s)", records.len());
        } else {
            debug!(
                "discarding stale fetch_all (ticket {} <= {})",
                ticket, inner.all_applied
            );
        }

        Ok(records)
    }

    /// Refetch the tokens held by `account` and replace the "my tokens"
    /// set. The owner is known, so only metadata is requested. An empty
    /// identifier sequence is a valid result and replaces the set with
    /// nothing.
    pub async fn fetch_mine(&self, account: &Account) -> GalleryResult<Vec<TokenRecord>> {
        let ticket = self.next_ticket();
        trace!("fetch_mine for {} (ticket {})", account, ticket);

        let ids = self.ledger.tokens_of(account, None, None).await?;
        let entries = if ids.is_empty() {
            Vec::new()
        } else {
            self.ledger.token_metadata(&ids).await?
        };

        let mut records = Vec::with_capacity(ids.len());
        for (index, id) in ids.iter().copied().enumerate() {
            let metadata = entries
                .get(index)
                .cloned()
                .flatten()
                .map(normalize_metadata);
            records.push(TokenRecord {
                id,
                metadata,
                owner: account.clone(),
            });
        }

        let mut inner = self.inner.write().await;
        if ticket > inner.mine_applied {
            inner.mine_applied = ticket;
            inner.mine = records.clone();
        } else {
            debug!(
                "discarding stale fetch_mine (ticket {} <= {})",
                ticket, inner.mine_applied
            );
        }

        Ok(records)
    }

    /// Snapshot of the collection's tokens
    pub async fn all(&self) -> Vec<TokenRecord> {
        self.inner.read().await.all.clone()
    }

    /// Snapshot of the signed-in user's tokens
    pub async fn mine(&self) -> Vec<TokenRecord> {
        self.inner.read().await.mine.clone()
    }

    /// Last-known record for a token, if any fetch has seen it
    pub async fn token(&self, token_id: u64) -> Option<TokenRecord> {
        let inner = self.inner.read().await;
        inner
            .all
            .iter()
            .chain(inner.mine.iter())
            .find(|record| record.id == token_id)
            .cloned()
    }

    /// Drop both collections, fencing out any fetch still in flight.
    ///
    /// Called on identity change: results computed under the previous
    /// identity must not repopulate the store afterwards.
    pub async fn clear(&self) {
        let ticket = self.next_ticket();
        debug!("clearing token store (ticket {})", ticket);

        let mut inner = self.inner.write().await;
        inner.all.clear();
        inner.mine.clear();
        inner.all_applied = ticket;
        inner.mine_applied = ticket;
    }
}
