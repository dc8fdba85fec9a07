//! Accumulated transaction history for one address
//!
//! The store owns the only mutable shared state in the core: the append-only
//! sequence of fetched pages. It never re-orders what it holds; filtering and
//! sorting happen downstream on a snapshot.

use std::sync::Mutex;

use async_trait::async_trait;
use tracing::debug;

use crate::api::hiro::{ApiError, HiroClient, TransactionPage, DEFAULT_PAGE_LIMIT};
use crate::models::network::NetworkContext;
use crate::models::transaction::Transaction;
use crate::utils::errors::AppError;

/// Source of transaction pages; the ledger client in production, scripted
/// pages in tests
#[async_trait]
pub trait TransactionSource: Send + Sync {
    async fn fetch_page(
        &self,
        ctx: &NetworkContext,
        address: &str,
        offset: u64,
        limit: u64,
    ) -> Result<TransactionPage, ApiError>;
}

#[async_trait]
impl TransactionSource for HiroClient {
    async fn fetch_page(
        &self,
        ctx: &NetworkContext,
        address: &str,
        offset: u64,
        limit: u64,
    ) -> Result<TransactionPage, ApiError> {
        self.get_address_transactions(ctx, address, offset, limit).await
    }
}

struct StoreState {
    results: Vec<Transaction>,
    offset: u64,
    limit: u64,
    total: u64,
    fetched_once: bool,
}

/// Append-only accumulation of an address's transaction pages.
///
/// The next fetch offset is always `results.len()`, which assumes upstream
/// pages never overlap; if they ever did, the offset math would skip or
/// repeat records. Duplicate ids are therefore tolerated here and removed on
/// render (`dedup_by_id`), never on merge.
pub struct TransactionStore {
    ctx: NetworkContext,
    address: String,
    page_limit: u64,
    state: Mutex<StoreState>,
    load_gate: tokio::sync::Mutex<()>,
}

impl TransactionStore {
    pub fn new(ctx: NetworkContext, address: impl Into<String>) -> Self {
        TransactionStore {
            ctx,
            address: address.into(),
            page_limit: DEFAULT_PAGE_LIMIT,
            state: Mutex::new(StoreState {
                results: Vec::new(),
                offset: 0,
                limit: DEFAULT_PAGE_LIMIT,
                total: 0,
                fetched_once: false,
            }),
            load_gate: tokio::sync::Mutex::new(()),
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn context(&self) -> &NetworkContext {
        &self.ctx
    }

    /// Transactions accumulated so far
    pub fn len(&self) -> usize {
        self.state.lock().unwrap().results.len()
    }

    /// Upstream's total count as of the most recent page
    pub fn total(&self) -> u64 {
        self.state.lock().unwrap().total
    }

    /// Offset and limit reported by the most recent page
    pub fn last_page_window(&self) -> (u64, u64) {
        let state = self.state.lock().unwrap();
        (state.offset, state.limit)
    }

    /// True while the upstream total says there are unfetched pages
    pub fn has_more(&self) -> bool {
        let state = self.state.lock().unwrap();
        !state.fetched_once || state.total > state.results.len() as u64
    }

    /// Copy of the accumulated sequence, in fetch-then-append order
    pub fn snapshot(&self) -> Vec<Transaction> {
        self.state.lock().unwrap().results.clone()
    }

    /// Fetch and append the next page.
    ///
    /// Returns the number of transactions appended; 0 when everything is
    /// already loaded. At most one load may be in flight per store: a second
    /// call while one is pending is rejected, never interleaved.
    pub async fn load_more(&self, source: &dyn TransactionSource) -> Result<usize, AppError> {
        let _gate = self
            .load_gate
            .try_lock()
            .map_err(|_| AppError::LoadInProgress)?;

        let next_offset = {
            let state = self.state.lock().unwrap();
            if state.fetched_once && state.total <= state.results.len() as u64 {
                return Ok(0);
            }
            state.results.len() as u64
        };

        let page = source
            .fetch_page(&self.ctx, &self.address, next_offset, self.page_limit)
            .await?;
        debug!(
            offset = next_offset,
            fetched = page.results.len(),
            total = page.total,
            "Appending transaction page"
        );

        let mut state = self.state.lock().unwrap();
        state
            .results
            .extend(page.results.into_iter().map(|entry| entry.into_transaction()));
        // The newest page carries the freshest totals; older values are stale
        state.offset = page.offset;
        state.limit = page.limit;
        state.total = page.total;
        state.fetched_once = true;
        Ok(state.results.len() - next_offset as usize)
    }
}

/// Drop repeated ids, keeping the first occurrence. Applied on the render
/// and export paths so the store's offset arithmetic stays untouched.
pub fn dedup_by_id(transactions: Vec<Transaction>) -> Vec<Transaction> {
    let mut seen = std::collections::HashSet::new();
    transactions
        .into_iter()
        .filter(|tx| seen.insert(tx.id.clone()))
        .collect()
}
