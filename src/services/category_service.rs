//! Category read/write orchestration for the detail view
//!
//! Reads ride a liveness token: opening a newer detail view supersedes any
//! category fetch still in flight, whose result is then discarded rather
//! than applied. The network call itself is not aborted.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::api::hiro::HiroClient;
use crate::chain::categories;
use crate::chain::wallet::{WalletConnector, WalletOutcome};
use crate::models::network::NetworkContext;
use crate::utils::errors::AppError;

/// Tracks which detail view is current
#[derive(Default)]
pub struct DetailTracker {
    generation: Arc<AtomicU64>,
}

impl DetailTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new detail view, superseding any previous one
    pub fn begin(&self) -> DetailToken {
        let mine = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        DetailToken {
            generation: Arc::clone(&self.generation),
            mine,
        }
    }
}

/// Liveness flag for one detail view's in-flight reads
pub struct DetailToken {
    generation: Arc<AtomicU64>,
    mine: u64,
}

impl DetailToken {
    pub fn is_live(&self) -> bool {
        self.generation.load(Ordering::SeqCst) == self.mine
    }
}

/// Read the category for a transaction; `None` covers "no record" and every
/// soft failure
pub async fn get_category(
    client: &HiroClient,
    ctx: &NetworkContext,
    owner: &str,
    txid: &str,
) -> Option<String> {
    categories::read_category(client, ctx, owner, txid).await
}

/// Write a category through the wallet connector
pub async fn set_category(
    wallet: &dyn WalletConnector,
    ctx: &NetworkContext,
    txid: &str,
    label: &str,
) -> Result<WalletOutcome, AppError> {
    categories::write_category(wallet, ctx, txid, label).await
}

/// Fetch a category in the background for a detail view.
///
/// `on_ready` runs only while the token is still live; a superseded view's
/// result is dropped on arrival.
pub fn spawn_detail_read<F>(
    client: &HiroClient,
    ctx: &NetworkContext,
    owner: &str,
    txid: &str,
    token: DetailToken,
    on_ready: F,
) -> tokio::task::JoinHandle<()>
where
    F: FnOnce(Option<String>) + Send + 'static,
{
    let client = client.clone();
    let ctx = ctx.clone();
    let owner = owner.to_string();
    let txid = txid.to_string();
    tokio::spawn(async move {
        let category = categories::read_category(&client, &ctx, &owner, &txid).await;
        if token.is_live() {
            on_ready(category);
        } else {
            debug!("Detail view superseded; discarding category read for {}", txid);
        }
    })
}
