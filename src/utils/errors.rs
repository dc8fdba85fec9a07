use crate::api::hiro::ApiError;
use crate::models::network::Network;
use thiserror::Error;

/// Application-level errors surfaced to the user
///
/// Unrecognized contract-call result shapes are not represented here: the
/// category bridge resolves them to "no category" instead of raising.
#[derive(Debug, Error)]
pub enum AppError {
    /// Ledger API returned a non-2xx response or malformed JSON
    #[error("Upstream API error: {0}")]
    Upstream(#[from] ApiError),
    /// No category contract configured for the active network; blocks writes
    #[error("No category contract configured for {0}")]
    ContractNotConfigured(Network),
    /// Malformed address, transaction id, or command input
    #[error("Invalid input: {0}")]
    Validation(String),
    /// The user declined the signing prompt
    #[error("Wallet request cancelled")]
    WalletCancelled,
    /// The wallet flow failed after approval (signer missing, broadcast error)
    #[error("Wallet error: {0}")]
    Wallet(String),
    /// A page load is already in flight for this store
    #[error("A page load is already in progress")]
    LoadInProgress,
    /// Writing an export artifact failed
    #[error("Export failed: {0}")]
    Export(String),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }
}
