//! Data models shared across commands and services
//!
//! Domain values only: upstream JSON wire shapes live in `api::hiro::models`
//! and are converted into these types at the client boundary.

pub mod category;
pub mod filter;
pub mod network;
pub mod transaction;

// Re-export commonly used types for convenience
pub use filter::FilterCriteria;
pub use network::{Network, NetworkContext};
pub use transaction::{Transaction, TxKind, TxPayload};
