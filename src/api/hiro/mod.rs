pub mod client;
pub mod models;

pub use client::{HiroClient, DEFAULT_PAGE_LIMIT};
pub use models::{AddressBalanceResponse, AddressTransactionEntry, ApiError, TransactionPage};
