pub mod c32;
pub mod categories;
pub mod clarity;
pub mod wallet;

pub use categories::ContractId;
pub use wallet::{WalletConnector, WalletOutcome};
