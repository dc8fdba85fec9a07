use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::transaction::{Transaction, TxEvents, TxKind, TxPayload, TxStatus};

fn zero_string() -> String {
    "0".to_string()
}

/// Token transfer payload on a transaction
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenTransferPayload {
    #[serde(default)]
    pub recipient_address: String,
    /// µSTX amount, reported as a decimal string
    #[serde(default = "zero_string")]
    pub amount: String,
}

/// Contract call payload on a transaction
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContractCallPayload {
    #[serde(default)]
    pub contract_id: String,
    #[serde(default)]
    pub function_name: String,
}

/// Contract deployment payload on a transaction
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SmartContractPayload {
    #[serde(default)]
    pub contract_id: String,
    #[serde(default)]
    pub clarity_version: i64,
}

/// One transaction as returned by the ledger API
///
/// Every field is defaulted so a partially populated response never fails
/// decoding: unknown statuses read as pending, unknown kinds as token
/// transfers, numbers as 0 and hashes as empty strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiTransaction {
    #[serde(default)]
    pub tx_id: String,
    #[serde(default)]
    pub tx_status: TxStatus,
    #[serde(default)]
    pub tx_type: TxKind,
    #[serde(default)]
    pub nonce: u64,
    #[serde(default)]
    pub block_height: u64,
    #[serde(default)]
    pub block_time: u64,
    #[serde(default)]
    pub block_hash: String,
    #[serde(default)]
    pub parent_block_hash: String,
    #[serde(default)]
    pub sender_address: String,
    #[serde(default)]
    pub token_transfer: Option<TokenTransferPayload>,
    #[serde(default)]
    pub contract_call: Option<ContractCallPayload>,
    #[serde(default)]
    pub smart_contract: Option<SmartContractPayload>,
}

/// An address-transactions list entry: the transaction plus the STX flow it
/// caused for the inspected address
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddressTransactionEntry {
    #[serde(default)]
    pub tx: ApiTransaction,
    #[serde(default = "zero_string")]
    pub stx_sent: String,
    #[serde(default = "zero_string")]
    pub stx_received: String,
    #[serde(default)]
    pub events: TxEvents,
}

impl AddressTransactionEntry {
    /// Wrap a bare transaction from the single-tx endpoint the way a list
    /// entry would look, with zeroed flow totals
    pub fn from_single(tx: ApiTransaction) -> Self {
        AddressTransactionEntry {
            tx,
            stx_sent: zero_string(),
            stx_received: zero_string(),
            events: TxEvents::default(),
        }
    }

    /// Decode into the immutable domain record
    pub fn into_transaction(self) -> Transaction {
        let tx = self.tx;
        let payload = match tx.tx_type {
            TxKind::TokenTransfer => {
                let transfer = tx.token_transfer.unwrap_or_default();
                TxPayload::TokenTransfer {
                    amount_ustx: transfer.amount.parse().unwrap_or(0),
                    recipient: transfer.recipient_address,
                }
            }
            TxKind::ContractCall => {
                let call = tx.contract_call.unwrap_or_default();
                TxPayload::ContractCall {
                    contract_id: call.contract_id,
                    function_name: call.function_name,
                }
            }
            TxKind::SmartContract => {
                let deploy = tx.smart_contract.unwrap_or_default();
                TxPayload::SmartContract {
                    contract_id: deploy.contract_id,
                    clarity_version: deploy.clarity_version,
                }
            }
            TxKind::Coinbase => TxPayload::Coinbase,
            TxKind::PoisonMicroblock => TxPayload::PoisonMicroblock,
        };

        Transaction {
            id: tx.tx_id,
            kind: tx.tx_type,
            status: tx.tx_status,
            block_height: tx.block_height,
            block_time: tx.block_time,
            block_hash: tx.block_hash,
            parent_block_hash: tx.parent_block_hash,
            nonce: tx.nonce,
            sender_address: tx.sender_address,
            payload,
            stx_sent_ustx: self.stx_sent.parse().unwrap_or(0),
            stx_received_ustx: self.stx_received.parse().unwrap_or(0),
            events: self.events,
        }
    }
}

/// One page of an address's transaction history
///
/// `results` is deliberately not defaulted: a response without it is
/// malformed and must surface as an upstream error, not an empty page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionPage {
    #[serde(default)]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
    #[serde(default)]
    pub total: u64,
    pub results: Vec<AddressTransactionEntry>,
}

/// STX balance block for an address
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StxBalance {
    #[serde(default = "zero_string")]
    pub balance: String,
    #[serde(default = "zero_string")]
    pub total_sent: String,
    #[serde(default = "zero_string")]
    pub total_received: String,
    #[serde(default = "zero_string")]
    pub total_fees_sent: String,
    #[serde(default = "zero_string")]
    pub total_miner_rewards_received: String,
    #[serde(default)]
    pub lock_tx_id: String,
    #[serde(default = "zero_string")]
    pub locked: String,
    #[serde(default)]
    pub lock_height: u64,
    #[serde(default)]
    pub burnchain_lock_height: u64,
    #[serde(default)]
    pub burnchain_unlock_height: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FungibleTokenBalance {
    #[serde(default = "zero_string")]
    pub balance: String,
    #[serde(default = "zero_string")]
    pub total_sent: String,
    #[serde(default = "zero_string")]
    pub total_received: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NonFungibleTokenBalance {
    #[serde(default = "zero_string")]
    pub count: String,
    #[serde(default = "zero_string")]
    pub total_sent: String,
    #[serde(default = "zero_string")]
    pub total_received: String,
}

/// Full balances response for an address
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddressBalanceResponse {
    #[serde(default)]
    pub stx: StxBalance,
    #[serde(default)]
    pub fungible_tokens: HashMap<String, FungibleTokenBalance>,
    #[serde(default)]
    pub non_fungible_tokens: HashMap<String, NonFungibleTokenBalance>,
}

/// Response from the read-only contract call endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadOnlyCallResponse {
    pub okay: bool,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub cause: Option<String>,
}

/// Comprehensive error type for ledger API operations
#[derive(Debug, Clone)]
pub enum ApiError {
    /// 400 Bad Request
    BadRequest(String),
    /// 404 Not Found
    NotFound(String),
    /// 429 Too Many Requests
    RateLimited(String),
    /// 5xx Server Error
    ServerError(i32, String),
    /// Other HTTP errors
    HttpError(i32, String),
    /// Network/request error
    RequestError(String),
    /// Deserialization error (including a missing `results` field)
    DeserializationError(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            ApiError::RateLimited(msg) => write!(f, "Rate Limited: {}", msg),
            ApiError::ServerError(code, msg) => write!(f, "Server Error ({}): {}", code, msg),
            ApiError::HttpError(code, msg) => write!(f, "HTTP Error ({}): {}", code, msg),
            ApiError::RequestError(msg) => write!(f, "Request Error: {}", msg),
            ApiError::DeserializationError(msg) => {
                write!(f, "Deserialization Error: {}", msg)
            }
        }
    }
}

impl std::error::Error for ApiError {}
