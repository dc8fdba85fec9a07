//! Domain transaction model
//!
//! One immutable record per ledger transaction, decoded from a single API
//! response item and never mutated afterwards.

use serde::{Deserialize, Serialize};

use crate::utils::stx::microstx_to_stx;

/// Transaction kind as reported by the ledger API
///
/// Unknown kinds decode as `TokenTransfer` so a partially populated response
/// never fails rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TxKind {
    ContractCall,
    SmartContract,
    Coinbase,
    PoisonMicroblock,
    #[serde(other)]
    TokenTransfer,
}

impl Default for TxKind {
    fn default() -> Self {
        TxKind::TokenTransfer
    }
}

impl TxKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxKind::TokenTransfer => "token_transfer",
            TxKind::ContractCall => "contract_call",
            TxKind::SmartContract => "smart_contract",
            TxKind::Coinbase => "coinbase",
            TxKind::PoisonMicroblock => "poison_microblock",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "token_transfer" => Some(TxKind::TokenTransfer),
            "contract_call" => Some(TxKind::ContractCall),
            "smart_contract" => Some(TxKind::SmartContract),
            "coinbase" => Some(TxKind::Coinbase),
            "poison_microblock" => Some(TxKind::PoisonMicroblock),
            _ => None,
        }
    }
}

/// Transaction status as reported by the ledger API
///
/// Unknown statuses decode as `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TxStatus {
    Success,
    AbortByResponse,
    AbortByPostCondition,
    #[serde(other)]
    Pending,
}

impl Default for TxStatus {
    fn default() -> Self {
        TxStatus::Pending
    }
}

impl TxStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxStatus::Success => "success",
            TxStatus::AbortByResponse => "abort_by_response",
            TxStatus::AbortByPostCondition => "abort_by_post_condition",
            TxStatus::Pending => "pending",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, TxStatus::Success)
    }
}

/// Kind-specific transaction payload
#[derive(Debug, Clone, PartialEq)]
pub enum TxPayload {
    TokenTransfer {
        amount_ustx: u64,
        recipient: String,
    },
    ContractCall {
        contract_id: String,
        function_name: String,
    },
    SmartContract {
        contract_id: String,
        clarity_version: i64,
    },
    Coinbase,
    PoisonMicroblock,
}

/// STX/FT/NFT event counts attached to an address transaction entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventCounts {
    #[serde(default)]
    pub transfer: u64,
    #[serde(default)]
    pub mint: u64,
    #[serde(default)]
    pub burn: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxEvents {
    #[serde(default)]
    pub stx: EventCounts,
    #[serde(default)]
    pub ft: EventCounts,
    #[serde(default)]
    pub nft: EventCounts,
}

/// One ledger transaction as seen from the inspected address
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: String,
    pub kind: TxKind,
    pub status: TxStatus,
    pub block_height: u64,
    pub block_time: u64,
    pub block_hash: String,
    pub parent_block_hash: String,
    pub nonce: u64,
    pub sender_address: String,
    pub payload: TxPayload,
    /// Total µSTX moved out of the inspected address by this transaction
    pub stx_sent_ustx: u64,
    /// Total µSTX moved into the inspected address by this transaction
    pub stx_received_ustx: u64,
    pub events: TxEvents,
}

impl Transaction {
    /// Transfer amount in µSTX, for token transfers only
    pub fn transfer_amount_ustx(&self) -> Option<u64> {
        match &self.payload {
            TxPayload::TokenTransfer { amount_ustx, .. } => Some(*amount_ustx),
            _ => None,
        }
    }

    /// Sort/filter key in STX: the transfer amount, or 0 for every other kind
    pub fn amount_stx_or_zero(&self) -> f64 {
        self.transfer_amount_ustx()
            .map(microstx_to_stx)
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_kind_and_status_fall_back() {
        let kind: TxKind = serde_json::from_str("\"tenure_change\"").expect("decodes");
        assert_eq!(kind, TxKind::TokenTransfer);

        let status: TxStatus = serde_json::from_str("\"dropped_replace_by_fee\"").expect("decodes");
        assert_eq!(status, TxStatus::Pending);
        assert!(!status.is_success());
    }

    #[test]
    fn test_amount_key_is_zero_for_non_transfers() {
        let tx = Transaction {
            id: "0xaa".into(),
            kind: TxKind::Coinbase,
            status: TxStatus::Success,
            block_height: 10,
            block_time: 1_700_000_000,
            block_hash: String::new(),
            parent_block_hash: String::new(),
            nonce: 0,
            sender_address: "SP000".into(),
            payload: TxPayload::Coinbase,
            stx_sent_ustx: 0,
            stx_received_ustx: 0,
            events: TxEvents::default(),
        };
        assert_eq!(tx.amount_stx_or_zero(), 0.0);
        assert_eq!(tx.transfer_amount_ustx(), None);
    }
}
