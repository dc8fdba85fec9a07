//! On-chain transaction categories
//!
//! The category contract keeps a `(owner, txid) -> label` mapping with two
//! functions: read-only `get-category(owner, txid)` returning an optional
//! `{ category: (string-utf8 64) }` tuple, and public `set-category(txid,
//! label)` keyed by the transaction sender. Reads degrade to `None` on any
//! failure; writes go through the wallet connector and report a hard error
//! when no contract is configured for the active network.

use std::fmt;

use serde_json::Value;
use tracing::{debug, info};

use crate::api::hiro::HiroClient;
use crate::chain::clarity::{self, ClarityValue};
use crate::chain::wallet::{ContractCallRequest, WalletConnector, WalletOutcome, WriteState};
use crate::models::category::validate_label;
use crate::models::network::{Network, NetworkContext};
use crate::utils::errors::AppError;
use crate::utils::stx::parse_txid;

pub const GET_CATEGORY_FN: &str = "get-category";
pub const SET_CATEGORY_FN: &str = "set-category";

/// Fully qualified contract identifier, `ADDRESS.name`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractId {
    pub address: String,
    pub name: String,
}

impl ContractId {
    pub fn parse(id: &str) -> Option<Self> {
        let (address, name) = id.split_once('.')?;
        if address.is_empty() || name.is_empty() {
            return None;
        }
        Some(ContractId {
            address: address.to_string(),
            name: name.to_string(),
        })
    }
}

impl fmt::Display for ContractId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.address, self.name)
    }
}

fn contract_env(network: Network) -> &'static str {
    match network {
        Network::Mainnet => "TX_CATEGORIES_CONTRACT_MAINNET",
        Network::Testnet => "TX_CATEGORIES_CONTRACT_TESTNET",
    }
}

/// Look up the category contract for a network.
///
/// `None` means the feature is disabled there: reads short-circuit to "no
/// category" and writes refuse with a configuration error.
pub fn resolve_contract(network: Network) -> Option<ContractId> {
    let id = std::env::var(contract_env(network)).ok()?;
    ContractId::parse(id.trim())
}

/// Normalize a decoded optional-tuple call result into the category label.
///
/// Decoding layers differ in how they spell an optional tuple: the absent
/// case may be tagged `none`, `optionalNone`, or `optional` with a null
/// value; the present case may wrap the tuple fields under `value` or
/// `data`, one or two levels deep; and the label leaf may be a typed node or
/// a bare string. Anything else is treated as absent rather than an error.
pub fn extract_category(result: &Value) -> Option<String> {
    let tag = result.get("type")?.as_str()?;
    let value = result.get("value");

    let is_none = tag == "none"
        || tag == "optionalNone"
        || (tag == "optional" && value.map_or(true, Value::is_null));
    if is_none {
        return None;
    }

    let opt_val = match value {
        Some(v) if !v.is_null() => v,
        _ => result,
    };
    let tuple = opt_val
        .get("value")
        .or_else(|| opt_val.get("data"))
        .unwrap_or(opt_val);
    let node = tuple
        .get("category")
        .or_else(|| tuple.get("data").and_then(|d| d.get("category")))?;

    let leaf = node.get("value");
    let node_type = node.get("type").and_then(Value::as_str);
    if node_type == Some("string-utf8") || leaf.unwrap_or(node).is_string() {
        if node_type.is_some() {
            return leaf.and_then(Value::as_str).map(str::to_string);
        }
        return leaf.unwrap_or(node).as_str().map(str::to_string);
    }
    None
}

/// Read the category an owner attached to a transaction.
///
/// Soft path: an unresolved contract, a failed call, an absent record, or an
/// unrecognizable result shape all come back as `None`.
pub async fn read_category(
    client: &HiroClient,
    ctx: &NetworkContext,
    owner: &str,
    txid_hex: &str,
) -> Option<String> {
    let contract = match resolve_contract(ctx.network) {
        Some(contract) => contract,
        None => {
            debug!("No category contract configured for {}", ctx.network);
            return None;
        }
    };
    let txid = match parse_txid(txid_hex) {
        Ok(txid) => txid,
        Err(e) => {
            debug!("Skipping category read: {}", e);
            return None;
        }
    };

    let args = [
        ClarityValue::Principal(owner.to_string()),
        ClarityValue::Buffer(txid.to_vec()),
    ];
    let response = match client
        .call_read_only(ctx, &contract, GET_CATEGORY_FN, owner, &args)
        .await
    {
        Ok(response) => response,
        Err(e) => {
            debug!("Category read failed: {}", e);
            return None;
        }
    };
    if !response.okay {
        debug!(
            "Category read rejected by node: {}",
            response.cause.unwrap_or_default()
        );
        return None;
    }

    let result_hex = response.result?;
    let decoded = match clarity::decode_hex(&result_hex) {
        Ok(decoded) => decoded,
        Err(e) => {
            debug!("Unrecognized category result shape: {}", e);
            return None;
        }
    };
    extract_category(&decoded)
}

/// Write a category label for a transaction through the wallet connector.
///
/// Validation and missing contract configuration are hard errors (a write
/// without a target is a caller bug); the wallet's own three outcomes are
/// returned as-is, with no automatic retry.
pub async fn write_category(
    wallet: &dyn WalletConnector,
    ctx: &NetworkContext,
    txid_hex: &str,
    label: &str,
) -> Result<WalletOutcome, AppError> {
    validate_label(label)?;
    let txid = parse_txid(txid_hex)?;
    let contract =
        resolve_contract(ctx.network).ok_or(AppError::ContractNotConfigured(ctx.network))?;

    let request = ContractCallRequest {
        contract,
        function_name: SET_CATEGORY_FN.to_string(),
        args: vec![
            ClarityValue::Buffer(txid.to_vec()),
            ClarityValue::StringUtf8(label.to_string()),
        ],
        network: ctx.network,
    };

    let mut state = WriteState::Idle;
    debug!(?state, txid = txid_hex, "Starting category write");
    state = WriteState::AwaitingSignature;
    debug!(?state, "Handing request to wallet");

    let outcome = wallet.request_contract_call(request).await;
    state = WriteState::from_outcome(&outcome);
    info!(?state, "Category write finished");
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;

    struct ScriptedWallet {
        outcome: WalletOutcome,
    }

    #[async_trait]
    impl WalletConnector for ScriptedWallet {
        async fn request_contract_call(&self, request: ContractCallRequest) -> WalletOutcome {
            assert_eq!(request.function_name, SET_CATEGORY_FN);
            assert_eq!(request.args.len(), 2);
            self.outcome.clone()
        }
    }

    fn ctx() -> NetworkContext {
        NetworkContext::new(Network::Testnet)
    }

    fn txid() -> String {
        "00".repeat(32)
    }

    #[test]
    fn test_contract_id_parse() {
        let id = ContractId::parse("ST2QKZ4FKHAH1NQKYKYAYZPY440FEPK7GZ1R5HBP2.tx-categories")
            .expect("parses");
        assert_eq!(id.name, "tx-categories");
        assert!(ContractId::parse("no-dot-here").is_none());
        assert!(ContractId::parse(".name").is_none());
        assert!(ContractId::parse("addr.").is_none());
    }

    #[test]
    fn test_extract_category_tolerates_known_shapes() {
        // Typed-node tuple under `data`
        let shape_a = json!({
            "type": "optional",
            "value": {"type": "tuple", "data": {"category": {"type": "string-utf8", "value": "Income"}}}
        });
        assert_eq!(extract_category(&shape_a).as_deref(), Some("Income"));

        // Tuple fields under `value`
        let shape_b = json!({
            "type": "optionalSome",
            "value": {"type": "tuple", "value": {"category": {"type": "string-utf8", "value": "Expense"}}}
        });
        assert_eq!(extract_category(&shape_b).as_deref(), Some("Expense"));

        // Bare string leaf, one wrapper level
        let shape_c = json!({
            "type": "some",
            "value": {"data": {"category": "Transfer"}}
        });
        assert_eq!(extract_category(&shape_c).as_deref(), Some("Transfer"));

        // Double-wrapped tuple value
        let shape_d = json!({
            "type": "some",
            "value": {"value": {"category": {"type": "string-utf8", "value": "Investment"}}}
        });
        assert_eq!(extract_category(&shape_d).as_deref(), Some("Investment"));
    }

    #[test]
    fn test_extract_category_round_trips_wire_result() {
        // (some (tuple (category u"Income"))) straight off the wire
        let mut bytes = vec![0x0a, 0x0c];
        bytes.extend_from_slice(&1u32.to_be_bytes());
        bytes.push(8);
        bytes.extend_from_slice(b"category");
        bytes.push(0x0e);
        bytes.extend_from_slice(&6u32.to_be_bytes());
        bytes.extend_from_slice(b"Income");
        let decoded = clarity::decode_hex(&hex::encode(&bytes)).expect("decodes");
        assert_eq!(extract_category(&decoded).as_deref(), Some("Income"));

        // (none): a well-formed call against an untagged transaction
        let decoded = clarity::decode_hex("0x09").expect("decodes");
        assert_eq!(extract_category(&decoded), None);
    }

    #[test]
    fn test_extract_category_absent_variants() {
        assert_eq!(extract_category(&json!({"type": "none"})), None);
        assert_eq!(extract_category(&json!({"type": "optionalNone"})), None);
        assert_eq!(
            extract_category(&json!({"type": "optional", "value": null})),
            None
        );
        assert_eq!(extract_category(&json!({"type": "optional"})), None);
    }

    #[test]
    fn test_extract_category_unrecognized_shapes_yield_none() {
        assert_eq!(extract_category(&json!({})), None);
        assert_eq!(extract_category(&json!({"type": 5})), None);
        assert_eq!(extract_category(&json!({"type": "uint", "value": "7"})), None);
        assert_eq!(
            extract_category(&json!({
                "type": "optional",
                "value": {"type": "tuple", "data": {"note": {"type": "string-utf8", "value": "x"}}}
            })),
            None
        );
        // Typed label node whose value is not a string
        assert_eq!(
            extract_category(&json!({
                "type": "optional",
                "value": {"type": "tuple", "data": {"category": {"type": "string-utf8", "value": 3}}}
            })),
            None
        );
    }

    #[tokio::test]
    async fn test_write_category_outcomes_pass_through() {
        std::env::set_var(
            "TX_CATEGORIES_CONTRACT_TESTNET",
            "ST2QKZ4FKHAH1NQKYKYAYZPY440FEPK7GZ1R5HBP2.tx-categories",
        );

        for outcome in [
            WalletOutcome::Submitted { txid: "0xaa".into() },
            WalletOutcome::Cancelled,
            WalletOutcome::Failed { reason: "network".into() },
        ] {
            let wallet = ScriptedWallet {
                outcome: outcome.clone(),
            };
            let got = write_category(&wallet, &ctx(), &txid(), "Income")
                .await
                .expect("validation passes");
            assert_eq!(got, outcome);
        }
    }

    #[tokio::test]
    async fn test_write_category_validates_before_wallet() {
        std::env::set_var(
            "TX_CATEGORIES_CONTRACT_TESTNET",
            "ST2QKZ4FKHAH1NQKYKYAYZPY440FEPK7GZ1R5HBP2.tx-categories",
        );
        let wallet = ScriptedWallet {
            outcome: WalletOutcome::Cancelled,
        };

        let err = write_category(&wallet, &ctx(), &txid(), "")
            .await
            .expect_err("empty label rejected");
        assert!(matches!(err, AppError::Validation(_)));

        let err = write_category(&wallet, &ctx(), "0x1234", "Income")
            .await
            .expect_err("short txid rejected");
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_write_category_requires_contract() {
        std::env::remove_var("TX_CATEGORIES_CONTRACT_MAINNET");
        let wallet = ScriptedWallet {
            outcome: WalletOutcome::Cancelled,
        };
        let mainnet = NetworkContext::new(Network::Mainnet);

        let err = write_category(&wallet, &mainnet, &txid(), "Income")
            .await
            .expect_err("must refuse without a contract");
        assert!(matches!(err, AppError::ContractNotConfigured(_)));
    }
}
