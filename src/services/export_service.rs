//! Export of the filtered transaction view
//!
//! Serialization is pure string building over the already-filtered, ordered
//! view; only `export_to_file` touches the filesystem.

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::Serialize;
use serde_json::json;

use crate::models::transaction::{Transaction, TxKind, TxPayload};
use crate::utils::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
    /// Tab-separated values under an .xlsx name, openable in Excel
    Xlsx,
}

impl ExportFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "csv" => Some(ExportFormat::Csv),
            "json" => Some(ExportFormat::Json),
            "xlsx" => Some(ExportFormat::Xlsx),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Xlsx => "xlsx",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportOptions {
    pub format: ExportFormat,
    pub include_balance: bool,
    pub include_events: bool,
}

/// `stacks-transactions-{addr prefix}-{date}.{ext}`
pub fn export_filename(address: &str, format: ExportFormat, date: NaiveDate) -> String {
    let prefix: String = address.chars().take(8).collect();
    format!(
        "stacks-transactions-{}-{}.{}",
        prefix,
        date.format("%Y-%m-%d"),
        format.extension()
    )
}

fn quoted(s: &str) -> String {
    format!("\"{}\"", s)
}

fn stx_fixed(ustx: u64) -> String {
    format!("{:.6}", ustx as f64 / 1_000_000.0)
}

fn iso_time(block_time: u64) -> String {
    DateTime::<Utc>::from_timestamp(block_time as i64, 0)
        .map(|dt| dt.to_rfc3339_opts(chrono::SecondsFormat::Millis, true))
        .unwrap_or_default()
}

/// CSV with base columns plus kind-specific column groups that appear only
/// when that kind occurs in the view
pub fn to_csv(transactions: &[Transaction], options: &ExportOptions) -> String {
    let has_transfers = transactions.iter().any(|t| t.kind == TxKind::TokenTransfer);
    let has_calls = transactions.iter().any(|t| t.kind == TxKind::ContractCall);
    let has_deploys = transactions.iter().any(|t| t.kind == TxKind::SmartContract);

    let mut headers: Vec<&str> = vec![
        "Transaction ID",
        "Type",
        "Status",
        "Block Height",
        "Block Time",
        "Sender Address",
        "Nonce",
    ];
    if options.include_balance {
        headers.extend(["STX Sent", "STX Received"]);
    }
    if options.include_events {
        headers.extend(["Transfer Events", "Mint Events", "Burn Events"]);
    }
    if has_transfers {
        headers.extend(["Recipient Address", "Transfer Amount (STX)"]);
    }
    if has_calls {
        headers.extend(["Contract ID", "Function Name"]);
    }
    if has_deploys {
        headers.extend(["Contract ID", "Clarity Version"]);
    }

    let mut lines = vec![headers.join(",")];
    for tx in transactions {
        let mut row = vec![
            quoted(&tx.id),
            tx.kind.as_str().to_string(),
            tx.status.as_str().to_string(),
            tx.block_height.to_string(),
            iso_time(tx.block_time),
            quoted(&tx.sender_address),
            tx.nonce.to_string(),
        ];
        if options.include_balance {
            row.push(stx_fixed(tx.stx_sent_ustx));
            row.push(stx_fixed(tx.stx_received_ustx));
        }
        if options.include_events {
            row.push(tx.events.stx.transfer.to_string());
            row.push(tx.events.stx.mint.to_string());
            row.push(tx.events.stx.burn.to_string());
        }
        if has_transfers {
            match &tx.payload {
                TxPayload::TokenTransfer {
                    amount_ustx,
                    recipient,
                } => {
                    row.push(quoted(recipient));
                    row.push(stx_fixed(*amount_ustx));
                }
                _ => {
                    row.push(String::new());
                    row.push(String::new());
                }
            }
        }
        if has_calls {
            match &tx.payload {
                TxPayload::ContractCall {
                    contract_id,
                    function_name,
                } => {
                    row.push(quoted(contract_id));
                    row.push(function_name.clone());
                }
                _ => {
                    row.push(String::new());
                    row.push(String::new());
                }
            }
        }
        if has_deploys {
            match &tx.payload {
                TxPayload::SmartContract {
                    contract_id,
                    clarity_version,
                } => {
                    row.push(quoted(contract_id));
                    row.push(clarity_version.to_string());
                }
                _ => {
                    row.push(String::new());
                    row.push(String::new());
                }
            }
        }
        lines.push(row.join(","));
    }
    lines.join("\n")
}

/// JSON envelope with the export date, count, options, and one object per
/// transaction
pub fn to_json(
    transactions: &[Transaction],
    options: &ExportOptions,
    exported_at: DateTime<Utc>,
) -> String {
    let items: Vec<serde_json::Value> = transactions
        .iter()
        .map(|tx| {
            let mut map = serde_json::Map::new();
            map.insert("tx_id".into(), json!(tx.id));
            map.insert("tx_type".into(), json!(tx.kind.as_str()));
            map.insert("tx_status".into(), json!(tx.status.as_str()));
            map.insert("block_height".into(), json!(tx.block_height));
            map.insert("block_time".into(), json!(tx.block_time));
            map.insert("block_time_iso".into(), json!(iso_time(tx.block_time)));
            map.insert("sender_address".into(), json!(tx.sender_address));
            map.insert("nonce".into(), json!(tx.nonce));
            map.insert("block_hash".into(), json!(tx.block_hash));
            map.insert("parent_block_hash".into(), json!(tx.parent_block_hash));
            if options.include_balance {
                map.insert("stx_sent".into(), json!(stx_fixed(tx.stx_sent_ustx)));
                map.insert(
                    "stx_received".into(),
                    json!(stx_fixed(tx.stx_received_ustx)),
                );
            }
            if options.include_events {
                map.insert("events".into(), json!(tx.events));
            }
            match &tx.payload {
                TxPayload::TokenTransfer {
                    amount_ustx,
                    recipient,
                } => {
                    map.insert(
                        "token_transfer".into(),
                        json!({
                            "recipient_address": recipient,
                            "amount_stx": stx_fixed(*amount_ustx),
                            "amount_ustx": amount_ustx.to_string(),
                        }),
                    );
                }
                TxPayload::ContractCall {
                    contract_id,
                    function_name,
                } => {
                    map.insert(
                        "contract_call".into(),
                        json!({
                            "contract_id": contract_id,
                            "function_name": function_name,
                        }),
                    );
                }
                TxPayload::SmartContract {
                    contract_id,
                    clarity_version,
                } => {
                    map.insert(
                        "smart_contract".into(),
                        json!({
                            "contract_id": contract_id,
                            "clarity_version": clarity_version,
                        }),
                    );
                }
                TxPayload::Coinbase | TxPayload::PoisonMicroblock => {}
            }
            serde_json::Value::Object(map)
        })
        .collect();

    let envelope = json!({
        "exportDate": exported_at.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        "totalTransactions": transactions.len(),
        "options": options,
        "transactions": items,
    });
    serde_json::to_string_pretty(&envelope).unwrap_or_default()
}

/// Tab-separated rows with a fixed column set, saved under an .xlsx name
pub fn to_tsv(transactions: &[Transaction], options: &ExportOptions) -> String {
    let mut headers: Vec<&str> = vec![
        "Transaction ID",
        "Type",
        "Status",
        "Block Height",
        "Block Time",
        "Sender Address",
        "Nonce",
    ];
    if options.include_balance {
        headers.extend(["STX Sent", "STX Received"]);
    }
    headers.extend([
        "Recipient Address",
        "Transfer Amount (STX)",
        "Contract ID",
        "Function Name",
    ]);

    let mut lines = vec![headers.join("\t")];
    for tx in transactions {
        let mut row = vec![
            tx.id.clone(),
            tx.kind.as_str().to_string(),
            tx.status.as_str().to_string(),
            tx.block_height.to_string(),
            local_time(tx.block_time),
            tx.sender_address.clone(),
            tx.nonce.to_string(),
        ];
        if options.include_balance {
            row.push(stx_fixed(tx.stx_sent_ustx));
            row.push(stx_fixed(tx.stx_received_ustx));
        }
        let (recipient, amount) = match &tx.payload {
            TxPayload::TokenTransfer {
                amount_ustx,
                recipient,
            } => (recipient.clone(), stx_fixed(*amount_ustx)),
            _ => (String::new(), String::new()),
        };
        let (contract_id, function_name) = match &tx.payload {
            TxPayload::ContractCall {
                contract_id,
                function_name,
            } => (contract_id.clone(), function_name.clone()),
            TxPayload::SmartContract { contract_id, .. } => (contract_id.clone(), String::new()),
            _ => (String::new(), String::new()),
        };
        row.extend([recipient, amount, contract_id, function_name]);
        lines.push(row.join("\t"));
    }
    lines.join("\n")
}

fn local_time(block_time: u64) -> String {
    DateTime::<Utc>::from_timestamp(block_time as i64, 0)
        .map(|dt| dt.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}

/// Serialize the view and write it next to the current working directory.
/// Returns the file name written.
pub fn export_to_file(
    transactions: &[Transaction],
    address: &str,
    options: &ExportOptions,
) -> Result<String, AppError> {
    let now = Utc::now();
    let filename = export_filename(address, options.format, Local::now().date_naive());
    let content = match options.format {
        ExportFormat::Csv => to_csv(transactions, options),
        ExportFormat::Json => to_json(transactions, options, now),
        ExportFormat::Xlsx => to_tsv(transactions, options),
    };
    std::fs::write(&filename, content)
        .map_err(|e| AppError::Export(format!("Could not write {}: {}", filename, e)))?;
    Ok(filename)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::transaction::{TxEvents, TxStatus};

    fn transfer(id: &str, amount: u64) -> Transaction {
        Transaction {
            id: id.to_string(),
            kind: TxKind::TokenTransfer,
            status: TxStatus::Success,
            block_height: 7,
            block_time: 1_700_000_000,
            block_hash: "0xblock".into(),
            parent_block_hash: "0xparent".into(),
            nonce: 1,
            sender_address: "SPSENDER".into(),
            payload: TxPayload::TokenTransfer {
                amount_ustx: amount,
                recipient: "SPRECIPIENT".into(),
            },
            stx_sent_ustx: amount,
            stx_received_ustx: 0,
            events: TxEvents::default(),
        }
    }

    fn coinbase(id: &str) -> Transaction {
        Transaction {
            kind: TxKind::Coinbase,
            payload: TxPayload::Coinbase,
            ..transfer(id, 0)
        }
    }

    fn options(format: ExportFormat) -> ExportOptions {
        ExportOptions {
            format,
            include_balance: false,
            include_events: false,
        }
    }

    #[test]
    fn test_csv_columns_follow_view_contents() {
        let view = vec![coinbase("0x1")];
        let csv = to_csv(&view, &options(ExportFormat::Csv));
        // No transfers or calls in the view, so no kind-specific columns
        assert!(!csv.contains("Recipient Address"));
        assert!(!csv.contains("Function Name"));

        let view = vec![transfer("0x1", 2_500_000), coinbase("0x2")];
        let csv = to_csv(&view, &options(ExportFormat::Csv));
        assert!(csv.contains("Recipient Address"));
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("2.500000"));
        // Non-transfer rows pad the transfer columns
        assert!(lines[2].ends_with(",,"));
    }

    #[test]
    fn test_csv_optional_column_groups() {
        let view = vec![transfer("0x1", 1_000_000)];
        let mut opts = options(ExportFormat::Csv);
        opts.include_balance = true;
        opts.include_events = true;
        let csv = to_csv(&view, &opts);
        let header = csv.lines().next().unwrap_or_default();
        assert!(header.contains("STX Sent"));
        assert!(header.contains("Mint Events"));
    }

    #[test]
    fn test_json_envelope() {
        let view = vec![transfer("0x1", 1_500_000)];
        let exported_at = DateTime::<Utc>::from_timestamp(1_700_000_123, 0).expect("valid");
        let raw = to_json(&view, &options(ExportFormat::Json), exported_at);
        let parsed: serde_json::Value = serde_json::from_str(&raw).expect("valid json");

        assert_eq!(parsed["totalTransactions"], 1);
        assert_eq!(parsed["options"]["format"], "json");
        let tx = &parsed["transactions"][0];
        assert_eq!(tx["tx_id"], "0x1");
        assert_eq!(tx["token_transfer"]["amount_stx"], "1.500000");
        assert_eq!(tx["token_transfer"]["amount_ustx"], "1500000");
        assert!(tx.get("events").is_none());
    }

    #[test]
    fn test_tsv_has_fixed_columns() {
        let view = vec![transfer("0x1", 1_000_000), coinbase("0x2")];
        let tsv = to_tsv(&view, &options(ExportFormat::Xlsx));
        let lines: Vec<&str> = tsv.lines().collect();
        assert_eq!(lines.len(), 3);
        let header_cols = lines[0].split('\t').count();
        for line in &lines[1..] {
            assert_eq!(line.split('\t').count(), header_cols);
        }
    }

    #[test]
    fn test_export_filename_shape() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 15).expect("valid");
        assert_eq!(
            export_filename("SP2J6ZY48GV1EZ5V2V5RB9MP66SW86PYKKNRV9EJ7", ExportFormat::Csv, date),
            "stacks-transactions-SP2J6ZY4-2024-06-15.csv"
        );
    }
}
