//! Client-side filtering and sorting of the accumulated set
//!
//! `apply` is a pure function of its two inputs and is recomputed on every
//! render; nothing here touches the store.

use chrono::{Local, NaiveDate, NaiveTime, TimeZone};

use crate::models::filter::{FilterCriteria, SortBy, SortOrder, StatusFilter};
use crate::models::transaction::{Transaction, TxKind};

/// Local-midnight start of a day, in unix milliseconds
fn local_day_start_millis(date: NaiveDate) -> Option<i64> {
    let naive = date.and_time(NaiveTime::MIN);
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.timestamp_millis())
}

/// Local 23:59:59.999 end of a day, in unix milliseconds
fn local_day_end_millis(date: NaiveDate) -> Option<i64> {
    let end = NaiveTime::from_hms_milli_opt(23, 59, 59, 999)?;
    let naive = date.and_time(end);
    Local
        .from_local_datetime(&naive)
        .latest()
        .map(|dt| dt.timestamp_millis())
}

fn passes(tx: &Transaction, criteria: &FilterCriteria) -> bool {
    if let Some(kind) = criteria.kind {
        if tx.kind != kind {
            return false;
        }
    }

    match criteria.status {
        StatusFilter::All => {}
        StatusFilter::Success => {
            if !tx.status.is_success() {
                return false;
            }
        }
        StatusFilter::Failed => {
            if tx.status.is_success() {
                return false;
            }
        }
    }

    let tx_millis = tx.block_time as i64 * 1000;
    if let Some(from) = criteria.date_from {
        if let Some(start) = local_day_start_millis(from) {
            if tx_millis < start {
                return false;
            }
        }
    }
    if let Some(to) = criteria.date_to {
        if let Some(end) = local_day_end_millis(to) {
            if tx_millis > end {
                return false;
            }
        }
    }

    // Amount bounds only constrain token transfers; every other kind passes
    if tx.kind == TxKind::TokenTransfer {
        let amount = tx.amount_stx_or_zero();
        if let Some(min) = criteria.min_amount {
            if amount < min {
                return false;
            }
        }
        if let Some(max) = criteria.max_amount {
            if amount > max {
                return false;
            }
        }
    }

    true
}

/// Filter and sort a snapshot of the accumulated set.
///
/// Equal sort keys keep their accumulation order (the sort is stable), so a
/// given snapshot and criteria always export identically.
pub fn apply(transactions: &[Transaction], criteria: &FilterCriteria) -> Vec<Transaction> {
    let mut filtered: Vec<Transaction> = transactions
        .iter()
        .filter(|tx| passes(tx, criteria))
        .cloned()
        .collect();

    filtered.sort_by(|a, b| {
        let ord = match criteria.sort_by {
            SortBy::BlockHeight => a.block_height.cmp(&b.block_height),
            SortBy::BlockTime => a.block_time.cmp(&b.block_time),
            SortBy::Amount => a.amount_stx_or_zero().total_cmp(&b.amount_stx_or_zero()),
        };
        match criteria.sort_order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    });

    filtered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::transaction::{TxEvents, TxPayload, TxStatus};
    use std::collections::HashSet;

    fn tx(id: &str, kind: TxKind, status: TxStatus, height: u64, time: u64, amount: u64) -> Transaction {
        let payload = match kind {
            TxKind::TokenTransfer => TxPayload::TokenTransfer {
                amount_ustx: amount,
                recipient: "SPRECIPIENT".into(),
            },
            TxKind::ContractCall => TxPayload::ContractCall {
                contract_id: "SPX.contract".into(),
                function_name: "do-it".into(),
            },
            TxKind::SmartContract => TxPayload::SmartContract {
                contract_id: "SPX.contract".into(),
                clarity_version: 3,
            },
            TxKind::Coinbase => TxPayload::Coinbase,
            TxKind::PoisonMicroblock => TxPayload::PoisonMicroblock,
        };
        Transaction {
            id: id.to_string(),
            kind,
            status,
            block_height: height,
            block_time: time,
            block_hash: String::new(),
            parent_block_hash: String::new(),
            nonce: 0,
            sender_address: "SPSENDER".into(),
            payload,
            stx_sent_ustx: 0,
            stx_received_ustx: 0,
            events: TxEvents::default(),
        }
    }

    fn sample_set() -> Vec<Transaction> {
        vec![
            tx("0x1", TxKind::TokenTransfer, TxStatus::Success, 100, 1_000, 5_000_000),
            tx("0x2", TxKind::ContractCall, TxStatus::AbortByResponse, 101, 2_000, 0),
            tx("0x3", TxKind::TokenTransfer, TxStatus::Pending, 102, 3_000, 1_000_000),
            tx("0x4", TxKind::Coinbase, TxStatus::Success, 103, 4_000, 0),
            tx("0x5", TxKind::TokenTransfer, TxStatus::Success, 104, 5_000, 0),
        ]
    }

    #[test]
    fn test_apply_is_pure() {
        let set = sample_set();
        let criteria = FilterCriteria {
            status: StatusFilter::Success,
            sort_by: SortBy::Amount,
            sort_order: SortOrder::Desc,
            ..Default::default()
        };
        assert_eq!(apply(&set, &criteria), apply(&set, &criteria));
    }

    #[test]
    fn test_status_partition_covers_all() {
        let set = sample_set();
        let all: HashSet<String> = apply(&set, &FilterCriteria::default())
            .into_iter()
            .map(|t| t.id)
            .collect();
        let success: HashSet<String> = apply(
            &set,
            &FilterCriteria {
                status: StatusFilter::Success,
                ..Default::default()
            },
        )
        .into_iter()
        .map(|t| t.id)
        .collect();
        let failed: HashSet<String> = apply(
            &set,
            &FilterCriteria {
                status: StatusFilter::Failed,
                ..Default::default()
            },
        )
        .into_iter()
        .map(|t| t.id)
        .collect();

        assert!(success.is_disjoint(&failed));
        let union: HashSet<String> = success.union(&failed).cloned().collect();
        assert_eq!(union, all);
        // Pending counts as not-success, so it lands in the failed half
        assert!(failed.contains("0x3"));
    }

    #[test]
    fn test_kind_filter() {
        let set = sample_set();
        let calls = apply(
            &set,
            &FilterCriteria {
                kind: Some(TxKind::ContractCall),
                ..Default::default()
            },
        );
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].id, "0x2");
    }

    #[test]
    fn test_zero_amount_bounds_pass_non_transfers() {
        let set = sample_set();
        let criteria = FilterCriteria {
            min_amount: Some(0.0),
            max_amount: Some(0.0),
            ..Default::default()
        };
        let ids: HashSet<String> = apply(&set, &criteria).into_iter().map(|t| t.id).collect();
        // Non-zero transfers are excluded; non-transfer kinds always pass
        assert!(!ids.contains("0x1"));
        assert!(!ids.contains("0x3"));
        assert!(ids.contains("0x2"));
        assert!(ids.contains("0x4"));
        // The zero-amount transfer satisfies both bounds
        assert!(ids.contains("0x5"));
    }

    #[test]
    fn test_amount_desc_clusters_non_transfers_at_zero() {
        let set = sample_set();
        let sorted = apply(
            &set,
            &FilterCriteria {
                sort_by: SortBy::Amount,
                sort_order: SortOrder::Desc,
                ..Default::default()
            },
        );
        assert_eq!(sorted[0].id, "0x1"); // 5 STX transfer first
        assert_eq!(sorted[1].id, "0x3"); // 1 STX transfer next
        // Everything else keys at 0 and trails
        let tail: Vec<&str> = sorted[2..].iter().map(|t| t.id.as_str()).collect();
        assert_eq!(tail, vec!["0x2", "0x4", "0x5"]);
    }

    #[test]
    fn test_equal_keys_keep_accumulation_order() {
        let set = vec![
            tx("0xb", TxKind::Coinbase, TxStatus::Success, 50, 1_000, 0),
            tx("0xa", TxKind::Coinbase, TxStatus::Success, 50, 1_000, 0),
            tx("0xc", TxKind::Coinbase, TxStatus::Success, 50, 1_000, 0),
        ];
        for order in [SortOrder::Asc, SortOrder::Desc] {
            let sorted = apply(
                &set,
                &FilterCriteria {
                    sort_by: SortBy::BlockHeight,
                    sort_order: order,
                    ..Default::default()
                },
            );
            let ids: Vec<&str> = sorted.iter().map(|t| t.id.as_str()).collect();
            assert_eq!(ids, vec!["0xb", "0xa", "0xc"]);
        }
    }

    #[test]
    fn test_date_range_uses_local_day_bounds() {
        use chrono::Datelike;

        // Anchor a transaction at noon local time on a fixed date
        let date = NaiveDate::from_ymd_opt(2024, 6, 15).expect("valid date");
        let noon = Local
            .from_local_datetime(&date.and_hms_opt(12, 0, 0).expect("valid time"))
            .earliest()
            .expect("resolvable local time");
        let set = vec![tx(
            "0x1",
            TxKind::Coinbase,
            TxStatus::Success,
            1,
            noon.timestamp() as u64,
            0,
        )];

        // Same-day range includes it
        let criteria = FilterCriteria {
            date_from: Some(date),
            date_to: Some(date),
            ..Default::default()
        };
        assert_eq!(apply(&set, &criteria).len(), 1);

        // A range ending the day before excludes it
        let day_before = date.pred_opt().expect("valid date");
        assert_eq!(day_before.year(), 2024);
        let criteria = FilterCriteria {
            date_to: Some(day_before),
            ..Default::default()
        };
        assert!(apply(&set, &criteria).is_empty());

        // A range starting the day after excludes it
        let day_after = date.succ_opt().expect("valid date");
        let criteria = FilterCriteria {
            date_from: Some(day_after),
            ..Default::default()
        };
        assert!(apply(&set, &criteria).is_empty());
    }

    #[test]
    fn test_sort_by_time_desc_is_default_view() {
        let set = sample_set();
        let sorted = apply(&set, &FilterCriteria::default());
        let times: Vec<u64> = sorted.iter().map(|t| t.block_time).collect();
        let mut expected = times.clone();
        expected.sort_unstable_by(|a, b| b.cmp(a));
        assert_eq!(times, expected);
    }
}
