use std::sync::Arc;

use chrono::NaiveDate;

use crate::chain::c32::validate_address;
use crate::commands::Session;
use crate::models::filter::{SortBy, SortOrder, StatusFilter};
use crate::models::{FilterCriteria, Transaction, TxKind, TxPayload};
use crate::services::history_service::TransactionStore;
use crate::services::{filter_service, history_service};
use crate::utils::errors::AppError;
use crate::utils::stx::{abbreviate_address, abbreviate_hash, microstx_to_stx};
use crate::utils::Table;

pub async fn execute(session: &mut Session, args: &[&str]) -> Result<(), AppError> {
    if args.is_empty() {
        println!("Usage: history <address>");
        println!("Loads the first page of an address's transactions, newest first.");
        println!("Follow with `more`, `filter`, `sort`, `open`, or `export`.");
        return Ok(());
    }

    let address = args[0];
    validate_address(address, session.ctx.network)?;

    let store = Arc::new(TransactionStore::new(session.ctx.clone(), address));
    store.load_more(&session.client).await?;
    println!(
        "Loaded {} of {} transactions for {}",
        store.len(),
        store.total(),
        address
    );
    session.store = Some(store);
    list(session)
}

pub async fn load_more(session: &mut Session) -> Result<(), AppError> {
    let store = session
        .store
        .as_ref()
        .ok_or_else(|| AppError::validation("Load an address first: history <address>"))?;

    if !store.has_more() {
        println!("All {} transactions are already loaded.", store.len());
        return Ok(());
    }
    let added = store.load_more(&session.client).await?;
    println!(
        "Fetched {} more ({} of {} loaded)",
        added,
        store.len(),
        store.total()
    );
    list(session)
}

/// One-line summary of what a transaction did
fn summary(tx: &Transaction) -> String {
    match &tx.payload {
        TxPayload::TokenTransfer {
            amount_ustx,
            recipient,
        } => format!(
            "{:.2} STX → {}",
            microstx_to_stx(*amount_ustx),
            abbreviate_address(recipient)
        ),
        TxPayload::ContractCall {
            contract_id,
            function_name,
        } => {
            let name = contract_id.split('.').nth(1).unwrap_or(contract_id);
            format!("{} ({})", function_name, name)
        }
        TxPayload::SmartContract { contract_id, .. } => format!("deploy {}", contract_id),
        TxPayload::Coinbase => format!("block #{}", tx.block_height),
        TxPayload::PoisonMicroblock => "microblock".to_string(),
    }
}

/// Render the current filtered view. Duplicate ids are dropped here, on the
/// render path, never inside the store.
pub fn list(session: &Session) -> Result<(), AppError> {
    let store = session
        .store
        .as_ref()
        .ok_or_else(|| AppError::validation("Load an address first: history <address>"))?;

    let accumulated = history_service::dedup_by_id(store.snapshot());
    let accumulated_len = accumulated.len();
    let view = filter_service::apply(&accumulated, &session.filters);
    let (offset, limit) = store.last_page_window();
    tracing::debug!(offset, limit, shown = view.len(), "Rendering view");

    if view.is_empty() {
        println!(
            "No transactions match the current filters on {}.",
            store.context().network
        );
    } else {
        let mut table = Table::new(vec!["Txid", "Type", "Status", "Block", "Nonce", "Summary"]);
        for tx in &view {
            table.add_row(vec![
                abbreviate_hash(&tx.id),
                tx.kind.as_str().to_string(),
                tx.status.as_str().to_string(),
                tx.block_height.to_string(),
                tx.nonce.to_string(),
                summary(tx),
            ]);
        }
        print!("{}", table.render());
    }

    println!(
        "{} of {} shown{} · {} upstream total{}",
        view.len(),
        accumulated_len,
        if session.filters.is_active() { " (filtered)" } else { "" },
        store.total(),
        if store.has_more() { " · `more` to load" } else { "" }
    );
    Ok(())
}

fn parse_date(value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Expected a YYYY-MM-DD date, got `{}`", value)))
}

fn parse_amount(value: &str) -> Result<f64, AppError> {
    let amount: f64 = value
        .parse()
        .map_err(|_| AppError::validation(format!("Expected an STX amount, got `{}`", value)))?;
    if !amount.is_finite() || amount < 0.0 {
        return Err(AppError::validation("Amounts must be non-negative"));
    }
    Ok(amount)
}

/// `filter key=value ...` — builds a full replacement criteria value, so a
/// bad key or value leaves the current filters untouched
pub fn filter(session: &mut Session, args: &[&str]) -> Result<(), AppError> {
    if args.is_empty() {
        println!("Usage: filter kind=<kind|all> status=<all|success|failed>");
        println!("              from=<YYYY-MM-DD|none> to=<YYYY-MM-DD|none>");
        println!("              min=<stx|none> max=<stx|none>");
        println!("       filter clear");
        println!("Current: {:?}", session.filters);
        return Ok(());
    }

    if args == ["clear"] {
        session.filters = FilterCriteria {
            sort_by: session.filters.sort_by,
            sort_order: session.filters.sort_order,
            ..Default::default()
        };
        return if session.store.is_some() {
            list(session)
        } else {
            println!("Filters cleared.");
            Ok(())
        };
    }

    let mut criteria = session.filters.clone();
    for arg in args {
        let (key, value) = arg.split_once('=').ok_or_else(|| {
            AppError::validation(format!("Expected key=value, got `{}`", arg))
        })?;
        match key {
            "kind" | "type" => {
                criteria.kind = if value == "all" {
                    None
                } else {
                    Some(TxKind::parse(value).ok_or_else(|| {
                        AppError::validation(format!("Unknown transaction kind `{}`", value))
                    })?)
                };
            }
            "status" => {
                criteria.status = StatusFilter::parse(value).ok_or_else(|| {
                    AppError::validation(format!("Unknown status filter `{}`", value))
                })?;
            }
            "from" => {
                criteria.date_from = if value == "none" {
                    None
                } else {
                    Some(parse_date(value)?)
                };
            }
            "to" => {
                criteria.date_to = if value == "none" {
                    None
                } else {
                    Some(parse_date(value)?)
                };
            }
            "min" => {
                criteria.min_amount = if value == "none" {
                    None
                } else {
                    Some(parse_amount(value)?)
                };
            }
            "max" => {
                criteria.max_amount = if value == "none" {
                    None
                } else {
                    Some(parse_amount(value)?)
                };
            }
            other => {
                return Err(AppError::validation(format!(
                    "Unknown filter key `{}`",
                    other
                )))
            }
        }
    }

    // Replace wholesale only once every part parsed
    session.filters = criteria;
    if session.store.is_some() {
        list(session)
    } else {
        println!("Filters set.");
        Ok(())
    }
}

/// `sort <height|time|amount> [asc|desc]`
pub fn sort(session: &mut Session, args: &[&str]) -> Result<(), AppError> {
    if args.is_empty() {
        println!("Usage: sort <height|time|amount> [asc|desc]");
        return Ok(());
    }
    let sort_by = SortBy::parse(args[0])
        .ok_or_else(|| AppError::validation(format!("Unknown sort key `{}`", args[0])))?;
    let sort_order = match args.get(1) {
        Some(raw) => SortOrder::parse(raw)
            .ok_or_else(|| AppError::validation(format!("Unknown sort order `{}`", raw)))?,
        None => session.filters.sort_order,
    };

    session.filters = FilterCriteria {
        sort_by,
        sort_order,
        ..session.filters.clone()
    };
    if session.store.is_some() {
        list(session)
    } else {
        Ok(())
    }
}

/// Reset filters and sorting to the defaults
pub fn reset(session: &mut Session) -> Result<(), AppError> {
    session.filters = FilterCriteria::default();
    if session.store.is_some() {
        list(session)
    } else {
        println!("Filters reset.");
        Ok(())
    }
}
