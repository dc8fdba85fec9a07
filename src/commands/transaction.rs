use crate::api::hiro::AddressTransactionEntry;
use crate::commands::Session;
use crate::models::{Transaction, TxPayload};
use crate::services::category_service;
use crate::utils::errors::AppError;
use crate::utils::stx::{abbreviate_hash, format_stx, parse_txid};

/// `open <txid>` — look up a single transaction and show its details.
/// The category, if any, arrives in the background once the read resolves.
pub async fn execute(session: &mut Session, args: &[&str]) -> Result<(), AppError> {
    if args.is_empty() {
        println!("Usage: open <txid>");
        println!("Shows a transaction's details and, when connected, its category.");
        return Ok(());
    }

    let txid = args[0];
    // Reject malformed ids before issuing any request
    parse_txid(txid)?;

    let api_tx = session.client.get_transaction(&session.ctx, txid).await?;
    let tx = AddressTransactionEntry::from_single(api_tx).into_transaction();
    print_detail(session, &tx);

    match session.owner.clone() {
        Some(owner) => {
            // The read rides a liveness token: opening another transaction
            // before it resolves discards this result silently.
            let token = session.detail.begin();
            let short = abbreviate_hash(&tx.id);
            let _read = category_service::spawn_detail_read(
                &session.client,
                &session.ctx,
                &owner,
                &tx.id,
                token,
                move |category| match category {
                    Some(label) => println!("Category for {}: {}", short, label),
                    None => println!("No category set for {}", short),
                },
            );
        }
        None => println!("(connect <address> to see this transaction's category)"),
    }
    Ok(())
}

fn print_detail(session: &Session, tx: &Transaction) {
    println!("Transaction {}", tx.id);
    println!("  Type:    {}", tx.kind.as_str());
    println!("  Status:  {}", tx.status.as_str());
    println!("  Nonce:   {}", tx.nonce);
    println!("  Block:   #{} at {}", tx.block_height, tx.block_time);
    if !tx.block_hash.is_empty() {
        println!("  Block hash:  {}", tx.block_hash);
    }
    if !tx.parent_block_hash.is_empty() {
        println!("  Parent hash: {}", tx.parent_block_hash);
    }
    println!("  Sender:  {}", tx.sender_address);

    match &tx.payload {
        TxPayload::TokenTransfer {
            amount_ustx,
            recipient,
        } => {
            println!("  Transfer: {} to {}", format_stx(*amount_ustx), recipient);
        }
        TxPayload::ContractCall {
            contract_id,
            function_name,
        } => {
            println!("  Call: {} :: {}", contract_id, function_name);
        }
        TxPayload::SmartContract {
            contract_id,
            clarity_version,
        } => {
            println!(
                "  Deploy: {} (clarity {})",
                contract_id, clarity_version
            );
        }
        TxPayload::Coinbase => println!("  Coinbase reward"),
        TxPayload::PoisonMicroblock => println!("  Poison microblock report"),
    }
    println!("  Explorer: {}", session.ctx.explorer_tx_url(&tx.id));
}
