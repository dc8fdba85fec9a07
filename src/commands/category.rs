use crate::chain::c32::validate_address;
use crate::chain::WalletOutcome;
use crate::commands::Session;
use crate::models::category::SUGGESTED_CATEGORIES;
use crate::services::category_service;
use crate::utils::errors::AppError;
use crate::utils::stx::parse_txid;

/// `connect <address>` — declare the address whose categories are read.
/// Writes are keyed by the signer's own address on-chain; this only scopes
/// reads.
pub fn connect(session: &mut Session, args: &[&str]) -> Result<(), AppError> {
    if args.is_empty() {
        match &session.owner {
            Some(owner) => println!("Connected as {}", owner),
            None => println!("Usage: connect <address>"),
        }
        return Ok(());
    }

    let address = args[0];
    validate_address(address, session.ctx.network)?;
    session.owner = Some(address.to_string());
    println!("Connected as {} on {}", address, session.ctx.network);
    Ok(())
}

pub async fn execute(session: &mut Session, args: &[&str]) -> Result<(), AppError> {
    if args.is_empty() {
        println!("Usage: category get <txid>");
        println!("       category set <txid> <label>");
        println!("Suggested labels: {}", SUGGESTED_CATEGORIES.join(", "));
        return Ok(());
    }

    match args[0] {
        "get" => get(session, &args[1..]).await,
        "set" => set(session, &args[1..]).await,
        other => Err(AppError::validation(format!(
            "Unknown category action `{}` (get/set)",
            other
        ))),
    }
}

async fn get(session: &Session, args: &[&str]) -> Result<(), AppError> {
    let txid = args
        .first()
        .ok_or_else(|| AppError::validation("Usage: category get <txid>"))?;
    parse_txid(txid)?;
    let owner = session
        .owner
        .clone()
        .ok_or_else(|| AppError::validation("Connect first: connect <address>"))?;

    match category_service::get_category(&session.client, &session.ctx, &owner, txid).await {
        Some(label) => println!("Category: {}", label),
        None => println!("No category set."),
    }
    Ok(())
}

async fn set(session: &Session, args: &[&str]) -> Result<(), AppError> {
    if args.len() < 2 {
        return Err(AppError::validation("Usage: category set <txid> <label>"));
    }
    let txid = args[0];
    // Labels may contain spaces; everything after the txid is the label
    let label = args[1..].join(" ");

    let outcome =
        category_service::set_category(session.wallet.as_ref(), &session.ctx, txid, &label).await?;
    match outcome {
        WalletOutcome::Submitted { txid: submitted } => {
            println!("Broadcast as {}", submitted);
            println!("The category will show up once the transaction is mined.");
            println!("  Explorer: {}", session.ctx.explorer_tx_url(&submitted));
            Ok(())
        }
        WalletOutcome::Cancelled => Err(AppError::WalletCancelled),
        WalletOutcome::Failed { reason } => Err(AppError::Wallet(reason)),
    }
}
