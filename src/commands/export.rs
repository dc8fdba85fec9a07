use crate::commands::Session;
use crate::services::export_service::{self, ExportFormat, ExportOptions};
use crate::services::{filter_service, history_service};
use crate::utils::errors::AppError;

/// `export <csv|json|xlsx> [balance] [events]` — writes the current filtered
/// view, in its displayed order, to a file in the working directory
pub fn execute(session: &Session, args: &[&str]) -> Result<(), AppError> {
    if args.is_empty() {
        println!("Usage: export <csv|json|xlsx> [balance] [events]");
        println!("  balance  include per-transaction STX sent/received");
        println!("  events   include event counts");
        return Ok(());
    }

    let format = ExportFormat::parse(args[0])
        .ok_or_else(|| AppError::validation(format!("Unknown export format `{}`", args[0])))?;
    let options = ExportOptions {
        format,
        include_balance: args.contains(&"balance"),
        include_events: args.contains(&"events"),
    };

    let store = session
        .store
        .as_ref()
        .ok_or_else(|| AppError::validation("Load an address first: history <address>"))?;

    let view = filter_service::apply(
        &history_service::dedup_by_id(store.snapshot()),
        &session.filters,
    );
    if view.is_empty() {
        println!("Nothing to export: the current view is empty.");
        return Ok(());
    }

    let filename = export_service::export_to_file(&view, store.address(), &options)?;
    println!("Exported {} transactions to {}", view.len(), filename);
    Ok(())
}
