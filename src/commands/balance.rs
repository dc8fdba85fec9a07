use crate::commands::Session;
use crate::services::balance_service;
use crate::utils::errors::AppError;

/// `balance [address]` — defaults to the inspected address, then the
/// connected one
pub async fn execute(session: &Session, args: &[&str]) -> Result<(), AppError> {
    let address = match args.first() {
        Some(address) => address.to_string(),
        None => session
            .store
            .as_ref()
            .map(|store| store.address().to_string())
            .or_else(|| session.owner.clone())
            .ok_or_else(|| {
                AppError::validation("Usage: balance <address> (or load a history first)")
            })?,
    };

    let balances = balance_service::get_balances(&session.client, &session.ctx, &address).await?;
    print!("{}", balance_service::render_balances(&address, &balances));
    Ok(())
}
