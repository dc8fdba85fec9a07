//! Address balance lookup and formatting

use crate::api::hiro::{AddressBalanceResponse, HiroClient};
use crate::chain::c32::validate_address;
use crate::models::network::NetworkContext;
use crate::utils::errors::AppError;
use crate::utils::stx::format_stx;

/// Fetch the balances for an address, validating it for the active network
/// before any request goes out
pub async fn get_balances(
    client: &HiroClient,
    ctx: &NetworkContext,
    address: &str,
) -> Result<AddressBalanceResponse, AppError> {
    validate_address(address, ctx.network)?;
    let balances = client.get_address_balances(ctx, address).await?;
    Ok(balances)
}

fn ustx(raw: &str) -> String {
    format_stx(raw.parse().unwrap_or(0))
}

/// Human-readable balance report
pub fn render_balances(address: &str, balances: &AddressBalanceResponse) -> String {
    let stx = &balances.stx;
    let mut out = String::new();
    out.push_str(&format!("Balances for {}\n", address));
    out.push_str(&format!("  STX balance:    {}\n", ustx(&stx.balance)));
    if stx.locked != "0" {
        out.push_str(&format!(
            "  Locked:         {} (until burn height {})\n",
            ustx(&stx.locked),
            stx.burnchain_unlock_height
        ));
    }
    out.push_str(&format!("  Total sent:     {}\n", ustx(&stx.total_sent)));
    out.push_str(&format!("  Total received: {}\n", ustx(&stx.total_received)));
    out.push_str(&format!("  Fees paid:      {}\n", ustx(&stx.total_fees_sent)));
    if stx.total_miner_rewards_received != "0" {
        out.push_str(&format!(
            "  Miner rewards:  {}\n",
            ustx(&stx.total_miner_rewards_received)
        ));
    }

    if !balances.fungible_tokens.is_empty() {
        out.push_str(&format!(
            "  Fungible tokens: {}\n",
            balances.fungible_tokens.len()
        ));
        let mut names: Vec<&String> = balances.fungible_tokens.keys().collect();
        names.sort();
        for name in names {
            let ft = &balances.fungible_tokens[name];
            out.push_str(&format!("    {}: {}\n", name, ft.balance));
        }
    }
    if !balances.non_fungible_tokens.is_empty() {
        out.push_str(&format!(
            "  NFT collections: {}\n",
            balances.non_fungible_tokens.len()
        ));
    }
    out
}
