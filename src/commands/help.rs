use crate::utils::errors::AppError;

pub fn execute() -> Result<(), AppError> {
    println!("Commands:");
    println!("  history <address>           load the first page of an address's transactions");
    println!("  more                        fetch the next page");
    println!("  list                        re-render the current filtered view");
    println!("  filter key=value ...        kind/status/from/to/min/max (filter clear resets)");
    println!("  sort <height|time|amount> [asc|desc]");
    println!("  reset                       clear filters and sorting");
    println!("  open <txid>                 show one transaction's details and category");
    println!("  connect <address>           choose whose categories to read");
    println!("  category get <txid>         read the on-chain category");
    println!("  category set <txid> <label> write a category via the signer");
    println!("  balance [address]           STX and token balances");
    println!("  export <csv|json|xlsx> [balance] [events]");
    println!("  network [mainnet|testnet]   show or switch networks");
    println!("  quit");
    Ok(())
}
