pub mod balance;
pub mod category;
pub mod export;
pub mod help;
pub mod history;
pub mod network;
pub mod transaction;

use std::sync::Arc;

use tracing::error;

use crate::api::hiro::HiroClient;
use crate::chain::categories::resolve_contract;
use crate::chain::wallet::SIGNER_CMD_ENV;
use crate::chain::WalletConnector;
use crate::models::{FilterCriteria, Network, NetworkContext};
use crate::services::category_service::DetailTracker;
use crate::services::history_service::TransactionStore;
use crate::utils::AppError;

/// All state for one interactive session
pub struct Session {
    pub ctx: NetworkContext,
    pub client: HiroClient,
    pub wallet: Arc<dyn WalletConnector>,
    /// Address whose categories are read; set with `connect`
    pub owner: Option<String>,
    /// Accumulated history for the inspected address, if any
    pub store: Option<Arc<TransactionStore>>,
    pub filters: FilterCriteria,
    pub detail: DetailTracker,
}

impl Session {
    pub fn new(network: Network, wallet: Arc<dyn WalletConnector>) -> Self {
        Session {
            ctx: NetworkContext::from_env(network),
            client: HiroClient::new(),
            wallet,
            owner: None,
            store: None,
            filters: FilterCriteria::default(),
            detail: DetailTracker::new(),
        }
    }
}

/// Dispatch one input line. Returns false when the session should end.
pub async fn handle_line(session: &mut Session, line: &str) -> bool {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.is_empty() {
        return true;
    }

    let command = parts[0];
    let args = &parts[1..];

    let result = match command {
        "history" | "h" => history::execute(session, args).await,
        "more" | "m" => history::load_more(session).await,
        "list" | "ls" => history::list(session),
        "filter" => history::filter(session, args),
        "sort" => history::sort(session, args),
        "reset" => history::reset(session),
        "open" | "tx" => transaction::execute(session, args).await,
        "connect" => category::connect(session, args),
        "category" | "cat" => category::execute(session, args).await,
        "balance" | "bal" => balance::execute(session, args).await,
        "export" => export::execute(session, args),
        "network" | "net" => network::execute(session, args),
        "help" | "?" => help::execute(),
        "quit" | "exit" | "q" => return false,
        _ => {
            println!("Unknown command `{}`. Try `help`.", command);
            Ok(())
        }
    };

    if let Err(e) = result {
        error!("Command {} failed: {}", command, e);
        report_error(&e);
    }
    true
}

/// Turn an error into the message the user sees; nothing here is fatal
fn report_error(e: &AppError) {
    match e {
        AppError::Upstream(api) => {
            println!("⚠️  Ledger API problem: {}. Re-run the command to retry.", api)
        }
        AppError::ContractNotConfigured(network) => {
            let env = match network {
                Network::Mainnet => "TX_CATEGORIES_CONTRACT_MAINNET",
                Network::Testnet => "TX_CATEGORIES_CONTRACT_TESTNET",
            };
            println!(
                "❌ Categories are unavailable on {}: set {} to ADDRESS.contract-name.",
                network, env
            );
        }
        AppError::Validation(msg) => println!("❌ {}", msg),
        AppError::WalletCancelled => println!("Signing cancelled; nothing was broadcast."),
        AppError::Wallet(reason) => println!("❌ Wallet error: {}", reason),
        AppError::LoadInProgress => println!("⏳ Still loading the previous page; try again."),
        AppError::Export(msg) => println!("❌ {}", msg),
    }
}

/// One-line status of the session, shown at startup and on `network`
pub fn describe_session(session: &Session) {
    println!(
        "Network: {} ({})",
        session.ctx.network, session.ctx.api_url
    );
    match resolve_contract(session.ctx.network) {
        Some(contract) => println!("Category contract: {}", contract),
        None => println!("Category contract: not configured (reads return nothing, writes fail)"),
    }
    if std::env::var(SIGNER_CMD_ENV).is_err() {
        println!("Signer: not configured ({} unset; writes cannot broadcast)", SIGNER_CMD_ENV);
    }
}
