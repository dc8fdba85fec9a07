use std::io::Write as _;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod api;
mod chain;
mod commands;
mod models;
mod services;
mod utils;

use chain::wallet::ExternalSignerWallet;
use commands::Session;
use models::network::Network;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("stacktrail=info".parse().expect("valid directive")),
        )
        .with_target(false)
        .init();

    info!("Starting stacktrail...");

    let network = std::env::var("STACKS_NETWORK")
        .ok()
        .and_then(|raw| Network::parse(&raw).ok())
        .unwrap_or(Network::Mainnet);

    let mut session = Session::new(network, Arc::new(ExternalSignerWallet));

    println!("stacktrail — Stacks account history inspector");
    commands::describe_session(&session);
    println!("Type `help` for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("stacktrail> ");
        if std::io::stdout().flush().is_err() {
            break;
        }

        match lines.next_line().await {
            Ok(Some(line)) => {
                if !commands::handle_line(&mut session, &line).await {
                    break;
                }
            }
            Ok(None) => break,
            Err(e) => {
                error!("Failed to read input: {}", e);
                break;
            }
        }
    }
    println!("Goodbye.");
}
