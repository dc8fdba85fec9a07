use crate::commands::{describe_session, Session};
use crate::models::network::{Network, NetworkContext};
use crate::utils::errors::AppError;

/// `network [mainnet|testnet]` — show or switch the active network.
/// The API base URL and category contract always switch together, and the
/// accumulated history is discarded because it is scoped to address+network.
pub fn execute(session: &mut Session, args: &[&str]) -> Result<(), AppError> {
    let Some(raw) = args.first() else {
        describe_session(session);
        return Ok(());
    };

    let network = Network::parse(raw)?;
    if network == session.ctx.network {
        println!("Already on {}", network);
        return Ok(());
    }

    session.ctx = NetworkContext::from_env(network);
    session.store = None;
    // Addresses are network-specific, so the connected owner resets too
    session.owner = None;
    println!("Switched to {}; history and connection cleared.", network);
    describe_session(session);
    Ok(())
}
