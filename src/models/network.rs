//! Network selection threaded explicitly through every chain-facing call

use std::fmt;

use crate::utils::errors::AppError;

/// A Stacks network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Network {
    Mainnet,
    Testnet,
}

impl Network {
    pub fn parse(s: &str) -> Result<Self, AppError> {
        match s.to_lowercase().as_str() {
            "mainnet" => Ok(Network::Mainnet),
            "testnet" => Ok(Network::Testnet),
            other => Err(AppError::validation(format!(
                "Unknown network `{}` (expected mainnet or testnet)",
                other
            ))),
        }
    }

    /// Default ledger API base URL for this network
    pub fn default_api_url(&self) -> &'static str {
        match self {
            Network::Mainnet => "https://api.hiro.so",
            Network::Testnet => "https://api.testnet.hiro.so",
        }
    }

    /// Env var holding an API base URL override
    fn api_url_env(&self) -> &'static str {
        match self {
            Network::Mainnet => "STACKS_API_URL_MAINNET",
            Network::Testnet => "STACKS_API_URL_TESTNET",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Mainnet => write!(f, "mainnet"),
            Network::Testnet => write!(f, "testnet"),
        }
    }
}

/// Resolved network context: the network and the API base URL it implies.
///
/// Passed by value into the API client, category bridge, and export paths so
/// the ledger API and the contract identifier always come from the same
/// selection. There is no ambient network global.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkContext {
    pub network: Network,
    pub api_url: String,
}

impl NetworkContext {
    /// Build a context with the network's default API URL
    pub fn new(network: Network) -> Self {
        NetworkContext {
            network,
            api_url: network.default_api_url().to_string(),
        }
    }

    /// Build a context, honoring a per-network API URL override from the env
    pub fn from_env(network: Network) -> Self {
        let mut ctx = NetworkContext::new(network);
        if let Some(url) = std::env::var(network.api_url_env())
            .ok()
            .filter(|v| !v.trim().is_empty())
        {
            ctx.api_url = url;
        }
        ctx
    }

    /// Explorer link for a transaction on this network
    pub fn explorer_tx_url(&self, txid: &str) -> String {
        match self.network {
            Network::Mainnet => format!("https://explorer.hiro.so/txid/{}", txid),
            Network::Testnet => format!("https://explorer.hiro.so/txid/{}?chain=testnet", txid),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_network() {
        assert_eq!(Network::parse("mainnet").expect("parses"), Network::Mainnet);
        assert_eq!(Network::parse("Testnet").expect("parses"), Network::Testnet);
        assert!(Network::parse("devnet").is_err());
    }

    #[test]
    fn test_context_defaults_follow_network() {
        let ctx = NetworkContext::new(Network::Testnet);
        assert_eq!(ctx.api_url, "https://api.testnet.hiro.so");
        assert!(ctx.explorer_tx_url("0xabc").ends_with("?chain=testnet"));

        let ctx = NetworkContext::new(Network::Mainnet);
        assert_eq!(ctx.api_url, "https://api.hiro.so");
    }
}
