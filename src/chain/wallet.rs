//! Wallet connector seam for on-chain writes
//!
//! A write never signs inside this process. The connector owns the approval
//! prompt and the broadcast; callers observe a single three-outcome result
//! instead of juggling completion callbacks.

use async_trait::async_trait;
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn};

use crate::chain::categories::ContractId;
use crate::chain::clarity::ClarityValue;
use crate::models::network::Network;

/// A contract call awaiting signature and broadcast
#[derive(Debug, Clone)]
pub struct ContractCallRequest {
    pub contract: ContractId,
    pub function_name: String,
    pub args: Vec<ClarityValue>,
    pub network: Network,
}

/// Terminal outcome of one write attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletOutcome {
    Submitted { txid: String },
    Cancelled,
    Failed { reason: String },
}

/// Observable states of the write flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteState {
    Idle,
    AwaitingSignature,
    Broadcasting,
    Submitted,
    Cancelled,
    Failed,
}

impl WriteState {
    /// Terminal state implied by a wallet outcome
    pub fn from_outcome(outcome: &WalletOutcome) -> Self {
        match outcome {
            WalletOutcome::Submitted { .. } => WriteState::Submitted,
            WalletOutcome::Cancelled => WriteState::Cancelled,
            WalletOutcome::Failed { .. } => WriteState::Failed,
        }
    }
}

#[async_trait]
pub trait WalletConnector: Send + Sync {
    /// Run the approval + broadcast flow for one contract call
    async fn request_contract_call(&self, request: ContractCallRequest) -> WalletOutcome;
}

/// Env var naming the external signer command
pub const SIGNER_CMD_ENV: &str = "STX_SIGNER_CMD";

/// Connector used by the CLI: asks for approval on the terminal, then pipes
/// the request as JSON to an external signer command which broadcasts and
/// prints the transaction id.
pub struct ExternalSignerWallet;

#[derive(Serialize)]
struct SignerRequest<'a> {
    contract_address: &'a str,
    contract_name: &'a str,
    function_name: &'a str,
    function_args_hex: Vec<String>,
    network: String,
}

impl ExternalSignerWallet {
    async fn prompt_approval(request: &ContractCallRequest) -> std::io::Result<bool> {
        let mut stdout = tokio::io::stdout();
        stdout
            .write_all(
                format!(
                    "Sign contract call {}.{} :: {} on {}? [y/N] ",
                    request.contract.address,
                    request.contract.name,
                    request.function_name,
                    request.network
                )
                .as_bytes(),
            )
            .await?;
        stdout.flush().await?;

        let mut line = String::new();
        BufReader::new(tokio::io::stdin()).read_line(&mut line).await?;
        let answer = line.trim().to_lowercase();
        Ok(answer == "y" || answer == "yes")
    }

    async fn broadcast(request: &ContractCallRequest) -> WalletOutcome {
        let signer_cmd = match std::env::var(SIGNER_CMD_ENV) {
            Ok(cmd) if !cmd.trim().is_empty() => cmd,
            _ => {
                return WalletOutcome::Failed {
                    reason: format!("{} not set; cannot broadcast", SIGNER_CMD_ENV),
                }
            }
        };

        let mut args_hex = Vec::with_capacity(request.args.len());
        for arg in &request.args {
            match arg.serialize_hex() {
                Ok(hex) => args_hex.push(hex),
                Err(e) => {
                    return WalletOutcome::Failed {
                        reason: format!("Failed to serialize argument: {}", e),
                    }
                }
            }
        }

        let payload = SignerRequest {
            contract_address: &request.contract.address,
            contract_name: &request.contract.name,
            function_name: &request.function_name,
            function_args_hex: args_hex,
            network: request.network.to_string(),
        };
        let body = match serde_json::to_vec(&payload) {
            Ok(body) => body,
            Err(e) => {
                return WalletOutcome::Failed {
                    reason: format!("Failed to encode signer request: {}", e),
                }
            }
        };

        let mut child = match tokio::process::Command::new("sh")
            .arg("-c")
            .arg(&signer_cmd)
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                return WalletOutcome::Failed {
                    reason: format!("Failed to launch signer: {}", e),
                }
            }
        };

        if let Some(mut stdin) = child.stdin.take() {
            if let Err(e) = stdin.write_all(&body).await {
                return WalletOutcome::Failed {
                    reason: format!("Failed to hand request to signer: {}", e),
                };
            }
        }

        let output = match child.wait_with_output().await {
            Ok(output) => output,
            Err(e) => {
                return WalletOutcome::Failed {
                    reason: format!("Signer did not finish: {}", e),
                }
            }
        };
        if !output.status.success() {
            return WalletOutcome::Failed {
                reason: format!("Signer exited with {}", output.status),
            };
        }

        let txid = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if txid.is_empty() {
            return WalletOutcome::Failed {
                reason: "Signer produced no transaction id".to_string(),
            };
        }
        WalletOutcome::Submitted { txid }
    }
}

#[async_trait]
impl WalletConnector for ExternalSignerWallet {
    async fn request_contract_call(&self, request: ContractCallRequest) -> WalletOutcome {
        info!(
            contract = %request.contract,
            function = %request.function_name,
            "Awaiting signature approval"
        );
        match Self::prompt_approval(&request).await {
            Ok(true) => {}
            Ok(false) => return WalletOutcome::Cancelled,
            Err(e) => {
                warn!("Approval prompt failed: {}", e);
                return WalletOutcome::Failed {
                    reason: format!("Approval prompt failed: {}", e),
                };
            }
        }

        info!(state = ?WriteState::Broadcasting, "Broadcasting via external signer");
        Self::broadcast(&request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_state_follows_outcome() {
        assert_eq!(
            WriteState::from_outcome(&WalletOutcome::Submitted { txid: "0xab".into() }),
            WriteState::Submitted
        );
        assert_eq!(
            WriteState::from_outcome(&WalletOutcome::Cancelled),
            WriteState::Cancelled
        );
        assert_eq!(
            WriteState::from_outcome(&WalletOutcome::Failed {
                reason: "boom".into()
            }),
            WriteState::Failed
        );
    }
}
