use reqwest::Client as HttpClient;
use serde_json::json;
use tracing::warn;

use super::models::{
    AddressBalanceResponse, ApiError, ApiTransaction, ReadOnlyCallResponse, TransactionPage,
};
use crate::chain::clarity::ClarityValue;
use crate::chain::ContractId;
use crate::models::network::NetworkContext;

/// Default page size for address transaction history
pub const DEFAULT_PAGE_LIMIT: u64 = 20;

/// Ledger API client for the Hiro extended endpoints
///
/// Purely read-only; retries are a caller policy, never applied here.
#[derive(Clone)]
pub struct HiroClient {
    http_client: HttpClient,
}

impl HiroClient {
    /// Create a new ledger API client
    pub fn new() -> Self {
        Self {
            http_client: HttpClient::new(),
        }
    }

    /// Parse error response based on HTTP status code
    async fn handle_error_response(
        status: reqwest::StatusCode,
        response: reqwest::Response,
    ) -> ApiError {
        let status_code = status.as_u16();
        let body_text = response.text().await.unwrap_or_default();

        match status_code {
            400 => {
                // Try to parse a JSON error body for the message
                if let Ok(err_json) = serde_json::from_str::<serde_json::Value>(&body_text) {
                    let message = err_json
                        .get("error")
                        .or_else(|| err_json.get("message"))
                        .and_then(|v| v.as_str())
                        .unwrap_or(&body_text);
                    ApiError::BadRequest(message.to_string())
                } else {
                    ApiError::BadRequest(body_text)
                }
            }
            404 => ApiError::NotFound(body_text),
            429 => {
                warn!("Ledger API rate limited the request");
                ApiError::RateLimited(body_text)
            }
            500..=599 => {
                warn!("Ledger API server error {}: {}", status_code, body_text);
                ApiError::ServerError(status_code as i32, body_text)
            }
            _ => ApiError::HttpError(status_code as i32, body_text),
        }
    }

    /// GET /extended/v1/address/{address}/transactions
    ///
    /// Retrieves one page of an address's transaction history at the given
    /// offset. A response without a `results` field is an error, not an
    /// empty page.
    pub async fn get_address_transactions(
        &self,
        ctx: &NetworkContext,
        address: &str,
        offset: u64,
        limit: u64,
    ) -> Result<TransactionPage, ApiError> {
        let url = format!(
            "{}/extended/v1/address/{}/transactions?limit={}&offset={}",
            ctx.api_url, address, limit, offset
        );

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| ApiError::RequestError(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(Self::handle_error_response(status, response).await);
        }

        response
            .json::<TransactionPage>()
            .await
            .map_err(|e| ApiError::DeserializationError(format!("Failed to parse page: {}", e)))
    }

    /// GET /extended/v1/tx/{txid}
    ///
    /// Looks up a single transaction by id. Missing optional fields decode
    /// to defensive defaults so a partially populated response still renders.
    pub async fn get_transaction(
        &self,
        ctx: &NetworkContext,
        txid: &str,
    ) -> Result<ApiTransaction, ApiError> {
        let url = format!("{}/extended/v1/tx/{}", ctx.api_url, txid);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| ApiError::RequestError(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(Self::handle_error_response(status, response).await);
        }

        response
            .json::<ApiTransaction>()
            .await
            .map_err(|e| {
                ApiError::DeserializationError(format!("Failed to parse transaction: {}", e))
            })
    }

    /// GET /extended/v1/address/{address}/balances
    pub async fn get_address_balances(
        &self,
        ctx: &NetworkContext,
        address: &str,
    ) -> Result<AddressBalanceResponse, ApiError> {
        let url = format!("{}/extended/v1/address/{}/balances", ctx.api_url, address);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| ApiError::RequestError(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(Self::handle_error_response(status, response).await);
        }

        response
            .json::<AddressBalanceResponse>()
            .await
            .map_err(|e| ApiError::DeserializationError(format!("Failed to parse balances: {}", e)))
    }

    /// POST /v2/contracts/call-read/{address}/{name}/{function}
    ///
    /// Runs a read-only contract function with hex-serialized arguments and
    /// returns the node's `{okay, result}` envelope; the result stays hex
    /// for the caller's decoding layer.
    pub async fn call_read_only(
        &self,
        ctx: &NetworkContext,
        contract: &ContractId,
        function: &str,
        sender: &str,
        args: &[ClarityValue],
    ) -> Result<ReadOnlyCallResponse, ApiError> {
        let url = format!(
            "{}/v2/contracts/call-read/{}/{}/{}",
            ctx.api_url, contract.address, contract.name, function
        );

        let mut arguments = Vec::with_capacity(args.len());
        for arg in args {
            let hex = arg
                .serialize_hex()
                .map_err(|e| ApiError::RequestError(format!("Bad call argument: {}", e)))?;
            arguments.push(hex);
        }
        let body = json!({ "sender": sender, "arguments": arguments });

        let response = self
            .http_client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::RequestError(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(Self::handle_error_response(status, response).await);
        }

        response
            .json::<ReadOnlyCallResponse>()
            .await
            .map_err(|e| {
                ApiError::DeserializationError(format!("Failed to parse call result: {}", e))
            })
    }
}

impl Default for HiroClient {
    fn default() -> Self {
        Self::new()
    }
}
