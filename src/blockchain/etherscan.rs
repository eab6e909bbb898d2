//! Etherscan explorer client: historical transaction queries that a plain
//! node cannot answer. Records are passed through exactly as the API returns
//! them; no normalization.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::core::domain::{AssetKind, Token};
use crate::core::errors::WalletError;

/// Explorer API client. The base URL comes from the network resolver
/// (`http://api.etherscan.io` on mainnet, `http://api-<network>.etherscan.io`
/// elsewhere).
pub struct EtherscanClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

/// Etherscan response envelope. `result` stays opaque.
#[derive(Debug, Deserialize)]
struct EtherscanResponse {
    status: String,
    message: String,
    result: Value,
}

impl EtherscanClient {
    pub fn new(client: reqwest::Client, base_url: &str, api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// All transactions of `address` concerning the given asset, from block 0
    /// to the latest, ascending. Native assets use the `txlist` action; ERC-20
    /// tokens use `tokentx` filtered by contract address.
    pub async fn transactions_for(
        &self,
        address: &str,
        token: &Token,
    ) -> Result<Vec<Value>, WalletError> {
        let url = match &token.kind {
            AssetKind::Native => format!(
                "{}/api?module=account&action=txlist&address={}&startblock=0&endblock=99999999&sort=asc&apikey={}",
                self.base_url, address, self.api_key
            ),
            AssetKind::Erc20 { contract_address } => format!(
                "{}/api?module=account&action=tokentx&contractaddress={}&address={}&startblock=0&endblock=99999999&sort=asc&apikey={}",
                self.base_url, contract_address, address, self.api_key
            ),
        };
        debug!(address = %address, symbol = %token.symbol, "fetching transaction history");

        let response: EtherscanResponse = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| WalletError::NetworkRequest(e.to_string()))?
            .json()
            .await
            .map_err(|e| WalletError::NetworkRequest(format!("malformed JSON response: {}", e)))?;

        let records = match response.result {
            Value::Array(records) => records,
            other => {
                return Err(WalletError::NetworkRequest(format!(
                    "Etherscan error: {} ({})",
                    response.message, other
                )))
            }
        };
        // Etherscan reports an empty history as status "0" with the message
        // "No transactions found"; that exact envelope is not a failure.
        // Every other non-"1" status (NOTOK, rate limits) is, even when it
        // carries an empty result array.
        if response.status != "1" {
            if records.is_empty() && response.message.starts_with("No transactions found") {
                return Ok(records);
            }
            return Err(WalletError::NetworkRequest(format!(
                "Etherscan error: {}",
                response.message
            )));
        }
        Ok(records)
    }
}
