//! Ethplorer token-indexer client and token catalog sync.
//!
//! The indexer only covers mainnet; on any other network the sync is a
//! documented no-op. A response without a `tokens` field means the address
//! holds no tokens, also not an error.

use serde::Deserialize;
use tracing::debug;

use crate::core::config::Network;
use crate::core::domain::Token;
use crate::core::errors::WalletError;
use crate::store::WalletStore;

pub const DEFAULT_BASE_URL: &str = "https://api.ethplorer.io";

pub struct EthplorerClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct AddressInfo {
    tokens: Option<Vec<TokenHolding>>,
}

#[derive(Debug, Deserialize)]
struct TokenHolding {
    #[serde(rename = "tokenInfo")]
    token_info: TokenInfo,
}

#[derive(Debug, Deserialize)]
struct TokenInfo {
    address: String,
    // Ethplorer emits decimals as either a JSON number or a string.
    decimals: serde_json::Value,
    #[serde(default)]
    name: String,
    #[serde(default)]
    symbol: String,
}

impl TokenInfo {
    fn parsed_decimals(&self) -> Result<u32, WalletError> {
        match &self.decimals {
            serde_json::Value::Number(n) => n
                .as_u64()
                .and_then(|v| u32::try_from(v).ok())
                .ok_or_else(|| decimals_error(&self.address)),
            serde_json::Value::String(s) => {
                s.parse::<u32>().map_err(|_| decimals_error(&self.address))
            }
            _ => Err(decimals_error(&self.address)),
        }
    }
}

fn decimals_error(contract: &str) -> WalletError {
    WalletError::NetworkRequest(format!("unparseable decimals for token {}", contract))
}

impl EthplorerClient {
    pub fn new(client: reqwest::Client, base_url: &str, api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// The ERC-20 holdings of `address` according to the indexer. An absent
    /// `tokens` field yields an empty list.
    pub async fn address_tokens(&self, address: &str) -> Result<Vec<Token>, WalletError> {
        let url = format!("{}/getAddressInfo/{}?apiKey={}", self.base_url, address, self.api_key);
        debug!(address = %address, "fetching token holdings");

        let info: AddressInfo = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| WalletError::NetworkRequest(e.to_string()))?
            .json()
            .await
            .map_err(|e| WalletError::NetworkRequest(format!("malformed JSON response: {}", e)))?;

        let holdings = match info.tokens {
            Some(holdings) => holdings,
            None => return Ok(Vec::new()),
        };

        holdings
            .into_iter()
            .map(|holding| {
                let decimals = holding.token_info.parsed_decimals()?;
                Ok(Token::erc20(
                    &holding.token_info.address,
                    decimals,
                    &holding.token_info.name,
                    &holding.token_info.symbol,
                ))
            })
            .collect()
    }
}

/// Merge the current address's holdings into the store's token set.
///
/// No-op (zero HTTP calls) off mainnet. Returns the number of tokens added;
/// holdings already known by contract address are left untouched.
pub async fn sync_tokens(
    store: &WalletStore,
    client: &EthplorerClient,
) -> Result<usize, WalletError> {
    if store.network() != Network::Mainnet {
        debug!(network = %store.network(), "token sync skipped off mainnet");
        return Ok(0);
    }
    let identity = store.identity()?;

    let holdings = client.address_tokens(&identity.address).await?;
    let mut added = 0;
    for token in holdings {
        if store.add_token(token) {
            added += 1;
        }
    }
    debug!(added, "token sync complete");
    Ok(added)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_info_decimals_as_string() {
        let raw = r#"{"address":"0xabc","decimals":"18","name":"Dai","symbol":"DAI"}"#;
        let info: TokenInfo = serde_json::from_str(raw).unwrap();
        assert_eq!(info.parsed_decimals().unwrap(), 18);
    }

    #[test]
    fn test_token_info_decimals_as_number() {
        let raw = r#"{"address":"0xabc","decimals":6,"name":"USD Coin","symbol":"USDC"}"#;
        let info: TokenInfo = serde_json::from_str(raw).unwrap();
        assert_eq!(info.parsed_decimals().unwrap(), 6);
    }

    #[test]
    fn test_token_info_decimals_garbage_rejected() {
        let raw = r#"{"address":"0xabc","decimals":"many","name":"","symbol":""}"#;
        let info: TokenInfo = serde_json::from_str(raw).unwrap();
        assert!(info.parsed_decimals().is_err());
    }

    #[test]
    fn test_address_info_without_tokens_field() {
        let info: AddressInfo = serde_json::from_str(r#"{"ETH":{"balance":0}}"#).unwrap();
        assert!(info.tokens.is_none());
    }
}
