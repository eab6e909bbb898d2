use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::errors::WalletError;

/// The currently selectable Ethereum networks.
///
/// Resolution is pure and synchronous: each variant maps to a fixed RPC
/// hostname, an explorer API subdomain, and a chain id.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    Ropsten,
    Kovan,
    Rinkeby,
}

impl Network {
    /// Lenient resolution: any unrecognized name falls back to mainnet, the
    /// behavior the mobile UI relies on. Use [`Network::from_str`] when the
    /// input should be rejected instead.
    pub fn from_name(name: &str) -> Self {
        match name {
            "ropsten" => Network::Ropsten,
            "kovan" => Network::Kovan,
            "rinkeby" => Network::Rinkeby,
            _ => Network::Mainnet,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Ropsten => "ropsten",
            Network::Kovan => "kovan",
            Network::Rinkeby => "rinkeby",
        }
    }

    pub fn chain_id(&self) -> u64 {
        match self {
            Network::Mainnet => 1,
            Network::Ropsten => 3,
            Network::Kovan => 42,
            Network::Rinkeby => 4,
        }
    }

    /// JSON-RPC endpoint for this network.
    pub fn rpc_url(&self, infura_api_key: &str) -> String {
        format!("https://{}.infura.io/v3/{}", self.name(), infura_api_key)
    }

    /// Etherscan API subdomain: `api` for mainnet, `api-<network>` otherwise.
    pub fn explorer_subdomain(&self) -> &'static str {
        match self {
            Network::Mainnet => "api",
            Network::Ropsten => "api-ropsten",
            Network::Kovan => "api-kovan",
            Network::Rinkeby => "api-rinkeby",
        }
    }

    /// Base URL of the explorer API for this network.
    pub fn explorer_api_base(&self) -> String {
        format!("http://{}.etherscan.io", self.explorer_subdomain())
    }
}

impl Default for Network {
    fn default() -> Self {
        Network::Mainnet
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Network {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mainnet" => Ok(Network::Mainnet),
            "ropsten" => Ok(Network::Ropsten),
            "kovan" => Ok(Network::Kovan),
            "rinkeby" => Ok(Network::Rinkeby),
            other => Err(WalletError::UnsupportedNetwork(other.to_string())),
        }
    }
}

/// API credentials for the third-party services this crate talks to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Infura project key, embedded into the RPC URL.
    pub infura_api_key: String,
    /// Etherscan API key for history queries.
    pub etherscan_api_key: String,
    /// Ethplorer API key for token-holding queries.
    pub ethplorer_api_key: String,
}

impl WalletConfig {
    /// Load credentials from `INFURA_API_KEY`, `ETHERSCAN_API_KEY` and
    /// `ETHPLORER_API_KEY`. Etherscan and Ethplorer have free tiers, so a
    /// missing key falls back with a warning; Infura has no anonymous tier
    /// and its key is required.
    pub fn from_env() -> Result<Self, WalletError> {
        let infura_api_key = std::env::var("INFURA_API_KEY").map_err(|_| {
            WalletError::NetworkRequest("INFURA_API_KEY is not set".to_string())
        })?;

        let etherscan_api_key = std::env::var("ETHERSCAN_API_KEY").unwrap_or_else(|_| {
            tracing::warn!("ETHERSCAN_API_KEY is not set, using the free-tier placeholder");
            "YourApiKeyToken".to_string()
        });

        let ethplorer_api_key =
            std::env::var("ETHPLORER_API_KEY").unwrap_or_else(|_| "freekey".to_string());

        Ok(Self { infura_api_key, etherscan_api_key, ethplorer_api_key })
    }
}
