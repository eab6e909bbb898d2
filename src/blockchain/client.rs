//! The signing RPC client: one instance per identity+network pair.
//!
//! Balance queries, transfers, fee estimates and status lookups all go
//! through here. Signing is done locally by the wrapped `LocalWallet`;
//! everything else is forwarded to the configured JSON-RPC endpoint.

use std::str::FromStr;

use ethers::middleware::SignerMiddleware;
use ethers::providers::{Http, Middleware, Provider};
use ethers::signers::{LocalWallet, Signer};
use ethers::types::transaction::eip2718::TypedTransaction;
use ethers::types::{
    Address, Bytes, Eip1559TransactionRequest, NameOrAddress, TransactionRequest, H256, U256, U64,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::core::abi;
use crate::core::config::{Network, WalletConfig};
use crate::core::domain::{AssetKind, Token, WalletIdentity};
use crate::core::errors::WalletError;
use crate::core::keys;
use crate::store::WalletStore;

/// Broadcast-side status of a transaction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum TransactionStatus {
    Pending,
    Confirmed,
    Failed,
    Unknown,
}

/// RPC client bound to one identity and one network. The wallet's address is
/// the default sender for every write issued through it.
#[derive(Debug)]
pub struct ChainClient {
    inner: SignerMiddleware<Provider<Http>, LocalWallet>,
    sender: Address,
    network: Network,
}

impl ChainClient {
    /// Build the client for the identity and network currently held in the
    /// store. Fails with [`WalletError::NoIdentity`] when no key is stored.
    pub fn for_current_identity(
        store: &WalletStore,
        config: &WalletConfig,
    ) -> Result<Self, WalletError> {
        let identity = store.identity()?;
        let network = store.network();
        let rpc_url = network.rpc_url(&config.infura_api_key);
        Self::from_parts(&identity, network, &rpc_url)
    }

    /// Build the client from explicit parts. Exists so tests can point at a
    /// local endpoint without going through the resolver.
    pub fn from_parts(
        identity: &WalletIdentity,
        network: Network,
        rpc_url: &str,
    ) -> Result<Self, WalletError> {
        let provider = Provider::<Http>::try_from(rpc_url)
            .map_err(|e| WalletError::NetworkRequest(format!("invalid RPC URL: {}", e)))?;
        let wallet = keys::signer_from_key(&identity.private_key)?
            .with_chain_id(network.chain_id());
        let sender = wallet.address();
        debug!(network = %network, sender = %identity.address, "chain client ready");
        Ok(Self { inner: SignerMiddleware::new(provider, wallet), sender, network })
    }

    /// The bound default sender.
    pub fn sender(&self) -> Address {
        self.sender
    }

    pub fn network(&self) -> Network {
        self.network
    }

    /// Current balance of the given asset for the bound address, in smallest
    /// units (wei, or the token's raw integer unit). Never a float.
    pub async fn balance_of(&self, token: &Token) -> Result<U256, WalletError> {
        match &token.kind {
            AssetKind::Native => {
                debug!(sender = %self.sender, "fetching native balance");
                let balance = self
                    .inner
                    .get_balance(self.sender, None)
                    .await
                    .map_err(|e| WalletError::NetworkRequest(e.to_string()))?;
                Ok(balance)
            }
            AssetKind::Erc20 { contract_address } => {
                let contract = parse_address(contract_address)?;
                debug!(sender = %self.sender, contract = %contract, "fetching token balance");
                let call = TransactionRequest::new()
                    .to(contract)
                    .data(abi::erc20_balance_of(self.sender));
                let typed: TypedTransaction = call.into();
                let raw = self
                    .inner
                    .call(&typed, None)
                    .await
                    .map_err(|e| WalletError::NetworkRequest(e.to_string()))?;
                abi::decode_uint256(&raw).map_err(|e| WalletError::NetworkRequest(e.to_string()))
            }
        }
    }

    /// Build, sign and broadcast a transfer of `amount` smallest units to
    /// `to`. Returns the transaction hash as soon as the node accepts the
    /// broadcast; confirmation is not awaited.
    pub async fn send_transfer(
        &self,
        token: &Token,
        to: &str,
        amount: U256,
    ) -> Result<String, WalletError> {
        let to_address = parse_address(to)?;
        let request = match &token.kind {
            AssetKind::Native => self.native_transfer_request(to_address, amount).await?,
            AssetKind::Erc20 { contract_address } => {
                let contract = parse_address(contract_address)?;
                self.erc20_transfer_request(contract, to_address, amount)
            }
        };

        let pending = self
            .inner
            .send_transaction(request, None)
            .await
            .map_err(|e| WalletError::NetworkRequest(format!("broadcast rejected: {}", e)))?;

        let tx_hash = format!("0x{}", hex::encode(pending.tx_hash().as_bytes()));
        info!(tx_hash = %tx_hash, symbol = %token.symbol, "transfer broadcast");
        Ok(tx_hash)
    }

    /// Plain value transfer: fixed 21000 gas, fees derived from the current
    /// gas price (max fee = 2x, tip = gas price / 10 with a 1 gwei floor).
    async fn native_transfer_request(
        &self,
        to: Address,
        amount: U256,
    ) -> Result<Eip1559TransactionRequest, WalletError> {
        let gas_price = self.gas_price().await?;
        let nonce = self
            .inner
            .get_transaction_count(self.sender, None)
            .await
            .map_err(|e| WalletError::NetworkRequest(format!("failed to get nonce: {}", e)))?;

        let max_fee_per_gas = gas_price.saturating_mul(U256::from(2u64));
        let max_priority_fee_per_gas =
            (gas_price / U256::from(10u64)).max(U256::from(1_000_000_000u64)); // >= 1 gwei

        Ok(Eip1559TransactionRequest {
            from: Some(self.sender),
            to: Some(NameOrAddress::Address(to)),
            value: Some(amount),
            gas: Some(U256::from(21_000u64)),
            nonce: Some(nonce),
            max_fee_per_gas: Some(max_fee_per_gas),
            max_priority_fee_per_gas: Some(max_priority_fee_per_gas),
            ..Default::default()
        })
    }

    /// `transfer(address,uint256)` call to the token contract, zero value.
    /// Gas is left unset so the middleware estimates it against the contract.
    fn erc20_transfer_request(
        &self,
        contract: Address,
        to: Address,
        amount: U256,
    ) -> Eip1559TransactionRequest {
        Eip1559TransactionRequest {
            from: Some(self.sender),
            to: Some(NameOrAddress::Address(contract)),
            value: Some(U256::zero()),
            data: Some(Bytes::from(abi::erc20_transfer(to, amount))),
            ..Default::default()
        }
    }

    /// Estimated fee in wei for a plain value transfer at the current gas
    /// price (21000 gas).
    pub async fn estimate_fee(&self) -> Result<U256, WalletError> {
        let gas_price = self.gas_price().await?;
        Ok(gas_price * U256::from(21_000u64))
    }

    /// Receipt-based status lookup for a previously broadcast transaction.
    pub async fn transaction_status(&self, tx_hash: &str) -> Result<TransactionStatus, WalletError> {
        let hash = H256::from_str(tx_hash)
            .map_err(|e| WalletError::InvalidAddress(format!("transaction hash: {}", e)))?;

        match self.inner.get_transaction_receipt(hash).await {
            Ok(Some(receipt)) => {
                if receipt.status == Some(U64::from(1)) {
                    Ok(TransactionStatus::Confirmed)
                } else {
                    Ok(TransactionStatus::Failed)
                }
            }
            Ok(None) => match self.inner.get_transaction(hash).await {
                Ok(Some(_)) => Ok(TransactionStatus::Pending),
                Ok(None) => Ok(TransactionStatus::Unknown),
                Err(e) => Err(WalletError::NetworkRequest(format!(
                    "failed to get transaction {}: {}",
                    tx_hash, e
                ))),
            },
            Err(e) => {
                warn!(tx_hash = %tx_hash, "receipt lookup failed: {}", e);
                Err(WalletError::NetworkRequest(format!("failed to get receipt: {}", e)))
            }
        }
    }

    async fn gas_price(&self) -> Result<U256, WalletError> {
        self.inner
            .get_gas_price()
            .await
            .map_err(|e| WalletError::NetworkRequest(format!("failed to get gas price: {}", e)))
    }
}

fn parse_address(input: &str) -> Result<Address, WalletError> {
    Address::from_str(input).map_err(|e| WalletError::InvalidAddress(format!("{}: {}", input, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::domain::PrivateKey;

    fn test_identity() -> WalletIdentity {
        keys::identity_from_key(PrivateKey::new([0x11u8; 32])).unwrap()
    }

    fn local_client(network: Network) -> ChainClient {
        ChainClient::from_parts(&test_identity(), network, "http://127.0.0.1:8545").unwrap()
    }

    #[test]
    fn test_for_current_identity_requires_identity() {
        let store = WalletStore::new();
        let config = WalletConfig {
            infura_api_key: "KEY".to_string(),
            etherscan_api_key: "KEY".to_string(),
            ethplorer_api_key: "freekey".to_string(),
        };
        let err = ChainClient::for_current_identity(&store, &config).unwrap_err();
        assert!(matches!(err, WalletError::NoIdentity));
    }

    #[test]
    fn test_sender_bound_to_identity_address() {
        let identity = test_identity();
        let client = local_client(Network::Mainnet);
        let bound = format!("{:#x}", client.sender());
        assert_eq!(bound, identity.address.to_lowercase());
    }

    #[test]
    fn test_from_parts_rejects_bad_url() {
        let err =
            ChainClient::from_parts(&test_identity(), Network::Mainnet, "not a url").unwrap_err();
        assert!(matches!(err, WalletError::NetworkRequest(_)));
    }

    #[test]
    fn test_erc20_transfer_request_shape() {
        let client = local_client(Network::Ropsten);
        let contract = parse_address("0x6b175474e89094c44da98b954eedeac495271d0f").unwrap();
        let to = parse_address("0x2222222222222222222222222222222222222222").unwrap();
        let request = client.erc20_transfer_request(contract, to, U256::from(500u64));

        assert_eq!(request.to, Some(NameOrAddress::Address(contract)));
        assert_eq!(request.value, Some(U256::zero()));
        assert_eq!(request.from, Some(client.sender()));
        let data = request.data.expect("calldata");
        assert_eq!(&data[0..4], &[0xa9, 0x05, 0x9c, 0xbb]);
        assert_eq!(&data[16..36], to.as_bytes());
    }

    #[test]
    fn test_parse_address_rejects_garbage() {
        let err = parse_address("not-an-address").unwrap_err();
        assert!(matches!(err, WalletError::InvalidAddress(_)));
        assert!(parse_address("0x742d35Cc6634C0532925a3b8D400e8B78fFe4860").is_ok());
    }
}
