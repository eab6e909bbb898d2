//! The facade the app layer calls.
//!
//! `WalletService` wires the store, the credentials and one shared HTTP
//! client together and exposes the full wallet surface: key management,
//! token sync, history, balances and transfers. Chain and explorer clients
//! are rebuilt per call from the current store state, so a network switch or
//! a restored key takes effect on the next operation.

use std::sync::Arc;

use ethers::types::U256;
use serde_json::Value;

use crate::blockchain::client::{ChainClient, TransactionStatus};
use crate::blockchain::etherscan::EtherscanClient;
use crate::blockchain::ethplorer::{self, EthplorerClient};
use crate::core::config::{Network, WalletConfig};
use crate::core::domain::{Token, WalletIdentity};
use crate::core::errors::WalletError;
use crate::core::keys;
use crate::store::WalletStore;

pub struct WalletService {
    store: Arc<WalletStore>,
    config: WalletConfig,
    http: reqwest::Client,
    explorer_base_override: Option<String>,
    ethplorer_base: String,
}

impl WalletService {
    pub fn new(store: Arc<WalletStore>, config: WalletConfig) -> Self {
        Self {
            store,
            config,
            http: reqwest::Client::new(),
            explorer_base_override: None,
            ethplorer_base: ethplorer::DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Credentials from the environment, fresh store.
    pub fn from_env() -> Result<Self, WalletError> {
        Ok(Self::new(Arc::new(WalletStore::new()), WalletConfig::from_env()?))
    }

    /// Point the explorer client at a different base URL. For tests against
    /// a local mock server.
    pub fn with_explorer_base(mut self, base_url: &str) -> Self {
        self.explorer_base_override = Some(base_url.to_string());
        self
    }

    /// Point the token indexer at a different base URL. For tests against a
    /// local mock server.
    pub fn with_ethplorer_base(mut self, base_url: &str) -> Self {
        self.ethplorer_base = base_url.to_string();
        self
    }

    pub fn store(&self) -> &WalletStore {
        &self.store
    }

    // --- key management -----------------------------------------------------

    pub fn generate_wallet(&self) -> WalletIdentity {
        keys::generate(&self.store)
    }

    pub fn restore_wallet(&self, private_key_hex: &str) -> Result<WalletIdentity, WalletError> {
        keys::restore(&self.store, private_key_hex)
    }

    pub fn current_identity(&self) -> Result<WalletIdentity, WalletError> {
        keys::current(&self.store)
    }

    // --- network / tokens ---------------------------------------------------

    pub fn select_network(&self, network: Network) {
        self.store.select_network(network);
    }

    pub fn tokens(&self) -> Vec<Token> {
        self.store.tokens()
    }

    /// Merge the current address's indexer-reported holdings into the token
    /// set. No-op off mainnet. Returns the number of tokens added.
    pub async fn sync_tokens(&self) -> Result<usize, WalletError> {
        let client =
            EthplorerClient::new(self.http.clone(), &self.ethplorer_base, &self.config.ethplorer_api_key);
        ethplorer::sync_tokens(&self.store, &client).await
    }

    // --- history ------------------------------------------------------------

    /// Raw transaction history of the current address for the given asset.
    pub async fn get_transactions(&self, token: &Token) -> Result<Vec<Value>, WalletError> {
        let identity = self.store.identity()?;
        let base = match &self.explorer_base_override {
            Some(base) => base.clone(),
            None => self.store.network().explorer_api_base(),
        };
        let client = EtherscanClient::new(self.http.clone(), &base, &self.config.etherscan_api_key);
        client.transactions_for(&identity.address, token).await
    }

    // --- balances / transfers -----------------------------------------------

    /// Current balance in smallest units.
    pub async fn get_balance(&self, token: &Token) -> Result<U256, WalletError> {
        self.chain_client()?.balance_of(token).await
    }

    /// Broadcast a transfer of `amount` smallest units; returns the tx hash
    /// without awaiting confirmation.
    pub async fn send_transaction(
        &self,
        token: &Token,
        to: &str,
        amount: U256,
    ) -> Result<String, WalletError> {
        self.chain_client()?.send_transfer(token, to, amount).await
    }

    /// Fee estimate in wei for a plain value transfer.
    pub async fn estimate_fee(&self) -> Result<U256, WalletError> {
        self.chain_client()?.estimate_fee().await
    }

    pub async fn transaction_status(&self, tx_hash: &str) -> Result<TransactionStatus, WalletError> {
        self.chain_client()?.transaction_status(tx_hash).await
    }

    fn chain_client(&self) -> Result<ChainClient, WalletError> {
        ChainClient::for_current_identity(&self.store, &self.config)
    }
}
