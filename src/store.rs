//! Shared wallet session state.
//!
//! One `WalletStore` is the single place the active identity, the network
//! selection and the known token set live. It replaces the mobile app's
//! global state container with an explicit object handed to each service
//! call; writers are serialized by the inner lock, and every update is one
//! self-contained write, so no reader can observe a partial identity.

use parking_lot::RwLock;

use crate::core::config::Network;
use crate::core::domain::{Token, WalletIdentity};
use crate::core::errors::WalletError;

#[derive(Debug)]
struct StoreState {
    identity: Option<WalletIdentity>,
    network: Network,
    tokens: Vec<Token>,
}

#[derive(Debug)]
pub struct WalletStore {
    state: RwLock<StoreState>,
}

impl WalletStore {
    /// An empty store on mainnet, token set seeded with the native entry.
    pub fn new() -> Self {
        Self::with_network(Network::Mainnet)
    }

    pub fn with_network(network: Network) -> Self {
        Self {
            state: RwLock::new(StoreState {
                identity: None,
                network,
                tokens: vec![Token::native()],
            }),
        }
    }

    /// Store address and private key together, replacing any previous
    /// identity. Single write: address and key are never observable apart.
    pub fn set_identity(&self, identity: WalletIdentity) {
        self.state.write().identity = Some(identity);
    }

    /// The stored identity, or [`WalletError::NoIdentity`] when no key
    /// material has been generated or restored yet.
    pub fn identity(&self) -> Result<WalletIdentity, WalletError> {
        self.state.read().identity.clone().ok_or(WalletError::NoIdentity)
    }

    pub fn network(&self) -> Network {
        self.state.read().network
    }

    pub fn select_network(&self, network: Network) {
        self.state.write().network = network;
    }

    /// Snapshot of the known token set (native entry first).
    pub fn tokens(&self) -> Vec<Token> {
        self.state.read().tokens.clone()
    }

    /// Append a token unless one with the same ERC-20 contract address is
    /// already known. Returns whether the token was added. Tokens are never
    /// removed.
    pub fn add_token(&self, token: Token) -> bool {
        let mut state = self.state.write();
        let known = state.tokens.iter().any(|existing| {
            match (existing.contract_address(), token.contract_address()) {
                (Some(a), Some(b)) => a == b,
                (None, None) => true,
                _ => false,
            }
        });
        if known {
            return false;
        }
        state.tokens.push(token);
        true
    }
}

impl Default for WalletStore {
    fn default() -> Self {
        Self::new()
    }
}
