use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::core::errors::WalletError;

/// Private key wrapper (32 bytes) with secrecy::Secret for automatic
/// zeroization and display-hiding.
pub struct PrivateKey(Secret<[u8; 32]>);

impl PrivateKey {
    pub fn new(k: [u8; 32]) -> Self {
        Self(Secret::new(k))
    }

    /// Scoped access to the underlying secret bytes. Prefer this so callers
    /// can't accidentally hold on to or clone secret data outside a small
    /// scope.
    pub fn with_secret<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&[u8; 32]) -> R,
    {
        f(self.0.expose_secret())
    }

    /// Try to construct a PrivateKey from a byte slice (must be 32 bytes).
    pub fn try_from_slice(slice: &[u8]) -> Result<Self, WalletError> {
        if slice.len() != 32 {
            return Err(WalletError::InvalidKey(format!(
                "expected 32 bytes, got {}",
                slice.len()
            )));
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&slice[..32]);
        Ok(PrivateKey::new(arr))
    }

    /// Hex encoding of the key, without a 0x prefix. Only for handing the key
    /// back to a caller that explicitly asked for it; never log this.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0.expose_secret())
    }
}

impl Clone for PrivateKey {
    fn clone(&self) -> Self {
        Self::new(*self.0.expose_secret())
    }
}

impl Zeroize for PrivateKey {
    fn zeroize(&mut self) {
        self.0 = Secret::new([0u8; 32]);
    }
}

impl Drop for PrivateKey {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PrivateKey([REDACTED])")
    }
}

/// An address/private-key pair controlling a wallet.
///
/// The address is always derived from the key; the two are set together and
/// never stored independently.
#[derive(Debug, Clone)]
pub struct WalletIdentity {
    /// EIP-55 checksummed address.
    pub address: String,
    pub private_key: PrivateKey,
}

/// What kind of asset a token entry refers to.
///
/// Replaces dispatch on a reserved `"ETH"` symbol string: every
/// balance/history/transfer call matches on this exhaustively.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum AssetKind {
    /// The chain's intrinsic currency (Ether).
    Native,
    /// A fungible contract token following the ERC-20 interface.
    Erc20 { contract_address: String },
}

/// An asset the wallet tracks: the built-in native entry or an ERC-20 token
/// discovered by catalog sync.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Token {
    pub symbol: String,
    pub name: String,
    pub decimals: u32,
    pub kind: AssetKind,
}

impl Token {
    /// The built-in native-asset entry. Its "ETH" symbol is reserved.
    pub fn native() -> Self {
        Self {
            symbol: "ETH".to_string(),
            name: "Ethereum".to_string(),
            decimals: 18,
            kind: AssetKind::Native,
        }
    }

    pub fn erc20(contract_address: &str, decimals: u32, name: &str, symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            name: name.to_string(),
            decimals,
            kind: AssetKind::Erc20 { contract_address: contract_address.to_string() },
        }
    }

    /// The ERC-20 contract address, or None for the native entry.
    pub fn contract_address(&self) -> Option<&str> {
        match &self.kind {
            AssetKind::Native => None,
            AssetKind::Erc20 { contract_address } => Some(contract_address),
        }
    }
}
