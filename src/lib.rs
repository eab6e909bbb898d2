//! Wallet utility crate for a mobile Ethereum wallet.
//!
//! Everything cryptographically or protocol-wise hard is delegated: key
//! derivation and transaction signing to `ethers`, RPC transport to the
//! configured JSON-RPC provider, history and token holdings to the Etherscan
//! and Ethplorer HTTP APIs. This crate is the glue: it holds the active
//! identity and network selection in a [`store::WalletStore`], builds a
//! signing client per identity+network pair, and dispatches every
//! balance/history/transfer call by asset kind.

pub mod blockchain;
pub mod core;
pub mod service;
pub mod store;

pub use crate::core::config::{Network, WalletConfig};
pub use crate::core::domain::{AssetKind, Token, WalletIdentity};
pub use crate::core::errors::WalletError;
pub use crate::service::WalletService;
pub use crate::store::WalletStore;
