use std::fmt;

/// Custom error type for wallet operations.
///
/// Every failure surfaces to the immediate caller; this crate performs no
/// retries and no silent suppression apart from the two documented no-op
/// cases in token sync (non-mainnet network, missing token list).
#[derive(Debug)]
pub enum WalletError {
    /// No key material is stored when an identity is required.
    NoIdentity,
    /// Malformed private-key input (wrong length, non-hex characters).
    InvalidKey(String),
    /// Malformed address or transaction-hash input.
    InvalidAddress(String),
    /// Any HTTP/RPC failure: non-2xx status, transport error, malformed JSON.
    NetworkRequest(String),
    /// Strict network-name parsing rejected the input.
    UnsupportedNetwork(String),
}

impl fmt::Display for WalletError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WalletError::NoIdentity => write!(f, "No wallet identity is stored"),
            WalletError::InvalidKey(msg) => write!(f, "Invalid private key: {}", msg),
            WalletError::InvalidAddress(msg) => write!(f, "Invalid address: {}", msg),
            WalletError::NetworkRequest(msg) => write!(f, "Network request failed: {}", msg),
            WalletError::UnsupportedNetwork(msg) => write!(f, "Unsupported network: {}", msg),
        }
    }
}

impl std::error::Error for WalletError {}

impl From<reqwest::Error> for WalletError {
    fn from(err: reqwest::Error) -> Self {
        WalletError::NetworkRequest(err.to_string())
    }
}

impl From<serde_json::Error> for WalletError {
    fn from(err: serde_json::Error) -> Self {
        WalletError::NetworkRequest(format!("malformed JSON response: {}", err))
    }
}

impl From<ethers::providers::ProviderError> for WalletError {
    fn from(err: ethers::providers::ProviderError) -> Self {
        WalletError::NetworkRequest(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_no_identity() {
        let err = WalletError::NoIdentity;
        assert_eq!(format!("{}", err), "No wallet identity is stored");
    }

    #[test]
    fn test_display_invalid_key() {
        let err = WalletError::InvalidKey("expected 32 bytes".to_string());
        assert_eq!(format!("{}", err), "Invalid private key: expected 32 bytes");
    }

    #[test]
    fn test_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: WalletError = json_err.into();
        match err {
            WalletError::NetworkRequest(msg) => assert!(msg.contains("malformed JSON")),
            other => panic!("expected NetworkRequest, got {:?}", other),
        }
    }
}
