//! Keypair generation, restore and re-derivation.
//!
//! All curve arithmetic is `ethers`' secp256k1 signer; this module only
//! validates inputs, derives the checksummed address and keeps the store in
//! sync. Key material is never logged.

use ethers::signers::{LocalWallet, Signer};
use ethers::utils::to_checksum;
use tracing::debug;

use crate::core::domain::{PrivateKey, WalletIdentity};
use crate::core::errors::WalletError;
use crate::store::WalletStore;

/// Build the signer for a held key. The incoming length is already
/// guaranteed by [`PrivateKey`]; invalid scalars (zero, >= curve order) are
/// still rejected here.
pub(crate) fn signer_from_key(key: &PrivateKey) -> Result<LocalWallet, WalletError> {
    key.with_secret(|bytes| {
        LocalWallet::from_bytes(bytes)
            .map_err(|e| WalletError::InvalidKey(e.to_string()))
    })
}

/// Derive the full identity (checksummed address) for a private key.
pub fn identity_from_key(key: PrivateKey) -> Result<WalletIdentity, WalletError> {
    let wallet = signer_from_key(&key)?;
    let address = to_checksum(&wallet.address(), None);
    Ok(WalletIdentity { address, private_key: key })
}

/// Generate a fresh keypair from the OS CSPRNG, store it, and return the
/// identity. Failure to obtain entropy is fatal and panics inside the RNG.
pub fn generate(store: &WalletStore) -> WalletIdentity {
    let wallet = LocalWallet::new(&mut rand::thread_rng());
    let key_bytes: [u8; 32] = wallet.signer().to_bytes().into();
    let identity = WalletIdentity {
        address: to_checksum(&wallet.address(), None),
        private_key: PrivateKey::new(key_bytes),
    };
    debug!(address = %identity.address, "generated new wallet identity");
    store.set_identity(identity.clone());
    identity
}

/// Restore an identity from a hex-encoded private key (with or without a
/// `0x` prefix), store it, and return it. Inputs that are not exactly 32
/// hex-decoded bytes are rejected with [`WalletError::InvalidKey`].
pub fn restore(store: &WalletStore, private_key_hex: &str) -> Result<WalletIdentity, WalletError> {
    let raw = private_key_hex.strip_prefix("0x").unwrap_or(private_key_hex);
    let bytes = hex::decode(raw)
        .map_err(|e| WalletError::InvalidKey(format!("not valid hex: {}", e)))?;
    let key = PrivateKey::try_from_slice(&bytes)?;
    let identity = identity_from_key(key)?;
    debug!(address = %identity.address, "restored wallet identity");
    store.set_identity(identity.clone());
    Ok(identity)
}

/// Reconstruct the identity from the stored private key. Fails with
/// [`WalletError::NoIdentity`] when no key material is present.
pub fn current(store: &WalletStore) -> Result<WalletIdentity, WalletError> {
    let stored = store.identity()?;
    identity_from_key(stored.private_key)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Well-known vector: the scalar 1 maps to this address.
    const KEY_ONE: &str = "0000000000000000000000000000000000000000000000000000000000000001";
    const ADDR_ONE: &str = "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf";

    #[test]
    fn test_restore_known_vector() {
        let store = WalletStore::new();
        let identity = restore(&store, KEY_ONE).unwrap();
        assert_eq!(identity.address, ADDR_ONE);
    }

    #[test]
    fn test_restored_key_exports_as_input_hex() {
        let store = WalletStore::new();
        let identity = restore(&store, KEY_ONE).unwrap();
        assert_eq!(identity.private_key.to_hex(), KEY_ONE);
    }

    #[test]
    fn test_restore_accepts_0x_prefix() {
        let store = WalletStore::new();
        let identity = restore(&store, &format!("0x{}", KEY_ONE)).unwrap();
        assert_eq!(identity.address, ADDR_ONE);
    }

    #[test]
    fn test_restore_then_current_round_trip() {
        let store = WalletStore::new();
        let restored = restore(&store, KEY_ONE).unwrap();
        let current = current(&store).unwrap();
        assert_eq!(current.address, restored.address);
        current
            .private_key
            .with_secret(|a| restored.private_key.with_secret(|b| assert_eq!(a, b)));
    }

    #[test]
    fn test_restore_rejects_short_input() {
        let store = WalletStore::new();
        let err = restore(&store, "0badc0de").unwrap_err();
        assert!(matches!(err, WalletError::InvalidKey(_)));
        // nothing stored on failure
        assert!(store.identity().is_err());
    }

    #[test]
    fn test_restore_rejects_non_hex() {
        let store = WalletStore::new();
        let not_hex = "zz".repeat(32);
        let err = restore(&store, &not_hex).unwrap_err();
        match err {
            WalletError::InvalidKey(msg) => assert!(msg.contains("hex")),
            other => panic!("expected InvalidKey, got {:?}", other),
        }
    }

    #[test]
    fn test_restore_rejects_zero_scalar() {
        let store = WalletStore::new();
        let zero = "00".repeat(32);
        assert!(restore(&store, &zero).is_err());
    }

    #[test]
    fn test_generate_is_self_consistent_and_distinct() {
        let store = WalletStore::new();
        let first = generate(&store);
        // address must re-derive from the generated key
        let rederived = identity_from_key(first.private_key.clone()).unwrap();
        assert_eq!(rederived.address, first.address);

        let second = generate(&store);
        assert_ne!(first.address, second.address);
        first
            .private_key
            .with_secret(|a| second.private_key.with_secret(|b| assert_ne!(a, b)));
        // store now holds the second identity
        assert_eq!(store.identity().unwrap().address, second.address);
    }

    #[test]
    fn test_current_without_identity_fails() {
        let store = WalletStore::new();
        assert!(matches!(current(&store).unwrap_err(), WalletError::NoIdentity));
    }
}
