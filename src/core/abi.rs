use anyhow::Result;
use ethers::types::{Address, U256};
use sha3::{Digest, Keccak256};

/// Compute the first 4 bytes (function selector) from a signature string,
/// e.g. "transfer(address,uint256)".
pub fn selector_from_signature(signature: &str) -> [u8; 4] {
    let mut keccak = Keccak256::new();
    keccak.update(signature.as_bytes());
    let out = keccak.finalize();
    [out[0], out[1], out[2], out[3]]
}

/// Encode a 20-byte address into a 32-byte ABI word (left-padded).
pub fn abi_word_address(addr: Address) -> [u8; 32] {
    let mut out = [0u8; 32];
    out[12..].copy_from_slice(addr.as_bytes());
    out
}

/// Encode an unsigned 256-bit amount into a 32-byte big-endian ABI word.
pub fn abi_word_uint256(value: U256) -> [u8; 32] {
    let mut out = [0u8; 32];
    value.to_big_endian(&mut out);
    out
}

/// Pack a selector and ABI words contiguously into calldata.
pub fn abi_pack(selector: [u8; 4], words: &[[u8; 32]]) -> Vec<u8> {
    let mut out = Vec::with_capacity(4 + 32 * words.len());
    out.extend_from_slice(&selector);
    for w in words {
        out.extend_from_slice(w);
    }
    out
}

/// Calldata for `transfer(address,uint256)`.
/// selector a9059cbb; data: 4 + 32 (address padded) + 32 (amount padded)
pub fn erc20_transfer(to: Address, amount: U256) -> Vec<u8> {
    let selector = selector_from_signature("transfer(address,uint256)");
    abi_pack(selector, &[abi_word_address(to), abi_word_uint256(amount)])
}

/// Calldata for `balanceOf(address)`.
pub fn erc20_balance_of(owner: Address) -> Vec<u8> {
    let selector = selector_from_signature("balanceOf(address)");
    abi_pack(selector, &[abi_word_address(owner)])
}

/// Decode the return data of a uint256-returning view call. An empty return
/// (contract without the function, or a non-contract address) decodes as zero.
pub fn decode_uint256(data: &[u8]) -> Result<U256> {
    if data.is_empty() {
        return Ok(U256::zero());
    }
    if data.len() < 32 {
        return Err(anyhow::anyhow!("return data too short for uint256: {} bytes", data.len()));
    }
    Ok(U256::from_big_endian(&data[..32]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_selector_from_signature() {
        // transfer(address,uint256) -> a9059cbb
        let sel = selector_from_signature("transfer(address,uint256)");
        assert_eq!(sel, [0xa9, 0x05, 0x9c, 0xbb]);
        // balanceOf(address) -> 70a08231
        let sel = selector_from_signature("balanceOf(address)");
        assert_eq!(sel, [0x70, 0xa0, 0x82, 0x31]);
    }

    #[test]
    fn test_abi_word_address_padding() {
        let addr = Address::from_str("0x1111111111111111111111111111111111111111").unwrap();
        let word = abi_word_address(addr);
        assert!(word[..12].iter().all(|&b| b == 0));
        assert!(word[12..].iter().all(|&b| b == 0x11));
    }

    #[test]
    fn test_abi_word_uint256() {
        let word = abi_word_uint256(U256::from(42u64));
        assert!(word[..31].iter().all(|&b| b == 0));
        assert_eq!(word[31], 42);

        let max = abi_word_uint256(U256::MAX);
        assert!(max.iter().all(|&b| b == 0xff));
    }

    #[test]
    fn test_erc20_transfer_calldata() {
        let to = Address::from_str("0x1111111111111111111111111111111111111111").unwrap();
        let amount = U256::from_dec_str("1000000000000000000").unwrap(); // 1e18
        let data = erc20_transfer(to, amount);

        // 4 (selector) + 32 (address) + 32 (amount)
        assert_eq!(data.len(), 68);
        assert_eq!(&data[0..4], &[0xa9, 0x05, 0x9c, 0xbb]);
        assert!(data[4..16].iter().all(|&b| b == 0));
        assert_eq!(&data[16..36], to.as_bytes());
        assert_eq!(U256::from_big_endian(&data[36..68]), amount);
    }

    #[test]
    fn test_erc20_balance_of_calldata() {
        let owner = Address::from_str("0x2222222222222222222222222222222222222222").unwrap();
        let data = erc20_balance_of(owner);
        assert_eq!(data.len(), 36);
        assert_eq!(&data[0..4], &[0x70, 0xa0, 0x82, 0x31]);
        assert_eq!(&data[16..36], owner.as_bytes());
    }

    #[test]
    fn test_decode_uint256() {
        let word = abi_word_uint256(U256::from(7u64));
        assert_eq!(decode_uint256(&word).unwrap(), U256::from(7u64));
        assert_eq!(decode_uint256(&[]).unwrap(), U256::zero());
        assert!(decode_uint256(&[0u8; 8]).is_err());
    }
}
