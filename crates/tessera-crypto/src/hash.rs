//! Keccak-256 hashing

use sha3::{Digest, Keccak256};
use tessera_primitives::H256;

/// Compute Keccak-256 hash of the input data
pub fn keccak256(data: &[u8]) -> H256 {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    H256::from_bytes(hasher.finalize().into())
}

/// Compute Keccak-256 over the concatenation of `parts`
pub fn keccak256_concat(parts: &[&[u8]]) -> H256 {
    let mut hasher = Keccak256::new();
    for part in parts {
        hasher.update(part);
    }
    H256::from_bytes(hasher.finalize().into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keccak256_empty() {
        let hash = keccak256(&[]);
        assert_eq!(
            hash.to_hex(),
            "0xc5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn test_keccak256_hello() {
        let hash = keccak256(b"hello");
        assert_eq!(
            hash.to_hex(),
            "0x1c8aff950685c2ed4bc3174f3472287b56d9517b9c948127319a09a7a36deac8"
        );
    }

    #[test]
    fn test_concat_matches_single_buffer() {
        let joined = keccak256(b"transfer(address,uint256)");
        let parts = keccak256_concat(&[b"transfer", b"(address,", b"uint256)"]);
        assert_eq!(joined, parts);
    }

    #[test]
    fn test_concat_empty_parts() {
        assert_eq!(keccak256_concat(&[]), keccak256(&[]));
    }
}
