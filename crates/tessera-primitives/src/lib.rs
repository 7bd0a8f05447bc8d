//! # tessera-primitives
//!
//! Domain value types shared by the tessera crates.
//!
//! - [`Address`]: 20-byte account address
//! - [`H256`]: 32-byte word, the atomic unit of contract ABI data
//! - [`MethodId`]: 4-byte method selector
//! - [`FunctionRef`]: 24-byte function reference (address ++ selector)

#![warn(missing_docs)]
#![warn(clippy::all)]

mod address;
mod error;
mod hash;
mod method;

pub use address::{Address, AddressError};
pub use error::PrimitiveError;
pub use hash::{HashError, H256};
pub use method::{FunctionRef, MethodId, MethodIdError};

// Re-export primitive-types for U256
pub use primitive_types::U256;

/// Identifier of a contract event (the first log topic)
pub type EventId = H256;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u256_word_roundtrip() {
        let value = U256::from(0x45u64);
        let mut word = [0u8; 32];
        value.to_big_endian(&mut word);
        assert_eq!(word[31], 0x45);
        assert_eq!(U256::from_big_endian(&word), value);
    }
}
