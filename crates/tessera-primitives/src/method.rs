//! Method selector and function reference types

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::Address;

/// Method id / function reference parsing error
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MethodIdError {
    /// Invalid hex string
    #[error("invalid hex string: {0}")]
    InvalidHex(String),
    /// Invalid length
    #[error("invalid length: expected {expected} bytes, got {got}")]
    InvalidLength {
        /// Required length
        expected: usize,
        /// Provided length
        got: usize,
    },
}

/// 4-byte method selector.
///
/// Ordering is unsigned lexicographic over the bytes, so method ids can key
/// ordered dispatch tables.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct MethodId([u8; 4]);

impl MethodId {
    /// Size in bytes
    pub const LEN: usize = 4;

    /// Create from bytes
    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        MethodId(bytes)
    }

    /// Create from a slice of exactly four bytes
    pub fn from_slice(slice: &[u8]) -> Result<Self, MethodIdError> {
        let bytes: [u8; 4] = slice.try_into().map_err(|_| MethodIdError::InvalidLength {
            expected: Self::LEN,
            got: slice.len(),
        })?;
        Ok(MethodId(bytes))
    }

    /// Parse `0x` + 8 hex digits (prefix optional)
    pub fn from_hex(s: &str) -> Result<Self, MethodIdError> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s).map_err(|e| MethodIdError::InvalidHex(e.to_string()))?;
        Self::from_slice(&bytes)
    }

    /// Selector at the start of transaction input / call data
    pub fn from_input(input: &[u8]) -> Result<Self, MethodIdError> {
        if input.len() < Self::LEN {
            return Err(MethodIdError::InvalidLength {
                expected: Self::LEN,
                got: input.len(),
            });
        }
        Self::from_slice(&input[..Self::LEN])
    }

    /// Get as bytes
    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    /// Convert to hex string with 0x prefix
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for MethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MethodId({})", self.to_hex())
    }
}

impl fmt::Display for MethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for MethodId {
    type Err = MethodIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<[u8; 4]> for MethodId {
    fn from(bytes: [u8; 4]) -> Self {
        MethodId(bytes)
    }
}

impl AsRef<[u8]> for MethodId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Reference to an external contract function: address ++ selector (24 bytes)
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FunctionRef {
    address: Address,
    method: MethodId,
}

impl FunctionRef {
    /// Size in bytes
    pub const LEN: usize = Address::LEN + MethodId::LEN;

    /// Create a function reference
    pub const fn new(address: Address, method: MethodId) -> Self {
        Self { address, method }
    }

    /// Split 24 bytes into address and selector
    pub fn from_slice(slice: &[u8]) -> Result<Self, MethodIdError> {
        if slice.len() != Self::LEN {
            return Err(MethodIdError::InvalidLength {
                expected: Self::LEN,
                got: slice.len(),
            });
        }
        let (address, method) = slice.split_at(Address::LEN);
        let address = Address::from_slice(address).map_err(|_| MethodIdError::InvalidLength {
            expected: Address::LEN,
            got: address.len(),
        })?;
        Ok(Self::new(address, MethodId::from_slice(method)?))
    }

    /// Parse from hex string (with or without 0x prefix)
    pub fn from_hex(s: &str) -> Result<Self, MethodIdError> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s).map_err(|e| MethodIdError::InvalidHex(e.to_string()))?;
        Self::from_slice(&bytes)
    }

    /// Target contract address
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Target method selector
    pub fn method_id(&self) -> &MethodId {
        &self.method
    }

    /// Serialized 24-byte form
    pub fn to_bytes(&self) -> [u8; 24] {
        let mut bytes = [0u8; 24];
        bytes[..Address::LEN].copy_from_slice(self.address.as_bytes());
        bytes[Address::LEN..].copy_from_slice(self.method.as_bytes());
        bytes
    }

    /// Convert to hex string with 0x prefix
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.to_bytes()))
    }
}

impl fmt::Debug for FunctionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FunctionRef({})", self.to_hex())
    }
}

impl fmt::Display for FunctionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::*;
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

    impl Serialize for MethodId {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_str(&self.to_hex())
        }
    }

    impl<'de> Deserialize<'de> for MethodId {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let s = String::deserialize(deserializer)?;
            MethodId::from_hex(&s).map_err(de::Error::custom)
        }
    }
}
