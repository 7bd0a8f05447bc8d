//! Address, function reference and `bytesN`

use tessera_primitives::{Address, FunctionRef};

use crate::error::{AbiError, AbiResult};
use crate::word::WORD_SIZE;

/// 20-byte account address, right-aligned in its word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AddressType;

impl AddressType {
    /// Canonical descriptor
    pub const NAME: &'static str = "address";

    const OFFSET: usize = WORD_SIZE - Address::LEN;

    /// Encode with 12 zero bytes in front
    pub fn encode_word(&self, value: &Address) -> [u8; WORD_SIZE] {
        let mut buf = [0u8; WORD_SIZE];
        buf[Self::OFFSET..].copy_from_slice(value.as_bytes());
        buf
    }

    /// Decode the low 20 bytes; leading bytes are ignored
    pub fn decode_word(&self, word: &[u8; WORD_SIZE]) -> Address {
        let mut bytes = [0u8; Address::LEN];
        bytes.copy_from_slice(&word[Self::OFFSET..]);
        Address::from_bytes(bytes)
    }
}

/// Address plus selector (24 bytes), right-aligned in its word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FunctionType;

impl FunctionType {
    /// Canonical descriptor
    pub const NAME: &'static str = "function";

    const OFFSET: usize = WORD_SIZE - FunctionRef::LEN;

    /// Encode with 8 zero bytes in front
    pub fn encode_word(&self, value: &FunctionRef) -> [u8; WORD_SIZE] {
        let mut buf = [0u8; WORD_SIZE];
        buf[Self::OFFSET..].copy_from_slice(&value.to_bytes());
        buf
    }

    /// Decode the low 24 bytes
    pub fn decode_word(&self, word: &[u8; WORD_SIZE]) -> AbiResult<FunctionRef> {
        FunctionRef::from_slice(&word[Self::OFFSET..]).map_err(|_| AbiError::LengthMismatch {
            expected: FunctionRef::LEN,
            actual: WORD_SIZE - Self::OFFSET,
        })
    }
}

/// `bytesN`, `N` in `1..=32`, left-aligned and zero-padded on the right
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixedBytesType {
    len: usize,
}

impl FixedBytesType {
    /// `bytes32`
    pub const BYTES32: FixedBytesType = FixedBytesType { len: 32 };

    /// Create `bytesN`
    pub fn new(len: usize) -> AbiResult<Self> {
        if len == 0 || len > WORD_SIZE {
            return Err(AbiError::InvalidBitWidth {
                kind: "bytes",
                bits: len * 8,
            });
        }
        Ok(Self { len })
    }

    /// Number of significant bytes
    pub fn len(&self) -> usize {
        self.len
    }

    /// Canonical descriptor, e.g. `bytes4`
    pub fn canonical_name(&self) -> String {
        format!("bytes{}", self.len)
    }

    /// Encode exactly `len` bytes
    pub fn encode_word(&self, value: &[u8]) -> AbiResult<[u8; WORD_SIZE]> {
        if value.len() != self.len {
            return Err(AbiError::LengthMismatch {
                expected: self.len,
                actual: value.len(),
            });
        }
        let mut buf = [0u8; WORD_SIZE];
        buf[..self.len].copy_from_slice(value);
        Ok(buf)
    }

    /// Decode the leading `len` bytes; padding is discarded
    pub fn decode_word(&self, word: &[u8; WORD_SIZE]) -> Vec<u8> {
        word[..self.len].to_vec()
    }
}
