//! ABI codec error types

use std::string::FromUtf8Error;

use tessera_primitives::{MethodId, U256};
use thiserror::Error;

/// Error raised by type resolution, encoding or decoding.
///
/// Every error aborts the whole operation; no partial output is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AbiError {
    /// A matcher recognized the descriptor prefix but the full grammar did not match
    #[error("malformed type descriptor: {0}")]
    MalformedDescriptor(String),

    /// No matcher accepted the descriptor
    #[error("unknown type: {0}")]
    UnknownType(String),

    /// Array element type is not static
    #[error("invalid array element type: {0} is dynamic")]
    InvalidElementType(String),

    /// Bit width outside the permitted set
    #[error("invalid bit width for {kind}: {bits}")]
    InvalidBitWidth {
        /// Type family
        kind: &'static str,
        /// Rejected width
        bits: usize,
    },

    /// Value outside the bounds of its type
    #[error("value out of range for {ty}: {value}")]
    ValueOutOfRange {
        /// Canonical type name
        ty: String,
        /// Offending value
        value: String,
    },

    /// Value variant does not belong to the type
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// Canonical type name
        expected: String,
        /// Kind of the supplied value
        found: String,
    },

    /// Element count or byte length differs from the required one
    #[error("length mismatch: expected {expected}, got {actual}")]
    LengthMismatch {
        /// Required length
        expected: usize,
        /// Provided length
        actual: usize,
    },

    /// Buffer ends before the required data
    #[error("truncated buffer: need {needed} bytes, have {available}")]
    TruncatedBuffer {
        /// Bytes required
        needed: usize,
        /// Bytes present
        available: usize,
    },

    /// Declared length cannot be addressed on this machine
    #[error("length overflow: {0}")]
    LengthOverflow(U256),

    /// Head offset points outside the permitted tail window
    #[error("invalid offset {offset}: must be in [{lower}, {upper})")]
    InvalidOffset {
        /// Offset read from the head
        offset: U256,
        /// Inclusive lower bound (head size)
        lower: usize,
        /// Exclusive upper bound (next payload start or buffer end)
        upper: usize,
    },

    /// Tail payloads do not cover the buffer contiguously
    #[error("encoding incomplete: first payload starts at {boundary}, head ends at {head_size}")]
    EncodingIncomplete {
        /// Smallest payload boundary found
        boundary: usize,
        /// Size of the head
        head_size: usize,
    },

    /// String payload is not valid UTF-8
    #[error("invalid utf-8: {0}")]
    InvalidUtf8(#[from] FromUtf8Error),

    /// Call data selector belongs to another method
    #[error("selector mismatch: expected {expected}, found {found}")]
    SelectorMismatch {
        /// Selector of the method
        expected: MethodId,
        /// Selector found in the call data
        found: MethodId,
    },
}

/// Result alias for ABI operations
pub type AbiResult<T> = Result<T, AbiError>;
