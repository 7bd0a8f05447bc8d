//! Contract helper error types

use tessera_abi::AbiError;
use tessera_primitives::{MethodId, PrimitiveError};
use thiserror::Error;

/// Contract helper error type
#[derive(Debug, Error)]
pub enum ContractError {
    /// Encoding or decoding failed
    #[error("ABI error: {0}")]
    Abi(#[from] AbiError),

    /// Malformed address, hash or selector
    #[error("primitive error: {0}")]
    Primitive(#[from] PrimitiveError),

    /// No method of the contract has this selector
    #[error("unknown selector: {0}")]
    UnknownSelector(MethodId),

    /// No method of the contract has this name
    #[error("unknown function: {0}")]
    UnknownFunction(String),

    /// Decoded arguments do not have the expected shape
    #[error("unexpected value: {0}")]
    UnexpectedValue(String),

    /// Return data could not be interpreted
    #[error("invalid result: {0}")]
    InvalidResult(String),

    /// JSON serialization failed
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result alias for contract helpers
pub type ContractResult<T> = Result<T, ContractError>;
