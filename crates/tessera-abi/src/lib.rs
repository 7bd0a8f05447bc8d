//! # tessera-abi
//!
//! Contract ABI type system and head/tail codec.
//!
//! ## Features
//!
//! - **Registry**: resolves descriptors such as `uint`, `bytes32` or `address[2][]`
//! - **Types**: scalar and composite codecs, each either static or dynamic
//! - **ParameterList**: head/tail encoding of whole argument lists
//! - **Method**: selectors, call data and return data
//!
//! ## Example
//!
//! ```rust
//! use tessera_abi::{Method, Registry, Value};
//! use tessera_primitives::Address;
//!
//! let transfer = Method::parse(Registry::standard(), "transfer(address,uint)", "bool")?;
//! assert_eq!(transfer.signature(), "transfer(address,uint256)");
//!
//! let to = Address::from_hex("0x742d35Cc6634C0532925a3b844Bc9e7595f0aB3d")?;
//! let calldata = transfer.encode_call(&[Value::Address(to), Value::uint(1000)])?;
//! assert_eq!(&calldata[..4], &[0xa9, 0x05, 0x9c, 0xbb]);
//!
//! let args = transfer.decode_call(&calldata)?;
//! assert_eq!(args[1], Value::uint(1000));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod params;
pub mod registry;
mod selector;
pub mod types;
mod value;
mod word;

pub use error::{AbiError, AbiResult};
pub use params::ParameterList;
pub use registry::Registry;
pub use selector::{function_selector, Method, MethodSelector};
pub use types::{DynamicType, StaticType, Type};
pub use value::{FixedPoint, Value, I256};
pub use word::WORD_SIZE;

// Re-export primitives for convenience
pub use tessera_primitives::{Address, FunctionRef, MethodId, U256};
