//! # tessera-contract
//!
//! Contract-facing helpers built on `tessera-abi`.
//!
//! - [`Contract`]: methods keyed by selector, call encoding and dispatch
//! - [`ContractCall`] / [`CallRequest`]: call data and its JSON `eth_call` form
//! - [`erc20`]: ERC-20 methods, typed calls, events and token reads
//! - [`address_gen`]: CREATE and CREATE2 address derivation
//!
//! ## Example
//!
//! ```rust
//! use tessera_contract::{Erc20Call, Erc20Token};
//! use tessera_primitives::{Address, U256};
//!
//! let token = Erc20Token::new(Address::from_bytes([0x11; 20]));
//! let call = token.execute_transfer(Address::from_bytes([0x22; 20]), U256::from(1000))?;
//! assert_eq!(&call.data()[..4], &[0xa9, 0x05, 0x9c, 0xbb]);
//!
//! let decoded = Erc20Call::decode(call.data())?;
//! assert!(matches!(decoded, Erc20Call::Transfer { .. }));
//! # Ok::<(), tessera_contract::ContractError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod address_gen;
mod call;
mod contract;
pub mod erc20;
mod error;

pub use call::{CallRequest, ContractCall, ContractReadCall};
pub use contract::{Contract, ContractBuilder};
pub use erc20::{Erc20Call, Erc20Event, Erc20Method, Erc20Token};
pub use error::{ContractError, ContractResult};
