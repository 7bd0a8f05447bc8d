//! # tessera-crypto
//!
//! Keccak-256 hashing, the digest behind method selectors, event topics
//! and contract address derivation.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod hash;

pub use hash::{keccak256, keccak256_concat};
