//! Core primitives shared by the garbling and oblivious transfer crates.
//!
//! This crate does not implement any protocol logic, see `yao-garble-core`
//! and `yao-ot-core` for that.

#![deny(missing_docs, unreachable_pub, unused_must_use)]
#![deny(clippy::all)]

pub mod aes;
mod block;

pub use aes::{FixedKeyAes, FIXED_KEY_AES};
pub use block::Block;
