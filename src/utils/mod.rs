//! Utils Module - Encoding Helpers & Shared Constants
//!
//! Felt, word, account-id and EVM address codecs used to build
//! Miden transaction scripts.

pub mod account;
pub mod constants;
pub mod evm;
pub mod felts;
pub mod words;

pub use account::*;
pub use constants::*;
pub use evm::*;
pub use felts::{bytes_to_felt, felt_to_bytes};
pub use words::*;
