//! Providers Module - Chain I/O
//!
//! Preswap provider implementations and the RPC read helpers they share.

pub mod rpc;
pub mod uniswap_v2;

pub use uniswap_v2::UniV2PreswapProvider;
