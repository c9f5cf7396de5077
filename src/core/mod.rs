//! Core Module - Business Logic
//!
//! Disperse script generation, Uniswap V2 pricing and the preswap service.

pub mod disperse;
pub mod preswap;
pub mod v2_math;

pub use disperse::generate_disperse_script;
pub use preswap::{PreswapProvider, PreswapService};
