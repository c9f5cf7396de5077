//! Dome SDK
//!
//! Building blocks for private payouts on Miden funded from EVM chains:
//! - Felt/word codecs for account ids, note recipients and EVM addresses
//! - Disperse script generation (one note per recipient)
//! - Preswap routing over Uniswap V2

pub mod core;
pub mod models;
pub mod providers;
pub mod utils;

pub use crate::core::{generate_disperse_script, PreswapProvider, PreswapService};
pub use models::config::UniV2ProviderConfig;
pub use models::errors::{AppError, AppResult, ErrorCode};
pub use models::types::{
    AssetAccountId, DisperseRequest, Felt, FromToken, Route, RouteFee, RouteRequest, RouteSource,
    Share, ToToken, TokenAddress, Word,
};
pub use providers::UniV2PreswapProvider;
pub use utils::account::account_id_hex_to_felts;
pub use utils::evm::{evm_address_to_felts, felts_to_evm_address, parse_evm_address};
pub use utils::words::{word_hex_to_felts, word_to_hex};
