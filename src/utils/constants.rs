//! Constants Module - Single Source of Truth
//!
//! Script tags, chain ids, and the Uniswap V2 deployments the preswap
//! providers talk to.

use alloy_primitives::{address, b256, Address, B256};

// ============================================
// APPLICATION CONSTANTS
// ============================================

/// Application name
pub const APP_NAME: &str = "dome";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================
// DISPERSE SCRIPT CONSTANTS
// ============================================

/// Note tag attached to every created note unless overridden
pub const DEFAULT_TAG: u64 = 4177657856;

/// Byte width of a felt
pub const FELT_BYTES: usize = 8;

/// Byte width of a word (four felts)
pub const WORD_BYTES: usize = 32;

/// Byte width of a Miden account id
pub const ACCOUNT_ID_BYTES: usize = 15;

/// Byte width of an EVM address
pub const EVM_ADDRESS_BYTES: usize = 20;

// ============================================
// CHAIN IDS
// ============================================

/// Ethereum Mainnet
pub const CHAIN_ID_ETHEREUM: u64 = 1;
/// Sepolia testnet
pub const CHAIN_ID_SEPOLIA: u64 = 11155111;

/// Chains with a known Uniswap V2 deployment
pub const SUPPORTED_CHAIN_IDS: [u64; 2] = [CHAIN_ID_ETHEREUM, CHAIN_ID_SEPOLIA];

/// Get chain name
pub fn get_chain_name(chain_id: u64) -> &'static str {
    match chain_id {
        CHAIN_ID_ETHEREUM => "Ethereum",
        CHAIN_ID_SEPOLIA => "Sepolia",
        _ => "Unknown",
    }
}

// ============================================
// WETH ADDRESSES
// ============================================

/// Get WETH9 address for a chain
pub fn get_weth_address(chain_id: u64) -> Option<Address> {
    match chain_id {
        CHAIN_ID_ETHEREUM => Some(address!("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2")),
        CHAIN_ID_SEPOLIA => Some(address!("fFf9976782d46CC05630D1f6eBAb18b2324d6B14")),
        _ => None,
    }
}

// ============================================
// UNISWAP V2 DEPLOYMENTS
// ============================================

/// Init code hash of the canonical UniswapV2Pair
pub const UNISWAP_V2_INIT_CODE_HASH: B256 =
    b256!("96e8ac4277198ff8b6f785478aa9a39f403cb768dd02cbee326c3e7da348845f");

/// Get UniswapV2Factory address for a chain
pub fn get_v2_factory(chain_id: u64) -> Option<Address> {
    match chain_id {
        CHAIN_ID_ETHEREUM => Some(address!("5C69bEe701ef814a2B6a3EDD4B1652CB9cc5aA6f")),
        CHAIN_ID_SEPOLIA => Some(address!("F62c03E08ada871A0bEb309762E260a7a6a880E6")),
        _ => None,
    }
}

/// Get UniswapV2Router02 address for a chain
pub fn get_v2_router(chain_id: u64) -> Option<Address> {
    match chain_id {
        CHAIN_ID_ETHEREUM => Some(address!("7a250d5630B4cF539739dF2C5dAcb4c659F2488D")),
        CHAIN_ID_SEPOLIA => Some(address!("eE567Fe1712Faf6149d80dA1E6934E354124CfE3")),
        _ => None,
    }
}

// ============================================
// PRESWAP DEFAULTS
// ============================================

/// Gas budget of a single-hop V2 swap
pub const SINGLE_HOP_SWAP_GAS_LIMIT: u64 = 127_000;

/// How long a quote stays executable (3 minutes)
pub const DEFAULT_QUOTE_VALIDITY_MS: u64 = 1000 * 60 * 3;

/// Confirmations awaited per transaction
pub const DEFAULT_TX_CONFIRMATIONS: u64 = 5;

/// Slippage tolerance in basis points (0.5%)
pub const DEFAULT_SLIPPAGE_BPS: u32 = 50;

/// Swap deadline offset from submission (seconds)
pub const SWAP_DEADLINE_SECS: u64 = 1800;

/// Blocks sampled for gas estimation
pub const FEE_HISTORY_BLOCKS: u64 = 10;

/// Reward percentile sampled for the priority fee
pub const FEE_HISTORY_REWARD_PERCENTILE: f64 = 50.0;

/// Default timeout for RPC requests (seconds)
pub const DEFAULT_RPC_TIMEOUT_SECS: u64 = 60;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_chains_have_deployments() {
        for chain_id in SUPPORTED_CHAIN_IDS {
            assert!(get_weth_address(chain_id).is_some());
            assert!(get_v2_factory(chain_id).is_some());
            assert!(get_v2_router(chain_id).is_some());
            assert_ne!(get_chain_name(chain_id), "Unknown");
        }
    }

    #[test]
    fn test_unknown_chain() {
        assert!(get_weth_address(999).is_none());
        assert!(get_v2_router(999).is_none());
    }
}
