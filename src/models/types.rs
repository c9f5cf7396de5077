//! Type definitions for the Dome SDK
//! Felt primitives, disperse requests and preswap routes

use alloy_primitives::{Address, U256};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::constants::DEFAULT_TAG;

/// Native scalar of the Miden VM
pub type Felt = u64;

/// Four felts, 32 bytes serialized
pub type Word = [Felt; 4];

// ============================================
// DISPERSE
// ============================================

/// Faucet account the dispersed asset is issued by
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AssetAccountId {
    /// 15-byte account id as hex
    Hex(String),
    /// Already decoded felt pair
    Felts([Felt; 2]),
}

impl From<&str> for AssetAccountId {
    fn from(hex: &str) -> Self {
        Self::Hex(hex.to_string())
    }
}

impl From<[Felt; 2]> for AssetAccountId {
    fn from(felts: [Felt; 2]) -> Self {
        Self::Felts(felts)
    }
}

/// One recipient of a disperse
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Share {
    /// Recipient word as 32-byte hex
    pub recipient: String,
    /// Amount in the asset's smallest unit
    pub amount: u64,
}

impl Share {
    pub fn new(recipient: impl Into<String>, amount: u64) -> Self {
        Self {
            recipient: recipient.into(),
            amount,
        }
    }
}

/// Input to the disperse script generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisperseRequest {
    pub asset_account_id: AssetAccountId,
    #[serde(default = "default_tag")]
    pub tag: u64,
    pub shares: Vec<Share>,
}

fn default_tag() -> u64 {
    DEFAULT_TAG
}

impl DisperseRequest {
    /// Request with the default note tag
    pub fn new(asset_account_id: impl Into<AssetAccountId>, shares: Vec<Share>) -> Self {
        Self {
            asset_account_id: asset_account_id.into(),
            tag: DEFAULT_TAG,
            shares,
        }
    }

    pub fn with_tag(mut self, tag: u64) -> Self {
        self.tag = tag;
        self
    }
}

// ============================================
// PRESWAP
// ============================================

/// Source token address; `native` means the chain's gas token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenAddress {
    Native,
    #[serde(untagged)]
    Erc20(Address),
}

impl TokenAddress {
    /// Resolve `Native` to the wrapped token
    pub fn resolve(&self, wrapped_native: Address) -> Address {
        match self {
            TokenAddress::Native => wrapped_native,
            TokenAddress::Erc20(addr) => *addr,
        }
    }
}

/// Token being sold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FromToken {
    pub address: TokenAddress,
    pub decimals: u8,
}

/// Token being bought
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToToken {
    pub address: Address,
    pub decimals: u8,
}

/// Exact-output quote request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRequest {
    pub chain_id: u64,
    pub from_token: FromToken,
    pub to_token: ToToken,
    pub exact_amount_out: U256,
}

/// Fee breakdown of a route
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteFee {
    pub token_in_amount: Option<U256>,
    pub token_out_amount: Option<U256>,
    pub gas_fee: U256,
}

/// Provider-specific execution data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RouteSource {
    /// Single-hop Uniswap V2 trade
    UniswapV2 { pair: Address, path: Vec<Address> },
}

/// Priced, time-limited quote returned by a provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    #[serde(flatten)]
    pub request: RouteRequest,
    /// Maximum input including slippage
    pub amount_in: U256,
    pub fee: RouteFee,
    pub estimated_at: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
    pub source: RouteSource,
}

impl Route {
    pub fn chain_id(&self) -> u64 {
        self.request.chain_id
    }

    /// Check validity window against `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.valid_until
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}
