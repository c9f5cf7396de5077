//! Configuration module for preswap providers
//!
//! Defaults come from `utils::constants`; every field can be overridden
//! through `PRESWAP_*` environment variables.

use alloy_primitives::Address;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

use crate::models::errors::{AppError, AppResult};
use crate::utils::constants::{
    get_chain_name, get_v2_factory, get_v2_router, get_weth_address, CHAIN_ID_SEPOLIA,
    DEFAULT_QUOTE_VALIDITY_MS, DEFAULT_RPC_TIMEOUT_SECS, DEFAULT_SLIPPAGE_BPS,
    DEFAULT_TX_CONFIRMATIONS,
};

/// Configuration for a Uniswap V2 preswap provider
#[derive(Debug, Clone, PartialEq)]
pub struct UniV2ProviderConfig {
    /// Chain the provider serves
    pub chain_id: u64,
    /// HTTP JSON-RPC endpoint
    pub rpc_url: String,
    /// UniswapV2Router02
    pub swap_router_address: Address,
    /// UniswapV2Factory, used to derive pair addresses
    pub factory_address: Address,
    /// Wrapped native token substituted for `native`
    pub weth_address: Address,
    /// How long a quote stays executable
    pub quote_validity: Duration,
    /// Confirmations awaited per transaction
    pub tx_confirmations: u64,
    /// Slippage tolerance in basis points
    pub slippage_bps: u32,
    /// Timeout for RPC calls
    pub rpc_timeout: Duration,
}

impl Default for UniV2ProviderConfig {
    /// Sepolia deployments against a local node
    fn default() -> Self {
        Self {
            chain_id: CHAIN_ID_SEPOLIA,
            rpc_url: "http://localhost:8545".to_string(),
            swap_router_address: get_v2_router(CHAIN_ID_SEPOLIA).unwrap_or_default(),
            factory_address: get_v2_factory(CHAIN_ID_SEPOLIA).unwrap_or_default(),
            weth_address: get_weth_address(CHAIN_ID_SEPOLIA).unwrap_or_default(),
            quote_validity: Duration::from_millis(DEFAULT_QUOTE_VALIDITY_MS),
            tx_confirmations: DEFAULT_TX_CONFIRMATIONS,
            slippage_bps: DEFAULT_SLIPPAGE_BPS,
            rpc_timeout: Duration::from_secs(DEFAULT_RPC_TIMEOUT_SECS),
        }
    }
}

impl UniV2ProviderConfig {
    /// Config with the known deployments of `chain_id`
    pub fn for_chain(chain_id: u64, rpc_url: impl Into<String>) -> AppResult<Self> {
        let swap_router_address =
            get_v2_router(chain_id).ok_or_else(|| AppError::unsupported_chain(chain_id))?;
        let factory_address =
            get_v2_factory(chain_id).ok_or_else(|| AppError::unsupported_chain(chain_id))?;
        let weth_address =
            get_weth_address(chain_id).ok_or_else(|| AppError::unsupported_chain(chain_id))?;

        Ok(Self {
            chain_id,
            rpc_url: rpc_url.into(),
            swap_router_address,
            factory_address,
            weth_address,
            quote_validity: Duration::from_millis(DEFAULT_QUOTE_VALIDITY_MS),
            tx_confirmations: DEFAULT_TX_CONFIRMATIONS,
            slippage_bps: DEFAULT_SLIPPAGE_BPS,
            rpc_timeout: Duration::from_secs(DEFAULT_RPC_TIMEOUT_SECS),
        })
    }

    /// Load from environment.
    ///
    /// `PRESWAP_RPC_URL` is required. `PRESWAP_CHAIN_ID` defaults to Sepolia.
    /// Addresses for chains without a known deployment must all be given.
    pub fn from_env() -> AppResult<Self> {
        let chain_id = env_parse("PRESWAP_CHAIN_ID")?.unwrap_or(CHAIN_ID_SEPOLIA);
        let rpc_url = std::env::var("PRESWAP_RPC_URL")
            .map_err(|_| AppError::missing_env("PRESWAP_RPC_URL"))?;

        let mut config = match Self::for_chain(chain_id, rpc_url.clone()) {
            Ok(config) => config,
            Err(_) => Self {
                chain_id,
                rpc_url,
                swap_router_address: env_address("PRESWAP_ROUTER_ADDRESS")?
                    .ok_or_else(|| AppError::missing_env("PRESWAP_ROUTER_ADDRESS"))?,
                factory_address: env_address("PRESWAP_FACTORY_ADDRESS")?
                    .ok_or_else(|| AppError::missing_env("PRESWAP_FACTORY_ADDRESS"))?,
                weth_address: env_address("PRESWAP_WETH_ADDRESS")?
                    .ok_or_else(|| AppError::missing_env("PRESWAP_WETH_ADDRESS"))?,
                quote_validity: Duration::from_millis(DEFAULT_QUOTE_VALIDITY_MS),
                tx_confirmations: DEFAULT_TX_CONFIRMATIONS,
                slippage_bps: DEFAULT_SLIPPAGE_BPS,
                rpc_timeout: Duration::from_secs(DEFAULT_RPC_TIMEOUT_SECS),
            },
        };

        if let Some(addr) = env_address("PRESWAP_ROUTER_ADDRESS")? {
            config.swap_router_address = addr;
        }
        if let Some(addr) = env_address("PRESWAP_FACTORY_ADDRESS")? {
            config.factory_address = addr;
        }
        if let Some(addr) = env_address("PRESWAP_WETH_ADDRESS")? {
            config.weth_address = addr;
        }
        if let Some(ms) = env_parse::<u64>("PRESWAP_QUOTE_VALIDITY_MS")? {
            config.quote_validity = Duration::from_millis(ms);
        }
        if let Some(n) = env_parse("PRESWAP_TX_CONFIRMATIONS")? {
            config.tx_confirmations = n;
        }
        if let Some(bps) = env_parse("PRESWAP_SLIPPAGE_BPS")? {
            config.slippage_bps = bps;
        }

        config.validate()?;
        info!(
            "⚙️  Preswap config loaded for {} (chain {})",
            get_chain_name(config.chain_id),
            config.chain_id
        );
        Ok(config)
    }

    /// Reject values no provider can work with
    pub fn validate(&self) -> AppResult<()> {
        if self.rpc_url.is_empty() {
            return Err(AppError::invalid_config("rpc_url is empty"));
        }
        if self.slippage_bps > 10_000 {
            return Err(AppError::invalid_config(format!(
                "slippage_bps {} exceeds 10000",
                self.slippage_bps
            )));
        }
        if self.quote_validity.is_zero() {
            return Err(AppError::invalid_config("quote_validity must be positive"));
        }
        Ok(())
    }

    pub fn with_slippage_bps(mut self, bps: u32) -> Self {
        self.slippage_bps = bps;
        self
    }

    pub fn with_tx_confirmations(mut self, confirmations: u64) -> Self {
        self.tx_confirmations = confirmations;
        self
    }

    pub fn with_weth_address(mut self, weth: Address) -> Self {
        self.weth_address = weth;
        self
    }

    pub fn with_quote_validity(mut self, validity: Duration) -> Self {
        self.quote_validity = validity;
        self
    }
}

fn env_parse<T: FromStr>(key: &str) -> AppResult<Option<T>> {
    match std::env::var(key) {
        Ok(raw) if !raw.is_empty() => raw
            .parse()
            .map(Some)
            .map_err(|_| AppError::invalid_config(format!("{} is not valid: {}", key, raw))),
        _ => Ok(None),
    }
}

fn env_address(key: &str) -> AppResult<Option<Address>> {
    match std::env::var(key) {
        Ok(raw) if !raw.is_empty() => crate::utils::evm::parse_evm_address(&raw).map(Some),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::errors::ErrorCode;
    use crate::utils::constants::CHAIN_ID_ETHEREUM;

    #[test]
    fn test_for_chain_defaults() {
        let config = UniV2ProviderConfig::for_chain(CHAIN_ID_SEPOLIA, "http://localhost:8545").unwrap();
        assert_eq!(config.quote_validity, Duration::from_secs(180));
        assert_eq!(config.tx_confirmations, 5);
        assert_eq!(config.slippage_bps, 50);
        assert_eq!(
            config.swap_router_address,
            Address::from_str("0xeE567Fe1712Faf6149d80dA1E6934E354124CfE3").unwrap()
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_is_sepolia() {
        let config = UniV2ProviderConfig::default();
        let expected = UniV2ProviderConfig::for_chain(CHAIN_ID_SEPOLIA, "http://localhost:8545").unwrap();
        assert_eq!(config, expected);
    }

    #[test]
    fn test_for_unknown_chain() {
        let err = UniV2ProviderConfig::for_chain(424242, "http://localhost:8545").unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigUnsupportedChain);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = UniV2ProviderConfig::for_chain(CHAIN_ID_ETHEREUM, "http://localhost:8545")
            .unwrap()
            .with_slippage_bps(20_000);
        assert_eq!(config.validate().unwrap_err().code, ErrorCode::ConfigInvalidValue);

        let config = UniV2ProviderConfig::for_chain(CHAIN_ID_ETHEREUM, "")
            .unwrap();
        assert_eq!(config.validate().unwrap_err().code, ErrorCode::ConfigInvalidValue);
    }
}
