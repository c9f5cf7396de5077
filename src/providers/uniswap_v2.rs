//! Uniswap V2 preswap provider
//!
//! Quotes exact-output single-hop trades from live pair reserves and
//! executes them through UniswapV2Router02. Reads go through the retry
//! helper; transactions are sent once and awaited for the configured
//! number of confirmations.

use alloy::network::{EthereumWallet, ReceiptResponse};
use alloy::signers::local::PrivateKeySigner;
use alloy::sol;
use alloy::transports::http::reqwest::{Client, Url};
use alloy::transports::http::Http;
use alloy_primitives::{Address, U256};
use alloy_provider::{Provider, ProviderBuilder, RootProvider};
use alloy_rpc_types::BlockNumberOrTag;
use async_trait::async_trait;
use chrono::Utc;
use std::future::Future;
use std::sync::RwLock;
use tracing::{debug, info};

use crate::core::preswap::PreswapProvider;
use crate::core::v2_math::{estimate_gas_fee, get_amount_in, max_amount_in, orient_reserves, pair_address};
use crate::models::config::UniV2ProviderConfig;
use crate::models::errors::{AppError, AppResult};
use crate::models::types::{Route, RouteFee, RouteRequest, RouteSource};
use crate::providers::rpc::{read_with_retry, with_timeout};
use crate::utils::constants::{
    get_chain_name, FEE_HISTORY_BLOCKS, FEE_HISTORY_REWARD_PERCENTILE, SWAP_DEADLINE_SECS,
};

sol! {
    #[sol(rpc)]
    interface IUniswapV2Pair {
        function getReserves() external view returns (uint112 reserve0, uint112 reserve1, uint32 blockTimestampLast);
    }

    #[sol(rpc)]
    interface IERC20 {
        function allowance(address owner, address spender) external view returns (uint256 remaining);
        function approve(address spender, uint256 amount) external returns (bool success);
    }

    #[sol(rpc)]
    interface IUniswapV2Router02 {
        function swapETHForExactTokens(
            uint256 amountOut,
            address[] calldata path,
            address to,
            uint256 deadline
        ) external payable returns (uint256[] memory amounts);

        function swapTokensForExactTokens(
            uint256 amountOut,
            uint256 amountInMax,
            address[] calldata path,
            address to,
            uint256 deadline
        ) external returns (uint256[] memory amounts);
    }
}

type HttpProvider = RootProvider<Http<Client>>;

/// Uniswap V2 implementation of [`PreswapProvider`]
pub struct UniV2PreswapProvider {
    config: UniV2ProviderConfig,
    rpc_url: Url,
    provider: HttpProvider,
    signer: RwLock<Option<PrivateKeySigner>>,
}

impl UniV2PreswapProvider {
    /// Create a provider; no request is made until the first quote
    pub fn new(config: UniV2ProviderConfig) -> AppResult<Self> {
        config.validate()?;
        let rpc_url: Url = config
            .rpc_url
            .parse()
            .map_err(|e| AppError::invalid_config(format!("invalid rpc_url {}: {}", config.rpc_url, e)))?;

        info!(
            "🦄 Uniswap V2 provider ready on {} (router {})",
            get_chain_name(config.chain_id),
            config.swap_router_address
        );

        Ok(Self {
            provider: RootProvider::new_http(rpc_url.clone()),
            rpc_url,
            config,
            signer: RwLock::new(None),
        })
    }

    pub fn with_signer(self, signer: PrivateKeySigner) -> Self {
        self.set_signer(signer);
        self
    }

    pub fn config(&self) -> &UniV2ProviderConfig {
        &self.config
    }

    fn signer(&self) -> Option<PrivateKeySigner> {
        self.signer
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn ensure_chain(&self, chain_id: u64) -> AppResult<()> {
        if chain_id != self.config.chain_id {
            return Err(AppError::chain_mismatch(self.config.chain_id, chain_id));
        }
        Ok(())
    }

    /// Token path for a request, with `native` mapped to WETH
    fn token_path(&self, request: &RouteRequest) -> AppResult<Vec<Address>> {
        let token_in = request.from_token.address.resolve(self.config.weth_address);
        let token_out = request.to_token.address;
        if token_in == token_out {
            return Err(AppError::invalid_route(format!(
                "input and output token are both {}",
                token_in
            )));
        }
        Ok(vec![token_in, token_out])
    }

    /// Check that a route was produced by this provider for its own request
    fn validate_route(&self, route: &Route) -> AppResult<Vec<Address>> {
        self.ensure_chain(route.chain_id())?;
        let RouteSource::UniswapV2 { pair, path } = &route.source;

        let expected_path = self.token_path(&route.request)?;
        if *path != expected_path {
            return Err(AppError::invalid_route("Invalid route: path does not match request"));
        }
        if *pair != pair_address(self.config.factory_address, path[0], path[1]) {
            return Err(AppError::invalid_route("Invalid route: unknown pair"));
        }
        Ok(expected_path)
    }

    /// Retried, time-bounded read
    async fn read<T, F, Fut>(&self, label: &str, op: F) -> AppResult<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        let timeout = self.config.rpc_timeout;
        read_with_retry(label, || with_timeout(label, timeout, op())).await
    }

    async fn fetch_reserves(&self, token_in: Address, token_out: Address, pair: Address) -> AppResult<(U256, U256)> {
        let provider = &self.provider;

        let code = self
            .read("getCode", move || async move {
                provider.get_code_at(pair).await.map_err(AppError::from)
            })
            .await?;
        if code.is_empty() {
            return Err(AppError::insufficient_liquidity(format!("no V2 pair at {}", pair)));
        }

        let contract = IUniswapV2Pair::new(pair, provider);
        let contract = &contract;
        let reserves = self
            .read("getReserves", move || async move {
                contract.getReserves().call().await.map_err(AppError::from)
            })
            .await?;

        Ok(orient_reserves(
            token_in,
            token_out,
            U256::from(reserves.reserve0.to::<u128>()),
            U256::from(reserves.reserve1.to::<u128>()),
        ))
    }

    async fn fetch_gas_fee(&self) -> AppResult<U256> {
        let provider = &self.provider;
        let history = self
            .read("feeHistory", move || async move {
                provider
                    .get_fee_history(
                        FEE_HISTORY_BLOCKS,
                        BlockNumberOrTag::Latest,
                        &[FEE_HISTORY_REWARD_PERCENTILE],
                    )
                    .await
                    .map_err(AppError::from)
            })
            .await?;

        Ok(estimate_gas_fee(&history.base_fee_per_gas, history.reward.as_deref()))
    }

    /// Approve the router for `amount` unless the allowance already covers it
    async fn ensure_allowance<P>(&self, provider: &P, token: Address, owner: Address, amount: U256) -> AppResult<()>
    where
        P: Provider<Http<Client>>,
    {
        let router = self.config.swap_router_address;
        let erc20 = IERC20::new(token, provider);
        let erc20 = &erc20;

        let allowance = self
            .read("allowance", move || async move {
                erc20.allowance(owner, router).call().await.map_err(AppError::from)
            })
            .await?
            .remaining;

        if allowance >= amount {
            debug!("allowance {} covers {}", allowance, amount);
            return Ok(());
        }

        info!("📝 Approving {} of {} for router {}", amount, token, router);
        let receipt = erc20
            .approve(router, amount)
            .send()
            .await?
            .with_required_confirmations(self.config.tx_confirmations)
            .get_receipt()
            .await?;
        if !receipt.status() {
            return Err(AppError::tx_failed(format!(
                "approve reverted: {}",
                receipt.transaction_hash
            )));
        }
        Ok(())
    }

    async fn swap<P>(&self, provider: &P, route: &Route, path: Vec<Address>, to: Address) -> AppResult<()>
    where
        P: Provider<Http<Client>>,
    {
        let router = IUniswapV2Router02::new(self.config.swap_router_address, provider);
        let deadline = U256::from(Utc::now().timestamp().max(0) as u64 + SWAP_DEADLINE_SECS);
        let amount_out = route.request.exact_amount_out;

        let pending = if path[0] == self.config.weth_address {
            info!("🔁 swapETHForExactTokens out={} value={}", amount_out, route.amount_in);
            router
                .swapETHForExactTokens(amount_out, path, to, deadline)
                .value(route.amount_in)
                .send()
                .await?
        } else {
            self.ensure_allowance(provider, path[0], to, route.amount_in)
                .await?;
            info!("🔁 swapTokensForExactTokens out={} max_in={}", amount_out, route.amount_in);
            router
                .swapTokensForExactTokens(amount_out, route.amount_in, path, to, deadline)
                .send()
                .await?
        };

        let receipt = pending
            .with_required_confirmations(self.config.tx_confirmations)
            .get_receipt()
            .await?;
        if !receipt.status() {
            return Err(AppError::tx_failed(format!(
                "swap reverted: {}",
                receipt.transaction_hash
            )));
        }

        info!("✅ Swap confirmed in {}", receipt.transaction_hash);
        Ok(())
    }
}

#[async_trait]
impl PreswapProvider for UniV2PreswapProvider {
    fn name(&self) -> &str {
        "uniswap-v2"
    }

    fn supported_chain_ids(&self) -> Vec<u64> {
        vec![self.config.chain_id]
    }

    fn set_signer(&self, signer: PrivateKeySigner) {
        let mut slot = self
            .signer
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = Some(signer);
    }

    async fn fetch_routes(&self, request: &RouteRequest) -> AppResult<Vec<Route>> {
        self.ensure_chain(request.chain_id)?;
        let path = self.token_path(request)?;
        let pair = pair_address(self.config.factory_address, path[0], path[1]);

        let (reserve_in, reserve_out) = self.fetch_reserves(path[0], path[1], pair).await?;
        let quoted_in = get_amount_in(request.exact_amount_out, reserve_in, reserve_out)?;
        let amount_in = max_amount_in(quoted_in, self.config.slippage_bps)?;
        let gas_fee = self.fetch_gas_fee().await?;

        let estimated_at = Utc::now();
        let validity = chrono::Duration::milliseconds(self.config.quote_validity.as_millis() as i64);

        debug!(
            pair = %pair,
            reserve_in = %reserve_in,
            reserve_out = %reserve_out,
            amount_in = %amount_in,
            "quoted exact-output trade"
        );

        Ok(vec![Route {
            request: request.clone(),
            amount_in,
            fee: RouteFee {
                token_in_amount: Some(quoted_in),
                token_out_amount: Some(request.exact_amount_out),
                gas_fee,
            },
            estimated_at,
            valid_until: estimated_at + validity,
            source: RouteSource::UniswapV2 { pair, path },
        }])
    }

    async fn execute_route(&self, route: &Route) -> AppResult<()> {
        let path = self.validate_route(route)?;
        if route.is_expired() {
            return Err(AppError::quote_expired());
        }
        let signer = self.signer().ok_or_else(AppError::missing_signer)?;
        let recipient = signer.address();

        let provider = ProviderBuilder::new()
            .with_recommended_fillers()
            .wallet(EthereumWallet::from(signer))
            .on_http(self.rpc_url.clone());

        self.swap(&provider, route, path, recipient).await
    }
}
