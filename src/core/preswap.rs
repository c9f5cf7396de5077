//! Preswap Service
//! Chain-id keyed dispatch over quote/execute providers

use alloy::signers::local::PrivateKeySigner;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::models::errors::{AppError, AppResult};
use crate::models::types::{Route, RouteRequest};

/// A protocol able to quote and execute exact-output swaps
#[async_trait]
pub trait PreswapProvider: Send + Sync {
    /// Human-readable provider name for logs
    fn name(&self) -> &str;

    /// Chains this provider can serve
    fn supported_chain_ids(&self) -> Vec<u64>;

    /// Install the signer used for execution
    fn set_signer(&self, signer: PrivateKeySigner);

    /// Price the request; may return several alternatives
    async fn fetch_routes(&self, request: &RouteRequest) -> AppResult<Vec<Route>>;

    /// Execute a route previously returned by [`fetch_routes`](Self::fetch_routes)
    async fn execute_route(&self, route: &Route) -> AppResult<()>;
}

/// Registry dispatching requests to the first provider serving the chain
#[derive(Clone, Default)]
pub struct PreswapService {
    providers: Vec<Arc<dyn PreswapProvider>>,
}

impl PreswapService {
    pub fn new(providers: Vec<Arc<dyn PreswapProvider>>) -> Self {
        Self { providers }
    }

    /// Build from a chain-id keyed map; keys are informational only,
    /// dispatch always goes through `supported_chain_ids`.
    pub fn from_map(providers: HashMap<u64, Arc<dyn PreswapProvider>>) -> Self {
        let mut entries: Vec<_> = providers.into_iter().collect();
        entries.sort_by_key(|(chain_id, _)| *chain_id);
        Self::new(entries.into_iter().map(|(_, p)| p).collect())
    }

    pub fn providers(&self) -> &[Arc<dyn PreswapProvider>] {
        &self.providers
    }

    /// Hand a new signer to every provider
    pub fn set_signer(&self, signer: PrivateKeySigner) {
        info!("🔑 Updating signer {} on {} providers", signer.address(), self.providers.len());
        for provider in &self.providers {
            provider.set_signer(signer.clone());
        }
    }

    fn provider_for(&self, chain_id: u64) -> AppResult<&Arc<dyn PreswapProvider>> {
        self.providers
            .iter()
            .find(|p| p.supported_chain_ids().contains(&chain_id))
            .ok_or_else(|| {
                warn!("No preswap provider for chain {}", chain_id);
                AppError::no_provider(chain_id)
            })
    }

    /// Quote a request on the provider serving its chain
    pub async fn get_routes(&self, request: &RouteRequest) -> AppResult<Vec<Route>> {
        let provider = self.provider_for(request.chain_id)?;
        debug!(chain_id = request.chain_id, provider = provider.name(), "fetching routes");
        provider.fetch_routes(request).await
    }

    /// Execute a route on the provider serving its chain
    pub async fn execute_route(&self, route: &Route) -> AppResult<()> {
        let provider = self.provider_for(route.chain_id())?;
        debug!(chain_id = route.chain_id(), provider = provider.name(), "executing route");
        provider.execute_route(route).await
    }
}
