//! dome - command line front-end for the Dome SDK
//!
//! - `disperse`: render a disperse script from a JSON request
//! - `felts`: decode words, account ids and EVM addresses into felts
//! - `quote` / `swap`: preswap over Uniswap V2 (configured via `PRESWAP_*`)

use alloy::signers::local::PrivateKeySigner;
use alloy_primitives::{Address, U256};
use clap::{Parser, Subcommand, ValueEnum};
use dome_sdk::models::types::{FromToken, RouteRequest, ToToken, TokenAddress};
use dome_sdk::utils::constants::{APP_NAME, APP_VERSION};
use dome_sdk::{
    account_id_hex_to_felts, evm_address_to_felts, generate_disperse_script, parse_evm_address,
    word_hex_to_felts, DisperseRequest, PreswapProvider, PreswapService, UniV2PreswapProvider,
    UniV2ProviderConfig,
};
use eyre::{eyre, Result, WrapErr};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = APP_NAME, version = APP_VERSION, about = "Dome SDK tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the disperse script for a JSON request file
    Disperse {
        /// Path to a request: {"assetAccountId", "tag"?, "shares": [{"recipient", "amount"}]}
        request: PathBuf,
    },
    /// Decode a hex identifier into felts
    Felts {
        #[arg(value_enum)]
        kind: FeltKind,
        hex: String,
    },
    /// Quote an exact-output swap
    Quote(SwapArgs),
    /// Quote and execute an exact-output swap (needs PRESWAP_PRIVATE_KEY)
    Swap(SwapArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum FeltKind {
    Word,
    Account,
    Address,
}

#[derive(clap::Args, Debug)]
struct SwapArgs {
    /// Token sold: `native` or an ERC20 address
    #[arg(long, value_parser = parse_token_address)]
    from: TokenAddress,
    #[arg(long, default_value_t = 18)]
    from_decimals: u8,
    /// Token bought
    #[arg(long, value_parser = parse_address)]
    to: Address,
    #[arg(long, default_value_t = 18)]
    to_decimals: u8,
    /// Exact output amount in the smallest unit
    #[arg(long, value_parser = parse_u256)]
    amount_out: U256,
}

fn parse_token_address(raw: &str) -> std::result::Result<TokenAddress, String> {
    if raw.eq_ignore_ascii_case("native") {
        return Ok(TokenAddress::Native);
    }
    parse_address(raw).map(TokenAddress::Erc20)
}

fn parse_address(raw: &str) -> std::result::Result<Address, String> {
    parse_evm_address(raw).map_err(|e| e.to_string())
}

fn parse_u256(raw: &str) -> std::result::Result<U256, String> {
    U256::from_str(raw).map_err(|e| format!("invalid amount {}: {}", raw, e))
}

fn print_felts(felts: &[u64]) {
    let rendered: Vec<String> = felts.iter().map(|f| f.to_string()).collect();
    println!("[{}]", rendered.join(", "));
}

fn build_service(signer: Option<PrivateKeySigner>) -> Result<(PreswapService, u64)> {
    let config = UniV2ProviderConfig::from_env()?;
    let chain_id = config.chain_id;
    let provider: Arc<dyn PreswapProvider> = Arc::new(UniV2PreswapProvider::new(config)?);

    let service = PreswapService::new(vec![provider]);
    if let Some(signer) = signer {
        service.set_signer(signer);
    }
    Ok((service, chain_id))
}

fn route_request(chain_id: u64, args: &SwapArgs) -> RouteRequest {
    RouteRequest {
        chain_id,
        from_token: FromToken {
            address: args.from,
            decimals: args.from_decimals,
        },
        to_token: ToToken {
            address: args.to,
            decimals: args.to_decimals,
        },
        exact_amount_out: args.amount_out,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Disperse { request } => {
            let raw = std::fs::read_to_string(&request)
                .wrap_err_with(|| format!("reading {}", request.display()))?;
            let request: DisperseRequest = serde_json::from_str(&raw)?;
            print!("{}", generate_disperse_script(&request)?);
        }
        Command::Felts { kind, hex } => match kind {
            FeltKind::Word => print_felts(&word_hex_to_felts(&hex)?),
            FeltKind::Account => print_felts(&account_id_hex_to_felts(&hex)?),
            FeltKind::Address => print_felts(&evm_address_to_felts(&hex)?),
        },
        Command::Quote(args) => {
            let (service, chain_id) = build_service(None)?;
            let routes = service.get_routes(&route_request(chain_id, &args)).await?;
            println!("{}", serde_json::to_string_pretty(&routes)?);
        }
        Command::Swap(args) => {
            let key = std::env::var("PRESWAP_PRIVATE_KEY")
                .map_err(|_| eyre!("PRESWAP_PRIVATE_KEY is not set"))?;
            let signer = PrivateKeySigner::from_str(key.trim_start_matches("0x"))
                .map_err(|e| eyre!("invalid PRESWAP_PRIVATE_KEY: {}", e))?;
            info!("🔑 Swapping as {}", signer.address());

            let (service, chain_id) = build_service(Some(signer))?;
            let routes = service.get_routes(&route_request(chain_id, &args)).await?;
            let route = routes
                .first()
                .ok_or_else(|| eyre!("no route for {:?}", args))?;
            println!("{}", serde_json::to_string_pretty(route)?);

            service.execute_route(route).await?;
            info!("✅ Preswap complete");
        }
    }

    Ok(())
}
