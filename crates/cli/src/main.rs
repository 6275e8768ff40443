//! Command Line Interface for the SuiTrump farm.
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use prettytable::{Table, row};
use primitive_types::U256;
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use suitrump_data::{Clock, SystemClock};
use suitrump_domain::entities::FarmPool;
use suitrump_domain::format::{format_amount, format_balance, shorten_address};
use suitrump_domain::type_tag::{coin_symbol, is_native_coin, parse_lp_type, parse_type_tag};
use suitrump_execution::prelude::*;
use suitrump_protocols::decoder::{RawReturnValue, decode};
use suitrump_protocols::rpc::{ChainClient, SuiRpcClient};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "suitrump")]
#[command(about = "SuiTrump farm chain data CLI", long_about = None)]
struct Cli {
    /// Fullnode JSON-RPC endpoint (overrides SUI_RPC_URL)
    #[arg(long, global = true)]
    rpc_url: Option<String>,

    /// Farm package id (overrides FARM_PACKAGE_ID)
    #[arg(long, global = true)]
    package: Option<String>,

    /// Token cache directory (overrides TOKEN_CACHE_DIR)
    #[arg(long, global = true)]
    cache_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a raw return value, e.g. '[[42,0,0,0,0,0,0,0],"u64"]'
    Decode {
        /// JSON `[bytes, type]` pair or plain JSON value
        json: String,
    },
    /// Parse a Move type string
    ParseType {
        /// Type string, e.g. 0x2::coin::Coin<0x2::sui::SUI>
        type_string: String,
    },
    /// Format a raw amount with the given decimals
    Format {
        /// Raw integer amount
        amount: String,

        /// Token decimals
        decimals: u8,

        /// Maximum fraction digits
        #[arg(long)]
        places: Option<u8>,
    },
    /// List the farm's pools
    Pools {
        /// Include inactive pools
        #[arg(long)]
        all: bool,

        /// Farm reward emission in raw units per second; enables the APR column
        #[arg(long)]
        reward_per_second: Option<String>,

        /// Decimals of the reward coin
        #[arg(long, default_value_t = 9)]
        reward_decimals: u8,

        /// Price of one reward coin
        #[arg(long)]
        reward_price: Option<Decimal>,

        /// Staked value of a pool, by display name or coin type (repeatable)
        #[arg(long = "staked-value", value_name = "POOL=VALUE")]
        staked_values: Vec<String>,
    },
    /// List the coins held by an address
    Tokens {
        /// Wallet address
        owner: String,

        /// Drop the persisted token cache first
        #[arg(long)]
        refresh: bool,
    },
    /// List stakes and locks held by an address
    Positions {
        /// Wallet address
        owner: String,
    },
}

fn load_config(cli: &Cli) -> Result<FarmConfig> {
    let mut config = FarmConfig::from_env()?;
    if let Some(url) = &cli.rpc_url {
        config.rpc.url = url.clone();
    }
    if let Some(package) = &cli.package {
        config.package_id = package.clone();
    }
    if let Some(dir) = &cli.cache_dir {
        config.cache_dir = dir.clone();
    }
    Ok(config)
}

fn connect(config: &FarmConfig) -> Result<Arc<dyn ChainClient>> {
    info!(url = %config.rpc.url, "Connecting to fullnode");
    Ok(Arc::new(SuiRpcClient::new(config.rpc.clone())?))
}

fn print_decoded(json: &str) -> Result<()> {
    let raw: RawReturnValue = serde_json::from_str(json).context("input is not valid JSON")?;
    let value = decode(&raw)?;
    println!("{}", value);
    Ok(())
}

/// Rows describing a type string; LP rows use the configured pair package.
fn type_rows(config: &FarmConfig, type_string: &str) -> Result<Vec<(&'static str, String)>> {
    let tag = parse_type_tag(type_string)?;
    let mut rows = vec![
        ("Normalized", tag.to_string()),
        ("Symbol", coin_symbol(type_string)),
        ("Native", is_native_coin(type_string).to_string()),
    ];
    if let Some(lp) = parse_lp_type(type_string, &config.lp_pattern()) {
        rows.push(("LP name", lp.display_name));
        rows.push(("Token 0", lp.token0));
        rows.push(("Token 1", lp.token1));
    }
    Ok(rows)
}

fn print_type(config: &FarmConfig, type_string: &str) -> Result<()> {
    let mut table = Table::new();
    for (label, value) in type_rows(config, type_string)? {
        table.add_row(row![label, value]);
    }
    table.printstd();
    Ok(())
}

/// Builds the valuation used for APR from command line values.
fn stake_valuation(
    pools: &[FarmPool],
    reward_per_second: &str,
    reward_decimals: u8,
    reward_price: Decimal,
    entries: &[String],
) -> Result<StakeValuation> {
    let reward_per_second = U256::from_dec_str(reward_per_second.trim())
        .map_err(|_| anyhow::anyhow!("`{}` is not a raw integer amount", reward_per_second))?;

    let mut staked_values = HashMap::new();
    for entry in entries {
        let (key, value) = entry
            .split_once('=')
            .with_context(|| format!("`{}` is not POOL=VALUE", entry))?;
        let value = Decimal::from_str(value.trim())
            .with_context(|| format!("`{}` is not a decimal value", value))?;
        let key = key.trim();
        let pool = pools
            .iter()
            .find(|p| p.display_name == key || p.type_string == key)
            .with_context(|| format!("unknown pool `{}`", key))?;
        staked_values.insert(pool.type_string.clone(), value);
    }

    Ok(StakeValuation {
        reward_per_second,
        reward_decimals,
        reward_price,
        staked_values,
    })
}

struct PoolsArgs<'a> {
    all: bool,
    reward_per_second: Option<&'a str>,
    reward_decimals: u8,
    reward_price: Option<Decimal>,
    staked_values: &'a [String],
}

async fn print_pools(config: &FarmConfig, args: PoolsArgs<'_>) -> Result<()> {
    let catalog = PoolCatalog::new(connect(config)?, config)?;
    let mut pools = catalog.load().await?;

    if let Some(reward_per_second) = args.reward_per_second {
        let price = args
            .reward_price
            .context("--reward-price is required with --reward-per-second")?;
        let valuation = stake_valuation(
            &pools,
            reward_per_second,
            args.reward_decimals,
            price,
            args.staked_values,
        )?;
        annotate_apr(&mut pools, &valuation);
    }

    let mut table = Table::new();
    table.set_titles(row!["Pool", "Kind", "Alloc", "Deposit fee", "Withdraw fee", "APR", "Active"]);
    for pool in pools.iter().filter(|p| args.all || p.active) {
        table.add_row(row![
            pool.display_name,
            pool.kind(),
            r->pool.allocation_points,
            r->pool.deposit_fee(),
            r->pool.withdrawal_fee(),
            r->pool.apr.as_ref().map(|a| a.to_string()).unwrap_or_else(|| "-".to_string()),
            pool.active
        ]);
    }
    table.printstd();
    println!("{} pools", pools.len());
    Ok(())
}

async fn print_tokens(config: &FarmConfig, owner: &str, refresh: bool) -> Result<()> {
    let service = TokenService::new(connect(config)?, config);
    if refresh {
        service.invalidate().await?;
    }
    let tokens = service.wallet_tokens(owner).await?;

    let mut table = Table::new();
    table.set_titles(row!["Symbol", "Name", "Balance", "Coin type"]);
    for token in &tokens {
        let balance = format_balance(&token.balance.to_string(), token.decimals)
            .unwrap_or_else(|_| token.balance.to_string());
        table.add_row(row![token.symbol, token.name, r->balance, token.coin_type]);
    }
    table.printstd();
    Ok(())
}

/// Renders a raw amount with the coin's decimals, or raw when unknown.
fn display_amount(raw: U256, decimals: Option<u8>) -> String {
    match decimals {
        Some(decimals) => format_amount(raw, decimals, Some(4)).unwrap_or_else(|_| raw.to_string()),
        None => raw.to_string(),
    }
}

/// Decimals per coin type; coins whose metadata cannot be resolved are left out.
async fn coin_decimals<'a>(
    tokens: &TokenService,
    coin_types: impl IntoIterator<Item = &'a str>,
) -> HashMap<String, u8> {
    let mut decimals = HashMap::new();
    let unique: HashSet<&str> = coin_types.into_iter().collect();
    for coin_type in unique {
        match tokens.token_info(coin_type).await {
            Ok(info) => {
                decimals.insert(coin_type.to_string(), info.decimals);
            }
            Err(e) => warn!(coin_type = coin_type, error = %e, "No metadata, showing raw amounts"),
        }
    }
    decimals
}

async fn print_positions(config: &FarmConfig, owner: &str) -> Result<()> {
    let client = connect(config)?;
    let service = PositionService::new(client.clone(), config)?;
    let tokens = TokenService::new(client, config);
    let (stakes, locks) = tokio::try_join!(
        service.staking_positions(owner),
        service.lock_positions(owner)
    )?;

    let decimals = coin_decimals(
        &tokens,
        stakes
            .iter()
            .map(|s| s.pool_type.as_str())
            .chain(locks.iter().map(|l| l.coin_type.as_str())),
    )
    .await;

    let mut table = Table::new();
    table.set_titles(row!["Stake", "Pool", "Amount", "Pending", "Since"]);
    for stake in &stakes {
        let coin_decimals = decimals.get(&stake.pool_type).copied();
        table.add_row(row![
            shorten_address(&stake.id, 4),
            coin_symbol(&stake.pool_type),
            r->display_amount(stake.amount, coin_decimals),
            r->display_amount(stake.pending_rewards, coin_decimals),
            timestamp(stake.staked_at_ms)
        ]);
    }
    table.printstd();

    let now_ms = SystemClock.now_ms();
    let mut table = Table::new();
    table.set_titles(row!["Lock", "Coin", "Amount", "Period", "Unlocks", "Status"]);
    for lock in &locks {
        table.add_row(row![
            shorten_address(&lock.id, 4),
            coin_symbol(&lock.coin_type),
            r->display_amount(lock.amount, decimals.get(&lock.coin_type).copied()),
            lock.lock_period.label(),
            timestamp(lock.unlock_at_ms),
            if lock.is_unlocked(now_ms) {
                "unlocked".to_string()
            } else {
                format!("{}h left", lock.remaining_ms(now_ms) / 3_600_000)
            }
        ]);
    }
    table.printstd();
    Ok(())
}

fn timestamp(ms: u64) -> String {
    chrono::DateTime::from_timestamp_millis(ms as i64)
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| ms.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Decode { json } => print_decoded(json)?,
        Commands::ParseType { type_string } => print_type(&load_config(&cli)?, type_string)?,
        Commands::Format {
            amount,
            decimals,
            places,
        } => {
            let value = U256::from_dec_str(amount.trim())
                .map_err(|_| anyhow::anyhow!("`{}` is not a raw integer amount", amount))?;
            println!("{}", format_amount(value, *decimals, *places)?);
        }
        Commands::Pools {
            all,
            reward_per_second,
            reward_decimals,
            reward_price,
            staked_values,
        } => {
            let args = PoolsArgs {
                all: *all,
                reward_per_second: reward_per_second.as_deref(),
                reward_decimals: *reward_decimals,
                reward_price: *reward_price,
                staked_values,
            };
            print_pools(&load_config(&cli)?, args).await?
        }
        Commands::Tokens { owner, refresh } => {
            print_tokens(&load_config(&cli)?, owner, *refresh).await?
        }
        Commands::Positions { owner } => print_positions(&load_config(&cli)?, owner).await?,
    }

    Ok(())
}
