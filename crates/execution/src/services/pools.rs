use super::MAX_PAGES;
use crate::config::FarmConfig;
use crate::error::Result;
use crate::retry::RetryPolicy;
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use suitrump_domain::entities::FarmPool;
use suitrump_domain::farm::{EmissionInputs, estimate_apr};
use suitrump_domain::type_tag::{LpPattern, coin_symbol, pair_key, parse_lp_type};
use suitrump_protocols::error::RpcError;
use suitrump_protocols::events::{PoolCreatedEvent, PoolUpdatedEvent};
use suitrump_protocols::rpc::{ChainClient, SuiEvent};
use tracing::{debug, info, warn};

/// Event emitted when a pool is added.
pub const POOL_CREATED_EVENT: &str = "PoolCreated";
/// Event emitted when a pool's settings change.
pub const POOL_UPDATED_EVENT: &str = "PoolConfigUpdated";

/// Builds the farm's pool list from its events.
pub struct PoolCatalog {
    client: Arc<dyn ChainClient>,
    retry: RetryPolicy,
    created_event: String,
    updated_event: String,
    lp_pattern: LpPattern,
    page_size: usize,
}

impl PoolCatalog {
    /// Creates a catalog for the configured package.
    ///
    /// # Errors
    /// Returns an error if no farm package is configured.
    pub fn new(client: Arc<dyn ChainClient>, config: &FarmConfig) -> Result<Self> {
        config.require_package()?;
        Ok(Self {
            client,
            retry: config.retry.clone(),
            created_event: config.farm_type(POOL_CREATED_EVENT),
            updated_event: config.farm_type(POOL_UPDATED_EVENT),
            lp_pattern: config.lp_pattern(),
            page_size: config.page_size.max(1),
        })
    }

    async fn fetch_events(&self, event_type: &str) -> Result<Vec<SuiEvent>> {
        let mut events = Vec::new();
        let mut cursor = None;
        for _ in 0..MAX_PAGES {
            let page = self
                .retry
                .run_if(
                    || self.client.query_events(event_type, cursor.clone(), self.page_size),
                    RpcError::is_transient,
                )
                .await?;
            events.extend(page.data);
            match page.next_cursor {
                Some(next) if page.has_next_page => cursor = Some(next),
                _ => return Ok(events),
            }
        }
        warn!(event_type = event_type, pages = MAX_PAGES, "Event pagination limit reached");
        Ok(events)
    }

    /// Turns one pool-created event into a display record.
    pub fn pool_from_event(&self, event: &PoolCreatedEvent) -> FarmPool {
        let (display_name, is_lp, tokens) = match parse_lp_type(&event.pool_type, &self.lp_pattern) {
            Some(lp) => (lp.display_name, true, vec![lp.symbol0, lp.symbol1]),
            None => {
                let symbol = coin_symbol(&event.pool_type);
                (symbol.clone(), event.is_lp_token, vec![symbol])
            }
        };
        FarmPool {
            display_name,
            is_lp,
            type_string: event.pool_type.clone(),
            tokens,
            allocation_points: event.allocation_points,
            deposit_fee_bps: event.deposit_fee_bps,
            withdrawal_fee_bps: event.withdrawal_fee_bps,
            apr: None,
            active: event.active,
        }
    }

    /// Folds created and updated events into the pool list.
    ///
    /// Pools are unique by their sorted token symbols; the first creation
    /// wins. Updates apply in event order. Active pools sort first.
    pub fn build(&self, created: &[SuiEvent], updated: &[SuiEvent]) -> Vec<FarmPool> {
        let mut seen = HashSet::new();
        let mut pools: Vec<FarmPool> = Vec::new();

        for event in created {
            let parsed = match PoolCreatedEvent::from_json(&event.parsed_json) {
                Ok(parsed) => parsed,
                Err(e) => {
                    warn!(tx = %event.id.tx_digest, error = %e, "Skipping malformed pool event");
                    continue;
                }
            };
            let pool = self.pool_from_event(&parsed);
            if !seen.insert(pair_key(&pool.tokens)) {
                debug!(pool = %pool.display_name, "Skipping duplicate pool");
                continue;
            }
            pools.push(pool);
        }

        let index: HashMap<String, usize> = pools
            .iter()
            .enumerate()
            .map(|(i, p)| (p.type_string.clone(), i))
            .collect();
        for event in updated {
            let update = match PoolUpdatedEvent::from_json(&event.parsed_json) {
                Ok(update) => update,
                Err(e) => {
                    warn!(tx = %event.id.tx_digest, error = %e, "Skipping malformed pool update");
                    continue;
                }
            };
            if let Some(pool) = index.get(&update.pool_type).map(|i| &mut pools[*i]) {
                pool.allocation_points = update.allocation_points;
                pool.deposit_fee_bps = update.deposit_fee_bps;
                pool.withdrawal_fee_bps = update.withdrawal_fee_bps;
                pool.active = update.active;
            }
        }

        pools.sort_by(|a, b| {
            b.active
                .cmp(&a.active)
                .then_with(|| a.display_name.cmp(&b.display_name))
        });
        pools
    }

    /// Fetches every pool of the farm.
    ///
    /// # Errors
    /// Returns an error if the events cannot be fetched after retries.
    pub async fn load(&self) -> Result<Vec<FarmPool>> {
        let created = self.fetch_events(&self.created_event).await?;
        let updated = self.fetch_events(&self.updated_event).await?;
        let pools = self.build(&created, &updated);
        info!(pools = pools.len(), events = created.len(), "Loaded farm pools");
        Ok(pools)
    }
}

/// Market inputs needed to price a pool's emissions.
#[derive(Debug, Clone)]
pub struct StakeValuation {
    /// Farm-wide reward emission, raw units per second.
    pub reward_per_second: primitive_types::U256,
    pub reward_decimals: u8,
    pub reward_price: Decimal,
    /// Staked value per pool type string.
    pub staked_values: HashMap<String, Decimal>,
}

/// Fills in `apr` for every active pool with a known staked value.
pub fn annotate_apr(pools: &mut [FarmPool], valuation: &StakeValuation) {
    let total_allocation: u64 = pools
        .iter()
        .filter(|p| p.active)
        .map(|p| p.allocation_points)
        .sum();
    for pool in pools.iter_mut() {
        pool.apr = match valuation.staked_values.get(&pool.type_string) {
            Some(staked) if pool.active => estimate_apr(&EmissionInputs {
                reward_per_second: valuation.reward_per_second,
                reward_decimals: valuation.reward_decimals,
                reward_price: valuation.reward_price,
                allocation_points: pool.allocation_points,
                total_allocation_points: total_allocation,
                staked_value: *staked,
            }),
            _ => None,
        };
    }
}
