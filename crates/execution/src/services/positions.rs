use super::MAX_PAGES;
use crate::config::FarmConfig;
use crate::error::Result;
use crate::retry::RetryPolicy;
use std::sync::Arc;
use suitrump_domain::entities::{LockPosition, StakingPosition};
use suitrump_protocols::error::{DecodeError, RpcError};
use suitrump_protocols::events::{parse_lock_position, parse_staking_position};
use suitrump_protocols::rpc::{ChainClient, ObjectData};
use tracing::{debug, warn};

/// Struct name of farm stake objects.
pub const STAKED_POSITION_STRUCT: &str = "StakedPosition";
/// Struct name of token-locker lock objects.
pub const LOCK_STRUCT: &str = "Lock";

/// Reads the farm and locker objects owned by a wallet.
pub struct PositionService {
    client: Arc<dyn ChainClient>,
    retry: RetryPolicy,
    staking_type: String,
    lock_type: String,
    page_size: usize,
}

impl PositionService {
    /// # Errors
    /// Returns an error if no farm package is configured.
    pub fn new(client: Arc<dyn ChainClient>, config: &FarmConfig) -> Result<Self> {
        config.require_package()?;
        Ok(Self {
            client,
            retry: config.retry.clone(),
            staking_type: config.farm_type(STAKED_POSITION_STRUCT),
            lock_type: config.locker_type(LOCK_STRUCT),
            page_size: config.page_size.max(1),
        })
    }

    async fn owned_objects(&self, owner: &str, struct_type: &str) -> Result<Vec<ObjectData>> {
        let mut objects = Vec::new();
        let mut cursor: Option<String> = None;
        for _ in 0..MAX_PAGES {
            let page = self
                .retry
                .run_if(
                    || {
                        self.client
                            .get_owned_objects(owner, struct_type, cursor.clone(), self.page_size)
                    },
                    RpcError::is_transient,
                )
                .await?;
            for response in page.data {
                match (response.data, response.error) {
                    (Some(data), _) => objects.push(data),
                    (None, Some(error)) => warn!(owner = owner, error = %error, "Object read failed"),
                    (None, None) => {}
                }
            }
            match page.next_cursor {
                Some(next) if page.has_next_page => cursor = Some(next),
                _ => break,
            }
        }
        debug!(owner = owner, struct_type = struct_type, count = objects.len(), "Fetched owned objects");
        Ok(objects)
    }

    fn parse_all<T>(
        objects: &[ObjectData],
        kind: &str,
        parse: impl Fn(&ObjectData) -> std::result::Result<T, DecodeError>,
    ) -> Vec<T> {
        objects
            .iter()
            .filter_map(|object| match parse(object) {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!(object_id = %object.object_id, kind = kind, error = %e, "Skipping malformed object");
                    None
                }
            })
            .collect()
    }

    /// Farm stakes held by `owner`.
    ///
    /// # Errors
    /// Returns an error if the objects cannot be fetched after retries.
    pub async fn staking_positions(&self, owner: &str) -> Result<Vec<StakingPosition>> {
        let objects = self.owned_objects(owner, &self.staking_type).await?;
        Ok(Self::parse_all(&objects, "stake", parse_staking_position))
    }

    /// Token locks held by `owner`, soonest unlock first.
    ///
    /// # Errors
    /// Returns an error if the objects cannot be fetched after retries.
    pub async fn lock_positions(&self, owner: &str) -> Result<Vec<LockPosition>> {
        let objects = self.owned_objects(owner, &self.lock_type).await?;
        let mut locks = Self::parse_all(&objects, "lock", parse_lock_position);
        locks.sort_by_key(|lock| lock.unlock_at_ms);
        Ok(locks)
    }
}
