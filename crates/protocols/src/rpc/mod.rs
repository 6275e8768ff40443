//! Fullnode access.
//!
//! [`ChainClient`] is the seam between the services and the node; the
//! services only ever see this trait, so tests swap in an in-memory double.

mod client;
mod types;

pub use client::{RpcConfig, SuiRpcClient};
pub use types::*;

use crate::error::RpcError;
use async_trait::async_trait;

/// Read access to chain state.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// All coin balances of `owner`, one entry per coin type.
    async fn get_all_balances(&self, owner: &str) -> Result<Vec<CoinBalance>, RpcError>;

    /// Metadata of a coin type; `None` when the coin publishes none.
    async fn get_coin_metadata(&self, coin_type: &str) -> Result<Option<CoinMetadata>, RpcError>;

    /// One page of events of a Move event type, oldest first.
    async fn query_events(
        &self,
        event_type: &str,
        cursor: Option<EventId>,
        limit: usize,
    ) -> Result<EventPage, RpcError>;

    /// One page of objects of `struct_type` owned by `owner`, with content.
    async fn get_owned_objects(
        &self,
        owner: &str,
        struct_type: &str,
        cursor: Option<String>,
        limit: usize,
    ) -> Result<ObjectPage, RpcError>;
}
