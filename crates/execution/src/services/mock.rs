//! In-memory chain client for service tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use suitrump_protocols::error::RpcError;
use suitrump_protocols::rpc::{
    ChainClient, CoinBalance, CoinMetadata, EventId, EventPage, ObjectData, ObjectPage,
    ObjectResponse, SuiEvent,
};

#[derive(Default)]
pub struct MockChain {
    pub balances: HashMap<String, Vec<CoinBalance>>,
    pub metadata: HashMap<String, CoinMetadata>,
    /// Event payloads per event type, split into pages of `page_size`.
    pub events: HashMap<String, Vec<serde_json::Value>>,
    pub objects: HashMap<String, Vec<ObjectData>>,
    /// Delay per owner for balance queries.
    pub delays: HashMap<String, Duration>,
    /// Number of leading calls to fail with a transient error.
    pub failures: AtomicU32,
    pub metadata_calls: AtomicU32,
    pub balance_calls: AtomicU32,
}

impl MockChain {
    fn maybe_fail(&self) -> Result<(), RpcError> {
        let remaining = self.failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures.store(remaining - 1, Ordering::SeqCst);
            return Err(RpcError::Status {
                status: 503,
                body: "busy".to_string(),
            });
        }
        Ok(())
    }
}

pub fn balance(coin_type: &str, total: &str) -> CoinBalance {
    CoinBalance {
        coin_type: coin_type.to_string(),
        coin_object_count: 1,
        total_balance: total.to_string(),
    }
}

pub fn metadata(symbol: &str, decimals: u8) -> CoinMetadata {
    CoinMetadata {
        decimals,
        name: format!("{} Coin", symbol),
        symbol: symbol.to_string(),
        description: String::new(),
        icon_url: None,
        id: Some(format!("0xmeta{}", symbol)),
    }
}

#[async_trait]
impl ChainClient for MockChain {
    async fn get_all_balances(&self, owner: &str) -> Result<Vec<CoinBalance>, RpcError> {
        self.balance_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delays.get(owner) {
            tokio::time::sleep(*delay).await;
        }
        self.maybe_fail()?;
        Ok(self.balances.get(owner).cloned().unwrap_or_default())
    }

    async fn get_coin_metadata(&self, coin_type: &str) -> Result<Option<CoinMetadata>, RpcError> {
        self.metadata_calls.fetch_add(1, Ordering::SeqCst);
        self.maybe_fail()?;
        Ok(self.metadata.get(coin_type).cloned())
    }

    async fn query_events(
        &self,
        event_type: &str,
        cursor: Option<EventId>,
        limit: usize,
    ) -> Result<EventPage, RpcError> {
        self.maybe_fail()?;
        let all = self.events.get(event_type).cloned().unwrap_or_default();
        let start: usize = cursor
            .map(|c| c.event_seq.parse().unwrap_or(0))
            .unwrap_or(0);
        let end = (start + limit).min(all.len());
        let data = all[start.min(end)..end]
            .iter()
            .enumerate()
            .map(|(i, json)| SuiEvent {
                id: EventId {
                    tx_digest: format!("tx{}", start + i),
                    event_seq: (start + i).to_string(),
                },
                package_id: "0xfa".to_string(),
                transaction_module: "farm".to_string(),
                sender: "0x5".to_string(),
                event_type: event_type.to_string(),
                parsed_json: json.clone(),
                timestamp_ms: None,
            })
            .collect();
        let has_next_page = end < all.len();
        Ok(EventPage {
            data,
            next_cursor: has_next_page.then(|| EventId {
                tx_digest: format!("tx{}", end),
                event_seq: end.to_string(),
            }),
            has_next_page,
        })
    }

    async fn get_owned_objects(
        &self,
        owner: &str,
        struct_type: &str,
        cursor: Option<String>,
        limit: usize,
    ) -> Result<ObjectPage, RpcError> {
        self.maybe_fail()?;
        let all: Vec<ObjectData> = self
            .objects
            .get(owner)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter(|o| o.type_string().is_some_and(|t| t.starts_with(struct_type)))
            .collect();
        let start: usize = cursor.map(|c| c.parse().unwrap_or(0)).unwrap_or(0);
        let end = (start + limit).min(all.len());
        let has_next_page = end < all.len();
        Ok(ObjectPage {
            data: all[start.min(end)..end]
                .iter()
                .map(|o| ObjectResponse {
                    data: Some(o.clone()),
                    error: None,
                })
                .collect(),
            next_cursor: has_next_page.then(|| end.to_string()),
            has_next_page,
        })
    }
}
