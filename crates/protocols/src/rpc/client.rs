//! JSON-RPC 2.0 client for a Sui fullnode.

use super::{ChainClient, CoinBalance, CoinMetadata, EventId, EventPage, ObjectPage};
use crate::error::RpcError;
use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::debug;

/// Configuration for the RPC client.
#[derive(Debug, Clone)]
pub struct RpcConfig {
    /// Fullnode endpoint.
    pub url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            url: "https://fullnode.mainnet.sui.io:443".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    result: Value,
    #[serde(default)]
    error: Option<ErrorBody>,
}

/// Fullnode client over HTTP.
pub struct SuiRpcClient {
    http: reqwest::Client,
    config: RpcConfig,
    next_id: AtomicU64,
}

impl SuiRpcClient {
    /// Creates a new client.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: RpcConfig) -> Result<Self, RpcError> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            config,
            next_id: AtomicU64::new(1),
        })
    }

    /// Endpoint this client talks to.
    pub fn url(&self) -> &str {
        &self.config.url
    }

    fn request_body(&self, method: &str, params: Value) -> Value {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        })
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T, RpcError> {
        let body = self.request_body(method, params);
        debug!(method = method, "Sending RPC request");

        let response = self.http.post(&self.config.url).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RpcError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: Envelope = response.json().await?;
        parse_envelope(envelope)
    }
}

fn parse_envelope<T: DeserializeOwned>(envelope: Envelope) -> Result<T, RpcError> {
    if let Some(err) = envelope.error {
        return Err(RpcError::Rpc {
            code: err.code,
            message: err.message,
        });
    }
    serde_json::from_value(envelope.result).map_err(|e| RpcError::InvalidResponse(e.to_string()))
}

#[async_trait]
impl ChainClient for SuiRpcClient {
    async fn get_all_balances(&self, owner: &str) -> Result<Vec<CoinBalance>, RpcError> {
        self.call("suix_getAllBalances", json!([owner])).await
    }

    async fn get_coin_metadata(&self, coin_type: &str) -> Result<Option<CoinMetadata>, RpcError> {
        self.call("suix_getCoinMetadata", json!([coin_type])).await
    }

    async fn query_events(
        &self,
        event_type: &str,
        cursor: Option<EventId>,
        limit: usize,
    ) -> Result<EventPage, RpcError> {
        self.call(
            "suix_queryEvents",
            json!([{ "MoveEventType": event_type }, cursor, limit, false]),
        )
        .await
    }

    async fn get_owned_objects(
        &self,
        owner: &str,
        struct_type: &str,
        cursor: Option<String>,
        limit: usize,
    ) -> Result<ObjectPage, RpcError> {
        let query = json!({
            "filter": { "StructType": struct_type },
            "options": { "showType": true, "showContent": true },
        });
        self.call("suix_getOwnedObjects", json!([owner, query, cursor, limit]))
            .await
    }
}
