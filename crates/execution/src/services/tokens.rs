use crate::config::FarmConfig;
use crate::error::Result;
use crate::retry::RetryPolicy;
use primitive_types::U256;
use std::collections::HashMap;
use std::sync::Arc;
use suitrump_data::{TOKEN_CACHE_TTL, TokenMetadataStore, TtlCache};
use suitrump_domain::entities::TokenInfo;
use suitrump_domain::type_tag::{coin_symbol, is_native_coin};
use suitrump_protocols::error::RpcError;
use suitrump_protocols::rpc::{ChainClient, CoinBalance};
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Decimals assumed for coins that publish no metadata.
const DEFAULT_DECIMALS: u8 = 9;

/// Resolves the coins held by a wallet.
///
/// Metadata is looked up in memory, then in the persisted store, then on
/// chain; balances are always fetched fresh.
pub struct TokenService {
    client: Arc<dyn ChainClient>,
    retry: RetryPolicy,
    store: Option<TokenMetadataStore>,
    memory: RwLock<TtlCache<String, TokenInfo>>,
}

impl TokenService {
    pub fn new(client: Arc<dyn ChainClient>, config: &FarmConfig) -> Self {
        Self {
            client,
            retry: config.retry.clone(),
            store: Some(TokenMetadataStore::new(&config.cache_dir)),
            memory: RwLock::new(TtlCache::new(TOKEN_CACHE_TTL)),
        }
    }

    /// Replaces the persisted store.
    #[must_use]
    pub fn with_store(mut self, store: Option<TokenMetadataStore>) -> Self {
        self.store = store;
        self
    }

    async fn load_persisted(&self) -> HashMap<String, TokenInfo> {
        let Some(store) = &self.store else {
            return HashMap::new();
        };
        match store.load().await {
            Ok(tokens) => tokens.unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "Token cache unavailable");
                HashMap::new()
            }
        }
    }

    async fn fetch_metadata(&self, coin_type: &str) -> Result<TokenInfo> {
        let metadata = self
            .retry
            .run_if(
                || self.client.get_coin_metadata(coin_type),
                RpcError::is_transient,
            )
            .await?;
        Ok(match metadata {
            Some(meta) => TokenInfo {
                id: meta.id,
                symbol: meta.symbol,
                name: meta.name,
                coin_type: coin_type.to_string(),
                decimals: meta.decimals,
                balance: U256::zero(),
            },
            None => {
                warn!(coin_type = coin_type, "Coin has no metadata, assuming defaults");
                let symbol = coin_symbol(coin_type);
                TokenInfo::new(coin_type, symbol.clone(), symbol, DEFAULT_DECIMALS)
            }
        })
    }

    fn parse_balance(balance: &CoinBalance) -> U256 {
        U256::from_dec_str(&balance.total_balance).unwrap_or_else(|e| {
            warn!(
                coin_type = %balance.coin_type,
                value = %balance.total_balance,
                error = ?e,
                "Unparseable balance, showing zero"
            );
            U256::zero()
        })
    }

    /// Coins held by `owner` with metadata and balances, native coin first.
    ///
    /// # Errors
    /// Returns an error if balances or missing metadata cannot be fetched
    /// after retries.
    pub async fn wallet_tokens(&self, owner: &str) -> Result<Vec<TokenInfo>> {
        let balances = self
            .retry
            .run_if(|| self.client.get_all_balances(owner), RpcError::is_transient)
            .await?;

        let mut persisted = self.load_persisted().await;
        let mut fetched_any = false;
        let mut tokens = Vec::with_capacity(balances.len());

        for balance in &balances {
            let cached = self.memory.read().await.get(&balance.coin_type).cloned();
            let info = match cached.or_else(|| persisted.get(&balance.coin_type).cloned()) {
                Some(info) => {
                    debug!(coin_type = %balance.coin_type, "Token metadata cache hit");
                    info
                }
                None => {
                    fetched_any = true;
                    self.fetch_metadata(&balance.coin_type).await?
                }
            };
            let info = info.with_balance(Self::parse_balance(balance));
            self.memory
                .write()
                .await
                .set(balance.coin_type.clone(), info.clone());
            persisted.insert(balance.coin_type.clone(), info.clone());
            tokens.push(info);
        }

        if fetched_any {
            if let Some(store) = &self.store {
                if let Err(e) = store.save(&persisted).await {
                    warn!(error = %e, "Failed to persist token cache");
                }
            }
        }

        tokens.sort_by(|a, b| {
            is_native_coin(&b.coin_type)
                .cmp(&is_native_coin(&a.coin_type))
                .then_with(|| a.symbol.cmp(&b.symbol))
        });
        Ok(tokens)
    }

    /// Metadata of one coin type, balance zero.
    ///
    /// # Errors
    /// Returns an error if the metadata is not cached and cannot be fetched
    /// after retries.
    pub async fn token_info(&self, coin_type: &str) -> Result<TokenInfo> {
        if let Some(info) = self.memory.read().await.get(&coin_type.to_string()) {
            return Ok(info.clone().with_balance(U256::zero()));
        }
        let info = match self.load_persisted().await.remove(coin_type) {
            Some(info) => info,
            None => self.fetch_metadata(coin_type).await?,
        }
        .with_balance(U256::zero());
        self.memory
            .write()
            .await
            .set(coin_type.to_string(), info.clone());
        Ok(info)
    }

    /// Drops every cached entry, in memory and on disk.
    ///
    /// # Errors
    /// Returns an error if the persisted document cannot be removed.
    pub async fn invalidate(&self) -> Result<()> {
        self.memory.write().await.clear();
        if let Some(store) = &self.store {
            store.clear().await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retry::Jitter;
    use crate::services::mock::{MockChain, balance, metadata};
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    const OWNER: &str = "0xowner";
    const TRUMP: &str = "0xabc::trump::TRUMP";

    fn config(dir: &std::path::Path) -> FarmConfig {
        FarmConfig {
            cache_dir: dir.to_path_buf(),
            retry: RetryPolicy {
                max_attempts: 3,
                base_delay: Duration::from_millis(1),
                max_delay: Duration::from_millis(2),
                jitter: Jitter::None,
            },
            ..FarmConfig::default()
        }
    }

    fn chain() -> MockChain {
        let mut chain = MockChain::default();
        chain.balances.insert(
            OWNER.to_string(),
            vec![
                balance(TRUMP, "2500000"),
                balance("0x2::sui::SUI", "1500000000"),
                balance("0xdead::mystery::MYST", "not-a-number"),
            ],
        );
        chain.metadata.insert(TRUMP.to_string(), metadata("TRUMP", 6));
        chain
            .metadata
            .insert("0x2::sui::SUI".to_string(), metadata("SUI", 9));
        chain
    }

    #[tokio::test]
    async fn test_wallet_tokens() {
        let dir = tempfile::tempdir().unwrap();
        let service = TokenService::new(Arc::new(chain()), &config(dir.path()));
        let tokens = service.wallet_tokens(OWNER).await.unwrap();

        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].symbol, "SUI");
        assert_eq!(tokens[0].amount().to_string(), "1.5");

        let trump = tokens.iter().find(|t| t.symbol == "TRUMP").unwrap();
        assert_eq!(trump.decimals, 6);
        assert_eq!(trump.amount().to_string(), "2.5");

        let mystery = tokens.iter().find(|t| t.symbol == "MYST").unwrap();
        assert_eq!(mystery.decimals, DEFAULT_DECIMALS);
        assert!(mystery.balance.is_zero());
    }

    #[tokio::test]
    async fn test_metadata_served_from_cache() {
        let dir = tempfile::tempdir().unwrap();
        let chain = Arc::new(chain());
        let service = TokenService::new(chain.clone(), &config(dir.path()));
        service.wallet_tokens(OWNER).await.unwrap();
        assert_eq!(chain.metadata_calls.load(Ordering::SeqCst), 3);

        service.wallet_tokens(OWNER).await.unwrap();
        assert_eq!(chain.metadata_calls.load(Ordering::SeqCst), 3);
        assert_eq!(chain.balance_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_persisted_cache_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let chain = Arc::new(chain());
        TokenService::new(chain.clone(), &config(dir.path()))
            .wallet_tokens(OWNER)
            .await
            .unwrap();

        let fresh = TokenService::new(chain.clone(), &config(dir.path()));
        fresh.wallet_tokens(OWNER).await.unwrap();
        assert_eq!(chain.metadata_calls.load(Ordering::SeqCst), 3);

        fresh.invalidate().await.unwrap();
        fresh.wallet_tokens(OWNER).await.unwrap();
        assert_eq!(chain.metadata_calls.load(Ordering::SeqCst), 6);
    }

    #[tokio::test]
    async fn test_token_info_uses_coin_decimals() {
        let dir = tempfile::tempdir().unwrap();
        let chain = Arc::new(chain());
        let service = TokenService::new(chain.clone(), &config(dir.path())).with_store(None);

        let trump = service.token_info(TRUMP).await.unwrap();
        assert_eq!(trump.decimals, 6);
        assert_eq!(
            trump.with_balance(U256::from(2_500_000u64)).amount().to_string(),
            "2.5"
        );

        service.token_info(TRUMP).await.unwrap();
        assert_eq!(chain.metadata_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_token_info_after_wallet_load() {
        let dir = tempfile::tempdir().unwrap();
        let chain = Arc::new(chain());
        let service = TokenService::new(chain.clone(), &config(dir.path()));
        service.wallet_tokens(OWNER).await.unwrap();

        let sui = service.token_info("0x2::sui::SUI").await.unwrap();
        assert_eq!(sui.decimals, 9);
        assert!(sui.balance.is_zero());
        assert_eq!(chain.metadata_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_balance_failure_surfaces() {
        let dir = tempfile::tempdir().unwrap();
        let chain = chain();
        chain.failures.store(5, Ordering::SeqCst);
        let service = TokenService::new(Arc::new(chain), &config(dir.path())).with_store(None);
        assert!(service.wallet_tokens(OWNER).await.is_err());
    }
}
