//! Persisted token metadata.
//!
//! A single JSON document named after [`TOKEN_CACHE_KEY`] maps coin types to
//! [`TokenInfo`] together with the time it was written. The document is
//! valid for [`TOKEN_CACHE_TTL`]; there is no schema versioning, an
//! unreadable document is treated like a missing one.

use crate::cache::{Clock, SystemClock};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use suitrump_domain::entities::TokenInfo;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Fixed key the document is stored under.
pub const TOKEN_CACHE_KEY: &str = "tokenCache";

/// Validity window of the stored document.
pub const TOKEN_CACHE_TTL: Duration = Duration::from_secs(30 * 60);

/// Store failures other than a missing or unreadable document.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Serialize, Deserialize)]
struct Document {
    timestamp: u64,
    tokens: HashMap<String, TokenInfo>,
}

/// File-backed token metadata cache.
pub struct TokenMetadataStore {
    path: PathBuf,
    clock: Arc<dyn Clock>,
}

impl TokenMetadataStore {
    /// Creates a store in `dir` on the wall clock.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self::with_clock(dir, Arc::new(SystemClock))
    }

    /// Creates a store in `dir` on the given clock.
    pub fn with_clock(dir: impl AsRef<Path>, clock: Arc<dyn Clock>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{}.json", TOKEN_CACHE_KEY)),
            clock,
        }
    }

    /// Location of the document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    /// Loads the stored tokens if the document exists and is still valid.
    ///
    /// # Errors
    /// Returns an error only if the file exists but cannot be read.
    pub async fn load(&self) -> Result<Option<HashMap<String, TokenInfo>>, StoreError> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Token cache not found");
                return Ok(None);
            }
            Err(e) => return Err(self.io_error(e)),
        };

        let document: Document = match serde_json::from_slice(&raw) {
            Ok(doc) => doc,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Ignoring unreadable token cache");
                return Ok(None);
            }
        };

        let age_ms = self.clock.now_ms().saturating_sub(document.timestamp);
        if u128::from(age_ms) >= TOKEN_CACHE_TTL.as_millis() {
            debug!(age_ms = age_ms, "Token cache expired");
            return Ok(None);
        }

        debug!(tokens = document.tokens.len(), "Token cache hit");
        Ok(Some(document.tokens))
    }

    /// Writes `tokens`, stamping the current time.
    ///
    /// # Errors
    /// Returns an error if the directory or file cannot be written.
    pub async fn save(&self, tokens: &HashMap<String, TokenInfo>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(e))?;
        }
        let document = Document {
            timestamp: self.clock.now_ms(),
            tokens: tokens.clone(),
        };
        let raw = serde_json::to_vec(&document)?;
        tokio::fs::write(&self.path, raw)
            .await
            .map_err(|e| self.io_error(e))?;
        info!(tokens = tokens.len(), path = %self.path.display(), "Token cache saved");
        Ok(())
    }

    /// Removes the stored document.
    ///
    /// # Errors
    /// Returns an error if an existing file cannot be removed.
    pub async fn clear(&self) -> Result<(), StoreError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;
    use primitive_types::U256;

    fn tokens() -> HashMap<String, TokenInfo> {
        let sui = TokenInfo::new("0x2::sui::SUI", "SUI", "Sui", 9)
            .with_balance(U256::from(1_500_000_000u64));
        HashMap::from([(sui.coin_type.clone(), sui)])
    }

    fn store(dir: &Path) -> (Arc<ManualClock>, TokenMetadataStore) {
        let clock = Arc::new(ManualClock::new(1_700_000_000_000));
        let store = TokenMetadataStore::with_clock(dir, clock.clone());
        (clock, store)
    }

    #[tokio::test]
    async fn test_missing_document() {
        let dir = tempfile::tempdir().unwrap();
        let (_clock, store) = store(dir.path());
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_then_load_within_window() {
        let dir = tempfile::tempdir().unwrap();
        let (clock, store) = store(dir.path());
        store.save(&tokens()).await.unwrap();
        assert!(store.path().ends_with("tokenCache.json"));

        clock.advance(Duration::from_secs(29 * 60));
        let loaded = store.load().await.unwrap().unwrap();
        assert_eq!(loaded, tokens());
    }

    #[tokio::test]
    async fn test_expires_after_thirty_minutes() {
        let dir = tempfile::tempdir().unwrap();
        let (clock, store) = store(dir.path());
        store.save(&tokens()).await.unwrap();
        clock.advance(Duration::from_secs(30 * 60));
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_document_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let (_clock, store) = store(dir.path());
        tokio::fs::write(store.path(), b"{not json").await.unwrap();
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clear() {
        let dir = tempfile::tempdir().unwrap();
        let (_clock, store) = store(dir.path());
        store.save(&tokens()).await.unwrap();
        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_none());
        // clearing twice is fine
        store.clear().await.unwrap();
    }
}
