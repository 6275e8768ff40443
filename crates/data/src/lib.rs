//! Client-side caches for chain metadata.
//!
//! This module provides:
//! - an in-memory TTL cache driven by an injectable clock
//! - the persisted token-metadata store with its 30 minute validity window

/// TTL cache and clocks.
pub mod cache;
/// Persisted token metadata.
pub mod token_store;

pub use cache::{Clock, ManualClock, SystemClock, TtlCache};
pub use token_store::{StoreError, TOKEN_CACHE_KEY, TOKEN_CACHE_TTL, TokenMetadataStore};
