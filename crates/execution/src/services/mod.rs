//! View model assembly.
//!
//! Services fetch through an injected [`ChainClient`] and [`RetryPolicy`]
//! and turn chain payloads into domain entities. Payloads that fail to
//! parse are logged and skipped so one bad object never empties a list.
//!
//! [`ChainClient`]: suitrump_protocols::rpc::ChainClient
//! [`RetryPolicy`]: crate::retry::RetryPolicy

mod pools;
mod positions;
mod tokens;
mod wallet;

pub use pools::{PoolCatalog, StakeValuation, annotate_apr};
pub use positions::PositionService;
pub use tokens::TokenService;
pub use wallet::WalletView;

/// Upper bound on pages fetched for one query.
pub(crate) const MAX_PAGES: usize = 100;

#[cfg(test)]
pub(crate) mod mock;
