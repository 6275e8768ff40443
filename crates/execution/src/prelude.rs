//! Prelude module for convenient imports.
//!
//! ```rust
//! use suitrump_execution::prelude::*;
//! ```

// Config
pub use crate::config::{FARM_MODULE, FarmConfig, LOCKER_MODULE};

// Errors
pub use crate::error::ExecutionError;

// Requests
pub use crate::request::{FetchState, RequestHandle, RequestSlot, Ticket};

// Retry
pub use crate::retry::{Jitter, RetryPolicy};

// Services
pub use crate::services::{
    PoolCatalog, PositionService, StakeValuation, TokenService, WalletView, annotate_apr,
};
