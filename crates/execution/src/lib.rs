//! Fetching and assembly layer of the farm client.
//!
//! This crate provides:
//! - Retry with exponential backoff and jitter for remote calls
//! - One-outstanding-request slots that drop stale responses
//! - Environment-driven configuration
//! - Pool, token, position and wallet services built on a chain client

/// Prelude module for convenient imports.
pub mod prelude;

/// Environment-driven configuration.
pub mod config;
/// Error types.
pub mod error;
/// Cancel/replace request slots.
pub mod request;
/// Retry policy.
pub mod retry;
/// View model services.
pub mod services;

pub use error::{ExecutionError, Result};
