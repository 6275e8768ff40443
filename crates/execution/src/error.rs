use suitrump_data::StoreError;
use suitrump_protocols::error::{DecodeError, RpcError};
use thiserror::Error;

/// Errors surfaced by the services.
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// Chain call failed after retries.
    #[error(transparent)]
    Rpc(#[from] RpcError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Store(#[from] StoreError),
    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    Config(String),
    /// The request was replaced or cancelled before it finished.
    #[error("request cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, ExecutionError>;
