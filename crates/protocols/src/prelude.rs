//! Prelude module for convenient imports.
//!
//! # Example
//!
//! ```rust
//! use suitrump_protocols::prelude::*;
//! ```

pub use crate::decoder::{
    DecodedValue, RawReturnValue, WireType, decode, decode_or_default, decode_string, decode_u256,
};
pub use crate::error::{DecodeError, RpcError};
pub use crate::events::{
    PoolCreatedEvent, PoolUpdatedEvent, parse_lock_position, parse_staking_position,
};
pub use crate::rpc::{
    ChainClient, CoinBalance, CoinMetadata, EventId, EventPage, MoveContent, ObjectData,
    ObjectPage, ObjectResponse, RpcConfig, SuiEvent, SuiRpcClient,
};
