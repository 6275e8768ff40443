//! Chain access and value decoding for the SuiTrump farm.
//!
//! - Decoding of `devInspect` return values and JSON scalars
//! - BCS readers for strings, addresses and type names
//! - Fullnode JSON-RPC client behind the [`rpc::ChainClient`] trait
//! - Parsers for farm events and position objects

/// Prelude module for convenient imports.
pub mod prelude;

/// Return value decoder.
pub mod decoder;
/// Error types.
pub mod error;
/// Farm event and object parsers.
pub mod events;
/// Fullnode client.
pub mod rpc;
/// BCS readers.
pub mod wire;
