/// Little-endian byte <-> U256 conversions.
pub mod bytes;

pub use bytes::{IntegerWidth, u256_from_le_bytes, u256_to_le_bytes};
