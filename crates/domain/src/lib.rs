//! Domain model for the SuiTrump farm.
//!
//! View models for pools, tokens and positions, plus the pure helpers that
//! turn raw chain data into them:
//! - little-endian big-integer reconstruction
//! - Move type-string parsing (coin symbols, LP pairs)
//! - exact balance and percentage formatting
//! - farm emission math

/// Entities derived from chain state.
pub mod entities;
/// Enumerations shared across crates.
pub mod enums;
/// Domain error type.
pub mod error;
/// Farm emission and fee math.
pub mod farm;
/// Display formatting for amounts and percentages.
pub mod format;
/// Integer and byte math.
pub mod math;
/// Move type-string parsing.
pub mod type_tag;
/// Value objects.
pub mod value_objects;

pub use error::{DomainError, Result};
