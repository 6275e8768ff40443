use thiserror::Error;

/// Errors raised by the domain helpers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Value does not fit in the requested integer width.
    #[error("value overflows {0} bytes")]
    Overflow(usize),
    /// Amount string is not a non-negative decimal integer.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    /// More fractional digits than the token supports.
    #[error("too many decimal places: {got} > {max}")]
    TooManyDecimals { got: usize, max: u8 },
    /// Type string could not be parsed.
    #[error("invalid type string `{input}`: {reason}")]
    InvalidTypeTag { input: String, reason: String },
    /// Unknown integer width tag.
    #[error("unknown integer tag: {0}")]
    UnknownIntegerTag(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
