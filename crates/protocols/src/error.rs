use suitrump_domain::DomainError;
use thiserror::Error;

/// Failure to turn a chain value into a typed value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Type tag the decoder has no rule for.
    #[error("unsupported type tag: {0}")]
    UnsupportedType(String),
    /// Bytes do not match the declared type.
    #[error("malformed {type_tag} value: {reason}")]
    Malformed { type_tag: String, reason: String },
    /// JSON shape the decoder does not recognise.
    #[error("unexpected value shape: {0}")]
    UnexpectedShape(String),
    /// Field missing from an event or object payload.
    #[error("missing field `{0}`")]
    MissingField(String),
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Failure talking to the fullnode.
#[derive(Debug, Error)]
pub enum RpcError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("http status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl RpcError {
    /// Whether retrying the same request may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Status { status, .. } => matches!(status, 408 | 429 | 500..=599),
            // -32603: internal error, usually an overloaded node
            Self::Rpc { code, .. } => *code == -32603,
            Self::InvalidResponse(_) | Self::Decode(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        let busy = RpcError::Status {
            status: 503,
            body: String::new(),
        };
        assert!(busy.is_transient());

        let limited = RpcError::Status {
            status: 429,
            body: String::new(),
        };
        assert!(limited.is_transient());

        let bad_request = RpcError::Status {
            status: 400,
            body: String::new(),
        };
        assert!(!bad_request.is_transient());

        let invalid_params = RpcError::Rpc {
            code: -32602,
            message: "invalid params".to_string(),
        };
        assert!(!invalid_params.is_transient());
        assert!(!RpcError::InvalidResponse("x".to_string()).is_transient());
    }
}
