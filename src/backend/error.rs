//! Backend RPC error types

use super::Operation;
use thiserror::Error;

/// RPC error with classification.
///
/// The kind only feeds logging; callers treat every kind the same way.
#[derive(Debug, Error)]
#[error("{}: {}", .operation.name(), .message)]
pub struct RpcError {
    pub kind: RpcErrorKind,
    pub operation: Operation,
    pub message: String,
}

impl RpcError {
    pub fn new(kind: RpcErrorKind, operation: Operation, message: impl Into<String>) -> Self {
        Self {
            kind,
            operation,
            message: message.into(),
        }
    }

    pub fn network(operation: Operation, message: impl Into<String>) -> Self {
        Self::new(RpcErrorKind::Network, operation, message)
    }

    pub fn backend(operation: Operation, message: impl Into<String>) -> Self {
        Self::new(RpcErrorKind::Backend, operation, message)
    }

    pub fn decode(operation: Operation, message: impl Into<String>) -> Self {
        Self::new(RpcErrorKind::Decode, operation, message)
    }
}

/// Where a call failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpcErrorKind {
    /// Connection refused, reset, timed out
    Network,
    /// Backend answered with a fault status
    Backend,
    /// Response body did not match the expected shape
    Decode,
}

impl RpcErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Backend => "backend",
            Self::Decode => "decode",
        }
    }
}
