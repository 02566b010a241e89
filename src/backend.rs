//! Session backend abstraction
//!
//! The backend owns the conversation flow. The gateway reaches it through two
//! named operations, `start` and `cont`, each a single call with no retry.

mod error;
mod http;
#[cfg(test)]
pub mod testing;
mod types;

pub use error::{RpcError, RpcErrorKind};
pub use http::HttpRpcClient;
pub use types::*;

use async_trait::async_trait;
use std::sync::Arc;

/// Named remote operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Start,
    Cont,
}

impl Operation {
    pub fn name(self) -> &'static str {
        match self {
            Operation::Start => "start",
            Operation::Cont => "cont",
        }
    }
}

/// Common interface for session backends
#[async_trait]
pub trait SessionBackend: Send + Sync {
    /// Start a session, possibly for a returning client
    async fn start(&self, request: &StartRequest) -> Result<StartResponse, RpcError>;

    /// Submit input for a step and get the next step's content
    async fn cont(&self, request: &ContinueRequest) -> Result<ContinueResponse, RpcError>;
}

/// Logging wrapper for session backends
pub struct LoggingBackend {
    inner: Arc<dyn SessionBackend>,
}

impl LoggingBackend {
    pub fn new(inner: Arc<dyn SessionBackend>) -> Self {
        Self { inner }
    }

    fn log_outcome<T>(
        operation: Operation,
        started: std::time::Instant,
        result: &Result<T, RpcError>,
    ) {
        let duration = started.elapsed();
        match result {
            Ok(_) => {
                tracing::info!(
                    operation = operation.name(),
                    duration_ms = %duration.as_millis(),
                    "Backend call completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    operation = operation.name(),
                    duration_ms = %duration.as_millis(),
                    kind = e.kind.as_str(),
                    error = %e.message,
                    "Backend call failed"
                );
            }
        }
    }
}

#[async_trait]
impl SessionBackend for LoggingBackend {
    async fn start(&self, request: &StartRequest) -> Result<StartResponse, RpcError> {
        let started = std::time::Instant::now();
        let result = self.inner.start(request).await;
        Self::log_outcome(Operation::Start, started, &result);
        result
    }

    async fn cont(&self, request: &ContinueRequest) -> Result<ContinueResponse, RpcError> {
        let started = std::time::Instant::now();
        let result = self.inner.cont(request).await;
        Self::log_outcome(Operation::Cont, started, &result);
        result
    }
}
