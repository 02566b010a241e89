//! Mock backend for testing
//!
//! Returns queued responses and records every request it receives.

use super::{
    ContinueRequest, ContinueResponse, Operation, RpcError, SessionBackend, StartRequest,
    StartResponse,
};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Mock backend that returns queued responses
#[derive(Default)]
pub struct MockBackend {
    start_responses: Mutex<VecDeque<Result<StartResponse, RpcError>>>,
    cont_responses: Mutex<VecDeque<Result<ContinueResponse, RpcError>>>,
    start_requests: Mutex<Vec<StartRequest>>,
    cont_requests: Mutex<Vec<ContinueRequest>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the outcome of the next `start` call
    pub fn queue_start(&self, response: Result<StartResponse, RpcError>) {
        self.start_responses.lock().unwrap().push_back(response);
    }

    /// Queue the outcome of the next `cont` call
    pub fn queue_cont(&self, response: Result<ContinueResponse, RpcError>) {
        self.cont_responses.lock().unwrap().push_back(response);
    }

    pub fn recorded_start_requests(&self) -> Vec<StartRequest> {
        self.start_requests.lock().unwrap().clone()
    }

    pub fn recorded_cont_requests(&self) -> Vec<ContinueRequest> {
        self.cont_requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl SessionBackend for MockBackend {
    async fn start(&self, request: &StartRequest) -> Result<StartResponse, RpcError> {
        self.start_requests.lock().unwrap().push(request.clone());
        self.start_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(RpcError::network(Operation::Start, "No mock response queued")))
    }

    async fn cont(&self, request: &ContinueRequest) -> Result<ContinueResponse, RpcError> {
        self.cont_requests.lock().unwrap().push(request.clone());
        self.cont_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(RpcError::network(Operation::Cont, "No mock response queued")))
    }
}
