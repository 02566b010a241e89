//! HTTP transport for backend calls
//!
//! Each operation is a `POST {base_url}/{operation}` with a JSON request body,
//! answered by a JSON body of the operation's response type.

use super::{
    ContinueRequest, ContinueResponse, Operation, RpcError, SessionBackend, StartRequest,
    StartResponse,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Backend client speaking JSON over HTTP
pub struct HttpRpcClient {
    client: Client,
    base_url: String,
}

impl HttpRpcClient {
    /// Build a client for the backend at `base_url`.
    ///
    /// Without a timeout the transport default applies.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn operation_url(&self, operation: Operation) -> String {
        format!("{}/{}", self.base_url, operation.name())
    }

    /// Invoke one operation, single attempt
    pub async fn call<Req, Res>(
        &self,
        operation: Operation,
        request: &Req,
    ) -> Result<Res, RpcError>
    where
        Req: Serialize + Sync,
        Res: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.operation_url(operation))
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RpcError::network(operation, format!("Request timeout: {e}"))
                } else if e.is_connect() {
                    RpcError::network(operation, format!("Connection failed: {e}"))
                } else {
                    RpcError::network(operation, format!("Request failed: {e}"))
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RpcError::network(operation, format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(RpcError::backend(operation, format!("HTTP {status}: {body}")));
        }

        serde_json::from_str(&body).map_err(|e| {
            RpcError::decode(operation, format!("Failed to parse response: {e} - body: {body}"))
        })
    }
}

#[async_trait]
impl SessionBackend for HttpRpcClient {
    async fn start(&self, request: &StartRequest) -> Result<StartResponse, RpcError> {
        self.call(Operation::Start, request).await
    }

    async fn cont(&self, request: &ContinueRequest) -> Result<ContinueResponse, RpcError> {
        self.call(Operation::Cont, request).await
    }
}
