//! JSON-RPC 2.0 over HTTP.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::debug;

use super::rpc::{RpcMethod, RpcRequest, RpcResponse};
use super::transport::{NodeRpc, TransportError};
use crate::config::ClientConfig;

/// A node reached over HTTP.
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
    next_id: AtomicU64,
}

impl HttpTransport {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Http(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            url: url.into(),
            next_id: AtomicU64::new(1),
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, TransportError> {
        Self::new(config.rpc_url.clone(), config.request_timeout())
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn request(&self, method: RpcMethod, params: Value) -> RpcRequest {
        RpcRequest::new(self.next_id.fetch_add(1, Ordering::Relaxed), method, params)
    }

    async fn post<B: serde::Serialize + ?Sized>(
        &self,
        body: &B,
        label: &str,
    ) -> Result<(StatusCode, Value), TransportError> {
        let response = self
            .client
            .post(&self.url)
            .json(body)
            .send()
            .await
            .map_err(|e| TransportError::Http(format!("{label} request failed: {e}")))?;
        let status = response.status();
        let value: Value = response.json().await.map_err(|e| {
            if status.is_success() {
                TransportError::Decode(format!("{label} invalid JSON response: {e}"))
            } else {
                TransportError::Http(format!("{label} HTTP {status}"))
            }
        })?;
        Ok((status, value))
    }
}

fn into_result(method: RpcMethod, response: RpcResponse) -> Result<Value, TransportError> {
    match response.error {
        Some(err) => {
            debug!(%method, code = err.code, message = %err.message, "rpc error");
            Err(err.into())
        }
        None => Ok(response.result),
    }
}

fn parse_response(method: RpcMethod, value: Value) -> Result<RpcResponse, TransportError> {
    serde_json::from_value(value)
        .map_err(|e| TransportError::Decode(format!("{method} malformed response: {e}")))
}

#[async_trait]
impl NodeRpc for HttpTransport {
    async fn call(&self, method: RpcMethod, params: Value) -> Result<Value, TransportError> {
        let request = self.request(method, params);
        debug!(%method, id = request.id, "rpc call");

        let (status, value) = self.post(&request, method.as_str()).await?;
        // Geth answers RPC errors with 200, but proxies in front of it may
        // not. A parseable error object wins over the status code.
        match parse_response(method, value) {
            Ok(response) if response.error.is_some() || status.is_success() => {
                into_result(method, response)
            }
            Ok(_) => Err(TransportError::Http(format!("{method} HTTP {status}"))),
            Err(_) if !status.is_success() => {
                Err(TransportError::Http(format!("{method} HTTP {status}")))
            }
            Err(e) => Err(e),
        }
    }

    async fn batch(
        &self,
        calls: Vec<(RpcMethod, Value)>,
    ) -> Result<Vec<Result<Value, TransportError>>, TransportError> {
        if calls.is_empty() {
            return Ok(Vec::new());
        }
        let requests: Vec<RpcRequest> = calls
            .into_iter()
            .map(|(method, params)| self.request(method, params))
            .collect();
        debug!(size = requests.len(), first = %requests[0].method, "rpc batch");

        let (status, value) = self.post(&requests, "batch").await?;
        if !status.is_success() {
            return Err(TransportError::Http(format!("batch HTTP {status}")));
        }
        let responses: Vec<RpcResponse> = serde_json::from_value(value)
            .map_err(|e| TransportError::Decode(format!("batch malformed response: {e}")))?;

        // Responses may come back in any order; match them up by id.
        let mut by_id: HashMap<u64, RpcResponse> = responses
            .into_iter()
            .filter_map(|r| r.id_u64().map(|id| (id, r)))
            .collect();
        Ok(requests
            .iter()
            .map(|req| match by_id.remove(&req.id) {
                Some(response) => into_result(req.method, response),
                None => Err(TransportError::Decode(format!(
                    "batch response missing id {} ({})",
                    req.id, req.method
                ))),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_ids_increase() {
        let transport = HttpTransport::new("http://127.0.0.1:8545", Duration::from_secs(1)).unwrap();
        let a = transport.request(RpcMethod::ChainId, json!([]));
        let b = transport.request(RpcMethod::ChainId, json!([]));
        assert_eq!(b.id, a.id + 1);
    }

    #[test]
    fn test_from_config() {
        let config = ClientConfig::new("http://node.example:8545");
        let transport = HttpTransport::from_config(&config).unwrap();
        assert_eq!(transport.url(), "http://node.example:8545");
    }

    #[test]
    fn test_error_response_maps_to_rpc() {
        let response = parse_response(
            RpcMethod::SendRawTransaction,
            json!({"jsonrpc": "2.0", "id": 1, "error": {"code": -32000, "message": "nonce too low"}}),
        )
        .unwrap();
        let err = into_result(RpcMethod::SendRawTransaction, response).unwrap_err();
        assert_eq!(
            err,
            TransportError::Rpc {
                code: -32000,
                message: "nonce too low".into()
            }
        );
    }

    #[test]
    fn test_non_object_response_is_decode_error() {
        let err = parse_response(RpcMethod::ChainId, json!("garbage")).unwrap_err();
        assert!(matches!(err, TransportError::Decode(_)));
    }

    #[tokio::test]
    async fn test_unreachable_node_is_http_error() {
        // Port 9 (discard) is closed on test machines.
        let transport = HttpTransport::new("http://127.0.0.1:9", Duration::from_millis(500)).unwrap();
        let err = transport.call(RpcMethod::ChainId, json!([])).await.unwrap_err();
        assert!(matches!(err, TransportError::Http(_)));
    }
}
