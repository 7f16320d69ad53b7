//! In-memory [`NodeRpc`] for tests.
//!
//! Responses are scripted per method. A method with a queue of responses
//! pops one per call; the last one sticks, so a single scripted response
//! answers every call. Every call is recorded with its params.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use super::rpc::RpcMethod;
use super::transport::{NodeRpc, TransportError};

#[derive(Default)]
struct MockState {
    responses: HashMap<RpcMethod, VecDeque<Result<Value, TransportError>>>,
    calls: Vec<(RpcMethod, Value)>,
    batches: usize,
}

/// Scripted, recording transport.
#[derive(Default)]
pub struct MockTransport {
    state: Mutex<MockState>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// A node that answers the calls every submission makes.
    pub fn with_chain(chain_id: u64, nonce: u64, gas_price: u128) -> Self {
        let mock = Self::new();
        mock.respond(RpcMethod::ChainId, Value::String(format!("0x{chain_id:x}")));
        mock.respond(
            RpcMethod::GetTransactionCount,
            Value::String(format!("0x{nonce:x}")),
        );
        mock.respond(RpcMethod::GasPrice, Value::String(format!("0x{gas_price:x}")));
        mock
    }

    /// Queue a successful result for `method`.
    pub fn respond(&self, method: RpcMethod, result: Value) {
        self.push(method, Ok(result));
    }

    /// Queue a failure for `method`.
    pub fn fail(&self, method: RpcMethod, error: TransportError) {
        self.push(method, Err(error));
    }

    fn push(&self, method: RpcMethod, response: Result<Value, TransportError>) {
        self.state
            .lock()
            .responses
            .entry(method)
            .or_default()
            .push_back(response);
    }

    /// Every call so far, in order, including those made inside batches.
    pub fn calls(&self) -> Vec<(RpcMethod, Value)> {
        self.state.lock().calls.clone()
    }

    /// Methods called so far, in order.
    pub fn methods(&self) -> Vec<RpcMethod> {
        self.state.lock().calls.iter().map(|(m, _)| *m).collect()
    }

    /// Params of the most recent call to `method`.
    pub fn last_params(&self, method: RpcMethod) -> Option<Value> {
        self.state
            .lock()
            .calls
            .iter()
            .rev()
            .find(|(m, _)| *m == method)
            .map(|(_, p)| p.clone())
    }

    /// Number of batch round trips.
    pub fn batch_count(&self) -> usize {
        self.state.lock().batches
    }

    fn answer(state: &mut MockState, method: RpcMethod, params: Value) -> Result<Value, TransportError> {
        state.calls.push((method, params));
        let queue = state.responses.get_mut(&method).ok_or_else(|| TransportError::Rpc {
            code: -32601,
            message: format!("the method {method} does not exist/is not available"),
        })?;
        let response = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };
        response.unwrap_or_else(|| {
            Err(TransportError::Http(format!("no response scripted for {method}")))
        })
    }
}

#[async_trait]
impl NodeRpc for MockTransport {
    async fn call(&self, method: RpcMethod, params: Value) -> Result<Value, TransportError> {
        Self::answer(&mut self.state.lock(), method, params)
    }

    async fn batch(
        &self,
        calls: Vec<(RpcMethod, Value)>,
    ) -> Result<Vec<Result<Value, TransportError>>, TransportError> {
        let mut state = self.state.lock();
        state.batches += 1;
        Ok(calls
            .into_iter()
            .map(|(method, params)| Self::answer(&mut state, method, params))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_queue_then_sticky() {
        let mock = MockTransport::new();
        mock.respond(RpcMethod::BlockNumber, json!("0x1"));
        mock.respond(RpcMethod::BlockNumber, json!("0x2"));
        assert_eq!(mock.block_number().await.unwrap(), 1);
        assert_eq!(mock.block_number().await.unwrap(), 2);
        assert_eq!(mock.block_number().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_unscripted_method_fails() {
        let mock = MockTransport::new();
        let err = mock.call(RpcMethod::GasPrice, json!([])).await.unwrap_err();
        assert!(matches!(err, TransportError::Rpc { code: -32601, .. }));
        assert_eq!(mock.methods(), vec![RpcMethod::GasPrice]);
    }

    #[tokio::test]
    async fn test_injected_failure() {
        let mock = MockTransport::new();
        mock.fail(RpcMethod::ChainId, TransportError::Http("timed out".into()));
        let err = mock.chain_id().await.unwrap_err();
        assert_eq!(err, TransportError::Http("timed out".into()));
    }
}
