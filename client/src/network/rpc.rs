//! # JSON-RPC Wire Types
//!
//! Request/response envelopes for talking to a Wormholes node over JSON-RPC
//! 2.0. The node speaks the standard `eth_` namespace plus a handful of
//! chain-specific methods for accounts, validators and miner proxies.
//!
//! ## Method Index
//!
//! | Method                                   | Used by                      |
//! |------------------------------------------|------------------------------|
//! | `eth_chainId`                            | transaction signing          |
//! | `net_version`                            | network id query             |
//! | `eth_blockNumber`                        | block height                 |
//! | `eth_getTransactionCount`                | pending nonce                |
//! | `eth_gasPrice`                           | suggested gas price          |
//! | `eth_sendRawTransaction`                 | broadcast                    |
//! | `eth_getTransactionReceipt`              | receipt lookup               |
//! | `eth_getBalance`                         | balance queries              |
//! | `eth_getBlockByNumber`                   | full block fetch             |
//! | `eth_getUncleByBlockHashAndIndex`        | uncle headers (batched)      |
//! | `eth_getAccountInfo`                     | NFT / staking account state  |
//! | `eth_getValidator`                       | validator set                |
//! | `eth_getBlockBeneficiaryAddressByNumber` | block reward recipients      |
//! | `eth_queryMinerProxy`                    | miner proxy lookup           |

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// RPC Method Enumeration
// ---------------------------------------------------------------------------

/// Node methods the client calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RpcMethod {
    #[serde(rename = "eth_chainId")]
    ChainId,
    #[serde(rename = "net_version")]
    NetVersion,
    #[serde(rename = "eth_blockNumber")]
    BlockNumber,
    #[serde(rename = "eth_getTransactionCount")]
    GetTransactionCount,
    #[serde(rename = "eth_gasPrice")]
    GasPrice,
    #[serde(rename = "eth_sendRawTransaction")]
    SendRawTransaction,
    #[serde(rename = "eth_getTransactionReceipt")]
    GetTransactionReceipt,
    #[serde(rename = "eth_getBalance")]
    GetBalance,
    #[serde(rename = "eth_getBlockByNumber")]
    GetBlockByNumber,
    #[serde(rename = "eth_getUncleByBlockHashAndIndex")]
    GetUncleByBlockHashAndIndex,
    #[serde(rename = "eth_getAccountInfo")]
    GetAccountInfo,
    #[serde(rename = "eth_getValidator")]
    GetValidator,
    #[serde(rename = "eth_getBlockBeneficiaryAddressByNumber")]
    GetBlockBeneficiaryAddressByNumber,
    #[serde(rename = "eth_queryMinerProxy")]
    QueryMinerProxy,
}

impl RpcMethod {
    /// The method name on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ChainId => "eth_chainId",
            Self::NetVersion => "net_version",
            Self::BlockNumber => "eth_blockNumber",
            Self::GetTransactionCount => "eth_getTransactionCount",
            Self::GasPrice => "eth_gasPrice",
            Self::SendRawTransaction => "eth_sendRawTransaction",
            Self::GetTransactionReceipt => "eth_getTransactionReceipt",
            Self::GetBalance => "eth_getBalance",
            Self::GetBlockByNumber => "eth_getBlockByNumber",
            Self::GetUncleByBlockHashAndIndex => "eth_getUncleByBlockHashAndIndex",
            Self::GetAccountInfo => "eth_getAccountInfo",
            Self::GetValidator => "eth_getValidator",
            Self::GetBlockBeneficiaryAddressByNumber => "eth_getBlockBeneficiaryAddressByNumber",
            Self::QueryMinerProxy => "eth_queryMinerProxy",
        }
    }
}

impl fmt::Display for RpcMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// RPC Request / Response
// ---------------------------------------------------------------------------

/// A JSON-RPC 2.0 request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub id: u64,
    pub method: RpcMethod,
    pub params: serde_json::Value,
}

impl RpcRequest {
    pub fn new(id: u64, method: RpcMethod, params: serde_json::Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            method,
            params,
        }
    }
}

/// A JSON-RPC 2.0 response.
///
/// A `null` result is a valid success (e.g. no receipt yet), so
/// `result` stays a plain [`serde_json::Value`] rather than an `Option`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcResponse {
    #[serde(default)]
    pub jsonrpc: String,
    #[serde(default)]
    pub id: serde_json::Value,
    #[serde(default)]
    pub result: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl RpcResponse {
    pub fn success(id: u64, result: serde_json::Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id: id.into(),
            result,
            error: None,
        }
    }

    pub fn error(id: u64, error: RpcError) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id: id.into(),
            result: serde_json::Value::Null,
            error: Some(error),
        }
    }

    /// The numeric id, if the node echoed one back.
    pub fn id_u64(&self) -> Option<u64> {
        self.id.as_u64()
    }
}

// ---------------------------------------------------------------------------
// RPC Errors
// ---------------------------------------------------------------------------

/// JSON-RPC 2.0 error object as returned by the node.
///
/// Standard codes: `-32700` parse error, `-32600` invalid request,
/// `-32601` method not found, `-32602` invalid params, `-32603` internal
/// error. Geth-derived nodes report transaction rejections (bad nonce,
/// underpriced, insufficient funds) as `-32000`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl RpcError {
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const SERVER_ERROR: i64 = -32000;

    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// The node does not expose this method.
    pub fn method_not_found(method: RpcMethod) -> Self {
        Self::new(
            Self::METHOD_NOT_FOUND,
            format!("the method {method} does not exist/is not available"),
        )
    }

    /// Generic server-side failure, the code geth uses for tx rejections.
    pub fn server_error(message: impl Into<String>) -> Self {
        Self::new(Self::SERVER_ERROR, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rpc_request_serialization() {
        let req = RpcRequest::new(7, RpcMethod::GetTransactionCount, json!(["0xabc", "pending"]));
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(
            value,
            json!({
                "jsonrpc": "2.0",
                "id": 7,
                "method": "eth_getTransactionCount",
                "params": ["0xabc", "pending"],
            })
        );
    }

    #[test]
    fn method_names_match_serde() {
        for method in [
            RpcMethod::ChainId,
            RpcMethod::NetVersion,
            RpcMethod::GetUncleByBlockHashAndIndex,
            RpcMethod::GetBlockBeneficiaryAddressByNumber,
            RpcMethod::QueryMinerProxy,
        ] {
            assert_eq!(serde_json::to_value(method).unwrap(), json!(method.as_str()));
        }
    }

    #[test]
    fn null_result_is_success() {
        let resp: RpcResponse =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":1,"result":null}"#).unwrap();
        assert!(resp.error.is_none());
        assert!(resp.result.is_null());
        assert_eq!(resp.id_u64(), Some(1));
    }

    #[test]
    fn rpc_error_response() {
        let resp: RpcResponse = serde_json::from_str(
            r#"{"jsonrpc":"2.0","id":3,"error":{"code":-32000,"message":"nonce too low"}}"#,
        )
        .unwrap();
        assert_eq!(resp.error, Some(RpcError::server_error("nonce too low")));
    }

    #[test]
    fn error_codes_are_correct() {
        assert_eq!(RpcError::method_not_found(RpcMethod::GetAccountInfo).code, -32601);
        assert_eq!(RpcError::server_error("x").code, -32000);
    }
}
