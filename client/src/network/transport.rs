//! The boundary between the client and a Wormholes node.
//!
//! Implementations supply two primitives, [`NodeRpc::call`] and
//! [`NodeRpc::batch`]. Every typed query is a default method built on top of
//! them, so a transport only has to move JSON.

use alloy_primitives::{keccak256, Address, B256, U256};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::warn;

use super::rpc::{RpcError, RpcMethod};
use super::types::{
    parse_quantity, Account, BeneficiaryAddress, Block, BlockHeader, BlockTag, MinerProxy,
    TransactionReceipt, ValidatorList,
};

/// Failures at the RPC boundary. Surfaced verbatim, never retried.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// Connection, timeout or non-2xx status.
    #[error("http transport error: {0}")]
    Http(String),

    /// The node answered with a JSON-RPC error object.
    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// The node answered but the result had an unexpected shape.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// The node returned `null` for something that must exist.
    #[error("not found: {0}")]
    NotFound(String),
}

impl From<RpcError> for TransportError {
    fn from(err: RpcError) -> Self {
        TransportError::Rpc {
            code: err.code,
            message: err.message,
        }
    }
}

fn decode<T: DeserializeOwned>(method: RpcMethod, value: Value) -> Result<T, TransportError> {
    serde_json::from_value(value).map_err(|e| TransportError::Decode(format!("{method}: {e}")))
}

fn quantity(method: RpcMethod, value: &Value) -> Result<U256, TransportError> {
    let s = value
        .as_str()
        .ok_or_else(|| TransportError::Decode(format!("{method}: expected string, got {value}")))?;
    parse_quantity(s).map_err(|e| TransportError::Decode(format!("{method}: {e}")))
}

fn quantity_u64(method: RpcMethod, value: &Value) -> Result<u64, TransportError> {
    let q = quantity(method, value)?;
    u64::try_from(q).map_err(|_| TransportError::Decode(format!("{method}: {q} exceeds u64")))
}

fn non_null(method: RpcMethod, what: String, value: Value) -> Result<Value, TransportError> {
    if value.is_null() {
        Err(TransportError::NotFound(format!("{method}: {what}")))
    } else {
        Ok(value)
    }
}

/// JSON-RPC access to a node.
#[async_trait]
pub trait NodeRpc: Send + Sync {
    /// One request, one result. `null` results are returned as-is.
    async fn call(&self, method: RpcMethod, params: Value) -> Result<Value, TransportError>;

    /// Several requests in one round trip. The outer error is a failure of
    /// the round trip itself; inner errors are per-call.
    async fn batch(
        &self,
        calls: Vec<(RpcMethod, Value)>,
    ) -> Result<Vec<Result<Value, TransportError>>, TransportError>;

    /// `eth_chainId`, the id folded into EIP-155 signatures.
    async fn chain_id(&self) -> Result<u64, TransportError> {
        let v = self.call(RpcMethod::ChainId, json!([])).await?;
        quantity_u64(RpcMethod::ChainId, &v)
    }

    /// `net_version`, a decimal string on every node seen so far.
    async fn network_id(&self) -> Result<u64, TransportError> {
        let v = self.call(RpcMethod::NetVersion, json!([])).await?;
        quantity_u64(RpcMethod::NetVersion, &v)
    }

    async fn block_number(&self) -> Result<u64, TransportError> {
        let v = self.call(RpcMethod::BlockNumber, json!([])).await?;
        quantity_u64(RpcMethod::BlockNumber, &v)
    }

    /// Next nonce for `address`, counting pool transactions.
    async fn pending_nonce(&self, address: Address) -> Result<u64, TransportError> {
        let v = self
            .call(RpcMethod::GetTransactionCount, json!([address, "pending"]))
            .await?;
        quantity_u64(RpcMethod::GetTransactionCount, &v)
    }

    async fn suggested_gas_price(&self) -> Result<u128, TransportError> {
        let v = self.call(RpcMethod::GasPrice, json!([])).await?;
        let q = quantity(RpcMethod::GasPrice, &v)?;
        u128::try_from(q)
            .map_err(|_| TransportError::Decode(format!("{}: {q} exceeds u128", RpcMethod::GasPrice)))
    }

    /// Broadcast a signed transaction. Node-side rejections come back as
    /// [`TransportError::Rpc`].
    ///
    /// Once the node has accepted the transaction, a result that is not a
    /// hash is logged and replaced by the keccak of `raw`.
    async fn send_raw_transaction(&self, raw: &[u8]) -> Result<B256, TransportError> {
        let v = self
            .call(
                RpcMethod::SendRawTransaction,
                json!([format!("0x{}", hex::encode(raw))]),
            )
            .await?;
        match decode(RpcMethod::SendRawTransaction, v) {
            Ok(hash) => Ok(hash),
            Err(err) => {
                let local = keccak256(raw);
                warn!(hash = %local, error = %err, "node accepted transaction without a usable hash");
                Ok(local)
            }
        }
    }

    /// `None` while the transaction is still pending or unknown.
    async fn transaction_receipt(
        &self,
        hash: B256,
    ) -> Result<Option<TransactionReceipt>, TransportError> {
        let v = self
            .call(RpcMethod::GetTransactionReceipt, json!([hash]))
            .await?;
        if v.is_null() {
            return Ok(None);
        }
        decode(RpcMethod::GetTransactionReceipt, v).map(Some)
    }

    /// Balance including pending transactions.
    async fn balance(&self, address: Address) -> Result<U256, TransportError> {
        self.balance_at(address, BlockTag::Pending).await
    }

    async fn balance_at(&self, address: Address, tag: BlockTag) -> Result<U256, TransportError> {
        let v = self
            .call(RpcMethod::GetBalance, json!([address, tag.to_param()]))
            .await?;
        quantity(RpcMethod::GetBalance, &v)
    }

    /// A block with full transactions and its uncle headers.
    async fn block_by_number(&self, tag: BlockTag) -> Result<Block, TransportError> {
        let v = self
            .call(RpcMethod::GetBlockByNumber, json!([tag.to_param(), true]))
            .await?;
        let v = non_null(RpcMethod::GetBlockByNumber, format!("block {tag}"), v)?;
        let mut block: Block = decode(RpcMethod::GetBlockByNumber, v)?;

        if block.uncles.is_empty() {
            return Ok(block);
        }
        let hash = block.header.hash.ok_or_else(|| {
            TransportError::Decode(format!("block {tag} has uncles but no hash"))
        })?;
        let calls = (0..block.uncles.len())
            .map(|i| {
                (
                    RpcMethod::GetUncleByBlockHashAndIndex,
                    json!([hash, format!("0x{i:x}")]),
                )
            })
            .collect();
        for (i, result) in self.batch(calls).await?.into_iter().enumerate() {
            let v = non_null(
                RpcMethod::GetUncleByBlockHashAndIndex,
                format!("uncle {i} of block {hash}"),
                result?,
            )?;
            let header: BlockHeader = decode(RpcMethod::GetUncleByBlockHashAndIndex, v)?;
            block.uncle_headers.push(header);
        }
        Ok(block)
    }

    async fn account_info(&self, address: Address, tag: BlockTag) -> Result<Account, TransportError> {
        let v = self
            .call(RpcMethod::GetAccountInfo, json!([address, tag.to_param()]))
            .await?;
        let v = non_null(RpcMethod::GetAccountInfo, format!("account {address}"), v)?;
        decode(RpcMethod::GetAccountInfo, v)
    }

    async fn validators(&self, tag: BlockTag) -> Result<ValidatorList, TransportError> {
        let v = self
            .call(RpcMethod::GetValidator, json!([tag.to_param()]))
            .await?;
        let v = non_null(RpcMethod::GetValidator, format!("validators at {tag}"), v)?;
        decode(RpcMethod::GetValidator, v)
    }

    /// Reward recipients of one block.
    async fn block_beneficiaries(
        &self,
        tag: BlockTag,
    ) -> Result<Vec<BeneficiaryAddress>, TransportError> {
        let v = self
            .call(
                RpcMethod::GetBlockBeneficiaryAddressByNumber,
                json!([tag.to_param(), true]),
            )
            .await?;
        let v = non_null(
            RpcMethod::GetBlockBeneficiaryAddressByNumber,
            format!("beneficiaries at {tag}"),
            v,
        )?;
        decode(RpcMethod::GetBlockBeneficiaryAddressByNumber, v)
    }

    /// Proxy bindings for `address` at block `number`. Empty when none.
    async fn miner_proxy(
        &self,
        number: u64,
        address: Address,
    ) -> Result<Vec<MinerProxy>, TransportError> {
        let v = self
            .call(
                RpcMethod::QueryMinerProxy,
                json!([format!("0x{number:x}"), address]),
            )
            .await?;
        if v.is_null() {
            return Ok(Vec::new());
        }
        decode(RpcMethod::QueryMinerProxy, v)
    }
}
