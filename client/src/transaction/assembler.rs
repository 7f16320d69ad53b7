//! Turning a validated plan into a broadcast transaction.
//!
//! Nonce, gas price and chain id are gathered first, then the transaction
//! is signed, then broadcast. A failure at any step aborts before anything
//! reaches the node, except the broadcast itself.

use tracing::{info, warn};

use super::builder::{prepare, TxPlan};
use super::signing::{sign_plan, SignedTransaction, TxEnvelope};
use super::types::Operation;
use crate::config::ClientConfig;
use crate::crypto::keys::WormKeypair;
use crate::error::ClientError;
use crate::network::transport::{NodeRpc, TransportError};

/// Collect the chain-dependent fields for a transaction from `sender`.
///
/// `gas_price` and `chain_id` set in `config` are used as-is.
pub async fn fetch_envelope<T: NodeRpc + ?Sized>(
    rpc: &T,
    config: &ClientConfig,
    sender: alloy_primitives::Address,
) -> Result<TxEnvelope, TransportError> {
    let nonce = rpc.pending_nonce(sender).await?;
    let gas_price = match config.gas_price {
        Some(price) => price,
        None => rpc.suggested_gas_price().await?,
    };
    let chain_id = match config.chain_id {
        Some(id) => id,
        None => rpc.chain_id().await?,
    };
    Ok(TxEnvelope {
        nonce,
        gas_price,
        chain_id,
    })
}

/// Sign `plan` and broadcast it.
pub async fn submit_plan<T: NodeRpc + ?Sized>(
    rpc: &T,
    config: &ClientConfig,
    keypair: &WormKeypair,
    plan: &TxPlan,
) -> Result<SignedTransaction, ClientError> {
    let envelope = fetch_envelope(rpc, config, keypair.address()).await?;
    let signed = sign_plan(keypair, plan, envelope)?;

    let node_hash = rpc.send_raw_transaction(&signed.raw).await?;
    if node_hash != signed.hash {
        warn!(local = %signed.hash, node = %node_hash, "node reported a different transaction hash");
    }

    let kind = plan
        .kind
        .map_or_else(|| "Transfer(plain)".to_string(), |k| k.to_string());
    info!(
        kind = %kind,
        nonce = envelope.nonce,
        gas_limit = plan.gas_limit,
        hash = %signed.hash_hex(),
        "transaction submitted"
    );
    Ok(signed)
}

/// Validate `op`, sign it as `keypair` and broadcast it. Returns the
/// lowercase `0x` transaction hash.
pub async fn assemble<T: NodeRpc + ?Sized>(
    rpc: &T,
    config: &ClientConfig,
    keypair: &WormKeypair,
    op: &Operation,
) -> Result<String, ClientError> {
    let plan = prepare(op, keypair.address())?;
    submit_plan(rpc, config, keypair, &plan)
        .await
        .map(|signed| signed.hash_hex())
}
