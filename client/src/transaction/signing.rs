//! EIP-155 transaction signing.
//!
//! Wormholes nodes accept legacy (type 0) transactions only. The chain id
//! is folded into `v`, which keeps a transaction signed for one network
//! from being replayed on another. Signing is separate from planning so
//! the plan can be inspected, and separate from broadcasting so it can be
//! tested without a node.

use alloy_consensus::{SignableTransaction, TxLegacy};
use alloy_primitives::{PrimitiveSignature, TxKind, B256, U256};
use k256::ecdsa::{signature::hazmat::PrehashSigner, RecoveryId, Signature};

use super::builder::TxPlan;
use crate::crypto::keys::WormKeypair;
use crate::crypto::signatures::SignatureError;

/// Chain-dependent fields the node supplies at send time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxEnvelope {
    pub nonce: u64,
    pub gas_price: u128,
    pub chain_id: u64,
}

/// A signed, RLP-encoded transaction ready for `eth_sendRawTransaction`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    pub raw: Vec<u8>,
    pub hash: B256,
}

impl SignedTransaction {
    /// Lowercase `0x` hash, the form every operation returns.
    pub fn hash_hex(&self) -> String {
        format!("0x{}", hex::encode(self.hash))
    }

    /// Lowercase `0x` hex of the raw transaction.
    pub fn raw_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.raw))
    }
}

/// Build the legacy transaction for `plan` and sign it.
pub fn sign_plan(
    keypair: &WormKeypair,
    plan: &TxPlan,
    envelope: TxEnvelope,
) -> Result<SignedTransaction, SignatureError> {
    let tx = TxLegacy {
        chain_id: Some(envelope.chain_id),
        nonce: envelope.nonce,
        gas_price: envelope.gas_price,
        gas_limit: plan.gas_limit,
        to: TxKind::Call(plan.to),
        value: plan.value,
        input: plan.data.clone(),
    };

    let signature = sign_hash(keypair, tx.signature_hash())?;
    let signed = tx.into_signed(signature);
    let mut raw = Vec::new();
    signed.rlp_encode(&mut raw);
    Ok(SignedTransaction {
        raw,
        hash: *signed.hash(),
    })
}

fn sign_hash(keypair: &WormKeypair, hash: B256) -> Result<PrimitiveSignature, SignatureError> {
    let (sig, recovery_id): (Signature, RecoveryId) = keypair
        .signing_key()
        .sign_prehash(hash.as_ref())
        .map_err(|e| SignatureError::SigningFailed(e.to_string()))?;
    let r = U256::from_be_slice(sig.r().to_bytes().as_slice());
    let s = U256::from_be_slice(sig.s().to_bytes().as_slice());
    Ok(PrimitiveSignature::new(r, s, recovery_id.is_y_odd()))
}
