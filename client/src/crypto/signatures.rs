//! # Message Signatures
//!
//! Recoverable secp256k1 signatures over personal-message hashes. This is
//! the one signing scheme every trade role uses: buyers, sellers, exchange
//! owners and delegating stakers all go through [`sign_message`].
//!
//! The wire form is 65 bytes, `r ∥ s ∥ v`, with `v` shifted into {27, 28}
//! the way legacy wallets emit it, and serialized as lowercase `0x` hex.
//! The chain re-derives the signer from `(message, signature)`, so there is
//! no public key anywhere in a role message.

use std::fmt;
use std::str::FromStr;

use alloy_primitives::Address;
use k256::ecdsa::{signature::hazmat::PrehashSigner, RecoveryId, Signature, VerifyingKey};
use thiserror::Error;

use super::hash::personal_message_hash;
use super::keys::{address_of, WormKeypair};
use crate::config::{RECOVERY_ID_OFFSET, SIGNATURE_LENGTH};

/// Errors from signing or signature recovery.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SignatureError {
    #[error("signing failed: {0}")]
    SigningFailed(String),

    #[error("signature is not valid hex")]
    InvalidHex,

    #[error("signature must be {SIGNATURE_LENGTH} bytes, got {0}")]
    InvalidLength(usize),

    #[error("recovery byte must be 27 or 28, got {0}")]
    InvalidRecoveryId(u8),

    #[error("could not recover a public key from the signature")]
    RecoveryFailed,
}

/// A 65-byte recoverable signature, `r ∥ s ∥ v` with `v ∈ {27, 28}`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageSignature([u8; SIGNATURE_LENGTH]);

impl MessageSignature {
    /// Wrap raw bytes. `v` is checked here so every value of this type can
    /// be fed to recovery.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SignatureError> {
        let raw: [u8; SIGNATURE_LENGTH] = bytes
            .try_into()
            .map_err(|_| SignatureError::InvalidLength(bytes.len()))?;
        let v = raw[SIGNATURE_LENGTH - 1];
        if v != RECOVERY_ID_OFFSET && v != RECOVERY_ID_OFFSET + 1 {
            return Err(SignatureError::InvalidRecoveryId(v));
        }
        Ok(Self(raw))
    }

    /// Parse a `0x`/`0X` prefixed (or bare) hex signature.
    pub fn from_hex(s: &str) -> Result<Self, SignatureError> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        let bytes = hex::decode(digits).map_err(|_| SignatureError::InvalidHex)?;
        Self::from_bytes(&bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LENGTH] {
        &self.0
    }

    /// The recovery byte, 27 or 28.
    pub fn v(&self) -> u8 {
        self.0[SIGNATURE_LENGTH - 1]
    }

    /// Lowercase `0x` hex, the form embedded in role messages.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl fmt::Display for MessageSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for MessageSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MessageSignature({})", self.to_hex())
    }
}

impl FromStr for MessageSignature {
    type Err = SignatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

/// Sign `message` with the personal-message scheme.
///
/// Deterministic: the ECDSA nonce comes from RFC 6979, so the same key and
/// message always give the same 65 bytes.
pub fn sign_message(
    keypair: &WormKeypair,
    message: &[u8],
) -> Result<MessageSignature, SignatureError> {
    let hash = personal_message_hash(message);
    let (sig, recovery_id): (Signature, RecoveryId) = keypair
        .signing_key()
        .sign_prehash(hash.as_slice())
        .map_err(|e| SignatureError::SigningFailed(e.to_string()))?;

    let mut raw = [0u8; SIGNATURE_LENGTH];
    raw[..64].copy_from_slice(&sig.to_bytes());
    raw[64] = recovery_id.to_byte() + RECOVERY_ID_OFFSET;
    Ok(MessageSignature(raw))
}

/// Recover the address that produced `signature` over `message`.
pub fn recover_signer(
    message: &[u8],
    signature: &MessageSignature,
) -> Result<Address, SignatureError> {
    let hash = personal_message_hash(message);
    let raw = signature.as_bytes();
    let sig = Signature::from_slice(&raw[..64]).map_err(|_| SignatureError::RecoveryFailed)?;
    let recovery_id = RecoveryId::from_byte(signature.v() - RECOVERY_ID_OFFSET)
        .ok_or(SignatureError::InvalidRecoveryId(signature.v()))?;
    let key = VerifyingKey::recover_from_prehash(hash.as_slice(), &sig, recovery_id)
        .map_err(|_| SignatureError::RecoveryFailed)?;
    Ok(address_of(&key))
}

/// [`recover_signer`] for a hex signature as found in a role message.
pub fn recover_signer_hex(message: &[u8], signature: &str) -> Result<Address, SignatureError> {
    recover_signer(message, &MessageSignature::from_hex(signature)?)
}

/// True when `signature` over `message` recovers to `expected`.
pub fn verify_signer(message: &[u8], signature: &MessageSignature, expected: Address) -> bool {
    matches!(recover_signer(message, signature), Ok(addr) if addr == expected)
}
