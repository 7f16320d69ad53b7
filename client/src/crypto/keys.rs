//! # Key Management
//!
//! secp256k1 keypairs for Wormholes accounts.
//!
//! An account on the chain is just the last 20 bytes of the keccak-256
//! hash of an uncompressed public key, so everything the client signs
//! (role messages, delegation proofs, transactions) flows from a single
//! [`WormKeypair`].
//!
//! ## Security considerations
//!
//! - Keys are generated from `OsRng`.
//! - `Debug` prints the address, never the scalar.
//! - Nothing in this module logs. Keep it that way.
//! - Exporting the secret is an explicit call ([`WormKeypair::to_hex`]),
//!   there is no `Serialize` impl.

use std::fmt;

use alloy_primitives::{keccak256, Address};
use k256::ecdsa::{SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use thiserror::Error;

/// Length of a secp256k1 secret scalar in bytes.
pub const SECRET_KEY_LENGTH: usize = 32;

/// Errors that can occur while loading a private key.
///
/// Messages never echo the input. A typo in a key is still a key.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("private key is not valid hex")]
    InvalidHex,

    #[error("private key must be {SECRET_KEY_LENGTH} bytes, got {0}")]
    InvalidLength(usize),

    #[error("private key is not a valid secp256k1 scalar")]
    InvalidScalar,
}

/// A Wormholes account keypair.
///
/// Cheap to clone. Two clones sign identically since the ECDSA nonce is
/// derived deterministically (RFC 6979) from the key and the digest.
#[derive(Clone)]
pub struct WormKeypair {
    signing_key: SigningKey,
    address: Address,
}

impl WormKeypair {
    /// Generate a fresh keypair from the OS RNG.
    pub fn generate() -> Self {
        Self::from_signing_key(SigningKey::random(&mut OsRng))
    }

    /// Load a keypair from a hex-encoded secret, with or without a
    /// `0x`/`0X` prefix. Surrounding whitespace is ignored so keys pasted
    /// from files or env vars load as-is.
    pub fn from_hex(secret: &str) -> Result<Self, KeyError> {
        let trimmed = secret.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        let bytes = hex::decode(digits).map_err(|_| KeyError::InvalidHex)?;
        Self::from_bytes(&bytes)
    }

    /// Load a keypair from raw secret bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        if bytes.len() != SECRET_KEY_LENGTH {
            return Err(KeyError::InvalidLength(bytes.len()));
        }
        let signing_key = SigningKey::from_slice(bytes).map_err(|_| KeyError::InvalidScalar)?;
        Ok(Self::from_signing_key(signing_key))
    }

    fn from_signing_key(signing_key: SigningKey) -> Self {
        let address = address_of(signing_key.verifying_key());
        Self {
            signing_key,
            address,
        }
    }

    /// The account address controlled by this key.
    pub fn address(&self) -> Address {
        self.address
    }

    /// The public half of the key.
    pub fn verifying_key(&self) -> &VerifyingKey {
        self.signing_key.verifying_key()
    }

    /// Export the secret scalar as lowercase hex without a prefix.
    ///
    /// Only the CLI's `keygen` command should need this.
    pub fn to_hex(&self) -> String {
        hex::encode(self.signing_key.to_bytes())
    }

    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }
}

impl fmt::Debug for WormKeypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WormKeypair")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

/// Derive the account address of a public key: keccak-256 over the 64-byte
/// uncompressed point (tag byte dropped), keep the last 20 bytes.
pub fn address_of(verifying_key: &VerifyingKey) -> Address {
    let point = verifying_key.to_encoded_point(false);
    let hash = keccak256(&point.as_bytes()[1..]);
    Address::from_slice(&hash[12..])
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEV_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn test_well_known_address() {
        // First account of the standard development mnemonic.
        let kp = WormKeypair::from_hex(DEV_KEY).unwrap();
        assert_eq!(
            kp.address().to_string(),
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
        );
    }

    #[test]
    fn test_prefix_and_whitespace_accepted() {
        let plain = WormKeypair::from_hex(DEV_KEY).unwrap();
        let prefixed = WormKeypair::from_hex(&format!("0x{DEV_KEY}")).unwrap();
        let upper = WormKeypair::from_hex(&format!("0X{DEV_KEY}\n")).unwrap();
        assert_eq!(plain.address(), prefixed.address());
        assert_eq!(plain.address(), upper.address());
    }

    #[test]
    fn test_rejects_bad_hex() {
        assert_eq!(
            WormKeypair::from_hex("zz").unwrap_err(),
            KeyError::InvalidHex
        );
    }

    #[test]
    fn test_rejects_short_key() {
        assert_eq!(
            WormKeypair::from_hex("0x1234").unwrap_err(),
            KeyError::InvalidLength(2)
        );
    }

    #[test]
    fn test_rejects_zero_scalar() {
        assert_eq!(
            WormKeypair::from_bytes(&[0u8; 32]).unwrap_err(),
            KeyError::InvalidScalar
        );
    }

    #[test]
    fn test_hex_export_roundtrip() {
        let kp = WormKeypair::generate();
        let restored = WormKeypair::from_hex(&kp.to_hex()).unwrap();
        assert_eq!(kp.address(), restored.address());
    }

    #[test]
    fn test_debug_hides_secret() {
        let kp = WormKeypair::from_hex(DEV_KEY).unwrap();
        let debug = format!("{kp:?}");
        assert!(!debug.contains(DEV_KEY));
        assert!(debug.contains("address"));
    }
}
