//! # Cryptographic Primitives
//!
//! Thin, typed wrappers over `k256` and `alloy-primitives`:
//!
//! - **keys**: secp256k1 keypairs and address derivation.
//! - **hash**: keccak-256 and the personal-message hash.
//! - **signatures**: recoverable 65-byte signatures and signer recovery.
//!
//! Transaction signing (EIP-155) lives in `transaction::signing` since it
//! hashes an RLP envelope rather than a message.

pub mod hash;
pub mod keys;
pub mod signatures;

pub use hash::{keccak256, personal_message_hash};
pub use keys::{address_of, KeyError, WormKeypair};
pub use signatures::{
    recover_signer, recover_signer_hex, sign_message, verify_signer, MessageSignature,
    SignatureError,
};
