//! # Hashing
//!
//! Everything on Wormholes hashes with keccak-256. The one wrinkle is the
//! personal-message hash used for off-chain signatures: the message is
//! prefixed with `"\x19Ethereum Signed Message:\n"` and its decimal byte
//! length before hashing, so a signed trade message can never be replayed
//! as a signed transaction.

pub use alloy_primitives::keccak256;
use alloy_primitives::B256;

use crate::config::SIGNED_MESSAGE_PREFIX;

/// Domain-separated hash of an off-chain message.
///
/// `keccak256("\x19Ethereum Signed Message:\n" ∥ len(message) ∥ message)`
/// where `len` is the decimal byte length.
pub fn personal_message_hash(message: &[u8]) -> B256 {
    let header = format!("{SIGNED_MESSAGE_PREFIX}{}", message.len());
    let mut buf = Vec::with_capacity(header.len() + message.len());
    buf.extend_from_slice(header.as_bytes());
    buf.extend_from_slice(message);
    keccak256(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_vector() {
        // Same digest wallets produce for personal_sign("Hello World").
        let hash = personal_message_hash(b"Hello World");
        assert_eq!(
            hex::encode(hash),
            "a1de988600a42c4b4ab089b619297c17d53cffae5d5120d82d8a92d0bb3b78f2"
        );
    }

    #[test]
    fn test_decimal_length_is_prefixed() {
        let expected = keccak256(b"\x19Ethereum Signed Message:\n14hello wormhole");
        assert_eq!(personal_message_hash(b"hello wormhole"), expected);
    }

    #[test]
    fn test_differs_from_plain_keccak() {
        assert_ne!(personal_message_hash(b"abc"), keccak256(b"abc"));
    }

    #[test]
    fn test_empty_message() {
        let expected = keccak256(b"\x19Ethereum Signed Message:\n0");
        assert_eq!(personal_message_hash(b""), expected);
    }
}
