//! Input checks that run before anything is signed or sent.
//!
//! Three shapes of string show up in operation parameters:
//!
//! - **account addresses**: `0x`/`0X` followed by exactly 40 hex digits.
//! - **NFT addresses and block numbers**: only the `0x`/`0X` prefix is
//!   required. SNFT fragment ranges use shorter addresses, and the node
//!   does the real parsing.
//! - **flags**: exactly `"0"` or `"1"`.
//!
//! Amounts are hex big integers and are parsed into [`U256`] so they can be
//! compared numerically.

use std::str::FromStr;

use alloy_primitives::{Address, B256, U256};
use thiserror::Error;

use crate::config::ADDRESS_STRING_LENGTH;

/// Malformed caller input. Always fixable by correcting the argument.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid {field} address {value:?}: expected 0x followed by 40 hex digits")]
    InvalidAddress { field: &'static str, value: String },

    #[error("invalid {field} {value:?}: expected a 0x-prefixed hex string")]
    InvalidHex { field: &'static str, value: String },

    #[error("invalid transaction hash {0:?}: expected 0x followed by 64 hex digits")]
    InvalidHash(String),

    #[error("invalid exclusive flag {0:?}: expected \"0\" or \"1\"")]
    InvalidFlag(String),

    #[error("invalid {field} amount {value:?}: expected a 0x-prefixed hex integer")]
    InvalidAmount { field: &'static str, value: String },

    #[error("malformed {role} message: {reason}")]
    MalformedMessage { role: &'static str, reason: String },
}

fn has_hex_prefix(value: &str) -> bool {
    value.starts_with("0x") || value.starts_with("0X")
}

/// True for a 42-character `0x`/`0X`-prefixed string.
///
/// This is the shape check the chain applies to recipients. It does not
/// look at the digits; [`check_address`] does.
pub fn is_address_shaped(value: &str) -> bool {
    has_hex_prefix(value) && value.len() == ADDRESS_STRING_LENGTH
}

/// Validate and parse an account address.
pub fn check_address(field: &'static str, value: &str) -> Result<Address, ValidationError> {
    let invalid = || ValidationError::InvalidAddress {
        field,
        value: value.to_string(),
    };
    if !is_address_shaped(value) {
        return Err(invalid());
    }
    Address::from_str(&value[2..]).map_err(|_| invalid())
}

/// Validate and parse a 32-byte transaction hash.
pub fn check_hash(value: &str) -> Result<B256, ValidationError> {
    if !has_hex_prefix(value) {
        return Err(ValidationError::InvalidHash(value.to_string()));
    }
    B256::from_str(&value[2..]).map_err(|_| ValidationError::InvalidHash(value.to_string()))
}

/// Require the `0x`/`0X` prefix. Used for NFT addresses and block numbers.
pub fn check_hex(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if has_hex_prefix(value) {
        Ok(())
    } else {
        Err(ValidationError::InvalidHex {
            field,
            value: value.to_string(),
        })
    }
}

/// Require an exclusive flag of `"0"` or `"1"`.
pub fn check_flag(value: &str) -> Result<(), ValidationError> {
    match value {
        "0" | "1" => Ok(()),
        other => Err(ValidationError::InvalidFlag(other.to_string())),
    }
}

/// Parse a `0x`-prefixed hex amount.
pub fn parse_amount(field: &'static str, value: &str) -> Result<U256, ValidationError> {
    let invalid = || ValidationError::InvalidAmount {
        field,
        value: value.to_string(),
    };
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .ok_or_else(invalid)?;
    if digits.is_empty() {
        return Err(invalid());
    }
    U256::from_str_radix(digits, 16).map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDR: &str = "0x44d952db5dfb4cbb54443554f4bb9cbebee2194c";

    #[test]
    fn test_address_accepts_both_prefixes() {
        assert!(check_address("to", ADDR).is_ok());
        let upper = ADDR.replacen("0x", "0X", 1);
        assert_eq!(
            check_address("to", &upper).unwrap(),
            check_address("to", ADDR).unwrap()
        );
    }

    #[test]
    fn test_address_length_is_exact() {
        let short = &ADDR[..41];
        let long = format!("{ADDR}0");
        assert!(!is_address_shaped(short));
        assert!(!is_address_shaped(&long));
        assert!(matches!(
            check_address("to", short),
            Err(ValidationError::InvalidAddress { field: "to", .. })
        ));
        assert!(check_address("to", &long).is_err());
    }

    #[test]
    fn test_address_requires_prefix() {
        let bare = format!("00{}", &ADDR[2..]);
        assert_eq!(bare.len(), 42);
        assert!(check_address("to", &bare).is_err());
    }

    #[test]
    fn test_address_rejects_non_hex_digits() {
        let bad = format!("0x{}", "g".repeat(40));
        assert!(is_address_shaped(&bad));
        assert!(check_address("to", &bad).is_err());
    }

    #[test]
    fn test_hash_shape() {
        let hash = format!("0x{}", "ab".repeat(32));
        assert_eq!(check_hash(&hash).unwrap(), B256::repeat_byte(0xab));
        for bad in ["0xzz", "", &hash[2..], &hash[..65]] {
            assert_eq!(
                check_hash(bad).unwrap_err(),
                ValidationError::InvalidHash(bad.to_string())
            );
        }
    }

    #[test]
    fn test_hex_prefix_only() {
        assert!(check_hex("nft_address", "0x0000000000000000000000000000000000000002").is_ok());
        assert!(check_hex("nft_address", "0x80000000000000000000000000000000000003").is_ok());
        assert!(check_hex("block_number", "0X487").is_ok());
        assert!(check_hex("block_number", "487").is_err());
        assert!(check_hex("block_number", "").is_err());
    }

    #[test]
    fn test_flags() {
        assert!(check_flag("0").is_ok());
        assert!(check_flag("1").is_ok());
        for bad in ["2", "", "yes", " 1", "01"] {
            assert_eq!(
                check_flag(bad).unwrap_err(),
                ValidationError::InvalidFlag(bad.to_string())
            );
        }
    }

    #[test]
    fn test_amounts_parse_numerically() {
        assert_eq!(
            parse_amount("amount", "0xde0b6b3a7640000").unwrap(),
            U256::from(10u64.pow(18))
        );
        assert!(parse_amount("amount", "0x5").unwrap() < parse_amount("amount", "0x10").unwrap());
    }

    #[test]
    fn test_amount_rejects_garbage() {
        for bad in ["", "0x", "123", "0xzz"] {
            assert!(parse_amount("amount", bad).is_err(), "{bad:?} accepted");
        }
    }
}
