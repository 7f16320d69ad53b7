//! Canonical message encoding.
//!
//! A role message is signed over the raw concatenation of its field values
//! in a fixed order. There are no separators and no length prefixes, so the
//! byte string only means something to a verifier that concatenates the
//! same fields in the same order:
//!
//! | Role          | Field order                                                    |
//! |---------------|----------------------------------------------------------------|
//! | Buyer         | amount, nft_address, exchanger, block_number, seller           |
//! | Seller1       | amount, nft_address, exchanger, block_number                   |
//! | Seller2       | amount, royalty, meta_url, exclusive_flag, exchanger, block_number |
//! | ExchangerAuth | exchanger_owner, to, block_number                              |
//! | Delegate      | address, pledge_account                                        |
//!
//! Changing any row is a protocol break: every signature produced by an
//! older client stops verifying on-chain.

use std::fmt;

/// The signing roles in a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Buyer,
    Seller1,
    Seller2,
    ExchangerAuth,
    Delegate,
}

impl Role {
    /// Lowercase name, as used in the operation record's JSON keys.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Buyer => "buyer",
            Role::Seller1 => "seller1",
            Role::Seller2 => "seller2",
            Role::ExchangerAuth => "exchanger_auth",
            Role::Delegate => "delegate",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anything that is signed as an ordered tuple of string fields.
pub trait CanonicalMessage {
    /// Which role signs this message.
    const ROLE: Role;

    /// The signed fields, in signing order.
    fn canonical_fields(&self) -> Vec<&str>;

    /// The exact bytes that get hashed and signed.
    fn canonical_bytes(&self) -> Vec<u8> {
        concat_fields(&self.canonical_fields())
    }
}

/// Concatenate field values with no separators.
pub fn concat_fields(fields: &[&str]) -> Vec<u8> {
    let len = fields.iter().map(|f| f.len()).sum();
    let mut out = Vec::with_capacity(len);
    for field in fields {
        out.extend_from_slice(field.as_bytes());
    }
    out
}

/// Terms of a delegation proof: a staking account lets `address` act for
/// `pledge_account`. Only ever signed, never serialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelegateTerms<'a> {
    pub address: &'a str,
    pub pledge_account: &'a str,
}

impl CanonicalMessage for DelegateTerms<'_> {
    const ROLE: Role = Role::Delegate;

    fn canonical_fields(&self) -> Vec<&str> {
        vec![self.address, self.pledge_account]
    }
}
