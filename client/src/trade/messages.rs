//! # Role Messages
//!
//! The four signed statements trade parties swap before a match is sent
//! to the chain. Each is a flat record of strings with the signature as
//! its last field, and serializes to the same JSON the node's verifier
//! expects inside an operation record (empty fields omitted).
//!
//! Values are kept exactly as the signer typed them. Amounts stay hex
//! strings and addresses keep their case, because any normalization would
//! change the signed bytes.

use alloy_primitives::Address;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::encoding::{CanonicalMessage, Role};
use crate::crypto::signatures::{recover_signer_hex, SignatureError};
use crate::transaction::payload::{to_go_json, PayloadError};
use crate::validation::ValidationError;

/// A buyer's standing offer.
///
/// An empty `nft_address` means the buyer will take any NFT the seller
/// lazily mints; an empty `seller` means any seller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuyerMessage {
    #[serde(rename = "price", default, skip_serializing_if = "String::is_empty")]
    pub amount: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub nft_address: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub exchanger: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub block_number: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub seller: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub sig: String,
}

/// A seller's offer for an NFT that is already minted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seller1Message {
    #[serde(rename = "price", default, skip_serializing_if = "String::is_empty")]
    pub amount: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub nft_address: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub exchanger: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub block_number: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub sig: String,
}

/// A creator's offer to mint on sale (lazy minting).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seller2Message {
    #[serde(rename = "price", default, skip_serializing_if = "String::is_empty")]
    pub amount: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub royalty: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub meta_url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub exclusive_flag: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub exchanger: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub block_number: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub sig: String,
}

/// An exchange owner's grant letting `to` match trades in its name until
/// `block_number`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangerAuthMessage {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub exchanger_owner: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub to: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub block_number: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub sig: String,
}

impl CanonicalMessage for BuyerMessage {
    const ROLE: Role = Role::Buyer;

    fn canonical_fields(&self) -> Vec<&str> {
        vec![
            self.amount.as_str(),
            self.nft_address.as_str(),
            self.exchanger.as_str(),
            self.block_number.as_str(),
            self.seller.as_str(),
        ]
    }
}

impl CanonicalMessage for Seller1Message {
    const ROLE: Role = Role::Seller1;

    fn canonical_fields(&self) -> Vec<&str> {
        vec![
            self.amount.as_str(),
            self.nft_address.as_str(),
            self.exchanger.as_str(),
            self.block_number.as_str(),
        ]
    }
}

impl CanonicalMessage for Seller2Message {
    const ROLE: Role = Role::Seller2;

    fn canonical_fields(&self) -> Vec<&str> {
        vec![
            self.amount.as_str(),
            self.royalty.as_str(),
            self.meta_url.as_str(),
            self.exclusive_flag.as_str(),
            self.exchanger.as_str(),
            self.block_number.as_str(),
        ]
    }
}

impl CanonicalMessage for ExchangerAuthMessage {
    const ROLE: Role = Role::ExchangerAuth;

    fn canonical_fields(&self) -> Vec<&str> {
        vec![self.exchanger_owner.as_str(), self.to.as_str(), self.block_number.as_str()]
    }
}

/// Exchange format shared by all role messages.
pub trait RoleMessage: CanonicalMessage + Serialize + DeserializeOwned + Sized {
    /// The hex signature carried by the message.
    fn signature(&self) -> &str;

    /// The validity-window block number.
    fn block_number(&self) -> &str;

    /// Decode a message received from another party.
    fn from_json(bytes: &[u8]) -> Result<Self, ValidationError> {
        serde_json::from_slice(bytes).map_err(|e| ValidationError::MalformedMessage {
            role: Self::ROLE.as_str(),
            reason: e.to_string(),
        })
    }

    /// Encode for sending to another party. Byte-identical to what the
    /// node's own encoder would produce for the same record.
    fn to_json(&self) -> Result<Vec<u8>, PayloadError> {
        to_go_json(self)
    }

    /// Recover who signed this message.
    ///
    /// Never called during assembly: the chain re-verifies every embedded
    /// signature, and the client forwards messages untouched.
    fn signer(&self) -> Result<Address, SignatureError> {
        recover_signer_hex(&self.canonical_bytes(), self.signature())
    }
}

macro_rules! impl_role_message {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl RoleMessage for $ty {
                fn signature(&self) -> &str {
                    &self.sig
                }

                fn block_number(&self) -> &str {
                    self.block_number.as_str()
                }
            }
        )+
    };
}

impl_role_message!(BuyerMessage, Seller1Message, Seller2Message, ExchangerAuthMessage);

/// The two seller shapes, seen through the fields a buyer is matched on.
pub trait SellerOffer: RoleMessage {
    fn amount(&self) -> &str;
    fn exchanger(&self) -> &str;
}

impl SellerOffer for Seller1Message {
    fn amount(&self) -> &str {
        self.amount.as_str()
    }

    fn exchanger(&self) -> &str {
        self.exchanger.as_str()
    }
}

impl SellerOffer for Seller2Message {
    fn amount(&self) -> &str {
        self.amount.as_str()
    }

    fn exchanger(&self) -> &str {
        self.exchanger.as_str()
    }
}
