//! Offline signing for trade parties.
//!
//! A [`Wallet`] holds one key and nothing else. It builds role messages,
//! signs them and hands them back for the caller to ship to the other
//! parties however it likes. There is no I/O here, so every party in a
//! trade can run its own wallet without a node.

use alloy_primitives::Address;

use super::encoding::{CanonicalMessage, DelegateTerms};
use super::messages::{BuyerMessage, ExchangerAuthMessage, Seller1Message, Seller2Message};
use crate::crypto::keys::WormKeypair;
use crate::crypto::signatures::{sign_message, MessageSignature};
use crate::error::ClientError;
use crate::validation::check_flag;

/// A single party's signing key.
#[derive(Debug, Clone)]
pub struct Wallet {
    keypair: WormKeypair,
}

impl Wallet {
    pub fn new(keypair: WormKeypair) -> Self {
        Self { keypair }
    }

    /// Load from a hex private key (optional `0x` prefix).
    pub fn from_hex(secret: &str) -> Result<Self, ClientError> {
        Ok(Self::new(WormKeypair::from_hex(secret)?))
    }

    pub fn address(&self) -> Address {
        self.keypair.address()
    }

    pub fn keypair(&self) -> &WormKeypair {
        &self.keypair
    }

    fn sign<M: CanonicalMessage>(&self, message: &M) -> Result<MessageSignature, ClientError> {
        Ok(sign_message(&self.keypair, &message.canonical_bytes())?)
    }

    /// Sign a buyer offer.
    ///
    /// * `amount`: price in wei, hex.
    /// * `nft_address`: the NFT, or empty to accept a lazily minted one.
    /// * `exchanger`: exchange the trade goes through.
    /// * `block_number`: hex height the offer expires at.
    /// * `seller`: restrict to one seller, or empty.
    pub fn sign_buyer(
        &self,
        amount: &str,
        nft_address: &str,
        exchanger: &str,
        block_number: &str,
        seller: &str,
    ) -> Result<BuyerMessage, ClientError> {
        let mut message = BuyerMessage {
            amount: amount.to_string(),
            nft_address: nft_address.to_string(),
            exchanger: exchanger.to_string(),
            block_number: block_number.to_string(),
            seller: seller.to_string(),
            sig: String::new(),
        };
        message.sig = self.sign(&message)?.to_hex();
        Ok(message)
    }

    /// Sign an offer to sell an already minted NFT.
    pub fn sign_seller1(
        &self,
        amount: &str,
        nft_address: &str,
        exchanger: &str,
        block_number: &str,
    ) -> Result<Seller1Message, ClientError> {
        let mut message = Seller1Message {
            amount: amount.to_string(),
            nft_address: nft_address.to_string(),
            exchanger: exchanger.to_string(),
            block_number: block_number.to_string(),
            sig: String::new(),
        };
        message.sig = self.sign(&message)?.to_hex();
        Ok(message)
    }

    /// Sign an offer to mint and sell.
    ///
    /// `exclusive_flag` must be `"0"` (any exchange may sell) or `"1"`
    /// (only `exchanger`); anything else fails before signing.
    pub fn sign_seller2(
        &self,
        amount: &str,
        royalty: &str,
        meta_url: &str,
        exclusive_flag: &str,
        exchanger: &str,
        block_number: &str,
    ) -> Result<Seller2Message, ClientError> {
        check_flag(exclusive_flag)?;
        let mut message = Seller2Message {
            amount: amount.to_string(),
            royalty: royalty.to_string(),
            meta_url: meta_url.to_string(),
            exclusive_flag: exclusive_flag.to_string(),
            exchanger: exchanger.to_string(),
            block_number: block_number.to_string(),
            sig: String::new(),
        };
        message.sig = self.sign(&message)?.to_hex();
        Ok(message)
    }

    /// Sign a grant letting `to` act for the exchange `exchanger_owner`.
    pub fn sign_exchanger_auth(
        &self,
        exchanger_owner: &str,
        to: &str,
        block_number: &str,
    ) -> Result<ExchangerAuthMessage, ClientError> {
        let mut message = ExchangerAuthMessage {
            exchanger_owner: exchanger_owner.to_string(),
            to: to.to_string(),
            block_number: block_number.to_string(),
            sig: String::new(),
        };
        message.sig = self.sign(&message)?.to_hex();
        Ok(message)
    }

    /// Sign a delegation proof for staking operations. The result is the
    /// `0x` hex signature used as `proxy_sign`.
    pub fn sign_delegate(&self, address: &str, pledge_account: &str) -> Result<String, ClientError> {
        let terms = DelegateTerms {
            address,
            pledge_account,
        };
        Ok(self.sign(&terms)?.to_hex())
    }
}
