//! # Operation Payload Encoding
//!
//! Domain operations travel in the `data` field of an ordinary transaction:
//!
//! ```text
//! wormholes:{"type":14,"buyer":{...},"version":"v0.0.1"}
//! ```
//!
//! The node decodes the JSON with Go's `encoding/json`, and signed role
//! messages nested inside it are compared byte for byte, so the encoding
//! has to match Go's output exactly:
//!
//! - keys appear in declaration order of [`OperationRecord`];
//! - every field except `type` and `version` is omitted at its zero value;
//! - `<`, `>`, `&`, U+2028 and U+2029 are written as `\u` escapes.
//!
//! Control characters follow Go 1.22 and later, which writes backspace and
//! form feed as `\b`/`\f` the same way `serde_json` does. Older Go wrote
//! `\u0008`/`\u000c`.
//!
//! `serde_json` gets the rest right through attributes; the HTML escaping
//! is patched in by [`go_escape`] after serialization.

use serde::Serialize;
use thiserror::Error;

use super::types::{NftBlock, Operation};
use crate::config::{PAYLOAD_MARKER, PROTOCOL_VERSION};
use crate::trade::messages::{BuyerMessage, ExchangerAuthMessage, Seller1Message, Seller2Message};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PayloadError {
    #[error("failed to encode operation record: {0}")]
    Encode(String),
}

fn is_empty(s: &&str) -> bool {
    s.is_empty()
}

fn is_zero_u32(n: &u32) -> bool {
    *n == 0
}

fn is_zero_u64(n: &u64) -> bool {
    *n == 0
}

/// The JSON record behind the `wormholes:` marker.
///
/// Borrowed from an [`Operation`] for the length of one encode call.
#[derive(Debug, Default, Serialize)]
pub struct OperationRecord<'a> {
    #[serde(rename = "type")]
    pub tag: u8,
    #[serde(skip_serializing_if = "is_empty")]
    pub dir: &'a str,
    #[serde(skip_serializing_if = "is_empty")]
    pub start_index: &'a str,
    #[serde(skip_serializing_if = "is_zero_u64")]
    pub number: u64,
    #[serde(skip_serializing_if = "is_empty")]
    pub nft_address: &'a str,
    #[serde(skip_serializing_if = "is_zero_u32")]
    pub royalty: u32,
    #[serde(skip_serializing_if = "is_empty")]
    pub meta_url: &'a str,
    #[serde(skip_serializing_if = "is_empty")]
    pub exchanger: &'a str,
    #[serde(skip_serializing_if = "is_zero_u32")]
    pub fee_rate: u32,
    #[serde(skip_serializing_if = "is_empty")]
    pub name: &'a str,
    #[serde(skip_serializing_if = "is_empty")]
    pub url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer: Option<&'a BuyerMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seller1: Option<&'a Seller1Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seller2: Option<&'a Seller2Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchanger_auth: Option<&'a ExchangerAuthMessage>,
    #[serde(skip_serializing_if = "is_empty")]
    pub creator: &'a str,
    #[serde(skip_serializing_if = "is_empty")]
    pub proxy_address: &'a str,
    #[serde(skip_serializing_if = "is_empty")]
    pub proxy_sign: &'a str,
    pub version: &'a str,
}

impl<'a> OperationRecord<'a> {
    /// Lay out an operation's fields in the wire record.
    pub fn from_operation(op: &'a Operation) -> Self {
        let base = OperationRecord {
            tag: op.kind().tag(),
            version: PROTOCOL_VERSION,
            ..Default::default()
        };

        match op {
            Operation::Mint {
                royalty,
                meta_url,
                exchanger,
            } => OperationRecord {
                royalty: *royalty,
                meta_url,
                exchanger,
                ..base
            },
            Operation::Transfer { nft_address, .. }
            | Operation::Author { nft_address, .. }
            | Operation::AuthorRevoke { nft_address, .. }
            | Operation::SnftToErb { nft_address } => OperationRecord { nft_address, ..base },
            Operation::TokenPledge {
                proxy_address,
                proxy_sign,
            }
            | Operation::AccountDelegate {
                proxy_address,
                proxy_sign,
            } => OperationRecord {
                proxy_address,
                proxy_sign,
                ..base
            },
            Operation::Open {
                fee_rate,
                name,
                url,
            } => OperationRecord {
                fee_rate: *fee_rate,
                name,
                url,
                ..base
            },
            Operation::InsertNftBlock(block) | Operation::VoteOfficialNft(block) => {
                with_block(base, block)
            }
            Operation::VoteOfficialNftByApprovedExchanger {
                block,
                exchanger_auth,
            } => OperationRecord {
                exchanger_auth: Some(exchanger_auth),
                ..with_block(base, block)
            },
            Operation::TransactionNft { buyer, seller1, .. }
            | Operation::NftDoesNotAuthorizeExchanges { buyer, seller1, .. } => OperationRecord {
                buyer: Some(buyer),
                seller1: Some(seller1),
                ..base
            },
            Operation::BuyerInitiatingTransaction { seller1 } => OperationRecord {
                seller1: Some(seller1),
                ..base
            },
            Operation::FoundryTradeBuyer { seller2 } => OperationRecord {
                seller2: Some(seller2),
                ..base
            },
            Operation::FoundryExchange { buyer, seller2, .. } => OperationRecord {
                buyer: Some(buyer),
                seller2: Some(seller2),
                ..base
            },
            Operation::NftExchangeMatch {
                buyer,
                seller1,
                exchanger_auth,
                ..
            } => OperationRecord {
                buyer: Some(buyer),
                seller1: Some(seller1),
                exchanger_auth: Some(exchanger_auth),
                ..base
            },
            Operation::FoundryExchangeInitiated {
                buyer,
                seller2,
                exchanger_auth,
                ..
            } => OperationRecord {
                buyer: Some(buyer),
                seller2: Some(seller2),
                exchanger_auth: Some(exchanger_auth),
                ..base
            },
            Operation::AccountAuthor { .. }
            | Operation::AccountAuthorRevoke { .. }
            | Operation::TokenRevokesPledge
            | Operation::Close
            | Operation::AdditionalPledgeAmount { .. }
            | Operation::RevokesPledgeAmount { .. }
            | Operation::UnforzenAccount
            | Operation::RecoverCoefficient => base,
        }
    }
}

fn with_block<'a>(base: OperationRecord<'a>, block: &'a NftBlock) -> OperationRecord<'a> {
    OperationRecord {
        dir: &block.dir,
        start_index: &block.start_index,
        number: block.number,
        royalty: block.royalty,
        creator: &block.creator,
        ..base
    }
}

/// Serialize `value` to JSON exactly as Go's `json.Marshal` would.
pub fn to_go_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, PayloadError> {
    let json = serde_json::to_string(value).map_err(|e| PayloadError::Encode(e.to_string()))?;
    Ok(go_escape(&json).into_bytes())
}

/// Rewrite `serde_json` output into Go's escaping.
///
/// Input must be serializer output: every backslash starts an escape.
fn go_escape(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    let mut chars = json.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                out.push('\\');
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            }
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            other => out.push(other),
        }
    }
    out
}

/// The full transaction `data` for an operation: marker then record.
pub fn encode_operation(op: &Operation) -> Result<Vec<u8>, PayloadError> {
    let record = OperationRecord::from_operation(op);
    let json = to_go_json(&record)?;
    let mut data = Vec::with_capacity(PAYLOAD_MARKER.len() + json.len());
    data.extend_from_slice(PAYLOAD_MARKER.as_bytes());
    data.extend_from_slice(&json);
    Ok(data)
}
