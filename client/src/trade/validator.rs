//! # Cross-Party Validation
//!
//! Buyer and seller sign independently, so nothing guarantees their
//! messages agree. Before a match is assembled we check the fields the two
//! sides must share:
//!
//! 1. Every block number present carries the `0x` prefix.
//! 2. The buyer pays at least the seller's price. Amounts are compared as
//!    integers, since `"0x5" > "0x10"` as strings.
//! 3. Both name the same exchanger, compared byte for byte. `0xAB..` and
//!    `0xab..` are different exchangers here even though they are the
//!    same account, because each side signed its own spelling.
//!
//! Signatures are not checked. The chain recovers every embedded signer
//! itself, and a client-side check would only duplicate that with room to
//! disagree.

use alloy_primitives::U256;
use thiserror::Error;
use tracing::warn;

use super::encoding::Role;
use super::messages::{BuyerMessage, ExchangerAuthMessage, RoleMessage, SellerOffer};
use crate::validation::{check_hex, parse_amount};

/// Reasons a set of role messages cannot be matched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TradeError {
    #[error("buyer offers {buyer} but seller asks {seller}")]
    AmountMismatch { buyer: U256, seller: U256 },

    #[error("buyer's exchanger {buyer:?} does not match seller's {seller:?}")]
    ExchangerMismatch { buyer: String, seller: String },

    #[error("{role} block number {value:?} is not 0x-prefixed hex")]
    MalformedBlockNumber { role: Role, value: String },

    #[error("{role} amount {value:?} is not a 0x-prefixed hex integer")]
    InvalidAmount { role: Role, value: String },
}

impl TradeError {
    /// True for the two errors that mean the parties disagree, as opposed to
    /// one of them sending a malformed field.
    pub fn is_disagreement(&self) -> bool {
        matches!(
            self,
            TradeError::AmountMismatch { .. } | TradeError::ExchangerMismatch { .. }
        )
    }
}

/// Check a single message's block number.
pub fn check_block_number<M: RoleMessage>(message: &M) -> Result<(), TradeError> {
    check_hex("block_number", message.block_number()).map_err(|_| {
        TradeError::MalformedBlockNumber {
            role: M::ROLE,
            value: message.block_number().to_string(),
        }
    })
}

/// Parse a message amount, attributing failures to `role`.
pub fn message_amount(role: Role, amount: &str) -> Result<U256, TradeError> {
    parse_amount("price", amount).map_err(|_| TradeError::InvalidAmount {
        role,
        value: amount.to_string(),
    })
}

/// Validate a buyer against a seller, with an optional exchange grant.
///
/// Used for every matched trade: buyer + seller1, buyer + seller2, and the
/// exchange-delegated variants of both.
pub fn validate_match<S: SellerOffer>(
    buyer: &BuyerMessage,
    seller: &S,
    exchanger_auth: Option<&ExchangerAuthMessage>,
) -> Result<(), TradeError> {
    let result = check_match(buyer, seller, exchanger_auth);
    if let Err(ref err) = result {
        warn!(seller_role = %S::ROLE, error = %err, "trade rejected");
    }
    result
}

fn check_match<S: SellerOffer>(
    buyer: &BuyerMessage,
    seller: &S,
    exchanger_auth: Option<&ExchangerAuthMessage>,
) -> Result<(), TradeError> {
    check_block_number(buyer)?;
    check_block_number(seller)?;
    if let Some(auth) = exchanger_auth {
        check_block_number(auth)?;
    }

    let buyer_amount = message_amount(Role::Buyer, &buyer.amount)?;
    let seller_amount = message_amount(S::ROLE, seller.amount())?;
    if buyer_amount < seller_amount {
        return Err(TradeError::AmountMismatch {
            buyer: buyer_amount,
            seller: seller_amount,
        });
    }

    if buyer.exchanger != seller.exchanger() {
        return Err(TradeError::ExchangerMismatch {
            buyer: buyer.exchanger.clone(),
            seller: seller.exchanger().to_string(),
        });
    }

    Ok(())
}
