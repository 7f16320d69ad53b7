//! Operation → transaction plan.
//!
//! [`prepare`] is the pure half of assembly: it checks an operation's
//! inputs, cross-validates any trade messages, and decides recipient,
//! value, gas limit and payload. Nothing here touches the network or a
//! key, so every operation can be tested without a node.
//!
//! | recipient | operations |
//! |-----------|------------|
//! | `to`      | Transfer, Author(Revoke), AccountAuthor(Revoke), the four exchange-side trade matches |
//! | sender    | everything else |
//!
//! Value is zero except for trades (the buyer's or seller's price) and
//! staking (fixed pledge, fixed exchange deposit, or the caller's amount).

use alloy_primitives::{Address, Bytes, U256};

use super::payload::encode_operation;
use super::types::{NftBlock, Operation, OperationKind};
use crate::config::{
    gas_limit, EXCHANGE_OPEN_ERB, NORMAL_TRANSFER_GAS, TOKEN_PLEDGE_ERB, WEI_PER_ERB,
};
use crate::error::ClientError;
use crate::trade::encoding::Role;
use crate::trade::messages::Seller2Message;
use crate::trade::validator::{check_block_number, message_amount, validate_match};
use crate::validation::{check_address, check_flag, check_hex};

// ---------------------------------------------------------------------------
// TxPlan
// ---------------------------------------------------------------------------

/// Everything about a transaction except nonce, gas price and chain id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxPlan {
    /// `None` for a plain value transfer.
    pub kind: Option<OperationKind>,
    pub to: Address,
    pub value: U256,
    pub gas_limit: u64,
    pub data: Bytes,
}

/// `erb` whole coins in wei.
pub fn erb_to_wei(erb: u128) -> U256 {
    U256::from(erb) * U256::from(WEI_PER_ERB)
}

// ---------------------------------------------------------------------------
// prepare
// ---------------------------------------------------------------------------

/// Validate `op` and lay it out as a transaction sent by `sender`.
pub fn prepare(op: &Operation, sender: Address) -> Result<TxPlan, ClientError> {
    let kind = op.kind();
    let (to, value) = route(op, sender)?;
    let data = encode_operation(op)?;
    Ok(TxPlan {
        kind: Some(kind),
        to,
        value,
        gas_limit: gas_limit(kind),
        data: Bytes::from(data),
    })
}

/// Plan a plain transfer of `value_erb` whole coins with raw `data`.
///
/// No marker is added; the node treats this as an ordinary transfer.
pub fn prepare_transfer(to: &str, value_erb: u64, data: &[u8]) -> Result<TxPlan, ClientError> {
    Ok(TxPlan {
        kind: None,
        to: check_address("to", to)?,
        value: erb_to_wei(u128::from(value_erb)),
        gas_limit: NORMAL_TRANSFER_GAS,
        data: Bytes::copy_from_slice(data),
    })
}

/// Check inputs and pick recipient and value.
fn route(op: &Operation, sender: Address) -> Result<(Address, U256), ClientError> {
    let routed = match op {
        Operation::Mint { exchanger, .. } => {
            if !exchanger.is_empty() {
                check_address("exchanger", exchanger)?;
            }
            (sender, U256::ZERO)
        }
        Operation::Transfer { nft_address, to }
        | Operation::Author { nft_address, to }
        | Operation::AuthorRevoke { nft_address, to } => {
            check_hex("nft_address", nft_address)?;
            (check_address("to", to)?, U256::ZERO)
        }
        Operation::AccountAuthor { to } | Operation::AccountAuthorRevoke { to } => {
            (check_address("to", to)?, U256::ZERO)
        }
        Operation::SnftToErb { nft_address } => {
            check_hex("nft_address", nft_address)?;
            (sender, U256::ZERO)
        }
        Operation::TokenPledge { .. } | Operation::TokenRevokesPledge => {
            (sender, erb_to_wei(TOKEN_PLEDGE_ERB))
        }
        Operation::Open { .. } => (sender, erb_to_wei(EXCHANGE_OPEN_ERB)),
        Operation::InsertNftBlock(block) | Operation::VoteOfficialNft(block) => {
            check_block(block)?;
            (sender, U256::ZERO)
        }
        Operation::VoteOfficialNftByApprovedExchanger {
            block,
            exchanger_auth,
        } => {
            check_block(block)?;
            check_block_number(exchanger_auth)?;
            (sender, U256::ZERO)
        }
        Operation::TransactionNft { buyer, seller1, to } => {
            let to = check_address("to", to)?;
            validate_match(buyer, seller1, None)?;
            (to, message_amount(Role::Buyer, &buyer.amount)?)
        }
        Operation::BuyerInitiatingTransaction { seller1 } => {
            check_block_number(seller1)?;
            (sender, message_amount(Role::Seller1, &seller1.amount)?)
        }
        Operation::FoundryTradeBuyer { seller2 } => {
            check_seller2_flag(seller2)?;
            check_block_number(seller2)?;
            (sender, message_amount(Role::Seller2, &seller2.amount)?)
        }
        Operation::FoundryExchange { buyer, seller2, to } => {
            let to = check_address("to", to)?;
            check_seller2_flag(seller2)?;
            validate_match(buyer, seller2, None)?;
            (to, message_amount(Role::Buyer, &buyer.amount)?)
        }
        Operation::NftExchangeMatch {
            buyer,
            seller1,
            exchanger_auth,
            to,
        } => {
            let to = check_address("to", to)?;
            validate_match(buyer, seller1, Some(exchanger_auth))?;
            (to, message_amount(Role::Buyer, &buyer.amount)?)
        }
        Operation::FoundryExchangeInitiated {
            buyer,
            seller2,
            exchanger_auth,
            to,
        } => {
            let to = check_address("to", to)?;
            check_seller2_flag(seller2)?;
            validate_match(buyer, seller2, Some(exchanger_auth))?;
            (to, message_amount(Role::Buyer, &buyer.amount)?)
        }
        Operation::NftDoesNotAuthorizeExchanges { buyer, seller1, to } => {
            let to = check_address("to", to)?;
            validate_match(buyer, seller1, None)?;
            (to, message_amount(Role::Buyer, &buyer.amount)?)
        }
        Operation::AdditionalPledgeAmount { value } | Operation::RevokesPledgeAmount { value } => {
            (sender, *value)
        }
        Operation::Close
        | Operation::UnforzenAccount
        | Operation::RecoverCoefficient
        | Operation::AccountDelegate { .. } => (sender, U256::ZERO),
    };
    Ok(routed)
}

fn check_block(block: &NftBlock) -> Result<(), ClientError> {
    check_address("creator", &block.creator)?;
    Ok(())
}

fn check_seller2_flag(seller2: &Seller2Message) -> Result<(), ClientError> {
    check_flag(&seller2.exclusive_flag)?;
    Ok(())
}
