//! Core type definitions for Wormholes operations.
//!
//! An [`Operation`] is one of the domain actions the chain understands:
//! NFT minting and transfer, authorization, staking, exchange lifecycle and
//! the trade matches. Each variant carries exactly the parameters that
//! action needs. How a variant turns into a transaction (recipient, value,
//! gas, payload) is decided in [`super::builder`].

use std::fmt;

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use crate::trade::messages::{BuyerMessage, ExchangerAuthMessage, Seller1Message, Seller2Message};

// ---------------------------------------------------------------------------
// OperationKind
// ---------------------------------------------------------------------------

/// Discriminant of an [`Operation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    Mint,
    Transfer,
    Author,
    AuthorRevoke,
    AccountAuthor,
    AccountAuthorRevoke,
    SnftToErb,
    TokenPledge,
    TokenRevokesPledge,
    Open,
    Close,
    TransactionNft,
    BuyerInitiatingTransaction,
    FoundryTradeBuyer,
    FoundryExchange,
    NftExchangeMatch,
    FoundryExchangeInitiated,
    NftDoesNotAuthorizeExchanges,
    AdditionalPledgeAmount,
    RevokesPledgeAmount,
    /// Deprecated spelling of [`OperationKind::VoteOfficialNft`]. Same tag,
    /// lower gas limit.
    InsertNftBlock,
    VoteOfficialNft,
    VoteOfficialNftByApprovedExchanger,
    UnforzenAccount,
    RecoverCoefficient,
    AccountDelegate,
}

impl OperationKind {
    /// Every kind, in tag order.
    pub const ALL: [OperationKind; 26] = [
        Self::Mint,
        Self::Transfer,
        Self::Author,
        Self::AuthorRevoke,
        Self::AccountAuthor,
        Self::AccountAuthorRevoke,
        Self::SnftToErb,
        Self::TokenPledge,
        Self::TokenRevokesPledge,
        Self::Open,
        Self::Close,
        Self::TransactionNft,
        Self::BuyerInitiatingTransaction,
        Self::FoundryTradeBuyer,
        Self::FoundryExchange,
        Self::NftExchangeMatch,
        Self::FoundryExchangeInitiated,
        Self::NftDoesNotAuthorizeExchanges,
        Self::AdditionalPledgeAmount,
        Self::RevokesPledgeAmount,
        Self::InsertNftBlock,
        Self::VoteOfficialNft,
        Self::VoteOfficialNftByApprovedExchanger,
        Self::UnforzenAccount,
        Self::RecoverCoefficient,
        Self::AccountDelegate,
    ];

    /// The `type` tag written into the operation record.
    ///
    /// Tags 7, 8 and 13 are reserved by the chain (SNFT pledging and an
    /// unused slot) and 27..=30 are unassigned.
    pub fn tag(self) -> u8 {
        match self {
            Self::Mint => 0,
            Self::Transfer => 1,
            Self::Author => 2,
            Self::AuthorRevoke => 3,
            Self::AccountAuthor => 4,
            Self::AccountAuthorRevoke => 5,
            Self::SnftToErb => 6,
            Self::TokenPledge => 9,
            Self::TokenRevokesPledge => 10,
            Self::Open => 11,
            Self::Close => 12,
            Self::TransactionNft => 14,
            Self::BuyerInitiatingTransaction => 15,
            Self::FoundryTradeBuyer => 16,
            Self::FoundryExchange => 17,
            Self::NftExchangeMatch => 18,
            Self::FoundryExchangeInitiated => 19,
            Self::NftDoesNotAuthorizeExchanges => 20,
            Self::AdditionalPledgeAmount => 21,
            Self::RevokesPledgeAmount => 22,
            Self::InsertNftBlock | Self::VoteOfficialNft => 23,
            Self::VoteOfficialNftByApprovedExchanger => 24,
            Self::UnforzenAccount => 25,
            Self::RecoverCoefficient => 26,
            Self::AccountDelegate => 31,
        }
    }

    /// True for the operations that embed buyer/seller messages.
    pub fn is_trade(self) -> bool {
        matches!(
            self,
            Self::TransactionNft
                | Self::BuyerInitiatingTransaction
                | Self::FoundryTradeBuyer
                | Self::FoundryExchange
                | Self::NftExchangeMatch
                | Self::FoundryExchangeInitiated
                | Self::NftDoesNotAuthorizeExchanges
        )
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Mint => "Mint",
            Self::Transfer => "Transfer",
            Self::Author => "Author",
            Self::AuthorRevoke => "AuthorRevoke",
            Self::AccountAuthor => "AccountAuthor",
            Self::AccountAuthorRevoke => "AccountAuthorRevoke",
            Self::SnftToErb => "SNFTToERB",
            Self::TokenPledge => "TokenPledge",
            Self::TokenRevokesPledge => "TokenRevokesPledge",
            Self::Open => "Open",
            Self::Close => "Close",
            Self::TransactionNft => "TransactionNFT",
            Self::BuyerInitiatingTransaction => "BuyerInitiatingTransaction",
            Self::FoundryTradeBuyer => "FoundryTradeBuyer",
            Self::FoundryExchange => "FoundryExchange",
            Self::NftExchangeMatch => "NftExchangeMatch",
            Self::FoundryExchangeInitiated => "FoundryExchangeInitiated",
            Self::NftDoesNotAuthorizeExchanges => "NFTDoesNotAuthorizeExchanges",
            Self::AdditionalPledgeAmount => "AdditionalPledgeAmount",
            Self::RevokesPledgeAmount => "RevokesPledgeAmount",
            Self::InsertNftBlock => "InsertNFTBlock",
            Self::VoteOfficialNft => "VoteOfficialNFT",
            Self::VoteOfficialNftByApprovedExchanger => "VoteOfficialNFTByApprovedExchanger",
            Self::UnforzenAccount => "UnforzenAccount",
            Self::RecoverCoefficient => "RecoverCoefficient",
            Self::AccountDelegate => "AccountDelegate",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// NftBlock
// ---------------------------------------------------------------------------

/// A batch of official SNFTs proposed for injection by vote.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NftBlock {
    /// Metadata directory (IPFS path) for the batch.
    pub dir: String,
    /// First index inside `dir`, as the node expects it (hex string).
    pub start_index: String,
    /// Number of NFTs in the batch.
    pub number: u64,
    /// Creator royalty, in basis points.
    pub royalty: u32,
    /// Account credited as creator.
    pub creator: String,
}

// ---------------------------------------------------------------------------
// Operation
// ---------------------------------------------------------------------------

/// A Wormholes domain operation with its parameters.
///
/// Addresses stay strings until the builder validates them, so the error
/// can quote exactly what the caller passed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Mint an NFT owned by the sender. A non-empty `exchanger` gives that
    /// exchange exclusive rights to sell it.
    Mint {
        royalty: u32,
        meta_url: String,
        exchanger: String,
    },
    /// Give the NFT at `nft_address` to `to`.
    Transfer { nft_address: String, to: String },
    /// Let `to` operate a single NFT.
    Author { nft_address: String, to: String },
    AuthorRevoke { nft_address: String, to: String },
    /// Let `to` operate every NFT of the sender.
    AccountAuthor { to: String },
    AccountAuthorRevoke { to: String },
    /// Burn an SNFT fragment back into ERB.
    SnftToErb { nft_address: String },
    /// Stake the fixed validator pledge, optionally through a proxy.
    TokenPledge {
        proxy_address: String,
        proxy_sign: String,
    },
    TokenRevokesPledge,
    /// Open an exchange, staking the fixed opening amount.
    Open {
        fee_rate: u32,
        name: String,
        url: String,
    },
    Close,
    /// Deprecated form of [`Operation::VoteOfficialNft`].
    InsertNftBlock(NftBlock),
    VoteOfficialNft(NftBlock),
    VoteOfficialNftByApprovedExchanger {
        block: NftBlock,
        exchanger_auth: ExchangerAuthMessage,
    },
    /// Seller accepts a buyer's offer for a minted NFT; `to` is the buyer.
    /// The seller's own offer rides along so the pair can be checked.
    TransactionNft {
        buyer: BuyerMessage,
        seller1: Seller1Message,
        to: String,
    },
    /// Buyer accepts a seller's offer for a minted NFT.
    BuyerInitiatingTransaction { seller1: Seller1Message },
    /// Buyer accepts a lazy-mint offer.
    FoundryTradeBuyer { seller2: Seller2Message },
    /// Exchange matches a buyer with a lazy-mint offer.
    FoundryExchange {
        buyer: BuyerMessage,
        seller2: Seller2Message,
        to: String,
    },
    /// Delegated exchange matches a buyer with a minted-NFT offer.
    NftExchangeMatch {
        buyer: BuyerMessage,
        seller1: Seller1Message,
        exchanger_auth: ExchangerAuthMessage,
        to: String,
    },
    /// Delegated exchange matches a buyer with a lazy-mint offer.
    FoundryExchangeInitiated {
        buyer: BuyerMessage,
        seller2: Seller2Message,
        exchanger_auth: ExchangerAuthMessage,
        to: String,
    },
    /// Exchange matches a buyer with a minted-NFT offer it was not
    /// exclusively authorized for.
    NftDoesNotAuthorizeExchanges {
        buyer: BuyerMessage,
        seller1: Seller1Message,
        to: String,
    },
    /// Top up an existing stake by `value` wei.
    AdditionalPledgeAmount { value: U256 },
    /// Withdraw `value` wei of stake.
    RevokesPledgeAmount { value: U256 },
    UnforzenAccount,
    RecoverCoefficient,
    /// Delegate a staking account to a smaller proxy account.
    AccountDelegate {
        proxy_address: String,
        proxy_sign: String,
    },
}

impl Operation {
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Mint { .. } => OperationKind::Mint,
            Self::Transfer { .. } => OperationKind::Transfer,
            Self::Author { .. } => OperationKind::Author,
            Self::AuthorRevoke { .. } => OperationKind::AuthorRevoke,
            Self::AccountAuthor { .. } => OperationKind::AccountAuthor,
            Self::AccountAuthorRevoke { .. } => OperationKind::AccountAuthorRevoke,
            Self::SnftToErb { .. } => OperationKind::SnftToErb,
            Self::TokenPledge { .. } => OperationKind::TokenPledge,
            Self::TokenRevokesPledge => OperationKind::TokenRevokesPledge,
            Self::Open { .. } => OperationKind::Open,
            Self::Close => OperationKind::Close,
            Self::InsertNftBlock(_) => OperationKind::InsertNftBlock,
            Self::VoteOfficialNft(_) => OperationKind::VoteOfficialNft,
            Self::VoteOfficialNftByApprovedExchanger { .. } => {
                OperationKind::VoteOfficialNftByApprovedExchanger
            }
            Self::TransactionNft { .. } => OperationKind::TransactionNft,
            Self::BuyerInitiatingTransaction { .. } => OperationKind::BuyerInitiatingTransaction,
            Self::FoundryTradeBuyer { .. } => OperationKind::FoundryTradeBuyer,
            Self::FoundryExchange { .. } => OperationKind::FoundryExchange,
            Self::NftExchangeMatch { .. } => OperationKind::NftExchangeMatch,
            Self::FoundryExchangeInitiated { .. } => OperationKind::FoundryExchangeInitiated,
            Self::NftDoesNotAuthorizeExchanges { .. } => {
                OperationKind::NftDoesNotAuthorizeExchanges
            }
            Self::AdditionalPledgeAmount { .. } => OperationKind::AdditionalPledgeAmount,
            Self::RevokesPledgeAmount { .. } => OperationKind::RevokesPledgeAmount,
            Self::UnforzenAccount => OperationKind::UnforzenAccount,
            Self::RecoverCoefficient => OperationKind::RecoverCoefficient,
            Self::AccountDelegate { .. } => OperationKind::AccountDelegate,
        }
    }
}
