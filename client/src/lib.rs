// Copyright (c) 2026 Wormholes Client Contributors. MIT License.
// See LICENSE for details.

//! # Wormholes Client Core Library
//!
//! A client for the Wormholes chain, an EVM-derived network whose NFT,
//! staking and exchange actions ride in the `data` field of ordinary
//! transactions.
//!
//! Two jobs live here. Trade parties sign **role messages** offline (a
//! buyer's offer, a seller's offer, an exchange's delegation) and pass them
//! to each other however they like. Whoever settles the trade embeds those
//! messages in an **operation**, which this crate validates, encodes, signs
//! as an EIP-155 transaction and broadcasts.
//!
//! ## Architecture
//!
//! - **crypto**: secp256k1 keys, keccak hashing, recoverable signatures.
//! - **trade**: role messages, the wallet that signs them, cross-checks.
//! - **validation**: shape checks on addresses, hex fields and flags.
//! - **transaction**: operations, payload encoding, signing, assembly.
//! - **network**: the `NodeRpc` boundary, HTTP and mock transports.
//! - **client**: `WormholesClient`, one method per operation.
//! - **config**: protocol constants, gas table, client settings.
//!
//! ## Quick Look
//!
//! ```no_run
//! # async fn run() -> Result<(), wormholes_client::ClientError> {
//! use wormholes_client::{ClientConfig, Wallet, WormholesClient};
//!
//! let nft = "0x0000000000000000000000000000000000000002";
//! let buyer = Wallet::from_hex("0x...")?;
//! let offer = buyer.sign_buyer("0xde0b6b3a7640000", nft, "0x...", "0x487", "")?;
//!
//! let seller = WormholesClient::connect(ClientConfig::new("http://127.0.0.1:8545"), "0x...")?;
//! let ask = seller.wallet().sign_seller1("0xde0b6b3a7640000", nft, "0x...", "0x487")?;
//! let hash = seller.transaction_nft(&offer, &ask, &buyer.address().to_string()).await?;
//! println!("{hash}");
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod crypto;
pub mod error;
pub mod network;
pub mod trade;
pub mod transaction;
pub mod validation;

pub use client::WormholesClient;
pub use config::ClientConfig;
pub use crypto::{MessageSignature, WormKeypair};
pub use error::{ClientError, ErrorCategory};
pub use network::{HttpTransport, MockTransport, NodeRpc, TransportError};
pub use trade::{
    validate_match, BuyerMessage, ExchangerAuthMessage, RoleMessage, Seller1Message,
    Seller2Message, TradeError, Wallet,
};
pub use transaction::{NftBlock, Operation, OperationKind};
