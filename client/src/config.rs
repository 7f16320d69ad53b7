//! # Protocol Configuration & Constants
//!
//! Every magic number the client sends to a Wormholes node lives here. The
//! gas limits, staking values, and payload marker are part of the wire
//! contract with the chain: the node expects exactly these, so changing
//! one is a protocol change, not a tuning knob.
//!
//! [`ClientConfig`] holds the few things that *are* per-deployment: where
//! the node is, how long to wait for it, and optional overrides for the
//! gas price and chain id lookups.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::transaction::types::OperationKind;

// ---------------------------------------------------------------------------
// Wire Format
// ---------------------------------------------------------------------------

/// Version string embedded in every operation record.
pub const PROTOCOL_VERSION: &str = "v0.0.1";

/// ASCII marker that prefixes the JSON operation record in the transaction
/// data field. Plain value transfers carry no marker.
pub const PAYLOAD_MARKER: &str = "wormholes:";

/// Prefix of the domain-separated personal-message hash.
pub const SIGNED_MESSAGE_PREFIX: &str = "\x19Ethereum Signed Message:\n";

/// Offset added to the raw 0/1 recovery id so signatures match what
/// legacy wallets produce.
pub const RECOVERY_ID_OFFSET: u8 = 27;

/// Recoverable signature length: r (32) ∥ s (32) ∥ v (1).
pub const SIGNATURE_LENGTH: usize = 65;

/// Length of a `0x`-prefixed hex address string.
pub const ADDRESS_STRING_LENGTH: usize = 42;

// ---------------------------------------------------------------------------
// Value Constants
// ---------------------------------------------------------------------------

/// 1 ERB in wei.
pub const WEI_PER_ERB: u128 = 1_000_000_000_000_000_000;

/// Amount locked by a token pledge (and released by its revocation), in ERB.
pub const TOKEN_PLEDGE_ERB: u128 = 100_000;

/// Amount staked when opening an exchange, in ERB.
pub const EXCHANGE_OPEN_ERB: u128 = 100;

// ---------------------------------------------------------------------------
// Gas Limits
// ---------------------------------------------------------------------------

/// Gas limit for a plain value transfer.
pub const NORMAL_TRANSFER_GAS: u64 = 51_000;

/// Fixed gas limit for each operation kind.
///
/// The chain charges a flat amount per operation, so these are not
/// estimates: a lower value makes the node reject the transaction.
pub fn gas_limit(kind: OperationKind) -> u64 {
    match kind {
        OperationKind::Mint => 60_000,
        OperationKind::Transfer
        | OperationKind::Author
        | OperationKind::AuthorRevoke
        | OperationKind::AccountAuthor
        | OperationKind::AccountAuthorRevoke
        | OperationKind::SnftToErb
        | OperationKind::TokenRevokesPledge
        | OperationKind::UnforzenAccount => 50_000,
        OperationKind::TokenPledge | OperationKind::AccountDelegate => 70_000,
        OperationKind::Open
        | OperationKind::Close
        | OperationKind::VoteOfficialNft
        | OperationKind::VoteOfficialNftByApprovedExchanger
        | OperationKind::RecoverCoefficient => 60_000,
        OperationKind::InsertNftBlock => 51_000,
        OperationKind::TransactionNft | OperationKind::BuyerInitiatingTransaction => 100_000,
        OperationKind::FoundryTradeBuyer => 101_000,
        OperationKind::FoundryExchange | OperationKind::NftExchangeMatch => 140_000,
        OperationKind::FoundryExchangeInitiated => 170_000,
        OperationKind::NftDoesNotAuthorizeExchanges => 130_000,
        OperationKind::AdditionalPledgeAmount | OperationKind::RevokesPledgeAmount => 55_000,
    }
}

// ---------------------------------------------------------------------------
// Client Configuration
// ---------------------------------------------------------------------------

/// Default JSON-RPC endpoint of a local node.
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Deployment settings for a [`crate::client::WormholesClient`].
///
/// The library never retries: `request_timeout` bounds each individual
/// RPC call, and a timed-out call fails the whole operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// JSON-RPC endpoint of the node.
    pub rpc_url: String,

    /// Per-request timeout, in seconds.
    pub request_timeout_secs: u64,

    /// Fixed gas price in wei. When set, `eth_gasPrice` is not queried.
    pub gas_price: Option<u128>,

    /// Fixed chain id. When set, `eth_chainId` is not queried.
    pub chain_id: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT.as_secs(),
            gas_price: None,
            chain_id: None,
        }
    }
}

impl ClientConfig {
    /// Configuration for the given endpoint with everything else defaulted.
    pub fn new(rpc_url: impl Into<String>) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            ..Self::default()
        }
    }

    /// Pin the gas price instead of asking the node.
    pub fn with_gas_price(mut self, gas_price: u128) -> Self {
        self.gas_price = Some(gas_price);
        self
    }

    /// Pin the chain id instead of asking the node.
    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    /// The per-request timeout as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_is_ascii() {
        assert!(PAYLOAD_MARKER.is_ascii());
        assert!(PAYLOAD_MARKER.ends_with(':'));
    }

    #[test]
    fn test_trade_gas_exceeds_admin_gas() {
        // Matching trades carry nested signed messages and execute more
        // checks on-chain than a single-party administrative operation.
        assert!(gas_limit(OperationKind::TransactionNft) > gas_limit(OperationKind::Transfer));
        assert!(
            gas_limit(OperationKind::FoundryExchangeInitiated)
                > gas_limit(OperationKind::FoundryExchange)
        );
    }

    #[test]
    fn test_wei_per_erb() {
        assert_eq!(WEI_PER_ERB, 10u128.pow(18));
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.rpc_url, DEFAULT_RPC_URL);
        assert_eq!(config.request_timeout(), DEFAULT_REQUEST_TIMEOUT);
        assert!(config.gas_price.is_none());
        assert!(config.chain_id.is_none());
    }

    #[test]
    fn test_config_overrides() {
        let config = ClientConfig::new("http://node:8574")
            .with_gas_price(1_000_000_000)
            .with_chain_id(51888);
        assert_eq!(config.rpc_url, "http://node:8574");
        assert_eq!(config.gas_price, Some(1_000_000_000));
        assert_eq!(config.chain_id, Some(51888));
    }

    #[test]
    fn test_config_deserializes_with_missing_fields() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"rpc_url":"http://10.0.0.1:8545"}"#).unwrap();
        assert_eq!(config.rpc_url, "http://10.0.0.1:8545");
        assert_eq!(config.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT.as_secs());
    }
}
