//! Response types for node queries.
//!
//! Two JSON conventions meet here. Standard `eth_` results use camelCase
//! keys and hex-string quantities; the Wormholes-specific methods return Go
//! structs marshaled as-is, with PascalCase keys and big integers as bare
//! JSON numbers. [`de_quantity`] accepts every spelling a node has been seen
//! to produce.

use std::fmt;

use alloy_primitives::{Address, Bytes, B256, U256};
use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// Quantities
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(untagged)]
enum RawQuantity {
    Int(u64),
    Float(f64),
    Str(String),
}

/// Parse a `0x` hex or decimal quantity string.
pub fn parse_quantity(s: &str) -> Result<U256, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some("") => return Err(format!("empty hex quantity {s:?}")),
        Some(digits) => U256::from_str_radix(digits, 16),
        None => U256::from_str_radix(s, 10),
    };
    parsed.map_err(|e| format!("invalid quantity {s:?}: {e}"))
}

/// 2^128: the first float an `as u128` cast would saturate.
const FLOAT_QUANTITY_LIMIT: f64 = 340_282_366_920_938_463_463_374_607_431_768_211_456.0;

fn raw_to_u256(raw: RawQuantity) -> Result<U256, String> {
    match raw {
        RawQuantity::Int(n) => Ok(U256::from(n)),
        // Go marshals *big.Int as a bare number; past 2^64 serde_json can
        // only hand us an f64, exact up to 2^53.
        RawQuantity::Float(f)
            if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f < FLOAT_QUANTITY_LIMIT =>
        {
            Ok(U256::from(f as u128))
        }
        RawQuantity::Float(f) => Err(format!("invalid quantity {f}")),
        RawQuantity::Str(s) => parse_quantity(&s),
    }
}

/// Deserialize an optional big integer from a number, hex or decimal string.
pub fn de_quantity<'de, D>(deserializer: D) -> Result<Option<U256>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<RawQuantity>::deserialize(deserializer)?
        .map(raw_to_u256)
        .transpose()
        .map_err(serde::de::Error::custom)
}

fn de_quantity_list<'de, D>(deserializer: D) -> Result<Vec<U256>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Vec<RawQuantity>>::deserialize(deserializer)?
        .unwrap_or_default()
        .into_iter()
        .map(raw_to_u256)
        .collect::<Result<_, _>>()
        .map_err(serde::de::Error::custom)
}

fn de_u64_quantity<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    match de_quantity(deserializer)? {
        None => Ok(None),
        Some(v) => u64::try_from(v)
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("quantity {v} exceeds u64"))),
    }
}

// ---------------------------------------------------------------------------
// BlockTag
// ---------------------------------------------------------------------------

/// Which state to query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockTag {
    #[default]
    Latest,
    Pending,
    Earliest,
    Number(u64),
}

impl BlockTag {
    /// The JSON-RPC parameter form.
    pub fn to_param(self) -> String {
        match self {
            Self::Latest => "latest".to_string(),
            Self::Pending => "pending".to_string(),
            Self::Earliest => "earliest".to_string(),
            Self::Number(n) => format!("0x{n:x}"),
        }
    }
}

impl fmt::Display for BlockTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_param())
    }
}

impl From<u64> for BlockTag {
    fn from(n: u64) -> Self {
        Self::Number(n)
    }
}

// ---------------------------------------------------------------------------
// Standard eth_ results
// ---------------------------------------------------------------------------

/// Result of `eth_getTransactionReceipt`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub transaction_hash: B256,
    #[serde(default)]
    pub block_hash: Option<B256>,
    #[serde(default, deserialize_with = "de_u64_quantity")]
    pub block_number: Option<u64>,
    #[serde(default)]
    pub from: Option<Address>,
    #[serde(default)]
    pub to: Option<Address>,
    #[serde(default, deserialize_with = "de_u64_quantity")]
    pub gas_used: Option<u64>,
    #[serde(default, deserialize_with = "de_u64_quantity")]
    pub cumulative_gas_used: Option<u64>,
    #[serde(default, deserialize_with = "de_u64_quantity")]
    pub status: Option<u64>,
    #[serde(default)]
    pub logs: Vec<serde_json::Value>,
}

impl TransactionReceipt {
    /// True when the node reports successful execution.
    pub fn succeeded(&self) -> bool {
        self.status == Some(1)
    }
}

/// Header fields shared by blocks and uncles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockHeader {
    #[serde(default, deserialize_with = "de_u64_quantity")]
    pub number: Option<u64>,
    #[serde(default)]
    pub hash: Option<B256>,
    pub parent_hash: B256,
    #[serde(default)]
    pub sha3_uncles: Option<B256>,
    #[serde(default)]
    pub miner: Option<Address>,
    #[serde(default, deserialize_with = "de_u64_quantity")]
    pub timestamp: Option<u64>,
    #[serde(default, deserialize_with = "de_u64_quantity")]
    pub gas_limit: Option<u64>,
    #[serde(default, deserialize_with = "de_u64_quantity")]
    pub gas_used: Option<u64>,
}

/// A transaction as embedded in a full block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockTransaction {
    pub hash: B256,
    #[serde(default)]
    pub from: Option<Address>,
    #[serde(default)]
    pub to: Option<Address>,
    #[serde(default, deserialize_with = "de_quantity")]
    pub value: Option<U256>,
    #[serde(default, deserialize_with = "de_u64_quantity")]
    pub nonce: Option<u64>,
    #[serde(default)]
    pub input: Bytes,
}

/// Result of `eth_getBlockByNumber` with full transactions, plus the uncle
/// headers fetched separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    #[serde(flatten)]
    pub header: BlockHeader,
    #[serde(default)]
    pub transactions: Vec<BlockTransaction>,
    #[serde(default)]
    pub uncles: Vec<B256>,
    /// Filled by the client from `eth_getUncleByBlockHashAndIndex`.
    #[serde(skip)]
    pub uncle_headers: Vec<BlockHeader>,
}

// ---------------------------------------------------------------------------
// Wormholes-specific results
// ---------------------------------------------------------------------------

/// Result of `eth_getAccountInfo`: balance, staking and NFT state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Account {
    pub nonce: u64,
    #[serde(deserialize_with = "de_quantity")]
    pub balance: Option<U256>,
    #[serde(deserialize_with = "de_quantity")]
    pub pledged_balance: Option<U256>,
    #[serde(deserialize_with = "de_quantity")]
    pub pledged_block_number: Option<U256>,
    pub exchanger_flag: bool,
    #[serde(deserialize_with = "de_quantity")]
    pub block_number: Option<U256>,
    #[serde(deserialize_with = "de_quantity")]
    pub exchanger_balance: Option<U256>,
    #[serde(deserialize_with = "de_quantity")]
    pub vote_block_number: Option<U256>,
    #[serde(deserialize_with = "de_quantity")]
    pub vote_weight: Option<U256>,
    pub coefficient: u8,
    pub fee_rate: u16,
    pub exchanger_name: String,
    #[serde(rename = "ExchangerURL")]
    pub exchanger_url: String,
    pub approve_address_list: Option<Vec<Address>>,
    pub name: String,
    pub symbol: String,
    pub owner: Option<Address>,
    #[serde(rename = "NFTApproveAddressList")]
    pub nft_approve_address_list: Option<Address>,
    pub merge_level: u8,
    pub merge_number: u32,
    pub creator: Option<Address>,
    pub royalty: u16,
    pub exchanger: Option<Address>,
    #[serde(rename = "MetaURL")]
    pub meta_url: String,
}

/// One entry of `eth_getValidator`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Validator {
    pub addr: Address,
    #[serde(default, deserialize_with = "de_quantity")]
    pub balance: Option<U256>,
    #[serde(default)]
    pub proxy: Option<Address>,
    #[serde(default, deserialize_with = "de_quantity_list")]
    pub weight: Vec<U256>,
}

/// Result of `eth_getValidator`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ValidatorList {
    #[serde(default)]
    pub validators: Vec<Validator>,
}

impl ValidatorList {
    /// Sum of all validator balances.
    pub fn total_stake(&self) -> U256 {
        self.validators
            .iter()
            .filter_map(|v| v.balance)
            .fold(U256::ZERO, |acc, b| acc.saturating_add(b))
    }
}

/// One entry of `eth_getBlockBeneficiaryAddressByNumber`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BeneficiaryAddress {
    pub address: Address,
    pub nft_address: Address,
}

/// One entry of `eth_queryMinerProxy`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MinerProxy {
    pub address: Address,
    pub proxy: Address,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_quantity_spellings() {
        assert_eq!(parse_quantity("0x10").unwrap(), U256::from(16));
        assert_eq!(parse_quantity("16").unwrap(), U256::from(16));
        assert!(parse_quantity("0x").is_err());
        assert!(parse_quantity("ten").is_err());
    }

    #[test]
    fn test_float_quantities_must_be_whole_and_in_range() {
        let big = 70_000_000_000_000_000_000_000.0;
        assert_eq!(raw_to_u256(RawQuantity::Float(big)), Ok(U256::from(big as u128)));
        for bad in [1.5, -1.0, f64::NAN, FLOAT_QUANTITY_LIMIT, 1e40] {
            assert!(raw_to_u256(RawQuantity::Float(bad)).is_err(), "{bad} accepted");
        }
    }

    #[test]
    fn test_block_tag_params() {
        assert_eq!(BlockTag::Latest.to_param(), "latest");
        assert_eq!(BlockTag::Pending.to_param(), "pending");
        assert_eq!(BlockTag::Number(1159).to_param(), "0x487");
    }

    #[test]
    fn test_receipt_decoding() {
        let receipt: TransactionReceipt = serde_json::from_value(json!({
            "transactionHash": format!("0x{}", "ab".repeat(32)),
            "blockHash": format!("0x{}", "cd".repeat(32)),
            "blockNumber": "0x487",
            "gasUsed": "0xc350",
            "status": "0x1",
            "logs": [],
        }))
        .unwrap();
        assert_eq!(receipt.block_number, Some(1159));
        assert_eq!(receipt.gas_used, Some(50_000));
        assert!(receipt.succeeded());
    }

    #[test]
    fn test_account_go_encoding() {
        let account: Account = serde_json::from_value(json!({
            "Nonce": 3,
            "Balance": 1000000000000000000u64,
            "PledgedBalance": null,
            "ExchangerFlag": true,
            "FeeRate": 100,
            "ExchangerName": "wormholes exchange",
            "ExchangerURL": "https://www.wormholes.com",
            "ApproveAddressList": ["0x44d952db5dfb4cbb54443554f4bb9cbebee2194c"],
            "Owner": "0x0000000000000000000000000000000000000000",
            "MetaURL": "",
            "Root": "AAAA",
        }))
        .unwrap();
        assert_eq!(account.nonce, 3);
        assert_eq!(account.balance, Some(U256::from(10u64.pow(18))));
        assert!(account.pledged_balance.is_none());
        assert!(account.exchanger_flag);
        assert_eq!(account.exchanger_url, "https://www.wormholes.com");
        assert_eq!(account.approve_address_list.map(|l| l.len()), Some(1));
    }

    #[test]
    fn test_validator_list() {
        let list: ValidatorList = serde_json::from_value(json!({
            "Validators": [
                {
                    "Addr": "0x091dbbf8a2a5fa2d9a0e4b3c8ca0d2d0a51b9d61",
                    "Balance": 70000000000000000000000.0,
                    "Proxy": "0x0000000000000000000000000000000000000000",
                    "Weight": [70, 50]
                },
                {
                    "Addr": "0x107837ea83f8f06533ddd3fc39451cd0aa8da8bd",
                    "Balance": "0x1",
                    "Proxy": "0x0000000000000000000000000000000000000000",
                    "Weight": null
                }
            ]
        }))
        .unwrap();
        assert_eq!(list.validators.len(), 2);
        assert_eq!(list.validators[0].weight, vec![U256::from(70), U256::from(50)]);
        assert!(list.validators[1].weight.is_empty());
        assert!(list.total_stake() > U256::from(10u64.pow(18)));
    }

    #[test]
    fn test_block_with_uncles() {
        let block: Block = serde_json::from_value(json!({
            "number": "0x10",
            "hash": format!("0x{}", "11".repeat(32)),
            "parentHash": format!("0x{}", "22".repeat(32)),
            "timestamp": "0x6400",
            "transactions": [],
            "uncles": [format!("0x{}", "33".repeat(32))],
        }))
        .unwrap();
        assert_eq!(block.header.number, Some(16));
        assert_eq!(block.uncles.len(), 1);
        assert!(block.uncle_headers.is_empty());
    }
}
