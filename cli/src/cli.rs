//! # CLI Interface
//!
//! Command-line structure for `wormholes`, via `clap` derive.
//!
//! Role messages are passed between parties as JSON. Every argument that
//! takes one accepts either the JSON itself or `@path` to read it from a
//! file.

use clap::{Args, Parser, Subcommand};

use wormholes_client::config::DEFAULT_RPC_URL;
use wormholes_client::network::BlockTag;

use crate::logging::LogFormat;

/// Wormholes chain client.
///
/// Signs trade role messages offline and submits NFT, staking and
/// exchange operations to a Wormholes node.
#[derive(Parser, Debug)]
#[command(name = "wormholes", version, propagate_version = true)]
pub struct WormholesCli {
    /// JSON-RPC endpoint of the node.
    #[arg(long, global = true, env = "WORM_RPC_URL", default_value = DEFAULT_RPC_URL)]
    pub rpc_url: String,

    /// Per-request timeout in seconds.
    #[arg(long, global = true, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Log output format (logs go to stderr).
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a fresh private key and print it with its address.
    Keygen,
    /// Sign a role message offline and print it as JSON.
    Sign(SignArgs),
    /// Print the address that signed a role message.
    Recover {
        #[arg(value_enum)]
        role: MessageRole,
        /// The message JSON, or @path.
        message: String,
    },
    /// Check that a buyer and a seller message can be matched.
    Check {
        /// Buyer message JSON, or @path.
        buyer: String,
        /// Seller1 or Seller2 message JSON, or @path.
        seller: String,
        /// Exchange grant JSON, or @path.
        #[arg(long)]
        exchanger_auth: Option<String>,
    },
    /// Sign and broadcast an operation. Prints the transaction hash.
    Submit(SubmitArgs),
    /// Query the node.
    #[command(subcommand)]
    Query(QueryCommand),
}

/// The private key, shared by every command that signs.
#[derive(Args, Debug)]
pub struct KeyArgs {
    /// Hex private key, with or without 0x.
    #[arg(long, env = "WORM_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: String,
}

#[derive(Args, Debug)]
pub struct SignArgs {
    #[command(flatten)]
    pub key: KeyArgs,

    #[command(subcommand)]
    pub role: SignCommand,
}

#[derive(Subcommand, Debug)]
pub enum SignCommand {
    /// Offer to buy.
    Buyer {
        #[arg(long)]
        amount: String,
        /// Empty to accept a lazily minted NFT.
        #[arg(long, default_value = "")]
        nft_address: String,
        #[arg(long)]
        exchanger: String,
        #[arg(long)]
        block_number: String,
        /// Restrict to one seller.
        #[arg(long, default_value = "")]
        seller: String,
    },
    /// Offer to sell a minted NFT.
    Seller1 {
        #[arg(long)]
        amount: String,
        #[arg(long)]
        nft_address: String,
        #[arg(long)]
        exchanger: String,
        #[arg(long)]
        block_number: String,
    },
    /// Offer to mint on sale.
    Seller2 {
        #[arg(long)]
        amount: String,
        #[arg(long)]
        royalty: String,
        #[arg(long)]
        meta_url: String,
        /// "1" for exclusive to `exchanger`, "0" otherwise.
        #[arg(long)]
        exclusive_flag: String,
        #[arg(long)]
        exchanger: String,
        #[arg(long)]
        block_number: String,
    },
    /// Let another account match trades for your exchange.
    ExchangerAuth {
        #[arg(long)]
        exchanger_owner: String,
        #[arg(long)]
        to: String,
        #[arg(long)]
        block_number: String,
    },
    /// Prove a proxy binding for staking. Prints the signature hex.
    Delegate {
        #[arg(long)]
        address: String,
        #[arg(long)]
        pledge_account: String,
    },
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    Buyer,
    Seller1,
    Seller2,
    ExchangerAuth,
}

#[derive(Args, Debug)]
pub struct SubmitArgs {
    #[command(flatten)]
    pub key: KeyArgs,

    /// Fixed gas price in wei instead of eth_gasPrice.
    #[arg(long, env = "WORM_GAS_PRICE")]
    pub gas_price: Option<u128>,

    /// Fixed chain id instead of eth_chainId.
    #[arg(long, env = "WORM_CHAIN_ID")]
    pub chain_id: Option<u64>,

    #[command(subcommand)]
    pub operation: OperationCommand,
}

/// NFT block parameters for the official-NFT votes.
#[derive(Args, Debug, Clone)]
pub struct NftBlockArgs {
    #[arg(long)]
    pub dir: String,
    #[arg(long)]
    pub start_index: String,
    #[arg(long)]
    pub number: u64,
    #[arg(long)]
    pub royalty: u32,
    #[arg(long)]
    pub creator: String,
}

#[derive(Subcommand, Debug)]
pub enum OperationCommand {
    /// Plain value transfer, no payload marker.
    Send {
        to: String,
        /// Whole ERB.
        value: u64,
        #[arg(long, default_value = "")]
        data: String,
    },
    Mint {
        #[arg(long)]
        royalty: u32,
        #[arg(long)]
        meta_url: String,
        #[arg(long, default_value = "")]
        exchanger: String,
    },
    Transfer {
        nft_address: String,
        to: String,
    },
    Author {
        nft_address: String,
        to: String,
    },
    AuthorRevoke {
        nft_address: String,
        to: String,
    },
    AccountAuthor {
        to: String,
    },
    AccountAuthorRevoke {
        to: String,
    },
    SnftToErb {
        nft_address: String,
    },
    TokenPledge {
        #[arg(long, default_value = "")]
        proxy_address: String,
        #[arg(long, default_value = "")]
        proxy_sign: String,
    },
    TokenRevokesPledge,
    /// Add stake, in wei (decimal or 0x hex).
    AdditionalPledgeAmount {
        value: String,
    },
    /// Withdraw stake, in wei (decimal or 0x hex).
    RevokesPledgeAmount {
        value: String,
    },
    AccountDelegate {
        #[arg(long)]
        proxy_address: String,
        #[arg(long)]
        proxy_sign: String,
    },
    UnforzenAccount,
    RecoverCoefficient,
    Open {
        #[arg(long)]
        fee_rate: u32,
        #[arg(long)]
        name: String,
        #[arg(long)]
        url: String,
    },
    Close,
    VoteOfficialNft(NftBlockArgs),
    VoteOfficialNftByApprovedExchanger {
        #[command(flatten)]
        block: NftBlockArgs,
        #[arg(long)]
        exchanger_auth: String,
    },
    TransactionNft {
        #[arg(long)]
        buyer: String,
        #[arg(long)]
        seller1: String,
        #[arg(long)]
        to: String,
    },
    BuyerInitiatingTransaction {
        #[arg(long)]
        seller1: String,
    },
    FoundryTradeBuyer {
        #[arg(long)]
        seller2: String,
    },
    FoundryExchange {
        #[arg(long)]
        buyer: String,
        #[arg(long)]
        seller2: String,
        #[arg(long)]
        to: String,
    },
    NftExchangeMatch {
        #[arg(long)]
        buyer: String,
        #[arg(long)]
        seller1: String,
        #[arg(long)]
        exchanger_auth: String,
        #[arg(long)]
        to: String,
    },
    FoundryExchangeInitiated {
        #[arg(long)]
        buyer: String,
        #[arg(long)]
        seller2: String,
        #[arg(long)]
        exchanger_auth: String,
        #[arg(long)]
        to: String,
    },
    NftDoesNotAuthorizeExchanges {
        #[arg(long)]
        buyer: String,
        #[arg(long)]
        seller1: String,
        #[arg(long)]
        to: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum QueryCommand {
    ChainId,
    BlockNumber,
    Balance {
        address: String,
        #[arg(long, value_parser = parse_block_tag, default_value = "pending")]
        block: BlockTag,
    },
    Receipt {
        hash: String,
    },
    Block {
        #[arg(value_parser = parse_block_tag, default_value = "latest")]
        block: BlockTag,
    },
    Account {
        address: String,
        #[arg(long, value_parser = parse_block_tag, default_value = "latest")]
        block: BlockTag,
    },
    Validators {
        #[arg(long, value_parser = parse_block_tag, default_value = "latest")]
        block: BlockTag,
    },
    Beneficiaries {
        #[arg(value_parser = parse_block_tag)]
        block: BlockTag,
    },
    MinerProxy {
        number: u64,
        address: String,
    },
}

/// `latest`, `pending`, `earliest`, a decimal height or a `0x` height.
pub fn parse_block_tag(s: &str) -> Result<BlockTag, String> {
    match s {
        "latest" => Ok(BlockTag::Latest),
        "pending" => Ok(BlockTag::Pending),
        "earliest" => Ok(BlockTag::Earliest),
        _ => {
            let n = match s.strip_prefix("0x") {
                Some(hex) => u64::from_str_radix(hex, 16),
                None => s.parse(),
            };
            n.map(BlockTag::Number)
                .map_err(|e| format!("invalid block {s:?}: {e}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_structure() {
        WormholesCli::command().debug_assert();
    }

    #[test]
    fn parses_block_tags() {
        assert_eq!(parse_block_tag("latest"), Ok(BlockTag::Latest));
        assert_eq!(parse_block_tag("1159"), Ok(BlockTag::Number(1159)));
        assert_eq!(parse_block_tag("0x487"), Ok(BlockTag::Number(1159)));
        assert!(parse_block_tag("tomorrow").is_err());
    }

    #[test]
    fn parses_submit_with_env_free_flags() {
        let cli = WormholesCli::try_parse_from([
            "wormholes",
            "submit",
            "--private-key",
            "0x01",
            "--chain-id",
            "51888",
            "close",
        ])
        .unwrap();
        match cli.command {
            Commands::Submit(args) => {
                assert_eq!(args.chain_id, Some(51888));
                assert!(matches!(args.operation, OperationCommand::Close));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
