// Copyright (c) 2026 Wormholes Client Contributors. MIT License.
// See LICENSE for details.

//! # Wormholes CLI
//!
//! Entry point for the `wormholes` binary. Parses arguments, initializes
//! logging, and dispatches to the library:
//!
//! - `keygen`:  generate a key
//! - `sign`:    sign a role message offline
//! - `recover`: show who signed a role message
//! - `check`:   cross-validate buyer and seller messages
//! - `submit`:  sign and broadcast an operation
//! - `query`:   read chain state

mod cli;
mod logging;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;

use wormholes_client::network::types::parse_quantity;
use wormholes_client::network::{HttpTransport, NodeRpc};
use wormholes_client::trade::messages::RoleMessage;
use wormholes_client::validation::{check_address, check_hash};
use wormholes_client::{
    validate_match, BuyerMessage, ClientConfig, ExchangerAuthMessage, NftBlock, Seller1Message,
    Seller2Message, Wallet, WormKeypair, WormholesClient,
};

use cli::{
    Commands, MessageRole, NftBlockArgs, OperationCommand, QueryCommand, SignCommand, SubmitArgs,
    WormholesCli,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = WormholesCli::parse();
    logging::init_logging(logging::DEFAULT_FILTER, cli.log_format);

    let config = ClientConfig {
        rpc_url: cli.rpc_url,
        request_timeout_secs: cli.timeout_secs,
        ..ClientConfig::default()
    };

    match cli.command {
        Commands::Keygen => keygen(),
        Commands::Sign(args) => {
            let wallet = Wallet::from_hex(&args.key.private_key).context("invalid private key")?;
            sign(&wallet, args.role)
        }
        Commands::Recover { role, message } => recover(role, &message),
        Commands::Check {
            buyer,
            seller,
            exchanger_auth,
        } => check(&buyer, &seller, exchanger_auth.as_deref()),
        Commands::Submit(args) => submit(config, args).await,
        Commands::Query(query) => run_query(&config, query).await,
    }
}

fn keygen() -> Result<()> {
    let keypair = WormKeypair::generate();
    println!("private key : 0x{}", keypair.to_hex());
    println!("address     : {}", keypair.address());
    Ok(())
}

/// Read a role-message argument: inline JSON, or `@path`.
fn load(arg: &str) -> Result<Vec<u8>> {
    match arg.strip_prefix('@') {
        Some(path) => std::fs::read(path).with_context(|| format!("failed to read {path}")),
        None => Ok(arg.as_bytes().to_vec()),
    }
}

fn parse_message<M: RoleMessage>(arg: &str) -> Result<M> {
    Ok(M::from_json(&load(arg)?)?)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_message<M: RoleMessage>(message: &M) -> Result<()> {
    let bytes = message.to_json()?;
    println!("{}", String::from_utf8_lossy(&bytes));
    Ok(())
}

// ---------------------------------------------------------------------------
// Offline commands
// ---------------------------------------------------------------------------

fn sign(wallet: &Wallet, role: SignCommand) -> Result<()> {
    match role {
        SignCommand::Buyer {
            amount,
            nft_address,
            exchanger,
            block_number,
            seller,
        } => print_message(&wallet.sign_buyer(
            &amount,
            &nft_address,
            &exchanger,
            &block_number,
            &seller,
        )?),
        SignCommand::Seller1 {
            amount,
            nft_address,
            exchanger,
            block_number,
        } => print_message(&wallet.sign_seller1(&amount, &nft_address, &exchanger, &block_number)?),
        SignCommand::Seller2 {
            amount,
            royalty,
            meta_url,
            exclusive_flag,
            exchanger,
            block_number,
        } => print_message(&wallet.sign_seller2(
            &amount,
            &royalty,
            &meta_url,
            &exclusive_flag,
            &exchanger,
            &block_number,
        )?),
        SignCommand::ExchangerAuth {
            exchanger_owner,
            to,
            block_number,
        } => print_message(&wallet.sign_exchanger_auth(&exchanger_owner, &to, &block_number)?),
        SignCommand::Delegate {
            address,
            pledge_account,
        } => {
            println!("{}", wallet.sign_delegate(&address, &pledge_account)?);
            Ok(())
        }
    }
}

fn recover(role: MessageRole, message: &str) -> Result<()> {
    let signer = match role {
        MessageRole::Buyer => parse_message::<BuyerMessage>(message)?.signer()?,
        MessageRole::Seller1 => parse_message::<Seller1Message>(message)?.signer()?,
        MessageRole::Seller2 => parse_message::<Seller2Message>(message)?.signer()?,
        MessageRole::ExchangerAuth => parse_message::<ExchangerAuthMessage>(message)?.signer()?,
    };
    println!("{signer}");
    Ok(())
}

/// Seller2 messages are the ones carrying mint terms.
fn is_seller2(raw: &[u8]) -> Result<bool> {
    let value: serde_json::Value = serde_json::from_slice(raw).context("seller message is not JSON")?;
    Ok(value.get("exclusive_flag").is_some() || value.get("royalty").is_some())
}

fn check(buyer: &str, seller: &str, exchanger_auth: Option<&str>) -> Result<()> {
    let buyer: BuyerMessage = parse_message(buyer)?;
    let auth = exchanger_auth
        .map(parse_message::<ExchangerAuthMessage>)
        .transpose()?;

    let raw = load(seller)?;
    if is_seller2(&raw)? {
        validate_match(&buyer, &Seller2Message::from_json(&raw)?, auth.as_ref())?;
    } else {
        validate_match(&buyer, &Seller1Message::from_json(&raw)?, auth.as_ref())?;
    }
    println!("ok");
    Ok(())
}

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

fn nft_block(args: NftBlockArgs) -> NftBlock {
    NftBlock {
        dir: args.dir,
        start_index: args.start_index,
        number: args.number,
        royalty: args.royalty,
        creator: args.creator,
    }
}

async fn submit(mut config: ClientConfig, args: SubmitArgs) -> Result<()> {
    config.gas_price = args.gas_price;
    config.chain_id = args.chain_id;
    let client = WormholesClient::connect(config, &args.key.private_key)
        .context("failed to set up client")?;

    tracing::debug!(from = %client.address(), rpc = %client.config().rpc_url, "submitting");

    let hash = match args.operation {
        OperationCommand::Send { to, value, data } => {
            client.normal_transaction(&to, value, data.as_bytes()).await?
        }
        OperationCommand::Mint {
            royalty,
            meta_url,
            exchanger,
        } => client.mint(royalty, &meta_url, &exchanger).await?,
        OperationCommand::Transfer { nft_address, to } => client.transfer(&nft_address, &to).await?,
        OperationCommand::Author { nft_address, to } => client.author(&nft_address, &to).await?,
        OperationCommand::AuthorRevoke { nft_address, to } => {
            client.author_revoke(&nft_address, &to).await?
        }
        OperationCommand::AccountAuthor { to } => client.account_author(&to).await?,
        OperationCommand::AccountAuthorRevoke { to } => client.account_author_revoke(&to).await?,
        OperationCommand::SnftToErb { nft_address } => client.snft_to_erb(&nft_address).await?,
        OperationCommand::TokenPledge {
            proxy_address,
            proxy_sign,
        } => client.token_pledge(&proxy_address, &proxy_sign).await?,
        OperationCommand::TokenRevokesPledge => client.token_revokes_pledge().await?,
        OperationCommand::AdditionalPledgeAmount { value } => {
            let value = parse_quantity(&value).map_err(anyhow::Error::msg)?;
            client.additional_pledge_amount(value).await?
        }
        OperationCommand::RevokesPledgeAmount { value } => {
            let value = parse_quantity(&value).map_err(anyhow::Error::msg)?;
            client.revokes_pledge_amount(value).await?
        }
        OperationCommand::AccountDelegate {
            proxy_address,
            proxy_sign,
        } => client.account_delegate(&proxy_address, &proxy_sign).await?,
        OperationCommand::UnforzenAccount => client.unforzen_account().await?,
        OperationCommand::RecoverCoefficient => client.recover_coefficient().await?,
        OperationCommand::Open {
            fee_rate,
            name,
            url,
        } => client.open(fee_rate, &name, &url).await?,
        OperationCommand::Close => client.close().await?,
        OperationCommand::VoteOfficialNft(block) => {
            client.vote_official_nft(nft_block(block)).await?
        }
        OperationCommand::VoteOfficialNftByApprovedExchanger {
            block,
            exchanger_auth,
        } => {
            let auth: ExchangerAuthMessage = parse_message(&exchanger_auth)?;
            client
                .vote_official_nft_by_approved_exchanger(nft_block(block), &auth)
                .await?
        }
        OperationCommand::TransactionNft { buyer, seller1, to } => {
            let buyer: BuyerMessage = parse_message(&buyer)?;
            let seller1: Seller1Message = parse_message(&seller1)?;
            client.transaction_nft(&buyer, &seller1, &to).await?
        }
        OperationCommand::BuyerInitiatingTransaction { seller1 } => {
            let seller1: Seller1Message = parse_message(&seller1)?;
            client.buyer_initiating_transaction(&seller1).await?
        }
        OperationCommand::FoundryTradeBuyer { seller2 } => {
            let seller2: Seller2Message = parse_message(&seller2)?;
            client.foundry_trade_buyer(&seller2).await?
        }
        OperationCommand::FoundryExchange { buyer, seller2, to } => {
            let buyer: BuyerMessage = parse_message(&buyer)?;
            let seller2: Seller2Message = parse_message(&seller2)?;
            client.foundry_exchange(&buyer, &seller2, &to).await?
        }
        OperationCommand::NftExchangeMatch {
            buyer,
            seller1,
            exchanger_auth,
            to,
        } => {
            let buyer: BuyerMessage = parse_message(&buyer)?;
            let seller1: Seller1Message = parse_message(&seller1)?;
            let auth: ExchangerAuthMessage = parse_message(&exchanger_auth)?;
            client.nft_exchange_match(&buyer, &seller1, &auth, &to).await?
        }
        OperationCommand::FoundryExchangeInitiated {
            buyer,
            seller2,
            exchanger_auth,
            to,
        } => {
            let buyer: BuyerMessage = parse_message(&buyer)?;
            let seller2: Seller2Message = parse_message(&seller2)?;
            let auth: ExchangerAuthMessage = parse_message(&exchanger_auth)?;
            client
                .foundry_exchange_initiated(&buyer, &seller2, &auth, &to)
                .await?
        }
        OperationCommand::NftDoesNotAuthorizeExchanges { buyer, seller1, to } => {
            let buyer: BuyerMessage = parse_message(&buyer)?;
            let seller1: Seller1Message = parse_message(&seller1)?;
            client
                .nft_does_not_authorize_exchanges(&buyer, &seller1, &to)
                .await?
        }
    };

    println!("{hash}");
    Ok(())
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

async fn run_query(config: &ClientConfig, query: QueryCommand) -> Result<()> {
    let node = HttpTransport::from_config(config)?;

    match query {
        QueryCommand::ChainId => println!("{}", node.chain_id().await?),
        QueryCommand::BlockNumber => println!("{}", node.block_number().await?),
        QueryCommand::Balance { address, block } => {
            let address = check_address("address", &address)?;
            println!("{}", node.balance_at(address, block).await?);
        }
        QueryCommand::Receipt { hash } => {
            let hash = check_hash(&hash)?;
            match node.transaction_receipt(hash).await? {
                Some(receipt) => print_json(&receipt)?,
                None => bail!("no receipt yet for {hash}"),
            }
        }
        QueryCommand::Block { block } => print_json(&node.block_by_number(block).await?)?,
        QueryCommand::Account { address, block } => {
            let address = check_address("address", &address)?;
            print_json(&node.account_info(address, block).await?)?;
        }
        QueryCommand::Validators { block } => print_json(&node.validators(block).await?)?,
        QueryCommand::Beneficiaries { block } => {
            print_json(&node.block_beneficiaries(block).await?)?
        }
        QueryCommand::MinerProxy { number, address } => {
            let address = check_address("address", &address)?;
            print_json(&node.miner_proxy(number, address).await?)?;
        }
    }
    Ok(())
}
