//! The client facade: one key, one node, one method per operation.
//!
//! [`WormholesClient`] owns a [`Wallet`] for signing and a [`NodeRpc`] for
//! I/O. Each operation method validates its inputs, lets the assembler
//! sign and broadcast, and returns the lowercase `0x` transaction hash.
//! Clients share nothing, so each party in a trade can hold its own.

use alloy_primitives::{Address, U256};
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::network::http::HttpTransport;
use crate::network::transport::NodeRpc;
use crate::network::types::{
    Account, BeneficiaryAddress, Block, BlockTag, MinerProxy, TransactionReceipt, ValidatorList,
};
use crate::trade::messages::{BuyerMessage, ExchangerAuthMessage, Seller1Message, Seller2Message};
use crate::trade::wallet::Wallet;
use crate::transaction::assembler::{assemble, submit_plan};
use crate::transaction::builder::prepare_transfer;
use crate::transaction::types::{NftBlock, Operation};
use crate::validation::{check_address, check_hash};

/// A signing key bound to a node.
pub struct WormholesClient<T: NodeRpc = HttpTransport> {
    wallet: Wallet,
    transport: T,
    config: ClientConfig,
}

impl WormholesClient<HttpTransport> {
    /// Connect to `config.rpc_url` over HTTP, signing with `private_key`.
    ///
    /// No request is made until the first operation.
    pub fn connect(config: ClientConfig, private_key: &str) -> Result<Self, ClientError> {
        let wallet = Wallet::from_hex(private_key)?;
        let transport = HttpTransport::from_config(&config)?;
        Ok(Self::with_transport(wallet, transport, config))
    }
}

impl<T: NodeRpc> WormholesClient<T> {
    pub fn with_transport(wallet: Wallet, transport: T, config: ClientConfig) -> Self {
        Self {
            wallet,
            transport,
            config,
        }
    }

    pub fn wallet(&self) -> &Wallet {
        &self.wallet
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The sending account.
    pub fn address(&self) -> Address {
        self.wallet.address()
    }

    /// Validate, sign and broadcast any operation.
    pub async fn submit(&self, op: &Operation) -> Result<String, ClientError> {
        debug!(kind = %op.kind(), "submitting operation");
        assemble(&self.transport, &self.config, self.wallet.keypair(), op).await
    }

    // -- plain transfer ----------------------------------------------------

    /// Send `value_erb` whole coins to `to` with raw `data` attached.
    pub async fn normal_transaction(
        &self,
        to: &str,
        value_erb: u64,
        data: &[u8],
    ) -> Result<String, ClientError> {
        let plan = prepare_transfer(to, value_erb, data)?;
        let signed = submit_plan(&self.transport, &self.config, self.wallet.keypair(), &plan).await?;
        Ok(signed.hash_hex())
    }

    // -- NFT lifecycle -----------------------------------------------------

    /// Mint an NFT owned by this account. `exchanger` may be empty.
    pub async fn mint(
        &self,
        royalty: u32,
        meta_url: &str,
        exchanger: &str,
    ) -> Result<String, ClientError> {
        self.submit(&Operation::Mint {
            royalty,
            meta_url: meta_url.to_string(),
            exchanger: exchanger.to_string(),
        })
        .await
    }

    pub async fn transfer(&self, nft_address: &str, to: &str) -> Result<String, ClientError> {
        self.submit(&Operation::Transfer {
            nft_address: nft_address.to_string(),
            to: to.to_string(),
        })
        .await
    }

    pub async fn author(&self, nft_address: &str, to: &str) -> Result<String, ClientError> {
        self.submit(&Operation::Author {
            nft_address: nft_address.to_string(),
            to: to.to_string(),
        })
        .await
    }

    pub async fn author_revoke(&self, nft_address: &str, to: &str) -> Result<String, ClientError> {
        self.submit(&Operation::AuthorRevoke {
            nft_address: nft_address.to_string(),
            to: to.to_string(),
        })
        .await
    }

    pub async fn account_author(&self, to: &str) -> Result<String, ClientError> {
        self.submit(&Operation::AccountAuthor { to: to.to_string() })
            .await
    }

    pub async fn account_author_revoke(&self, to: &str) -> Result<String, ClientError> {
        self.submit(&Operation::AccountAuthorRevoke { to: to.to_string() })
            .await
    }

    /// Convert an SNFT fragment back into ERB.
    pub async fn snft_to_erb(&self, nft_address: &str) -> Result<String, ClientError> {
        self.submit(&Operation::SnftToErb {
            nft_address: nft_address.to_string(),
        })
        .await
    }

    // -- staking -----------------------------------------------------------

    /// Stake the validator pledge. `proxy_sign` comes from
    /// [`Wallet::sign_delegate`] on the proxy's key; both may be empty.
    pub async fn token_pledge(
        &self,
        proxy_address: &str,
        proxy_sign: &str,
    ) -> Result<String, ClientError> {
        self.submit(&Operation::TokenPledge {
            proxy_address: proxy_address.to_string(),
            proxy_sign: proxy_sign.to_string(),
        })
        .await
    }

    pub async fn token_revokes_pledge(&self) -> Result<String, ClientError> {
        self.submit(&Operation::TokenRevokesPledge).await
    }

    /// Top up the stake by `value` wei.
    pub async fn additional_pledge_amount(&self, value: U256) -> Result<String, ClientError> {
        self.submit(&Operation::AdditionalPledgeAmount { value }).await
    }

    /// Withdraw `value` wei of stake.
    pub async fn revokes_pledge_amount(&self, value: U256) -> Result<String, ClientError> {
        self.submit(&Operation::RevokesPledgeAmount { value }).await
    }

    pub async fn account_delegate(
        &self,
        proxy_address: &str,
        proxy_sign: &str,
    ) -> Result<String, ClientError> {
        self.submit(&Operation::AccountDelegate {
            proxy_address: proxy_address.to_string(),
            proxy_sign: proxy_sign.to_string(),
        })
        .await
    }

    pub async fn unforzen_account(&self) -> Result<String, ClientError> {
        self.submit(&Operation::UnforzenAccount).await
    }

    pub async fn recover_coefficient(&self) -> Result<String, ClientError> {
        self.submit(&Operation::RecoverCoefficient).await
    }

    // -- exchange lifecycle ------------------------------------------------

    /// Open an exchange. `fee_rate` is in basis points.
    pub async fn open(&self, fee_rate: u32, name: &str, url: &str) -> Result<String, ClientError> {
        self.submit(&Operation::Open {
            fee_rate,
            name: name.to_string(),
            url: url.to_string(),
        })
        .await
    }

    pub async fn close(&self) -> Result<String, ClientError> {
        self.submit(&Operation::Close).await
    }

    // -- official NFT injection --------------------------------------------

    #[deprecated(note = "use vote_official_nft")]
    pub async fn insert_nft_block(&self, block: NftBlock) -> Result<String, ClientError> {
        self.submit(&Operation::InsertNftBlock(block)).await
    }

    pub async fn vote_official_nft(&self, block: NftBlock) -> Result<String, ClientError> {
        self.submit(&Operation::VoteOfficialNft(block)).await
    }

    pub async fn vote_official_nft_by_approved_exchanger(
        &self,
        block: NftBlock,
        exchanger_auth: &ExchangerAuthMessage,
    ) -> Result<String, ClientError> {
        self.submit(&Operation::VoteOfficialNftByApprovedExchanger {
            block,
            exchanger_auth: exchanger_auth.clone(),
        })
        .await
    }

    // -- trades ------------------------------------------------------------

    /// Seller accepts `buyer`'s offer against its own `seller1` offer and
    /// sends the NFT to `to`.
    pub async fn transaction_nft(
        &self,
        buyer: &BuyerMessage,
        seller1: &Seller1Message,
        to: &str,
    ) -> Result<String, ClientError> {
        self.submit(&Operation::TransactionNft {
            buyer: buyer.clone(),
            seller1: seller1.clone(),
            to: to.to_string(),
        })
        .await
    }

    /// Buyer accepts a seller's offer for a minted NFT.
    pub async fn buyer_initiating_transaction(
        &self,
        seller1: &Seller1Message,
    ) -> Result<String, ClientError> {
        self.submit(&Operation::BuyerInitiatingTransaction {
            seller1: seller1.clone(),
        })
        .await
    }

    /// Buyer accepts a lazy-mint offer.
    pub async fn foundry_trade_buyer(&self, seller2: &Seller2Message) -> Result<String, ClientError> {
        self.submit(&Operation::FoundryTradeBuyer {
            seller2: seller2.clone(),
        })
        .await
    }

    pub async fn foundry_exchange(
        &self,
        buyer: &BuyerMessage,
        seller2: &Seller2Message,
        to: &str,
    ) -> Result<String, ClientError> {
        self.submit(&Operation::FoundryExchange {
            buyer: buyer.clone(),
            seller2: seller2.clone(),
            to: to.to_string(),
        })
        .await
    }

    pub async fn nft_exchange_match(
        &self,
        buyer: &BuyerMessage,
        seller1: &Seller1Message,
        exchanger_auth: &ExchangerAuthMessage,
        to: &str,
    ) -> Result<String, ClientError> {
        self.submit(&Operation::NftExchangeMatch {
            buyer: buyer.clone(),
            seller1: seller1.clone(),
            exchanger_auth: exchanger_auth.clone(),
            to: to.to_string(),
        })
        .await
    }

    pub async fn foundry_exchange_initiated(
        &self,
        buyer: &BuyerMessage,
        seller2: &Seller2Message,
        exchanger_auth: &ExchangerAuthMessage,
        to: &str,
    ) -> Result<String, ClientError> {
        self.submit(&Operation::FoundryExchangeInitiated {
            buyer: buyer.clone(),
            seller2: seller2.clone(),
            exchanger_auth: exchanger_auth.clone(),
            to: to.to_string(),
        })
        .await
    }

    pub async fn nft_does_not_authorize_exchanges(
        &self,
        buyer: &BuyerMessage,
        seller1: &Seller1Message,
        to: &str,
    ) -> Result<String, ClientError> {
        self.submit(&Operation::NftDoesNotAuthorizeExchanges {
            buyer: buyer.clone(),
            seller1: seller1.clone(),
            to: to.to_string(),
        })
        .await
    }

    // -- reads -------------------------------------------------------------

    pub async fn chain_id(&self) -> Result<u64, ClientError> {
        Ok(self.transport.chain_id().await?)
    }

    pub async fn network_id(&self) -> Result<u64, ClientError> {
        Ok(self.transport.network_id().await?)
    }

    pub async fn block_number(&self) -> Result<u64, ClientError> {
        Ok(self.transport.block_number().await?)
    }

    /// Pending balance of `account`, in wei.
    pub async fn balance(&self, account: &str) -> Result<U256, ClientError> {
        let address = check_address("account", account)?;
        Ok(self.transport.balance(address).await?)
    }

    pub async fn balance_at(&self, account: &str, tag: BlockTag) -> Result<U256, ClientError> {
        let address = check_address("account", account)?;
        Ok(self.transport.balance_at(address, tag).await?)
    }

    /// `None` while the transaction is pending.
    pub async fn transaction_receipt(
        &self,
        hash: &str,
    ) -> Result<Option<TransactionReceipt>, ClientError> {
        let hash = check_hash(hash)?;
        Ok(self.transport.transaction_receipt(hash).await?)
    }

    pub async fn block_by_number(&self, tag: BlockTag) -> Result<Block, ClientError> {
        Ok(self.transport.block_by_number(tag).await?)
    }

    pub async fn account_info(&self, account: &str, tag: BlockTag) -> Result<Account, ClientError> {
        let address = check_address("account", account)?;
        Ok(self.transport.account_info(address, tag).await?)
    }

    pub async fn validators(&self, tag: BlockTag) -> Result<ValidatorList, ClientError> {
        Ok(self.transport.validators(tag).await?)
    }

    pub async fn block_beneficiaries(
        &self,
        tag: BlockTag,
    ) -> Result<Vec<BeneficiaryAddress>, ClientError> {
        Ok(self.transport.block_beneficiaries(tag).await?)
    }

    pub async fn miner_proxy(&self, number: u64, account: &str) -> Result<Vec<MinerProxy>, ClientError> {
        let address = check_address("account", account)?;
        Ok(self.transport.miner_proxy(number, address).await?)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::mock::MockTransport;
    use crate::error::ErrorCategory;
    use crate::network::rpc::RpcMethod;
    use crate::validation::ValidationError;
    use serde_json::json;

    const DEV_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn client(mock: MockTransport) -> WormholesClient<MockTransport> {
        WormholesClient::with_transport(
            Wallet::from_hex(DEV_KEY).unwrap(),
            mock,
            ClientConfig::default(),
        )
    }

    #[test]
    fn test_connect_does_no_io() {
        let client = WormholesClient::connect(ClientConfig::default(), DEV_KEY).unwrap();
        assert_eq!(
            client.address(),
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".parse::<Address>().unwrap()
        );
    }

    #[test]
    fn test_connect_rejects_bad_key() {
        assert!(WormholesClient::connect(ClientConfig::default(), "not-a-key").is_err());
    }

    #[tokio::test]
    async fn test_balance_validates_address() {
        let c = client(MockTransport::new());
        assert!(c.balance("0x1234").await.is_err());
        assert!(c.transport().calls().is_empty());
    }

    #[tokio::test]
    async fn test_receipt_rejects_bad_hash() {
        let c = client(MockTransport::new());
        let err = c.transaction_receipt("0xzz").await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::Validation(ValidationError::InvalidHash(_))
        ));
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert!(!err.is_retryable());
        assert!(c.transport().calls().is_empty());
    }

    #[tokio::test]
    async fn test_close_goes_to_self() {
        let mock = MockTransport::with_chain(51888, 0, 1);
        mock.respond(RpcMethod::SendRawTransaction, json!(format!("0x{}", "00".repeat(32))));
        let c = client(mock);
        let hash = c.close().await.unwrap();
        assert!(hash.starts_with("0x"));
        assert_eq!(hash.len(), 66);
    }
}
