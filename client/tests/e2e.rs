//! End-to-end trade flows against a scripted node.
//!
//! Each test plays every party with its own wallet or client, passes role
//! messages between them as JSON, and checks what reaches the node.

use alloy_primitives::{keccak256, Address, U256};
use serde_json::{json, Value};

use wormholes_client::network::rpc::RpcMethod;
use wormholes_client::trade::messages::RoleMessage;
use wormholes_client::transaction::payload::encode_operation;
use wormholes_client::{
    validate_match, BuyerMessage, ClientConfig, ClientError, ErrorCategory, MockTransport,
    Operation, Seller1Message, TransportError, Wallet, WormholesClient,
};

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

const BUYER_KEY: &str = "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";
const SELLER_KEY: &str = "0x5de4111afa1a4b94908f83103eb1f1706367c2e68ca870fc3fb9a804cdab365a";
const EXCHANGE_KEY: &str = "0x7c852118294e51e653712a81e05800f419141751be58f605c371e15141b007a6";

const NFT: &str = "0x0000000000000000000000000000000000000002";
const ONE_ERB: &str = "0xde0b6b3a7640000";
const EXPIRY: &str = "0x487";

fn node() -> MockTransport {
    let mock = MockTransport::with_chain(51888, 12, 1_000_000_000);
    mock.respond(
        RpcMethod::SendRawTransaction,
        json!(format!("0x{}", "00".repeat(32))),
    );
    mock
}

fn client(key: &str, mock: MockTransport) -> WormholesClient<MockTransport> {
    WormholesClient::with_transport(Wallet::from_hex(key).unwrap(), mock, ClientConfig::default())
}

fn exchanger() -> String {
    Wallet::from_hex(EXCHANGE_KEY).unwrap().address().to_string()
}

/// The raw transaction hex handed to `eth_sendRawTransaction`.
fn broadcast_raw(mock: &MockTransport) -> Vec<u8> {
    let params = mock.last_params(RpcMethod::SendRawTransaction).unwrap();
    let raw = params[0].as_str().unwrap();
    hex::decode(raw.trim_start_matches("0x")).unwrap()
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

// ---------------------------------------------------------------------------
// Seller accepts a buyer's offer (TransactionNFT)
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_transaction_nft_full_flow() {
    let buyer = Wallet::from_hex(BUYER_KEY).unwrap();
    let seller_wallet = Wallet::from_hex(SELLER_KEY).unwrap();

    // Both parties sign independently and exchange JSON.
    let offer = buyer
        .sign_buyer(ONE_ERB, NFT, &exchanger(), EXPIRY, "")
        .unwrap();
    let ask = seller_wallet
        .sign_seller1(ONE_ERB, NFT, &exchanger(), EXPIRY)
        .unwrap();
    let offer_wire = offer.to_json().unwrap();
    let received = BuyerMessage::from_json(&offer_wire).unwrap();
    assert_eq!(received, offer);
    assert_eq!(received.signer().unwrap(), buyer.address());

    validate_match(&received, &ask, None).unwrap();

    let seller = client(SELLER_KEY, node());
    let buyer_address = buyer.address().to_string();
    let hash = seller
        .transaction_nft(&received, &ask, &buyer_address)
        .await
        .unwrap();

    assert!(hash.starts_with("0x"));
    assert_eq!(hash, hash.to_lowercase());

    let raw = broadcast_raw(seller.transport());
    assert_eq!(hash, format!("0x{}", hex::encode(keccak256(&raw))));

    // The payload travels verbatim in the transaction data.
    let payload = encode_operation(&Operation::TransactionNft {
        buyer: received.clone(),
        seller1: ask.clone(),
        to: buyer_address,
    })
    .unwrap();
    assert!(payload.starts_with(b"wormholes:"));
    assert!(contains(&raw, &payload));

    let record: Value = serde_json::from_slice(&payload[b"wormholes:".len()..]).unwrap();
    assert_eq!(record["type"], 14);
    assert_eq!(record["version"], "v0.0.1");
    assert_eq!(record["buyer"]["price"], ONE_ERB);
    assert_eq!(record["buyer"]["nft_address"], NFT);
    assert_eq!(record["buyer"]["sig"], offer.sig.as_str());
    assert_eq!(record["seller1"]["price"], ONE_ERB);
    assert_eq!(record["seller1"]["sig"], ask.sig.as_str());
    let text = std::str::from_utf8(&payload).unwrap();
    let buyer_at = text.find(r#""buyer":"#).unwrap();
    let seller_at = text.find(r#""seller1":"#).unwrap();
    assert!(buyer_at < seller_at);
}

#[tokio::test]
async fn test_transaction_nft_rejects_mismatched_offer_offline() {
    let buyer = Wallet::from_hex(BUYER_KEY).unwrap();
    let seller_wallet = Wallet::from_hex(SELLER_KEY).unwrap();
    let offer = buyer
        .sign_buyer("0x5", NFT, &exchanger(), EXPIRY, "")
        .unwrap();
    let ask = seller_wallet
        .sign_seller1("0x10", NFT, &exchanger(), EXPIRY)
        .unwrap();

    let seller = client(SELLER_KEY, node());
    let err = seller
        .transaction_nft(&offer, &ask, &buyer.address().to_string())
        .await
        .unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Consistency);
    assert!(!err.is_retryable());
    assert!(seller.transport().calls().is_empty());
}

#[tokio::test]
async fn test_buyer_initiated_pays_the_ask() {
    let seller = Wallet::from_hex(SELLER_KEY).unwrap();
    let ask = seller
        .sign_seller1(ONE_ERB, NFT, &exchanger(), EXPIRY)
        .unwrap();
    let ask = Seller1Message::from_json(&ask.to_json().unwrap()).unwrap();

    let buyer = client(BUYER_KEY, node());
    buyer.buyer_initiating_transaction(&ask).await.unwrap();

    let raw = broadcast_raw(buyer.transport());
    // The value field carries exactly one ERB.
    let value = U256::from(10u64.pow(18)).to_be_bytes_trimmed_vec();
    assert!(contains(&raw, &value));
}

// ---------------------------------------------------------------------------
// Exchange-delegated match (NftExchangeMatch)
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_delegated_exchange_match() {
    let owner = Wallet::from_hex(EXCHANGE_KEY).unwrap();
    let operator = client(
        "0x47e179ec197488593b187f80a00eb0da91f1b9d0b13f8733639f19c30a34926a",
        node(),
    );
    let operator_address = operator.address().to_string();

    let auth = owner
        .sign_exchanger_auth(&owner.address().to_string(), &operator_address, EXPIRY)
        .unwrap();
    let offer = Wallet::from_hex(BUYER_KEY)
        .unwrap()
        .sign_buyer("0x1bc16d674ec80000", NFT, &exchanger(), EXPIRY, "")
        .unwrap();
    let ask = Wallet::from_hex(SELLER_KEY)
        .unwrap()
        .sign_seller1(ONE_ERB, NFT, &exchanger(), EXPIRY)
        .unwrap();

    let buyer_address = Wallet::from_hex(BUYER_KEY).unwrap().address().to_string();
    operator
        .nft_exchange_match(&offer, &ask, &auth, &buyer_address)
        .await
        .unwrap();
    assert_eq!(
        operator.transport().methods().last(),
        Some(&RpcMethod::SendRawTransaction)
    );
}

#[tokio::test]
async fn test_mismatched_trade_never_reaches_node() {
    let offer = Wallet::from_hex(BUYER_KEY)
        .unwrap()
        .sign_buyer("0x5", NFT, &exchanger(), EXPIRY, "")
        .unwrap();
    let ask = Wallet::from_hex(SELLER_KEY)
        .unwrap()
        .sign_seller1("0x10", NFT, &exchanger(), EXPIRY)
        .unwrap();

    let exchange = client(EXCHANGE_KEY, node());
    let buyer_address = Wallet::from_hex(BUYER_KEY).unwrap().address().to_string();
    let err = exchange
        .nft_does_not_authorize_exchanges(&offer, &ask, &buyer_address)
        .await
        .unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Consistency);
    assert!(exchange.transport().calls().is_empty());
}

// ---------------------------------------------------------------------------
// Staking with a delegate proof
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_token_pledge_with_proxy() {
    let staker = client(SELLER_KEY, node());
    let proxy = Wallet::from_hex(BUYER_KEY).unwrap();

    let proof = proxy
        .sign_delegate(&proxy.address().to_string(), &staker.address().to_string())
        .unwrap();
    assert_eq!(proof.len(), 2 + 65 * 2);

    staker
        .token_pledge(&proxy.address().to_string(), &proof)
        .await
        .unwrap();

    let raw = broadcast_raw(staker.transport());
    assert!(contains(&raw, proof.as_bytes()));
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_broadcast_rejection_is_retryable_transport_error() {
    let mock = MockTransport::with_chain(51888, 0, 1);
    mock.fail(
        RpcMethod::SendRawTransaction,
        TransportError::Rpc {
            code: -32000,
            message: "nonce too low".into(),
        },
    );
    let c = client(SELLER_KEY, mock);
    let err = c.close().await.unwrap_err();

    assert!(err.is_retryable());
    assert!(matches!(
        err,
        ClientError::Transport(TransportError::Rpc { code: -32000, .. })
    ));
}

#[tokio::test]
async fn test_each_client_uses_its_own_nonce() {
    let a = client(BUYER_KEY, node());
    let b = client(SELLER_KEY, node());
    let (ra, rb) = tokio::join!(a.close(), b.close());
    ra.unwrap();
    rb.unwrap();

    let sender_a = a
        .transport()
        .last_params(RpcMethod::GetTransactionCount)
        .unwrap();
    let expected: Address = Wallet::from_hex(BUYER_KEY).unwrap().address();
    assert_eq!(sender_a[0], json!(expected));
    assert_eq!(b.transport().methods().len(), 4);
}
