//! Behavioral guarantees of role-message signing and trade validation.

use wormholes_client::crypto::hash::personal_message_hash;
use wormholes_client::trade::encoding::CanonicalMessage;
use wormholes_client::trade::messages::RoleMessage;
use wormholes_client::validation::check_address;
use wormholes_client::{
    validate_match, BuyerMessage, ErrorCategory, Seller1Message, TradeError, Wallet, WormKeypair,
};

const NFT: &str = "0x0000000000000000000000000000000000000002";
const EXCHANGER: &str = "0xAB00000000000000000000000000000000000001";

fn wallet() -> Wallet {
    Wallet::new(WormKeypair::generate())
}

fn pair(buyer_amount: &str, seller_amount: &str) -> (BuyerMessage, Seller1Message) {
    let buyer = wallet()
        .sign_buyer(buyer_amount, NFT, EXCHANGER, "0x487", "")
        .unwrap();
    let seller = wallet()
        .sign_seller1(seller_amount, NFT, EXCHANGER, "0x487")
        .unwrap();
    (buyer, seller)
}

#[test]
fn test_signing_is_deterministic() {
    let w = wallet();
    let a = w.sign_buyer("0x10", NFT, EXCHANGER, "0x487", "").unwrap();
    let b = w.sign_buyer("0x10", NFT, EXCHANGER, "0x487", "").unwrap();
    assert_eq!(a.sig, b.sig);
    assert_eq!(a.to_json().unwrap(), b.to_json().unwrap());
}

#[test]
fn test_signature_recovers_to_signer() {
    for _ in 0..8 {
        let w = wallet();
        let msg = w.sign_seller1("0x1", NFT, EXCHANGER, "0x10").unwrap();
        assert_eq!(msg.signer().unwrap(), w.address());
    }
}

#[test]
fn test_field_order_matters() {
    // Amount and NFT address of equal length, swapped.
    let a = "0x0000000000000000000000000000000000000003";
    let b = NFT;
    let original = BuyerMessage {
        amount: a.into(),
        nft_address: b.into(),
        exchanger: EXCHANGER.into(),
        block_number: "0x487".into(),
        ..Default::default()
    };
    let swapped = BuyerMessage {
        amount: b.into(),
        nft_address: a.into(),
        ..original.clone()
    };
    assert_ne!(
        personal_message_hash(&original.canonical_bytes()),
        personal_message_hash(&swapped.canonical_bytes())
    );

    let w = wallet();
    let signed = w.sign_buyer(a, b, EXCHANGER, "0x487", "").unwrap();
    let moved = BuyerMessage {
        sig: signed.sig.clone(),
        ..swapped
    };
    assert_ne!(moved.signer().unwrap(), w.address());
}

#[test]
fn test_amounts_compare_numerically() {
    // "0x5" > "0x10" as strings, but 5 < 16.
    let (buyer, seller) = pair("0x5", "0x10");
    assert!(matches!(
        validate_match(&buyer, &seller, None),
        Err(TradeError::AmountMismatch { .. })
    ));

    let (buyer, seller) = pair("0x10", "0x5");
    validate_match(&buyer, &seller, None).unwrap();

    let (buyer, seller) = pair("0x10", "0x10");
    validate_match(&buyer, &seller, None).unwrap();
}

#[test]
fn test_exchanger_match_is_exact() {
    let buyer = wallet()
        .sign_buyer("0x10", NFT, EXCHANGER, "0x487", "")
        .unwrap();
    let seller = wallet()
        .sign_seller1("0x10", NFT, &EXCHANGER.to_lowercase(), "0x487")
        .unwrap();
    let err = validate_match(&buyer, &seller, None).unwrap_err();
    assert!(matches!(err, TradeError::ExchangerMismatch { .. }));
    assert!(err.is_disagreement());
}

#[test]
fn test_flag_checked_before_signing() {
    for flag in ["2", "", "yes"] {
        let err = wallet()
            .sign_seller2("0x10", "100", "/ipfs/x", flag, EXCHANGER, "0x487")
            .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Validation);
    }
    for flag in ["0", "1"] {
        wallet()
            .sign_seller2("0x10", "100", "/ipfs/x", flag, EXCHANGER, "0x487")
            .unwrap();
    }
}

#[test]
fn test_address_shape() {
    let valid = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";
    assert!(check_address("to", valid).is_ok());
    assert!(check_address("to", &valid.replacen("0x", "0X", 1)).is_ok());
    assert!(check_address("to", &valid[..41]).is_err());
    assert!(check_address("to", &format!("{valid}0")).is_err());
    assert!(check_address("to", &format!("00{}", &valid[2..])).is_err());
}
