//! # Multi-Party Trade Authorization
//!
//! How a buyer, a seller and optionally an exchange agree on a trade
//! without trusting each other or a server:
//!
//! ```text
//!   buyer ──Wallet::sign_buyer──┐
//!                               ├─► validate_match ─► assembler ─► node
//!   seller ─Wallet::sign_seller─┘         ▲
//!   exchange ─sign_exchanger_auth─────────┘  (delegated variants)
//! ```
//!
//! - **encoding**: the fixed field order each role signs.
//! - **messages**: the role message records and their JSON form.
//! - **wallet**: offline signing, one key per party.
//! - **validator**: the checks run before messages are combined.

pub mod encoding;
pub mod messages;
pub mod validator;
pub mod wallet;

pub use encoding::{CanonicalMessage, DelegateTerms, Role};
pub use messages::{
    BuyerMessage, ExchangerAuthMessage, RoleMessage, Seller1Message, Seller2Message, SellerOffer,
};
pub use validator::{validate_match, TradeError};
pub use wallet::Wallet;
