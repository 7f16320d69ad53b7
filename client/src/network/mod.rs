//! # Network Module
//!
//! Everything the client needs from a Wormholes node, behind one trait.
//!
//! ## Architecture
//!
//! ```text
//! rpc.rs         JSON-RPC 2.0 envelopes and the method enumeration
//! transport.rs   NodeRpc trait: raw call/batch plus typed queries
//! http.rs        NodeRpc over HTTP (reqwest)
//! mock.rs        Scripted, recording NodeRpc for tests
//! types.rs       Receipts, blocks, accounts, validator and proxy lists
//! ```
//!
//! ## Design Decisions
//!
//! - Transports implement only `call` and `batch`. Typed queries are default
//!   methods, so the HTTP and mock transports decode identically.
//! - Nothing here retries. A failed or timed-out call is returned to the
//!   caller as a [`TransportError`].
//! - Big integers from Go-side structs arrive as bare JSON numbers. They are
//!   decoded without `arbitrary_precision`, so values past 2^53 lose
//!   precision.

pub mod http;
pub mod mock;
pub mod rpc;
pub mod transport;
pub mod types;

pub use http::HttpTransport;
pub use mock::MockTransport;
pub use rpc::{RpcError, RpcMethod, RpcRequest, RpcResponse};
pub use transport::{NodeRpc, TransportError};
pub use types::{
    Account, BeneficiaryAddress, Block, BlockHeader, BlockTag, BlockTransaction, MinerProxy,
    TransactionReceipt, Validator, ValidatorList,
};
