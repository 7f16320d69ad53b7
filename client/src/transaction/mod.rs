//! # Transaction Module
//!
//! From a domain [`Operation`] to a broadcast transaction hash.
//!
//! ## Architecture
//!
//! ```text
//! types.rs       Operation sum type and OperationKind tags
//! payload.rs     "wormholes:" marker + Go-compatible JSON record
//! builder.rs     Input checks, recipient/value/gas routing → TxPlan
//! signing.rs     EIP-155 legacy transaction signing
//! assembler.rs   Nonce/gas/chain lookups, signing, broadcast
//! ```
//!
//! ## Lifecycle
//!
//! 1. **Prepare**: [`prepare`] validates the operation and produces a
//!    [`TxPlan`]. No I/O.
//! 2. **Envelope**: [`fetch_envelope`] asks the node for the pending nonce,
//!    gas price and chain id, unless the config pins them.
//! 3. **Sign**: [`sign_plan`] builds and signs the legacy transaction.
//! 4. **Broadcast**: [`submit_plan`] sends it and logs the hash.
//!
//! ## Design Decisions
//!
//! - Every input check runs in step 1, so a rejected operation never
//!   touches the network.
//! - Role-message signatures are not verified here. The node re-verifies
//!   them on execution.

pub mod assembler;
pub mod builder;
pub mod payload;
pub mod signing;
pub mod types;

pub use assembler::{assemble, fetch_envelope, submit_plan};
pub use builder::{erb_to_wei, prepare, prepare_transfer, TxPlan};
pub use payload::{encode_operation, PayloadError};
pub use signing::{sign_plan, SignedTransaction, TxEnvelope};
pub use types::{NftBlock, Operation, OperationKind};
