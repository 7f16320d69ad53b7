//! Top-level error type.
//!
//! Each layer has its own error enum. [`ClientError`] wraps them so `?`
//! works across layers, and groups them into the categories a caller acts
//! on: fix the input, re-collect signatures, retry the call, or give up on
//! the key.

use thiserror::Error;

use crate::crypto::keys::KeyError;
use crate::crypto::signatures::SignatureError;
use crate::network::transport::TransportError;
use crate::trade::validator::TradeError;
use crate::transaction::payload::PayloadError;
use crate::validation::ValidationError;

/// What the caller should do about a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Malformed input. Correct the argument and call again.
    Validation,
    /// The parties' messages disagree. Collect new signatures.
    Consistency,
    /// The node could not be reached or refused the call.
    Transport,
    /// Bad key or signature.
    Crypto,
}

/// Any failure surfaced by the client.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Consistency(#[from] TradeError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    Payload(#[from] PayloadError),
}

/// Key and signature failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    #[error(transparent)]
    Key(#[from] KeyError),

    #[error(transparent)]
    Signature(#[from] SignatureError),
}

impl From<KeyError> for ClientError {
    fn from(err: KeyError) -> Self {
        ClientError::Crypto(err.into())
    }
}

impl From<SignatureError> for ClientError {
    fn from(err: SignatureError) -> Self {
        ClientError::Crypto(err.into())
    }
}

impl ClientError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ClientError::Validation(_) | ClientError::Payload(_) => ErrorCategory::Validation,
            // A malformed field inside a role message is an input problem,
            // not a disagreement between parties.
            ClientError::Consistency(err) if !err.is_disagreement() => ErrorCategory::Validation,
            ClientError::Consistency(_) => ErrorCategory::Consistency,
            ClientError::Transport(_) => ErrorCategory::Transport,
            ClientError::Crypto(_) => ErrorCategory::Crypto,
        }
    }

    /// Only transport failures are worth retrying unchanged. The client
    /// itself never retries.
    pub fn is_retryable(&self) -> bool {
        self.category() == ErrorCategory::Transport
    }
}
