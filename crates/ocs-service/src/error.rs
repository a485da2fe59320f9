//! The façade's unified error type (spec §7): every component-local error
//! folds into one of seven kinds at this boundary, the same fan-in
//! pattern the teacher uses for its per-boundary `GatewayError`/
//! `ConsensusError` enums.

use ocs_types::Hash;
use thiserror::Error;

/// Errors the façade can return to a caller. No silent fall-through: a
/// failed verification aborts the entire request before any state is
/// mutated (spec §7).
#[derive(Debug, Error)]
pub enum OcsError {
    /// Missing or ill-formed request fields. Not retried.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The verifier rejected the candidate transaction (bad signature,
    /// unknown darc, expired timestamp, no path found). Not retried.
    #[error("policy denied: {0}")]
    PolicyDenied(String),

    /// A referenced block/darc/chain is absent.
    #[error("not found: {0}")]
    NotFound(String),

    /// `append` was rejected because `latest` went stale under a
    /// concurrent proposal. Not auto-retried in the core.
    #[error("chain conflict on {0:?}")]
    ChainConflict(Hash),

    /// DKG or propagation did not complete within its window.
    #[error("timeout: {0}")]
    Timeout(String),

    /// Re-encryption produced fewer than `t` valid shares, or recovery
    /// failed. Surfaced verbatim.
    #[error("crypto failure: {0}")]
    CryptoFailure(String),

    /// Serialization or persistence failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ocs_ledger::LedgerError> for OcsError {
    fn from(e: ocs_ledger::LedgerError) -> Self {
        OcsError::PolicyDenied(e.to_string())
    }
}

impl From<ocs_darc::DarcError> for OcsError {
    fn from(e: ocs_darc::DarcError) -> Self {
        OcsError::PolicyDenied(e.to_string())
    }
}

impl From<ocs_storage::StorageError> for OcsError {
    fn from(e: ocs_storage::StorageError) -> Self {
        OcsError::PolicyDenied(e.to_string())
    }
}

impl From<ocs_skipchain::SkipchainError> for OcsError {
    fn from(e: ocs_skipchain::SkipchainError) -> Self {
        match e {
            ocs_skipchain::SkipchainError::Verification(inner) => inner.into(),
            ocs_skipchain::SkipchainError::ChainConflict { expected, .. } => {
                OcsError::ChainConflict(expected)
            }
            ocs_skipchain::SkipchainError::NotFound(h) => {
                OcsError::NotFound(format!("block {h:?}"))
            }
            ocs_skipchain::SkipchainError::ChainNotFound(h) => {
                OcsError::NotFound(format!("chain {h:?}"))
            }
            ocs_skipchain::SkipchainError::Io(msg) => OcsError::Internal(msg),
        }
    }
}

impl From<ocs_dkg::DkgError> for OcsError {
    fn from(e: ocs_dkg::DkgError) -> Self {
        match e {
            ocs_dkg::DkgError::Timeout { .. } => OcsError::Timeout(e.to_string()),
            other => OcsError::Internal(other.to_string()),
        }
    }
}

impl From<ocs_reencrypt::ReencryptError> for OcsError {
    fn from(e: ocs_reencrypt::ReencryptError) -> Self {
        match e {
            ocs_reencrypt::ReencryptError::InsufficientShares { .. }
            | ocs_reencrypt::ReencryptError::Crypto(_) => OcsError::CryptoFailure(e.to_string()),
            ocs_reencrypt::ReencryptError::Darc(_)
            | ocs_reencrypt::ReencryptError::XcMismatch
            | ocs_reencrypt::ReencryptError::NonEd25519SignerWithoutEphemeral => {
                OcsError::PolicyDenied(e.to_string())
            }
            ocs_reencrypt::ReencryptError::NotAReadBlock(h)
            | ocs_reencrypt::ReencryptError::NotAWriteBlock(h) => {
                OcsError::NotFound(format!("block {h:?}"))
            }
            ocs_reencrypt::ReencryptError::Encoding(msg) => OcsError::Internal(msg),
        }
    }
}

impl From<bincode::Error> for OcsError {
    fn from(e: bincode::Error) -> Self {
        OcsError::Internal(format!("encoding error: {e}"))
    }
}

impl From<std::io::Error> for OcsError {
    fn from(e: std::io::Error) -> Self {
        OcsError::Internal(format!("io error: {e}"))
    }
}
