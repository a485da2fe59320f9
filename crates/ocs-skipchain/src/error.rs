//! Errors raised by the skipchain adapter.

use ocs_types::Hash;
use thiserror::Error;

/// Errors raised by `genesis`/`append`/`by_id`/`latest`.
#[derive(Debug, Clone, Error)]
pub enum SkipchainError {
    /// The per-chain verifier rejected the candidate transaction.
    #[error(transparent)]
    Verification(#[from] ocs_ledger::LedgerError),

    /// `append` was called against a block that is no longer the chain's
    /// latest (a concurrent append already advanced it).
    #[error("stale latest: expected {expected:?}, chain is now at {actual:?}")]
    ChainConflict {
        /// The `latest` hash the caller appended against.
        expected: Hash,
        /// The chain's actual current latest hash.
        actual: Hash,
    },

    /// No block exists under the given hash.
    #[error("block {0:?} not found")]
    NotFound(Hash),

    /// No chain exists under the given skipchain id.
    #[error("chain {0:?} not found")]
    ChainNotFound(Hash),

    /// Persistence I/O failed.
    #[error("persistence failure: {0}")]
    Io(String),
}
