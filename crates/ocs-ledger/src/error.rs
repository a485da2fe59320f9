//! Errors raised by transaction verification.

use ocs_darc::DarcError;
use ocs_types::Hash;
use thiserror::Error;

/// Errors the verifier callback can raise against a candidate transaction.
#[derive(Debug, Clone, Error)]
pub enum LedgerError {
    /// `|now - timestamp| > 60s`.
    #[error("timestamp {timestamp} outside the 60s window around {now}")]
    TimestampOutOfWindow {
        /// The transaction's declared timestamp.
        timestamp: i64,
        /// The verifier's clock at decision time.
        now: i64,
    },

    /// A darc with the same `(base_id, version)` is already stored.
    #[error("darc {base_id:?} version {version} already stored")]
    DarcReplay {
        /// Base id of the resubmitted darc.
        base_id: Hash,
        /// Version of the resubmitted darc.
        version: u64,
    },

    /// A non-genesis darc version did not strictly increase the version
    /// counter.
    #[error("darc {base_id:?} version {version} is not newer than stored version {prev_version}")]
    StaleDarcVersion {
        /// Base id of the rejected darc.
        base_id: Hash,
        /// Version on the rejected darc.
        version: u64,
        /// Version already stored.
        prev_version: u64,
    },

    /// Signature / path verification against a darc failed.
    #[error(transparent)]
    Darc(#[from] DarcError),

    /// A write request referenced a chain with no admin darc on record.
    #[error("no admin darc on record for chain {0:?}")]
    AdminNotFound(Hash),

    /// A read request's `data_id` does not resolve to a stored write
    /// transaction.
    #[error("block {0:?} is not a write block")]
    NotAWriteBlock(Hash),
}
