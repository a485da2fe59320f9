//! Errors raised by the storage index itself (lookups never fail; only
//! insertion can reject a conflicting entry).

use ocs_types::Hash;
use thiserror::Error;

/// Failures from mutating the in-memory index.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A darc with this `(base_id, version)` is already stored; storage
    /// never overwrites a committed version.
    #[error("darc {base_id:?} version {version} already stored")]
    VersionConflict {
        /// Base id of the conflicting darc.
        base_id: Hash,
        /// Version already occupied.
        version: u64,
    },

    /// A darc was inserted out of sequence (must equal the current
    /// length of the stored sequence, i.e. `prev.version + 1` or `0` for
    /// a fresh base id).
    #[error("darc {base_id:?} version {version} is not contiguous (expected {expected})")]
    NonContiguousVersion {
        /// Base id of the darc.
        base_id: Hash,
        /// Version the caller tried to insert.
        version: u64,
        /// Version that would have been contiguous.
        expected: u64,
    },
}
