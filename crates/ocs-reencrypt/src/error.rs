//! Errors from the re-encryption orchestrator and its local
//! `verifyReencryption` check.

use ocs_types::Hash;
use thiserror::Error;

/// Failures re-encrypting a committed write for a reader.
#[derive(Debug, Error)]
pub enum ReencryptError {
    /// The block at the claimed hash is not a read block.
    #[error("block {0:?} is not a read block")]
    NotAReadBlock(Hash),

    /// The read block's `data_id` does not resolve to a write block.
    #[error("block {0:?} is not a write block")]
    NotAWriteBlock(Hash),

    /// No ephemeral key was supplied and the read's signer is not
    /// Ed25519 (so there is no group point to re-encrypt to).
    #[error("reader has no ephemeral key and its signer is not Ed25519")]
    NonEd25519SignerWithoutEphemeral,

    /// The claimed `Xc` does not match the one derived from the read's
    /// signer identity (ephemeral or Ed25519-native).
    #[error("claimed Xc does not match the read's signer identity")]
    XcMismatch,

    /// The read's signature failed the darc path check.
    #[error(transparent)]
    Darc(#[from] ocs_darc::DarcError),

    /// Fewer than `threshold` valid shares were collected; no timeout
    /// applies here (spec §5: bounded externally, not by this core).
    #[error("insufficient shares: {got}/{threshold}")]
    InsufficientShares {
        /// Shares actually collected.
        got: usize,
        /// Threshold required.
        threshold: usize,
    },

    /// A group operation failed (malformed point bytes).
    #[error(transparent)]
    Crypto(#[from] ocs_crypto::CryptoError),

    /// Serializing or deserializing a protocol message failed.
    #[error("re-encryption encoding error: {0}")]
    Encoding(String),
}
