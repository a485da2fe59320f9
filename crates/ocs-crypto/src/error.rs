//! # Error Types
//!
//! Opaque errors for the crypto boundary (spec §4.A: "Returns opaque
//! errors on malformed inputs").

use thiserror::Error;

/// Errors raised by the crypto primitives adapter.
#[derive(Debug, Clone, Error)]
pub enum CryptoError {
    /// A public key did not decode to a valid curve point.
    #[error("invalid public key")]
    InvalidPublicKey,

    /// A signature failed to verify against the given message and key.
    #[error("signature verification failed")]
    SignatureVerificationFailed,

    /// A byte string was the wrong length for the expected encoding.
    #[error("invalid encoding: expected {expected} bytes, got {got}")]
    InvalidEncoding {
        /// Expected byte length.
        expected: usize,
        /// Actual byte length.
        got: usize,
    },

    /// A scalar or point failed to decode (e.g. a non-canonical encoding).
    #[error("invalid group element encoding")]
    InvalidGroupElement,

    /// Fewer shares were supplied than the reconstruction threshold requires.
    #[error("insufficient shares: got {got}, need {threshold}")]
    InsufficientShares {
        /// Number of shares actually supplied.
        got: usize,
        /// Required threshold.
        threshold: usize,
    },

    /// A share failed its Feldman commitment check.
    #[error("share {index} failed verification against the public polynomial")]
    InvalidShare {
        /// 1-indexed participant index of the failing share.
        index: u32,
    },
}
