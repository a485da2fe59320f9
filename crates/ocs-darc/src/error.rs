//! Error types for the DARC model.

use ocs_types::Hash;
use thiserror::Error;

/// Errors raised by DARC construction, rule mutation, signing, and
/// path search.
#[derive(Debug, Clone, Error)]
pub enum DarcError {
    /// `addRule` called for an action that already has a rule.
    #[error("rule for action {action:?} already exists")]
    RuleAlreadyExists {
        /// Action the caller attempted to add a rule for.
        action: String,
    },

    /// `updateRule`/`deleteRules` called for an action with no rule.
    #[error("no rule for action {action:?}")]
    RuleNotFound {
        /// Action the caller attempted to update or delete.
        action: String,
    },

    /// The DARC carries no signature where one is required.
    #[error("darc {base_id:?} version {version} is unsigned")]
    MissingSignature {
        /// Base id of the unsigned darc.
        base_id: Hash,
        /// Version of the unsigned darc.
        version: u64,
    },

    /// Signature verification against the resolved signer failed.
    #[error("signature verification failed for darc {base_id:?} version {version}")]
    BadSignature {
        /// Base id of the darc whose signature failed.
        base_id: Hash,
        /// Version of the darc whose signature failed.
        version: u64,
    },

    /// The signer's identity is not an Ed25519 key and therefore cannot
    /// have produced a signature directly.
    #[error("signer identity is not an ed25519 key")]
    NonSigningIdentity,

    /// No path from the search root to `identity` in the requested role
    /// could be found.
    #[error("no path to identity in role {role:?} from darc {base_id:?}")]
    NoPath {
        /// Base id the search started from.
        base_id: Hash,
        /// Role the search was looking for.
        role: ocs_types::Role,
    },

    /// A path element referenced a base id absent from storage.
    #[error("darc {0:?} not found")]
    NotFound(Hash),

    /// Encoding/decoding of darc content failed.
    #[error("darc content encoding failed: {0}")]
    Encoding(String),
}
