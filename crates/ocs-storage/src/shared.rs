//! The per-chain artifacts DKG completion deposits: this server's share
//! of the collective secret, and the public polynomial peers use to
//! verify each other's re-encryption shares.

use ocs_crypto::{GroupElement, GroupScalar};
use serde::{Deserialize, Serialize};

/// This server's DKG share `v_i` and the chain's collective public key
/// `X`, keyed by skipchain id in [`crate::Storage`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SharedSecret {
    /// This server's 1-indexed participant position.
    pub index: u32,
    /// This server's share of the collective secret.
    pub share: GroupScalar,
    /// The collective public key `X = base^secret`.
    pub collective: GroupElement,
}
