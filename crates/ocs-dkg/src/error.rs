//! Errors raised by the DKG orchestrator.

use thiserror::Error;

/// Failures completing a chain's distributed key generation.
#[derive(Debug, Error)]
pub enum DkgError {
    /// Fewer than every roster member acknowledged within
    /// [`crate::dkg::DKG_TIMEOUT`]; Pedersen DKG has no honest-majority
    /// slack at setup, so a missing ack aborts the whole run.
    #[error("dkg timed out: {acked}/{sent} roster members acknowledged")]
    Timeout {
        /// Roster members the start message was sent to.
        sent: usize,
        /// Roster members that acknowledged in time.
        acked: usize,
    },

    /// This node's own index was not present in the dealt share set
    /// (roster/index mismatch; should not happen if the roster passed to
    /// [`crate::dkg::run_dkg`] matches the one shares were dealt over).
    #[error("no dealt share for this node's index")]
    MissingShare,

    /// Serializing or deserializing the start/complete messages failed.
    #[error("dkg encoding error: {0}")]
    Encoding(String),
}
