//! # Re-encryption Orchestrator
//!
//! Component H of the OCS core: per-read threshold re-encryption over a
//! Feldman-VSS-shared secret, verified locally by each participant
//! before it contributes a partial share.

#![warn(missing_docs)]

pub mod error;
pub mod reencrypt;
pub mod roster;

pub use error::ReencryptError;
pub use reencrypt::{reencrypt, threshold, verify_reencryption, PartialShare, ReencryptStart};
pub use roster::{collect_shares, SharePeer};
