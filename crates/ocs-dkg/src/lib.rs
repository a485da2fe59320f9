//! # DKG Orchestrator
//!
//! Component G of the OCS core: bootstraps a chain's collective key via
//! a star-tree broadcast, then persists each node's resulting share and
//! the public polynomial into [`ocs_storage::StorageApi`].

#![warn(missing_docs)]

pub mod dkg;
pub mod error;

pub use dkg::{run_dkg, run_dkg_with_timeout, DkgComplete, DkgPeer, DkgStart, DKG_TIMEOUT};
pub use error::DkgError;
