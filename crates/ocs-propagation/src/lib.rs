//! # Propagation Adapter
//!
//! Component E of the OCS core: roster broadcast with reply counting.
//! Transport is in-process in this core (each member is a
//! [`roster::PeerEndpoint`] wrapping its own façade directly) — a real
//! network transport is out of scope.

#![warn(missing_docs)]

pub mod broadcast;
pub mod roster;

pub use broadcast::{broadcast, BroadcastReport};
pub use roster::{PeerEndpoint, Roster};
