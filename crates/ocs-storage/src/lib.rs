//! # Storage Index
//!
//! Component F of the OCS core: the authoritative in-memory mirror of
//! chain state (spec §3) — `Accounts`, `Admins`, `Shared`, `Polys` — kept
//! behind a single `parking_lot::RwLock` and exposed through
//! [`StorageApi`] so `ocs-ledger`'s verifier and `ocs-service`'s façade
//! never depend on the concrete map layout.

#![warn(missing_docs)]

pub mod accounts;
pub mod error;
pub mod shared;
pub mod storage;

pub use accounts::Accounts;
pub use error::StorageError;
pub use shared::SharedSecret;
pub use storage::{Snapshot, Storage, StorageApi};
