//! # Service Facade
//!
//! Component I of the OCS core: the single entry point `ocs-node`'s RPC
//! layer calls into. Wraps every other component behind one process-wide
//! lock and the unified [`error::OcsError`].

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod persistence;
pub mod ports;
pub mod service;

pub use config::ServiceConfig;
pub use error::OcsError;
pub use persistence::{FilePersistence, MemoryPersistence, PersistenceAdapter, STORAGE_KEY};
pub use ports::SkipchainWriteLookup;
pub use service::{BlockPeer, DecryptedKey, LocalSharePeer, OcsService, Peers};
