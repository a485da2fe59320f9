//! # Skipchain Adapter
//!
//! Component D of the OCS core: the append-only, roster-scoped block
//! sequence the core treats as a black box beyond `genesis`/`append`/
//! `by_id`/`latest` and the verifier hook `append` invokes before
//! committing.

#![warn(missing_docs)]

pub mod block;
pub mod error;
pub mod store;

pub use block::Block;
pub use error::SkipchainError;
pub use store::{FileSkipchainStore, MemorySkipchainStore, SkipchainStore};
