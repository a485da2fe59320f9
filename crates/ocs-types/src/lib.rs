//! # Core Domain Types
//!
//! Shared primitive types for the OCS (On-Chain Secrets) workspace: hashes,
//! identities, roles, and the small set of errors every component's local
//! error enum eventually folds into.
//!
//! ## Clusters
//!
//! - **Primitives**: `Hash`, `Signature`, `PublicKeyBytes`, `Timestamp`
//! - **Identity**: `Identity`, `Role`
//! - **Errors**: `ParseIdentityError`

#![warn(missing_docs)]

pub mod identity;
pub mod primitives;

pub use identity::{Identity, ParseIdentityError, Role};
pub use primitives::{Hash, PublicKeyBytes, Signature, Timestamp};
