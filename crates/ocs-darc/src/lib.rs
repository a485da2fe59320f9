//! # DARC Model
//!
//! Component B of the OCS core: policy objects, rule evaluation,
//! evolution, and the path-search algorithm that decides whether an
//! identity satisfies a role (`Owner`/`User`) for a root darc, possibly
//! through a chain of darc-variant identities.

#![warn(missing_docs)]

pub mod darc;
pub mod error;
pub mod path;
pub mod rules;
pub mod signer;

pub use darc::{Darc, DarcSignature};
pub use error::DarcError;
pub use path::{search_path, verify_path, DarcLookup};
pub use rules::Rules;
pub use signer::Signer;
