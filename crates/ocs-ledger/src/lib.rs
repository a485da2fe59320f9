//! # Transaction Record + Verifier
//!
//! Component C of the OCS core: the tagged transaction record stored in
//! each block, and the verifier callback the skipchain adapter invokes
//! before committing a candidate block.

#![warn(missing_docs)]

pub mod error;
pub mod ports;
pub mod transaction;
pub mod verify;

pub use error::LedgerError;
pub use ports::{AdminLookup, WriteLookup};
pub use transaction::{Read, Transaction, Write};
pub use verify::{
    verify_darc, verify_read, verify_signed_path, verify_transaction,
    verify_transaction_with_window, verify_write, TIMESTAMP_WINDOW_SECS,
};
