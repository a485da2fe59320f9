//! Outbound ports the verifier consults. Implemented by `ocs-storage`'s
//! adapter; kept as traits here so this crate depends on an interface,
//! not a concrete map layout.

use crate::transaction::Write;
use ocs_types::Hash;

/// Resolves a chain's admin (genesis writer) darc.
pub trait AdminLookup {
    /// The admin darc for `chain`, if the chain's genesis has committed.
    fn admin_darc(&self, chain: Hash) -> Option<ocs_darc::Darc>;
}

/// Resolves the write transaction a read request targets.
pub trait WriteLookup {
    /// The write transaction committed under block id `data_id`, if that
    /// block exists and is a write block.
    fn write_at(&self, data_id: Hash) -> Option<Write>;
}
