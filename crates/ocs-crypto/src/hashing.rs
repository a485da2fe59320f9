//! # Blake3 Hashing
//!
//! Fast, SIMD-accelerated hashing for block/DARC content addressing.

use ocs_types::Hash;

/// Hash an arbitrary byte string to a 32-byte digest.
pub fn blake3_hash(data: &[u8]) -> Hash {
    *blake3::hash(data).as_bytes()
}

/// Hash the concatenation of several byte strings without an intermediate
/// allocation, matching the multi-field hashing the ledger needs for
/// block/DARC ids.
pub fn blake3_hash_many(parts: &[&[u8]]) -> Hash {
    let mut hasher = blake3::Hasher::new();
    for part in parts {
        hasher.update(part);
    }
    *hasher.finalize().as_bytes()
}
