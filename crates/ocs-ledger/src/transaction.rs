//! The tagged transaction record carried inside each block (spec §3).

use ocs_darc::{Darc, DarcSignature};
use ocs_types::{Hash, PublicKeyBytes, Timestamp};
use serde::{Deserialize, Serialize};

/// A write request: a ciphertext whose symmetric key is encrypted to the
/// chain's collective key `X`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Write {
    /// The blinding factor: the symmetric key encrypted to `X`, as a
    /// serialized group element.
    pub u: [u8; 32],
    /// Encrypted payload blocks.
    pub cs: Vec<u8>,
    /// The genesis darc governing who may read this write.
    pub reader: Darc,
    /// Signature over `reader.id()` by a writer (a `User` of the chain's
    /// admin darc).
    pub signature: DarcSignature,
}

/// A read request against a previously written block.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Read {
    /// The id of the write block being read.
    pub data_id: Hash,
    /// Signature over `data_id` by the reader (a `User` of the write's
    /// reader darc).
    pub signature: DarcSignature,
    /// An ephemeral group public key to re-encrypt to, for readers whose
    /// identity is not itself an Ed25519 key.
    pub ephemeral: Option<PublicKeyBytes>,
}

/// The tagged record stored in each block. Exactly one of `darc`, `write`,
/// `read` is the common case, but `darc` and `write` may both be present
/// on one transaction when a write names a reader darc not yet known to
/// the chain — its genesis version commits atomically alongside the
/// write.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Seconds since epoch, checked against the verifier's 60s window.
    pub timestamp: Timestamp,
    /// A new darc version (genesis or evolution).
    pub darc: Option<Darc>,
    /// A write request.
    pub write: Option<Write>,
    /// A read request.
    pub read: Option<Read>,
}

impl Transaction {
    /// A bare timestamp transaction with no darc/write/read payload.
    pub fn heartbeat(timestamp: Timestamp) -> Self {
        Self {
            timestamp,
            darc: None,
            write: None,
            read: None,
        }
    }

    /// A darc-only transaction.
    pub fn darc(timestamp: Timestamp, darc: Darc) -> Self {
        Self {
            timestamp,
            darc: Some(darc),
            write: None,
            read: None,
        }
    }

    /// A write transaction, optionally carrying the reader darc's genesis
    /// version alongside it when the reader darc is not yet known.
    pub fn write(timestamp: Timestamp, write: Write, reader_genesis: Option<Darc>) -> Self {
        Self {
            timestamp,
            darc: reader_genesis,
            write: Some(write),
            read: None,
        }
    }

    /// A read transaction.
    pub fn read(timestamp: Timestamp, read: Read) -> Self {
        Self {
            timestamp,
            darc: None,
            write: None,
            read: Some(read),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrips_through_bincode() {
        let tx = Transaction::heartbeat(1_700_000_000);
        let bytes = bincode::serialize(&tx).unwrap();
        let decoded: Transaction = bincode::deserialize(&bytes).unwrap();
        assert_eq!(tx, decoded);
    }
}
