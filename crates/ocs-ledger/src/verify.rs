//! The transaction verifier callback (spec §4.C), invoked by the
//! skipchain adapter over every candidate block before it commits.

use crate::error::LedgerError;
use crate::ports::{AdminLookup, WriteLookup};
use crate::transaction::Transaction;
use ocs_darc::DarcLookup;
use ocs_types::{Hash, Role, Timestamp};
use tracing::{debug, instrument};

/// Width of the accepted clock-skew window, in seconds.
pub const TIMESTAMP_WINDOW_SECS: i64 = 60;

/// Verify a candidate transaction against the chain's current state.
/// Every present sub-field's check must pass; a failure aborts before any
/// state is mutated.
#[instrument(skip(tx, darc_lookup, admin_lookup, write_lookup), fields(chain = ?chain))]
pub fn verify_transaction(
    tx: &Transaction,
    chain: Hash,
    now: Timestamp,
    darc_lookup: &dyn DarcLookup,
    admin_lookup: &dyn AdminLookup,
    write_lookup: &dyn WriteLookup,
) -> Result<(), LedgerError> {
    verify_transaction_with_window(
        tx,
        chain,
        now,
        TIMESTAMP_WINDOW_SECS,
        darc_lookup,
        admin_lookup,
        write_lookup,
    )
}

/// As [`verify_transaction`], but with the clock-skew window as a
/// parameter rather than the fixed [`TIMESTAMP_WINDOW_SECS`] constant —
/// what `ocs-service`'s façade calls with its configured
/// `timestamp_window_secs` (spec §4.I ambient configuration).
#[instrument(skip(tx, darc_lookup, admin_lookup, write_lookup), fields(chain = ?chain))]
pub fn verify_transaction_with_window(
    tx: &Transaction,
    chain: Hash,
    now: Timestamp,
    window_secs: i64,
    darc_lookup: &dyn DarcLookup,
    admin_lookup: &dyn AdminLookup,
    write_lookup: &dyn WriteLookup,
) -> Result<(), LedgerError> {
    if (now - tx.timestamp).abs() > window_secs {
        return Err(LedgerError::TimestampOutOfWindow {
            timestamp: tx.timestamp,
            now,
        });
    }

    if let Some(darc) = &tx.darc {
        verify_darc(darc, darc_lookup)?;
        debug!(base_id = ?darc.base_id, version = darc.version, "darc verified");
    }

    if let Some(write) = &tx.write {
        verify_write(chain, write, admin_lookup, darc_lookup)?;
        debug!("write verified");
    }

    if let Some(read) = &tx.read {
        verify_read(read, write_lookup, darc_lookup)?;
        debug!(data_id = ?read.data_id, "read verified");
    }

    Ok(())
}

/// `verifyDarc(nd)`: replay + version-monotonicity + owner-signature check.
pub fn verify_darc(nd: &ocs_darc::Darc, darc_lookup: &dyn DarcLookup) -> Result<(), LedgerError> {
    if darc_lookup.version(nd.base_id, nd.version).is_some() {
        return Err(LedgerError::DarcReplay {
            base_id: nd.base_id,
            version: nd.version,
        });
    }

    match darc_lookup.latest_version(nd.base_id) {
        None => {
            if nd.version != 0 {
                return Err(LedgerError::StaleDarcVersion {
                    base_id: nd.base_id,
                    version: nd.version,
                    prev_version: 0,
                });
            }
            Ok(())
        }
        Some(prev) => {
            if nd.version <= prev.version {
                return Err(LedgerError::StaleDarcVersion {
                    base_id: nd.base_id,
                    version: nd.version,
                    prev_version: prev.version,
                });
            }
            nd.verify(&prev, darc_lookup)?;
            Ok(())
        }
    }
}

/// `verifyWrite(sc, w)`: the writer must be a `User` of the chain's admin
/// darc, signing over the reader darc's content hash.
pub fn verify_write(
    chain: Hash,
    write: &crate::transaction::Write,
    admin_lookup: &dyn AdminLookup,
    darc_lookup: &dyn DarcLookup,
) -> Result<(), LedgerError> {
    let admin = admin_lookup
        .admin_darc(chain)
        .ok_or(LedgerError::AdminNotFound(chain))?;

    verify_signed_path(
        &write.signature,
        write.reader.id(),
        &admin,
        Role::User,
        darc_lookup,
    )?;
    Ok(())
}

/// `verifyRead(r)`: the reader must be a `User` of the write's reader
/// darc, signing over the write block's id.
pub fn verify_read(
    read: &crate::transaction::Read,
    write_lookup: &dyn WriteLookup,
    darc_lookup: &dyn DarcLookup,
) -> Result<(), LedgerError> {
    let write = write_lookup
        .write_at(read.data_id)
        .ok_or(LedgerError::NotAWriteBlock(read.data_id))?;

    verify_signed_path(
        &read.signature,
        read.data_id,
        &write.reader,
        Role::User,
        darc_lookup,
    )?;
    Ok(())
}

/// Verify that `signature` was produced by an identity reachable from
/// `root` with `role`, over `message_id`'s bytes. Shared by the verifier
/// above and by `ocs-reencrypt`'s local `verifyReencryption` check, which
/// needs the same signed-path logic over a different message.
pub fn verify_signed_path(
    signature: &ocs_darc::DarcSignature,
    message_id: Hash,
    root: &ocs_darc::Darc,
    role: Role,
    darc_lookup: &dyn DarcLookup,
) -> Result<(), ocs_darc::DarcError> {
    let terminal_base_id = if signature.path.is_empty() {
        let path = ocs_darc::search_path(darc_lookup, root, &signature.signer, role)
            .ok_or(ocs_darc::DarcError::NoPath {
                base_id: root.base_id,
                role,
            })?;
        *path.last().expect("search_path never returns empty")
    } else {
        ocs_darc::verify_path(darc_lookup, root, &signature.path, role).ok_or(
            ocs_darc::DarcError::NoPath {
                base_id: root.base_id,
                role,
            },
        )?
    };

    let terminal = darc_lookup
        .latest_version(terminal_base_id)
        .ok_or(ocs_darc::DarcError::NotFound(terminal_base_id))?;

    let allowed = match role {
        Role::Owner => &terminal.owners,
        Role::User => &terminal.users,
    };
    if !allowed.contains(&signature.signer) {
        return Err(ocs_darc::DarcError::NoPath {
            base_id: terminal_base_id,
            role,
        });
    }

    let ocs_types::Identity::Ed25519(pk) = signature.signer else {
        return Err(ocs_darc::DarcError::NonSigningIdentity);
    };
    let public_key = ocs_crypto::Ed25519PublicKey::from_bytes(pk)
        .map_err(|_| ocs_darc::DarcError::BadSignature {
            base_id: terminal_base_id,
            version: terminal.version,
        })?;
    let raw_signature = ocs_crypto::Ed25519Signature::from_bytes(signature.signature);
    public_key
        .verify(&message_id, &raw_signature)
        .map_err(|_| ocs_darc::DarcError::BadSignature {
            base_id: terminal_base_id,
            version: terminal.version,
        })
}
