//! Per-read threshold re-encryption (spec §4.H): a star-tree broadcast of
//! a verifiable re-encryption request, each participant's local
//! `verifyReencryption` check, and Lagrange recovery of the combined
//! share above a `t = n - ⌊(n-1)/3⌋` threshold.

use crate::error::ReencryptError;
use crate::roster::{collect_shares, SharePeer};
use ocs_crypto::shamir::recover_commit;
use ocs_crypto::GroupElement;
use ocs_darc::{DarcLookup, DarcSignature};
use ocs_skipchain::SkipchainStore;
use ocs_storage::StorageApi;
use ocs_types::{Hash, Identity, Role};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;

/// `t = n - ⌊(n-1)/3⌋ = ⌈2n/3⌉`: tolerates up to `⌊(n-1)/3⌋` non-responsive
/// or faulty participants.
pub fn threshold(n: usize) -> usize {
    n - (n - 1) / 3
}

/// The broadcast re-encryption request every roster member verifies
/// independently before contributing a share.
#[derive(Clone, Serialize, Deserialize)]
pub struct ReencryptStart {
    /// Chain the read was committed to.
    pub chain_id: Hash,
    /// Hash of the read block (`VerificationData.SB`).
    pub read_block_hash: Hash,
    /// `W.Write.U`, serialized.
    pub u: [u8; 32],
    /// The point to re-encrypt to: the ephemeral key if supplied, else
    /// the read's Ed25519 signer reinterpreted into this group.
    pub xc: [u8; 32],
    /// An ephemeral group public key, for readers whose identity is not
    /// itself Ed25519.
    pub ephemeral: Option<[u8; 32]>,
    /// A fresh signature over `ephemeral`'s bytes by the read's signer,
    /// required whenever `ephemeral` is set (proves the reader, not an
    /// eavesdropper, minted this ephemeral key).
    pub ephemeral_signature: Option<DarcSignature>,
}

/// This node's partial re-encryption share, `U^{v_i}`.
#[derive(Clone, Serialize, Deserialize)]
pub struct PartialShare {
    /// 1-indexed participant position.
    pub index: u32,
    /// `U^{v_i}`, serialized.
    pub value: [u8; 32],
}

/// `verifyReencryption`: confirm `start`'s claimed `Xc` is consistent
/// with the read block it references, following whichever of the two
/// branches applies.
#[instrument(skip(start, skipchain, darc_lookup))]
pub fn verify_reencryption(
    start: &ReencryptStart,
    skipchain: &dyn SkipchainStore,
    darc_lookup: &dyn DarcLookup,
) -> Result<(), ReencryptError> {
    let read_block = skipchain
        .by_id(start.read_block_hash)
        .ok_or(ReencryptError::NotAReadBlock(start.read_block_hash))?;
    let read = read_block
        .transaction
        .read
        .clone()
        .ok_or(ReencryptError::NotAReadBlock(start.read_block_hash))?;
    let write_block = skipchain
        .by_id(read.data_id)
        .ok_or(ReencryptError::NotAWriteBlock(read.data_id))?;
    let write = write_block
        .transaction
        .write
        .clone()
        .ok_or(ReencryptError::NotAWriteBlock(read.data_id))?;

    match (start.ephemeral, &start.ephemeral_signature) {
        (Some(ephemeral), Some(signature)) => {
            if signature.signer != read.signature.signer {
                return Err(ReencryptError::XcMismatch);
            }
            ocs_ledger::verify_signed_path(
                signature,
                ephemeral,
                &write.reader,
                Role::User,
                darc_lookup,
            )?;
            let expected = GroupElement::from_bytes(&ephemeral)?;
            if expected.to_bytes() != start.xc {
                return Err(ReencryptError::XcMismatch);
            }
        }
        (Some(_), None) => return Err(ReencryptError::XcMismatch),
        (None, _) => {
            let Identity::Ed25519(pk) = read.signature.signer else {
                return Err(ReencryptError::NonEd25519SignerWithoutEphemeral);
            };
            let expected = GroupElement::from_ed25519_pubkey(&pk);
            if expected.to_bytes() != start.xc {
                return Err(ReencryptError::XcMismatch);
            }
        }
    }

    Ok(())
}

/// Run re-encryption for the read block at `read_block_hash`, as the
/// proposing server. Collects shares from `peers` with no timeout;
/// succeeds once at least `t` valid shares arrive. `t` is computed by
/// the caller from the chain's full roster size (spec §4.H step 1),
/// independently of how many `peers` are actually dialed.
#[instrument(skip(peers))]
pub async fn reencrypt(
    chain_id: Hash,
    read_block_hash: Hash,
    u: GroupElement,
    xc: GroupElement,
    ephemeral: Option<[u8; 32]>,
    ephemeral_signature: Option<DarcSignature>,
    peers: &[Arc<dyn SharePeer>],
    t: usize,
) -> Result<GroupElement, ReencryptError> {
    let start = ReencryptStart {
        chain_id,
        read_block_hash,
        u: u.to_bytes(),
        xc: xc.to_bytes(),
        ephemeral,
        ephemeral_signature,
    };
    let payload = bincode::serialize(&start).map_err(|e| ReencryptError::Encoding(e.to_string()))?;
    let message: Arc<[u8]> = Arc::from(payload.into_boxed_slice());

    let shares = collect_shares(peers, message).await;
    if shares.len() < t {
        return Err(ReencryptError::InsufficientShares {
            got: shares.len(),
            threshold: t,
        });
    }

    let partials = shares
        .iter()
        .map(|s| Ok((s.index, GroupElement::from_bytes(&s.value)?)))
        .collect::<Result<Vec<_>, ocs_crypto::CryptoError>>()?;

    Ok(recover_commit(&partials, t)?)
}
