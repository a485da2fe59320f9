//! Scenario 4: a reader whose identity is not itself Ed25519-reinterpretable
//! as the target point supplies a fresh ephemeral group key and a
//! signature over it; `decryptKey` re-encrypts to that ephemeral point
//! instead of the reader's own identity.

use ocs_crypto::{GroupElement, GroupScalar};
use ocs_darc::{Darc, DarcSignature, Rules, Signer};
use ocs_ledger::{Read, Write};

fn sign(signer: &Signer, message: &[u8]) -> DarcSignature {
    let sig = signer.sign(message).unwrap();
    DarcSignature {
        signer: signer.identity(),
        path: vec![],
        signature: *sig.as_bytes(),
    }
}

#[tokio::test]
async fn read_with_ephemeral_key_reencrypts_to_it() {
    let cluster = ocs_tests::build_cluster(4).await;
    let roster = ocs_tests::roster_identities(4);

    let writer = Signer::generate();
    let reader = Signer::generate();
    let admin = Darc::new(vec![], vec![writer.identity()], Rules::new());

    let (chain_id, _x) = cluster[0].create_skipchain(roster, admin).await.unwrap();

    let reader_darc = Darc::new(vec![], vec![reader.identity()], Rules::new());
    let u_point = GroupElement::base_mul(GroupScalar::from_u64(21));
    let write = Write {
        u: u_point.to_bytes(),
        cs: vec![4, 5, 6],
        reader: reader_darc.clone(),
        signature: sign(&writer, &reader_darc.id()),
    };
    let write_block = cluster[0].write_request(chain_id, write).await.unwrap();

    let ephemeral_scalar = GroupScalar::random();
    let ephemeral_point = GroupElement::base_mul(ephemeral_scalar);
    let ephemeral_bytes = ephemeral_point.to_bytes();

    let read = Read {
        data_id: write_block.hash,
        signature: sign(&reader, &write_block.hash),
        ephemeral: Some(ephemeral_bytes),
    };
    let read_block = cluster[0].read_request(read).await.unwrap();

    // The reader signs the ephemeral key's bytes too, proving it minted
    // that key itself rather than an eavesdropper substituting one.
    let ephemeral_signature = sign(&reader, &ephemeral_bytes);

    let decrypted = cluster[2]
        .decrypt_key(read_block.hash, Some(ephemeral_bytes), Some(ephemeral_signature))
        .await
        .expect("ephemeral branch verifies and re-encrypts");

    assert_eq!(decrypted.cs, vec![4, 5, 6]);
    assert_ne!(decrypted.xhat_enc, u_point);
}

#[tokio::test]
async fn ephemeral_key_without_matching_signature_is_rejected() {
    let cluster = ocs_tests::build_cluster(4).await;
    let roster = ocs_tests::roster_identities(4);

    let writer = Signer::generate();
    let reader = Signer::generate();
    let eavesdropper = Signer::generate();
    let admin = Darc::new(vec![], vec![writer.identity()], Rules::new());

    let (chain_id, _x) = cluster[0].create_skipchain(roster, admin).await.unwrap();

    let reader_darc = Darc::new(vec![], vec![reader.identity()], Rules::new());
    let u_point = GroupElement::base_mul(GroupScalar::from_u64(22));
    let write = Write {
        u: u_point.to_bytes(),
        cs: vec![1],
        reader: reader_darc.clone(),
        signature: sign(&writer, &reader_darc.id()),
    };
    let write_block = cluster[0].write_request(chain_id, write).await.unwrap();

    let ephemeral_point = GroupElement::base_mul(GroupScalar::random());
    let ephemeral_bytes = ephemeral_point.to_bytes();

    let read = Read {
        data_id: write_block.hash,
        signature: sign(&reader, &write_block.hash),
        ephemeral: Some(ephemeral_bytes),
    };
    let read_block = cluster[0].read_request(read).await.unwrap();

    // The eavesdropper signs the ephemeral key, not the actual reader.
    let forged_signature = sign(&eavesdropper, &ephemeral_bytes);

    let result = cluster[0]
        .decrypt_key(read_block.hash, Some(ephemeral_bytes), Some(forged_signature))
        .await;
    assert!(result.is_err());
}
