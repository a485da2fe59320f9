//! Scenario 5: a 4-member roster tolerates one member being down for
//! `decryptKey` (`t = 4 - floor(3/3) = 3`), but not two.

use ocs_crypto::{GroupElement, GroupScalar};
use ocs_darc::{Darc, DarcSignature, Rules, Signer};
use ocs_ledger::{Read, Write};
use ocs_service::OcsError;

fn sign(signer: &Signer, message: &[u8]) -> DarcSignature {
    let sig = signer.sign(message).unwrap();
    DarcSignature {
        signer: signer.identity(),
        path: vec![],
        signature: *sig.as_bytes(),
    }
}

async fn write_and_read(
    cluster: &[std::sync::Arc<ocs_service::OcsService<ocs_storage::Storage>>],
) -> ocs_types::Hash {
    let roster = ocs_tests::roster_identities(4);
    let writer = Signer::generate();
    let reader = Signer::generate();
    let admin = Darc::new(vec![], vec![writer.identity()], Rules::new());

    let (chain_id, _x) = cluster[0].create_skipchain(roster, admin).await.unwrap();

    let reader_darc = Darc::new(vec![], vec![reader.identity()], Rules::new());
    let write = Write {
        u: GroupElement::base_mul(GroupScalar::from_u64(33)).to_bytes(),
        cs: vec![42],
        reader: reader_darc.clone(),
        signature: sign(&writer, &reader_darc.id()),
    };
    let write_block = cluster[0].write_request(chain_id, write).await.unwrap();

    let read = Read {
        data_id: write_block.hash,
        signature: sign(&reader, &write_block.hash),
        ephemeral: None,
    };
    cluster[0].read_request(read).await.unwrap().hash
}

#[tokio::test]
async fn one_node_down_still_reaches_threshold() {
    let cluster = ocs_tests::build_cluster_excluding(4, &[4]).await;
    let read_hash = write_and_read(&cluster).await;

    let decrypted = cluster[0]
        .decrypt_key(read_hash, None, None)
        .await
        .expect("3 of 4 shares still meets t = 3");
    assert_eq!(decrypted.cs, vec![42]);
}

#[tokio::test]
async fn two_nodes_down_misses_threshold() {
    let cluster = ocs_tests::build_cluster_excluding(4, &[3, 4]).await;
    let read_hash = write_and_read(&cluster).await;

    let result = cluster[0].decrypt_key(read_hash, None, None).await;
    assert!(matches!(result, Err(OcsError::CryptoFailure(_))));
}
