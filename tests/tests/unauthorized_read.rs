//! Scenario 2: a read signed by someone absent from the write's reader
//! darc is rejected with `PolicyDenied`, not committed.

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

#[tokio::test]
async fn read_from_non_reader_is_rejected() {
    let cluster = ocs_tests::build_cluster(4).await;
    let roster = ocs_tests::roster_identities(4);

    let writer = Signer::generate();
    let reader = Signer::generate();
    let impostor = Signer::generate();
    let admin = Darc::new(vec![], vec![writer.identity()], Rules::new());

    let (chain_id, _x) = cluster[0].create_skipchain(roster, admin).await.unwrap();

    let reader_darc = Darc::new(vec![], vec![reader.identity()], Rules::new());
    let write = Write {
        u: GroupElement::base_mul(GroupScalar::from_u64(11)).to_bytes(),
        cs: vec![1, 2, 3],
        reader: reader_darc.clone(),
        signature: sign(&writer, &reader_darc.id()),
    };
    let write_block = cluster[0].write_request(chain_id, write).await.unwrap();

    let read = Read {
        data_id: write_block.hash,
        signature: sign(&impostor, &write_block.hash),
        ephemeral: None,
    };
    let result = cluster[0].read_request(read).await;
    assert!(matches!(result, Err(OcsError::PolicyDenied(_))));
}
