//! Scenario 6: a transaction timestamped well outside the accepted
//! clock-skew window is rejected, never committed — exercised directly
//! against the verifier and a real skipchain/storage pair (the façade
//! itself always stamps `now()`, so producing a skewed transaction needs
//! to happen below that layer, same components `ocs-service` wires).

use ocs_darc::{Darc, DarcSignature, Rules, Signer};
use ocs_ledger::{verify_transaction_with_window, Transaction, Write};
use ocs_service::SkipchainWriteLookup;
use ocs_skipchain::{MemorySkipchainStore, SkipchainStore};
use ocs_storage::Storage;

fn sign(signer: &Signer, message: &[u8]) -> DarcSignature {
    let sig = signer.sign(message).unwrap();
    DarcSignature {
        signer: signer.identity(),
        path: vec![],
        signature: *sig.as_bytes(),
    }
}

fn now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64
}

#[test]
fn transaction_120s_old_is_rejected_with_a_60s_window() {
    let storage = Storage::default();
    let skipchain = MemorySkipchainStore::default();

    let writer = Signer::generate();
    let admin = Darc::new(vec![], vec![writer.identity()], Rules::new());
    let genesis = skipchain
        .genesis(vec![[1u8; 32]], Transaction::darc(now(), admin.clone()))
        .unwrap();
    storage.insert_darc(admin.clone()).unwrap();
    storage.set_admin(genesis.skipchain_id, admin.clone());

    let reader_darc = Darc::new(vec![], vec![], Rules::new());
    let write = Write {
        u: [0u8; 32],
        cs: vec![],
        reader: reader_darc.clone(),
        signature: sign(&writer, &reader_darc.id()),
    };
    let stale_tx = Transaction::write(now() - 120, write, Some(reader_darc));

    let verify = |tx: &Transaction| {
        verify_transaction_with_window(
            tx,
            genesis.skipchain_id,
            now(),
            60,
            &storage,
            &storage,
            &SkipchainWriteLookup(&skipchain),
        )
    };
    let result = skipchain.append(&genesis, stale_tx, &verify);
    assert!(result.is_err(), "120s-old transaction must miss a 60s window");

    assert_eq!(
        skipchain.latest(genesis.skipchain_id).unwrap().hash,
        genesis.hash,
        "the stale transaction must not have advanced the chain"
    );
}

#[test]
fn transaction_within_the_window_is_accepted() {
    let storage = Storage::default();
    let skipchain = MemorySkipchainStore::default();

    let writer = Signer::generate();
    let admin = Darc::new(vec![], vec![writer.identity()], Rules::new());
    let genesis = skipchain
        .genesis(vec![[1u8; 32]], Transaction::darc(now(), admin.clone()))
        .unwrap();
    storage.insert_darc(admin.clone()).unwrap();
    storage.set_admin(genesis.skipchain_id, admin.clone());

    let reader_darc = Darc::new(vec![], vec![], Rules::new());
    let write = Write {
        u: [0u8; 32],
        cs: vec![],
        reader: reader_darc.clone(),
        signature: sign(&writer, &reader_darc.id()),
    };
    let fresh_tx = Transaction::write(now() - 10, write, Some(reader_darc));

    let verify = |tx: &Transaction| {
        verify_transaction_with_window(
            tx,
            genesis.skipchain_id,
            now(),
            60,
            &storage,
            &storage,
            &SkipchainWriteLookup(&skipchain),
        )
    };
    skipchain
        .append(&genesis, fresh_tx, &verify)
        .expect("10s-old transaction falls within a 60s window");
}
