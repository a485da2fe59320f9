//! Scenario 3: an evolved darc posted with a version that doesn't
//! strictly advance past the base id's current latest is rejected with
//! `PolicyDenied` (the façade folds `LedgerError::StaleDarcVersion` into
//! that kind, not a distinct one — policy and staleness share the same
//! "not admitted as a valid evolution" verdict).

use ocs_darc::{Darc, Rules, Signer};
use ocs_service::OcsError;

#[tokio::test]
async fn replaying_an_old_version_number_is_rejected() {
    let cluster = ocs_tests::build_cluster(4).await;
    let roster = ocs_tests::roster_identities(4);

    let owner = Signer::generate();
    let genesis = Darc::new(vec![owner.identity()], vec![], Rules::new());

    let (chain_id, _x) = cluster[0]
        .create_skipchain(roster, genesis.clone())
        .await
        .unwrap();

    // Evolve once to version 1, legitimately.
    let mut v1 = Darc::evolve_from(&genesis, vec![owner.identity()], vec![], Rules::new());
    v1.sign(&owner, vec![genesis.base_id]).unwrap();
    cluster[0].update_darc(chain_id, v1.clone()).await.unwrap();

    // Now try to post a "new" version that doesn't advance past the
    // latest known version (1): same version number again.
    let mut stale = Darc::evolve_from(&genesis, vec![owner.identity()], vec![], Rules::new());
    stale.version = 1;
    stale.sign(&owner, vec![genesis.base_id]).unwrap();

    let result = cluster[0].update_darc(chain_id, stale).await;
    assert!(matches!(result, Err(OcsError::PolicyDenied(_))));
}
