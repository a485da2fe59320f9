//! The roster and the in-process peer endpoint each member exposes.

use async_trait::async_trait;
use ocs_types::PublicKeyBytes;
use std::sync::Arc;

/// A roster member's delivery surface. In this core, transport is
/// in-process — each member's `ocs-service` façade is wrapped behind one
/// of these rather than a real network client (a real QUIC/libp2p
/// transport is out of scope).
#[async_trait]
pub trait PeerEndpoint: Send + Sync {
    /// Deliver `message` to this peer; `true` iff the peer acknowledged
    /// it (processed without erroring).
    async fn deliver(&self, message: Arc<[u8]>) -> bool;
}

/// The ordered list of servers cooperatively maintaining one chain,
/// paired with their in-process delivery endpoints.
#[derive(Clone, Default)]
pub struct Roster {
    members: Vec<(PublicKeyBytes, Arc<dyn PeerEndpoint>)>,
}

impl Roster {
    /// An empty roster.
    pub fn new() -> Self {
        Self {
            members: Vec::new(),
        }
    }

    /// Add a member.
    pub fn push(&mut self, identity: PublicKeyBytes, endpoint: Arc<dyn PeerEndpoint>) {
        self.members.push((identity, endpoint));
    }

    /// Number of members in the roster.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the roster has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Iterate over `(identity, endpoint)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = &(PublicKeyBytes, Arc<dyn PeerEndpoint>)> {
        self.members.iter()
    }

    /// The plain identity list, in roster order.
    pub fn identities(&self) -> Vec<PublicKeyBytes> {
        self.members.iter().map(|(id, _)| *id).collect()
    }
}
