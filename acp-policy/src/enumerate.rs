//! Actor enumeration
//!
//! Lists every actor a snapshot's matchers explicitly name for a relation.
//! Sentinel IRIs denote classes of actors, not individuals, and are
//! excluded.

use crate::model::ActorRelation;
use crate::snapshot::AcpSnapshot;
use acp_core::Iri;
use acp_vocab::{is_agent_sentinel, is_client_sentinel};
use std::collections::BTreeSet;

/// Every actor IRI explicitly named for the relation, sentinels excluded
pub fn find_actor_all(snapshot: &AcpSnapshot, relation: ActorRelation) -> BTreeSet<Iri> {
    let is_sentinel: fn(&str) -> bool = match relation {
        ActorRelation::Agent => is_agent_sentinel,
        ActorRelation::Client => is_client_sentinel,
    };
    snapshot
        .matchers
        .iter()
        .flat_map(|m| m.actors(relation).iter())
        .filter(|actor| !is_sentinel(actor.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Matcher;
    use acp_vocab::{acp, solid};

    fn iri(s: &str) -> Iri {
        Iri::new(s)
    }

    #[test]
    fn test_excludes_agent_sentinels() {
        let m = Matcher::new(iri("https://pod.example/acr#m1"))
            .with_actor(ActorRelation::Agent, iri("https://example.org/alice#me"))
            .with_actor(ActorRelation::Agent, iri(acp::PUBLIC_AGENT))
            .with_actor(ActorRelation::Agent, iri(acp::AUTHENTICATED_AGENT))
            .with_actor(ActorRelation::Agent, iri(acp::CREATOR_AGENT));
        let snapshot = AcpSnapshot {
            matchers: vec![m],
            ..AcpSnapshot::default()
        };
        let actors = find_actor_all(&snapshot, ActorRelation::Agent);
        assert_eq!(actors.len(), 1);
        assert!(actors.contains(&iri("https://example.org/alice#me")));
    }

    #[test]
    fn test_excludes_client_sentinel() {
        let m = Matcher::new(iri("https://pod.example/acr#m1"))
            .with_actor(ActorRelation::Client, iri("https://app.example/id"))
            .with_actor(ActorRelation::Client, iri(solid::PUBLIC_OIDC_CLIENT));
        let snapshot = AcpSnapshot {
            matchers: vec![m],
            ..AcpSnapshot::default()
        };
        let actors = find_actor_all(&snapshot, ActorRelation::Client);
        assert_eq!(actors.len(), 1);
        assert!(actors.contains(&iri("https://app.example/id")));
    }

    #[test]
    fn test_unions_across_matchers() {
        let m1 = Matcher::new(iri("https://pod.example/acr#m1"))
            .with_actor(ActorRelation::Agent, iri("https://example.org/alice#me"));
        let m2 = Matcher::new(iri("https://pod.example/acr#m2"))
            .with_actor(ActorRelation::Agent, iri("https://example.org/alice#me"))
            .with_actor(ActorRelation::Agent, iri("https://example.org/bob#me"));
        let snapshot = AcpSnapshot {
            matchers: vec![m1, m2],
            ..AcpSnapshot::default()
        };
        let actors = find_actor_all(&snapshot, ActorRelation::Agent);
        assert_eq!(actors.len(), 2);
    }
}
