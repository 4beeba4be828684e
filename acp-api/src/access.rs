//! Convenience read and write surface
//!
//! Thin wrappers around the engine that bind the agent relation to a
//! specific WebID or to one of the sentinel actor classes. The engine's
//! result conventions pass through unchanged: `None` means indeterminate
//! or a failed precondition, never an error.
//!
//! Passing a sentinel class IRI (`acp:PublicAgent` and friends) where an
//! individual WebID is expected is a caller bug and is rejected loudly.

use crate::error::{ApiError, Result};
use acp_core::Iri;
use acp_policy::{
    get_actor_access, get_actor_access_all, set_actor_access, Access, AccessChange, ActorRelation,
    AcpSnapshot, NameSalt, ResourceWithAcr,
};
use acp_vocab::{acp, is_agent_sentinel};
use std::collections::BTreeMap;

fn ensure_individual_agent(webid: &Iri) -> Result<()> {
    if is_agent_sentinel(webid.as_str()) {
        return Err(ApiError::invalid_actor(format!(
            "{} is a sentinel class, not an individual agent; use the \
             dedicated public/authenticated/creator functions",
            webid
        )));
    }
    Ok(())
}

/// The explicit access a snapshot grants one agent
pub fn get_agent_access(snapshot: &AcpSnapshot, webid: &Iri) -> Result<Option<Access>> {
    ensure_individual_agent(webid)?;
    Ok(get_actor_access(snapshot, ActorRelation::Agent, webid))
}

/// Access for every agent the snapshot's matchers explicitly name
pub fn get_agent_access_all(snapshot: &AcpSnapshot) -> Option<BTreeMap<Iri, Access>> {
    get_actor_access_all(snapshot, ActorRelation::Agent)
}

/// The explicit access granted to everyone
pub fn get_public_access(snapshot: &AcpSnapshot) -> Option<Access> {
    get_actor_access(snapshot, ActorRelation::Agent, &Iri::new(acp::PUBLIC_AGENT))
}

/// The explicit access granted to any authenticated agent
pub fn get_authenticated_access(snapshot: &AcpSnapshot) -> Option<Access> {
    get_actor_access(
        snapshot,
        ActorRelation::Agent,
        &Iri::new(acp::AUTHENTICATED_AGENT),
    )
}

/// The explicit access granted to the resource's creator
pub fn get_creator_access(snapshot: &AcpSnapshot) -> Option<Access> {
    get_actor_access(
        snapshot,
        ActorRelation::Agent,
        &Iri::new(acp::CREATOR_AGENT),
    )
}

/// Change one agent's access without disturbing other actors
///
/// The caller persists the returned resource's ACR.
pub fn set_agent_access(
    resource: &ResourceWithAcr,
    snapshot: &AcpSnapshot,
    webid: &Iri,
    change: &AccessChange,
) -> Result<Option<ResourceWithAcr>> {
    ensure_individual_agent(webid)?;
    Ok(set_actor_access(
        resource,
        snapshot,
        ActorRelation::Agent,
        webid,
        change,
        &NameSalt::generate(),
    ))
}

/// Change the access granted to everyone
pub fn set_public_access(
    resource: &ResourceWithAcr,
    snapshot: &AcpSnapshot,
    change: &AccessChange,
) -> Option<ResourceWithAcr> {
    set_actor_access(
        resource,
        snapshot,
        ActorRelation::Agent,
        &Iri::new(acp::PUBLIC_AGENT),
        change,
        &NameSalt::generate(),
    )
}

/// Change the access granted to any authenticated agent
pub fn set_authenticated_access(
    resource: &ResourceWithAcr,
    snapshot: &AcpSnapshot,
    change: &AccessChange,
) -> Option<ResourceWithAcr> {
    set_actor_access(
        resource,
        snapshot,
        ActorRelation::Agent,
        &Iri::new(acp::AUTHENTICATED_AGENT),
        change,
        &NameSalt::generate(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use acp_policy::{local_snapshot, AccessControlResource};

    fn iri(s: &str) -> Iri {
        Iri::new(s)
    }

    fn empty_resource() -> ResourceWithAcr {
        ResourceWithAcr::new(
            iri("https://pod.example/resource"),
            AccessControlResource::new(iri("https://pod.example/resource?ext=acr")),
        )
    }

    #[test]
    fn test_sentinel_webid_is_rejected() {
        let snapshot = AcpSnapshot::default();
        assert!(matches!(
            get_agent_access(&snapshot, &iri(acp::PUBLIC_AGENT)),
            Err(ApiError::InvalidActor { .. })
        ));
        assert!(matches!(
            set_agent_access(
                &empty_resource(),
                &snapshot,
                &iri(acp::CREATOR_AGENT),
                &AccessChange::new().with_read(true),
            ),
            Err(ApiError::InvalidActor { .. })
        ));
    }

    #[test]
    fn test_public_round_trip() {
        let resource = empty_resource();
        let snapshot = local_snapshot(&resource).unwrap();
        let updated = set_public_access(
            &resource,
            &snapshot,
            &AccessChange::new().with_read(true),
        )
        .unwrap();

        let refreshed = local_snapshot(&updated).unwrap();
        let public = get_public_access(&refreshed).unwrap();
        assert!(public.read);
        assert!(!public.write);
        // the sentinel grant is a class grant, not an individual listing
        assert!(get_agent_access_all(&refreshed).unwrap().is_empty());
    }

    #[test]
    fn test_authenticated_and_creator_are_distinct() {
        let resource = empty_resource();
        let snapshot = local_snapshot(&resource).unwrap();
        let updated = set_authenticated_access(
            &resource,
            &snapshot,
            &AccessChange::new().with_append(true),
        )
        .unwrap();

        let refreshed = local_snapshot(&updated).unwrap();
        assert!(get_authenticated_access(&refreshed).unwrap().append);
        assert!(!get_creator_access(&refreshed).unwrap().append);
        assert!(!get_public_access(&refreshed).unwrap().append);
    }

    #[test]
    fn test_indeterminate_passes_through() {
        let snapshot = AcpSnapshot {
            inaccessible_urls: vec![iri("https://other.example/policies")],
            ..AcpSnapshot::default()
        };
        assert_eq!(
            get_agent_access(&snapshot, &iri("https://example.org/alice#me")).unwrap(),
            None
        );
        assert_eq!(get_public_access(&snapshot), None);
        assert_eq!(get_agent_access_all(&snapshot), None);
    }
}
