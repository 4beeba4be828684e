//! Full read-modify-write flow through the API surface
//!
//! Resolves a snapshot through a stub fetcher, rewrites one agent's
//! access, and re-resolves from the updated resource the way a caller
//! would after persisting the new ACR.

use acp_api::{
    get_agent_access, get_public_access, resolve_acp_snapshot, set_agent_access, AccessChange,
    AccessControlResource, ActorRelation, Iri, Matcher, ModeSet, Policy, ResourceFetcher,
    ResourceWithAcr, ThingDataset,
};
use async_trait::async_trait;
use rustc_hash::FxHashMap;
use std::sync::Mutex;

fn iri(s: &str) -> Iri {
    Iri::new(s)
}

fn alice() -> Iri {
    iri("https://example.org/alice#me")
}

fn bob() -> Iri {
    iri("https://example.org/bob#me")
}

fn acr_url() -> Iri {
    iri("https://pod.example/resource?ext=acr")
}

struct StubFetcher {
    docs: FxHashMap<Iri, ThingDataset>,
    log: Mutex<Vec<Iri>>,
}

impl StubFetcher {
    fn new() -> Self {
        Self {
            docs: FxHashMap::default(),
            log: Mutex::new(Vec::new()),
        }
    }

    fn insert_doc(&mut self, base: &str, things: Vec<acp_api::Thing>) {
        let mut dataset = ThingDataset::new();
        for thing in things {
            dataset.insert(thing);
        }
        self.docs.insert(iri(base), dataset);
    }

    fn fetch_count(&self) -> usize {
        self.log.lock().unwrap().len()
    }
}

#[async_trait]
impl ResourceFetcher for StubFetcher {
    async fn fetch_dataset(&self, url: &Iri) -> acp_core::Result<ThingDataset> {
        self.log.lock().unwrap().push(url.clone());
        self.docs
            .get(url)
            .cloned()
            .ok_or_else(|| acp_core::Error::not_found(url.as_str()))
    }
}

#[tokio::test]
async fn rewrite_over_externally_shared_policy() {
    // a reusable policy document grants {read, write} to alice and bob
    let matcher = Matcher::new(iri("https://pod.example/policies#team"))
        .with_actor(ActorRelation::Agent, alice())
        .with_actor(ActorRelation::Agent, bob());
    let policy = Policy::new(iri("https://pod.example/policies#editors"))
        .with_allow(ModeSet {
            read: true,
            append: false,
            write: true,
        })
        .with_any_of(matcher.url().clone());

    let mut fetcher = StubFetcher::new();
    fetcher.insert_doc(
        "https://pod.example/policies",
        vec![policy.to_thing(), matcher.to_thing()],
    );

    let mut acr = AccessControlResource::new(acr_url());
    acr.add_policy_url(policy.url().clone());
    let resource = ResourceWithAcr::new(iri("https://pod.example/resource"), acr);

    let snapshot = resolve_acp_snapshot(&resource, &fetcher).await.unwrap();
    assert_eq!(fetcher.fetch_count(), 1);

    let existing = get_agent_access(&snapshot, &alice()).unwrap().unwrap();
    assert!(existing.read);
    assert!(existing.write);

    // revoke alice's write; the shared policy must not be edited in place
    let updated = set_agent_access(
        &resource,
        &snapshot,
        &alice(),
        &AccessChange::new().with_write(false),
    )
    .unwrap()
    .unwrap();

    let updated_acr = updated.acr().unwrap();
    // the shared document's policy lost only its reference
    assert!(!updated_acr.policy_urls().contains(policy.url()));
    // a private clone and alice's own policy took its place
    assert_eq!(updated_acr.policy_urls().len(), 2);

    // after "persisting", re-resolve: the rewritten graph is fully
    // resource-scoped, so no further fetches are needed
    let before = fetcher.fetch_count();
    let refreshed = resolve_acp_snapshot(&updated, &fetcher).await.unwrap();
    assert_eq!(fetcher.fetch_count(), before);

    let alice_access = get_agent_access(&refreshed, &alice()).unwrap().unwrap();
    assert!(alice_access.read);
    assert!(!alice_access.write);

    let bob_access = get_agent_access(&refreshed, &bob()).unwrap().unwrap();
    assert!(bob_access.read);
    assert!(bob_access.write);
}

#[tokio::test]
async fn unreachable_policy_document_blocks_the_write_path() {
    let mut acr = AccessControlResource::new(acr_url());
    acr.add_policy_url(iri("https://gone.example/policies#missing"));
    let resource = ResourceWithAcr::new(iri("https://pod.example/resource"), acr);

    // the fetcher has no such document: the snapshot resolves but is
    // indeterminate, and the write path refuses to proceed
    let fetcher = StubFetcher::new();
    let snapshot = resolve_acp_snapshot(&resource, &fetcher).await.unwrap();
    assert!(snapshot.is_indeterminate());

    assert_eq!(get_agent_access(&snapshot, &alice()).unwrap(), None);
    assert_eq!(get_public_access(&snapshot), None);
    assert!(set_agent_access(
        &resource,
        &snapshot,
        &alice(),
        &AccessChange::new().with_read(true),
    )
    .unwrap()
    .is_none());
}
