//! Snapshot resolution
//!
//! Flattens everything that governs one resource into an [`AcpSnapshot`]:
//! the union of the ACR's four policy-URL sets, plus every matcher those
//! policies reference, fetched through an abstract [`ResourceFetcher`].
//!
//! Resolution rules:
//! - each distinct backing resource (URL without fragment) is fetched at
//!   most once; independent fetches run concurrently
//! - objects scoped to the ACR itself resolve from the ACR's own dataset
//!   without touching the fetcher
//! - a fetch failure is recorded in `inaccessible_urls`, never raised -
//!   the engine's determinacy gate turns it into "indeterminate"
//! - a subject missing from a successfully fetched document is simply
//!   absent, not inaccessible
//!
//! Network transport, retries and parsing live behind the fetcher trait.

use acp_core::{Iri, ThingDataset};
use acp_policy::{AccessControlResource, AcpSnapshot, Matcher, Policy, ResourceWithAcr};
use async_trait::async_trait;
use futures::future::join_all;
use rustc_hash::FxHashMap;
use std::collections::BTreeSet;

/// Fetches the RDF document backing a URL
///
/// Implementations own transport, authentication, retries and
/// deserialization. `url` never carries a fragment.
#[async_trait]
pub trait ResourceFetcher: Send + Sync {
    /// Fetch every subject stored in the document at `url`
    async fn fetch_dataset(&self, url: &Iri) -> acp_core::Result<ThingDataset>;
}

/// Fetched documents keyed by base URL; `None` marks a failed fetch
struct DocumentCache {
    docs: FxHashMap<Iri, Option<ThingDataset>>,
}

impl DocumentCache {
    fn new() -> Self {
        Self {
            docs: FxHashMap::default(),
        }
    }

    /// Fetch every base URL not yet cached, concurrently
    async fn populate(&mut self, fetcher: &dyn ResourceFetcher, bases: BTreeSet<Iri>) {
        let missing: Vec<Iri> = bases
            .into_iter()
            .filter(|base| !self.docs.contains_key(base))
            .collect();
        if missing.is_empty() {
            return;
        }
        let fetched = join_all(missing.iter().map(|base| fetcher.fetch_dataset(base))).await;
        for (base, result) in missing.into_iter().zip(fetched) {
            match result {
                Ok(dataset) => {
                    self.docs.insert(base, Some(dataset));
                }
                Err(error) => {
                    tracing::warn!(url = %base, %error, "policy resource fetch failed");
                    self.docs.insert(base, None);
                }
            }
        }
    }

    /// The subject at `url`, distinguishing absence from fetch failure
    fn subject(&self, url: &Iri) -> Lookup<'_> {
        match self.docs.get(&url.base()) {
            Some(Some(dataset)) => match dataset.get(url) {
                Some(thing) => Lookup::Present(thing),
                None => Lookup::Absent,
            },
            Some(None) => Lookup::Unreachable,
            None => Lookup::Absent,
        }
    }
}

/// Outcome of looking a subject up in the document cache
enum Lookup<'a> {
    /// The document fetched and carries the subject
    Present(&'a acp_core::Thing),
    /// The document fetched (or was never requested) without the subject
    Absent,
    /// The document could not be fetched
    Unreachable,
}

fn external_bases<'a>(urls: impl Iterator<Item = &'a Iri>, acr_base: &Iri) -> BTreeSet<Iri> {
    urls.map(Iri::base).filter(|base| base != acr_base).collect()
}

/// Resolve the full policy/matcher bundle for a resource
///
/// Returns `None` when the resource carries no accessible ACR. Any other
/// failure mode lands in the snapshot's `inaccessible_urls`.
pub async fn resolve_acp_snapshot(
    resource: &ResourceWithAcr,
    fetcher: &dyn ResourceFetcher,
) -> Option<AcpSnapshot> {
    let acr = resource.acr()?;
    let acr_base = acr.url().base();
    let mut cache = DocumentCache::new();
    let mut inaccessible: BTreeSet<Iri> = BTreeSet::new();

    let all_policy_urls: BTreeSet<&Iri> = acr
        .policy_urls()
        .iter()
        .chain(acr.member_policy_urls())
        .chain(acr.acr_policy_urls())
        .chain(acr.member_acr_policy_urls())
        .collect();

    cache
        .populate(
            fetcher,
            external_bases(all_policy_urls.iter().copied(), &acr_base),
        )
        .await;

    let resolve_policy = |cache: &DocumentCache,
                          inaccessible: &mut BTreeSet<Iri>,
                          url: &Iri|
     -> Option<Policy> {
        if url.base() == acr_base {
            return acr.scoped_policy(url);
        }
        match cache.subject(url) {
            Lookup::Present(thing) => Some(Policy::from_thing(thing)),
            Lookup::Absent => None,
            Lookup::Unreachable => {
                inaccessible.insert(url.base());
                None
            }
        }
    };

    let mut acr_policies = Vec::new();
    for url in acr.acr_policy_urls() {
        if let Some(policy) = resolve_policy(&cache, &mut inaccessible, url) {
            acr_policies.push(policy);
        }
    }
    let mut policies = Vec::new();
    for url in acr.policy_urls() {
        if let Some(policy) = resolve_policy(&cache, &mut inaccessible, url) {
            policies.push(policy);
        }
    }
    // member policies govern children, not this resource, but their
    // reachability still gates determinacy and their matchers belong to
    // the bundle
    let mut member_policies = Vec::new();
    for url in acr.member_policy_urls().iter().chain(acr.member_acr_policy_urls()) {
        if let Some(policy) = resolve_policy(&cache, &mut inaccessible, url) {
            member_policies.push(policy);
        }
    }

    let matcher_urls: BTreeSet<&Iri> = acr_policies
        .iter()
        .chain(policies.iter())
        .chain(member_policies.iter())
        .flat_map(Policy::matcher_urls)
        .collect();

    cache
        .populate(
            fetcher,
            external_bases(matcher_urls.iter().copied(), &acr_base),
        )
        .await;

    let mut matchers = Vec::new();
    for url in matcher_urls {
        if url.base() == acr_base {
            if let Some(matcher) = acr.scoped_matcher(url) {
                matchers.push(matcher);
            }
            continue;
        }
        match cache.subject(url) {
            Lookup::Present(thing) => matchers.push(Matcher::from_thing(thing)),
            Lookup::Absent => {}
            Lookup::Unreachable => {
                inaccessible.insert(url.base());
            }
        }
    }

    tracing::debug!(
        policies = policies.len(),
        acr_policies = acr_policies.len(),
        matchers = matchers.len(),
        inaccessible = inaccessible.len(),
        "resolved acp snapshot"
    );

    Some(AcpSnapshot {
        acr_policies,
        policies,
        matchers,
        inaccessible_urls: inaccessible.into_iter().collect(),
    })
}

/// Resolve the ACR attached to a resource URL
///
/// Convenience for callers that track the ACR location themselves: fetches
/// the ACR document and pairs it with the resource. An unreachable ACR
/// yields a resource without one, which every engine operation treats as a
/// failed precondition.
pub async fn fetch_resource_with_acr(
    resource_url: &Iri,
    acr_url: &Iri,
    fetcher: &dyn ResourceFetcher,
) -> ResourceWithAcr {
    match fetcher.fetch_dataset(&acr_url.base()).await {
        Ok(dataset) => ResourceWithAcr::new(
            resource_url.clone(),
            AccessControlResource::from_dataset(acr_url.clone(), dataset),
        ),
        Err(error) => {
            tracing::warn!(url = %acr_url, %error, "acr fetch failed");
            ResourceWithAcr::without_acr(resource_url.clone())
        }
    }
}
