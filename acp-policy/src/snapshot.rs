//! AcpSnapshot - the flattened query bundle for one resource
//!
//! A snapshot is a point-in-time flattening of every Policy and Matcher
//! that applies to one resource, plus the list of URLs the resolver could
//! not fetch. It is never persisted.
//!
//! INVARIANT: a snapshot with any inaccessible URL is indeterminate - no
//! read or write operation may produce a result from it.

use crate::model::{Matcher, Policy, ResourceWithAcr};
use acp_core::Iri;
use rustc_hash::FxHashSet;

/// Flattened Policies/Matchers resolved for one resource
#[derive(Clone, Debug, Default)]
pub struct AcpSnapshot {
    /// Policies applying to the ACR itself
    pub acr_policies: Vec<Policy>,
    /// Policies applying to the governed resource
    pub policies: Vec<Policy>,
    /// Every matcher reachable from the policies
    pub matchers: Vec<Matcher>,
    /// URLs the resolver failed to fetch
    pub inaccessible_urls: Vec<Iri>,
}

impl AcpSnapshot {
    /// True if any backing resource could not be fetched
    ///
    /// An indeterminate snapshot supports no read or write operation.
    pub fn is_indeterminate(&self) -> bool {
        !self.inaccessible_urls.is_empty()
    }

    /// Look up a matcher by URL
    pub fn matcher(&self, url: &Iri) -> Option<&Matcher> {
        self.matchers.iter().find(|m| m.url() == url)
    }

    /// The snapshot with the given policies excluded from both scopes
    ///
    /// Used to compute the access an actor would retain if a set of
    /// policies stopped applying.
    pub fn without_policies(&self, excluded: &FxHashSet<&Iri>) -> Self {
        Self {
            acr_policies: self
                .acr_policies
                .iter()
                .filter(|p| !excluded.contains(p.url()))
                .cloned()
                .collect(),
            policies: self
                .policies
                .iter()
                .filter(|p| !excluded.contains(p.url()))
                .cloned()
                .collect(),
            matchers: self.matchers.clone(),
            inaccessible_urls: self.inaccessible_urls.clone(),
        }
    }
}

/// Build a snapshot from a resource whose policy graph is fully
/// resource-scoped
///
/// Only objects stored inside the attached ACR resolve; any referenced
/// policy or matcher URL living on another resource is recorded as
/// inaccessible, exactly as a fetchless resolver must. Returns `None` if
/// the resource carries no accessible ACR.
pub fn local_snapshot(resource: &ResourceWithAcr) -> Option<AcpSnapshot> {
    let acr = resource.acr()?;
    let mut snapshot = AcpSnapshot::default();
    let mut seen_matchers: FxHashSet<Iri> = FxHashSet::default();
    let mut inaccessible: FxHashSet<Iri> = FxHashSet::default();

    let mut resolve_policies = |urls: &std::collections::BTreeSet<Iri>, out: &mut Vec<Policy>| {
        for url in urls {
            match acr.scoped_policy(url) {
                Some(policy) => out.push(policy),
                None => {
                    inaccessible.insert(url.base());
                }
            }
        }
    };

    let mut acr_policies = Vec::new();
    let mut policies = Vec::new();
    resolve_policies(acr.acr_policy_urls(), &mut acr_policies);
    resolve_policies(acr.policy_urls(), &mut policies);
    // member policies do not apply to this resource, but an unreachable
    // member reference still poisons the bundle
    let mut member_policies = Vec::new();
    resolve_policies(acr.member_policy_urls(), &mut member_policies);
    resolve_policies(acr.member_acr_policy_urls(), &mut member_policies);

    for policy in acr_policies
        .iter()
        .chain(policies.iter())
        .chain(member_policies.iter())
    {
        for url in policy.matcher_urls() {
            if !seen_matchers.insert(url.clone()) {
                continue;
            }
            match acr.scoped_matcher(url) {
                Some(matcher) => snapshot.matchers.push(matcher),
                None => {
                    inaccessible.insert(url.base());
                }
            }
        }
    }

    snapshot.acr_policies = acr_policies;
    snapshot.policies = policies;
    snapshot.inaccessible_urls = inaccessible.into_iter().collect();
    snapshot.inaccessible_urls.sort();
    Some(snapshot)
}
