//! ACP object model
//!
//! Policies, Matchers and Access Control Resources as owned value records.
//! Cross-references (Policy -> Matcher, ACR -> Policy) are opaque URL keys
//! into flat lookups, never live references, so the graph cannot alias or
//! cycle. Edits replace whole objects; nothing is mutated behind a
//! snapshot.

use crate::access::ModeSet;
use acp_core::{Iri, Thing, ThingDataset, Value};
use acp_vocab::{acl, acp, rdf};
use std::collections::{BTreeMap, BTreeSet};

/// The relation under which a matcher names an actor
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ActorRelation {
    /// Agent WebIDs (plus the Public/Authenticated/Creator sentinel classes)
    Agent,
    /// Client application IRIs (plus the any-client sentinel)
    Client,
}

impl ActorRelation {
    /// The matcher predicate IRI carrying this relation's values
    pub fn predicate(&self) -> &'static str {
        match self {
            ActorRelation::Agent => acp::AGENT,
            ActorRelation::Client => acp::CLIENT,
        }
    }
}

/// A predicate over actor identity, identified by URL
///
/// Matchers are pure: an actor satisfies a matcher under a relation iff the
/// actor's IRI is a member of the matcher's value set for that relation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Matcher {
    url: Iri,
    agents: BTreeSet<Iri>,
    clients: BTreeSet<Iri>,
    /// Foreign relation predicates preserved verbatim for round-tripping
    other: BTreeMap<Iri, BTreeSet<Iri>>,
}

impl Matcher {
    /// Create an empty matcher
    pub fn new(url: Iri) -> Self {
        Self {
            url,
            agents: BTreeSet::new(),
            clients: BTreeSet::new(),
            other: BTreeMap::new(),
        }
    }

    /// The matcher's URL identity
    pub fn url(&self) -> &Iri {
        &self.url
    }

    /// The value set for a known relation
    pub fn actors(&self, relation: ActorRelation) -> &BTreeSet<Iri> {
        match relation {
            ActorRelation::Agent => &self.agents,
            ActorRelation::Client => &self.clients,
        }
    }

    /// True iff the actor is in the value set for the relation
    pub fn matches(&self, relation: ActorRelation, actor: &Iri) -> bool {
        self.actors(relation).contains(actor)
    }

    /// Add an actor under a relation
    pub fn with_actor(mut self, relation: ActorRelation, actor: Iri) -> Self {
        match relation {
            ActorRelation::Agent => self.agents.insert(actor),
            ActorRelation::Client => self.clients.insert(actor),
        };
        self
    }

    /// Remove an actor from a relation
    pub fn without_actor(mut self, relation: ActorRelation, actor: &Iri) -> Self {
        match relation {
            ActorRelation::Agent => self.agents.remove(actor),
            ActorRelation::Client => self.clients.remove(actor),
        };
        self
    }

    /// Re-identify the matcher under a new URL, keeping its value sets
    pub fn renamed(mut self, url: Iri) -> Self {
        self.url = url;
        self
    }

    /// True if no relation names any actor, foreign relations included
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
            && self.clients.is_empty()
            && self.other.values().all(BTreeSet::is_empty)
    }

    /// True if any relation names an actor other than `(relation, actor)`
    ///
    /// Foreign relation bags count: cloning a matcher must never silently
    /// narrow a relation this engine does not interpret.
    pub fn names_other_actor(&self, relation: ActorRelation, actor: &Iri) -> bool {
        let own = |rel: ActorRelation, set: &BTreeSet<Iri>| {
            set.iter().any(|a| rel != relation || a != actor)
        };
        own(ActorRelation::Agent, &self.agents)
            || own(ActorRelation::Client, &self.clients)
            || self.other.values().any(|set| !set.is_empty())
    }

    /// Parse a matcher from its stored Thing
    pub fn from_thing(thing: &Thing) -> Self {
        let agent_pred = Iri::new(acp::AGENT);
        let client_pred = Iri::new(acp::CLIENT);
        let type_pred = Iri::new(rdf::TYPE);

        let mut other = BTreeMap::new();
        for (pred, values) in thing.properties() {
            if *pred == agent_pred || *pred == client_pred || *pred == type_pred {
                continue;
            }
            let refs: BTreeSet<Iri> = values.iter().filter_map(Value::as_iri).cloned().collect();
            if !refs.is_empty() {
                other.insert(pred.clone(), refs);
            }
        }

        Self {
            url: thing.url().clone(),
            agents: thing.iris(&agent_pred).cloned().collect(),
            clients: thing.iris(&client_pred).cloned().collect(),
            other,
        }
    }

    /// Serialize the matcher to a Thing
    pub fn to_thing(&self) -> Thing {
        let mut thing = Thing::new(self.url.clone())
            .with_added_iri(Iri::new(rdf::TYPE), Iri::new(acp::MATCHER))
            .with_set_iris(Iri::new(acp::AGENT), self.agents.iter().cloned())
            .with_set_iris(Iri::new(acp::CLIENT), self.clients.iter().cloned());
        for (pred, values) in &self.other {
            thing = thing.with_set_iris(pred.clone(), values.iter().cloned());
        }
        thing
    }
}

/// Allow/deny access modes plus a matcher composition defining scope
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Policy {
    url: Iri,
    allow: ModeSet,
    deny: ModeSet,
    all_of: BTreeSet<Iri>,
    any_of: BTreeSet<Iri>,
    none_of: BTreeSet<Iri>,
}

impl Policy {
    /// Create an inert policy (no modes, no matchers)
    pub fn new(url: Iri) -> Self {
        Self {
            url,
            allow: ModeSet::none(),
            deny: ModeSet::none(),
            all_of: BTreeSet::new(),
            any_of: BTreeSet::new(),
            none_of: BTreeSet::new(),
        }
    }

    /// The policy's URL identity
    pub fn url(&self) -> &Iri {
        &self.url
    }

    /// The modes this policy allows
    pub fn allow(&self) -> &ModeSet {
        &self.allow
    }

    /// The modes this policy denies
    pub fn deny(&self) -> &ModeSet {
        &self.deny
    }

    /// Matchers that must all be satisfied
    pub fn all_of(&self) -> &BTreeSet<Iri> {
        &self.all_of
    }

    /// Matchers of which at least one must be satisfied
    pub fn any_of(&self) -> &BTreeSet<Iri> {
        &self.any_of
    }

    /// Matchers none of which may be satisfied
    pub fn none_of(&self) -> &BTreeSet<Iri> {
        &self.none_of
    }

    /// A policy with neither allow nor deny modes never applies to anyone
    pub fn is_inert(&self) -> bool {
        self.allow.is_empty() && self.deny.is_empty()
    }

    /// Every matcher URL the policy references, across all three sets
    pub fn matcher_urls(&self) -> impl Iterator<Item = &Iri> {
        self.all_of
            .iter()
            .chain(self.any_of.iter())
            .chain(self.none_of.iter())
    }

    /// Replace the allowed mode set
    pub fn with_allow(mut self, modes: ModeSet) -> Self {
        self.allow = modes;
        self
    }

    /// Replace the denied mode set
    pub fn with_deny(mut self, modes: ModeSet) -> Self {
        self.deny = modes;
        self
    }

    /// Add an `allOf` matcher reference
    pub fn with_all_of(mut self, matcher: Iri) -> Self {
        self.all_of.insert(matcher);
        self
    }

    /// Add an `anyOf` matcher reference
    pub fn with_any_of(mut self, matcher: Iri) -> Self {
        self.any_of.insert(matcher);
        self
    }

    /// Add a `noneOf` matcher reference
    pub fn with_none_of(mut self, matcher: Iri) -> Self {
        self.none_of.insert(matcher);
        self
    }

    /// Re-identify the policy under a new URL, keeping its content
    pub fn renamed(mut self, url: Iri) -> Self {
        self.url = url;
        self
    }

    /// Replace every matcher reference according to `rename`, dropping
    /// references for which `rename` returns `None`
    pub fn with_matchers_renamed(
        mut self,
        mut rename: impl FnMut(&Iri) -> Option<Iri>,
    ) -> Self {
        let map = |set: &BTreeSet<Iri>, rename: &mut dyn FnMut(&Iri) -> Option<Iri>| {
            set.iter().filter_map(|url| rename(url)).collect()
        };
        self.all_of = map(&self.all_of, &mut rename);
        self.any_of = map(&self.any_of, &mut rename);
        self.none_of = map(&self.none_of, &mut rename);
        self
    }

    /// Parse a policy from its stored Thing
    pub fn from_thing(thing: &Thing) -> Self {
        let mode_set = |pred: &str| {
            let pred = Iri::new(pred);
            ModeSet {
                read: thing.contains_iri(&pred, &Iri::new(acl::READ)),
                append: thing.contains_iri(&pred, &Iri::new(acl::APPEND)),
                write: thing.contains_iri(&pred, &Iri::new(acl::WRITE)),
            }
        };
        Self {
            url: thing.url().clone(),
            allow: mode_set(acp::ALLOW),
            deny: mode_set(acp::DENY),
            all_of: thing.iris(&Iri::new(acp::ALL_OF)).cloned().collect(),
            any_of: thing.iris(&Iri::new(acp::ANY_OF)).cloned().collect(),
            none_of: thing.iris(&Iri::new(acp::NONE_OF)).cloned().collect(),
        }
    }

    /// Serialize the policy to a Thing
    pub fn to_thing(&self) -> Thing {
        let mode_iris = |modes: &ModeSet| {
            let mut iris = Vec::new();
            if modes.read {
                iris.push(Iri::new(acl::READ));
            }
            if modes.append {
                iris.push(Iri::new(acl::APPEND));
            }
            if modes.write {
                iris.push(Iri::new(acl::WRITE));
            }
            iris
        };
        Thing::new(self.url.clone())
            .with_added_iri(Iri::new(rdf::TYPE), Iri::new(acp::POLICY))
            .with_set_iris(Iri::new(acp::ALLOW), mode_iris(&self.allow))
            .with_set_iris(Iri::new(acp::DENY), mode_iris(&self.deny))
            .with_set_iris(Iri::new(acp::ALL_OF), self.all_of.iter().cloned())
            .with_set_iris(Iri::new(acp::ANY_OF), self.any_of.iter().cloned())
            .with_set_iris(Iri::new(acp::NONE_OF), self.none_of.iter().cloned())
    }
}

/// The Access Control Resource attached to a governed resource
///
/// Owns four disjoint policy-URL reference sets plus the Policies and
/// Matchers minted specifically for this resource (identified by URL
/// fragments on the ACR's own URL).
#[derive(Clone, Debug)]
pub struct AccessControlResource {
    url: Iri,
    policies: BTreeSet<Iri>,
    member_policies: BTreeSet<Iri>,
    acr_policies: BTreeSet<Iri>,
    member_acr_policies: BTreeSet<Iri>,
    scoped: ThingDataset,
}

impl AccessControlResource {
    /// Create an empty ACR at the given URL
    pub fn new(url: Iri) -> Self {
        Self {
            url,
            policies: BTreeSet::new(),
            member_policies: BTreeSet::new(),
            acr_policies: BTreeSet::new(),
            member_acr_policies: BTreeSet::new(),
            scoped: ThingDataset::new(),
        }
    }

    /// The ACR's own URL
    pub fn url(&self) -> &Iri {
        &self.url
    }

    /// Policies applying to the governed resource
    pub fn policy_urls(&self) -> &BTreeSet<Iri> {
        &self.policies
    }

    /// Policies applying to the resource's children
    pub fn member_policy_urls(&self) -> &BTreeSet<Iri> {
        &self.member_policies
    }

    /// Policies applying to the ACR itself
    pub fn acr_policy_urls(&self) -> &BTreeSet<Iri> {
        &self.acr_policies
    }

    /// Policies applying to the children's ACRs
    pub fn member_acr_policy_urls(&self) -> &BTreeSet<Iri> {
        &self.member_acr_policies
    }

    /// Add a policy-URL reference to the resource set
    pub fn add_policy_url(&mut self, url: Iri) {
        self.policies.insert(url);
    }

    /// Remove a policy-URL reference from the resource set
    pub fn remove_policy_url(&mut self, url: &Iri) {
        self.policies.remove(url);
    }

    /// Add a policy-URL reference to the member set
    pub fn add_member_policy_url(&mut self, url: Iri) {
        self.member_policies.insert(url);
    }

    /// Remove a policy-URL reference from the member set
    pub fn remove_member_policy_url(&mut self, url: &Iri) {
        self.member_policies.remove(url);
    }

    /// Add a policy-URL reference to the ACR-scope set
    pub fn add_acr_policy_url(&mut self, url: Iri) {
        self.acr_policies.insert(url);
    }

    /// Remove a policy-URL reference from the ACR-scope set
    pub fn remove_acr_policy_url(&mut self, url: &Iri) {
        self.acr_policies.remove(url);
    }

    /// Add a policy-URL reference to the member ACR-scope set
    pub fn add_member_acr_policy_url(&mut self, url: Iri) {
        self.member_acr_policies.insert(url);
    }

    /// Remove a policy-URL reference from the member ACR-scope set
    pub fn remove_member_acr_policy_url(&mut self, url: &Iri) {
        self.member_acr_policies.remove(url);
    }

    /// Store a resource-scoped policy, replacing any previous version
    pub fn insert_scoped_policy(&mut self, policy: &Policy) {
        self.scoped.insert(policy.to_thing());
    }

    /// Store a resource-scoped matcher, replacing any previous version
    pub fn insert_scoped_matcher(&mut self, matcher: &Matcher) {
        self.scoped.insert(matcher.to_thing());
    }

    /// Look up a resource-scoped policy by URL
    pub fn scoped_policy(&self, url: &Iri) -> Option<Policy> {
        self.scoped
            .get(url)
            .filter(|t| t.is_of_type(&Iri::new(acp::POLICY)))
            .map(Policy::from_thing)
    }

    /// Look up a resource-scoped matcher by URL
    pub fn scoped_matcher(&self, url: &Iri) -> Option<Matcher> {
        self.scoped
            .get(url)
            .filter(|t| t.is_of_type(&Iri::new(acp::MATCHER)))
            .map(Matcher::from_thing)
    }

    /// All resource-scoped policies, in URL order
    pub fn scoped_policies(&self) -> Vec<Policy> {
        self.scoped
            .subjects_of_type(&Iri::new(acp::POLICY))
            .into_iter()
            .map(Policy::from_thing)
            .collect()
    }

    /// All resource-scoped matchers, in URL order
    pub fn scoped_matchers(&self) -> Vec<Matcher> {
        self.scoped
            .subjects_of_type(&Iri::new(acp::MATCHER))
            .into_iter()
            .map(Matcher::from_thing)
            .collect()
    }

    /// Parse an ACR from a fetched dataset
    ///
    /// The dataset's subject at `url` carries the four reference sets; all
    /// other subjects are kept as the resource-scoped object store.
    pub fn from_dataset(url: Iri, dataset: ThingDataset) -> Self {
        let mut acr = Self::new(url.clone());
        if let Some(own) = dataset.get(&url) {
            acr.policies = own.iris(&Iri::new(acp::APPLY)).cloned().collect();
            acr.member_policies = own.iris(&Iri::new(acp::APPLY_MEMBERS)).cloned().collect();
            acr.acr_policies = own.iris(&Iri::new(acp::ACCESS)).cloned().collect();
            acr.member_acr_policies = own.iris(&Iri::new(acp::ACCESS_MEMBERS)).cloned().collect();
        }
        acr.scoped = dataset;
        acr.scoped.remove(&url);
        acr
    }

    /// Serialize the ACR and its scoped objects to one dataset
    pub fn to_dataset(&self) -> ThingDataset {
        let own = Thing::new(self.url.clone())
            .with_added_iri(Iri::new(rdf::TYPE), Iri::new(acp::ACCESS_CONTROL_RESOURCE))
            .with_set_iris(Iri::new(acp::APPLY), self.policies.iter().cloned())
            .with_set_iris(
                Iri::new(acp::APPLY_MEMBERS),
                self.member_policies.iter().cloned(),
            )
            .with_set_iris(Iri::new(acp::ACCESS), self.acr_policies.iter().cloned())
            .with_set_iris(
                Iri::new(acp::ACCESS_MEMBERS),
                self.member_acr_policies.iter().cloned(),
            );
        let mut dataset = self.scoped.clone();
        dataset.insert(own);
        dataset
    }
}

/// A governed resource together with its ACR, when one is accessible
#[derive(Clone, Debug)]
pub struct ResourceWithAcr {
    url: Iri,
    acr: Option<AccessControlResource>,
}

impl ResourceWithAcr {
    /// Pair a resource URL with its fetched ACR
    pub fn new(url: Iri, acr: AccessControlResource) -> Self {
        Self {
            url,
            acr: Some(acr),
        }
    }

    /// A resource whose ACR could not be reached
    pub fn without_acr(url: Iri) -> Self {
        Self { url, acr: None }
    }

    /// The governed resource's URL
    pub fn url(&self) -> &Iri {
        &self.url
    }

    /// The attached ACR, if accessible
    pub fn acr(&self) -> Option<&AccessControlResource> {
        self.acr.as_ref()
    }

    /// Replace the attached ACR
    pub fn with_acr(mut self, acr: AccessControlResource) -> Self {
        self.acr = Some(acr);
        self
    }
}
