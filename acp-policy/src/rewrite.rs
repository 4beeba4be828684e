//! Actor-scoped policy rewriting
//!
//! Realizes a desired access change for one actor without disturbing any
//! other actor that shares a policy with it:
//!
//! 1. Narrow the actor's applicable policies to those that conflict with
//!    the change, separately for the ACR and resource scopes.
//! 2. Partition conflicting policies into "shared" (a matcher also names
//!    another actor) and "actor-only".
//! 3. Deep-clone every shared conflicting policy and its matchers into
//!    resource-scoped private copies with the target actor omitted, so the
//!    co-matched actors keep their access on this resource.
//! 4. Compute the access the actor retains once the shared conflicting
//!    policies are excluded (`remaining`).
//! 5. Where the change's outcome (unspecified modes fall back to the
//!    actor's existing access) differs from `remaining`, mint one policy
//!    per scope granting the resolved modes through a matcher naming just
//!    this actor, and drop the references to every conflicting policy in
//!    that scope; otherwise only the cloned originals lose their
//!    reference.
//!
//! Policies and Matchers are never edited in place or deleted: they may be
//! shared by other resources, so only this resource's reference sets and
//! its own scoped objects change.
//!
//! New object URLs come from a pure naming function over (relation, actor,
//! salt); the actor matcher and per-scope policy names take no salt at
//! all, so repeated calls converge on the same identities instead of
//! growing the graph.

use crate::access::{AccessChange, ModeSet};
use crate::aggregate::get_actor_access;
use crate::evaluate::{policy_applies_to, policy_conflicts_with};
use crate::model::{AccessControlResource, ActorRelation, Matcher, Policy, ResourceWithAcr};
use crate::snapshot::AcpSnapshot;
use acp_core::Iri;
use rustc_hash::FxHashSet;

/// Uniqueness component for cloned-object names
///
/// The default combines a millisecond timestamp with a random nonce; tests
/// fix both to make resulting identities assertable.
#[derive(Clone, Debug)]
pub struct NameSalt {
    stamp: i64,
    nonce: String,
}

impl NameSalt {
    /// A fresh salt from the current time and a random nonce
    pub fn generate() -> Self {
        Self {
            stamp: chrono::Utc::now().timestamp_millis(),
            nonce: uuid::Uuid::new_v4().simple().to_string(),
        }
    }

    /// A fixed salt for deterministic naming
    pub fn fixed(stamp: i64, nonce: impl Into<String>) -> Self {
        Self {
            stamp,
            nonce: nonce.into(),
        }
    }

    fn suffix(&self) -> String {
        format!("{}-{}", self.stamp, self.nonce)
    }
}

/// Which ACR reference set a policy is reached through
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PolicyScope {
    Acr,
    Resource,
}

/// Rewrite the resource's policy graph so that only `actor`'s access
/// changes
///
/// Returns `None` when the resource carries no accessible ACR, the
/// snapshot is indeterminate, or the actor's current access cannot be
/// determined. The returned resource holds a replacement ACR; the caller
/// persists it.
pub fn set_actor_access(
    resource: &ResourceWithAcr,
    snapshot: &AcpSnapshot,
    relation: ActorRelation,
    actor: &Iri,
    change: &AccessChange,
    salt: &NameSalt,
) -> Option<ResourceWithAcr> {
    let acr = resource.acr()?;
    if snapshot.is_indeterminate() {
        return None;
    }
    let existing = get_actor_access(snapshot, relation, actor)?;

    let applies = |p: &&Policy| policy_applies_to(p, relation, actor, snapshot);
    let acr_change = change.acr_modes();
    let resource_change = change.resource_modes();

    let acr_conflicting: Vec<&Policy> = snapshot
        .acr_policies
        .iter()
        .filter(applies)
        .filter(|p| policy_conflicts_with(p, &acr_change))
        .collect();
    let resource_conflicting: Vec<&Policy> = snapshot
        .policies
        .iter()
        .filter(applies)
        .filter(|p| policy_conflicts_with(p, &resource_change))
        .collect();

    tracing::debug!(
        actor = %actor,
        acr_conflicting = acr_conflicting.len(),
        resource_conflicting = resource_conflicting.len(),
        "rewriting actor access"
    );

    let mut new_acr = acr.clone();

    // Clone every shared conflicting policy for the co-matched actors.
    let mut shared_urls: FxHashSet<&Iri> = FxHashSet::default();
    let conflicting_by_scope = acr_conflicting
        .iter()
        .map(|p| (*p, PolicyScope::Acr))
        .chain(
            resource_conflicting
                .iter()
                .map(|p| (*p, PolicyScope::Resource)),
        );
    for (policy, scope) in conflicting_by_scope {
        if !policy_names_other_actor(policy, relation, actor, snapshot) {
            continue;
        }
        shared_urls.insert(policy.url());
        let cloned_url =
            clone_policy_for_others(&mut new_acr, policy, relation, actor, snapshot, salt);
        match scope {
            PolicyScope::Acr => new_acr.add_acr_policy_url(cloned_url),
            PolicyScope::Resource => new_acr.add_policy_url(cloned_url),
        }
    }

    // The baseline the change is measured against: what the actor keeps
    // once the shared conflicting policies stop applying to it.
    let remaining = get_actor_access(&snapshot.without_policies(&shared_urls), relation, actor)?;

    // Unspecified modes stay at their existing values.
    let resolved = change.resolve_over(&existing);

    let actor_matcher =
        Matcher::new(actor_matcher_url(acr.url(), relation, actor)).with_actor(relation, actor.clone());
    let mut matcher_needed = false;

    // ACR scope
    rewrite_scope(
        &mut new_acr,
        PolicyScope::Acr,
        &acr_conflicting,
        &shared_urls,
        (resolved.control_read, false, resolved.control_write),
        (remaining.control_read, false, remaining.control_write),
        acr_policy_url(acr.url(), relation, actor),
        &actor_matcher,
        &mut matcher_needed,
    );

    // resource scope
    rewrite_scope(
        &mut new_acr,
        PolicyScope::Resource,
        &resource_conflicting,
        &shared_urls,
        (resolved.read, resolved.append, resolved.write),
        (remaining.read, remaining.append, remaining.write),
        resource_policy_url(acr.url(), relation, actor),
        &actor_matcher,
        &mut matcher_needed,
    );

    if matcher_needed {
        new_acr.insert_scoped_matcher(&actor_matcher);
    }

    Some(resource.clone().with_acr(new_acr))
}

/// Apply the per-scope rewrite decision
///
/// If the resolved target differs from the remaining baseline, every
/// conflicting policy in the scope loses its reference and (when any mode
/// is granted) one new policy carries the resolved modes; otherwise only
/// the shared originals, whose effect the clones now carry, are
/// dereferenced.
#[allow(clippy::too_many_arguments)]
fn rewrite_scope(
    acr: &mut AccessControlResource,
    scope: PolicyScope,
    conflicting: &[&Policy],
    shared_urls: &FxHashSet<&Iri>,
    target: (bool, bool, bool),
    remaining: (bool, bool, bool),
    policy_url: Iri,
    actor_matcher: &Matcher,
    matcher_needed: &mut bool,
) {
    let remove_url = |acr: &mut AccessControlResource, url: &Iri| match scope {
        PolicyScope::Acr => acr.remove_acr_policy_url(url),
        PolicyScope::Resource => acr.remove_policy_url(url),
    };

    if target == remaining {
        for policy in conflicting {
            if shared_urls.contains(policy.url()) {
                remove_url(acr, policy.url());
            }
        }
        return;
    }

    for policy in conflicting {
        remove_url(acr, policy.url());
    }

    let (read, append, write) = target;
    if !(read || append || write) {
        return;
    }

    let policy = Policy::new(policy_url)
        .with_allow(ModeSet {
            read,
            append,
            write,
        })
        .with_all_of(actor_matcher.url().clone());
    tracing::debug!(policy = %policy.url(), ?scope, "created actor policy");
    acr.insert_scoped_policy(&policy);
    match scope {
        PolicyScope::Acr => acr.add_acr_policy_url(policy.url().clone()),
        PolicyScope::Resource => acr.add_policy_url(policy.url().clone()),
    }
    *matcher_needed = true;
}

/// True if any matcher the policy references names an actor other than
/// `(relation, actor)` under any relation
fn policy_names_other_actor(
    policy: &Policy,
    relation: ActorRelation,
    actor: &Iri,
    snapshot: &AcpSnapshot,
) -> bool {
    policy.matcher_urls().any(|url| {
        snapshot
            .matcher(url)
            .is_some_and(|m| m.names_other_actor(relation, actor))
    })
}

/// Deep-clone a shared policy and its matchers, omitting the target actor
///
/// Cloned matchers left with no actor entry at all are discarded and
/// dropped from the cloned policy's matcher sets. A matcher reference that
/// does not resolve in the snapshot is kept verbatim so the clone's scope
/// never silently widens.
fn clone_policy_for_others(
    acr: &mut AccessControlResource,
    policy: &Policy,
    relation: ActorRelation,
    actor: &Iri,
    snapshot: &AcpSnapshot,
    salt: &NameSalt,
) -> Iri {
    let cloned_url = clone_url(acr.url(), policy.url(), salt);
    tracing::debug!(original = %policy.url(), clone = %cloned_url, "cloning shared policy");

    let mut narrowed_matchers: Vec<Matcher> = Vec::new();
    let cloned = policy
        .clone()
        .renamed(cloned_url.clone())
        .with_matchers_renamed(|matcher_url| {
            let Some(matcher) = snapshot.matcher(matcher_url) else {
                return Some(matcher_url.clone());
            };
            let narrowed = matcher
                .clone()
                .without_actor(relation, actor)
                .renamed(clone_url(acr.url(), matcher_url, salt));
            if narrowed.is_empty() {
                return None;
            }
            let narrowed_url = narrowed.url().clone();
            narrowed_matchers.push(narrowed);
            Some(narrowed_url)
        });

    for matcher in &narrowed_matchers {
        acr.insert_scoped_matcher(matcher);
    }
    acr.insert_scoped_policy(&cloned);
    cloned_url
}

fn relation_tag(relation: ActorRelation) -> &'static str {
    match relation {
        ActorRelation::Agent => "agent",
        ActorRelation::Client => "client",
    }
}

/// Keep fragment characters simple; anything outside [A-Za-z0-9] folds to
/// '-' so distinct IRIs stay readable in minted names
fn sanitize(input: &str) -> String {
    input
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect()
}

/// Deterministic, salt-free URL of the matcher naming one actor
pub fn actor_matcher_url(acr_url: &Iri, relation: ActorRelation, actor: &Iri) -> Iri {
    acr_url.with_fragment(&format!(
        "{}-{}-matcher",
        relation_tag(relation),
        sanitize(actor.as_str())
    ))
}

/// Deterministic, salt-free URL of the actor's resource-scope policy
pub fn resource_policy_url(acr_url: &Iri, relation: ActorRelation, actor: &Iri) -> Iri {
    acr_url.with_fragment(&format!(
        "{}-{}-policy",
        relation_tag(relation),
        sanitize(actor.as_str())
    ))
}

/// Deterministic, salt-free URL of the actor's ACR-scope policy
pub fn acr_policy_url(acr_url: &Iri, relation: ActorRelation, actor: &Iri) -> Iri {
    acr_url.with_fragment(&format!(
        "{}-{}-control-policy",
        relation_tag(relation),
        sanitize(actor.as_str())
    ))
}

/// Salted clone URL derived from the original's identity
fn clone_url(acr_url: &Iri, original: &Iri, salt: &NameSalt) -> Iri {
    let seed = original.fragment().unwrap_or(original.as_str());
    acr_url.with_fragment(&format!("{}-{}", sanitize(seed), salt.suffix()))
}
