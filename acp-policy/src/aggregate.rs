//! Access aggregation
//!
//! Folds the policies that unconditionally apply to an actor into one
//! `Access` record:
//! - allow is a monotonic OR across applicable policies
//! - deny is an unconditional override, resolved strictly after every
//!   allow within its scope
//! - ACR-scope policies touch only `control_read`/`control_write`
//!   (their read/write modes; never append); resource-scope policies
//!   touch only `read`/`append`/`write`
//!
//! One allow pass plus one deny pass per scope reproduces most-restrictive
//! -wins semantics without a fixpoint, and makes the result independent of
//! policy list order.

use crate::access::Access;
use crate::enumerate::find_actor_all;
use crate::evaluate::policy_applies_to;
use crate::model::{ActorRelation, Policy};
use crate::snapshot::AcpSnapshot;
use acp_core::Iri;
use std::collections::BTreeMap;

/// The explicit access a snapshot grants one actor
///
/// Returns `None` (indeterminate) when the snapshot has inaccessible URLs.
pub fn get_actor_access(
    snapshot: &AcpSnapshot,
    relation: ActorRelation,
    actor: &Iri,
) -> Option<Access> {
    if snapshot.is_indeterminate() {
        return None;
    }

    let applies = |p: &&Policy| policy_applies_to(p, relation, actor, snapshot);
    let acr_policies: Vec<&Policy> = snapshot.acr_policies.iter().filter(applies).collect();
    let policies: Vec<&Policy> = snapshot.policies.iter().filter(applies).collect();

    let mut access = Access::none();

    for policy in &acr_policies {
        if policy.allow().read {
            access.control_read = true;
        }
        if policy.allow().write {
            access.control_write = true;
        }
    }
    for policy in &policies {
        if policy.allow().read {
            access.read = true;
        }
        if policy.allow().append {
            access.append = true;
        }
        if policy.allow().write {
            access.write = true;
        }
    }

    // deny pass, strictly after all allows, scoped separately
    for policy in &acr_policies {
        if policy.deny().read {
            access.control_read = false;
        }
        if policy.deny().write {
            access.control_write = false;
        }
    }
    for policy in &policies {
        if policy.deny().read {
            access.read = false;
        }
        if policy.deny().append {
            access.append = false;
        }
        if policy.deny().write {
            access.write = false;
        }
    }

    Some(access)
}

/// Access for every actor a snapshot's matchers explicitly name
pub fn get_actor_access_all(
    snapshot: &AcpSnapshot,
    relation: ActorRelation,
) -> Option<BTreeMap<Iri, Access>> {
    if snapshot.is_indeterminate() {
        return None;
    }
    find_actor_all(snapshot, relation)
        .into_iter()
        .map(|actor| get_actor_access(snapshot, relation, &actor).map(|access| (actor, access)))
        .collect()
}
