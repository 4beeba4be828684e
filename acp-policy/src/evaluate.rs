//! Matcher and policy applicability
//!
//! Decides whether a Matcher, or a Policy's matcher composition, places an
//! actor **unconditionally** in scope, and whether a Policy's current
//! modes conflict with a desired change.
//!
//! A policy applies unconditionally to an actor iff:
//! 1. it carries at least one allow or deny mode (inert policies never apply)
//! 2. every `allOf` matcher matches the actor (vacuously true if none)
//! 3. if any `anyOf` matchers exist, at least one matches
//! 4. at least one positive (`allOf`/`anyOf`) matcher exists
//! 5. it references no `noneOf` matcher at all
//!
//! Rule 5 is deliberate and stricter than "no `noneOf` matcher matches":
//! an exclusion condition makes applicability depend on another actor's
//! absence, so the policy cannot be said to apply unconditionally. The
//! engine only reports and edits unconditional access.

use crate::access::{AccessMode, ModeChange};
use crate::model::{ActorRelation, Matcher, Policy};
use crate::snapshot::AcpSnapshot;
use acp_core::Iri;

/// True iff the actor is in the matcher's value set for the relation
pub fn matcher_applies_to(matcher: &Matcher, relation: ActorRelation, actor: &Iri) -> bool {
    matcher.matches(relation, actor)
}

/// True iff the policy applies unconditionally to the actor
///
/// Matcher URLs are resolved against the snapshot; a reference that does
/// not resolve simply fails to match (fetch failures were already handled
/// by the determinacy gate upstream).
pub fn policy_applies_to(
    policy: &Policy,
    relation: ActorRelation,
    actor: &Iri,
    snapshot: &AcpSnapshot,
) -> bool {
    if policy.is_inert() {
        return false;
    }

    // Any exclusion condition makes applicability conditional.
    if !policy.none_of().is_empty() {
        return false;
    }

    if policy.all_of().is_empty() && policy.any_of().is_empty() {
        return false;
    }

    let matches = |url: &Iri| {
        snapshot
            .matcher(url)
            .is_some_and(|m| matcher_applies_to(m, relation, actor))
    };

    let all_of_ok = policy.all_of().iter().all(matches);
    let any_of_ok = policy.any_of().is_empty() || policy.any_of().iter().any(matches);

    all_of_ok && any_of_ok
}

/// True iff the policy's current modes contradict a desired change
///
/// Per mode the change actually specifies:
/// - desired `Allow` conflicts with an existing deny
/// - desired `Deny` conflicts with an existing allow that no deny in the
///   same policy already cancels
pub fn policy_conflicts_with(policy: &Policy, desired: &ModeChange) -> bool {
    desired
        .against(policy.allow(), policy.deny())
        .any(|(mode, allowed, denied)| match mode {
            AccessMode::Unspecified => false,
            AccessMode::Allow => denied,
            AccessMode::Deny => allowed && !denied,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::{AccessChange, ModeSet};

    fn iri(s: &str) -> Iri {
        Iri::new(s)
    }

    fn alice() -> Iri {
        iri("https://example.org/alice#me")
    }

    fn matcher(fragment: &str, agents: &[&Iri]) -> Matcher {
        let mut m = Matcher::new(iri(&format!("https://pod.example/acr#{fragment}")));
        for agent in agents {
            m = m.with_actor(ActorRelation::Agent, (*agent).clone());
        }
        m
    }

    fn allow_read(fragment: &str) -> Policy {
        Policy::new(iri(&format!("https://pod.example/acr#{fragment}"))).with_allow(ModeSet {
            read: true,
            ..ModeSet::none()
        })
    }

    fn snapshot_with(matchers: Vec<Matcher>) -> AcpSnapshot {
        AcpSnapshot {
            matchers,
            ..AcpSnapshot::default()
        }
    }

    #[test]
    fn test_matcher_applies_to() {
        let m = matcher("m1", &[&alice()]);
        assert!(matcher_applies_to(&m, ActorRelation::Agent, &alice()));
        assert!(!matcher_applies_to(
            &m,
            ActorRelation::Agent,
            &iri("https://example.org/bob#me")
        ));
        assert!(!matcher_applies_to(&m, ActorRelation::Client, &alice()));
    }

    #[test]
    fn test_inert_policy_never_applies() {
        let m = matcher("m1", &[&alice()]);
        let policy = Policy::new(iri("https://pod.example/acr#p1")).with_any_of(m.url().clone());
        let snapshot = snapshot_with(vec![m]);
        assert!(!policy_applies_to(
            &policy,
            ActorRelation::Agent,
            &alice(),
            &snapshot
        ));
    }

    #[test]
    fn test_all_of_requires_every_matcher() {
        let m1 = matcher("m1", &[&alice()]);
        let m2 = matcher("m2", &[&alice()]);
        let m3 = matcher("m3", &[&iri("https://example.org/bob#me")]);

        let both = allow_read("p1")
            .with_all_of(m1.url().clone())
            .with_all_of(m2.url().clone());
        let mixed = allow_read("p2")
            .with_all_of(m1.url().clone())
            .with_all_of(m3.url().clone());

        let snapshot = snapshot_with(vec![m1, m2, m3]);
        assert!(policy_applies_to(
            &both,
            ActorRelation::Agent,
            &alice(),
            &snapshot
        ));
        assert!(!policy_applies_to(
            &mixed,
            ActorRelation::Agent,
            &alice(),
            &snapshot
        ));
    }

    #[test]
    fn test_any_of_requires_at_least_one() {
        let m1 = matcher("m1", &[&iri("https://example.org/bob#me")]);
        let m2 = matcher("m2", &[&alice()]);

        let policy = allow_read("p1")
            .with_any_of(m1.url().clone())
            .with_any_of(m2.url().clone());
        let snapshot = snapshot_with(vec![m1.clone(), m2]);
        assert!(policy_applies_to(
            &policy,
            ActorRelation::Agent,
            &alice(),
            &snapshot
        ));

        let miss = allow_read("p2").with_any_of(m1.url().clone());
        let snapshot = snapshot_with(vec![m1]);
        assert!(!policy_applies_to(
            &miss,
            ActorRelation::Agent,
            &alice(),
            &snapshot
        ));
    }

    #[test]
    fn test_no_positive_matchers_never_applies() {
        let policy = allow_read("p1");
        let snapshot = snapshot_with(vec![]);
        assert!(!policy_applies_to(
            &policy,
            ActorRelation::Agent,
            &alice(),
            &snapshot
        ));
    }

    #[test]
    fn test_none_of_disqualifies_even_when_not_matching() {
        let m1 = matcher("m1", &[&alice()]);
        // the noneOf matcher does NOT match alice, yet its mere presence
        // makes the policy conditional
        let m2 = matcher("m2", &[&iri("https://example.org/bob#me")]);

        let policy = allow_read("p1")
            .with_any_of(m1.url().clone())
            .with_none_of(m2.url().clone());
        let snapshot = snapshot_with(vec![m1, m2]);
        assert!(!policy_applies_to(
            &policy,
            ActorRelation::Agent,
            &alice(),
            &snapshot
        ));
    }

    #[test]
    fn test_unresolvable_matcher_does_not_match() {
        let policy = allow_read("p1").with_any_of(iri("https://pod.example/acr#gone"));
        let snapshot = snapshot_with(vec![]);
        assert!(!policy_applies_to(
            &policy,
            ActorRelation::Agent,
            &alice(),
            &snapshot
        ));
    }

    #[test]
    fn test_conflict_allow_vs_deny() {
        let policy = Policy::new(iri("https://pod.example/acr#p1")).with_deny(ModeSet {
            write: true,
            ..ModeSet::none()
        });
        let wants_write = AccessChange::new().with_write(true).resource_modes();
        assert!(policy_conflicts_with(&policy, &wants_write));

        let wants_read = AccessChange::new().with_read(true).resource_modes();
        assert!(!policy_conflicts_with(&policy, &wants_read));
    }

    #[test]
    fn test_conflict_deny_vs_allow() {
        let policy = Policy::new(iri("https://pod.example/acr#p1")).with_allow(ModeSet {
            read: true,
            ..ModeSet::none()
        });
        let revoke_read = AccessChange::new().with_read(false).resource_modes();
        assert!(policy_conflicts_with(&policy, &revoke_read));
    }

    #[test]
    fn test_no_conflict_when_allow_already_cancelled() {
        // an allow the same policy already denies produces false, so a
        // desired false is not a conflict
        let policy = Policy::new(iri("https://pod.example/acr#p1"))
            .with_allow(ModeSet {
                read: true,
                ..ModeSet::none()
            })
            .with_deny(ModeSet {
                read: true,
                ..ModeSet::none()
            });
        let revoke_read = AccessChange::new().with_read(false).resource_modes();
        assert!(!policy_conflicts_with(&policy, &revoke_read));
    }

    #[test]
    fn test_unspecified_modes_never_conflict() {
        let policy = Policy::new(iri("https://pod.example/acr#p1"))
            .with_allow(ModeSet {
                read: true,
                append: true,
                write: true,
            })
            .with_deny(ModeSet {
                read: true,
                append: true,
                write: true,
            });
        assert!(!policy_conflicts_with(
            &policy,
            &AccessChange::new().resource_modes()
        ));
    }
}
