//! Policy resolution and actor-scoped rewriting for ACP
//!
//! This crate is the core of the ACP client engine. Given a flattened
//! snapshot of the Policies and Matchers guarding one resource, it can:
//!
//! - **Evaluate**: decide whether a Policy applies unconditionally to an
//!   actor ([`policy_applies_to`]) and whether it conflicts with a desired
//!   change ([`policy_conflicts_with`])
//! - **Aggregate**: fold the applicable policies into one [`Access`]
//!   record with allow-then-deny precedence ([`get_actor_access`])
//! - **Rewrite**: change one actor's access without disturbing any other
//!   actor sharing the same policies ([`set_actor_access`])
//! - **Enumerate**: list every explicitly named actor ([`find_actor_all`])
//!
//! # Core Types
//!
//! - [`AcpSnapshot`]: the in-memory bundle of policies, matchers and
//!   unreachable URLs resolved for one resource
//! - [`Access`] / [`AccessChange`]: granted access and desired changes,
//!   with "leave unchanged" as an explicit tri-state
//! - [`Policy`] / [`Matcher`] / [`AccessControlResource`]: owned value
//!   records cross-referenced by URL, never by pointer
//!
//! # Semantics
//!
//! 1. **Determinacy gate**: a snapshot with any inaccessible URL supports
//!    no operation - everything returns `None`
//! 2. **Unconditional scope only**: a policy referencing any `noneOf`
//!    matcher is conditional and never applies here
//! 3. **Deny overrides allow**, resolved after all allows, per scope
//! 4. **Copy-on-write graph**: rewrites replace whole objects and edit
//!    only this resource's reference sets
//!
//! The engine is synchronous and pure; fetching and persistence belong to
//! the caller.

pub mod access;
pub mod aggregate;
pub mod enumerate;
pub mod evaluate;
pub mod model;
pub mod rewrite;
pub mod snapshot;

pub use access::{Access, AccessChange, AccessMode, ModeChange, ModeSet};
pub use aggregate::{get_actor_access, get_actor_access_all};
pub use enumerate::find_actor_all;
pub use evaluate::{matcher_applies_to, policy_applies_to, policy_conflicts_with};
pub use model::{AccessControlResource, ActorRelation, Matcher, Policy, ResourceWithAcr};
pub use rewrite::{set_actor_access, NameSalt};
pub use snapshot::{local_snapshot, AcpSnapshot};
