//! # ACP API
//!
//! Caller-facing surface for the ACP access-control engine, composing the
//! lower-level crates:
//! - `acp-core` - subject/predicate/value storage
//! - `acp-policy` - resolution and rewriting engine
//! - `acp-vocab` - vocabulary constants
//!
//! ## Quick Start
//!
//! ```ignore
//! use acp_api::{get_agent_access, resolve_acp_snapshot, set_agent_access};
//!
//! // Resolve everything governing the resource through your fetcher
//! let snapshot = resolve_acp_snapshot(&resource, &fetcher).await.unwrap();
//!
//! // Read one agent's explicit access
//! let access = get_agent_access(&snapshot, &webid)?;
//!
//! // Grant the agent read access; persist the returned resource's ACR
//! let change = AccessChange::new().with_read(true);
//! let updated = set_agent_access(&resource, &snapshot, &webid, &change)?;
//! ```
//!
//! Reads and writes return `None` when the snapshot is indeterminate (a
//! backing policy resource could not be fetched) or a precondition fails;
//! `Err` is reserved for caller bugs such as passing a sentinel class IRI
//! as a WebID. Persisting the updated ACR, and re-resolving afterwards, is
//! the caller's job.

pub mod access;
mod error;
pub mod report;
pub mod resolver;

pub use access::{
    get_agent_access, get_agent_access_all, get_authenticated_access, get_creator_access,
    get_public_access, set_agent_access, set_authenticated_access, set_public_access,
};
pub use error::{ApiError, Result};
pub use report::acr_report;
pub use resolver::{fetch_resource_with_acr, resolve_acp_snapshot, ResourceFetcher};

// Re-export the engine types callers hold
pub use acp_core::{Iri, Thing, ThingDataset, Value};
pub use acp_policy::{
    Access, AccessChange, AccessControlResource, AccessMode, AcpSnapshot, ActorRelation, Matcher,
    ModeSet, Policy, ResourceWithAcr,
};
