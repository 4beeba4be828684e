//! # ACP Core
//!
//! Subject/predicate/value layer for the ACP access-control engine.
//!
//! This crate provides:
//! - `Iri` - shared-string IRI identity with cheap clones
//! - `Value` - polymorphic object value type
//! - `Thing` / `ThingDataset` - copy-on-write subject storage
//!
//! ## Design Principles
//!
//! 1. **Copy-on-write everywhere**: edits consume and return values; data
//!    handed out of a dataset can never change behind the caller
//! 2. **No I/O**: fetching and serialization live with the caller
//! 3. **Deterministic iteration** where order is observable

pub mod error;
pub mod iri;
pub mod thing;
pub mod value;

pub use error::{Error, Result};
pub use iri::Iri;
pub use thing::{Thing, ThingDataset};
pub use value::Value;
