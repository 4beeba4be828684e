//! Iri - shared-string IRI identity
//!
//! An `Iri` wraps `Arc<str>` so that the URL-keyed maps and reference sets
//! used throughout the engine clone cheaply.
//!
//! ## Ordering
//!
//! IRIs use strict lexical total ordering, which makes reference sets held
//! in `BTreeSet`s iterate deterministically.
//!
//! ## Fragments
//!
//! Objects created for one specific ACR are identified by URL fragments on
//! the ACR's own URL; `with_fragment` and `base` cover both directions.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

/// IRI identity with cheap clones
///
/// Serializes as a plain JSON string.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Iri(Arc<str>);

impl Iri {
    /// Create a new IRI from any string-like value
    pub fn new(iri: impl AsRef<str>) -> Self {
        Self(Arc::from(iri.as_ref()))
    }

    /// The IRI as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Replace (or attach) the fragment component
    ///
    /// `Iri::new("https://a.example/acr").with_fragment("m1")` yields
    /// `https://a.example/acr#m1`.
    pub fn with_fragment(&self, fragment: &str) -> Self {
        Self::new(format!("{}#{}", self.base_str(), fragment))
    }

    /// The IRI with any fragment component removed
    pub fn base(&self) -> Self {
        match self.0.find('#') {
            Some(_) => Self::new(self.base_str()),
            None => self.clone(),
        }
    }

    /// The fragment component, if any
    pub fn fragment(&self) -> Option<&str> {
        self.0.find('#').map(|i| &self.0[i + 1..])
    }

    fn base_str(&self) -> &str {
        match self.0.find('#') {
            Some(i) => &self.0[..i],
            None => &self.0,
        }
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Iri {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Iri {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Iri {
    fn from(s: String) -> Self {
        Self(Arc::from(s.as_str()))
    }
}

impl PartialEq<&str> for Iri {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl Serialize for Iri {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Iri {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from(s))
    }
}
