//! Value - polymorphic object value type
//!
//! The object position of a stored statement can hold:
//! - References to other subjects (`Ref`)
//! - Plain and language-tagged strings
//! - Booleans, integers, floats
//! - Blank node labels
//!
//! ACP data is almost entirely `Ref`s (policy and matcher URL sets); the
//! remaining variants keep foreign statements intact when an ACR carries
//! annotations this engine does not interpret.

use crate::iri::Iri;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Polymorphic value type for statement objects
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Reference to another subject
    Ref(Iri),
    /// String value (xsd:string)
    Str(String),
    /// Language-tagged string (rdf:langString)
    LangStr {
        /// The lexical value
        value: String,
        /// BCP 47 language tag
        lang: String,
    },
    /// Boolean value (xsd:boolean)
    Boolean(bool),
    /// 64-bit signed integer (xsd:integer family)
    Long(i64),
    /// 64-bit floating point (xsd:double)
    Double(f64),
    /// Blank node label
    Blank(String),
}

impl Value {
    /// The referenced IRI, if this value is a `Ref`
    pub fn as_iri(&self) -> Option<&Iri> {
        match self {
            Value::Ref(iri) => Some(iri),
            _ => None,
        }
    }

    /// True if this value is a reference to the given IRI
    pub fn is_ref_to(&self, iri: &Iri) -> bool {
        matches!(self, Value::Ref(r) if r == iri)
    }
}

impl From<Iri> for Value {
    fn from(iri: Iri) -> Self {
        Value::Ref(iri)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Long(n)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Ref(iri) => write!(f, "<{}>", iri),
            Value::Str(s) => write!(f, "{:?}", s),
            Value::LangStr { value, lang } => write!(f, "{:?}@{}", value, lang),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Long(n) => write!(f, "{}", n),
            Value::Double(d) => write!(f, "{}", d),
            Value::Blank(label) => write!(f, "_:{}", label),
        }
    }
}
