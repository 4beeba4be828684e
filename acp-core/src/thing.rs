//! Thing - a subject and its predicate-keyed values
//!
//! Things are the unit of storage and transfer: one subject URL plus a
//! multi-valued predicate map. All edits are copy-on-write - the builder
//! methods consume the receiver and return a new `Thing`, so a `Thing`
//! handed out of a dataset can never be mutated in place behind it.
//!
//! Predicates are held in a `BTreeMap` so iteration order is deterministic.

use crate::iri::Iri;
use crate::value::Value;
use acp_vocab::rdf;
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;

/// A subject and its predicate-keyed values
#[derive(Clone, Debug, PartialEq)]
pub struct Thing {
    url: Iri,
    properties: BTreeMap<Iri, Vec<Value>>,
}

impl Thing {
    /// Create an empty Thing for the given subject URL
    pub fn new(url: Iri) -> Self {
        Self {
            url,
            properties: BTreeMap::new(),
        }
    }

    /// The subject URL
    pub fn url(&self) -> &Iri {
        &self.url
    }

    /// All values for a predicate (empty slice if none)
    pub fn values(&self, predicate: &Iri) -> &[Value] {
        self.properties
            .get(predicate)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All IRI references for a predicate
    pub fn iris<'a>(&'a self, predicate: &Iri) -> impl Iterator<Item = &'a Iri> {
        self.values(predicate).iter().filter_map(Value::as_iri)
    }

    /// The first IRI reference for a predicate, if any
    pub fn first_iri(&self, predicate: &Iri) -> Option<&Iri> {
        self.iris(predicate).next()
    }

    /// True if the predicate carries a reference to the given IRI
    pub fn contains_iri(&self, predicate: &Iri, iri: &Iri) -> bool {
        self.iris(predicate).any(|r| r == iri)
    }

    /// The subject's `rdf:type` references
    pub fn types(&self) -> impl Iterator<Item = &Iri> {
        self.iris(&Iri::new(rdf::TYPE))
    }

    /// True if the subject carries the given `rdf:type`
    pub fn is_of_type(&self, type_iri: &Iri) -> bool {
        self.types().any(|t| t == type_iri)
    }

    /// Iterate all (predicate, values) pairs in predicate order
    pub fn properties(&self) -> impl Iterator<Item = (&Iri, &[Value])> {
        self.properties.iter().map(|(p, vs)| (p, vs.as_slice()))
    }

    // ------------------------------------------------------------------
    // Copy-on-write builders
    // ------------------------------------------------------------------

    /// Add a value under a predicate (duplicates are not added twice)
    pub fn with_added_value(mut self, predicate: Iri, value: Value) -> Self {
        let slot = self.properties.entry(predicate).or_default();
        if !slot.contains(&value) {
            slot.push(value);
        }
        self
    }

    /// Add an IRI reference under a predicate
    pub fn with_added_iri(self, predicate: Iri, iri: Iri) -> Self {
        self.with_added_value(predicate, Value::Ref(iri))
    }

    /// Replace all values of a predicate with the given IRI references
    pub fn with_set_iris(mut self, predicate: Iri, iris: impl IntoIterator<Item = Iri>) -> Self {
        let values: Vec<Value> = iris.into_iter().map(Value::Ref).collect();
        if values.is_empty() {
            self.properties.remove(&predicate);
        } else {
            self.properties.insert(predicate, values);
        }
        self
    }

    /// Remove one IRI reference from a predicate, dropping the predicate
    /// entirely when its last value goes
    pub fn with_removed_iri(mut self, predicate: &Iri, iri: &Iri) -> Self {
        if let Some(slot) = self.properties.get_mut(predicate) {
            slot.retain(|v| !v.is_ref_to(iri));
            if slot.is_empty() {
                self.properties.remove(predicate);
            }
        }
        self
    }

    /// Remove every value of a predicate
    pub fn with_removed_all(mut self, predicate: &Iri) -> Self {
        self.properties.remove(predicate);
        self
    }
}

/// A URL-keyed store of Things
///
/// `get` returns shared references; replacing a subject is a whole-Thing
/// `insert`, matching the copy-on-write discipline of `Thing` itself.
#[derive(Clone, Debug, Default)]
pub struct ThingDataset {
    things: FxHashMap<Iri, Thing>,
}

impl ThingDataset {
    /// Create an empty dataset
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of subjects in the dataset
    pub fn len(&self) -> usize {
        self.things.len()
    }

    /// True if the dataset holds no subjects
    pub fn is_empty(&self) -> bool {
        self.things.is_empty()
    }

    /// Look up a subject
    pub fn get(&self, url: &Iri) -> Option<&Thing> {
        self.things.get(url)
    }

    /// Insert or replace a subject (keyed by the Thing's own URL)
    pub fn insert(&mut self, thing: Thing) {
        self.things.insert(thing.url().clone(), thing);
    }

    /// Remove a subject
    pub fn remove(&mut self, url: &Iri) -> Option<Thing> {
        self.things.remove(url)
    }

    /// Iterate all subjects (order unspecified)
    pub fn iter(&self) -> impl Iterator<Item = &Thing> {
        self.things.values()
    }

    /// All subjects carrying the given `rdf:type`, in URL order
    pub fn subjects_of_type(&self, type_iri: &Iri) -> Vec<&Thing> {
        let mut found: Vec<&Thing> = self
            .things
            .values()
            .filter(|t| t.is_of_type(type_iri))
            .collect();
        found.sort_by(|a, b| a.url().cmp(b.url()));
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use acp_vocab::acp;

    fn iri(s: &str) -> Iri {
        Iri::new(s)
    }

    #[test]
    fn test_copy_on_write_add_and_remove() {
        let agent = iri("https://example.org/alice#me");
        let pred = iri(acp::AGENT);
        let thing = Thing::new(iri("https://pod.example/acr#m1"))
            .with_added_iri(pred.clone(), agent.clone());

        assert!(thing.contains_iri(&pred, &agent));

        let emptied = thing.clone().with_removed_iri(&pred, &agent);
        assert!(!emptied.contains_iri(&pred, &agent));
        assert_eq!(emptied.values(&pred), &[]);
        // the original is untouched
        assert!(thing.contains_iri(&pred, &agent));
    }

    #[test]
    fn test_add_is_idempotent() {
        let pred = iri(acp::AGENT);
        let agent = iri("https://example.org/alice#me");
        let thing = Thing::new(iri("https://pod.example/acr#m1"))
            .with_added_iri(pred.clone(), agent.clone())
            .with_added_iri(pred.clone(), agent.clone());
        assert_eq!(thing.values(&pred).len(), 1);
    }

    #[test]
    fn test_set_iris_replaces() {
        let pred = iri(acp::ALL_OF);
        let thing = Thing::new(iri("https://pod.example/acr#p1"))
            .with_added_iri(pred.clone(), iri("https://pod.example/acr#m1"))
            .with_set_iris(pred.clone(), [iri("https://pod.example/acr#m2")]);

        let refs: Vec<_> = thing.iris(&pred).collect();
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].as_str(), "https://pod.example/acr#m2");
    }

    #[test]
    fn test_set_iris_empty_clears_predicate() {
        let pred = iri(acp::ALL_OF);
        let thing = Thing::new(iri("https://pod.example/acr#p1"))
            .with_added_iri(pred.clone(), iri("https://pod.example/acr#m1"))
            .with_set_iris(pred.clone(), []);
        assert!(thing.values(&pred).is_empty());
    }

    #[test]
    fn test_subjects_of_type() {
        let matcher_type = iri(acp::MATCHER);
        let rdf_type = iri(acp_vocab::rdf::TYPE);

        let mut dataset = ThingDataset::new();
        dataset.insert(
            Thing::new(iri("https://pod.example/acr#m2"))
                .with_added_iri(rdf_type.clone(), matcher_type.clone()),
        );
        dataset.insert(
            Thing::new(iri("https://pod.example/acr#m1"))
                .with_added_iri(rdf_type.clone(), matcher_type.clone()),
        );
        dataset.insert(Thing::new(iri("https://pod.example/acr#p1")));

        let matchers = dataset.subjects_of_type(&matcher_type);
        assert_eq!(matchers.len(), 2);
        // URL order is deterministic
        assert_eq!(matchers[0].url().as_str(), "https://pod.example/acr#m1");
    }
}
