//! Owned, connection-independent set of triples

use super::types::{RdfObject, RdfPredicate, RdfSubject, Triple};
use std::collections::hash_set;
use std::collections::HashSet;

/// A set of triples. Duplicates collapse and iteration order is unspecified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Graph {
    triples: HashSet<Triple>,
}

impl Graph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a triple; returns false if it was already present
    pub fn insert(&mut self, triple: Triple) -> bool {
        self.triples.insert(triple)
    }

    /// Remove a triple; returns false if it was absent
    pub fn remove(&mut self, triple: &Triple) -> bool {
        self.triples.remove(triple)
    }

    pub fn contains(&self, triple: &Triple) -> bool {
        self.triples.contains(triple)
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    pub fn iter(&self) -> hash_set::Iter<'_, Triple> {
        self.triples.iter()
    }

    /// Distinct subjects of the graph
    pub fn subjects(&self) -> HashSet<RdfSubject> {
        self.triples.iter().map(|t| t.subject.clone()).collect()
    }

    /// Objects of every triple with the given subject and predicate
    pub fn objects<'a>(
        &'a self,
        subject: &'a RdfSubject,
        predicate: &'a RdfPredicate,
    ) -> impl Iterator<Item = &'a RdfObject> + 'a {
        self.triples
            .iter()
            .filter(move |t| &t.subject == subject && &t.predicate == predicate)
            .map(|t| &t.object)
    }
}

impl FromIterator<Triple> for Graph {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        Self {
            triples: iter.into_iter().collect(),
        }
    }
}

impl Extend<Triple> for Graph {
    fn extend<I: IntoIterator<Item = Triple>>(&mut self, iter: I) {
        self.triples.extend(iter);
    }
}

impl IntoIterator for Graph {
    type Item = Triple;
    type IntoIter = hash_set::IntoIter<Triple>;

    fn into_iter(self) -> Self::IntoIter {
        self.triples.into_iter()
    }
}

impl<'a> IntoIterator for &'a Graph {
    type Item = &'a Triple;
    type IntoIter = hash_set::Iter<'a, Triple>;

    fn into_iter(self) -> Self::IntoIter {
        self.triples.iter()
    }
}
