//! Indexed in-memory triple store
//!
//! This is the engine behind [`crate::repository::MemoryStore`]; the repository
//! facade never touches it directly.

use super::graph::Graph;
use super::types::{RdfObject, RdfPredicate, RdfSubject, Triple, TriplePattern};
use std::collections::{HashMap, HashSet};

type Index<A, B, C> = HashMap<A, HashMap<B, HashSet<C>>>;

/// RDF triple store with multiple indices
///
/// Implements:
/// - SPO index (Subject-Predicate-Object)
/// - POS index (Predicate-Object-Subject)
/// - OSP index (Object-Subject-Predicate)
///
/// Every pattern with at least one bound position is answered from an index.
#[derive(Clone, Default)]
pub struct RdfStore {
    spo: Index<RdfSubject, RdfPredicate, RdfObject>,
    pos: Index<RdfPredicate, RdfObject, RdfSubject>,
    osp: Index<RdfObject, RdfSubject, RdfPredicate>,
    len: usize,
}

impl RdfStore {
    /// Create a new empty RDF store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a triple; returns false if it was already present
    pub fn insert(&mut self, triple: Triple) -> bool {
        let Triple {
            subject,
            predicate,
            object,
        } = triple;

        let inserted = self
            .spo
            .entry(subject.clone())
            .or_default()
            .entry(predicate.clone())
            .or_default()
            .insert(object.clone());
        if !inserted {
            return false;
        }

        self.pos
            .entry(predicate.clone())
            .or_default()
            .entry(object.clone())
            .or_default()
            .insert(subject.clone());
        self.osp
            .entry(object)
            .or_default()
            .entry(subject)
            .or_default()
            .insert(predicate);
        self.len += 1;
        true
    }

    /// Insert every triple of a graph, returning how many were new
    pub fn insert_graph(&mut self, graph: &Graph) -> usize {
        graph
            .iter()
            .filter(|t| self.insert((*t).clone()))
            .count()
    }

    /// Remove a triple; returns false if it was absent
    pub fn remove(&mut self, triple: &Triple) -> bool {
        if !remove_from(&mut self.spo, &triple.subject, &triple.predicate, &triple.object) {
            return false;
        }
        remove_from(&mut self.pos, &triple.predicate, &triple.object, &triple.subject);
        remove_from(&mut self.osp, &triple.object, &triple.subject, &triple.predicate);
        self.len -= 1;
        true
    }

    /// Remove every triple of a graph, returning how many were present
    pub fn remove_graph(&mut self, graph: &Graph) -> usize {
        graph.iter().filter(|t| self.remove(t)).count()
    }

    /// Check if a triple exists in the store
    pub fn contains(&self, triple: &Triple) -> bool {
        self.spo
            .get(&triple.subject)
            .and_then(|preds| preds.get(&triple.predicate))
            .is_some_and(|objs| objs.contains(&triple.object))
    }

    /// Get the total number of triples
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Clear all triples
    pub fn clear(&mut self) {
        self.spo.clear();
        self.pos.clear();
        self.osp.clear();
        self.len = 0;
    }

    /// Query triples matching a pattern
    pub fn query(&self, pattern: &TriplePattern) -> Vec<Triple> {
        match (&pattern.subject, &pattern.predicate, &pattern.object) {
            (Some(s), _, _) => self
                .spo
                .get(s)
                .into_iter()
                .flat_map(|preds| preds.iter())
                .filter(|(p, _)| pattern.predicate.as_ref().map_or(true, |want| want == *p))
                .flat_map(|(p, objs)| objs.iter().map(move |o| (p, o)))
                .filter(|(_, o)| pattern.object.as_ref().map_or(true, |want| want == *o))
                .map(|(p, o)| Triple::new(s.clone(), p.clone(), o.clone()))
                .collect(),
            (None, Some(p), _) => self
                .pos
                .get(p)
                .into_iter()
                .flat_map(|objs| objs.iter())
                .filter(|(o, _)| pattern.object.as_ref().map_or(true, |want| want == *o))
                .flat_map(|(o, subjs)| subjs.iter().map(move |s| (o, s)))
                .map(|(o, s)| Triple::new(s.clone(), p.clone(), o.clone()))
                .collect(),
            (None, None, Some(o)) => self
                .osp
                .get(o)
                .into_iter()
                .flat_map(|subjs| subjs.iter())
                .flat_map(|(s, preds)| preds.iter().map(move |p| (s, p)))
                .map(|(s, p)| Triple::new(s.clone(), p.clone(), o.clone()))
                .collect(),
            (None, None, None) => self.iter().collect(),
        }
    }

    /// Get an iterator over all triples
    pub fn iter(&self) -> impl Iterator<Item = Triple> + '_ {
        self.spo.iter().flat_map(|(s, preds)| {
            preds.iter().flat_map(move |(p, objs)| {
                objs.iter()
                    .map(move |o| Triple::new(s.clone(), p.clone(), o.clone()))
            })
        })
    }
}

fn remove_from<A, B, C>(index: &mut Index<A, B, C>, a: &A, b: &B, c: &C) -> bool
where
    A: std::hash::Hash + Eq,
    B: std::hash::Hash + Eq,
    C: std::hash::Hash + Eq,
{
    let Some(second) = index.get_mut(a) else {
        return false;
    };
    let Some(third) = second.get_mut(b) else {
        return false;
    };
    if !third.remove(c) {
        return false;
    }
    if third.is_empty() {
        second.remove(b);
    }
    if second.is_empty() {
        index.remove(a);
    }
    true
}
