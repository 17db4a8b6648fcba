//! Value accessors built on pattern matching and tabular queries

use super::cursor::Cursor;
use super::error::{Operation, RepositoryError, RepositoryResult};
use super::Repository;
use crate::rdf::vocab::{rdf_first, rdf_nil, rdfs_subclass_of};
use crate::rdf::{RdfObject, RdfPredicate, RdfSubject, TriplePattern};
use crate::sparql::{subjects_query, values_query, QueryLanguage};
use std::collections::HashSet;

const VALUE_VAR: &str = "value";
const SUBJECT_VAR: &str = "uri";

impl Repository {
    /// Objects of `subject predicate ?value`, lazily.
    ///
    /// Returns an empty cursor without contacting the store when either
    /// argument is `None`. Best-effort otherwise.
    pub fn get_values(
        &self,
        subject: Option<&RdfSubject>,
        predicate: Option<&RdfPredicate>,
    ) -> Cursor<RdfObject> {
        self.values_for(Operation::GetValues, subject, predicate)
    }

    /// First value of [`Self::get_values`], if any. The cursor is closed
    /// before returning.
    pub fn get_value(
        &self,
        subject: Option<&RdfSubject>,
        predicate: Option<&RdfPredicate>,
    ) -> Option<RdfObject> {
        self.first_value(Operation::GetValues, subject, predicate)
    }

    fn values_for(
        &self,
        operation: Operation,
        subject: Option<&RdfSubject>,
        predicate: Option<&RdfPredicate>,
    ) -> Cursor<RdfObject> {
        let (Some(subject), Some(predicate)) = (subject, predicate) else {
            return Cursor::empty();
        };

        let result = match values_query(subject, predicate) {
            Some(query) => self
                .open_select(operation, QueryLanguage::Sparql, &query)
                .map(|rows| rows.filter_map(|mut row| row.take_value(VALUE_VAR))),
            None => {
                let pattern =
                    TriplePattern::new(Some(subject.clone()), Some(predicate.clone()), None);
                self.open_statements(operation, &pattern)
                    .map(|rows| rows.map(|t| t.object))
            }
        };
        self.best_effort(operation, result, Cursor::empty)
    }

    fn first_value(
        &self,
        operation: Operation,
        subject: Option<&RdfSubject>,
        predicate: Option<&RdfPredicate>,
    ) -> Option<RdfObject> {
        let first = self.values_for(operation, subject, predicate).first();
        self.best_effort(operation, first, || None)
    }

    /// Distinct subjects having `predicate object`; either may be open.
    /// Best-effort: failures yield an empty set.
    pub fn get_subjects(
        &self,
        predicate: Option<&RdfPredicate>,
        object: Option<&RdfObject>,
    ) -> HashSet<RdfSubject> {
        let result = match subjects_query(predicate, object) {
            Some(query) => self
                .open_select(Operation::GetSubjects, QueryLanguage::Sparql, &query)
                .and_then(|rows| {
                    rows.filter_map(|mut row| row.take_value(SUBJECT_VAR))
                        .filter_map(|value| value.as_subject())
                        .collect()
                }),
            None => {
                let pattern = TriplePattern::new(None, predicate.cloned(), object.cloned());
                self.open_statements(Operation::GetSubjects, &pattern)
                    .and_then(|rows| rows.map(|t| t.subject).collect())
            }
        };
        self.best_effort(Operation::GetSubjects, result, HashSet::new)
    }

    /// Direct superclasses of `resource`, lazily.
    ///
    /// Objects of `rdfs:subClassOf` are required to be resources. A literal
    /// object is a data error and surfaces as [`RepositoryError::UnexpectedTerm`]
    /// in the sequence instead of being skipped.
    pub fn get_superclasses(&self, resource: &RdfSubject) -> Cursor<RdfSubject> {
        self.statements(Some(resource), Some(&rdfs_subclass_of()), None)
            .try_map(|t| narrow_to_resource(t.object))
    }

    /// Whether `resource` looks like an RDF list: it is `rdf:nil` or has an
    /// `rdf:first`. The rest of the chain is not checked.
    pub fn is_list(&self, resource: &RdfSubject) -> bool {
        *resource == rdf_nil()
            || self
                .first_value(Operation::IsList, Some(resource), Some(&rdf_first()))
                .is_some()
    }
}

fn narrow_to_resource(object: RdfObject) -> RepositoryResult<RdfSubject> {
    object
        .as_subject()
        .ok_or_else(|| RepositoryError::UnexpectedTerm(object.to_string()))
}
