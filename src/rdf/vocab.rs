//! Fixed RDF / RDFS vocabulary used by the repository
//!
//! Backed by the constants oxrdf ships, so the IRIs are spelled out once.

use super::types::{NamedNode, RdfPredicate, RdfSubject};
use oxrdf::vocab::{rdf, rdfs};

/// `rdf:first`
pub fn rdf_first() -> RdfPredicate {
    NamedNode::from(rdf::FIRST.into_owned()).into()
}

/// `rdf:rest`
pub fn rdf_rest() -> RdfPredicate {
    NamedNode::from(rdf::REST.into_owned()).into()
}

/// `rdf:type`
pub fn rdf_type() -> RdfPredicate {
    NamedNode::from(rdf::TYPE.into_owned()).into()
}

/// `rdf:nil`, the empty list
pub fn rdf_nil() -> RdfSubject {
    NamedNode::from(rdf::NIL.into_owned()).into()
}

/// `rdfs:subClassOf`
pub fn rdfs_subclass_of() -> RdfPredicate {
    NamedNode::from(rdfs::SUB_CLASS_OF.into_owned()).into()
}
