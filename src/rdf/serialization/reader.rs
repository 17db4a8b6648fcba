//! Streaming parsers built on rio

use super::{ParseError, ParseResult, RdfFormat};
use crate::rdf::graph::Graph;
use crate::rdf::types::{BlankNode, Literal, NamedNode, RdfObject, RdfPredicate, RdfSubject, Triple};
use oxiri::Iri;
use rio_api::model;
use rio_api::parser::TriplesParser;
use rio_turtle::{NTriplesParser, TurtleParser};
use rio_xml::RdfXmlParser;
use std::collections::HashMap;
use std::io::BufRead;

/// RDF document parser
pub struct RdfParser;

impl RdfParser {
    /// Parse a whole document into an owned graph
    pub fn parse<R: BufRead>(
        reader: R,
        format: RdfFormat,
        base_iri: Option<&str>,
    ) -> ParseResult<Graph> {
        let base = base_iri.map(|iri| Iri::parse(iri.to_string())).transpose()?;

        match format {
            RdfFormat::Turtle => collect(TurtleParser::new(reader, base)),
            RdfFormat::NTriples => collect(NTriplesParser::new(reader)),
            RdfFormat::RdfXml => collect(RdfXmlParser::new(reader, base)),
        }
    }
}

/// Blank node labels are scoped to one document: each label gets a fresh
/// node, so two documents that both say `_:b0` describe different resources.
type BlankScope = HashMap<String, BlankNode>;

fn collect<P>(mut parser: P) -> ParseResult<Graph>
where
    P: TriplesParser,
    ParseError: From<P::Error>,
{
    let mut graph = Graph::new();
    let mut blanks = BlankScope::new();
    parser.parse_all(&mut |t| -> ParseResult<()> {
        graph.insert(Triple::new(
            convert_subject(t.subject, &mut blanks)?,
            convert_predicate(t.predicate)?,
            convert_object(t.object, &mut blanks)?,
        ));
        Ok(())
    })?;
    Ok(graph)
}

fn named(node: model::NamedNode<'_>) -> ParseResult<NamedNode> {
    NamedNode::new(node.iri).map_err(|e| ParseError::Parse(e.to_string()))
}

fn blank(node: model::BlankNode<'_>, blanks: &mut BlankScope) -> BlankNode {
    blanks.entry(node.id.to_string()).or_default().clone()
}

fn convert_subject(s: model::Subject<'_>, blanks: &mut BlankScope) -> ParseResult<RdfSubject> {
    #[allow(unreachable_patterns)]
    match s {
        model::Subject::NamedNode(n) => Ok(named(n)?.into()),
        model::Subject::BlankNode(b) => Ok(blank(b, blanks).into()),
        _ => Err(ParseError::Parse("Unsupported subject type".to_string())),
    }
}

fn convert_predicate(p: model::NamedNode<'_>) -> ParseResult<RdfPredicate> {
    Ok(named(p)?.into())
}

fn convert_object(o: model::Term<'_>, blanks: &mut BlankScope) -> ParseResult<RdfObject> {
    #[allow(unreachable_patterns)]
    match o {
        model::Term::NamedNode(n) => Ok(named(n)?.into()),
        model::Term::BlankNode(b) => Ok(blank(b, blanks).into()),
        model::Term::Literal(model::Literal::Simple { value }) => {
            Ok(Literal::new_simple_literal(value).into())
        }
        model::Term::Literal(model::Literal::LanguageTaggedString { value, language }) => {
            Literal::new_language_tagged_literal(value, language)
                .map(Into::into)
                .map_err(|e| ParseError::Parse(e.to_string()))
        }
        model::Term::Literal(model::Literal::Typed { value, datatype }) => {
            Ok(Literal::new_typed_literal(value, named(datatype)?).into())
        }
        _ => Err(ParseError::Parse("Unsupported object type".to_string())),
    }
}
