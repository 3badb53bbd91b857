//! N-Triples writer.
//!
//! One triple per line with absolute IRIs. Literals escape every non-ASCII
//! character, so the output is plain ASCII apart from IRIs.

use super::{escape_literal, RdfWriter};
use crate::format::escape_iri;
use crate::term::{Iri, LiteralKind, Term};
use crate::vocabulary::Vocabulary;

/// Buffers an N-Triples document.
pub struct NTriplesWriter<'v> {
    vocab: &'v Vocabulary,
    out: String,
}

impl<'v> NTriplesWriter<'v> {
    /// Starts an empty document.
    #[must_use]
    pub fn new(vocab: &'v Vocabulary) -> Self {
        Self {
            vocab,
            out: String::with_capacity(32 * 1024),
        }
    }

    fn write_iri(&mut self, iri: &Iri) {
        self.out.push('<');
        self.out.push_str(&escape_iri(&iri.expand(self.vocab)));
        self.out.push('>');
    }

    fn write_term(&mut self, term: &Term) {
        match term {
            Term::Iri(iri) => self.write_iri(iri),
            Term::Blank(label) => {
                self.out.push_str("_:");
                self.out.push_str(label);
            }
            Term::Literal(literal) => {
                self.out.push('"');
                escape_literal(&mut self.out, &literal.lexical, true);
                self.out.push('"');
                match &literal.kind {
                    LiteralKind::Plain => {}
                    LiteralKind::Lang(tag) => {
                        self.out.push('@');
                        self.out.push_str(tag);
                    }
                    LiteralKind::Typed(datatype) => {
                        self.out.push_str("^^");
                        self.write_iri(datatype);
                    }
                }
            }
        }
    }
}

impl RdfWriter for NTriplesWriter<'_> {
    fn triple(&mut self, subject: &Term, predicate: &Iri, object: &Term) {
        self.write_term(subject);
        self.out.push(' ');
        self.write_iri(predicate);
        self.out.push(' ');
        self.write_term(object);
        self.out.push_str(" .\n");
    }

    fn finish(self: Box<Self>) -> String {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::{name, node, Literal};
    use crate::vocabulary::Namespace;
    use pretty_assertions::assert_eq;

    #[test]
    fn one_line_per_triple_with_full_iris() {
        let vocab = Vocabulary::wikidata();
        let mut writer = Box::new(NTriplesWriter::new(&vocab));
        let q42 = node(Namespace::Wd, "Q42");
        writer.triple(&q42, &name(Namespace::Rdf, "type"), &node(Namespace::Wikibase, "Item"));
        writer.triple(&q42, &name(Namespace::Rdfs, "label"), &Literal::lang("Zürich", "de").into());
        assert_eq!(
            writer.finish(),
            "<http://www.wikidata.org/entity/Q42> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://wikiba.se/ontology#Item> .\n\
             <http://www.wikidata.org/entity/Q42> <http://www.w3.org/2000/01/rdf-schema#label> \"Z\\u00FCrich\"@de .\n"
        );
    }

    #[test]
    fn iris_are_percent_encoded() {
        let vocab = Vocabulary::wikidata();
        let mut writer = Box::new(NTriplesWriter::new(&vocab));
        writer.triple(
            &node(Namespace::Wd, "Q1"),
            &name(Namespace::P, "P31"),
            &node(Namespace::Wds, "Q1 a>b"),
        );
        assert_eq!(
            writer.finish(),
            "<http://www.wikidata.org/entity/Q1> <http://www.wikidata.org/prop/P31> <http://www.wikidata.org/entity/statement/Q1%20a%3Eb> .\n"
        );
    }

    #[test]
    fn every_line_ends_with_period() {
        let vocab = Vocabulary::wikidata();
        let mut writer = Box::new(NTriplesWriter::new(&vocab));
        let v = node(Namespace::Wdv, "abc");
        writer.triple(&v, &name(Namespace::Wikibase, "timePrecision"), &Literal::integer(11).into());
        writer.triple(&v, &name(Namespace::Wikibase, "timeTimezone"), &Literal::integer(0).into());
        let doc = writer.finish();
        for line in doc.lines() {
            assert!(line.ends_with(" ."), "Line does not end with ' .': {line}");
        }
        assert!(doc.contains("\"11\"^^<http://www.w3.org/2001/XMLSchema#integer>"));
    }
}
