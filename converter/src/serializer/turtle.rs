//! Turtle 1.1 writer in the layout of the Wikibase entity dumps.
//!
//! The document starts with the `@prefix` block of every [`Namespace`], in
//! declaration order. Consecutive triples on one subject share a statement:
//! a new predicate continues with ` ;` on a tab-indented line, a repeated
//! predicate with `, `. `rdf:type` is written as `a`.

use super::{escape_literal, RdfWriter};
use crate::format::escape_iri;
use crate::term::{Iri, Literal, LiteralKind, Term};
use crate::vocabulary::{Namespace, Vocabulary};

/// Buffers a Turtle document.
pub struct TurtleWriter<'v> {
    vocab: &'v Vocabulary,
    out: String,
    subject: Option<Term>,
    predicate: Option<Iri>,
}

impl<'v> TurtleWriter<'v> {
    /// Starts a document with the prefix block.
    #[must_use]
    pub fn new(vocab: &'v Vocabulary) -> Self {
        let mut out = String::with_capacity(16 * 1024);
        for ns in Namespace::ALL {
            out.push_str(&format!("@prefix {}: <{}> .\n", ns.prefix(), vocab.namespace(ns)));
        }
        out.push('\n');
        Self {
            vocab,
            out,
            subject: None,
            predicate: None,
        }
    }

    fn write_iri(&mut self, iri: &Iri) {
        match iri {
            Iri::Name(ns, local) if is_pn_local(local) => {
                self.out.push_str(ns.prefix());
                self.out.push(':');
                self.out.push_str(local);
            }
            Iri::Name(..) | Iri::Full(_) => {
                self.out.push('<');
                self.out.push_str(&escape_iri(&iri.expand(self.vocab)));
                self.out.push('>');
            }
        }
    }

    fn write_predicate(&mut self, predicate: &Iri) {
        if matches!(predicate, Iri::Name(Namespace::Rdf, local) if local == "type") {
            self.out.push('a');
        } else {
            self.write_iri(predicate);
        }
    }

    fn write_literal(&mut self, literal: &Literal) {
        self.out.push('"');
        escape_literal(&mut self.out, &literal.lexical, false);
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

    fn write_term(&mut self, term: &Term) {
        match term {
            Term::Iri(iri) => self.write_iri(iri),
            Term::Blank(label) => {
                self.out.push_str("_:");
                self.out.push_str(label);
            }
            Term::Literal(literal) => self.write_literal(literal),
        }
    }
}

impl RdfWriter for TurtleWriter<'_> {
    fn triple(&mut self, subject: &Term, predicate: &Iri, object: &Term) {
        if self.subject.as_ref() == Some(subject) {
            if self.predicate.as_ref() == Some(predicate) {
                self.out.push_str(", ");
            } else {
                self.out.push_str(" ;\n\t");
                self.write_predicate(predicate);
                self.out.push(' ');
                self.predicate = Some(predicate.clone());
            }
        } else {
            if self.subject.is_some() {
                self.out.push_str(" .\n\n");
            }
            self.write_term(subject);
            self.out.push(' ');
            self.write_predicate(predicate);
            self.out.push(' ');
            self.subject = Some(subject.clone());
            self.predicate = Some(predicate.clone());
        }
        self.write_term(object);
    }

    fn finish(mut self: Box<Self>) -> String {
        if self.subject.is_some() {
            self.out.push_str(" .\n");
        }
        self.out
    }
}

fn is_pn_chars(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// Whether `local` can be written as the local part of a prefixed name.
///
/// Only the ASCII subset of `PN_LOCAL` is accepted; anything else is written
/// as a full IRI.
fn is_pn_local(local: &str) -> bool {
    let mut chars = local.chars();
    let Some(first) = chars.next() else {
        return true;
    };
    if !(first.is_ascii_alphanumeric() || first == '_') {
        return false;
    }
    !local.ends_with('.') && chars.all(|c| is_pn_chars(c) || c == '.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::{name, node};
    use pretty_assertions::assert_eq;

    fn body(doc: &str) -> &str {
        doc.split_once("\n\n").map_or("", |(_, body)| body)
    }

    #[test]
    fn prefix_block_in_namespace_order() {
        let vocab = Vocabulary::wikidata();
        let doc = Box::new(TurtleWriter::new(&vocab)).finish();
        let prefixes: Vec<&str> = doc
            .lines()
            .take_while(|l| !l.is_empty())
            .filter_map(|l| l.strip_prefix("@prefix ")?.split(':').next())
            .collect();
        let expected: Vec<&str> = Namespace::ALL.iter().map(|ns| ns.prefix()).collect();
        assert_eq!(prefixes, expected);
        assert!(doc.starts_with("@prefix rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#> .\n"));
        assert!(doc.ends_with("@prefix wdno: <http://www.wikidata.org/prop/novalue/> .\n\n"));
    }

    #[test]
    fn groups_by_subject_and_predicate() {
        let vocab = Vocabulary::wikidata();
        let mut writer = Box::new(TurtleWriter::new(&vocab));
        let q42 = node(Namespace::Wd, "Q42");
        let ty = name(Namespace::Rdf, "type");
        writer.triple(&q42, &ty, &node(Namespace::Wikibase, "Item"));
        writer.triple(&q42, &name(Namespace::Rdfs, "label"), &Literal::lang("Douglas Adams", "en").into());
        writer.triple(&q42, &name(Namespace::Rdfs, "label"), &Literal::lang("Douglas Adams", "fr").into());
        writer.triple(&node(Namespace::Data, "Q42"), &ty, &node(Namespace::Schema, "Dataset"));
        let doc = writer.finish();
        assert_eq!(
            body(&doc),
            "wd:Q42 a wikibase:Item ;\n\trdfs:label \"Douglas Adams\"@en, \"Douglas Adams\"@fr .\n\n\
             data:Q42 a schema:Dataset .\n"
        );
    }

    #[test]
    fn illegal_local_names_fall_back_to_full_iris() {
        let vocab = Vocabulary::wikidata();
        let mut writer = Box::new(TurtleWriter::new(&vocab));
        writer.triple(
            &node(Namespace::Wds, "Q1$abc"),
            &name(Namespace::Wikibase, "rank"),
            &node(Namespace::Wikibase, "NormalRank"),
        );
        let doc = writer.finish();
        assert_eq!(
            body(&doc),
            "<http://www.wikidata.org/entity/statement/Q1$abc> wikibase:rank wikibase:NormalRank .\n"
        );
    }

    #[test]
    fn full_iris_are_percent_encoded() {
        let vocab = Vocabulary::wikidata();
        let mut writer = Box::new(TurtleWriter::new(&vocab));
        writer.triple(
            &node(Namespace::Wd, "Q1"),
            &name(Namespace::P, "P31"),
            &node(Namespace::Wds, "Q1 a>b"),
        );
        writer.triple(
            &node(Namespace::Wds, "Q1 a>b"),
            &name(Namespace::Wikibase, "rank"),
            &node(Namespace::Wikibase, "NormalRank"),
        );
        let doc = writer.finish();
        assert_eq!(
            body(&doc),
            "wd:Q1 p:P31 <http://www.wikidata.org/entity/statement/Q1%20a%3Eb> .\n\n\
             <http://www.wikidata.org/entity/statement/Q1%20a%3Eb> wikibase:rank wikibase:NormalRank .\n"
        );
    }

    #[test]
    fn typed_literals_and_blank_nodes() {
        let vocab = Vocabulary::wikidata();
        let mut writer = Box::new(TurtleWriter::new(&vocab));
        writer.triple(
            &Term::Blank("b0".into()),
            &name(Namespace::Wikibase, "quantityAmount"),
            &Literal::xsd("+3", "decimal").into(),
        );
        assert_eq!(body(&writer.finish()), "_:b0 wikibase:quantityAmount \"+3\"^^xsd:decimal .\n");
    }

    #[test]
    fn pn_local_rules() {
        assert!(is_pn_local("Q42"));
        assert!(is_pn_local("Q42-F078E5B3-F9A8-480E-B7AC-D97778CBBEF9"));
        assert!(is_pn_local("0a1b"));
        assert!(!is_pn_local("-x"));
        assert!(!is_pn_local("a."));
        assert!(!is_pn_local("Q1$x"));
        assert!(!is_pn_local("Q1/x"));
    }
}
