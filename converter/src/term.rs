//! RDF terms as handed to the serializers.

use crate::vocabulary::{Namespace, Vocabulary};

/// An IRI: a local name in a fixed namespace, or a full IRI.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Iri {
    /// `prefix:local`, e.g. `wd:Q42`.
    Name(Namespace, String),
    /// An absolute IRI outside the fixed namespaces.
    Full(String),
}

impl Iri {
    /// Creates a namespaced IRI.
    pub fn name(ns: Namespace, local: impl Into<String>) -> Self {
        Iri::Name(ns, local.into())
    }

    /// Creates a full IRI.
    pub fn full(iri: impl Into<String>) -> Self {
        Iri::Full(iri.into())
    }

    /// Expands the IRI against a vocabulary.
    #[must_use]
    pub fn expand(&self, vocab: &Vocabulary) -> String {
        match self {
            Iri::Name(ns, local) => format!("{}{}", vocab.namespace(*ns), local),
            Iri::Full(iri) => iri.clone(),
        }
    }
}

/// The lexical form of a literal plus its language tag or datatype.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LiteralKind {
    /// A simple string (`xsd:string`), written without a datatype.
    Plain,
    /// A language-tagged string.
    Lang(String),
    /// A typed literal.
    Typed(Iri),
}

/// An RDF literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Literal {
    /// The unescaped lexical form.
    pub lexical: String,
    /// Language tag or datatype.
    pub kind: LiteralKind,
}

impl Literal {
    /// A plain string literal.
    pub fn plain(lexical: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            kind: LiteralKind::Plain,
        }
    }

    /// A language-tagged literal. The tag must already be valid.
    pub fn lang(lexical: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            kind: LiteralKind::Lang(lang.into()),
        }
    }

    /// A literal typed with an `xsd:` datatype.
    pub fn xsd(lexical: impl Into<String>, datatype: &str) -> Self {
        Self {
            lexical: lexical.into(),
            kind: LiteralKind::Typed(Iri::name(Namespace::Xsd, datatype)),
        }
    }

    /// A literal with an arbitrary datatype.
    pub fn typed(lexical: impl Into<String>, datatype: Iri) -> Self {
        Self {
            lexical: lexical.into(),
            kind: LiteralKind::Typed(datatype),
        }
    }

    /// An `xsd:integer` literal.
    #[must_use]
    pub fn integer(value: i64) -> Self {
        Self::xsd(value.to_string(), "integer")
    }
}

/// Subject or object of a triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    /// An IRI node.
    Iri(Iri),
    /// A blank node label (without `_:`).
    Blank(String),
    /// A literal; never used as a subject.
    Literal(Literal),
}

impl From<Iri> for Term {
    fn from(iri: Iri) -> Self {
        Term::Iri(iri)
    }
}

impl From<Literal> for Term {
    fn from(literal: Literal) -> Self {
        Term::Literal(literal)
    }
}

/// Shorthand for `Iri::name(ns, local)`.
pub fn name(ns: Namespace, local: &str) -> Iri {
    Iri::name(ns, local)
}

/// Shorthand for a namespaced IRI term.
pub fn node(ns: Namespace, local: &str) -> Term {
    Term::Iri(Iri::name(ns, local))
}
