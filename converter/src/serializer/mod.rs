//! Serializers for converted entities.
//!
//! Two output formats are supported:
//! - **Turtle** ([`turtle`]): prefixed names grouped by subject, the format
//!   of the Wikibase entity data dumps
//! - **N-Triples** ([`ntriples`]): one triple per line with absolute IRIs,
//!   for streaming and bulk loading
//!
//! Both implement [`RdfWriter`], which the entity writers feed triple by
//! triple. A writer buffers the whole document in memory.

pub mod ntriples;
pub mod turtle;

use crate::term::{Iri, Term};
use crate::vocabulary::Vocabulary;

/// Output serialization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Format {
    /// Turtle with the Wikibase prefix block.
    #[default]
    Turtle,
    /// N-Triples.
    NTriples,
}

/// A sink for triples that renders them into a document.
pub trait RdfWriter {
    /// Appends a triple.
    fn triple(&mut self, subject: &Term, predicate: &Iri, object: &Term);

    /// Finishes the document and returns it.
    fn finish(self: Box<Self>) -> String;
}

/// Creates the writer for a format; Turtle writers start with the prefix
/// block.
#[must_use]
pub fn writer(format: Format, vocab: &Vocabulary) -> Box<dyn RdfWriter + '_> {
    match format {
        Format::Turtle => Box::new(turtle::TurtleWriter::new(vocab)),
        Format::NTriples => Box::new(ntriples::NTriplesWriter::new(vocab)),
    }
}

/// Escapes the lexical form of a literal for a double-quoted string.
///
/// With `ascii_only`, every non-ASCII character is written as `\uXXXX` or
/// `\UXXXXXXXX`.
pub(crate) fn escape_literal(out: &mut String, lexical: &str, ascii_only: bool) {
    for c in lexical.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            c if c.is_control() && (c as u32) < 0x80 => {
                out.push_str(&format!("\\u{:04X}", c as u32));
            }
            c if ascii_only && !c.is_ascii() => {
                let code = c as u32;
                if code > 0xFFFF {
                    out.push_str(&format!("\\U{code:08X}"));
                } else {
                    out.push_str(&format!("\\u{code:04X}"));
                }
            }
            c => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn escaped(s: &str, ascii_only: bool) -> String {
        let mut out = String::new();
        escape_literal(&mut out, s, ascii_only);
        out
    }

    #[test]
    fn escapes_quotes_and_controls() {
        assert_eq!(escaped("a\"b\\c\nd\te", false), "a\\\"b\\\\c\\nd\\te");
        assert_eq!(escaped("\u{8}\u{c}\u{1}", false), "\\b\\f\\u0001");
    }

    #[test]
    fn non_ascii_kept_unless_requested() {
        assert_eq!(escaped("Zürich", false), "Zürich");
        assert_eq!(escaped("Zürich", true), "Z\\u00FCrich");
        assert_eq!(escaped("😀", true), "\\U0001F600");
    }
}
