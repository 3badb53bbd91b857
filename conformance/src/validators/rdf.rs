//! RDF 1.1 well-formedness validator.
//!
//! Every Turtle document must parse as Turtle 1.1, every N-Triples document
//! as N-Triples, N-Triples output must be pure ASCII, and both
//! serializations of the same conversion must carry the same number of
//! triples.

use anyhow::Result;
use sophia_api::source::TripleSource;
use sophia_turtle::parser::{nt, turtle};
use wikibase_rdf::{Format, Mode};

use crate::report::{ConformanceReport, TestResult};
use crate::validators::{describe, render};
use crate::{FixtureSet, Variant, VARIANTS};

const VALIDATOR: &str = "rdf";

/// Parses the output of every case in every variant.
///
/// # Errors
///
/// Never fails; parse and conversion errors are reported as failures.
pub fn validate(fixtures: &FixtureSet) -> Result<ConformanceReport> {
    let mut report = ConformanceReport::new();

    for case in &fixtures.cases {
        for mode in [Mode::Full, Mode::Truthy] {
            let mut counts = Vec::new();
            for variant in VARIANTS.iter().filter(|v| v.mode == mode) {
                let what = describe(variant);
                let document = match render(fixtures, case, variant) {
                    Ok(document) => document,
                    Err(e) => {
                        report.push(
                            TestResult::fail(VALIDATOR, format!("{what}: conversion failed: {e}"))
                                .for_fixture(&case.name),
                        );
                        continue;
                    }
                };
                match count_triples(variant, &document) {
                    Ok(count) => {
                        report.push(
                            TestResult::pass(VALIDATOR, format!("{what} parses ({count} triples)"))
                                .for_fixture(&case.name),
                        );
                        counts.push(count);
                    }
                    Err(e) => report.push(
                        TestResult::fail(VALIDATOR, format!("{what} does not parse: {e}"))
                            .for_fixture(&case.name),
                    ),
                }
                if variant.format == Format::NTriples && !document.is_ascii() {
                    report.push(
                        TestResult::fail(VALIDATOR, format!("{what} contains non-ASCII characters"))
                            .for_fixture(&case.name),
                    );
                }
            }
            if let [turtle, ntriples] = counts[..] {
                if turtle != ntriples {
                    report.push(
                        TestResult::fail(
                            VALIDATOR,
                            format!(
                                "{mode:?}: Turtle has {turtle} triples, N-Triples has {ntriples}"
                            )
                            .to_lowercase(),
                        )
                        .for_fixture(&case.name),
                    );
                }
            }
        }
    }

    Ok(report)
}

/// Parses `document` in the variant's syntax and counts its triples.
pub fn count_triples(variant: &Variant, document: &str) -> Result<usize, String> {
    let mut count = 0;
    let parsed = match variant.format {
        Format::Turtle => turtle::parse_str(document)
            .for_each_triple(|_| count += 1)
            .map_err(|e| e.to_string()),
        Format::NTriples => nt::parse_str(document)
            .for_each_triple(|_| count += 1)
            .map_err(|e| e.to_string()),
    };
    parsed.map(|()| count)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TURTLE: Variant = VARIANTS[0];
    const NTRIPLES: Variant = VARIANTS[2];

    #[test]
    fn counts_grouped_turtle() {
        let doc = "@prefix wd: <http://www.wikidata.org/entity/> .\n\
                   @prefix wikibase: <http://wikiba.se/ontology#> .\n\n\
                   wd:Q42 a wikibase:Item ;\n\twikibase:sitelinks \"1\", \"2\" .\n";
        assert_eq!(count_triples(&TURTLE, doc), Ok(3));
    }

    #[test]
    fn rejects_broken_ntriples() {
        assert!(count_triples(&NTRIPLES, "<http://a> <http://b> .\n").is_err());
    }
}
