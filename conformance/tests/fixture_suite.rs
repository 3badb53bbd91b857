//! Runs the full conformance suite over the converter's fixture directory.

use std::path::Path;

use wikibase_rdf_conformance::{run_all, Severity};

#[test]
fn converter_fixtures_conform() {
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("../converter/tests/fixtures");
    let report = run_all(&fixtures).unwrap();

    let failures: Vec<String> = report
        .results
        .iter()
        .filter(|r| r.is_failure())
        .map(ToString::to_string)
        .collect();
    assert!(failures.is_empty(), "{}", failures.join("\n"));
    assert_eq!(report.count(Severity::Warning), 0);
    // Three cases, four golden files each.
    assert!(report.count(Severity::Pass) >= 12);
}
