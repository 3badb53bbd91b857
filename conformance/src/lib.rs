//! wikibase-rdf conformance suite.
//!
//! Runs the converter over a fixture directory and checks the output
//! against the standards it must meet.
//!
//! # Conformance Scope
//!
//! | Check | Standard |
//! |-------|----------|
//! | Golden files | Byte-identical to the Wikibase RDF exporter |
//! | Turtle output | RDF 1.1 Turtle |
//! | N-Triples output | RDF 1.1 N-Triples, ASCII only |
//! | Repeatability | Same entity, same bytes |
//!
//! # Entry Point
//!
//! ```no_run
//! use wikibase_rdf_conformance::run_all;
//! use std::path::Path;
//!
//! let report = run_all(Path::new("converter/tests/fixtures"))?;
//! assert!(report.all_passed());
//! # Ok::<(), anyhow::Error>(())
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod fixtures;
pub mod loader;
pub mod report;
pub mod validators;

pub use fixtures::{Case, FixtureSet, Variant, VARIANTS};
pub use loader::DirectoryLoader;
pub use report::{ConformanceReport, Severity, TestResult};

use std::path::Path;

use tracing::info;

/// Runs all conformance validators over the fixture directory at `root`.
///
/// Validators are run in this order:
/// 1. Golden files
/// 2. RDF well-formedness
/// 3. Determinism
///
/// # Errors
///
/// Returns an error if the fixtures cannot be loaded or an expected file
/// cannot be read. Conversion failures are reported, not returned.
pub fn run_all(root: &Path) -> anyhow::Result<ConformanceReport> {
    let fixtures = FixtureSet::load(root)?;
    info!(
        cases = fixtures.cases.len(),
        properties = fixtures.registry.len(),
        "loaded fixtures"
    );

    let mut report = ConformanceReport::new();
    report.extend(validators::golden::validate(&fixtures)?);
    report.extend(validators::rdf::validate(&fixtures)?);
    report.extend(validators::determinism::validate(&fixtures)?);
    Ok(report)
}
