//! `wikibase-rdf-conformance`: Validates converter output against the
//! fixture suite.
//!
//! Runs the complete conformance suite across:
//! - Golden files (byte-identical Turtle and N-Triples, full and truthy)
//! - RDF 1.1 well-formedness of every document
//! - Determinism of repeated conversions
//!
//! **Usage:**
//! ```
//! wikibase-rdf-conformance [--fixtures <path>]
//! ```
//!
//! Exits non-zero if any conformance check fails.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use wikibase_rdf_conformance::{run_all, Severity};

/// Run the wikibase-rdf conformance suite.
#[derive(Parser)]
#[command(
    name = "wikibase-rdf-conformance",
    about = "Validate wikibase-rdf output against golden fixtures and RDF 1.1"
)]
struct Args {
    /// Path to the fixture directory.
    #[arg(long, default_value = "converter/tests/fixtures")]
    fixtures: PathBuf,

    /// Print passing checks too.
    #[arg(long)]
    verbose: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("warn".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let report = run_all(&args.fixtures)?;

    println!("wikibase-rdf Conformance Report");
    println!("===============================");
    println!();

    for result in &report.results {
        if result.severity == Severity::Pass && !args.verbose {
            continue;
        }
        println!("{result}");
    }

    let passed = report.count(Severity::Pass);
    let warned = report.count(Severity::Warning);
    let failed = report.count(Severity::Failure);

    println!();
    println!("Summary: {passed} passed, {warned} warnings, {failed} failed");

    if failed > 0 {
        eprintln!("Conformance FAILED: {failed} check(s) did not pass.");
        process::exit(1);
    }

    println!("Conformance PASSED.");
    Ok(())
}
