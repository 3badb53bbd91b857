//! Determinism validator: converting the same entity twice, with separate
//! converters, yields identical documents.

use anyhow::Result;

use crate::report::{ConformanceReport, TestResult};
use crate::validators::{describe, render};
use crate::{FixtureSet, VARIANTS};

const VALIDATOR: &str = "determinism";

/// Converts every case twice per variant and compares the output.
///
/// # Errors
///
/// Never fails; conversion errors are reported as failures.
pub fn validate(fixtures: &FixtureSet) -> Result<ConformanceReport> {
    let mut report = ConformanceReport::new();

    for case in &fixtures.cases {
        for variant in &VARIANTS {
            let what = describe(variant);
            let result = match (render(fixtures, case, variant), render(fixtures, case, variant)) {
                (Ok(first), Ok(second)) if first == second => {
                    TestResult::pass(VALIDATOR, format!("{what} output is stable"))
                }
                (Ok(_), Ok(_)) => {
                    TestResult::fail(VALIDATOR, format!("{what} output changed between runs"))
                }
                (Err(e), _) | (_, Err(e)) => {
                    TestResult::fail(VALIDATOR, format!("{what}: conversion failed: {e}"))
                }
            };
            report.push(result.for_fixture(&case.name));
        }
    }

    Ok(report)
}
