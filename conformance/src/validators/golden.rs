//! Golden-file validator: converter output must equal the expected files
//! byte for byte.

use std::fs;

use anyhow::{Context, Result};

use crate::report::{ConformanceReport, TestResult};
use crate::validators::{describe, render};
use crate::{FixtureSet, VARIANTS};

const VALIDATOR: &str = "golden";

/// How many differing lines a failure lists.
const MAX_DETAILS: usize = 5;

/// Compares every case against each expected file that exists.
///
/// # Errors
///
/// Returns an error if an existing expected file cannot be read.
pub fn validate(fixtures: &FixtureSet) -> Result<ConformanceReport> {
    let mut report = ConformanceReport::new();

    for case in &fixtures.cases {
        let mut checked = 0;
        for variant in &VARIANTS {
            let path = case.expected_path(variant);
            if !path.exists() {
                continue;
            }
            checked += 1;
            let expected = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let what = describe(variant);

            let result = match render(fixtures, case, variant) {
                Err(e) => TestResult::fail(VALIDATOR, format!("{what}: conversion failed: {e}")),
                Ok(actual) if actual == expected => {
                    TestResult::pass(VALIDATOR, format!("{what} output matches"))
                }
                Ok(actual) => TestResult::fail(VALIDATOR, format!("{what} output differs"))
                    .with_details(diff_lines(&expected, &actual)),
            };
            report.push(result.for_fixture(&case.name));
        }
        if checked == 0 {
            report.push(
                TestResult::warn(VALIDATOR, "no expected output files").for_fixture(&case.name),
            );
        }
    }

    Ok(report)
}

/// The first lines where `expected` and `actual` disagree.
fn diff_lines(expected: &str, actual: &str) -> Vec<String> {
    let mut details = Vec::new();
    let mut left = expected.lines();
    let mut right = actual.lines();
    let mut line = 0;
    loop {
        line += 1;
        match (left.next(), right.next()) {
            (None, None) => break,
            (l, r) if l == r => continue,
            (l, r) => details.push(format!(
                "line {line}: expected {:?}, got {:?}",
                l.unwrap_or("<end>"),
                r.unwrap_or("<end>")
            )),
        }
        if details.len() == MAX_DETAILS {
            break;
        }
    }
    if details.is_empty() {
        // Same lines, different line endings or trailing newline.
        details.push(format!(
            "lengths differ: expected {} bytes, got {}",
            expected.len(),
            actual.len()
        ));
    }
    details
}
