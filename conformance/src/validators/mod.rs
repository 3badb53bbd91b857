//! Conformance validators, one module per concern.

pub mod determinism;
pub mod golden;
pub mod rdf;

/// Converts `case` for `variant`, folding conversion errors into a message.
pub(crate) fn render(
    fixtures: &crate::FixtureSet,
    case: &crate::Case,
    variant: &crate::Variant,
) -> Result<String, String> {
    fixtures
        .converter(variant)
        .convert_to_string(&case.entity)
        .map_err(|e| e.to_string())
}

/// Short description of a variant for report messages.
pub(crate) fn describe(variant: &crate::Variant) -> String {
    format!("{:?} {:?}", variant.mode, variant.format).to_lowercase()
}
