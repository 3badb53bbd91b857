//! Golden-file tests.
//!
//! Every case under `tests/fixtures/cases` is converted in each mode and
//! format and compared byte for byte with the expected document next to it.
//! Referenced entities come from `tests/fixtures/entities`.

use std::fs;
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use wikibase_rdf::json::{entity_from_json, registry_from_json};
use wikibase_rdf::{
    Converter, ConverterConfig, Entity, EntityId, Format, LoaderError, MissingPropertyPolicy,
    Mode, PropertyShapeRegistry, Vocabulary,
};

fn fixtures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn registry() -> PropertyShapeRegistry {
    let text = fs::read_to_string(fixtures().join("properties.json")).unwrap();
    registry_from_json(&text).unwrap()
}

fn store(id: &EntityId) -> Result<Option<Entity>, LoaderError> {
    let path = fixtures().join("entities").join(format!("{id}.json"));
    if !path.exists() {
        return Ok(None);
    }
    let text = fs::read_to_string(&path).map_err(|e| LoaderError::new(id.as_str(), e.to_string()))?;
    entity_from_json(&text)
        .map(Some)
        .map_err(|e| LoaderError::new(id.as_str(), e.to_string()))
}

fn check(case: &str) {
    let registry = registry();
    let vocabulary = Vocabulary::wikidata();
    let cases = fixtures().join("cases");
    let entity = entity_from_json(&fs::read_to_string(cases.join(format!("{case}.json"))).unwrap())
        .unwrap();

    let variants = [
        (Mode::Full, Format::Turtle, "ttl"),
        (Mode::Truthy, Format::Turtle, "truthy.ttl"),
        (Mode::Full, Format::NTriples, "nt"),
        (Mode::Truthy, Format::NTriples, "truthy.nt"),
    ];
    let loader = store;
    for (mode, format, extension) in variants {
        let config = ConverterConfig::new(MissingPropertyPolicy::Fail)
            .with_mode(mode)
            .with_format(format);
        let converter = Converter::new(&registry, &vocabulary, config).with_loader(&loader);
        let actual = converter.convert_to_string(&entity).unwrap();
        let expected = fs::read_to_string(cases.join(format!("{case}.{extension}"))).unwrap();
        assert_eq!(actual, expected, "{case}.{extension}");
    }
}

#[test]
fn douglas_adams() {
    check("q42");
}

#[test]
fn berlin() {
    check("q64");
}

#[test]
fn instance_of_property() {
    check("p31");
}

#[test]
fn write_to_sink_matches_string() {
    let registry = registry();
    let vocabulary = Vocabulary::wikidata();
    let entity =
        entity_from_json(&fs::read_to_string(fixtures().join("cases/q64.json")).unwrap()).unwrap();
    let converter = Converter::new(
        &registry,
        &vocabulary,
        ConverterConfig::new(MissingPropertyPolicy::Fail),
    );

    let mut sink = Vec::new();
    converter.convert(&entity, &mut sink).unwrap();
    assert_eq!(
        String::from_utf8(sink).unwrap(),
        converter.convert_to_string(&entity).unwrap()
    );
}
