//! Fixture discovery.
//!
//! A fixture directory holds:
//!
//! ```text
//! fixtures/
//!   properties.json        property shapes and display order
//!   entities/{id}.json     referenced-entity store
//!   cases/{name}.json      entities to convert
//!   cases/{name}.ttl       expected full Turtle
//!   cases/{name}.truthy.ttl
//!   cases/{name}.nt        expected full N-Triples
//!   cases/{name}.truthy.nt
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::WalkDir;
use wikibase_rdf::json::{entity_from_json, registry_from_json};
use wikibase_rdf::{
    Converter, ConverterConfig, Entity, Format, MissingPropertyPolicy, Mode, PropertyShapeRegistry,
    Vocabulary,
};

use crate::loader::DirectoryLoader;

/// One output variant checked against an expected file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Variant {
    /// Conversion mode.
    pub mode: Mode,
    /// Serialization.
    pub format: Format,
    /// Expected-file suffix, appended to the case name.
    pub suffix: &'static str,
}

/// Every variant, in the order the validators check them.
pub const VARIANTS: [Variant; 4] = [
    Variant { mode: Mode::Full, format: Format::Turtle, suffix: ".ttl" },
    Variant { mode: Mode::Truthy, format: Format::Turtle, suffix: ".truthy.ttl" },
    Variant { mode: Mode::Full, format: Format::NTriples, suffix: ".nt" },
    Variant { mode: Mode::Truthy, format: Format::NTriples, suffix: ".truthy.nt" },
];

/// An entity to convert, with the location of its expected outputs.
#[derive(Debug)]
pub struct Case {
    /// File stem, e.g. `q42`.
    pub name: String,
    /// Directory holding the case and its expected outputs.
    pub dir: PathBuf,
    /// The parsed entity.
    pub entity: Entity,
}

impl Case {
    /// Path of the expected output for `variant`.
    pub fn expected_path(&self, variant: &Variant) -> PathBuf {
        self.dir.join(format!("{}{}", self.name, variant.suffix))
    }
}

/// A loaded fixture directory.
#[derive(Debug)]
pub struct FixtureSet {
    /// Property shapes from `properties.json`.
    pub registry: PropertyShapeRegistry,
    /// URI layout; fixtures always use the Wikidata one.
    pub vocabulary: Vocabulary,
    /// Referenced-entity store over `entities/`.
    pub loader: DirectoryLoader,
    /// Cases sorted by name.
    pub cases: Vec<Case>,
}

impl FixtureSet {
    /// Loads the fixture directory at `root`.
    ///
    /// # Errors
    ///
    /// Returns an error if `properties.json` or a case file cannot be read
    /// or parsed.
    pub fn load(root: &Path) -> Result<Self> {
        let properties = root.join("properties.json");
        let text = fs::read_to_string(&properties)
            .with_context(|| format!("Failed to read {}", properties.display()))?;
        let registry = registry_from_json(&text)
            .with_context(|| format!("Failed to parse {}", properties.display()))?;

        let mut cases = Vec::new();
        let cases_dir = root.join("cases");
        for entry in WalkDir::new(&cases_dir).min_depth(1).max_depth(1).sort_by_file_name() {
            let entry = entry.with_context(|| format!("Failed to list {}", cases_dir.display()))?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let entity = entity_from_json(&text)
                .with_context(|| format!("Failed to parse {}", path.display()))?;
            cases.push(Case {
                name: name.to_owned(),
                dir: cases_dir.clone(),
                entity,
            });
        }

        Ok(Self {
            registry,
            vocabulary: Vocabulary::wikidata(),
            loader: DirectoryLoader::new(root.join("entities")),
            cases,
        })
    }

    /// A converter for `variant`, wired to this set's registry and loader.
    /// Fixtures are strict about missing properties.
    pub fn converter(&self, variant: &Variant) -> Converter<'_> {
        let config = ConverterConfig::new(MissingPropertyPolicy::Fail)
            .with_mode(variant.mode)
            .with_format(variant.format);
        Converter::new(&self.registry, &self.vocabulary, config).with_loader(&self.loader)
    }
}
