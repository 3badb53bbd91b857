//! `wikibase-rdf`: Converts Wikibase entity JSON to Turtle or N-Triples.
//!
//! Reads an entity document (a single entity or a `{"entities": {...}}`
//! wrapper), converts every entity in it and writes the documents to stdout
//! or a file. Property datatypes come from a registry file, from property
//! entities in the entity store, or both.
//!
//! **Usage:**
//! ```
//! wikibase-rdf --entity Q42.json --properties properties.json \
//!     [--entities-dir <dir>] [--format turtle|ntriples] [--mode full|truthy] \
//!     [--on-missing-property fail|skip] [--vocabulary <toml>] [--out <path>]
//! ```
//!
//! Log verbosity follows `RUST_LOG`; logs go to stderr.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use wikibase_rdf::json::{entities_from_json, registry_from_json, shape_from_entity};
use wikibase_rdf::{
    Converter, ConverterConfig, Entity, EntityLoader, Format, MissingPropertyPolicy, Mode,
    PropertyId, PropertyShapeRegistry, Vocabulary, VocabularyConfig,
};
use wikibase_rdf_conformance::DirectoryLoader;

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Turtle,
    Ntriples,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputMode {
    Full,
    Truthy,
}

#[derive(Clone, Copy, ValueEnum)]
enum OnMissing {
    Fail,
    Skip,
}

/// Convert Wikibase entities to RDF.
#[derive(Parser)]
#[command(
    name = "wikibase-rdf",
    about = "Convert Wikibase entity JSON to Turtle or N-Triples"
)]
struct Args {
    /// Entity JSON document to convert.
    #[arg(long)]
    entity: PathBuf,

    /// Property registry JSON (datatypes, labels, display order).
    #[arg(long)]
    properties: Option<PathBuf>,

    /// Directory of `{id}.json` files for referenced entities and
    /// unregistered properties.
    #[arg(long)]
    entities_dir: Option<PathBuf>,

    /// Output serialization.
    #[arg(long, value_enum, default_value = "turtle")]
    format: OutputFormat,

    /// Full statement graph or truthy direct claims only.
    #[arg(long, value_enum, default_value = "full")]
    mode: OutputMode,

    /// What to do with properties absent from the registry.
    #[arg(long, value_enum, default_value = "fail")]
    on_missing_property: OnMissing,

    /// TOML file overriding the repository vocabulary (root, data-base,
    /// license, software-version).
    #[arg(long)]
    vocabulary: Option<PathBuf>,

    /// Output file (default: stdout).
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("wikibase_rdf=info".parse()?),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let vocabulary = match &args.vocabulary {
        Some(path) => Vocabulary::new(&read_vocabulary(path)?),
        None => Vocabulary::wikidata(),
    };

    let mut registry = match &args.properties {
        Some(path) => registry_from_json(&read(path)?)
            .with_context(|| format!("Failed to parse property registry {}", path.display()))?,
        None => PropertyShapeRegistry::new(),
    };

    let text = read(&args.entity)?;
    let entities = entities_from_json(&text)
        .with_context(|| format!("Failed to parse entity document {}", args.entity.display()))?;

    let loader = args.entities_dir.as_deref().map(DirectoryLoader::new);
    if let Some(loader) = &loader {
        for entity in &entities {
            resolve_properties(&mut registry, loader, entity)?;
        }
    }

    let config = ConverterConfig::new(match args.on_missing_property {
        OnMissing::Fail => MissingPropertyPolicy::Fail,
        OnMissing::Skip => MissingPropertyPolicy::Skip,
    })
    .with_mode(match args.mode {
        OutputMode::Full => Mode::Full,
        OutputMode::Truthy => Mode::Truthy,
    })
    .with_format(match args.format {
        OutputFormat::Turtle => Format::Turtle,
        OutputFormat::Ntriples => Format::NTriples,
    });

    let mut converter = Converter::new(&registry, &vocabulary, config);
    if let Some(loader) = &loader {
        converter = converter.with_loader(loader);
    }

    let mut sink: Box<dyn Write> = match &args.out {
        Some(path) => Box::new(io::BufWriter::new(
            fs::File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };

    for entity in &entities {
        converter
            .convert(entity, &mut sink)
            .with_context(|| format!("Failed to convert {}", entity.id))?;
        info!(entity = %entity.id, statements = entity.statement_count(), "converted");
    }
    sink.flush().context("Failed to flush output")?;

    Ok(())
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn read_vocabulary(path: &Path) -> Result<VocabularyConfig> {
    toml::from_str(&read(path)?)
        .with_context(|| format!("Failed to parse vocabulary {}", path.display()))
}

/// Adds shapes for properties the registry lacks, read from their property
/// entities in the store. Properties with no entity stay unregistered and
/// fall under the missing-property policy.
fn resolve_properties(
    registry: &mut PropertyShapeRegistry,
    loader: &DirectoryLoader,
    entity: &Entity,
) -> Result<()> {
    let missing: Vec<PropertyId> = entity
        .all_statements()
        .flat_map(|statement| statement.snaks())
        .filter(|(pid, _)| registry.get(pid).is_none())
        .map(|(pid, _)| pid.clone())
        .collect();

    for pid in missing {
        if registry.get(&pid).is_some() {
            continue;
        }
        let id = pid.to_entity_id();
        match loader.load(&id)?.as_ref().and_then(shape_from_entity) {
            Some(shape) => {
                debug!(property = %id, datatype = %shape.datatype, "registered property from entity store");
                registry.insert(shape);
            }
            None => warn!(property = %id, dir = %loader.dir().display(), "no property entity found"),
        }
    }
    Ok(())
}
