//! Wikibase entities rendered as RDF.
//!
//! The `wikibase-rdf` crate converts Wikibase items and properties into
//! Turtle or N-Triples documents that match the Wikibase RDF exporter byte
//! for byte: the same prefixes, triple order, value-node hashes, literal
//! forms and OWL declarations.
//!
//! # Entry Point
//!
//! ```
//! use wikibase_rdf::{
//!     Converter, ConverterConfig, Datatype, Entity, MissingPropertyPolicy, PropertyShape,
//!     PropertyShapeRegistry, Statement, Value, Vocabulary,
//! };
//!
//! let registry: PropertyShapeRegistry =
//!     [PropertyShape::new("P31", Datatype::WikibaseItem)].into_iter().collect();
//! let vocabulary = Vocabulary::wikidata();
//! let converter = Converter::new(
//!     &registry,
//!     &vocabulary,
//!     ConverterConfig::new(MissingPropertyPolicy::Fail),
//! );
//!
//! let entity = Entity::item("Q42")
//!     .with_label("en", "Douglas Adams")
//!     .with_statement(Statement::new("Q42-1", "P31", Value::EntityRef("Q5".into())));
//! let turtle = converter.convert_to_string(&entity)?;
//! assert!(turtle.contains("wdt:P31 wd:Q5"));
//! # Ok::<(), wikibase_rdf::ConvertError>(())
//! ```
//!
//! # Reading JSON
//!
//! ```
//! let entity = wikibase_rdf::json::entity_from_json(r#"{ "id": "Q1", "type": "item" }"#)?;
//! assert_eq!(entity.id.as_str(), "Q1");
//! # Ok::<(), wikibase_rdf::ConvertError>(())
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod calendar;
pub mod collector;
pub mod converter;
pub mod error;
pub mod format;
pub mod json;
pub mod model;
pub mod ontology;
pub mod registry;
pub mod serializer;
pub mod sitelink;
pub mod statement;
pub mod term;
pub mod uri;
pub mod vocabulary;

pub use collector::EntityLoader;
pub use converter::{Converter, ConverterConfig, MissingPropertyPolicy, Mode};
pub use error::{ConvertError, LoaderError, Result};
pub use model::{
    Entity, EntityId, EntityKind, GlobeCoordinate, PropertyId, Quantity, Rank, Reference,
    Sitelink, Statement, Time, Value,
};
pub use registry::{Datatype, PropertyShape, PropertyShapeRegistry};
pub use serializer::Format;
pub use vocabulary::{Namespace, Vocabulary, VocabularyConfig};
