//! The entity converter: one entity in, one RDF document out.
//!
//! A document is written in a fixed order: prefixes, the entity core
//! (type, dataset metadata, terms, sitelinks), statement groups, ontology
//! blocks of the touched properties, then stubs of referenced entities.

use std::io::Write;

use tracing::{debug, debug_span, warn};

use crate::collector::{referenced_entities, write_referenced, EntityLoader};
use crate::error::{ConvertError, Result};
use crate::format::language_tag;
use crate::model::{Entity, EntityKind, PropertyId};
use crate::ontology::{write_descriptions, write_labels, write_property};
use crate::registry::{Datatype, PropertyShape, PropertyShapeRegistry};
use crate::serializer::{writer, Format, RdfWriter};
use crate::sitelink::write_sitelinks;
use crate::statement::StatementWriter;
use crate::term::{name, node, Iri, Literal, Term};
use crate::vocabulary::{Namespace, Vocabulary};

/// How much of the entity to write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Everything: statements, references, value nodes, ontology, stubs.
    #[default]
    Full,
    /// Terms and best-rank direct claims only.
    Truthy,
}

/// What to do with snaks whose property is not in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MissingPropertyPolicy {
    /// Abort with [`ConvertError::MissingProperty`].
    Fail,
    /// Leave the snak out of the document.
    Skip,
}

/// Per-conversion settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConverterConfig {
    /// Full or truthy output.
    pub mode: Mode,
    /// Output serialization.
    pub format: Format,
    /// Handling of unregistered properties.
    pub missing_property: MissingPropertyPolicy,
}

impl ConverterConfig {
    /// Full Turtle output with the given missing-property policy.
    #[must_use]
    pub fn new(missing_property: MissingPropertyPolicy) -> Self {
        Self {
            mode: Mode::Full,
            format: Format::Turtle,
            missing_property,
        }
    }

    /// Sets the mode.
    #[must_use]
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the output format.
    #[must_use]
    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }
}

/// Converts entities to RDF.
///
/// The converter only borrows its registry, vocabulary and loader, holds no
/// mutable state and can be shared between threads.
pub struct Converter<'a> {
    registry: &'a PropertyShapeRegistry,
    vocabulary: &'a Vocabulary,
    loader: Option<&'a (dyn EntityLoader + Sync)>,
    config: ConverterConfig,
}

impl<'a> Converter<'a> {
    /// Creates a converter without an entity loader; referenced entities
    /// get no stub blocks.
    #[must_use]
    pub fn new(
        registry: &'a PropertyShapeRegistry,
        vocabulary: &'a Vocabulary,
        config: ConverterConfig,
    ) -> Self {
        Self {
            registry,
            vocabulary,
            loader: None,
            config,
        }
    }

    /// Adds the loader used for referenced-entity stubs.
    #[must_use]
    pub fn with_loader(mut self, loader: &'a (dyn EntityLoader + Sync)) -> Self {
        self.loader = Some(loader);
        self
    }

    /// The converter's configuration.
    #[must_use]
    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Converts an entity and writes the document to `sink` in one call.
    ///
    /// # Errors
    ///
    /// Returns any conversion error before the sink is touched, or
    /// [`ConvertError::Io`] if writing fails.
    pub fn convert<W: Write>(&self, entity: &Entity, sink: &mut W) -> Result<()> {
        let document = self.convert_to_string(entity)?;
        sink.write_all(document.as_bytes())?;
        sink.flush()?;
        Ok(())
    }

    /// Converts an entity into a document string.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::MalformedValue`] for values that do not fit
    /// their property, [`ConvertError::MissingProperty`] under the `Fail`
    /// policy and [`ConvertError::Loader`] when the loader fails.
    pub fn convert_to_string(&self, entity: &Entity) -> Result<String> {
        let span = debug_span!("convert", entity = %entity.id);
        let _guard = span.enter();

        let mut out = writer(self.config.format, self.vocabulary);
        self.write_entity(out.as_mut(), entity)?;
        let document = out.finish();
        debug!(bytes = document.len(), "entity converted");
        Ok(document)
    }

    fn write_entity(&self, out: &mut dyn RdfWriter, entity: &Entity) -> Result<()> {
        let vocab = self.vocabulary;
        let full = self.config.mode == Mode::Full;
        let subject: Term = vocab.entity_uri(&entity.id).into();

        out.triple(
            &subject,
            &name(Namespace::Rdf, "type"),
            &node(Namespace::Wikibase, entity.kind.class_name()),
        );
        if full {
            self.write_dataset(out, entity);
        }
        write_labels(out, &subject, &entity.labels);
        write_descriptions(out, &subject, &entity.descriptions);
        write_aliases(out, &subject, entity);

        let own_shape = if full {
            self.own_shape(entity)?
        } else {
            None
        };
        if let Some(shape) = &own_shape {
            out.triple(
                &subject,
                &name(Namespace::Wikibase, "propertyType"),
                &node(Namespace::Wikibase, shape.datatype.ontology_class()),
            );
        }
        if full {
            write_sitelinks(out, vocab, &entity.id, entity.sitelinks.values());
        }

        let mut statements =
            StatementWriter::new(vocab, self.registry, self.config.missing_property);
        if let Some(shape) = &own_shape {
            statements.touch(&shape.id);
        }
        for property in self.registry.sort(entity.statements.keys()) {
            statements.write_group(
                out,
                &entity.id,
                property,
                &entity.statements[property],
                self.config.mode,
            )?;
        }
        if !full {
            return Ok(());
        }

        for property in statements.touched() {
            match &own_shape {
                Some(shape) if shape.id == *property => write_property(out, vocab, shape, true),
                _ => {
                    if let Some(shape) = self.registry.get(property) {
                        write_property(out, vocab, shape, false);
                    }
                }
            }
        }

        if let Some(loader) = self.loader {
            let stubs = referenced_entities(entity).into_iter().filter(|id| {
                statements.links_to(id)
                    && !statements.touched().contains(&PropertyId::new(id.as_str()))
            });
            write_referenced(out, vocab, loader, stubs)?;
        }
        Ok(())
    }

    /// The shape of the converted entity when it is a property.
    fn own_shape(&self, entity: &Entity) -> Result<Option<PropertyShape>> {
        if entity.kind != EntityKind::Property {
            return Ok(None);
        }
        let id = PropertyId::new(entity.id.as_str());
        if let Some(shape) = self.registry.get(&id) {
            return Ok(Some(shape.clone()));
        }
        if let Some(datatype) = entity.datatype {
            return Ok(Some(PropertyShape::new(id, datatype)));
        }
        match self.config.missing_property {
            MissingPropertyPolicy::Fail => Err(ConvertError::MissingProperty(id)),
            MissingPropertyPolicy::Skip => {
                warn!(property = %id, "property entity without datatype, no ontology block");
                Ok(None)
            }
        }
    }

    fn write_dataset(&self, out: &mut dyn RdfWriter, entity: &Entity) {
        let vocab = self.vocabulary;
        let dataset: Term = vocab.dataset_uri(&entity.id).into();
        let count = |n: usize| -> Term { Literal::xsd(n.to_string(), "integer").into() };
        // Only statements of registered properties are written and counted.
        let shapes: Vec<&PropertyShape> = entity
            .all_statements()
            .filter_map(|statement| self.registry.get(&statement.property))
            .collect();
        let identifiers = shapes
            .iter()
            .filter(|shape| shape.datatype == Datatype::ExternalId)
            .count();

        out.triple(&dataset, &name(Namespace::Rdf, "type"), &node(Namespace::Schema, "Dataset"));
        out.triple(&dataset, &name(Namespace::Schema, "about"), &vocab.entity_uri(&entity.id).into());
        out.triple(&dataset, &name(Namespace::Cc, "license"), &Iri::full(vocab.license()).into());
        out.triple(
            &dataset,
            &name(Namespace::Schema, "softwareVersion"),
            &Literal::plain(vocab.software_version()).into(),
        );
        if let Some(revision) = entity.lastrevid {
            out.triple(
                &dataset,
                &name(Namespace::Schema, "version"),
                &Literal::xsd(revision.to_string(), "integer").into(),
            );
        }
        if let Some(modified) = &entity.modified {
            out.triple(
                &dataset,
                &name(Namespace::Schema, "dateModified"),
                &Literal::xsd(modified.as_str(), "dateTime").into(),
            );
        }
        out.triple(&dataset, &name(Namespace::Wikibase, "statements"), &count(shapes.len()));
        out.triple(&dataset, &name(Namespace::Wikibase, "sitelinks"), &count(entity.sitelinks.len()));
        out.triple(&dataset, &name(Namespace::Wikibase, "identifiers"), &count(identifiers));
    }
}

fn write_aliases(out: &mut dyn RdfWriter, subject: &Term, entity: &Entity) {
    for (language, aliases) in &entity.aliases {
        let Some(tag) = language_tag(language) else {
            warn!(language = %language, "skipping aliases with invalid language code");
            continue;
        };
        for alias in aliases {
            out.triple(
                subject,
                &name(Namespace::Skos, "altLabel"),
                &Literal::lang(alias.as_str(), tag.as_str()).into(),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LoaderError;
    use crate::model::{EntityId, Statement, Value};

    fn registry() -> PropertyShapeRegistry {
        [
            PropertyShape::new("P31", Datatype::WikibaseItem).with_label("en", "instance of"),
            PropertyShape::new("P214", Datatype::ExternalId),
        ]
        .into_iter()
        .collect()
    }

    fn douglas() -> Entity {
        Entity::item("Q42")
            .with_label("en", "Douglas Adams")
            .with_statement(Statement::new("Q42-a", "P31", Value::EntityRef(EntityId::from("Q5"))))
            .with_statement(Statement::new("Q42-b", "P214", Value::StringLit("113230702".into())))
    }

    #[test]
    fn converter_is_sync() {
        fn assert_sync<T: Sync>() {}
        assert_sync::<Converter<'static>>();
    }

    #[test]
    fn document_sections_in_order() {
        let registry = registry();
        let vocab = Vocabulary::wikidata();
        let converter = Converter::new(&registry, &vocab, ConverterConfig::new(MissingPropertyPolicy::Fail));
        let doc = converter.convert_to_string(&douglas()).unwrap_or_default();
        let position = |needle: &str| doc.find(needle).unwrap_or(usize::MAX);
        assert!(position("wd:Q42 a wikibase:Item") < position("data:Q42 a schema:Dataset"));
        assert!(position("data:Q42 a schema:Dataset") < position("rdfs:label \"Douglas Adams\"@en"));
        assert!(position("wdt:P31 wd:Q5") < position("wds:Q42-a a wikibase:Statement"));
        assert!(position("wds:Q42-b a wikibase:Statement") < position("wd:P31 a wikibase:Property"));
        assert!(position("wd:P31 a wikibase:Property") < position("wd:P214 a wikibase:Property"));
        assert!(doc.contains("wikibase:identifiers \"1\"^^xsd:integer"));
        assert!(doc.contains("wikibase:statements \"2\"^^xsd:integer"));
    }

    #[test]
    fn conversion_is_deterministic() {
        let registry = registry();
        let vocab = Vocabulary::wikidata();
        let converter = Converter::new(&registry, &vocab, ConverterConfig::new(MissingPropertyPolicy::Fail));
        let first = converter.convert_to_string(&douglas()).ok();
        assert!(first.is_some());
        assert_eq!(first, converter.convert_to_string(&douglas()).ok());
    }

    #[test]
    fn failure_leaves_sink_untouched() {
        let registry = registry();
        let vocab = Vocabulary::wikidata();
        let converter = Converter::new(&registry, &vocab, ConverterConfig::new(MissingPropertyPolicy::Fail));
        let entity = douglas().with_statement(Statement::new("Q42-c", "P31", Value::StringLit("oops".into())));
        let mut sink = Vec::new();
        let result = converter.convert(&entity, &mut sink);
        assert!(matches!(result, Err(ConvertError::MalformedValue { .. })));
        assert!(sink.is_empty());
    }

    #[test]
    fn loader_errors_propagate() {
        let registry = registry();
        let vocab = Vocabulary::wikidata();
        let loader = |id: &EntityId| -> std::result::Result<Option<Entity>, LoaderError> {
            Err(LoaderError::new(id.as_str(), "timeout"))
        };
        let converter = Converter::new(&registry, &vocab, ConverterConfig::new(MissingPropertyPolicy::Fail))
            .with_loader(&loader);
        assert!(matches!(
            converter.convert_to_string(&douglas()),
            Err(ConvertError::Loader(_))
        ));
    }

    #[test]
    fn property_entity_gets_type_and_ontology_without_repeating_terms() {
        let registry = registry();
        let vocab = Vocabulary::wikidata();
        let converter = Converter::new(&registry, &vocab, ConverterConfig::new(MissingPropertyPolicy::Fail));
        let entity = Entity::property("P31", Datatype::WikibaseItem).with_label("en", "instance of");
        let doc = converter.convert_to_string(&entity).unwrap_or_default();
        assert!(doc.contains("wd:P31 a wikibase:Property .\n"));
        assert!(doc.contains("\twikibase:propertyType wikibase:WikibaseItem ;\n\twikibase:directClaim wdt:P31 ;"));
        assert_eq!(doc.matches("a wikibase:Property").count(), 1);
        assert_eq!(doc.matches("rdfs:label \"instance of\"@en").count(), 1);
    }

    fn stubs(id: &EntityId) -> std::result::Result<Option<Entity>, LoaderError> {
        let entity = match id.as_str() {
            "Q5" => Entity::item("Q5").with_label("en", "human"),
            "Q77" => Entity::item("Q77").with_label("en", "unlisted"),
            "P31" => Entity::property("P31", Datatype::WikibaseItem).with_label("en", "instance of"),
            _ => return Ok(None),
        };
        Ok(Some(entity))
    }

    #[test]
    fn described_properties_get_no_stub() {
        let mut registry = registry();
        registry.insert(PropertyShape::new("P1647", Datatype::WikibaseProperty));
        let vocab = Vocabulary::wikidata();
        let store = stubs;
        let converter = Converter::new(&registry, &vocab, ConverterConfig::new(MissingPropertyPolicy::Fail))
            .with_loader(&store);
        let entity = douglas().with_statement(Statement::new(
            "Q42-c",
            "P1647",
            Value::EntityRef(EntityId::from("P31")),
        ));
        let doc = converter.convert_to_string(&entity).unwrap_or_default();
        assert!(doc.contains("wdt:P1647 wd:P31"));
        assert_eq!(doc.matches("wd:P31 a wikibase:Property").count(), 1);
        assert_eq!(doc.matches("rdfs:label \"instance of\"@en").count(), 1);
        assert!(doc.contains("wd:Q5 a wikibase:Item ;\n\trdfs:label \"human\"@en"));
    }

    #[test]
    fn skipped_properties_leave_no_trace() {
        let registry = registry();
        let vocab = Vocabulary::wikidata();
        let store = stubs;
        let converter = Converter::new(&registry, &vocab, ConverterConfig::new(MissingPropertyPolicy::Skip))
            .with_loader(&store);
        let entity = douglas().with_statement(Statement::new(
            "Q42-z",
            "P9998",
            Value::EntityRef(EntityId::from("Q77")),
        ));
        let doc = converter.convert_to_string(&entity).unwrap_or_default();
        assert!(!doc.contains("Q77"));
        assert!(!doc.contains("P9998"));
        assert!(doc.contains("wd:Q5 a wikibase:Item"));
        assert!(doc.contains("wikibase:statements \"2\"^^xsd:integer"));
    }
}
