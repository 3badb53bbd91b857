//! Stub descriptions of the entities a document refers to.
//!
//! Every entity id appearing as a written main value, qualifier or
//! reference value is loaded through an [`EntityLoader`] and described by
//! its type, labels and descriptions, so the document is readable on its
//! own. Entities the document already describes get no stub.

use indexmap::IndexSet;
use tracing::debug;

use crate::error::{LoaderError, Result};
use crate::model::{Entity, EntityId};
use crate::ontology::{write_descriptions, write_labels};
use crate::serializer::RdfWriter;
use crate::term::{name, node, Term};
use crate::vocabulary::{Namespace, Vocabulary};

/// Looks up entities referenced by the converted entity.
///
/// A missing entity is `Ok(None)`; `Err` is reserved for failures of the
/// lookup itself and aborts the conversion.
pub trait EntityLoader {
    /// Loads an entity.
    ///
    /// # Errors
    ///
    /// Returns a [`LoaderError`] if the lookup itself fails.
    fn load(&self, id: &EntityId) -> std::result::Result<Option<Entity>, LoaderError>;
}

impl<F> EntityLoader for F
where
    F: Fn(&EntityId) -> std::result::Result<Option<Entity>, LoaderError>,
{
    fn load(&self, id: &EntityId) -> std::result::Result<Option<Entity>, LoaderError> {
        self(id)
    }
}

/// The ids of every entity `entity` refers to, in first-seen order,
/// without `entity` itself.
#[must_use]
pub fn referenced_entities(entity: &Entity) -> IndexSet<EntityId> {
    let mut ids = IndexSet::new();
    let snaks = entity.all_statements().flat_map(|statement| statement.snaks());
    for (_, value) in snaks {
        if let Some(id) = value.entity_ref() {
            if *id != entity.id && !ids.contains(id) {
                ids.insert(id.clone());
            }
        }
    }
    ids
}

/// Writes the stub block of one entity: type, labels and descriptions.
pub fn write_stub(out: &mut dyn RdfWriter, vocab: &Vocabulary, entity: &Entity) {
    let subject: Term = vocab.entity_uri(&entity.id).into();
    out.triple(
        &subject,
        &name(Namespace::Rdf, "type"),
        &node(Namespace::Wikibase, entity.kind.class_name()),
    );
    write_labels(out, &subject, &entity.labels);
    write_descriptions(out, &subject, &entity.descriptions);
}

/// Loads each entity of `ids` and writes its stub block. Entities the
/// loader does not find are left out.
///
/// # Errors
///
/// Propagates the first loader failure.
pub fn write_referenced<I>(
    out: &mut dyn RdfWriter,
    vocab: &Vocabulary,
    loader: &dyn EntityLoader,
    ids: I,
) -> Result<()>
where
    I: IntoIterator<Item = EntityId>,
{
    for id in ids {
        match loader.load(&id)? {
            Some(referenced) => write_stub(out, vocab, &referenced),
            None => debug!(entity = %id, "referenced entity not found, no stub written"),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Reference, Statement, Value};
    use crate::serializer::{writer, Format};

    fn q(id: &str) -> Value {
        Value::EntityRef(EntityId::from(id))
    }

    fn entity() -> Entity {
        Entity::item("Q42")
            .with_statement(
                Statement::new("Q42-a", "P31", q("Q5"))
                    .with_qualifier("P642", q("Q42"))
                    .with_reference(Reference::new("r1").with_snak("P143", q("Q328"))),
            )
            .with_statement(Statement::new("Q42-b", "P31", q("Q5")))
            .with_statement(Statement::new("Q42-c", "P1412", q("Q1860")))
    }

    #[test]
    fn collects_in_first_seen_order_without_self() {
        let ids: Vec<String> = referenced_entities(&entity())
            .iter()
            .map(|id| id.as_str().to_owned())
            .collect();
        assert_eq!(ids, ["Q5", "Q328", "Q1860"]);
    }

    #[test]
    fn missing_entities_are_skipped() {
        let vocab = Vocabulary::wikidata();
        let loader = |id: &EntityId| -> std::result::Result<Option<Entity>, LoaderError> {
            Ok((id.as_str() == "Q5").then(|| Entity::item("Q5").with_label("en", "human")))
        };
        let mut out = writer(Format::NTriples, &vocab);
        let ids = referenced_entities(&entity());
        assert!(write_referenced(out.as_mut(), &vocab, &loader, ids).is_ok());
        let doc = out.finish();
        assert!(doc.contains("<http://www.wikidata.org/entity/Q5> <http://www.w3.org/2000/01/rdf-schema#label> \"human\"@en ."));
        assert!(!doc.contains("entity/Q328>"));
    }

    #[test]
    fn loader_failure_aborts() {
        let vocab = Vocabulary::wikidata();
        let loader = |id: &EntityId| -> std::result::Result<Option<Entity>, LoaderError> {
            Err(LoaderError::new(id.as_str(), "backend unavailable"))
        };
        let mut out = writer(Format::NTriples, &vocab);
        let result = write_referenced(out.as_mut(), &vocab, &loader, referenced_entities(&entity()));
        assert!(matches!(result, Err(crate::ConvertError::Loader(_))));
    }
}
