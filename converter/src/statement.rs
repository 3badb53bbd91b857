//! Statement, qualifier, reference and value-node triples.
//!
//! A [`StatementWriter`] lives for one document. It resolves property
//! shapes under the configured [`MissingPropertyPolicy`], remembers which
//! reference and value nodes were already written, and records every
//! property it touched and every entity it linked to, so the ontology and
//! stub blocks can follow.

use std::collections::HashSet;

use indexmap::IndexSet;
use tracing::warn;

use crate::converter::{MissingPropertyPolicy, Mode};
use crate::error::{ConvertError, Result};
use crate::format::{normalized_object, snak_object, value_node, SnakObject};
use crate::model::{EntityId, PropertyId, Rank, Statement, Value};
use crate::registry::{PropertyShape, PropertyShapeRegistry};
use crate::serializer::RdfWriter;
use crate::term::{name, node, Iri, Term};
use crate::vocabulary::{Namespace, Vocabulary};

/// The best rank of a statement group: preferred if any statement is
/// preferred, else normal if any is normal. Deprecated statements are never
/// best, so a group of only deprecated statements has no best rank.
pub fn best_rank<'s, I>(statements: I) -> Option<Rank>
where
    I: IntoIterator<Item = &'s Statement>,
{
    let mut best = None;
    for statement in statements {
        match statement.rank {
            Rank::Preferred => return Some(Rank::Preferred),
            Rank::Normal => best = Some(Rank::Normal),
            Rank::Deprecated => {}
        }
    }
    best
}

#[derive(Debug, Clone, Copy)]
enum Role {
    Statement,
    Qualifier,
    Reference,
}

impl Role {
    fn predicates(self, shape: &PropertyShape) -> (&Iri, Option<&Iri>, Option<&Iri>) {
        let p = &shape.predicates;
        let normalized = p.normalized.as_ref();
        match self {
            Role::Statement => (
                &p.statement,
                p.statement_value.as_ref(),
                normalized.map(|n| &n.statement),
            ),
            Role::Qualifier => (
                &p.qualifier,
                p.qualifier_value.as_ref(),
                normalized.map(|n| &n.qualifier),
            ),
            Role::Reference => (
                &p.reference,
                p.reference_value.as_ref(),
                normalized.map(|n| &n.reference),
            ),
        }
    }
}

/// Writes statement groups of one document.
pub struct StatementWriter<'a> {
    vocab: &'a Vocabulary,
    registry: &'a PropertyShapeRegistry,
    policy: MissingPropertyPolicy,
    references: HashSet<String>,
    values: HashSet<Iri>,
    touched: IndexSet<PropertyId>,
    linked: HashSet<EntityId>,
}

impl<'a> StatementWriter<'a> {
    /// Creates a writer with nothing written yet.
    #[must_use]
    pub fn new(
        vocab: &'a Vocabulary,
        registry: &'a PropertyShapeRegistry,
        policy: MissingPropertyPolicy,
    ) -> Self {
        Self {
            vocab,
            registry,
            policy,
            references: HashSet::new(),
            values: HashSet::new(),
            touched: IndexSet::new(),
            linked: HashSet::new(),
        }
    }

    /// Records a property as used by the document.
    pub fn touch(&mut self, id: &PropertyId) {
        if !self.touched.contains(id) {
            self.touched.insert(id.clone());
        }
    }

    /// The properties used so far, in first-use order.
    #[must_use]
    pub fn touched(&self) -> &IndexSet<PropertyId> {
        &self.touched
    }

    /// Whether a written snak had `id` as its value. Values of skipped
    /// snaks do not count.
    #[must_use]
    pub fn links_to(&self, id: &EntityId) -> bool {
        self.linked.contains(id)
    }

    fn link(&mut self, value: &Value) {
        if let Some(id) = value.entity_ref() {
            if !self.linked.contains(id) {
                self.linked.insert(id.clone());
            }
        }
    }

    /// Resolves a shape; `None` means the snak is skipped.
    fn shape(&mut self, id: &PropertyId) -> Result<Option<&'a PropertyShape>> {
        match self.registry.get(id) {
            Some(shape) => {
                self.touch(id);
                Ok(Some(shape))
            }
            None => match self.policy {
                MissingPropertyPolicy::Fail => Err(ConvertError::MissingProperty(id.clone())),
                MissingPropertyPolicy::Skip => {
                    warn!(property = %id, "skipping snak of unregistered property");
                    Ok(None)
                }
            },
        }
    }

    /// Writes the statements of one property.
    ///
    /// First the entity-level links of every statement (direct claims for
    /// best-rank statements, then `p:` in full mode), then in full mode each
    /// statement node followed by its new reference and value nodes.
    ///
    /// # Errors
    ///
    /// Fails on malformed values and, under [`MissingPropertyPolicy::Fail`],
    /// on unregistered properties.
    pub fn write_group(
        &mut self,
        out: &mut dyn RdfWriter,
        entity: &EntityId,
        property: &PropertyId,
        statements: &[Statement],
        mode: Mode,
    ) -> Result<()> {
        let Some(shape) = self.shape(property)? else {
            return Ok(());
        };
        let best = best_rank(statements);
        let subject: Term = self.vocab.entity_uri(entity).into();

        for statement in statements {
            if Some(statement.rank) == best {
                self.write_direct_claim(out, &subject, shape, statement)?;
            }
            if mode == Mode::Full {
                out.triple(
                    &subject,
                    &shape.predicates.claim,
                    &self.vocab.statement_uri(&statement.id).into(),
                );
            }
        }

        if mode == Mode::Full {
            for statement in statements {
                self.write_statement(out, shape, statement, Some(statement.rank) == best)?;
            }
        }
        Ok(())
    }

    fn write_direct_claim(
        &mut self,
        out: &mut dyn RdfWriter,
        subject: &Term,
        shape: &PropertyShape,
        statement: &Statement,
    ) -> Result<()> {
        let predicates = &shape.predicates;
        match snak_object(shape, &statement.value, self.vocab)? {
            SnakObject::Value(object) => {
                out.triple(subject, &predicates.direct_claim, &object);
                self.link(&statement.value);
            }
            SnakObject::NoValue => out.triple(
                subject,
                &name(Namespace::Rdf, "type"),
                &predicates.no_value.clone().into(),
            ),
            SnakObject::SomeValue => out.triple(
                subject,
                &predicates.direct_claim,
                &self.vocab.somevalue_uri(&statement.id, &shape.id).into(),
            ),
            SnakObject::Skipped => return Ok(()),
        }
        if let (Some(normalized), Some(object)) = (
            predicates.normalized.as_ref(),
            normalized_object(shape, &statement.value),
        ) {
            out.triple(subject, &normalized.direct_claim, &object);
        }
        Ok(())
    }

    fn write_statement(
        &mut self,
        out: &mut dyn RdfWriter,
        shape: &'a PropertyShape,
        statement: &Statement,
        is_best: bool,
    ) -> Result<()> {
        let vocab = self.vocab;
        let subject: Term = vocab.statement_uri(&statement.id).into();
        let ty = name(Namespace::Rdf, "type");

        out.triple(&subject, &ty, &node(Namespace::Wikibase, "Statement"));
        if is_best {
            out.triple(&subject, &ty, &node(Namespace::Wikibase, "BestRank"));
        }
        if statement.value == Value::NoValue {
            out.triple(&subject, &ty, &shape.predicates.no_value.clone().into());
        }
        out.triple(
            &subject,
            &name(Namespace::Wikibase, "rank"),
            &node(Namespace::Wikibase, statement.rank.class_name()),
        );

        let mut value_snaks: Vec<(&PropertyShape, &Value)> = Vec::new();
        if statement.value != Value::NoValue {
            self.write_snak(out, &subject, &statement.id, shape, &statement.value, Role::Statement)?;
            value_snaks.push((shape, &statement.value));
        }

        for (property, values) in &statement.qualifiers {
            let Some(qualifier) = self.shape(property)? else {
                continue;
            };
            for value in values {
                self.write_snak(out, &subject, &statement.id, qualifier, value, Role::Qualifier)?;
                value_snaks.push((qualifier, value));
            }
        }

        let mut hashes = Vec::with_capacity(statement.references.len());
        for reference in &statement.references {
            let hash = vocab.reference_hash(reference)?;
            out.triple(
                &subject,
                &name(Namespace::Prov, "wasDerivedFrom"),
                &vocab.reference_uri(&hash).into(),
            );
            hashes.push(hash);
        }

        for (reference, hash) in statement.references.iter().zip(hashes) {
            if self.references.contains(&hash) {
                continue;
            }
            let reference_node: Term = vocab.reference_uri(&hash).into();
            out.triple(&reference_node, &ty, &node(Namespace::Wikibase, "Reference"));
            for (property, value) in reference.snaks() {
                let Some(snak_shape) = self.shape(property)? else {
                    continue;
                };
                self.write_snak(out, &reference_node, &hash, snak_shape, value, Role::Reference)?;
                value_snaks.push((snak_shape, value));
            }
            self.references.insert(hash);
        }

        for (snak_shape, value) in value_snaks {
            self.write_value_node(out, snak_shape, value)?;
        }
        Ok(())
    }

    fn write_snak(
        &mut self,
        out: &mut dyn RdfWriter,
        owner: &Term,
        owner_key: &str,
        shape: &PropertyShape,
        value: &Value,
        role: Role,
    ) -> Result<()> {
        let (simple, value_predicate, normalized_predicate) = role.predicates(shape);
        match snak_object(shape, value, self.vocab)? {
            SnakObject::Value(object) => {
                out.triple(owner, simple, &object);
                self.link(value);
            }
            SnakObject::NoValue => out.triple(
                owner,
                &name(Namespace::Rdf, "type"),
                &shape.predicates.no_value.clone().into(),
            ),
            SnakObject::SomeValue => out.triple(
                owner,
                simple,
                &self.vocab.somevalue_uri(owner_key, &shape.id).into(),
            ),
            SnakObject::Skipped => return Ok(()),
        }
        if let Some(predicate) = value_predicate {
            if let Some(iri) = self.vocab.value_node_uri(&shape.id, value)? {
                out.triple(owner, predicate, &iri.into());
            }
        }
        if let (Some(predicate), Some(object)) = (normalized_predicate, normalized_object(shape, value)) {
            out.triple(owner, predicate, &object);
        }
        Ok(())
    }

    fn write_value_node(
        &mut self,
        out: &mut dyn RdfWriter,
        shape: &PropertyShape,
        value: &Value,
    ) -> Result<()> {
        if !shape.datatype.has_value_node() {
            return Ok(());
        }
        let Some(value_node) = value_node(&shape.id, value, self.vocab)? else {
            return Ok(());
        };
        if !self.values.insert(value_node.iri.clone()) {
            return Ok(());
        }
        let subject: Term = value_node.iri.into();
        out.triple(
            &subject,
            &name(Namespace::Rdf, "type"),
            &node(Namespace::Wikibase, value_node.class),
        );
        for (field, object) in value_node.fields {
            out.triple(&subject, &name(Namespace::Wikibase, field), &object);
        }
        Ok(())
    }
}
