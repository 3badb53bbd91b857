//! Property shapes: the per-property datatype and predicate set.
//!
//! A [`PropertyShapeRegistry`] is filled once by whoever loads property
//! metadata and is then only read. Conversions borrow it.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;

use crate::error::ConvertError;
use crate::model::PropertyId;
use crate::term::Iri;
use crate::vocabulary::Namespace;

/// The datatype of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Datatype {
    /// `wikibase-item`
    WikibaseItem,
    /// `wikibase-property`
    WikibaseProperty,
    /// `string`
    String,
    /// `external-id`
    ExternalId,
    /// `monolingualtext`
    MonolingualText,
    /// `quantity`
    Quantity,
    /// `time`
    Time,
    /// `globe-coordinate`
    GlobeCoordinate,
    /// `url`
    Url,
    /// `commonsMedia`
    CommonsMedia,
    /// `math`
    Math,
}

impl Datatype {
    /// The datatype tag as used in Wikibase JSON.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Datatype::WikibaseItem => "wikibase-item",
            Datatype::WikibaseProperty => "wikibase-property",
            Datatype::String => "string",
            Datatype::ExternalId => "external-id",
            Datatype::MonolingualText => "monolingualtext",
            Datatype::Quantity => "quantity",
            Datatype::Time => "time",
            Datatype::GlobeCoordinate => "globe-coordinate",
            Datatype::Url => "url",
            Datatype::CommonsMedia => "commonsMedia",
            Datatype::Math => "math",
        }
    }

    /// Local name of the `wikibase:propertyType` class.
    #[must_use]
    pub fn ontology_class(self) -> &'static str {
        match self {
            Datatype::WikibaseItem => "WikibaseItem",
            Datatype::WikibaseProperty => "WikibaseProperty",
            Datatype::String => "String",
            Datatype::ExternalId => "ExternalId",
            Datatype::MonolingualText => "Monolingualtext",
            Datatype::Quantity => "Quantity",
            Datatype::Time => "Time",
            Datatype::GlobeCoordinate => "GlobeCoordinate",
            Datatype::Url => "Url",
            Datatype::CommonsMedia => "CommonsMedia",
            Datatype::Math => "Math",
        }
    }

    /// Whether values get a structured value node (`psv:`, `pqv:`, `prv:`).
    #[must_use]
    pub fn has_value_node(self) -> bool {
        match self {
            Datatype::Quantity | Datatype::Time | Datatype::GlobeCoordinate => true,
            Datatype::WikibaseItem
            | Datatype::WikibaseProperty
            | Datatype::String
            | Datatype::ExternalId
            | Datatype::MonolingualText
            | Datatype::Url
            | Datatype::CommonsMedia
            | Datatype::Math => false,
        }
    }

    /// Whether the datatype has normalized predicates (`wdtn:`, `psn:`, ...).
    #[must_use]
    pub fn normalizes(self) -> bool {
        match self {
            Datatype::Quantity | Datatype::Time | Datatype::ExternalId => true,
            Datatype::WikibaseItem
            | Datatype::WikibaseProperty
            | Datatype::String
            | Datatype::MonolingualText
            | Datatype::GlobeCoordinate
            | Datatype::Url
            | Datatype::CommonsMedia
            | Datatype::Math => false,
        }
    }

    /// Whether values are references to other entities.
    #[must_use]
    pub fn is_entity_reference(self) -> bool {
        matches!(self, Datatype::WikibaseItem | Datatype::WikibaseProperty)
    }

    /// Whether the simple value is written as an IRI rather than a literal,
    /// which makes the direct-claim predicate an `owl:ObjectProperty`.
    #[must_use]
    pub fn has_iri_values(self) -> bool {
        self.is_entity_reference() || matches!(self, Datatype::Url | Datatype::CommonsMedia)
    }
}

impl fmt::Display for Datatype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Datatype {
    type Err = ConvertError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        let datatype = match tag {
            "wikibase-item" => Datatype::WikibaseItem,
            "wikibase-property" => Datatype::WikibaseProperty,
            "string" => Datatype::String,
            "external-id" => Datatype::ExternalId,
            "monolingualtext" => Datatype::MonolingualText,
            "quantity" => Datatype::Quantity,
            "time" => Datatype::Time,
            "globe-coordinate" => Datatype::GlobeCoordinate,
            "url" => Datatype::Url,
            "commonsMedia" => Datatype::CommonsMedia,
            "math" => Datatype::Math,
            other => return Err(ConvertError::UnknownDatatype(other.to_owned())),
        };
        Ok(datatype)
    }
}

/// Predicates for normalized values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedPredicates {
    /// `wdtn:P`
    pub direct_claim: Iri,
    /// `psn:P`
    pub statement: Iri,
    /// `pqn:P`
    pub qualifier: Iri,
    /// `prn:P`
    pub reference: Iri,
}

/// Every predicate derived from one property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredicateSet {
    /// `wdt:P`
    pub direct_claim: Iri,
    /// `p:P`
    pub claim: Iri,
    /// `ps:P`
    pub statement: Iri,
    /// `psv:P`, only for structured datatypes.
    pub statement_value: Option<Iri>,
    /// `pq:P`
    pub qualifier: Iri,
    /// `pqv:P`, only for structured datatypes.
    pub qualifier_value: Option<Iri>,
    /// `pr:P`
    pub reference: Iri,
    /// `prv:P`, only for structured datatypes.
    pub reference_value: Option<Iri>,
    /// `wdno:P`
    pub no_value: Iri,
    /// Normalized predicates, only for normalizing datatypes.
    pub normalized: Option<NormalizedPredicates>,
}

impl PredicateSet {
    /// Derives the predicate set of a property from its datatype.
    #[must_use]
    pub fn derive(id: &PropertyId, datatype: Datatype) -> Self {
        let local = id.as_str();
        let structured = |ns| datatype.has_value_node().then(|| Iri::name(ns, local));
        Self {
            direct_claim: Iri::name(Namespace::Wdt, local),
            claim: Iri::name(Namespace::P, local),
            statement: Iri::name(Namespace::Ps, local),
            statement_value: structured(Namespace::Psv),
            qualifier: Iri::name(Namespace::Pq, local),
            qualifier_value: structured(Namespace::Pqv),
            reference: Iri::name(Namespace::Pr, local),
            reference_value: structured(Namespace::Prv),
            no_value: Iri::name(Namespace::Wdno, local),
            normalized: datatype.normalizes().then(|| NormalizedPredicates {
                direct_claim: Iri::name(Namespace::Wdtn, local),
                statement: Iri::name(Namespace::Psn, local),
                qualifier: Iri::name(Namespace::Pqn, local),
                reference: Iri::name(Namespace::Prn, local),
            }),
        }
    }
}

/// Everything the converter knows about one property.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyShape {
    /// Property id.
    pub id: PropertyId,
    /// Datatype.
    pub datatype: Datatype,
    /// Predicate set.
    pub predicates: PredicateSet,
    /// Labels by language.
    pub labels: IndexMap<String, String>,
    /// Descriptions by language.
    pub descriptions: IndexMap<String, String>,
    /// IRI template for external identifiers, with `$1` standing for the
    /// escaped identifier.
    pub canonical_uri: Option<String>,
}

impl PropertyShape {
    /// Creates a shape with the predicate set derived from the datatype.
    pub fn new(id: impl Into<PropertyId>, datatype: Datatype) -> Self {
        let id = id.into();
        Self {
            predicates: PredicateSet::derive(&id, datatype),
            id,
            datatype,
            labels: IndexMap::new(),
            descriptions: IndexMap::new(),
            canonical_uri: None,
        }
    }

    /// Sets a label.
    #[must_use]
    pub fn with_label(mut self, language: &str, text: &str) -> Self {
        self.labels.insert(language.to_owned(), text.to_owned());
        self
    }

    /// Sets a description.
    #[must_use]
    pub fn with_description(mut self, language: &str, text: &str) -> Self {
        self.descriptions.insert(language.to_owned(), text.to_owned());
        self
    }

    /// Sets the canonical IRI template for external identifiers.
    #[must_use]
    pub fn with_canonical_uri(mut self, template: &str) -> Self {
        self.canonical_uri = Some(template.to_owned());
        self
    }
}

/// Read-only mapping from property id to [`PropertyShape`].
///
/// A registry may declare an explicit property order; statement groups are
/// then written in that order. Without one, the order of the input entity
/// is kept. Qualifiers always keep their input order.
#[derive(Debug, Clone, Default)]
pub struct PropertyShapeRegistry {
    shapes: IndexMap<PropertyId, PropertyShape>,
    order: Option<IndexMap<PropertyId, usize>>,
}

impl PropertyShapeRegistry {
    /// Creates an empty registry without an explicit order.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a shape.
    pub fn insert(&mut self, shape: PropertyShape) {
        self.shapes.insert(shape.id.clone(), shape);
    }

    /// Declares an explicit property order.
    #[must_use]
    pub fn with_order<I>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = PropertyId>,
    {
        let mut order = IndexMap::new();
        for id in ids {
            let next = order.len();
            order.entry(id).or_insert(next);
        }
        self.order = Some(order);
        self
    }

    /// Looks up a shape.
    #[must_use]
    pub fn get(&self, id: &PropertyId) -> Option<&PropertyShape> {
        self.shapes.get(id)
    }

    /// Position of a property in the declared order, if the registry has one
    /// and lists the property.
    #[must_use]
    pub fn position(&self, id: &PropertyId) -> Option<usize> {
        self.order.as_ref().and_then(|order| order.get(id).copied())
    }

    /// Whether the registry declares an explicit order.
    #[must_use]
    pub fn is_ordered(&self) -> bool {
        self.order.is_some()
    }

    /// Sorts property ids by the declared order; properties the order does
    /// not list keep their relative order after the listed ones. Without a
    /// declared order the input order is returned unchanged.
    pub fn sort<'a, I>(&self, ids: I) -> Vec<&'a PropertyId>
    where
        I: IntoIterator<Item = &'a PropertyId>,
    {
        let mut ids: Vec<&PropertyId> = ids.into_iter().collect();
        if self.is_ordered() {
            ids.sort_by_key(|id| self.position(id).unwrap_or(usize::MAX));
        }
        ids
    }

    /// Number of shapes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Iterates over the shapes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &PropertyShape> {
        self.shapes.values()
    }
}

impl FromIterator<PropertyShape> for PropertyShapeRegistry {
    fn from_iter<T: IntoIterator<Item = PropertyShape>>(iter: T) -> Self {
        let mut registry = Self::new();
        for shape in iter {
            registry.insert(shape);
        }
        registry
    }
}
