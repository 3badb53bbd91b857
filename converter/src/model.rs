//! Core entity model types.
//!
//! These types represent a parsed Wikibase entity as plain owned data. A
//! conversion borrows an [`Entity`] and never mutates it.

use std::fmt;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::registry::Datatype;

/// Id of an entity, e.g. `Q42` or `P31`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Wraps an id string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Guesses the entity kind from the id prefix (`P` for properties).
    #[must_use]
    pub fn kind(&self) -> EntityKind {
        if self.0.starts_with('P') {
            EntityKind::Property
        } else {
            EntityKind::Item
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Id of a property, e.g. `P31`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct PropertyId(String);

impl PropertyId {
    /// Wraps an id string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The same id as an entity id.
    #[must_use]
    pub fn to_entity_id(&self) -> EntityId {
        EntityId(self.0.clone())
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PropertyId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Whether an entity is an item or a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// `wikibase:Item`
    Item,
    /// `wikibase:Property`
    Property,
}

impl EntityKind {
    /// Local name of the entity's class in the `wikibase:` namespace.
    #[must_use]
    pub fn class_name(self) -> &'static str {
        match self {
            EntityKind::Item => "Item",
            EntityKind::Property => "Property",
        }
    }
}

/// Statement rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rank {
    /// Takes precedence over normal statements.
    Preferred,
    /// The default rank.
    Normal,
    /// Never part of the best-rank set.
    Deprecated,
}

impl Rank {
    /// Local name of the rank class in the `wikibase:` namespace.
    #[must_use]
    pub fn class_name(self) -> &'static str {
        match self {
            Rank::Preferred => "PreferredRank",
            Rank::Normal => "NormalRank",
            Rank::Deprecated => "DeprecatedRank",
        }
    }
}

/// A quantity with an optional unit and optional bounds.
///
/// Amounts and bounds are decimal strings as found in the source data;
/// they may or may not carry an explicit sign.
#[derive(Debug, Clone, PartialEq)]
pub struct Quantity {
    /// Decimal amount, e.g. `+3` or `-0.5`.
    pub amount: String,
    /// Unit IRI; `None` or `"1"` means dimensionless.
    pub unit: Option<String>,
    /// Upper bound, when known.
    pub upper_bound: Option<String>,
    /// Lower bound, when known.
    pub lower_bound: Option<String>,
}

/// A point in time with precision and calendar model.
#[derive(Debug, Clone, PartialEq)]
pub struct Time {
    /// Timestamp such as `+2001-05-11T00:00:00Z`.
    pub timestamp: String,
    /// Precision on the 0 (billion years) to 14 (second) scale.
    pub precision: u8,
    /// Uncertainty before the timestamp, in units of the precision.
    pub before: u64,
    /// Uncertainty after the timestamp, in units of the precision.
    pub after: u64,
    /// Timezone offset in minutes.
    pub timezone: i32,
    /// Calendar model IRI.
    pub calendar_model: String,
}

/// Day precision on the time precision scale.
pub const PRECISION_DAY: u8 = 11;
/// Month precision on the time precision scale.
pub const PRECISION_MONTH: u8 = 10;
/// Year precision on the time precision scale.
pub const PRECISION_YEAR: u8 = 9;

/// A coordinate on a globe.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobeCoordinate {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Precision in degrees, when known.
    pub precision: Option<f64>,
    /// Globe IRI; `None` means Earth.
    pub globe: Option<String>,
}

/// The value of a snak. The variant set is closed.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A reference to another entity.
    EntityRef(EntityId),
    /// A string (also used for external ids, URLs, media file names, math).
    StringLit(String),
    /// Text in a given language.
    MonolingualText {
        /// Language code.
        language: String,
        /// The text.
        text: String,
    },
    /// A quantity.
    Quantity(Quantity),
    /// A point in time.
    Time(Time),
    /// A geographic coordinate.
    GlobeCoordinate(GlobeCoordinate),
    /// The property is known to have no value.
    NoValue,
    /// The property has a value that is not known.
    SomeValue,
}

impl Value {
    /// Returns the referenced entity id, if this is an entity reference.
    #[must_use]
    pub fn entity_ref(&self) -> Option<&EntityId> {
        match self {
            Value::EntityRef(id) => Some(id),
            Value::StringLit(_)
            | Value::MonolingualText { .. }
            | Value::Quantity(_)
            | Value::Time(_)
            | Value::GlobeCoordinate(_)
            | Value::NoValue
            | Value::SomeValue => None,
        }
    }
}

/// A reference: a content hash plus its snaks grouped by property.
#[derive(Debug, Clone, PartialEq)]
pub struct Reference {
    /// Content hash; empty when it should be computed from the snaks.
    pub hash: String,
    /// Snaks by property, in order.
    pub snaks: IndexMap<PropertyId, Vec<Value>>,
}

impl Reference {
    /// Creates an empty reference with the given hash.
    pub fn new(hash: impl Into<String>) -> Self {
        Self {
            hash: hash.into(),
            snaks: IndexMap::new(),
        }
    }

    /// Adds a snak.
    #[must_use]
    pub fn with_snak(mut self, property: impl Into<PropertyId>, value: Value) -> Self {
        self.snaks.entry(property.into()).or_default().push(value);
        self
    }

    /// Iterates over all snaks in order.
    pub fn snaks(&self) -> impl Iterator<Item = (&PropertyId, &Value)> {
        self.snaks
            .iter()
            .flat_map(|(pid, values)| values.iter().map(move |v| (pid, v)))
    }
}

/// A statement about an entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    /// Statement id, unique within the entity.
    pub id: String,
    /// Main property.
    pub property: PropertyId,
    /// Main value.
    pub value: Value,
    /// Rank.
    pub rank: Rank,
    /// Qualifier snaks by property, in input order.
    pub qualifiers: IndexMap<PropertyId, Vec<Value>>,
    /// References, in input order.
    pub references: Vec<Reference>,
}

impl Statement {
    /// Creates a normal-rank statement without qualifiers or references.
    pub fn new(id: impl Into<String>, property: impl Into<PropertyId>, value: Value) -> Self {
        Self {
            id: id.into(),
            property: property.into(),
            value,
            rank: Rank::Normal,
            qualifiers: IndexMap::new(),
            references: Vec::new(),
        }
    }

    /// Sets the rank.
    #[must_use]
    pub fn with_rank(mut self, rank: Rank) -> Self {
        self.rank = rank;
        self
    }

    /// Adds a qualifier snak.
    #[must_use]
    pub fn with_qualifier(mut self, property: impl Into<PropertyId>, value: Value) -> Self {
        self.qualifiers.entry(property.into()).or_default().push(value);
        self
    }

    /// Adds a reference.
    #[must_use]
    pub fn with_reference(mut self, reference: Reference) -> Self {
        self.references.push(reference);
        self
    }

    /// Iterates over qualifier snaks in order.
    pub fn qualifier_snaks(&self) -> impl Iterator<Item = (&PropertyId, &Value)> {
        self.qualifiers
            .iter()
            .flat_map(|(pid, values)| values.iter().map(move |v| (pid, v)))
    }

    /// Iterates over every snak: main snak, qualifiers, then reference snaks.
    pub fn snaks(&self) -> impl Iterator<Item = (&PropertyId, &Value)> {
        std::iter::once((&self.property, &self.value))
            .chain(self.qualifier_snaks())
            .chain(self.references.iter().flat_map(Reference::snaks))
    }
}

/// A link to a page on another site.
#[derive(Debug, Clone, PartialEq)]
pub struct Sitelink {
    /// Site key, e.g. `enwiki`.
    pub site: String,
    /// Page title.
    pub title: String,
    /// Badge items.
    pub badges: Vec<EntityId>,
    /// Page URL, when the source data carries one.
    pub url: Option<String>,
}

/// A Wikibase item or property.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    /// Entity id.
    pub id: EntityId,
    /// Item or property.
    pub kind: EntityKind,
    /// Datatype; only set for properties.
    pub datatype: Option<Datatype>,
    /// Labels by language.
    pub labels: IndexMap<String, String>,
    /// Descriptions by language.
    pub descriptions: IndexMap<String, String>,
    /// Aliases by language.
    pub aliases: IndexMap<String, Vec<String>>,
    /// Statements by main property.
    pub statements: IndexMap<PropertyId, Vec<Statement>>,
    /// Sitelinks by site key.
    pub sitelinks: IndexMap<String, Sitelink>,
    /// Revision id of the entity version.
    pub lastrevid: Option<u64>,
    /// Modification timestamp, e.g. `2024-01-01T00:00:00Z`.
    pub modified: Option<String>,
}

impl Entity {
    /// Creates an entity with no data.
    pub fn new(id: impl Into<EntityId>, kind: EntityKind) -> Self {
        Self {
            id: id.into(),
            kind,
            datatype: None,
            labels: IndexMap::new(),
            descriptions: IndexMap::new(),
            aliases: IndexMap::new(),
            statements: IndexMap::new(),
            sitelinks: IndexMap::new(),
            lastrevid: None,
            modified: None,
        }
    }

    /// Creates an item.
    pub fn item(id: impl Into<EntityId>) -> Self {
        Self::new(id, EntityKind::Item)
    }

    /// Creates a property with a datatype.
    pub fn property(id: impl Into<EntityId>, datatype: Datatype) -> Self {
        let mut entity = Self::new(id, EntityKind::Property);
        entity.datatype = Some(datatype);
        entity
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

    /// Adds an alias.
    #[must_use]
    pub fn with_alias(mut self, language: &str, text: &str) -> Self {
        self.aliases
            .entry(language.to_owned())
            .or_default()
            .push(text.to_owned());
        self
    }

    /// Appends a statement under its main property.
    #[must_use]
    pub fn with_statement(mut self, statement: Statement) -> Self {
        self.statements
            .entry(statement.property.clone())
            .or_default()
            .push(statement);
        self
    }

    /// Adds a sitelink.
    #[must_use]
    pub fn with_sitelink(mut self, sitelink: Sitelink) -> Self {
        self.sitelinks.insert(sitelink.site.clone(), sitelink);
        self
    }

    /// Total number of statements.
    #[must_use]
    pub fn statement_count(&self) -> usize {
        self.statements.values().map(Vec::len).sum()
    }

    /// Iterates over all statements in property order.
    pub fn all_statements(&self) -> impl Iterator<Item = &Statement> {
        self.statements.values().flatten()
    }
}
