//! Reading the Wikibase entity JSON format and property registry files.
//!
//! Entities are accepted either bare (`{"id": "Q42", ...}`) or in the
//! `Special:EntityData` wrapper (`{"entities": {"Q42": {...}}}`).

use std::str::FromStr;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::{ConvertError, Result};
use crate::model::{
    Entity, EntityId, EntityKind, GlobeCoordinate, PropertyId, Quantity, Rank, Reference,
    Sitelink, Statement, Time, Value,
};
use crate::registry::{Datatype, PropertyShape, PropertyShapeRegistry};
use crate::statement::best_rank;

/// Wikidata's "formatter URI for RDF resource" property, the source of
/// canonical IRI templates for external identifiers.
pub const FORMATTER_URI_FOR_RDF: &str = "P1921";

#[derive(Debug, Deserialize)]
struct TermJson {
    value: String,
}

#[derive(Debug, Deserialize)]
struct EntityRefJson {
    #[serde(default)]
    id: Option<String>,
    #[serde(rename = "entity-type", default)]
    entity_type: Option<String>,
    #[serde(rename = "numeric-id", default)]
    numeric_id: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct MonolingualJson {
    text: String,
    language: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuantityJson {
    amount: String,
    #[serde(default)]
    unit: Option<String>,
    #[serde(default)]
    upper_bound: Option<String>,
    #[serde(default)]
    lower_bound: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TimeJson {
    time: String,
    #[serde(default)]
    timezone: i32,
    #[serde(default)]
    before: u64,
    #[serde(default)]
    after: u64,
    precision: u8,
    calendarmodel: String,
}

#[derive(Debug, Deserialize)]
struct GlobeJson {
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    precision: Option<f64>,
    #[serde(default)]
    globe: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", content = "value")]
enum DataValueJson {
    #[serde(rename = "string")]
    String(String),
    #[serde(rename = "wikibase-entityid")]
    EntityId(EntityRefJson),
    #[serde(rename = "monolingualtext")]
    MonolingualText(MonolingualJson),
    #[serde(rename = "quantity")]
    Quantity(QuantityJson),
    #[serde(rename = "time")]
    Time(TimeJson),
    #[serde(rename = "globecoordinate")]
    GlobeCoordinate(GlobeJson),
}

#[derive(Debug, Deserialize)]
struct SnakJson {
    snaktype: String,
    property: PropertyId,
    #[serde(default)]
    datavalue: Option<DataValueJson>,
}

#[derive(Debug, Deserialize)]
struct ReferenceJson {
    #[serde(default)]
    hash: String,
    #[serde(default)]
    snaks: IndexMap<PropertyId, Vec<SnakJson>>,
    #[serde(rename = "snaks-order", default)]
    snaks_order: Vec<PropertyId>,
}

#[derive(Debug, Deserialize)]
struct StatementJson {
    id: String,
    mainsnak: SnakJson,
    #[serde(default = "normal_rank")]
    rank: Rank,
    #[serde(default)]
    qualifiers: IndexMap<PropertyId, Vec<SnakJson>>,
    #[serde(rename = "qualifiers-order", default)]
    qualifiers_order: Vec<PropertyId>,
    #[serde(default)]
    references: Vec<ReferenceJson>,
}

fn normal_rank() -> Rank {
    Rank::Normal
}

#[derive(Debug, Deserialize)]
struct SitelinkJson {
    site: String,
    title: String,
    #[serde(default)]
    badges: Vec<EntityId>,
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EntityJson {
    id: EntityId,
    #[serde(rename = "type", default)]
    kind: Option<EntityKind>,
    #[serde(default)]
    datatype: Option<String>,
    #[serde(default)]
    labels: IndexMap<String, TermJson>,
    #[serde(default)]
    descriptions: IndexMap<String, TermJson>,
    #[serde(default)]
    aliases: IndexMap<String, Vec<TermJson>>,
    #[serde(default, alias = "statements")]
    claims: IndexMap<PropertyId, Vec<StatementJson>>,
    #[serde(default)]
    sitelinks: IndexMap<String, SitelinkJson>,
    #[serde(default)]
    lastrevid: Option<u64>,
    #[serde(default)]
    modified: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DocumentJson {
    Wrapped { entities: IndexMap<String, EntityJson> },
    Single(Box<EntityJson>),
}

/// Makes a statement GUID usable as an IRI local name: everything other
/// than ASCII word characters and `-` becomes `-` (`Q42$F07...` →
/// `Q42-F07...`).
#[must_use]
pub fn statement_local_name(guid: &str) -> String {
    guid.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '-' })
        .collect()
}

fn entity_ref(property: &PropertyId, json: EntityRefJson) -> Result<EntityId> {
    if let Some(id) = json.id {
        return Ok(EntityId::new(id));
    }
    let prefix = match json.entity_type.as_deref() {
        Some("item") => "Q",
        Some("property") => "P",
        Some("lexeme") => "L",
        other => {
            return Err(ConvertError::malformed(
                property,
                format!("unknown entity type {other:?}"),
            ))
        }
    };
    let numeric = json
        .numeric_id
        .ok_or_else(|| ConvertError::malformed(property, "entity reference without id"))?;
    Ok(EntityId::new(format!("{prefix}{numeric}")))
}

fn snak_value(snak: SnakJson) -> Result<(PropertyId, Value)> {
    let property = snak.property;
    let value = match snak.snaktype.as_str() {
        "novalue" => Value::NoValue,
        "somevalue" => Value::SomeValue,
        "value" => {
            let datavalue = snak
                .datavalue
                .ok_or_else(|| ConvertError::malformed(&property, "value snak without datavalue"))?;
            match datavalue {
                DataValueJson::String(text) => Value::StringLit(text),
                DataValueJson::EntityId(json) => Value::EntityRef(entity_ref(&property, json)?),
                DataValueJson::MonolingualText(json) => Value::MonolingualText {
                    language: json.language,
                    text: json.text,
                },
                DataValueJson::Quantity(json) => Value::Quantity(Quantity {
                    amount: json.amount,
                    unit: json.unit,
                    upper_bound: json.upper_bound,
                    lower_bound: json.lower_bound,
                }),
                DataValueJson::Time(json) => Value::Time(Time {
                    timestamp: json.time,
                    precision: json.precision,
                    before: json.before,
                    after: json.after,
                    timezone: json.timezone,
                    calendar_model: json.calendarmodel,
                }),
                DataValueJson::GlobeCoordinate(json) => Value::GlobeCoordinate(GlobeCoordinate {
                    latitude: json.latitude,
                    longitude: json.longitude,
                    precision: json.precision,
                    globe: json.globe,
                }),
            }
        }
        other => {
            return Err(ConvertError::malformed(
                &property,
                format!("unknown snak type {other:?}"),
            ))
        }
    };
    Ok((property, value))
}

/// Snaks grouped by property, in the explicit order if one is given.
/// Properties missing from `order` follow in document order.
fn snak_groups(
    mut snaks: IndexMap<PropertyId, Vec<SnakJson>>,
    order: &[PropertyId],
) -> Result<IndexMap<PropertyId, Vec<Value>>> {
    let mut grouped = IndexMap::new();
    let mut ordered = Vec::with_capacity(snaks.len());
    for property in order {
        if let Some(group) = snaks.shift_remove(property) {
            ordered.push(group);
        }
    }
    ordered.extend(snaks.into_values());
    for group in ordered {
        for snak in group {
            let (property, value) = snak_value(snak)?;
            grouped.entry(property).or_insert_with(Vec::new).push(value);
        }
    }
    Ok(grouped)
}

fn statement(json: StatementJson) -> Result<Statement> {
    let (property, value) = snak_value(json.mainsnak)?;
    let references = json
        .references
        .into_iter()
        .map(|reference| {
            Ok(Reference {
                hash: reference.hash,
                snaks: snak_groups(reference.snaks, &reference.snaks_order)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Statement {
        id: statement_local_name(&json.id),
        property,
        value,
        rank: json.rank,
        qualifiers: snak_groups(json.qualifiers, &json.qualifiers_order)?,
        references,
    })
}

fn entity(json: EntityJson) -> Result<Entity> {
    let kind = json.kind.unwrap_or_else(|| json.id.kind());
    let mut entity = Entity::new(json.id, kind);
    entity.datatype = json.datatype.as_deref().map(Datatype::from_str).transpose()?;
    entity.labels = json.labels.into_iter().map(|(lang, t)| (lang, t.value)).collect();
    entity.descriptions = json
        .descriptions
        .into_iter()
        .map(|(lang, t)| (lang, t.value))
        .collect();
    entity.aliases = json
        .aliases
        .into_iter()
        .map(|(lang, terms)| (lang, terms.into_iter().map(|t| t.value).collect()))
        .collect();
    for (property, statements) in json.claims {
        let statements = statements
            .into_iter()
            .map(statement)
            .collect::<Result<Vec<_>>>()?;
        entity.statements.insert(property, statements);
    }
    entity.sitelinks = json
        .sitelinks
        .into_iter()
        .map(|(key, link)| {
            (
                key,
                Sitelink {
                    site: link.site,
                    title: link.title,
                    badges: link.badges,
                    url: link.url,
                },
            )
        })
        .collect();
    entity.lastrevid = json.lastrevid;
    entity.modified = json.modified;
    Ok(entity)
}

/// Parses every entity of a JSON document, in document order.
///
/// # Errors
///
/// Returns [`ConvertError::Json`] for malformed JSON,
/// [`ConvertError::UnknownDatatype`] for unsupported property datatypes and
/// [`ConvertError::MalformedValue`] for unusable snaks.
pub fn entities_from_json(input: &str) -> Result<Vec<Entity>> {
    match serde_json::from_str::<DocumentJson>(input)? {
        DocumentJson::Wrapped { entities } => entities.into_values().map(entity).collect(),
        DocumentJson::Single(json) => Ok(vec![entity(*json)?]),
    }
}

/// Parses a JSON document holding exactly one entity.
///
/// # Errors
///
/// As [`entities_from_json`]; a document with no entity is a
/// [`ConvertError::Json`] error.
pub fn entity_from_json(input: &str) -> Result<Entity> {
    entities_from_json(input)?
        .into_iter()
        .next()
        .ok_or_else(|| ConvertError::Json(serde::de::Error::custom("no entity in document")))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct PropertyJson {
    datatype: String,
    #[serde(default)]
    labels: IndexMap<String, String>,
    #[serde(default)]
    descriptions: IndexMap<String, String>,
    #[serde(default)]
    canonical_uri: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RegistryJson {
    properties: IndexMap<PropertyId, PropertyJson>,
    #[serde(default)]
    order: Option<Vec<PropertyId>>,
}

/// Parses a property registry file:
///
/// ```json
/// {
///   "properties": {
///     "P31": { "datatype": "wikibase-item", "labels": { "en": "instance of" } },
///     "P214": { "datatype": "external-id", "canonical-uri": "http://viaf.org/viaf/$1" }
///   },
///   "order": ["P31", "P214"]
/// }
/// ```
///
/// # Errors
///
/// Returns [`ConvertError::Json`] for malformed JSON and
/// [`ConvertError::UnknownDatatype`] for unsupported datatypes.
pub fn registry_from_json(input: &str) -> Result<PropertyShapeRegistry> {
    let json: RegistryJson = serde_json::from_str(input)?;
    let mut registry = PropertyShapeRegistry::new();
    for (id, property) in json.properties {
        let datatype = Datatype::from_str(&property.datatype)?;
        let mut shape = PropertyShape::new(id, datatype);
        shape.labels = property.labels;
        shape.descriptions = property.descriptions;
        shape.canonical_uri = property.canonical_uri;
        registry.insert(shape);
    }
    Ok(match json.order {
        Some(order) => registry.with_order(order),
        None => registry,
    })
}

/// Builds the shape of a property from its entity: datatype, terms and the
/// canonical IRI template of its best-rank formatter-URI-for-RDF statement.
///
/// Returns `None` for items and for properties without a datatype.
#[must_use]
pub fn shape_from_entity(entity: &Entity) -> Option<PropertyShape> {
    if entity.kind != EntityKind::Property {
        return None;
    }
    let mut shape = PropertyShape::new(entity.id.as_str(), entity.datatype?);
    shape.labels = entity.labels.clone();
    shape.descriptions = entity.descriptions.clone();
    shape.canonical_uri = entity
        .statements
        .get(&PropertyId::from(FORMATTER_URI_FOR_RDF))
        .and_then(|statements| {
            let best = best_rank(statements)?;
            statements
                .iter()
                .filter(|s| s.rank == best)
                .find_map(|s| match &s.value {
                    Value::StringLit(template) => Some(template.clone()),
                    Value::EntityRef(_)
                    | Value::MonolingualText { .. }
                    | Value::Quantity(_)
                    | Value::Time(_)
                    | Value::GlobeCoordinate(_)
                    | Value::NoValue
                    | Value::SomeValue => None,
                })
        });
    Some(shape)
}

#[cfg(test)]
mod tests {
    use super::*;

    const Q42: &str = r#"{
        "type": "item",
        "id": "Q42",
        "labels": { "en": { "language": "en", "value": "Douglas Adams" } },
        "aliases": { "en": [ { "language": "en", "value": "DNA" } ] },
        "claims": {
            "P31": [ {
                "id": "Q42$F078E5B3-F9A8-480E-B7AC-D97778CBBEF9",
                "type": "statement",
                "rank": "normal",
                "mainsnak": {
                    "snaktype": "value", "property": "P31", "datatype": "wikibase-item",
                    "datavalue": { "type": "wikibase-entityid",
                                   "value": { "entity-type": "item", "numeric-id": 5, "id": "Q5" } }
                },
                "qualifiers": {
                    "P580": [ { "snaktype": "somevalue", "property": "P580" } ],
                    "P1545": [ { "snaktype": "value", "property": "P1545",
                                 "datavalue": { "type": "string", "value": "1" } } ]
                },
                "qualifiers-order": [ "P1545", "P580" ],
                "references": [ {
                    "hash": "fa278ebfc458360e5aed63d5058cca83c46134f1",
                    "snaks": { "P143": [ { "snaktype": "value", "property": "P143",
                        "datavalue": { "type": "wikibase-entityid",
                                       "value": { "entity-type": "item", "numeric-id": 328 } } } ] },
                    "snaks-order": [ "P143" ]
                } ]
            } ],
            "P1082": [ {
                "id": "Q42$1",
                "rank": "preferred",
                "mainsnak": { "snaktype": "value", "property": "P1082",
                    "datavalue": { "type": "quantity", "value": { "amount": "+1", "unit": "1" } } }
            } ]
        },
        "sitelinks": { "enwiki": { "site": "enwiki", "title": "Douglas Adams", "badges": [] } },
        "lastrevid": 1234,
        "modified": "2024-01-01T00:00:00Z"
    }"#;

    #[test]
    fn parses_item() {
        let entity = entity_from_json(Q42).expect("valid entity");
        assert_eq!(entity.id.as_str(), "Q42");
        assert_eq!(entity.kind, EntityKind::Item);
        assert_eq!(entity.labels["en"], "Douglas Adams");
        assert_eq!(entity.aliases["en"], ["DNA"]);
        assert_eq!(entity.lastrevid, Some(1234));
        assert_eq!(entity.statement_count(), 2);
        let statement = &entity.statements[&PropertyId::from("P31")][0];
        assert_eq!(statement.id, "Q42-F078E5B3-F9A8-480E-B7AC-D97778CBBEF9");
        assert_eq!(statement.value, Value::EntityRef(EntityId::from("Q5")));
        assert_eq!(statement.references[0].snaks()
            .map(|(_, v)| v.clone())
            .collect::<Vec<_>>(), [Value::EntityRef(EntityId::from("Q328"))]);
        assert_eq!(entity.sitelinks["enwiki"].title, "Douglas Adams");
    }

    #[test]
    fn qualifier_order_follows_qualifiers_order() {
        let entity = entity_from_json(Q42).expect("valid entity");
        let statement = &entity.statements[&PropertyId::from("P31")][0];
        let order: Vec<&str> = statement.qualifiers.keys().map(PropertyId::as_str).collect();
        assert_eq!(order, ["P1545", "P580"]);
        assert_eq!(statement.qualifiers[&PropertyId::from("P580")], [Value::SomeValue]);
    }

    #[test]
    fn accepts_entity_data_wrapper() {
        let wrapped = format!(r#"{{ "entities": {{ "Q42": {Q42} }} }}"#);
        let entities = entities_from_json(&wrapped).expect("valid document");
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].id.as_str(), "Q42");
    }

    #[test]
    fn property_entities_carry_datatype() {
        let json = r#"{ "type": "property", "id": "P214", "datatype": "external-id",
            "labels": { "en": { "language": "en", "value": "VIAF ID" } },
            "claims": { "P1921": [ { "id": "P214$x", "mainsnak": { "snaktype": "value",
                "property": "P1921", "datavalue": { "type": "string",
                "value": "http://viaf.org/viaf/$1" } } } ] } }"#;
        let entity = entity_from_json(json).expect("valid property");
        assert_eq!(entity.datatype, Some(Datatype::ExternalId));
        let shape = shape_from_entity(&entity).expect("property shape");
        assert_eq!(shape.canonical_uri.as_deref(), Some("http://viaf.org/viaf/$1"));
        assert_eq!(shape.labels["en"], "VIAF ID");
    }

    #[test]
    fn unknown_datatype_is_rejected() {
        let json = r#"{ "type": "property", "id": "P1", "datatype": "musical-notation" }"#;
        assert!(matches!(entity_from_json(json), Err(ConvertError::UnknownDatatype(_))));
    }

    #[test]
    fn statement_guid_sanitized() {
        assert_eq!(statement_local_name("Q42$abc-DEF_1"), "Q42-abc-DEF_1");
        assert_eq!(statement_local_name("q1$a b"), "q1-a-b");
    }

    #[test]
    fn registry_file() {
        let registry = registry_from_json(
            r#"{ "properties": {
                "P214": { "datatype": "external-id", "canonical-uri": "http://viaf.org/viaf/$1" },
                "P31": { "datatype": "wikibase-item", "labels": { "en": "instance of" } }
            }, "order": [ "P31", "P214" ] }"#,
        )
        .expect("valid registry");
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.position(&PropertyId::from("P214")), Some(1));
        let p31 = registry.get(&PropertyId::from("P31")).expect("P31 registered");
        assert_eq!(p31.datatype, Datatype::WikibaseItem);
        assert_eq!(p31.labels["en"], "instance of");
    }

    #[test]
    fn registry_rejects_unknown_datatype() {
        let result = registry_from_json(r#"{ "properties": { "P1": { "datatype": "nope" } } }"#);
        assert!(matches!(result, Err(ConvertError::UnknownDatatype(ref tag)) if tag == "nope"));
    }
}
