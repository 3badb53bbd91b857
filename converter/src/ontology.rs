//! Property metadata and OWL declarations.
//!
//! Every property a document touches gets one ontology block: its
//! `wikibase:Property` description and terms, the links to its predicate
//! set, the OWL kind of each predicate and the `wdno:` class with its
//! restriction.

use indexmap::IndexMap;
use tracing::warn;

use crate::format::language_tag;
use crate::registry::{Datatype, PropertyShape};
use crate::serializer::RdfWriter;
use crate::term::{name, node, Iri, Literal, Term};
use crate::vocabulary::{Namespace, Vocabulary};

/// Writes `rdfs:label`, `skos:prefLabel` and `schema:name` for each label.
pub(crate) fn write_labels(out: &mut dyn RdfWriter, subject: &Term, labels: &IndexMap<String, String>) {
    for (language, text) in labels {
        let Some(tag) = language_tag(language) else {
            warn!(language = %language, "skipping label with invalid language code");
            continue;
        };
        let literal: Term = Literal::lang(text.as_str(), tag).into();
        out.triple(subject, &name(Namespace::Rdfs, "label"), &literal);
        out.triple(subject, &name(Namespace::Skos, "prefLabel"), &literal);
        out.triple(subject, &name(Namespace::Schema, "name"), &literal);
    }
}

/// Writes `schema:description` for each description.
pub(crate) fn write_descriptions(
    out: &mut dyn RdfWriter,
    subject: &Term,
    descriptions: &IndexMap<String, String>,
) {
    for (language, text) in descriptions {
        let Some(tag) = language_tag(language) else {
            warn!(language = %language, "skipping description with invalid language code");
            continue;
        };
        out.triple(
            subject,
            &name(Namespace::Schema, "description"),
            &Literal::lang(text.as_str(), tag).into(),
        );
    }
}

/// Writes the ontology block of one property.
///
/// With `described_by_entity`, the property is the converted entity itself
/// and its type, terms and datatype have already been written.
pub fn write_property(
    out: &mut dyn RdfWriter,
    vocab: &Vocabulary,
    shape: &PropertyShape,
    described_by_entity: bool,
) {
    let subject: Term = vocab.property_uri(&shape.id).into();
    let predicates = &shape.predicates;

    if !described_by_entity {
        out.triple(
            &subject,
            &name(Namespace::Rdf, "type"),
            &node(Namespace::Wikibase, "Property"),
        );
        write_labels(out, &subject, &shape.labels);
        write_descriptions(out, &subject, &shape.descriptions);
        out.triple(
            &subject,
            &name(Namespace::Wikibase, "propertyType"),
            &node(Namespace::Wikibase, shape.datatype.ontology_class()),
        );
    }

    let mut link = |predicate: &str, object: &Iri| {
        out.triple(&subject, &name(Namespace::Wikibase, predicate), &object.clone().into());
    };
    link("directClaim", &predicates.direct_claim);
    link("claim", &predicates.claim);
    link("statementProperty", &predicates.statement);
    if let Some(iri) = &predicates.statement_value {
        link("statementValue", iri);
    }
    link("qualifier", &predicates.qualifier);
    if let Some(iri) = &predicates.qualifier_value {
        link("qualifierValue", iri);
    }
    link("reference", &predicates.reference);
    if let Some(iri) = &predicates.reference_value {
        link("referenceValue", iri);
    }
    link("novalue", &predicates.no_value);
    if let Some(normalized) = &predicates.normalized {
        link("directClaimNormalized", &normalized.direct_claim);
        link("statementValueNormalized", &normalized.statement);
        link("qualifierValueNormalized", &normalized.qualifier);
        link("referenceValueNormalized", &normalized.reference);
    }

    write_declarations(out, shape);
    write_no_value_class(out, vocab, shape);
}

fn write_declarations(out: &mut dyn RdfWriter, shape: &PropertyShape) {
    let predicates = &shape.predicates;
    let ty = name(Namespace::Rdf, "type");
    let object_property = node(Namespace::Owl, "ObjectProperty");
    let datatype_property = node(Namespace::Owl, "DatatypeProperty");

    let mut object_properties = vec![&predicates.claim];
    object_properties.extend(predicates.statement_value.iter());
    object_properties.extend(predicates.qualifier_value.iter());
    object_properties.extend(predicates.reference_value.iter());
    object_properties.extend([&predicates.statement, &predicates.qualifier, &predicates.reference]);
    if let Some(normalized) = &predicates.normalized {
        object_properties.extend([&normalized.statement, &normalized.qualifier, &normalized.reference]);
    }
    for iri in object_properties {
        out.triple(&iri.clone().into(), &ty, &object_property);
    }

    let direct_kind = if shape.datatype.has_iri_values() {
        &object_property
    } else {
        &datatype_property
    };
    out.triple(&predicates.direct_claim.clone().into(), &ty, direct_kind);

    if let Some(normalized) = &predicates.normalized {
        let normalized_kind = if shape.datatype == Datatype::ExternalId {
            &object_property
        } else {
            &datatype_property
        };
        out.triple(&normalized.direct_claim.clone().into(), &ty, normalized_kind);
    }
}

fn write_no_value_class(out: &mut dyn RdfWriter, vocab: &Vocabulary, shape: &PropertyShape) {
    let ty = name(Namespace::Rdf, "type");
    let restriction = vocab.restriction_node(&shape.id);
    let class: Term = shape.predicates.no_value.clone().into();
    out.triple(&class, &ty, &node(Namespace::Owl, "Class"));
    out.triple(&class, &name(Namespace::Owl, "complementOf"), &restriction);
    out.triple(&restriction, &ty, &node(Namespace::Owl, "Restriction"));
    out.triple(
        &restriction,
        &name(Namespace::Owl, "onProperty"),
        &shape.predicates.direct_claim.clone().into(),
    );
    out.triple(
        &restriction,
        &name(Namespace::Owl, "someValuesFrom"),
        &node(Namespace::Owl, "Thing"),
    );
}
