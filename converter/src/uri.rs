//! IRIs and node identifiers of entities, statements, references and values.
//!
//! Hash pre-images are part of the output contract: value nodes, references
//! without a stored hash, skolem IRIs and restriction blank nodes are all
//! named after a digest of a canonical string built here.

use md5::{Digest, Md5};
use sha1::Sha1;

use crate::error::Result;
use crate::format::{canonical_timestamp, format_double, globe_iri, signed_decimal, unit_iri};
use crate::model::{EntityId, PropertyId, Reference, Value};
use crate::term::{Iri, Term};
use crate::vocabulary::{Namespace, Vocabulary};

fn md5_hex(input: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(input.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn sha1_hex(input: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(input.as_bytes());
    format!("{:x}", hasher.finalize())
}

impl Vocabulary {
    /// `wd:{id}`
    #[must_use]
    pub fn entity_uri(&self, id: &EntityId) -> Iri {
        Iri::name(Namespace::Wd, id.as_str())
    }

    /// `wd:{id}` of a property.
    #[must_use]
    pub fn property_uri(&self, id: &PropertyId) -> Iri {
        Iri::name(Namespace::Wd, id.as_str())
    }

    /// `data:{id}`
    #[must_use]
    pub fn dataset_uri(&self, id: &EntityId) -> Iri {
        Iri::name(Namespace::Data, id.as_str())
    }

    /// `wds:{id}`; the id is used as is.
    #[must_use]
    pub fn statement_uri(&self, id: &str) -> Iri {
        Iri::name(Namespace::Wds, id)
    }

    /// `wdref:{hash}`
    #[must_use]
    pub fn reference_uri(&self, hash: &str) -> Iri {
        Iri::name(Namespace::Wdref, hash)
    }

    /// The canonical serialization of a snak value.
    ///
    /// For structured values this is the pre-image of the value node hash.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::MalformedValue`](crate::ConvertError::MalformedValue)
    /// for malformed quantity amounts.
    pub fn canonical_form(&self, property: &PropertyId, value: &Value) -> Result<String> {
        let canonical = match value {
            Value::EntityRef(id) => format!("entity|{id}"),
            Value::StringLit(text) => format!("string|{text}"),
            Value::MonolingualText { language, text } => {
                format!("monolingualtext|{language}|{text}")
            }
            Value::NoValue => "novalue".to_owned(),
            Value::SomeValue => "somevalue".to_owned(),
            Value::Time(time) => {
                let mut canonical = format!(
                    "time|{}|{}|{}|{}",
                    canonical_timestamp(&time.timestamp),
                    time.precision,
                    time.timezone,
                    time.calendar_model
                );
                if time.before != 0 || time.after != 0 {
                    canonical.push_str(&format!("|{}|{}", time.before, time.after));
                }
                canonical
            }
            Value::Quantity(quantity) => {
                let mut canonical = format!(
                    "quantity|{}|{}",
                    signed_decimal(property, &quantity.amount)?,
                    unit_iri(quantity.unit.as_deref(), self).expand(self)
                );
                if let Some(upper) = &quantity.upper_bound {
                    canonical.push_str(&format!("|upper={}", signed_decimal(property, upper)?));
                }
                if let Some(lower) = &quantity.lower_bound {
                    canonical.push_str(&format!("|lower={}", signed_decimal(property, lower)?));
                }
                canonical
            }
            Value::GlobeCoordinate(coordinate) => format!(
                "globecoordinate|{}|{}|{}|{}",
                format_double(coordinate.latitude),
                format_double(coordinate.longitude),
                coordinate.precision.map(format_double).unwrap_or_default(),
                globe_iri(coordinate.globe.as_deref(), self).expand(self)
            ),
        };
        Ok(canonical)
    }

    /// `wdv:{md5}` of a structured value; `None` for simple values.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::MalformedValue`](crate::ConvertError::MalformedValue)
    /// for malformed quantity amounts.
    pub fn value_node_uri(&self, property: &PropertyId, value: &Value) -> Result<Option<Iri>> {
        match value {
            Value::Time(_) | Value::Quantity(_) | Value::GlobeCoordinate(_) => {
                let canonical = self.canonical_form(property, value)?;
                Ok(Some(Iri::name(Namespace::Wdv, md5_hex(&canonical))))
            }
            Value::EntityRef(_)
            | Value::StringLit(_)
            | Value::MonolingualText { .. }
            | Value::NoValue
            | Value::SomeValue => Ok(None),
        }
    }

    /// The hash of a reference: the stored one, or the SHA-1 of its
    /// canonical snak serialization.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::MalformedValue`](crate::ConvertError::MalformedValue)
    /// for malformed quantity amounts.
    pub fn reference_hash(&self, reference: &Reference) -> Result<String> {
        if !reference.hash.is_empty() {
            return Ok(reference.hash.clone());
        }
        let lines = reference
            .snaks()
            .map(|(pid, value)| Ok(format!("{pid}={}", self.canonical_form(pid, value)?)))
            .collect::<Result<Vec<_>>>()?;
        Ok(sha1_hex(&lines.join("\n")))
    }

    /// The skolem IRI standing in for an unknown value of `property` on
    /// `owner` (a statement id or reference hash).
    #[must_use]
    pub fn somevalue_uri(&self, owner: &str, property: &PropertyId) -> Iri {
        let hash = md5_hex(&format!("somevalue|{owner}|{property}"));
        Iri::full(format!("{}{hash}", self.skolem_base()))
    }

    /// The `owl:Restriction` blank node of a property's no-value class.
    #[must_use]
    pub fn restriction_node(&self, property: &PropertyId) -> Term {
        Term::Blank(md5_hex(&format!("restriction|{property}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GlobeCoordinate, Quantity, Time};

    fn pid() -> PropertyId {
        PropertyId::from("P1")
    }

    fn quantity(amount: &str, unit: Option<&str>) -> Value {
        Value::Quantity(Quantity {
            amount: amount.to_owned(),
            unit: unit.map(str::to_owned),
            upper_bound: None,
            lower_bound: None,
        })
    }

    #[test]
    fn digests_are_lowercase_hex() {
        assert_eq!(md5_hex(""), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(sha1_hex(""), "da39a3ee5e6b4b0d3255bfef95601890afd80709");
    }

    #[test]
    fn time_canonical_form() {
        let vocab = Vocabulary::wikidata();
        let mut time = Time {
            timestamp: "2001-05-11T00:00:00Z".to_owned(),
            precision: 11,
            before: 0,
            after: 0,
            timezone: 0,
            calendar_model: "http://www.wikidata.org/entity/Q1985727".to_owned(),
        };
        assert_eq!(
            vocab.canonical_form(&pid(), &Value::Time(time.clone())).ok().as_deref(),
            Some("time|+2001-05-11T00:00:00Z|11|0|http://www.wikidata.org/entity/Q1985727")
        );
        time.after = 2;
        assert!(vocab
            .canonical_form(&pid(), &Value::Time(time))
            .is_ok_and(|c| c.ends_with("|0|2")));
    }

    #[test]
    fn dimensionless_units_share_a_node() {
        let vocab = Vocabulary::wikidata();
        let a = vocab.value_node_uri(&pid(), &quantity("3", None)).ok().flatten();
        let b = vocab.value_node_uri(&pid(), &quantity("+3", Some("1"))).ok().flatten();
        assert!(a.is_some());
        assert_eq!(a, b);
        let c = vocab
            .value_node_uri(&pid(), &quantity("3", Some("http://www.wikidata.org/entity/Q11573")))
            .ok()
            .flatten();
        assert_ne!(a, c);
    }

    #[test]
    fn globe_canonical_form() {
        let vocab = Vocabulary::wikidata();
        let value = Value::GlobeCoordinate(GlobeCoordinate {
            latitude: 1.0,
            longitude: 0.00001,
            precision: None,
            globe: None,
        });
        assert_eq!(
            vocab.canonical_form(&pid(), &value).ok().as_deref(),
            Some("globecoordinate|1.0|1.0E-5||http://www.wikidata.org/entity/Q2")
        );
    }

    #[test]
    fn value_nodes_only_for_structured_values() {
        let vocab = Vocabulary::wikidata();
        assert_eq!(vocab.value_node_uri(&pid(), &Value::StringLit("x".into())).ok(), Some(None));
        let iri = vocab.value_node_uri(&pid(), &quantity("1", None)).ok().flatten();
        assert!(matches!(iri, Some(Iri::Name(Namespace::Wdv, ref h)) if h.len() == 32));
    }

    #[test]
    fn stored_reference_hash_wins() {
        let vocab = Vocabulary::wikidata();
        let reference = Reference::new("abc").with_snak("P1", Value::StringLit("x".into()));
        assert_eq!(vocab.reference_hash(&reference).ok().as_deref(), Some("abc"));
    }

    #[test]
    fn computed_reference_hash_is_sha1_of_snaks() {
        let vocab = Vocabulary::wikidata();
        let reference = Reference::new("")
            .with_snak("P854", Value::StringLit("http://example.org".into()))
            .with_snak("P143", Value::EntityRef(EntityId::from("Q328")));
        let expected = sha1_hex("P854=string|http://example.org\nP143=entity|Q328");
        assert_eq!(vocab.reference_hash(&reference).ok(), Some(expected));
    }

    #[test]
    fn skolem_iris_are_stable_per_owner_and_property() {
        let vocab = Vocabulary::wikidata();
        let a = vocab.somevalue_uri("Q1-abc", &pid());
        assert_eq!(a, vocab.somevalue_uri("Q1-abc", &pid()));
        assert_ne!(a, vocab.somevalue_uri("Q1-abd", &pid()));
        assert!(matches!(a, Iri::Full(ref iri) if iri.starts_with("http://www.wikidata.org/.well-known/genid/")));
    }
}
