//! Namespaces and base IRIs of the Wikibase RDF vocabulary.
//!
//! Every IRI the converter writes is either a name in one of the fixed
//! [`Namespace`]s or a full IRI. The namespace IRIs that depend on the
//! repository (entity, data, statement, value, reference and property
//! namespaces) are derived from a [`Vocabulary`], which defaults to
//! Wikidata's and can be overridden through [`VocabularyConfig`].

use serde::Deserialize;

/// A namespace with a fixed Turtle prefix.
///
/// The declaration order of the variants is the order of the `@prefix`
/// block at the top of every Turtle document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Namespace {
    /// `rdf:`
    Rdf,
    /// `xsd:`
    Xsd,
    /// `rdfs:`
    Rdfs,
    /// `owl:`
    Owl,
    /// `wikibase:` ontology namespace.
    Wikibase,
    /// `schema:` (schema.org).
    Schema,
    /// `skos:`
    Skos,
    /// `cc:` (Creative Commons).
    Cc,
    /// `geo:` (GeoSPARQL).
    Geo,
    /// `prov:`
    Prov,
    /// `wd:` entities.
    Wd,
    /// `data:` entity datasets.
    Data,
    /// `wds:` statement nodes.
    Wds,
    /// `wdref:` reference nodes.
    Wdref,
    /// `wdv:` value nodes.
    Wdv,
    /// `wdt:` direct claims.
    Wdt,
    /// `wdtn:` normalized direct claims.
    Wdtn,
    /// `p:` claims.
    P,
    /// `ps:` statement values.
    Ps,
    /// `psv:` statement value nodes.
    Psv,
    /// `psn:` normalized statement value nodes.
    Psn,
    /// `pq:` qualifiers.
    Pq,
    /// `pqv:` qualifier value nodes.
    Pqv,
    /// `pqn:` normalized qualifier value nodes.
    Pqn,
    /// `pr:` reference snaks.
    Pr,
    /// `prv:` reference value nodes.
    Prv,
    /// `prn:` normalized reference value nodes.
    Prn,
    /// `wdno:` no-value classes.
    Wdno,
}

impl Namespace {
    /// All namespaces in prefix-block order.
    pub const ALL: [Namespace; 28] = [
        Namespace::Rdf,
        Namespace::Xsd,
        Namespace::Rdfs,
        Namespace::Owl,
        Namespace::Wikibase,
        Namespace::Schema,
        Namespace::Skos,
        Namespace::Cc,
        Namespace::Geo,
        Namespace::Prov,
        Namespace::Wd,
        Namespace::Data,
        Namespace::Wds,
        Namespace::Wdref,
        Namespace::Wdv,
        Namespace::Wdt,
        Namespace::Wdtn,
        Namespace::P,
        Namespace::Ps,
        Namespace::Psv,
        Namespace::Psn,
        Namespace::Pq,
        Namespace::Pqv,
        Namespace::Pqn,
        Namespace::Pr,
        Namespace::Prv,
        Namespace::Prn,
        Namespace::Wdno,
    ];

    /// Returns the Turtle prefix (without the trailing colon).
    #[must_use]
    pub fn prefix(self) -> &'static str {
        match self {
            Namespace::Rdf => "rdf",
            Namespace::Xsd => "xsd",
            Namespace::Rdfs => "rdfs",
            Namespace::Owl => "owl",
            Namespace::Wikibase => "wikibase",
            Namespace::Schema => "schema",
            Namespace::Skos => "skos",
            Namespace::Cc => "cc",
            Namespace::Geo => "geo",
            Namespace::Prov => "prov",
            Namespace::Wd => "wd",
            Namespace::Data => "data",
            Namespace::Wds => "wds",
            Namespace::Wdref => "wdref",
            Namespace::Wdv => "wdv",
            Namespace::Wdt => "wdt",
            Namespace::Wdtn => "wdtn",
            Namespace::P => "p",
            Namespace::Ps => "ps",
            Namespace::Psv => "psv",
            Namespace::Psn => "psn",
            Namespace::Pq => "pq",
            Namespace::Pqv => "pqv",
            Namespace::Pqn => "pqn",
            Namespace::Pr => "pr",
            Namespace::Prv => "prv",
            Namespace::Prn => "prn",
            Namespace::Wdno => "wdno",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Standard IRI constants of the W3C and community vocabularies.
pub mod iris {
    /// RDF namespace.
    pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
    /// XSD namespace.
    pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";
    /// RDFS namespace.
    pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
    /// OWL namespace.
    pub const OWL: &str = "http://www.w3.org/2002/07/owl#";
    /// Wikibase ontology namespace.
    pub const WIKIBASE: &str = "http://wikiba.se/ontology#";
    /// schema.org namespace.
    pub const SCHEMA: &str = "http://schema.org/";
    /// SKOS namespace.
    pub const SKOS: &str = "http://www.w3.org/2004/02/skos/core#";
    /// Creative Commons namespace.
    pub const CC: &str = "http://creativecommons.org/ns#";
    /// GeoSPARQL namespace.
    pub const GEO: &str = "http://www.opengis.net/ont/geosparql#";
    /// PROV namespace.
    pub const PROV: &str = "http://www.w3.org/ns/prov#";
    /// MathML datatype used for `math` literals.
    pub const MATHML: &str = "http://www.w3.org/1998/Math/MathML";
    /// CC0 license IRI.
    pub const CC0: &str = "http://creativecommons.org/publicdomain/zero/1.0/";
    /// Base IRI of Commons media files.
    pub const COMMONS_FILE_PATH: &str = "http://commons.wikimedia.org/wiki/Special:FilePath/";
}

/// Local names of well-known Wikidata items.
pub mod items {
    /// Earth, the default globe of coordinates.
    pub const EARTH: &str = "Q2";
    /// "1", the unit of dimensionless quantities.
    pub const NO_UNIT: &str = "Q199";
    /// Proleptic Gregorian calendar.
    pub const GREGORIAN: &str = "Q1985727";
    /// Proleptic Julian calendar.
    pub const JULIAN: &str = "Q1985786";
}

/// Version of the RDF mapping written as `schema:softwareVersion`.
pub const FORMAT_VERSION: &str = "1.0.0";

/// Repository-specific vocabulary overrides, as read from configuration.
///
/// All fields default to Wikidata's values.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct VocabularyConfig {
    /// Root of the repository IRI space (`http://www.wikidata.org/`).
    pub root: String,
    /// Base of the entity data IRIs.
    pub data_base: String,
    /// License of the data, written as `cc:license`.
    pub license: String,
    /// Version written as `schema:softwareVersion`.
    pub software_version: String,
}

impl Default for VocabularyConfig {
    fn default() -> Self {
        Self {
            root: "http://www.wikidata.org/".to_owned(),
            data_base: "https://www.wikidata.org/wiki/Special:EntityData/".to_owned(),
            license: iris::CC0.to_owned(),
            software_version: FORMAT_VERSION.to_owned(),
        }
    }
}

/// The resolved IRIs of every [`Namespace`] plus repository metadata.
///
/// A vocabulary is built once and shared read-only by every conversion.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    namespaces: Vec<String>,
    skolem_base: String,
    license: String,
    software_version: String,
}

impl Vocabulary {
    /// Builds the vocabulary for a repository.
    #[must_use]
    pub fn new(config: &VocabularyConfig) -> Self {
        let root = if config.root.ends_with('/') {
            config.root.clone()
        } else {
            format!("{}/", config.root)
        };
        let prop = format!("{root}prop/");
        let namespaces = Namespace::ALL
            .iter()
            .map(|ns| match ns {
                Namespace::Rdf => iris::RDF.to_owned(),
                Namespace::Xsd => iris::XSD.to_owned(),
                Namespace::Rdfs => iris::RDFS.to_owned(),
                Namespace::Owl => iris::OWL.to_owned(),
                Namespace::Wikibase => iris::WIKIBASE.to_owned(),
                Namespace::Schema => iris::SCHEMA.to_owned(),
                Namespace::Skos => iris::SKOS.to_owned(),
                Namespace::Cc => iris::CC.to_owned(),
                Namespace::Geo => iris::GEO.to_owned(),
                Namespace::Prov => iris::PROV.to_owned(),
                Namespace::Wd => format!("{root}entity/"),
                Namespace::Data => config.data_base.clone(),
                Namespace::Wds => format!("{root}entity/statement/"),
                Namespace::Wdref => format!("{root}reference/"),
                Namespace::Wdv => format!("{root}value/"),
                Namespace::Wdt => format!("{prop}direct/"),
                Namespace::Wdtn => format!("{prop}direct-normalized/"),
                Namespace::P => prop.clone(),
                Namespace::Ps => format!("{prop}statement/"),
                Namespace::Psv => format!("{prop}statement/value/"),
                Namespace::Psn => format!("{prop}statement/value-normalized/"),
                Namespace::Pq => format!("{prop}qualifier/"),
                Namespace::Pqv => format!("{prop}qualifier/value/"),
                Namespace::Pqn => format!("{prop}qualifier/value-normalized/"),
                Namespace::Pr => format!("{prop}reference/"),
                Namespace::Prv => format!("{prop}reference/value/"),
                Namespace::Prn => format!("{prop}reference/value-normalized/"),
                Namespace::Wdno => format!("{prop}novalue/"),
            })
            .collect();
        Self {
            namespaces,
            skolem_base: format!("{root}.well-known/genid/"),
            license: config.license.clone(),
            software_version: config.software_version.clone(),
        }
    }

    /// Wikidata's vocabulary.
    #[must_use]
    pub fn wikidata() -> Self {
        Self::new(&VocabularyConfig::default())
    }

    /// Returns the full IRI of a namespace.
    #[must_use]
    pub fn namespace(&self, ns: Namespace) -> &str {
        &self.namespaces[ns.index()]
    }

    /// Base of the skolem IRIs standing in for unknown ("some") values.
    #[must_use]
    pub fn skolem_base(&self) -> &str {
        &self.skolem_base
    }

    /// License IRI of the exported data.
    #[must_use]
    pub fn license(&self) -> &str {
        &self.license
    }

    /// Version written as `schema:softwareVersion`.
    #[must_use]
    pub fn software_version(&self) -> &str {
        &self.software_version
    }

    /// Splits a full IRI into a namespace name when it lies in the entity
    /// namespace, e.g. `http://www.wikidata.org/entity/Q2` into `(Wd, "Q2")`.
    #[must_use]
    pub fn entity_local_name<'a>(&self, iri: &'a str) -> Option<&'a str> {
        iri.strip_prefix(self.namespace(Namespace::Wd))
            .filter(|local| !local.is_empty() && !local.contains('/'))
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::wikidata()
    }
}
