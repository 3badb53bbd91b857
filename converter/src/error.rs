//! Conversion errors.

use thiserror::Error;

use crate::model::PropertyId;

/// Errors that abort the conversion of an entity.
///
/// No variant leaves a partially written document behind: the converter
/// renders the whole document before touching the sink.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// A snak whose value does not fit its property's datatype, or a value
    /// with a malformed lexical form.
    #[error("Malformed value for {property}: {reason}")]
    MalformedValue {
        /// Property of the offending snak.
        property: PropertyId,
        /// What is wrong with it.
        reason: String,
    },

    /// A datatype tag this converter does not know.
    #[error("Unknown datatype: {0}")]
    UnknownDatatype(String),

    /// A property absent from the registry under the `Fail` policy.
    #[error("Property {0} is not in the property registry")]
    MissingProperty(PropertyId),

    /// The referenced-entity loader failed.
    #[error(transparent)]
    Loader(#[from] LoaderError),

    /// Writing the document to the sink failed.
    #[error("Failed to write RDF output: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed Wikibase JSON.
    #[error("Malformed entity JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConvertError {
    pub(crate) fn malformed(property: &PropertyId, reason: impl Into<String>) -> Self {
        ConvertError::MalformedValue {
            property: property.clone(),
            reason: reason.into(),
        }
    }
}

/// A failure reported by an [`EntityLoader`](crate::collector::EntityLoader).
///
/// "Not found" is not an error; loaders report it as `Ok(None)`.
#[derive(Debug, Error)]
#[error("Failed to load entity {entity}: {message}")]
pub struct LoaderError {
    /// Id of the entity being loaded.
    pub entity: String,
    /// Description of the failure.
    pub message: String,
}

impl LoaderError {
    /// Creates a loader error for an entity id.
    pub fn new(entity: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            message: message.into(),
        }
    }
}

/// Result alias for conversion operations.
pub type Result<T> = std::result::Result<T, ConvertError>;
