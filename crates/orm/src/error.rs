//! Errors

use thiserror::Error;

/// Result type for entity introspection.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Fatal, construction-time errors raised while deriving an entity descriptor.
///
/// These indicate an unusable entity or mapper declaration and are never
/// retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No instance field is tagged as the primary key.
    #[error("no primary key found in {entity}")]
    MissingPrimaryKey { entity: String },

    /// More than one instance field is tagged as the primary key.
    #[error("multiple primary keys found in {entity}: {}", fields.join(", "))]
    AmbiguousPrimaryKey { entity: String, fields: Vec<String> },

    /// A field name is declared more than once.
    #[error("field `{field}` is declared more than once in {entity}")]
    DuplicateField { entity: String, field: String },

    /// A field name cannot be written inside a `#{...}` parameter marker.
    #[error("field `{field}` in {entity} is not a valid property name")]
    InvalidFieldName { entity: String, field: String },

    /// The entity name translates to an empty table name.
    #[error("cannot derive a table name for {entity}")]
    EmptyTableName { entity: String },
}

impl ConfigError {
    /// Returns the full path of the entity the error refers to.
    #[must_use]
    pub fn entity(&self) -> &str {
        match self {
            Self::MissingPrimaryKey { entity }
            | Self::AmbiguousPrimaryKey { entity, .. }
            | Self::DuplicateField { entity, .. }
            | Self::InvalidFieldName { entity, .. }
            | Self::EmptyTableName { entity } => entity,
        }
    }
}
