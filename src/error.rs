//! Error types for schema loading, resolution and configuration.

use std::path::PathBuf;

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, QuerysmithError>;

#[derive(Debug, Error)]
pub enum QuerysmithError {
    /// The schema file could not be read.
    #[error("failed to read schema {0}: {1}")]
    LoadIo(PathBuf, #[source] std::io::Error),

    /// The schema document is not valid introspection JSON.
    #[error("failed to parse schema: {0}")]
    LoadParse(#[from] serde_json::Error),

    /// The document parsed but violates the shape the model requires.
    #[error("invalid schema: {0}")]
    LoadInvalid(String),

    /// An unknown type or mutation name was requested.
    #[error("{kind} not found: {name}")]
    NotFound { kind: &'static str, name: String },

    /// A path segment has no matching field on the current type.
    #[error("field '{field}' not found on type '{type_name}'")]
    FieldNotFound { type_name: String, field: String },

    /// A path descends into a type that cannot hold fields.
    #[error("cannot resolve '{segment}': type '{type_name}' has no fields")]
    InvalidPath { type_name: String, segment: String },

    #[error("config error: {0}")]
    Config(String),
}

impl QuerysmithError {
    pub fn type_not_found(name: impl Into<String>) -> Self {
        QuerysmithError::NotFound {
            kind: "type",
            name: name.into(),
        }
    }

    pub fn mutation_not_found(name: impl Into<String>) -> Self {
        QuerysmithError::NotFound {
            kind: "mutation",
            name: name.into(),
        }
    }
}
