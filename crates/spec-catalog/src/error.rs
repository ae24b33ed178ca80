//! Error types for catalog construction

use thiserror::Error;

use crate::catalog::QualifiedKey;

/// Result type alias for catalog operations
pub type CatalogResult<T> = std::result::Result<T, CatalogError>;

/// Fatal catalog errors.
///
/// Per-source load failures are NOT here; they are collected as
/// [`crate::DocumentError`] values and carried inside the catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Two sources contribute the same qualified component key.
    /// Fatal for the catalog, unlike individual load failures.
    #[error("component '{key}' is defined by both '{first}' and '{second}'")]
    Collision {
        key: QualifiedKey,
        /// Location of the source that defined the key first
        first: String,
        /// Location of the colliding source
        second: String,
    },

    #[error("duplicate source name: '{0}'")]
    DuplicateSourceName(String),

    #[error("unsupported source location: {0}")]
    UnsupportedLocation(String),

    #[error("invalid catalog config: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
