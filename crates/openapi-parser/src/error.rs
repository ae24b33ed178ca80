//! Error types for the OpenAPI parser

use thiserror::Error;

/// Result type alias for parser operations
pub type ParseResult<T> = std::result::Result<T, ParseError>;

/// Parser error types
///
/// `Syntax` means the input is not well-formed JSON or YAML at all;
/// `Schema` means it parsed but is not a structurally valid OpenAPI document.
/// Callers rely on that distinction to classify per-source failures.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("document is not valid JSON or YAML: {0}")]
    Syntax(String),

    #[error("document is not a valid OpenAPI spec: {0}")]
    Schema(String),

    #[error("unsupported OpenAPI version: {0}")]
    UnsupportedVersion(String),
}
