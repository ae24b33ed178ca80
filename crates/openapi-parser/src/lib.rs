//! # openapi-parser
//!
//! OpenAPI 3.x parser for spec-catalog.
//! Parses JSON or YAML documents into a normalized model of operations and
//! shared components, resolving `$ref` schema references along the way.

mod error;
mod operations;
mod parser;
mod resolver;
mod types;

pub use error::{ParseError, ParseResult};
pub use operations::OperationExtractor;
pub use parser::OpenApiParser;
pub use types::*;
