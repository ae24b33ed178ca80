//! Main OpenAPI parser

use crate::error::{ParseError, ParseResult};
use crate::operations::OperationExtractor;
use crate::types::*;
use indexmap::IndexMap;
use regex::Regex;
use tracing::debug;

/// OpenAPI 3.x parser
pub struct OpenApiParser;

impl OpenApiParser {
    /// Parse an OpenAPI document from a string (auto-detects JSON/YAML)
    pub fn parse(content: &str) -> ParseResult<SpecDocument> {
        let content = Self::sanitize_large_numbers(content);

        if content.trim_start().starts_with('{') {
            Self::parse_json_sanitized(&content)
        } else {
            Self::parse_yaml_sanitized(&content)
        }
    }

    /// Parse an OpenAPI document from JSON
    pub fn parse_json(content: &str) -> ParseResult<SpecDocument> {
        let content = Self::sanitize_large_numbers(content);
        Self::parse_json_sanitized(&content)
    }

    /// Parse an OpenAPI document from YAML
    pub fn parse_yaml(content: &str) -> ParseResult<SpecDocument> {
        let content = Self::sanitize_large_numbers(content);
        Self::parse_yaml_sanitized(&content)
    }

    // Two-stage parse: syntax errors (not JSON at all) stay distinct from
    // schema errors (valid JSON that is not an OpenAPI document).
    fn parse_json_sanitized(content: &str) -> ParseResult<SpecDocument> {
        let value: serde_json::Value =
            serde_json::from_str(content).map_err(|e| ParseError::Syntax(e.to_string()))?;
        let raw: RawSpec =
            serde_json::from_value(value).map_err(|e| ParseError::Schema(e.to_string()))?;
        Self::convert(raw)
    }

    fn parse_yaml_sanitized(content: &str) -> ParseResult<SpecDocument> {
        let value: serde_yaml::Value =
            serde_yaml::from_str(content).map_err(|e| ParseError::Syntax(e.to_string()))?;
        let raw: RawSpec =
            serde_yaml::from_value(value).map_err(|e| ParseError::Schema(e.to_string()))?;
        Self::convert(raw)
    }

    /// Sanitize large numbers that may cause parsing issues
    ///
    /// Some real-world specs use integers beyond i64 range for min/max
    /// constraints, which serde_yaml rejects with "number out of range".
    /// The exact values do not matter for cataloging, so clamp them.
    /// Only key position matches: a YAML key at line start, or a quoted
    /// JSON key after `{` or `,`. Prose inside string values stays intact.
    fn sanitize_large_numbers(content: &str) -> String {
        let re = Regex::new(
            r#"(?m)(^\s*"?(?:minimum|maximum|exclusiveMinimum|exclusiveMaximum)"?\s*:\s*|[{,]\s*"(?:minimum|maximum|exclusiveMinimum|exclusiveMaximum)"\s*:\s*)(-?\d{16,})"#,
        )
        .unwrap();

        re.replace_all(content, |caps: &regex::Captures| {
            let prefix = &caps[1];
            if caps[2].starts_with('-') {
                format!("{}-2147483648", prefix)
            } else {
                format!("{}2147483647", prefix)
            }
        })
        .into_owned()
    }

    /// Convert a raw document to the normalized model, validating structure
    fn convert(raw: RawSpec) -> ParseResult<SpecDocument> {
        if !raw.openapi.starts_with("3.") {
            return Err(ParseError::UnsupportedVersion(raw.openapi));
        }
        if raw.info.title.trim().is_empty() {
            return Err(ParseError::Schema("info.title must not be empty".into()));
        }
        if raw.info.version.trim().is_empty() {
            return Err(ParseError::Schema("info.version must not be empty".into()));
        }

        debug!("parsing OpenAPI {} document: {}", raw.openapi, raw.info.title);

        let operations = OperationExtractor::extract(&raw)?;
        let components = Self::collect_components(raw.components.as_ref());

        debug!(
            "extracted {} operations, {} components",
            operations.len(),
            components.len()
        );

        let servers = raw
            .servers
            .iter()
            .map(|s| ServerInfo {
                url: s.url.clone(),
                description: s.description.clone(),
            })
            .collect();

        Ok(SpecDocument {
            title: raw.info.title,
            description: raw.info.description,
            version: raw.info.version,
            servers,
            operations,
            components,
        })
    }

    /// Lift the mergeable component sections into one ordered map
    fn collect_components(
        components: Option<&RawComponents>,
    ) -> IndexMap<ComponentName, serde_json::Value> {
        let mut out = IndexMap::new();
        let Some(components) = components else {
            return out;
        };

        let sections = [
            (ComponentKind::Schema, &components.schemas),
            (ComponentKind::Response, &components.responses),
            (ComponentKind::Parameter, &components.parameters),
        ];
        for (kind, section) in sections {
            for (name, definition) in section {
                out.insert(ComponentName::new(kind, name.clone()), definition.clone());
            }
        }
        out
    }
}
