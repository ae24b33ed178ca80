//! JSON Schema $ref resolver for OpenAPI documents

use indexmap::IndexMap;
use serde_json::Value;

const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";

/// Maximum number of $ref expansions along one branch. Cyclic schemas
/// (A -> B -> A) stop expanding here and keep the raw $ref.
const MAX_REF_DEPTH: usize = 10;

/// Resolves `$ref` references against a document's component schemas
pub struct SchemaResolver<'a> {
    schemas: &'a IndexMap<String, Value>,
}

impl<'a> SchemaResolver<'a> {
    pub fn new(schemas: &'a IndexMap<String, Value>) -> Self {
        Self { schemas }
    }

    /// Resolve a schema, inlining any `$ref` it contains
    pub fn resolve(&self, schema: &Value) -> Value {
        self.resolve_at(schema, 0)
    }

    fn resolve_at(&self, schema: &Value, depth: usize) -> Value {
        match schema {
            Value::Object(obj) => {
                if let Some(Value::String(reference)) = obj.get("$ref") {
                    if depth >= MAX_REF_DEPTH {
                        return schema.clone();
                    }
                    if let Some(target) = self.lookup(reference) {
                        return self.resolve_at(&target, depth + 1);
                    }
                    // Unknown ref target; leave it for the consumer
                    return schema.clone();
                }

                Value::Object(
                    obj.iter()
                        .map(|(key, value)| (key.clone(), self.resolve_at(value, depth)))
                        .collect(),
                )
            }
            Value::Array(items) => Value::Array(
                items.iter().map(|item| self.resolve_at(item, depth)).collect(),
            ),
            _ => schema.clone(),
        }
    }

    fn lookup(&self, reference: &str) -> Option<Value> {
        reference
            .strip_prefix(SCHEMA_REF_PREFIX)
            .and_then(|name| self.schemas.get(name))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolve_simple_ref() {
        let mut schemas = IndexMap::new();
        schemas.insert(
            "Pet".to_string(),
            json!({
                "type": "object",
                "properties": {
                    "name": {"type": "string"}
                },
                "required": ["name"]
            }),
        );

        let resolver = SchemaResolver::new(&schemas);
        let resolved = resolver.resolve(&json!({"$ref": "#/components/schemas/Pet"}));

        assert_eq!(resolved["type"], "object");
        assert!(resolved["properties"]["name"].is_object());
    }

    #[test]
    fn test_resolve_nested_ref() {
        let mut schemas = IndexMap::new();
        schemas.insert(
            "Tag".to_string(),
            json!({
                "type": "object",
                "properties": {
                    "label": {"type": "string"}
                }
            }),
        );
        schemas.insert(
            "Pet".to_string(),
            json!({
                "type": "object",
                "properties": {
                    "name": {"type": "string"},
                    "tag": {"$ref": "#/components/schemas/Tag"}
                }
            }),
        );

        let resolver = SchemaResolver::new(&schemas);
        let resolved = resolver.resolve(&json!({"$ref": "#/components/schemas/Pet"}));

        assert_eq!(resolved["properties"]["tag"]["type"], "object");
        assert!(resolved["properties"]["tag"]["properties"]["label"].is_object());
    }

    #[test]
    fn test_resolve_inside_allof() {
        let mut schemas = IndexMap::new();
        schemas.insert(
            "Base".to_string(),
            json!({
                "type": "object",
                "properties": {
                    "id": {"type": "string"}
                }
            }),
        );

        let resolver = SchemaResolver::new(&schemas);
        let resolved = resolver.resolve(&json!({
            "allOf": [
                {"$ref": "#/components/schemas/Base"},
                {"properties": {"name": {"type": "string"}}}
            ]
        }));

        let all_of = resolved["allOf"].as_array().unwrap();
        assert_eq!(all_of[0]["properties"]["id"]["type"], "string");
    }

    #[test]
    fn test_cyclic_ref_terminates() {
        let mut schemas = IndexMap::new();
        schemas.insert(
            "Node".to_string(),
            json!({
                "type": "object",
                "properties": {
                    "next": {"$ref": "#/components/schemas/Node"}
                }
            }),
        );

        let resolver = SchemaResolver::new(&schemas);
        let resolved = resolver.resolve(&json!({"$ref": "#/components/schemas/Node"}));

        // Must terminate; the innermost level keeps the raw $ref
        assert_eq!(resolved["type"], "object");
    }

    #[test]
    fn test_unknown_ref_is_kept() {
        let schemas = IndexMap::new();
        let resolver = SchemaResolver::new(&schemas);
        let schema = json!({"$ref": "#/components/responses/NotFound"});
        assert_eq!(resolver.resolve(&schema), schema);
    }
}
