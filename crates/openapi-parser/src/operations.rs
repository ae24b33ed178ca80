//! Operation extraction from raw OpenAPI documents

use crate::error::ParseResult;
use crate::resolver::SchemaResolver;
use crate::types::*;
use indexmap::IndexMap;

/// Extracts operations from raw OpenAPI document structures
pub struct OperationExtractor;

impl OperationExtractor {
    /// Extract all operations, in document order
    pub fn extract(spec: &RawSpec) -> ParseResult<Vec<Operation>> {
        let mut operations = Vec::new();

        let empty_schemas = IndexMap::new();
        let schemas = spec
            .components
            .as_ref()
            .map(|c| &c.schemas)
            .unwrap_or(&empty_schemas);
        let resolver = SchemaResolver::new(schemas);

        for (path, path_item) in &spec.paths {
            // Path-level parameters apply to every operation under the path
            let path_params: Vec<OperationParameter> = path_item
                .parameters
                .iter()
                .filter_map(|p| Self::convert_parameter(p, &resolver))
                .collect();

            let methods = [
                (HttpMethod::Get, &path_item.get),
                (HttpMethod::Post, &path_item.post),
                (HttpMethod::Put, &path_item.put),
                (HttpMethod::Patch, &path_item.patch),
                (HttpMethod::Delete, &path_item.delete),
                (HttpMethod::Head, &path_item.head),
                (HttpMethod::Options, &path_item.options),
                (HttpMethod::Trace, &path_item.trace),
            ];

            for (method, operation) in methods {
                if let Some(op) = operation {
                    operations.push(Self::extract_operation(path, method, op, &path_params, &resolver));
                }
            }
        }

        Ok(operations)
    }

    fn extract_operation(
        path: &str,
        method: HttpMethod,
        operation: &RawOperation,
        path_params: &[OperationParameter],
        resolver: &SchemaResolver,
    ) -> Operation {
        let operation_id = operation
            .operation_id
            .clone()
            .unwrap_or_else(|| Self::generate_operation_id(path, method));

        // Operation-level parameters override path-level ones by name
        let mut parameters = path_params.to_vec();
        for param in &operation.parameters {
            if let Some(p) = Self::convert_parameter(param, resolver) {
                parameters.retain(|existing| existing.name != p.name);
                parameters.push(p);
            }
        }

        let request_body = operation
            .request_body
            .as_ref()
            .and_then(|body| Self::extract_request_body(body, resolver));

        let responses = Self::extract_responses(&operation.responses);

        Operation {
            operation_id,
            method,
            path: path.to_string(),
            summary: operation.summary.clone(),
            description: operation.description.clone(),
            tags: operation.tags.clone(),
            deprecated: operation.deprecated,
            parameters,
            request_body,
            responses,
        }
    }

    /// Generate an operation ID from path and method
    fn generate_operation_id(path: &str, method: HttpMethod) -> String {
        // /pets/{id}/photos -> get_pets_id_photos
        let path_part = path
            .trim_start_matches('/')
            .replace('/', "_")
            .replace(['{', '}'], "");

        format!("{}_{}", method.as_str().to_lowercase(), path_part)
    }

    fn convert_parameter(
        param: &RawParameter,
        resolver: &SchemaResolver,
    ) -> Option<OperationParameter> {
        // Referenced parameters are kept opaque in components; skip them here
        if param.reference.is_some() {
            return None;
        }

        let location = match param.location.as_str() {
            "path" => ParameterLocation::Path,
            "query" => ParameterLocation::Query,
            "header" => ParameterLocation::Header,
            "cookie" => ParameterLocation::Cookie,
            _ => return None,
        };

        let schema = param.schema.as_ref().map(|s| resolver.resolve(s));

        Some(OperationParameter {
            name: param.name.clone(),
            location,
            required: param.required || location == ParameterLocation::Path,
            description: param.description.clone(),
            schema,
            deprecated: param.deprecated,
        })
    }

    fn extract_request_body(body: &RawRequestBody, resolver: &SchemaResolver) -> Option<RequestBody> {
        // Prefer JSON content when a body offers several media types
        let (content_type, media) = body
            .content
            .iter()
            .find(|(ct, _)| ct.contains("json"))
            .or_else(|| body.content.first())?;

        let schema = media.schema.as_ref().map(|s| resolver.resolve(s));

        Some(RequestBody {
            required: body.required,
            content_type: content_type.clone(),
            schema,
            description: body.description.clone(),
        })
    }

    fn extract_responses(responses: &IndexMap<String, RawResponse>) -> Vec<ResponseSchema> {
        responses
            .iter()
            .map(|(status, response)| {
                let (content_type, schema) = response
                    .content
                    .as_ref()
                    .and_then(|content| {
                        content
                            .iter()
                            .find(|(ct, _)| ct.contains("json"))
                            .or_else(|| content.first())
                            .map(|(ct, media)| (Some(ct.clone()), media.schema.clone()))
                    })
                    .unwrap_or((None, None));

                ResponseSchema {
                    status_code: status.clone(),
                    content_type,
                    schema,
                    description: response.description.clone(),
                }
            })
            .collect()
    }
}
