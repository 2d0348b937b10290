//! The JSON Schema (draft-06) format backend.

use serde_json::{json, Map, Value};

use crate::error::CompileError;
use crate::schema::entries;
use crate::schema::traits::SchemaFormat;

/// The draft-06 meta-schema URI emitted in the document header.
pub const JSON_SCHEMA_DRAFT: &str = "http://json-schema.org/draft-06/schema#";

/// JSON Schema draft-06 output.
///
/// Alternatives group under `anyOf`; numeric exclusive bounds use the
/// draft-06 numeric `exclusiveMinimum`/`exclusiveMaximum` form.
pub struct JsonSchema;

impl SchemaFormat for JsonSchema {
    fn name(&self) -> &'static str {
        "JSON Schema"
    }

    fn permissive_hint(&self) -> &'static str {
        "SchemaCompiler::json_schema().permissive()"
    }

    fn document_root(&self, body: Map<String, Value>) -> Value {
        let mut document = entries(json!({
            "$schema": JSON_SCHEMA_DRAFT,
            "type": "object",
        }));
        document.extend(body);
        Value::Object(document)
    }

    fn fragment(&self, predicate: &str, arg: Option<&Value>) -> Option<Map<String, Value>> {
        let fragment = match predicate {
            "array?" => json!({"type": "array"}),
            "bool?" => json!({"type": "boolean"}),
            "date?" => json!({"type": "string", "format": "date"}),
            "date_time?" => json!({"type": "string", "format": "date-time"}),
            "time?" => json!({"type": "string", "format": "time"}),
            "decimal?" | "float?" => json!({"type": "number"}),
            "hash?" => json!({"type": "object"}),
            "int?" => json!({"type": "integer"}),
            "nil?" | "none?" => json!({"type": "null"}),
            "str?" => json!({"type": "string"}),
            "odd?" => json!({"type": "integer", "not": {"multipleOf": 2}}),
            "even?" => json!({"type": "integer", "multipleOf": 2}),
            "true?" => json!({"const": true}),
            "false?" => json!({"const": false}),
            "gt?" => json!({"exclusiveMinimum": arg?}),
            "gteq?" => json!({"minimum": arg?}),
            "lt?" => json!({"exclusiveMaximum": arg?}),
            "lteq?" => json!({"maximum": arg?}),
            "min_size?" => json!({"minLength": arg?}),
            "max_size?" => json!({"maxLength": arg?}),
            "included_in?" => json!({"enum": arg?}),
            "excluded_from?" => json!({"not": {"enum": arg?}}),
            "format?" => json!({"pattern": arg?}),
            "eql?" => json!({"const": arg?}),
            _ => return None,
        };
        Some(entries(fragment))
    }

    fn filled_fragment(
        &self,
        type_hint: Option<&str>,
        strict: bool,
    ) -> Result<Map<String, Value>, CompileError> {
        match type_hint {
            Some("string") => Ok(entries(json!({"minLength": 1}))),
            Some("array") if strict => Err(CompileError::UnsupportedSchemaConversion {
                predicate: "filled?".to_string(),
                type_hint: Some("array".to_string()),
                format: self.name(),
                permissive_hint: self.permissive_hint(),
            }),
            // No portable way to say "non-empty array"; permissive mode
            // settles for the not-null approximation.
            Some("array") => Ok(entries(json!({"not": {"type": "null"}}))),
            // Any other typed constraint already excludes null.
            _ => Ok(Map::new()),
        }
    }

    fn merge_or(&self, branches: Vec<Value>) -> Map<String, Value> {
        let mut alternatives = Vec::new();
        for branch in branches {
            match branch {
                Value::Object(mut map) if map.len() == 1 && map.contains_key("anyOf") => {
                    if let Some(Value::Array(nested)) = map.remove("anyOf") {
                        alternatives.extend(nested);
                    }
                }
                other => alternatives.push(other),
            }
        }
        entries(json!({"anyOf": alternatives}))
    }
}
