//! The OpenAPI 3.0 format backend.

use serde_json::{json, Map, Value};

use crate::error::CompileError;
use crate::schema::entries;
use crate::schema::traits::SchemaFormat;

/// OpenAPI 3.0 property-fragment output.
///
/// Alternatives group under `oneOf`; a null alternative collapses into
/// `nullable: true` on the other branch instead of a `"null"` type
/// union; exclusive numeric bounds use the 3.0 boolean form beside
/// `minimum`/`maximum`; `const` is unavailable, so equality constraints
/// become single-element `enum`s.
pub struct OpenApi;

impl SchemaFormat for OpenApi {
    fn name(&self) -> &'static str {
        "OpenAPI"
    }

    fn permissive_hint(&self) -> &'static str {
        "SchemaCompiler::open_api().permissive()"
    }

    fn document_root(&self, body: Map<String, Value>) -> Value {
        Value::Object(body)
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
            "nil?" | "none?" => json!({"nullable": true}),
            "str?" => json!({"type": "string"}),
            "odd?" => json!({"type": "integer", "not": {"multipleOf": 2}}),
            "even?" => json!({"type": "integer", "multipleOf": 2}),
            "true?" => json!({"enum": [true]}),
            "false?" => json!({"enum": [false]}),
            "gt?" => json!({"minimum": arg?, "exclusiveMinimum": true}),
            "gteq?" => json!({"minimum": arg?}),
            "lt?" => json!({"maximum": arg?, "exclusiveMaximum": true}),
            "lteq?" => json!({"maximum": arg?}),
            "min_size?" => json!({"minLength": arg?}),
            "max_size?" => json!({"maxLength": arg?}),
            "included_in?" => json!({"enum": arg?}),
            "excluded_from?" => json!({"not": {"enum": arg?}}),
            "format?" => json!({"pattern": arg?}),
            "eql?" => json!({"enum": [arg?]}),
            _ => return None,
        };
        Some(entries(fragment))
    }

    fn filled_fragment(
        &self,
        type_hint: Option<&str>,
        _strict: bool,
    ) -> Result<Map<String, Value>, CompileError> {
        match type_hint {
            Some("string") => Ok(entries(json!({"minLength": 1}))),
            Some("array") => Ok(entries(json!({"minItems": 1}))),
            // Fields are non-nullable by default; nothing to add.
            _ => Ok(Map::new()),
        }
    }

    fn merge_or(&self, branches: Vec<Value>) -> Map<String, Value> {
        let null_count = branches.iter().filter(|b| is_null_marker(b)).count();

        if null_count > 0 && branches.len() - null_count == 1 {
            if let Some(Value::Object(mut merged)) =
                branches.into_iter().find(|branch| !is_null_marker(branch))
            {
                merged.insert("nullable".to_string(), Value::Bool(true));
                return merged;
            }
            return Map::new();
        }

        let mut alternatives = Vec::new();
        for branch in branches {
            match branch {
                Value::Object(mut map) if map.len() == 1 && map.contains_key("oneOf") => {
                    if let Some(Value::Array(nested)) = map.remove("oneOf") {
                        alternatives.extend(nested);
                    }
                }
                other => alternatives.push(other),
            }
        }
        entries(json!({"oneOf": alternatives}))
    }

    fn negate(&self, fragment: Value) -> Map<String, Value> {
        if is_null_marker(&fragment) {
            // Non-nullable is the default; a negated null needs nothing.
            return Map::new();
        }
        let mut map = Map::new();
        map.insert("not".to_string(), fragment);
        map
    }
}

/// A branch expressing only the null alternative.
fn is_null_marker(value: &Value) -> bool {
    value.as_object().is_some_and(is_null_marker_map)
}

fn is_null_marker_map(map: &Map<String, Value>) -> bool {
    map.len() == 1
        && (map.get("nullable") == Some(&Value::Bool(true))
            || matches!(map.get("type"), Some(Value::String(kind)) if kind == "null"))
}
