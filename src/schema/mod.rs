//! Schema compilation for declared-predicate trees.
//!
//! This module provides the second compiler pass: a walk over the same
//! tagged tree shape as the message compiler, but over a schema's
//! *declaration* rather than a per-call result, materializing a static
//! schema document per format backend.
//!
//! # Example
//!
//! ```rust
//! use debrief::{Node, SchemaCompiler};
//! use serde_json::json;
//!
//! let age = Node::and(
//!     Node::predicate("key?", [("name", json!("age"))]),
//!     Node::key("age", Node::nullary("int?")),
//! );
//!
//! let schema = SchemaCompiler::json_schema().compile(&age).unwrap();
//! assert_eq!(schema["properties"]["age"]["type"], json!("integer"));
//! ```

mod compiler;
mod json_schema;
mod open_api;
mod traits;

pub use compiler::SchemaCompiler;
pub use json_schema::{JsonSchema, JSON_SCHEMA_DRAFT};
pub use open_api::OpenApi;
pub use traits::SchemaFormat;

use serde_json::{Map, Value};

/// Unwraps a `json!` object literal into its entry map.
pub(crate) fn entries(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}
