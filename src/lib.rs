//! # Debrief
//!
//! Compiles the tagged result tree of a validation call into the
//! representations callers consume: a nested mapping of human-readable
//! error and hint text addressed by path, and machine-readable schema
//! documents (JSON Schema draft-06, OpenAPI 3.0 fragments) from the same
//! tree shape at schema-definition time.
//!
//! ## Overview
//!
//! A rule engine reports what happened during validation as a tree of
//! logical combinators over predicate leaves. [`MessageCompiler`] walks
//! that tree, resolving each failed predicate to translated text through
//! a [`MessageStore`] and folding OR branches into composite messages;
//! [`MessageSet`] aggregates the result into the final nested mapping,
//! separating failures from hints. Independently, [`SchemaCompiler`]
//! walks a schema's *declared* predicate tree once and materializes a
//! static schema document for a pluggable [`SchemaFormat`] backend.
//!
//! ## Core Types
//!
//! - [`Path`]: a location in nested data (e.g., `users[0].email`)
//! - [`Node`]: the tagged tree both compiler passes walk
//! - [`Message`] / [`CompiledMessage`]: one compiled unit of feedback
//! - [`MessageSet`]: the final failures/hints mapping
//! - [`MessageStore`]: locale- and namespace-aware message templates
//! - [`SchemaCompiler`]: declared trees to JSON Schema / OpenAPI output
//!
//! ## Example
//!
//! ```rust
//! use debrief::{MessageCompiler, MessageSet, MessageStore, Node};
//! use serde_json::json;
//!
//! let store = MessageStore::with_defaults();
//! let compiler = MessageCompiler::new(&store);
//!
//! // age was "x": the type check failed, the bound was never reached.
//! let tree = Node::key(
//!     "age",
//!     Node::input(
//!         json!("x"),
//!         Node::and(
//!             Node::failure("age", Node::predicate("int?", [("input", json!("x"))])),
//!             Node::hint(Node::predicate(
//!                 "gt?",
//!                 [("num", json!(18)), ("input", json!("x"))],
//!             )),
//!         ),
//!     ),
//! );
//!
//! let messages = compiler.compile(&tree, "en").unwrap();
//! assert_eq!(
//!     MessageSet::new(messages).to_value(),
//!     json!({"age": ["must be an integer", "must be greater than 18"]})
//! );
//! ```

pub mod compiler;
pub mod error;
pub mod message;
pub mod node;
pub mod path;
pub mod schema;
pub mod store;

pub use compiler::MessageCompiler;
pub use error::CompileError;
pub use message::{
    CompiledMessage, DisplayMode, Message, MessageKind, MessageSet, MultiPath, HINT_EXCLUSION,
};
pub use node::{Node, PredicateArg};
pub use path::{Path, PathSegment};
pub use schema::{JsonSchema, OpenApi, SchemaCompiler, SchemaFormat, JSON_SCHEMA_DRAFT};
pub use store::MessageStore;
