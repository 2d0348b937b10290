//! The format-agnostic schema compiler walk.

use indexmap::{IndexMap, IndexSet};
use serde_json::{Map, Value};

use crate::error::CompileError;
use crate::node::{Node, PredicateArg};
use crate::path::PathSegment;
use crate::schema::json_schema::JsonSchema;
use crate::schema::open_api::OpenApi;
use crate::schema::traits::SchemaFormat;

/// One property target accumulated during the walk.
///
/// `keys` holds the property's direct schema keywords, `properties` its
/// child properties in declaration order, and `required` the child keys
/// marked required so far.
#[derive(Default)]
struct Target {
    keys: Map<String, Value>,
    properties: IndexMap<String, Target>,
    required: IndexSet<String>,
}

/// Compiles a declared-predicate tree into a schema document.
///
/// The compiler runs once at schema-definition time; the resulting value
/// is immutable and safely shared afterwards. Strict by default: a
/// predicate/type combination the format cannot express fails with
/// [`CompileError::UnsupportedSchemaConversion`] rather than emitting an
/// incorrect schema. [`SchemaCompiler::permissive`] opts into lossy
/// approximations and skips unknown predicates.
///
/// # Example
///
/// ```rust
/// use debrief::{Node, SchemaCompiler};
/// use serde_json::json;
///
/// let tree = Node::and(
///     Node::predicate("key?", [("name", json!("email"))]),
///     Node::key(
///         "email",
///         Node::and(Node::nullary("str?"), Node::nullary("filled?")),
///     ),
/// );
///
/// let schema = SchemaCompiler::json_schema().compile(&tree).unwrap();
/// assert_eq!(schema["properties"]["email"]["minLength"], json!(1));
/// assert_eq!(schema["required"], json!(["email"]));
/// ```
pub struct SchemaCompiler<F: SchemaFormat> {
    format: F,
    strict: bool,
}

impl SchemaCompiler<JsonSchema> {
    /// A strict JSON Schema (draft-06) compiler.
    pub fn json_schema() -> Self {
        Self::new(JsonSchema)
    }
}

impl SchemaCompiler<OpenApi> {
    /// A strict OpenAPI 3.0 property-fragment compiler.
    pub fn open_api() -> Self {
        Self::new(OpenApi)
    }
}

impl<F: SchemaFormat> SchemaCompiler<F> {
    /// Creates a strict compiler for the given format.
    pub fn new(format: F) -> Self {
        Self {
            format,
            strict: true,
        }
    }

    /// Allows lossy approximations where the format has no exact
    /// expression, and skips predicates with no mapping at all.
    pub fn permissive(mut self) -> Self {
        self.strict = false;
        self
    }

    /// Compiles a declared-predicate tree into the format's document.
    pub fn compile(&self, tree: &Node) -> Result<Value, CompileError> {
        let mut root = Target::default();
        self.visit(tree, &mut root, true)?;
        Ok(self.format.document_root(self.finish(root)))
    }

    fn visit(&self, node: &Node, target: &mut Target, requirable: bool) -> Result<(), CompileError> {
        match node {
            Node::Set(children) | Node::Each(children) if children.is_empty() => Ok(()),
            Node::Set(children) => {
                for child in children {
                    self.visit(child, target, requirable)?;
                }
                Ok(())
            }
            Node::And(left, right) => {
                self.visit(left, target, requirable)?;
                self.visit(right, target, requirable)
            }
            Node::Key { path, child } => {
                let property = descend(target, path.segments());
                self.visit(child, property, requirable)
            }
            Node::Predicate { name, args } => self.predicate(name, args, target, requirable),
            Node::Or(left, right) => {
                let branches = vec![self.branch(left)?, self.branch(right)?];
                for (key, value) in self.format.merge_or(branches) {
                    target.keys.insert(key, value);
                }
                Ok(())
            }
            Node::Each(children) => {
                let mut items = Target::default();
                for child in children {
                    self.visit(child, &mut items, true)?;
                }
                target
                    .keys
                    .insert("items".to_string(), Value::Object(self.finish(items)));
                Ok(())
            }
            Node::Implication(left, right) => {
                // An implied subtree describes an optional key: its shape
                // lands in `properties` without a `required` entry.
                self.visit(left, target, false)?;
                self.visit(right, target, false)
            }
            Node::Not(child) => {
                let fragment = self.branch(child)?;
                for (key, value) in self.format.negate(fragment) {
                    target.keys.insert(key, value);
                }
                Ok(())
            }
            // Per-call wrappers carry no declaration information; walk
            // through them so adapters may feed either tree shape.
            Node::Input { child, .. } | Node::Failure { child, .. } | Node::Hint(child) => {
                self.visit(child, target, requirable)
            }
        }
    }

    /// Compiles a subtree into a standalone fragment value.
    fn branch(&self, node: &Node) -> Result<Value, CompileError> {
        let mut target = Target::default();
        self.visit(node, &mut target, true)?;
        Ok(Value::Object(self.finish(target)))
    }

    fn predicate(
        &self,
        name: &str,
        args: &[PredicateArg],
        target: &mut Target,
        requirable: bool,
    ) -> Result<(), CompileError> {
        match name {
            "key?" => {
                if requirable {
                    if let Some(key) = key_name(args) {
                        target.required.insert(key.to_string());
                    }
                }
                Ok(())
            }
            "filled?" => {
                let type_hint = target
                    .keys
                    .get("type")
                    .and_then(Value::as_str)
                    .map(str::to_string);
                let fragment = self
                    .format
                    .filled_fragment(type_hint.as_deref(), self.strict)?;
                for (key, value) in fragment {
                    target.keys.insert(key, value);
                }
                Ok(())
            }
            _ => match self.format.fragment(name, projection_arg(args)) {
                Some(fragment) => {
                    for (key, value) in fragment {
                        target.keys.insert(key, value);
                    }
                    Ok(())
                }
                None if self.strict => Err(CompileError::UnsupportedSchemaConversion {
                    predicate: name.to_string(),
                    type_hint: target
                        .keys
                        .get("type")
                        .and_then(Value::as_str)
                        .map(str::to_string),
                    format: self.format.name(),
                    permissive_hint: self.format.permissive_hint(),
                }),
                None => Ok(()),
            },
        }
    }

    /// Flattens an accumulated target into its final map form.
    fn finish(&self, target: Target) -> Map<String, Value> {
        let mut body = target.keys;

        if !target.properties.is_empty() {
            let mut properties = Map::new();
            for (name, child) in target.properties {
                properties.insert(name, Value::Object(self.finish(child)));
            }
            body.insert("properties".to_string(), Value::Object(properties));
        }

        if !target.required.is_empty() {
            body.insert(
                "required".to_string(),
                Value::Array(
                    target
                        .required
                        .into_iter()
                        .map(Value::String)
                        .collect(),
                ),
            );
        }

        body
    }
}

/// Walks (creating as needed) the property targets for a key path.
fn descend<'t, 's>(
    mut target: &'t mut Target,
    segments: impl Iterator<Item = &'s PathSegment>,
) -> &'t mut Target {
    for segment in segments {
        target = target.properties.entry(segment.as_map_key()).or_default();
    }
    target
}

/// The key name argument of a `key?` predicate.
fn key_name(args: &[PredicateArg]) -> Option<&str> {
    args.iter()
        .find(|(name, _)| name == "name")
        .or_else(|| args.first())
        .and_then(|(_, value)| value.as_str())
}

/// The first declaration argument, skipping the subject-value slots.
fn projection_arg(args: &[PredicateArg]) -> Option<&Value> {
    args.iter()
        .find(|(name, _)| name != "input" && name != "value")
        .map(|(_, value)| value)
}
