//! The format seam for schema compilation.

use serde_json::{Map, Value};

use crate::error::CompileError;

/// Backend customization hooks for a schema format.
///
/// [`crate::SchemaCompiler`] owns the tree walk; a `SchemaFormat`
/// supplies everything format-specific: the predicate-to-fragment table,
/// how "filled" is expressed per base type, how OR branches are grouped,
/// the document shell, and the metadata used in diagnostics.
pub trait SchemaFormat {
    /// Human name of the format, used in error messages.
    fn name(&self) -> &'static str;

    /// The call to suggest when strict mode refuses a conversion.
    fn permissive_hint(&self) -> &'static str;

    /// Wraps the accumulated root body in the format's document shell.
    fn document_root(&self, body: Map<String, Value>) -> Value;

    /// Looks up the fragment for a predicate.
    ///
    /// `arg` is the first declaration argument, for fragments projected
    /// from it (bounds, enumerations, patterns). `None` means the format
    /// has no mapping for the predicate.
    fn fragment(&self, predicate: &str, arg: Option<&Value>) -> Option<Map<String, Value>>;

    /// How "filled" is expressed for an already-known base type.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::UnsupportedSchemaConversion`] when the
    /// format cannot express the combination and `strict` is set.
    fn filled_fragment(
        &self,
        type_hint: Option<&str>,
        strict: bool,
    ) -> Result<Map<String, Value>, CompileError>;

    /// Groups compiled OR branches into the format's alternative shape.
    fn merge_or(&self, branches: Vec<Value>) -> Map<String, Value>;

    /// Wraps a compiled child fragment in the format's negation shape.
    ///
    /// An empty map means the negation needs no representation (the
    /// format's defaults already express it).
    fn negate(&self, fragment: Value) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("not".to_string(), fragment);
        map
    }
}
