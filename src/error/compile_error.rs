//! The compile-time error taxonomy.

use crate::path::Path;

/// Errors raised while compiling a result tree or a declared-predicate
/// tree.
///
/// All variants are deterministic for a given tree: they indicate a
/// configuration or programming error, never a transient fault, and are
/// not retried. Correctness of validation feedback is considered more
/// important than availability, so nothing degrades to partial output.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CompileError {
    /// No message template resolved for a predicate/path pair at any
    /// fallback level. Silently dropping the message would hide a real
    /// validation failure from the user.
    #[error("no message template for predicate '{predicate}' at path '{path}' in locale '{locale}'")]
    MissingTranslation {
        /// The predicate whose message could not be resolved.
        predicate: String,
        /// The path the message would have been attached to.
        path: Path,
        /// The locale the lookup ran against.
        locale: String,
    },

    /// The Or algebra received an operand that is neither a message, a
    /// non-empty message list, nor a multi-path composite.
    #[error("invalid or-combination operand: {found}")]
    InvalidOrOperand {
        /// Description of the offending value and its type.
        found: String,
    },

    /// A format compiler has no mapping for a predicate/type pair and is
    /// running in strict mode. A deliberate refusal: emitting a schema
    /// that silently misdescribes the declaration is worse than failing.
    #[error(
        "cannot express predicate '{predicate}' (inferred type: {}) in {format}; \
         use {permissive_hint} to allow a lossy approximation",
        .type_hint.as_deref().unwrap_or("unknown")
    )]
    UnsupportedSchemaConversion {
        /// The predicate with no fragment mapping.
        predicate: String,
        /// The base type inferred for the target property, if any.
        type_hint: Option<String>,
        /// Human name of the format backend.
        format: &'static str,
        /// The call that enables permissive mode for this backend.
        permissive_hint: &'static str,
    },
}
