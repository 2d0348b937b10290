//! Compiled feedback messages.
//!
//! This module provides [`Message`] for a single compiled unit of
//! feedback, [`CompiledMessage`] for the plain-or-composite union the
//! message compiler emits, and the OR algebra and aggregation types built
//! on top of them.

use std::fmt::{self, Display};

use serde_json::{json, Value};

use crate::node::PredicateArg;
use crate::path::Path;

mod or;
mod set;

pub use or::MultiPath;
pub(crate) use or::combine;
pub use set::{DisplayMode, MessageSet, HINT_EXCLUSION};

/// Whether a message reports a violated constraint or supplementary
/// information about a constraint that was never reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// The constraint was evaluated and did not hold.
    Failure,
    /// The constraint was never reached because an earlier one failed.
    Hint,
}

/// One compiled unit of feedback.
///
/// A `Message` ties the rendered text to the [`Path`] it is attached to,
/// along with the predicate and arguments it originated from. Messages
/// are immutable once constructed: the text is rendered exactly once from
/// the translation lookup.
///
/// Two messages are duplicates iff their `path` and `text` are equal.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    /// The path the message is attached to.
    pub path: Path,
    /// The predicate that produced the message.
    pub predicate: String,
    /// The originating predicate arguments.
    pub args: Vec<PredicateArg>,
    /// The rendered, locale-specific text.
    pub text: String,
    /// Failure or hint classification.
    pub kind: MessageKind,
}

impl Message {
    /// Creates a new message.
    pub fn new(
        path: Path,
        predicate: impl Into<String>,
        args: Vec<PredicateArg>,
        text: impl Into<String>,
        kind: MessageKind,
    ) -> Self {
        Self {
            path,
            predicate: predicate.into(),
            args,
            text: text.into(),
            kind,
        }
    }

    /// Returns true if this message is a hint.
    pub fn is_hint(&self) -> bool {
        self.kind == MessageKind::Hint
    }

    /// The identity used for duplicate detection.
    pub fn duplicate_key(&self) -> (&Path, &str) {
        (&self.path, &self.text)
    }

    /// Wraps the message text in the nested mapping its path addresses.
    pub fn to_nested(&self) -> Value {
        self.path.to_nested(json!([self.text]))
    }
}

impl Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_root() {
            write!(f, "{}", self.text)
        } else {
            write!(f, "{}: {}", self.path, self.text)
        }
    }
}

// Message is Send + Sync since all fields are owned types. These
// assertions keep that true if the types change.
const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<Message>();
    assert_sync::<Message>();
};

/// A compiled message: either a plain [`Message`] or a multi-path OR
/// composite.
#[derive(Debug, Clone, PartialEq)]
pub enum CompiledMessage {
    /// A plain message at a single path.
    Single(Message),
    /// A composite OR result spanning more than one distinct path.
    Or(MultiPath),
}

impl CompiledMessage {
    /// Returns true if every message in this entry is a hint.
    pub fn is_hint(&self) -> bool {
        match self {
            CompiledMessage::Single(message) => message.is_hint(),
            CompiledMessage::Or(multi) => multi.is_hint(),
        }
    }

    /// Returns every path addressed by this entry.
    pub fn paths(&self) -> Vec<Path> {
        match self {
            CompiledMessage::Single(message) => vec![message.path.clone()],
            CompiledMessage::Or(multi) => multi.paths(),
        }
    }

    /// Renders this entry as a nested mapping.
    pub fn to_nested(&self) -> Value {
        match self {
            CompiledMessage::Single(message) => message.to_nested(),
            CompiledMessage::Or(multi) => multi.to_nested(),
        }
    }
}

impl Display for CompiledMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompiledMessage::Single(message) => message.fmt(f),
            CompiledMessage::Or(multi) => multi.fmt(f),
        }
    }
}

/// Deep-merges `incoming` into `target`.
///
/// Objects merge recursively, arrays append entries not already present
/// (preserving first-seen order), and anything else is replaced.
pub(crate) fn deep_merge(target: &mut Value, incoming: Value) {
    match (target, incoming) {
        (Value::Object(target_map), Value::Object(incoming_map)) => {
            for (key, value) in incoming_map {
                match target_map.get_mut(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        target_map.insert(key, value);
                    }
                }
            }
        }
        (Value::Array(target_items), Value::Array(incoming_items)) => {
            for item in incoming_items {
                if !target_items.contains(&item) {
                    target_items.push(item);
                }
            }
        }
        (target_slot, incoming_value) => *target_slot = incoming_value,
    }
}
