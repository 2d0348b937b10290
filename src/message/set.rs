//! Aggregation of compiled messages into the final nested mapping.

use std::fmt::{self, Display};

use indexmap::IndexSet;
use serde_json::{Map, Value};

use crate::message::{deep_merge, CompiledMessage};
use crate::path::Path;

/// Predicates whose hints are redundant noise next to the presence and
/// type failures already reported for a key.
///
/// A hint from this list survives only where a failure exists at exactly
/// the same path (a missing key keeps its full expected shape visible);
/// everywhere else it is suppressed. Hints about predicates beyond these
/// basic checks always survive.
pub const HINT_EXCLUSION: &[&str] = &[
    "key?",
    "filled?",
    "nil?",
    "none?",
    "str?",
    "int?",
    "float?",
    "decimal?",
    "bool?",
    "date?",
    "date_time?",
    "time?",
    "hash?",
    "array?",
];

/// Which messages [`MessageSet::to_value`] renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    /// Failures only.
    Failures,
    /// Failures merged with surviving hints (the default).
    #[default]
    Messages,
}

/// An ordered, deduplicated collection of compiled messages partitioned
/// into failures and hints.
///
/// A `MessageSet` is constructed once per validation call from the
/// compiler's output, consumed immediately through [`MessageSet::to_value`],
/// and then discarded; it is not reused across calls.
///
/// # Example
///
/// ```rust
/// use debrief::{CompiledMessage, Message, MessageKind, MessageSet, Path};
/// use serde_json::json;
///
/// let set = MessageSet::new(vec![CompiledMessage::Single(Message::new(
///     Path::from_key("age"),
///     "int?",
///     vec![],
///     "must be an integer",
///     MessageKind::Failure,
/// ))]);
///
/// assert_eq!(set.to_value(), json!({"age": ["must be an integer"]}));
/// ```
#[derive(Debug, Clone)]
pub struct MessageSet {
    failures: Vec<CompiledMessage>,
    hints: Vec<CompiledMessage>,
    mode: DisplayMode,
}

impl MessageSet {
    /// Builds a set from the full ordered compiler output, deduplicating
    /// and partitioning into failures and hints.
    pub fn new(messages: Vec<CompiledMessage>) -> Self {
        let mut seen_plain: IndexSet<(Path, String)> = IndexSet::new();
        let mut seen_composite: Vec<Value> = Vec::new();
        let mut failures = Vec::new();
        let mut hints = Vec::new();

        for message in messages {
            let duplicate = match &message {
                CompiledMessage::Single(plain) => {
                    !seen_plain.insert((plain.path.clone(), plain.text.clone()))
                }
                CompiledMessage::Or(multi) => {
                    let rendered = multi.to_nested();
                    if seen_composite.contains(&rendered) {
                        true
                    } else {
                        seen_composite.push(rendered);
                        false
                    }
                }
            };
            if duplicate {
                continue;
            }

            if message.is_hint() {
                hints.push(message);
            } else {
                failures.push(message);
            }
        }

        Self {
            failures,
            hints,
            mode: DisplayMode::Messages,
        }
    }

    /// Restricts rendering to failures alone.
    pub fn failures_only(mut self) -> Self {
        self.mode = DisplayMode::Failures;
        self
    }

    /// The failure messages, in compile order.
    pub fn failures(&self) -> &[CompiledMessage] {
        &self.failures
    }

    /// The hint messages, in compile order.
    pub fn hints(&self) -> &[CompiledMessage] {
        &self.hints
    }

    /// Returns the number of messages in this set.
    pub fn len(&self) -> usize {
        self.failures.len() + self.hints.len()
    }

    /// Returns true if the set holds no messages at all.
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty() && self.hints.is_empty()
    }

    /// Returns an iterator over all messages, failures first.
    pub fn iter(&self) -> impl Iterator<Item = &CompiledMessage> {
        self.failures.iter().chain(self.hints.iter())
    }

    /// Renders the final nested mapping.
    ///
    /// Failures render first so that at any shared path the evaluated
    /// failure text precedes hint texts. In the default mode, hints that
    /// survive suppression are merged in after; in failures mode they are
    /// omitted entirely.
    pub fn to_value(&self) -> Value {
        let mut out = Value::Object(Map::new());

        for failure in &self.failures {
            deep_merge(&mut out, failure.to_nested());
        }

        if self.mode == DisplayMode::Messages {
            let failure_paths: IndexSet<Path> = self
                .failures
                .iter()
                .flat_map(CompiledMessage::paths)
                .collect();

            for hint in &self.hints {
                if suppressed(hint, &failure_paths) {
                    continue;
                }
                deep_merge(&mut out, hint.to_nested());
            }
        }

        out
    }
}

impl Display for MessageSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Validation produced {} message(s):", self.len())?;
        for (i, message) in self.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, message)?;
        }
        Ok(())
    }
}

impl IntoIterator for MessageSet {
    type Item = CompiledMessage;
    type IntoIter = std::vec::IntoIter<CompiledMessage>;

    fn into_iter(mut self) -> Self::IntoIter {
        let mut all = std::mem::take(&mut self.failures);
        all.append(&mut self.hints);
        all.into_iter()
    }
}

/// An excluded-predicate hint is suppressed unless a failure exists at
/// exactly its path.
fn suppressed(hint: &CompiledMessage, failure_paths: &IndexSet<Path>) -> bool {
    match hint {
        CompiledMessage::Single(plain) => {
            HINT_EXCLUSION.contains(&plain.predicate.as_str())
                && !failure_paths.contains(&plain.path)
        }
        CompiledMessage::Or(_) => false,
    }
}
