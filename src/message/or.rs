//! The OR algebra for compiled messages.
//!
//! Two OR branches each compile to a message list; this module resolves
//! the pair into one combined result. Three composition outcomes exist:
//! - a single-path join when every message on both sides describes the
//!   same location (one message whose text joins both sides with the
//!   translated connective);
//! - the right side alone when a lone message meets a compound failure
//!   (the compound side enumerated detail the other branch lacks);
//! - a [`MultiPath`] rooted at the common ancestor path otherwise, with
//!   repeated OR chains kept flat rather than right-nested.

use std::fmt::{self, Display};

use serde_json::{json, Map, Value};
use stillwater::prelude::*;

use crate::error::CompileError;
use crate::message::{deep_merge, CompiledMessage, Message, MessageKind};
use crate::path::Path;

/// A composite OR result spanning more than one distinct path.
///
/// `root` is the longest common prefix of every contained message path;
/// branches keep their messages at absolute paths and rendering strips
/// the root prefix. A nested composite kept inside a branch renders as
/// its own `{"or": [...]}` object.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiPath {
    root: Path,
    branches: Vec<NonEmptyVec<CompiledMessage>>,
}

impl MultiPath {
    /// Builds a composite from explicit branches.
    ///
    /// Intended for rule-engine adapters that assemble composites
    /// directly; the message compiler goes through the OR algebra
    /// instead. Fewer than two branches, or any empty branch, is a
    /// contract violation.
    pub fn new(branches: Vec<Vec<CompiledMessage>>) -> Result<Self, CompileError> {
        if branches.len() < 2 {
            return Err(CompileError::InvalidOrOperand {
                found: format!(
                    "{} or-branch(es) of type Vec<CompiledMessage> (a multi-path composite needs at least two)",
                    branches.len()
                ),
            });
        }
        let branches = branches
            .into_iter()
            .map(non_empty)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::assemble(branches))
    }

    /// Assembles a composite, computing the root from the branch paths.
    fn assemble(branches: Vec<NonEmptyVec<CompiledMessage>>) -> Self {
        let root = common_root(
            branches
                .iter()
                .flat_map(|branch| branch.iter())
                .flat_map(CompiledMessage::paths),
        );
        Self { root, branches }
    }

    /// The common ancestor path of every contained message.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns true if every contained message is a hint.
    pub fn is_hint(&self) -> bool {
        self.branches
            .iter()
            .all(|branch| branch.iter().all(CompiledMessage::is_hint))
    }

    /// Returns every path addressed by this composite.
    pub fn paths(&self) -> Vec<Path> {
        self.branches
            .iter()
            .flat_map(|branch| branch.iter())
            .flat_map(CompiledMessage::paths)
            .collect()
    }

    /// Renders the composite as a nested mapping: the root path wrapping
    /// `{"or": [branch, branch, ...]}`.
    pub fn to_nested(&self) -> Value {
        self.value_below(0)
    }

    /// Renders the composite with the first `base` path segments already
    /// consumed by an enclosing mapping.
    fn value_below(&self, base: usize) -> Value {
        let branch_base = self.root.len();
        let rendered: Vec<Value> = self
            .branches
            .iter()
            .map(|branch| render_branch(branch, branch_base))
            .collect();

        let mut or_map = Map::new();
        or_map.insert("or".to_string(), Value::Array(rendered));
        self.root.strip_prefix(base).to_nested(Value::Object(or_map))
    }
}

impl Display for MultiPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            serde_json::to_string(&self.to_nested()).unwrap_or_default()
        )
    }
}

/// Merges one branch's messages into a single nested mapping, relative
/// to the composite root.
fn render_branch(branch: &NonEmptyVec<CompiledMessage>, base: usize) -> Value {
    let mut out = Value::Object(Map::new());
    for item in branch.iter() {
        let value = match item {
            CompiledMessage::Single(message) => message
                .path
                .strip_prefix(base)
                .to_nested(json!([message.text])),
            CompiledMessage::Or(multi) => multi.value_below(base),
        };
        deep_merge(&mut out, value);
    }
    out
}

/// Resolves the message lists of two OR branches into one combined
/// result.
///
/// An empty side short-circuits to the other side. The tie-break rules,
/// in order: single-path join; lone message versus compound failure keeps
/// the compound right side (pinned compatibility behavior); any composite
/// operand or two compound sides build a [`MultiPath`]; a compound left
/// side versus a lone right message keeps the larger left side.
pub(crate) fn combine(
    left: Vec<CompiledMessage>,
    right: Vec<CompiledMessage>,
    connective: &str,
) -> Result<Vec<CompiledMessage>, CompileError> {
    if left.is_empty() {
        return Ok(right);
    }
    if right.is_empty() {
        return Ok(left);
    }

    if let Some(joined) = join_single_path(&left, &right, connective) {
        return Ok(vec![joined]);
    }

    match (shape(&left), shape(&right)) {
        (Shape::Single, Shape::Array) => Ok(right),
        (Shape::Array, Shape::Single) => Ok(left),
        _ => Ok(vec![multi_path(left, right)?]),
    }
}

/// Operand shapes the tie-break rules distinguish.
enum Shape {
    /// Exactly one plain message.
    Single,
    /// Exactly one OR composite.
    Multi,
    /// Two or more entries (a compound failure).
    Array,
}

fn shape(side: &[CompiledMessage]) -> Shape {
    match side {
        [CompiledMessage::Single(_)] => Shape::Single,
        [CompiledMessage::Or(_)] => Shape::Multi,
        _ => Shape::Array,
    }
}

/// Joins both sides into one message when every message shares one path.
fn join_single_path(
    left: &[CompiledMessage],
    right: &[CompiledMessage],
    connective: &str,
) -> Option<CompiledMessage> {
    let plains: Vec<&Message> = left
        .iter()
        .chain(right.iter())
        .map(|item| match item {
            CompiledMessage::Single(message) => Some(message),
            CompiledMessage::Or(_) => None,
        })
        .collect::<Option<Vec<_>>>()?;

    let first = plains.first()?;
    if !plains.iter().all(|message| message.path == first.path) {
        return None;
    }

    let text = plains
        .iter()
        .map(|message| message.text.as_str())
        .collect::<Vec<_>>()
        .join(&format!(" {} ", connective));
    let kind = if plains.iter().all(|message| message.is_hint()) {
        MessageKind::Hint
    } else {
        MessageKind::Failure
    };

    Some(CompiledMessage::Single(Message::new(
        first.path.clone(),
        first.predicate.clone(),
        first.args.clone(),
        text,
        kind,
    )))
}

/// Builds a [`MultiPath`] from two operands, splicing a composite operand
/// whose root matches the combined root so repeated OR chains stay flat.
fn multi_path(
    left: Vec<CompiledMessage>,
    right: Vec<CompiledMessage>,
) -> Result<CompiledMessage, CompileError> {
    let root = common_root(
        left.iter()
            .chain(right.iter())
            .flat_map(CompiledMessage::paths),
    );

    let mut branches = Vec::new();
    push_branch(&mut branches, left, &root)?;
    push_branch(&mut branches, right, &root)?;

    Ok(CompiledMessage::Or(MultiPath::assemble(branches)))
}

fn push_branch(
    branches: &mut Vec<NonEmptyVec<CompiledMessage>>,
    side: Vec<CompiledMessage>,
    root: &Path,
) -> Result<(), CompileError> {
    if side.len() == 1 {
        if let CompiledMessage::Or(multi) = &side[0] {
            if multi.root() == root {
                branches.extend(multi.branches.iter().cloned());
                return Ok(());
            }
        }
    }
    branches.push(non_empty(side)?);
    Ok(())
}

/// Longest common prefix of every path in the iterator.
fn common_root(paths: impl IntoIterator<Item = Path>) -> Path {
    let mut paths = paths.into_iter();
    let first = match paths.next() {
        Some(path) => path,
        None => return Path::root(),
    };
    paths.fold(first, |acc, path| acc.intersect(&path))
}

fn non_empty(items: Vec<CompiledMessage>) -> Result<NonEmptyVec<CompiledMessage>, CompileError> {
    if items.is_empty() {
        return Err(CompileError::InvalidOrOperand {
            found: "empty Vec<CompiledMessage> (expected a message, a non-empty message list, \
                    or a multi-path composite)"
                .to_string(),
        });
    }
    Ok(NonEmptyVec::from_vec(items).expect("checked non-empty"))
}
