//! The tagged tree both compiler passes walk.
//!
//! A rule engine reports the outcome of one validation call as a tree of
//! [`Node`] values; schema declarations are expressed as the same tree
//! without the per-call wrappers. Both the message compiler and the
//! format compilers dispatch on the node variant with exhaustive `match`,
//! so an unhandled node kind is a compile-time concern, not a runtime one.

use serde_json::Value;

use crate::path::Path;

/// A named predicate argument.
///
/// Arguments are ordered; by convention the first argument is the subject
/// value under test when the tree comes from a rule engine result.
pub type PredicateArg = (String, Value);

/// One node of a tagged result or declaration tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Ordered group; all children apply.
    Set(Vec<Node>),
    /// Logical conjunction of two subtrees.
    And(Box<Node>, Box<Node>),
    /// Logical disjunction of two subtrees.
    Or(Box<Node>, Box<Node>),
    /// Logical negation of a subtree.
    Not(Box<Node>),
    /// `left` implies `right`.
    Implication(Box<Node>, Box<Node>),
    /// Scopes `child` under one or more additional path segments.
    Key { path: Path, child: Box<Node> },
    /// Leaf: a named check with ordered `(name, value)` arguments.
    Predicate { name: String, args: Vec<PredicateArg> },
    /// The child trees of an enumerable input, one per reported element.
    ///
    /// Result trees re-key elements through `Key` children whose path is a
    /// single `Index` segment; declaration trees carry the member rule
    /// directly. An empty `Each` reports no per-element detail.
    Each(Vec<Node>),
    /// Records the concrete input value the subtree was evaluated against.
    Input { value: Value, child: Box<Node> },
    /// Marks the subtree as a violated constraint of the named rule.
    Failure { rule: String, child: Box<Node> },
    /// Marks the subtree as supplementary information about a constraint
    /// that was never reached.
    Hint(Box<Node>),
}

impl Node {
    /// Creates an ordered group node.
    pub fn set(children: impl IntoIterator<Item = Node>) -> Self {
        Node::Set(children.into_iter().collect())
    }

    /// Creates a conjunction node.
    pub fn and(left: Node, right: Node) -> Self {
        Node::And(Box::new(left), Box::new(right))
    }

    /// Creates a disjunction node.
    pub fn or(left: Node, right: Node) -> Self {
        Node::Or(Box::new(left), Box::new(right))
    }

    /// Creates a negation node.
    pub fn not(child: Node) -> Self {
        Node::Not(Box::new(child))
    }

    /// Creates an implication node.
    pub fn implication(left: Node, right: Node) -> Self {
        Node::Implication(Box::new(left), Box::new(right))
    }

    /// Scopes `child` under a single key segment.
    pub fn key(name: impl Into<String>, child: Node) -> Self {
        Node::Key {
            path: Path::from_key(name),
            child: Box::new(child),
        }
    }

    /// Scopes `child` under a single element index.
    pub fn index(idx: usize, child: Node) -> Self {
        Node::Key {
            path: Path::from_index(idx),
            child: Box::new(child),
        }
    }

    /// Scopes `child` under a full sub-path (renamed or nested access).
    pub fn key_path(path: Path, child: Node) -> Self {
        Node::Key {
            path,
            child: Box::new(child),
        }
    }

    /// Creates a predicate leaf.
    pub fn predicate<N, A, I>(name: N, args: I) -> Self
    where
        N: Into<String>,
        A: Into<String>,
        I: IntoIterator<Item = (A, Value)>,
    {
        Node::Predicate {
            name: name.into(),
            args: args
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        }
    }

    /// Creates a predicate leaf with no arguments, as declared-predicate
    /// trees carry for bare type checks.
    pub fn nullary(name: impl Into<String>) -> Self {
        Node::Predicate {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// Creates a per-element iteration node.
    pub fn each(children: impl IntoIterator<Item = Node>) -> Self {
        Node::Each(children.into_iter().collect())
    }

    /// Records the input value a subtree was evaluated against.
    pub fn input(value: Value, child: Node) -> Self {
        Node::Input {
            value,
            child: Box::new(child),
        }
    }

    /// Marks a subtree as a violated constraint of the named rule.
    pub fn failure(rule: impl Into<String>, child: Node) -> Self {
        Node::Failure {
            rule: rule.into(),
            child: Box::new(child),
        }
    }

    /// Marks a subtree as supplementary hint information.
    pub fn hint(child: Node) -> Self {
        Node::Hint(Box::new(child))
    }
}
