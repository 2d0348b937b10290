//! The message compiler: result trees in, compiled messages out.
//!
//! [`MessageCompiler`] walks a rule-engine result tree and produces the
//! ordered message list a [`crate::MessageSet`] aggregates. The walk is
//! synchronous and call-scoped: one tree compiles to completion before
//! the caller observes anything, and every error aborts the whole call.

use serde_json::Value;

use crate::error::CompileError;
use crate::message::{combine, CompiledMessage, Message, MessageKind};
use crate::node::{Node, PredicateArg};
use crate::path::Path;
use crate::store::MessageStore;

/// Walk state threaded through the recursion.
///
/// Contexts are cheap derived copies: each wrapper node clones the
/// context, adjusts one field, and recurses, so sibling subtrees never
/// observe each other's state.
#[derive(Clone)]
struct Context<'t> {
    path: Path,
    kind: MessageKind,
    negated: bool,
    rule: Option<String>,
    input: Option<&'t Value>,
}

impl Context<'_> {
    fn root() -> Self {
        Self {
            path: Path::root(),
            kind: MessageKind::Failure,
            negated: false,
            rule: None,
            input: None,
        }
    }
}

/// Compiles rule-engine result trees into ordered message lists.
///
/// # Example
///
/// ```rust
/// use debrief::{MessageCompiler, MessageSet, MessageStore, Node};
/// use serde_json::json;
///
/// let store = MessageStore::with_defaults();
/// let compiler = MessageCompiler::new(&store);
///
/// let tree = Node::key("age", Node::predicate("int?", [("input", json!("x"))]));
/// let messages = compiler.compile(&tree, "en").unwrap();
///
/// assert_eq!(
///     MessageSet::new(messages).to_value(),
///     json!({"age": ["must be an integer"]})
/// );
/// ```
pub struct MessageCompiler<'a> {
    store: &'a MessageStore,
    hints: bool,
}

impl<'a> MessageCompiler<'a> {
    /// Creates a compiler reading templates from `store`, with hint
    /// compilation enabled.
    pub fn new(store: &'a MessageStore) -> Self {
        Self { store, hints: true }
    }

    /// Disables hint compilation: hint-wrapped subtrees are skipped
    /// entirely, producing no messages and costing no lookups.
    pub fn without_hints(mut self) -> Self {
        self.hints = false;
        self
    }

    /// Compiles a result tree into an ordered message list.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::MissingTranslation`] when a predicate has
    /// no resolvable template at any fallback level, and
    /// [`CompileError::InvalidOrOperand`] when OR resolution receives a
    /// malformed operand.
    pub fn compile(&self, tree: &Node, locale: &str) -> Result<Vec<CompiledMessage>, CompileError> {
        self.visit(tree, &Context::root(), locale)
    }

    fn visit(
        &self,
        node: &Node,
        ctx: &Context<'_>,
        locale: &str,
    ) -> Result<Vec<CompiledMessage>, CompileError> {
        match node {
            Node::Set(children) | Node::Each(children) => {
                let mut out = Vec::new();
                for child in children {
                    out.extend(self.visit(child, ctx, locale)?);
                }
                Ok(out)
            }
            Node::And(left, right) => {
                let mut out = self.visit(left, ctx, locale)?;
                out.extend(self.visit(right, ctx, locale)?);
                Ok(out)
            }
            Node::Or(left, right) => {
                let left = self.visit(left, ctx, locale)?;
                let right = self.visit(right, ctx, locale)?;
                combine(left, right, &self.store.connective(locale))
            }
            Node::Not(child) => {
                let mut ctx = ctx.clone();
                ctx.negated = !ctx.negated;
                self.visit(child, &ctx, locale)
            }
            Node::Implication(left, right) => {
                // "if A then B": B's messages are irrelevant unless the
                // premise itself produced messages.
                let premise = self.visit(left, ctx, locale)?;
                if premise.is_empty() {
                    Ok(Vec::new())
                } else {
                    self.visit(right, ctx, locale)
                }
            }
            Node::Key { path, child } => {
                let mut ctx = ctx.clone();
                ctx.path = ctx.path.join(path);
                self.visit(child, &ctx, locale)
            }
            Node::Input { value, child } => {
                let mut ctx = ctx.clone();
                ctx.input = Some(value);
                self.visit(child, &ctx, locale)
            }
            Node::Failure { rule, child } => {
                let mut ctx = ctx.clone();
                ctx.kind = MessageKind::Failure;
                ctx.rule = Some(rule.clone());
                self.visit(child, &ctx, locale)
            }
            Node::Hint(child) => {
                if !self.hints {
                    return Ok(Vec::new());
                }
                let mut ctx = ctx.clone();
                ctx.kind = MessageKind::Hint;
                self.visit(child, &ctx, locale)
            }
            Node::Predicate { name, args } => self.predicate(name, args, ctx, locale),
        }
    }

    fn predicate(
        &self,
        name: &str,
        args: &[PredicateArg],
        ctx: &Context<'_>,
        locale: &str,
    ) -> Result<Vec<CompiledMessage>, CompileError> {
        // A negated predicate resolves only against its `not.` template;
        // a positive text shown for a negation would be misleading.
        let key = if ctx.negated {
            format!("not.{}", name)
        } else {
            name.to_string()
        };

        let template = self
            .store
            .lookup(locale, ctx.rule.as_deref(), &ctx.path, &key)
            .ok_or_else(|| CompileError::MissingTranslation {
                predicate: key.clone(),
                path: ctx.path.clone(),
                locale: locale.to_string(),
            })?;

        let text = self.store.render(&template, args, ctx.input);

        Ok(vec![CompiledMessage::Single(Message::new(
            ctx.path.clone(),
            name,
            args.to_vec(),
            text,
            ctx.kind,
        ))])
    }
}
