//! Message template storage and rendering.
//!
//! This module provides the [`MessageStore`] type that holds translated
//! message templates per locale and resolves the template for a
//! predicate/path pair through a fallback chain. The store is populated
//! at bootstrap and read concurrently afterwards; mutation goes through
//! explicit [`MessageStore::merge`] / [`MessageStore::replace`] calls
//! that are serialized by the internal lock.

use indexmap::IndexMap;
use parking_lot::RwLock;
use regex::{Captures, Regex};
use serde_json::Value;
use std::sync::Arc;

use crate::node::PredicateArg;
use crate::path::{Path, PathSegment};

/// Type alias for the per-locale template catalogs.
type Catalogs = Arc<RwLock<IndexMap<String, IndexMap<String, String>>>>;

/// The built-in English catalog.
///
/// Keys are dot-joined lookup keys; templates may interpolate predicate
/// arguments with `%{name}` tokens.
const EN_MESSAGES: &[(&str, &str)] = &[
    ("or", "or"),
    ("key?", "is missing"),
    ("filled?", "must be filled"),
    ("empty?", "must be empty"),
    ("nil?", "cannot be defined"),
    ("none?", "cannot be defined"),
    ("str?", "must be a string"),
    ("int?", "must be an integer"),
    ("float?", "must be a float"),
    ("decimal?", "must be a decimal"),
    ("bool?", "must be boolean"),
    ("hash?", "must be a hash"),
    ("array?", "must be an array"),
    ("date?", "must be a date"),
    ("date_time?", "must be a date time"),
    ("time?", "must be a time"),
    ("gt?", "must be greater than %{num}"),
    ("gteq?", "must be greater than or equal to %{num}"),
    ("lt?", "must be less than %{num}"),
    ("lteq?", "must be less than or equal to %{num}"),
    ("eql?", "must be equal to %{left}"),
    ("min_size?", "size cannot be less than %{num}"),
    ("max_size?", "size cannot be greater than %{num}"),
    ("size?", "size must be %{num}"),
    ("format?", "is in invalid format"),
    ("included_in?", "must be one of: %{list}"),
    ("excluded_from?", "must not be one of: %{list}"),
    ("odd?", "must be odd"),
    ("even?", "must be even"),
    ("true?", "must be true"),
    ("false?", "must be false"),
    ("not.eql?", "must not be equal to %{left}"),
    ("not.included_in?", "must not be one of: %{list}"),
    ("not.empty?", "cannot be empty"),
    ("not.filled?", "cannot be defined"),
    ("not.nil?", "must be defined"),
    ("not.none?", "must be defined"),
];

/// A thread-safe, locale- and namespace-aware message template store.
///
/// Lookup walks a fallback chain from the most specific key to the
/// broadest: a rule-scoped key first when a rule name is in scope, then
/// the full key-segment path plus predicate with path suffixes stripped
/// from the end, down to the bare predicate key. Index segments never
/// participate in lookup keys; templates address fields, not elements.
///
/// # Example
///
/// ```rust
/// use debrief::{MessageStore, Path};
///
/// let store = MessageStore::with_defaults();
/// store.merge("en", [("age.int?", "must be a number of years")]);
///
/// let template = store
///     .lookup("en", None, &Path::from_key("user").push_key("age"), "int?")
///     .unwrap();
/// // "user.age.int?" misses, "user.int?" misses, "int?" resolves; the
/// // field-level override wins only for paths ending broader than it.
/// assert_eq!(template, "must be an integer");
/// ```
#[derive(Clone)]
pub struct MessageStore {
    catalogs: Catalogs,
    default_locale: String,
    namespace: Option<String>,
    token: Regex,
}

impl MessageStore {
    /// Creates an empty store with `en` as the default locale.
    pub fn new() -> Self {
        Self {
            catalogs: Arc::new(RwLock::new(IndexMap::new())),
            default_locale: "en".to_string(),
            namespace: None,
            token: Regex::new(r"%\{(\w+)\}").expect("token pattern is valid"),
        }
    }

    /// Creates a store preloaded with the built-in English catalog.
    pub fn with_defaults() -> Self {
        let store = Self::new();
        store.merge(
            "en",
            EN_MESSAGES.iter().map(|(key, text)| (*key, *text)),
        );
        store
    }

    /// Sets the locale used when a lookup misses in the requested locale.
    pub fn with_default_locale(mut self, locale: impl Into<String>) -> Self {
        self.default_locale = locale.into();
        self
    }

    /// Scopes lookups under a namespace.
    ///
    /// Namespaced candidates (`<ns>.<key>`) are tried before bare ones,
    /// so one catalog can carry overrides for a single schema without
    /// affecting others.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Merges templates into a locale's catalog.
    ///
    /// Existing keys are overwritten; writers are serialized against each
    /// other and against concurrent readers.
    pub fn merge<L, K, T, I>(&self, locale: L, entries: I)
    where
        L: Into<String>,
        K: Into<String>,
        T: Into<String>,
        I: IntoIterator<Item = (K, T)>,
    {
        let mut catalogs = self.catalogs.write();
        let catalog = catalogs.entry(locale.into()).or_default();
        for (key, text) in entries {
            catalog.insert(key.into(), text.into());
        }
    }

    /// Replaces a locale's catalog wholesale.
    pub fn replace<L, K, T, I>(&self, locale: L, entries: I)
    where
        L: Into<String>,
        K: Into<String>,
        T: Into<String>,
        I: IntoIterator<Item = (K, T)>,
    {
        let locale = locale.into();
        self.catalogs.write().shift_remove(&locale);
        self.merge(locale, entries);
    }

    /// Resolves the template for a predicate at a path.
    ///
    /// Candidates are tried most specific first: `rules.<rule>.<key>`
    /// when a rule name is in scope, then the key-segment path joined
    /// with the predicate key, progressively stripping path suffixes from
    /// the end, finishing with the bare predicate key. The requested
    /// locale is exhausted before the default locale.
    pub fn lookup(
        &self,
        locale: &str,
        rule: Option<&str>,
        path: &Path,
        key: &str,
    ) -> Option<String> {
        let candidates = self.candidates(rule, path, key);
        let catalogs = self.catalogs.read();

        for loc in self.locale_chain(locale) {
            let Some(catalog) = catalogs.get(loc) else {
                continue;
            };
            for candidate in &candidates {
                if let Some(ns) = &self.namespace {
                    if let Some(text) = catalog.get(&format!("{}.{}", ns, candidate)) {
                        return Some(text.clone());
                    }
                }
                if let Some(text) = catalog.get(candidate) {
                    return Some(text.clone());
                }
            }
        }
        None
    }

    /// Returns the translated "or" connective for a locale.
    pub fn connective(&self, locale: &str) -> String {
        self.lookup(locale, None, &Path::root(), "or")
            .unwrap_or_else(|| "or".to_string())
    }

    /// Renders a template by substituting `%{name}` tokens.
    ///
    /// Token values come from the predicate arguments plus `%{value}`
    /// from the input value when one is in scope. Array arguments render
    /// as comma-separated lists. Unresolved tokens are left verbatim so a
    /// template typo is visible in the output instead of failing the
    /// whole compile.
    pub fn render(&self, template: &str, args: &[PredicateArg], input: Option<&Value>) -> String {
        self.token
            .replace_all(template, |caps: &Captures<'_>| {
                let name = &caps[1];
                if let Some((_, value)) = args.iter().find(|(arg, _)| arg == name) {
                    return display_value(value);
                }
                if name == "value" {
                    if let Some(value) = input {
                        return display_value(value);
                    }
                }
                caps[0].to_string()
            })
            .into_owned()
    }

    fn locale_chain<'a>(&'a self, locale: &'a str) -> Vec<&'a str> {
        if locale == self.default_locale {
            vec![locale]
        } else {
            vec![locale, self.default_locale.as_str()]
        }
    }

    fn candidates(&self, rule: Option<&str>, path: &Path, key: &str) -> Vec<String> {
        let mut candidates = Vec::new();

        if let Some(rule) = rule {
            candidates.push(format!("rules.{}.{}", rule, key));
        }

        let keys: Vec<&str> = path
            .segments()
            .filter_map(|segment| match segment {
                PathSegment::Key(name) => Some(name.as_str()),
                PathSegment::Index(_) => None,
            })
            .collect();

        for depth in (0..=keys.len()).rev() {
            let mut parts: Vec<&str> = keys[..depth].to_vec();
            parts.push(key);
            candidates.push(parts.join("."));
        }

        candidates
    }
}

impl Default for MessageStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders a predicate argument for interpolation.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lookup_falls_back_to_bare_predicate() {
        let store = MessageStore::with_defaults();
        let path = Path::from_key("user").push_key("age");

        assert_eq!(
            store.lookup("en", None, &path, "int?").as_deref(),
            Some("must be an integer")
        );
    }

    #[test]
    fn test_lookup_prefers_most_specific_path() {
        let store = MessageStore::with_defaults();
        store.merge("en", [("user.age.int?", "must be a number of years")]);

        let path = Path::from_key("user").push_key("age");
        assert_eq!(
            store.lookup("en", None, &path, "int?").as_deref(),
            Some("must be a number of years")
        );
    }

    #[test]
    fn test_lookup_strips_path_suffixes_from_the_end() {
        let store = MessageStore::new();
        store.merge("en", [("user.int?", "user-level override")]);

        let path = Path::from_key("user").push_key("age");
        assert_eq!(
            store.lookup("en", None, &path, "int?").as_deref(),
            Some("user-level override")
        );
    }

    #[test]
    fn test_lookup_skips_index_segments() {
        let store = MessageStore::new();
        store.merge("en", [("tags.str?", "each tag must be a string")]);

        let path = Path::from_key("tags").push_index(3);
        assert_eq!(
            store.lookup("en", None, &path, "str?").as_deref(),
            Some("each tag must be a string")
        );
    }

    #[test]
    fn test_rule_scoped_lookup_wins() {
        let store = MessageStore::with_defaults();
        store.merge("en", [("rules.adult.gt?", "must be an adult age")]);

        let path = Path::from_key("age");
        assert_eq!(
            store.lookup("en", Some("adult"), &path, "gt?").as_deref(),
            Some("must be an adult age")
        );
        assert_eq!(
            store.lookup("en", None, &path, "gt?").as_deref(),
            Some("must be greater than %{num}")
        );
    }

    #[test]
    fn test_locale_falls_back_to_default() {
        let store = MessageStore::with_defaults();
        store.merge("de", [("int?", "muss eine Ganzzahl sein")]);

        let path = Path::from_key("age");
        assert_eq!(
            store.lookup("de", None, &path, "int?").as_deref(),
            Some("muss eine Ganzzahl sein")
        );
        // gt? is absent from the de catalog, so the default locale serves it.
        assert_eq!(
            store.lookup("de", None, &path, "gt?").as_deref(),
            Some("must be greater than %{num}")
        );
    }

    #[test]
    fn test_namespaced_lookup_tries_namespace_first() {
        let store = MessageStore::with_defaults().with_namespace("signup");
        store.merge("en", [("signup.filled?", "please fill this in")]);

        let path = Path::from_key("email");
        assert_eq!(
            store.lookup("en", None, &path, "filled?").as_deref(),
            Some("please fill this in")
        );
    }

    #[test]
    fn test_replace_clears_previous_entries() {
        let store = MessageStore::new();
        store.merge("en", [("int?", "old"), ("str?", "kept?")]);
        store.replace("en", [("int?", "new")]);

        let path = Path::root();
        assert_eq!(store.lookup("en", None, &path, "int?").as_deref(), Some("new"));
        assert_eq!(store.lookup("en", None, &path, "str?"), None);
    }

    #[test]
    fn test_render_interpolates_args() {
        let store = MessageStore::new();
        let args = vec![("num".to_string(), json!(18))];

        assert_eq!(
            store.render("must be greater than %{num}", &args, None),
            "must be greater than 18"
        );
    }

    #[test]
    fn test_render_joins_list_args() {
        let store = MessageStore::new();
        let args = vec![("list".to_string(), json!(["draft", "published"]))];

        assert_eq!(
            store.render("must be one of: %{list}", &args, None),
            "must be one of: draft, published"
        );
    }

    #[test]
    fn test_render_uses_input_value() {
        let store = MessageStore::new();

        assert_eq!(
            store.render("%{value} is not allowed", &[], Some(&json!("admin"))),
            "admin is not allowed"
        );
    }

    #[test]
    fn test_render_leaves_unknown_tokens_verbatim() {
        let store = MessageStore::new();

        assert_eq!(
            store.render("must match %{pattern}", &[], None),
            "must match %{pattern}"
        );
    }

    #[test]
    fn test_connective_defaults_to_or() {
        assert_eq!(MessageStore::new().connective("en"), "or");
        assert_eq!(MessageStore::with_defaults().connective("en"), "or");
    }

    #[test]
    fn test_clones_share_storage() {
        let store = MessageStore::new();
        let clone = store.clone();
        clone.merge("en", [("int?", "shared")]);

        assert_eq!(
            store.lookup("en", None, &Path::root(), "int?").as_deref(),
            Some("shared")
        );
    }
}
