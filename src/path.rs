//! Path representation for locating values in nested structures.
//!
//! This module provides [`Path`] and [`PathSegment`] types for addressing
//! locations in nested data, and for turning a compiled message back into
//! the nested mapping shape consumed by callers.

use std::fmt::{self, Display};

use serde_json::{Map, Value};

/// A segment of a path.
///
/// Paths are built from segments that represent either key access or
/// element indexing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// A key/property access (e.g., `user`, `email`)
    Key(String),
    /// An element index access (e.g., `[0]`, `[42]`)
    Index(usize),
}

impl PathSegment {
    /// Creates a new key segment.
    pub fn key(name: impl Into<String>) -> Self {
        PathSegment::Key(name.into())
    }

    /// Creates a new index segment.
    pub fn index(idx: usize) -> Self {
        PathSegment::Index(idx)
    }

    /// Renders this segment as a mapping key.
    ///
    /// Index segments render as their decimal string since mapping keys
    /// are strings in the nested output form.
    pub fn as_map_key(&self) -> String {
        match self {
            PathSegment::Key(name) => name.clone(),
            PathSegment::Index(idx) => idx.to_string(),
        }
    }
}

/// A path to a value in a nested structure.
///
/// `Path` represents locations like `users[0].email` and provides methods
/// for building paths incrementally, intersecting two paths into their
/// common prefix, and wrapping a value into the nested mapping shape the
/// path addresses.
///
/// Paths are value types: equality is structural.
///
/// # Example
///
/// ```rust
/// use debrief::Path;
///
/// let path = Path::root()
///     .push_key("users")
///     .push_index(0)
///     .push_key("email");
///
/// assert_eq!(path.to_string(), "users[0].email");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Path {
    segments: Vec<PathSegment>,
}

impl Path {
    /// Creates an empty path representing the root value.
    pub fn root() -> Self {
        Self::default()
    }

    /// Creates a path from a single key segment.
    pub fn from_key(name: impl Into<String>) -> Self {
        Self {
            segments: vec![PathSegment::Key(name.into())],
        }
    }

    /// Creates a path from a single index segment.
    pub fn from_index(idx: usize) -> Self {
        Self {
            segments: vec![PathSegment::Index(idx)],
        }
    }

    /// Creates a path from a sequence of segments.
    pub fn from_segments(segments: impl IntoIterator<Item = PathSegment>) -> Self {
        Self {
            segments: segments.into_iter().collect(),
        }
    }

    /// Returns a new path with a key segment appended.
    ///
    /// This method does not modify the original path; it returns a new one.
    pub fn push_key(&self, name: impl Into<String>) -> Self {
        self.append(PathSegment::Key(name.into()))
    }

    /// Returns a new path with an index segment appended.
    ///
    /// This method does not modify the original path; it returns a new one.
    pub fn push_index(&self, index: usize) -> Self {
        self.append(PathSegment::Index(index))
    }

    /// Returns a new path with the given segment appended.
    pub fn append(&self, segment: PathSegment) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self { segments }
    }

    /// Returns a new path extending this one with every segment of `other`.
    pub fn join(&self, other: &Path) -> Self {
        let mut segments = self.segments.clone();
        segments.extend(other.segments.iter().cloned());
        Self { segments }
    }

    /// Returns the longest common leading prefix of two paths.
    ///
    /// # Example
    ///
    /// ```rust
    /// use debrief::Path;
    ///
    /// let a = Path::root().push_key("user").push_key("name");
    /// let b = Path::root().push_key("user").push_key("email");
    ///
    /// assert_eq!(a.intersect(&b), Path::root().push_key("user"));
    /// ```
    pub fn intersect(&self, other: &Path) -> Self {
        let shared = self
            .segments
            .iter()
            .zip(other.segments.iter())
            .take_while(|(a, b)| a == b)
            .count();
        Self {
            segments: self.segments[..shared].to_vec(),
        }
    }

    /// Returns a new path with the first `n` segments dropped.
    ///
    /// Dropping more segments than the path holds yields the root path.
    pub fn strip_prefix(&self, n: usize) -> Self {
        Self {
            segments: self.segments.get(n..).unwrap_or(&[]).to_vec(),
        }
    }

    /// Returns true if this path begins with every segment of `other`.
    pub fn starts_with(&self, other: &Path) -> bool {
        self.segments.starts_with(&other.segments)
    }

    /// Wraps `value` in one singly-keyed mapping per segment, outermost
    /// segment first.
    ///
    /// # Example
    ///
    /// ```rust
    /// use debrief::Path;
    /// use serde_json::json;
    ///
    /// let path = Path::root().push_key("user").push_key("age");
    /// assert_eq!(
    ///     path.to_nested(json!(["must be an integer"])),
    ///     json!({"user": {"age": ["must be an integer"]}})
    /// );
    /// ```
    pub fn to_nested(&self, value: Value) -> Value {
        self.segments.iter().rev().fold(value, |acc, segment| {
            let mut map = Map::new();
            map.insert(segment.as_map_key(), acc);
            Value::Object(map)
        })
    }

    /// Returns true if this is the root path (no segments).
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the number of segments in this path.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns true if this path has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns an iterator over the path segments.
    pub fn segments(&self) -> impl Iterator<Item = &PathSegment> {
        self.segments.iter()
    }

    /// Returns the parent path (all segments except the last), or None if
    /// this is root.
    pub fn parent(&self) -> Option<Self> {
        if self.segments.is_empty() {
            None
        } else {
            Some(Self {
                segments: self.segments[..self.segments.len() - 1].to_vec(),
            })
        }
    }

    /// Returns the last segment, or None if this is root.
    pub fn last(&self) -> Option<&PathSegment> {
        self.segments.last()
    }
}

impl Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Key(name) => {
                    if i > 0 {
                        write!(f, ".")?;
                    }
                    write!(f, "{}", name)?;
                }
                PathSegment::Index(idx) => write!(f, "[{}]", idx)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_root_path_is_empty() {
        let path = Path::root();
        assert!(path.is_root());
        assert!(path.is_empty());
        assert_eq!(path.len(), 0);
        assert_eq!(path.to_string(), "");
    }

    #[test]
    fn test_single_key() {
        let path = Path::root().push_key("user");
        assert_eq!(path.to_string(), "user");
        assert_eq!(path.len(), 1);
    }

    #[test]
    fn test_key_with_index() {
        let path = Path::root().push_key("users").push_index(0);
        assert_eq!(path.to_string(), "users[0]");
    }

    #[test]
    fn test_complex_path() {
        let path = Path::root()
            .push_key("users")
            .push_index(0)
            .push_key("email");
        assert_eq!(path.to_string(), "users[0].email");
    }

    #[test]
    fn test_path_immutability() {
        let base = Path::root().push_key("users");
        let path_a = base.push_index(0);
        let path_b = base.push_index(1);

        assert_eq!(base.to_string(), "users");
        assert_eq!(path_a.to_string(), "users[0]");
        assert_eq!(path_b.to_string(), "users[1]");
    }

    #[test]
    fn test_intersect_common_prefix() {
        let a = Path::root()
            .push_key("user")
            .push_key("address")
            .push_key("city");
        let b = Path::root()
            .push_key("user")
            .push_key("address")
            .push_key("zip");

        assert_eq!(
            a.intersect(&b),
            Path::root().push_key("user").push_key("address")
        );
    }

    #[test]
    fn test_intersect_disjoint_paths_is_root() {
        let a = Path::root().push_key("foo").push_key("bar");
        let b = Path::root().push_key("hello").push_key("baz");

        assert!(a.intersect(&b).is_root());
    }

    #[test]
    fn test_intersect_with_index_segments() {
        let a = Path::root().push_key("tags").push_index(0);
        let b = Path::root().push_key("tags").push_index(1);

        assert_eq!(a.intersect(&b), Path::root().push_key("tags"));
    }

    #[test]
    fn test_strip_prefix() {
        let path = Path::root().push_key("a").push_key("b").push_key("c");

        assert_eq!(path.strip_prefix(1).to_string(), "b.c");
        assert_eq!(path.strip_prefix(3), Path::root());
        assert_eq!(path.strip_prefix(10), Path::root());
        assert_eq!(path.strip_prefix(0), path);
    }

    #[test]
    fn test_starts_with() {
        let base = Path::root().push_key("user");
        let deeper = base.push_key("email");

        assert!(deeper.starts_with(&base));
        assert!(deeper.starts_with(&Path::root()));
        assert!(!base.starts_with(&deeper));
    }

    #[test]
    fn test_to_nested_wraps_each_segment() {
        let path = Path::root().push_key("user").push_key("tags").push_index(1);

        assert_eq!(
            path.to_nested(json!(["is missing"])),
            json!({"user": {"tags": {"1": ["is missing"]}}})
        );
    }

    #[test]
    fn test_to_nested_at_root_is_identity() {
        assert_eq!(Path::root().to_nested(json!(["oops"])), json!(["oops"]));
    }

    #[test]
    fn test_parent_path() {
        let path = Path::root()
            .push_key("users")
            .push_index(0)
            .push_key("email");

        let parent = path.parent().unwrap();
        assert_eq!(parent.to_string(), "users[0]");

        let root = parent.parent().unwrap().parent().unwrap();
        assert!(root.is_root());
        assert!(root.parent().is_none());
    }

    #[test]
    fn test_join_and_append() {
        let base = Path::from_key("user");
        let rest = Path::from_key("roles").push_index(2);

        assert_eq!(base.join(&rest).to_string(), "user.roles[2]");
        assert_eq!(base.append(PathSegment::index(0)).to_string(), "user[0]");
    }

    #[test]
    fn test_equality_is_structural() {
        let path1 = Path::root().push_key("a").push_index(0);
        let path2 = Path::root().push_key("a").push_index(0);
        let path3 = Path::root().push_key("a").push_index(1);

        assert_eq!(path1, path2);
        assert_ne!(path1, path3);
    }
}
