//! # Identifier Paths
//!
//! A path locates a value inside the root input of a validation call: an
//! ordered sequence of property keys and indices, optionally containing the
//! reserved [`PathSegment::ReturnType`] marker for function return values.
//!
//! Paths are always relative to the root input, so every error path is a
//! valid prefix-comparable locator ([`match_path`]).

use std::fmt;

use serde::{Serialize, Serializer};

use crate::identity::Symbol;
use crate::value::Value;

/// Human label rendered in place of the return-slot marker.
pub const RETURN_TYPE_LABEL: &str = "Return Type";

/// Serialized form of the return-slot marker.
pub const RETURN_TYPE_MARKER: &str = "[[Return Type]]";

/// Label rendered for the empty path.
pub const ROOT_LABEL: &str = "Value";

/// A property key: string name, numeric index, or symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    /// Named property.
    String(String),
    /// Numeric index.
    Index(usize),
    /// Symbol-keyed property.
    Symbol(Symbol),
}

impl PropertyKey {
    /// True if this is the string key `name`.
    pub fn is_named(&self, name: &str) -> bool {
        matches!(self, PropertyKey::String(s) if s == name)
    }

    /// The key as a runtime value, for associative lookups.
    pub fn to_value(&self) -> Value {
        match self {
            PropertyKey::String(s) => Value::from(s.as_str()),
            PropertyKey::Index(i) => Value::Number(*i as f64),
            PropertyKey::Symbol(s) => Value::Symbol(s.clone()),
        }
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyKey::String(s) => write!(f, "{s}"),
            PropertyKey::Index(i) => write!(f, "{i}"),
            PropertyKey::Symbol(s) => write!(f, "{s}"),
        }
    }
}

impl Serialize for PropertyKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PropertyKey::String(s) => serializer.serialize_str(s),
            PropertyKey::Index(i) => serializer.serialize_u64(*i as u64),
            PropertyKey::Symbol(s) => serializer.collect_str(s),
        }
    }
}

impl From<&str> for PropertyKey {
    fn from(s: &str) -> Self {
        PropertyKey::String(s.to_string())
    }
}

impl From<String> for PropertyKey {
    fn from(s: String) -> Self {
        PropertyKey::String(s)
    }
}

impl From<usize> for PropertyKey {
    fn from(i: usize) -> Self {
        PropertyKey::Index(i)
    }
}

impl From<Symbol> for PropertyKey {
    fn from(s: Symbol) -> Self {
        PropertyKey::Symbol(s)
    }
}

/// One step of an [`IdentifierPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Descend into a property or index.
    Key(PropertyKey),
    /// The return slot of a function. Skipped when resolving values.
    ReturnType,
}

impl Serialize for PathSegment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PathSegment::Key(key) => key.serialize(serializer),
            PathSegment::ReturnType => serializer.serialize_str(RETURN_TYPE_MARKER),
        }
    }
}

impl From<PropertyKey> for PathSegment {
    fn from(key: PropertyKey) -> Self {
        PathSegment::Key(key)
    }
}

impl From<&str> for PathSegment {
    fn from(s: &str) -> Self {
        PathSegment::Key(s.into())
    }
}

impl From<String> for PathSegment {
    fn from(s: String) -> Self {
        PathSegment::Key(s.into())
    }
}

impl From<usize> for PathSegment {
    fn from(i: usize) -> Self {
        PathSegment::Key(i.into())
    }
}

impl From<Symbol> for PathSegment {
    fn from(s: Symbol) -> Self {
        PathSegment::Key(s.into())
    }
}

/// Ordered locator relative to the root input.
pub type IdentifierPath = Vec<PathSegment>;

/// Build an [`IdentifierPath`] from keys: `path!["a", 0usize]`.
#[macro_export]
macro_rules! path {
    () => { $crate::IdentifierPath::new() };
    ($($segment:expr),+ $(,)?) => {
        vec![$($crate::PathSegment::from($segment)),+]
    };
}

/// True iff `path` is a prefix of `candidate`.
pub fn match_path(path: &[PathSegment], candidate: &[PathSegment]) -> bool {
    path.len() <= candidate.len() && path.iter().zip(candidate).all(|(a, b)| a == b)
}

/// ASCII pattern `^[$A-Za-z_][0-9A-Za-z_$\[\].]*$`.
fn is_identifier_or_accessor(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '$' || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '[' | ']' | '.'))
}

/// Render a path for humans: `a.b`, `a[0]`, `[the value]`, `Return Type`.
pub fn stringify_path(path: &[PathSegment]) -> String {
    if path.is_empty() {
        return ROOT_LABEL.to_string();
    }
    let mut out = String::new();
    for (i, part) in path.iter().enumerate() {
        match part {
            PathSegment::ReturnType => out.push_str(RETURN_TYPE_LABEL),
            PathSegment::Key(PropertyKey::String(s)) if is_identifier_or_accessor(s) => {
                if i > 0 {
                    out.push('.');
                }
                out.push_str(s);
            }
            PathSegment::Key(key) => out.push_str(&format!("[{key}]")),
        }
    }
    out
}

/// Walk `input` along `path`, skipping the return-slot marker.
///
/// Maps are searched by entry; everything else by property read. Walking
/// through `null`/`undefined` yields `Undefined`.
pub fn resolve_path(input: &Value, path: &[PathSegment]) -> Value {
    let mut subject = input.clone();
    for part in path {
        if subject.is_nullish() {
            return Value::Undefined;
        }
        match part {
            PathSegment::ReturnType => continue,
            PathSegment::Key(key) => subject = subject.lookup(key),
        }
    }
    subject
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_path_empty_matches_anything() {
        assert!(match_path(&[], &path!["a", "b"]));
        assert!(match_path(&[], &[]));
    }

    #[test]
    fn test_match_path_prefix() {
        assert!(match_path(&path!["a"], &path!["a", "b"]));
        assert!(!match_path(&path!["a", "b"], &path!["a"]));
        assert!(!match_path(&path!["b"], &path!["a", "b"]));
    }

    #[test]
    fn test_match_path_distinguishes_index_from_string() {
        assert!(!match_path(&path![0usize], &path!["0"]));
    }

    #[test]
    fn test_stringify_root() {
        assert_eq!(stringify_path(&[]), "Value");
    }

    #[test]
    fn test_stringify_dotted() {
        assert_eq!(stringify_path(&path!["a", "b"]), "a.b");
    }

    #[test]
    fn test_stringify_index() {
        assert_eq!(stringify_path(&path!["a", 0usize]), "a[0]");
    }

    #[test]
    fn test_stringify_non_identifier() {
        assert_eq!(stringify_path(&path!["the value"]), "[the value]");
        assert_eq!(stringify_path(&path!["a", "0abc"]), "a[0abc]");
    }

    #[test]
    fn test_stringify_return_slot() {
        assert_eq!(stringify_path(&[PathSegment::ReturnType]), "Return Type");
    }

    #[test]
    fn test_stringify_symbol() {
        let sym = Symbol::new("id");
        assert_eq!(stringify_path(&path!["a", sym]), "a[Symbol(id)]");
    }

    #[test]
    fn test_resolve_path_walks_objects_and_maps() {
        let inner = Value::map([(Value::from("k"), Value::from("found"))]);
        let root = Value::object([("m", inner)]);
        assert_eq!(resolve_path(&root, &path!["m", "k"]), Value::from("found"));
    }

    #[test]
    fn test_resolve_path_skips_return_slot() {
        let root = Value::object([("a", 5)]);
        let path = vec![PathSegment::ReturnType, PathSegment::from("a")];
        assert_eq!(resolve_path(&root, &path), Value::Number(5.0));
    }

    #[test]
    fn test_resolve_path_through_nullish() {
        let root = Value::object([("a", Value::Null)]);
        assert!(resolve_path(&root, &path!["a", "b", "c"]).is_undefined());
    }

    #[test]
    fn test_path_segment_serializes_marker() {
        let json = serde_json::to_value(vec![
            PathSegment::from("a"),
            PathSegment::from(1usize),
            PathSegment::ReturnType,
        ])
        .unwrap();
        assert_eq!(json, serde_json::json!(["a", 1, "[[Return Type]]"]));
    }
}
