use std::fmt;

use serde_json::Value;

use crate::decode::DecodeError;

/// Which document a decode failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Actual,
    Expected,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Actual => f.write_str("actual"),
            Side::Expected => f.write_str("expected"),
        }
    }
}

/// The JSON type of a value, as named in mismatch messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Object,
    List,
    String,
    Number,
    Bool,
    Null,
}

impl Shape {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Object(_) => Shape::Object,
            Value::Array(_) => Shape::List,
            Value::String(_) => Shape::String,
            Value::Number(_) => Shape::Number,
            Value::Bool(_) => Shape::Bool,
            Value::Null => Shape::Null,
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Shape::Object => "object",
            Shape::List => "list",
            Shape::String => "string",
            Shape::Number => "number",
            Shape::Bool => "bool",
            Shape::Null => "null",
        })
    }
}

/// Object keys leading from the document root to a failing value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Path(Vec<String>);

impl Path {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    fn prepend(&mut self, key: &str) {
        self.0.insert(0, key.to_owned());
    }

    /// `a.b.c: ` for nested paths, nothing at the root.
    fn prefix(&self) -> Prefix<'_> {
        Prefix(self)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}

struct Prefix<'a>(&'a Path);

impl fmt::Display for Prefix<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_root() {
            Ok(())
        } else {
            write!(f, "{}: ", self.0)
        }
    }
}

struct Values<'a>(&'a [Value]);

impl fmt::Display for Values<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{value}")?;
        }
        Ok(())
    }
}

/// Why an actual document does not satisfy an expected one.
#[derive(Debug, thiserror::Error)]
pub enum Mismatch {
    #[error("{side} {source}")]
    Decode { side: Side, source: DecodeError },
    #[error("{}type mismatch, wanted {expected}, got {actual}", .path.prefix())]
    TypeMismatch {
        path: Path,
        expected: Shape,
        actual: Shape,
    },
    #[error("{}wanted {expected}, got {actual}", .path.prefix())]
    ValueMismatch {
        path: Path,
        expected: Value,
        actual: Value,
    },
    #[error("{}not all expected values were found, missing: {}", .path.prefix(), Values(.missing))]
    ListElementUnsatisfied { path: Path, missing: Vec<Value> },
    #[error(
        "partial mismatched, wanted {}, got: {}",
        String::from_utf8_lossy(.needle),
        String::from_utf8_lossy(.haystack)
    )]
    SubstringNotFound { needle: Vec<u8>, haystack: Vec<u8> },
}

impl Mismatch {
    /// Location of the failure, if it has one.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Mismatch::TypeMismatch { path, .. }
            | Mismatch::ValueMismatch { path, .. }
            | Mismatch::ListElementUnsatisfied { path, .. } => Some(path),
            Mismatch::Decode { .. } | Mismatch::SubstringNotFound { .. } => None,
        }
    }

    /// Re-anchors a failure reported by a child value under `key`.
    pub(crate) fn within(mut self, key: &str) -> Self {
        match &mut self {
            Mismatch::TypeMismatch { path, .. }
            | Mismatch::ValueMismatch { path, .. }
            | Mismatch::ListElementUnsatisfied { path, .. } => path.prepend(key),
            Mismatch::Decode { .. } | Mismatch::SubstringNotFound { .. } => {}
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nested_path_renders_dotted() {
        let mismatch = Mismatch::ValueMismatch {
            path: Path::root(),
            expected: json!("B"),
            actual: json!("A"),
        }
        .within("city")
        .within("address")
        .within("user");
        assert_eq!(
            mismatch.to_string(),
            r#"user.address.city: wanted "B", got "A""#
        );
    }

    #[test]
    fn root_path_has_no_prefix() {
        let mismatch = Mismatch::TypeMismatch {
            path: Path::root(),
            expected: Shape::Object,
            actual: Shape::Number,
        };
        assert_eq!(
            mismatch.to_string(),
            "type mismatch, wanted object, got number"
        );
    }

    #[test]
    fn missing_values_are_listed() {
        let mismatch = Mismatch::ListElementUnsatisfied {
            path: Path::root(),
            missing: vec![json!({"id": 3}), json!(4)],
        }
        .within("items");
        assert_eq!(
            mismatch.to_string(),
            r#"items: not all expected values were found, missing: {"id":3}, 4"#
        );
    }

    #[test]
    fn substring_failure_shows_needle_and_haystack() {
        let mismatch = Mismatch::SubstringNotFound {
            needle: b"xyz".to_vec(),
            haystack: b"hello world".to_vec(),
        };
        assert_eq!(
            mismatch.to_string(),
            "partial mismatched, wanted xyz, got: hello world"
        );
    }

    #[test]
    fn within_leaves_pathless_failures_alone() {
        let mismatch = Mismatch::SubstringNotFound {
            needle: b"a".to_vec(),
            haystack: b"b".to_vec(),
        }
        .within("ignored");
        assert!(mismatch.path().is_none());
    }
}
