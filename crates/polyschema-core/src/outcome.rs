//! # Validation Outcomes
//!
//! Two layers of result types:
//!
//! - [`NativeOutcome`] is what an adapter reports after calling its
//!   vendor's validator: parsed output, a bare boolean, or a list of
//!   vendor issues whose paths may be segment lists, slash-delimited
//!   strings, or accessor chains.
//! - [`ValidationResult`] is the canonical shape returned to callers:
//!   `{"success": true, "data": ...}` or `{"success": false, "issues": [...]}`.
//!
//! The conversion between them lives in `polyschema-validate`.

use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// One step of a normalized issue path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    /// Array position.
    Index(usize),
    /// Object key.
    Key(String),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "{i}"),
            Self::Key(k) => write!(f, "{k}"),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// Path representation as reported by a vendor, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativePath {
    /// Already an ordered list of keys and indices.
    Segments(Vec<PathSegment>),
    /// Slash-delimited, optionally JSON-Pointer style: `a/b/0`, `/a/b/0`.
    Delimited(String),
    /// Property accessor chain: `a.b[0].c`, `[1]`, `a["x.y"]`.
    Accessor(String),
}

/// One issue as reported by a vendor validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeIssue {
    /// Vendor message.
    pub message: String,
    /// Vendor path, if the vendor reports one.
    pub path: Option<NativePath>,
}

impl NativeIssue {
    /// Issue without a path.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: None,
        }
    }

    /// Issue at the given vendor path.
    pub fn at(message: impl Into<String>, path: NativePath) -> Self {
        Self {
            message: message.into(),
            path: Some(path),
        }
    }
}

/// Raw result of a vendor validator call.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeOutcome {
    /// Validation passed and the vendor returned (possibly transformed) output.
    Parsed(Value),
    /// Validation passed; the vendor only reports a boolean.
    Accepted,
    /// Validation failed; the vendor only reports a boolean.
    Rejected,
    /// Validation failed with vendor issues.
    Issues(Vec<NativeIssue>),
}

/// A normalized validation issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Human-readable description.
    pub message: String,
    /// Location of the offending value; `None` for the root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<PathSegment>>,
}

impl Issue {
    /// Issue at the root.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: None,
        }
    }

    /// Issue at `path`; an empty path is stored as the root.
    pub fn at(message: impl Into<String>, path: Vec<PathSegment>) -> Self {
        Self {
            message: message.into(),
            path: if path.is_empty() { None } else { Some(path) },
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            None => write!(f, "(root): {}", self.message),
            Some(path) => {
                for (i, seg) in path.iter().enumerate() {
                    match seg {
                        PathSegment::Index(idx) => write!(f, "[{idx}]")?,
                        PathSegment::Key(key) if i == 0 => write!(f, "{key}")?,
                        PathSegment::Key(key) => write!(f, ".{key}")?,
                    }
                }
                write!(f, ": {}", self.message)
            }
        }
    }
}

/// Canonical, vendor-independent validation result.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationResult {
    /// The data is valid; `data` is the vendor's output (or the input).
    Success {
        /// Validated data.
        data: Value,
    },
    /// The data is invalid. `issues` is never empty.
    Failure {
        /// Normalized issues.
        issues: Vec<Issue>,
    },
}

impl ValidationResult {
    /// Successful result.
    pub fn success(data: Value) -> Self {
        Self::Success { data }
    }

    /// Failed result with a single root issue.
    pub fn failure_message(message: impl Into<String>) -> Self {
        Self::Failure {
            issues: vec![Issue::new(message)],
        }
    }

    /// Returns true for [`ValidationResult::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Validated data, if successful.
    pub fn data(&self) -> Option<&Value> {
        match self {
            Self::Success { data } => Some(data),
            Self::Failure { .. } => None,
        }
    }

    /// Issues, empty on success.
    pub fn issues(&self) -> &[Issue] {
        match self {
            Self::Success { .. } => &[],
            Self::Failure { issues } => issues,
        }
    }

    /// Render as a JSON value of the canonical `{success, data|issues}` shape.
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl Serialize for ValidationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        match self {
            Self::Success { data } => {
                map.serialize_entry("success", &true)?;
                map.serialize_entry("data", data)?;
            }
            Self::Failure { issues } => {
                map.serialize_entry("success", &false)?;
                map.serialize_entry("issues", issues)?;
            }
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_serializes_canonically() {
        let result = ValidationResult::success(json!("hello"));
        assert_eq!(result.to_json(), json!({"success": true, "data": "hello"}));
    }

    #[test]
    fn failure_serializes_issues_with_optional_path() {
        let result = ValidationResult::Failure {
            issues: vec![
                Issue::new("bad"),
                Issue::at("too short", vec!["tags".into(), 2.into()]),
            ],
        };
        assert_eq!(
            result.to_json(),
            json!({
                "success": false,
                "issues": [
                    {"message": "bad"},
                    {"message": "too short", "path": ["tags", 2]}
                ]
            })
        );
    }

    #[test]
    fn empty_path_is_root() {
        let issue = Issue::at("x", Vec::new());
        assert!(issue.path.is_none());
    }

    #[test]
    fn issue_display_renders_accessor_path() {
        let issue = Issue::at(
            "expected string",
            vec!["items".into(), 0.into(), "name".into()],
        );
        assert_eq!(issue.to_string(), "items[0].name: expected string");
        assert_eq!(Issue::new("nope").to_string(), "(root): nope");
    }

    #[test]
    fn path_segment_deserializes_untagged() {
        let segs: Vec<PathSegment> = serde_json::from_value(json!(["a", 3])).unwrap();
        assert_eq!(segs, vec![PathSegment::Key("a".into()), PathSegment::Index(3)]);
    }

    #[test]
    fn accessors() {
        let ok = ValidationResult::success(json!(1));
        assert!(ok.is_success());
        assert_eq!(ok.data(), Some(&json!(1)));
        assert!(ok.issues().is_empty());

        let bad = ValidationResult::failure_message("nope");
        assert!(!bad.is_success());
        assert!(bad.data().is_none());
        assert_eq!(bad.issues().len(), 1);
    }
}
