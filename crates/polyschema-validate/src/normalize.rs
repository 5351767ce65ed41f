//! # Validator Normalizer
//!
//! [`Validator`] resolves a node's adapter, runs the vendor's own
//! validator through it, and maps whatever came back onto
//! [`ValidationResult`]. It never judges data itself.
//!
//! | Native result | Normalized |
//! |---|---|
//! | `Parsed(v)` | success with `v` |
//! | `Accepted` | success echoing the input |
//! | `Rejected`, `Issues([])` | one generic issue |
//! | `Issues(list)` | one issue per vendor issue, paths normalized |
//! | `Err(e)` | one issue carrying `e.message()` |
//! | no adapter | one "unsupported schema" issue |

use polyschema_core::{
    AdapterError, AdapterRegistry, Issue, NativeIssue, NativeOutcome, SchemaNode,
    ValidationResult,
};
use serde_json::Value;

use crate::path::normalize_path;

/// Message used when a vendor rejects data without saying why.
pub const GENERIC_FAILURE: &str = "validation failed";

/// Runs vendor validators and normalizes their results.
#[derive(Debug, Clone, Copy)]
pub struct Validator<'r> {
    registry: &'r AdapterRegistry,
}

impl<'r> Validator<'r> {
    pub fn new(registry: &'r AdapterRegistry) -> Self {
        Self { registry }
    }

    /// Validate `data` against `node` with the vendor's synchronous validator.
    pub fn validate(&self, node: &SchemaNode, data: &Value) -> ValidationResult {
        match self.registry.resolve(node) {
            Some(adapter) => normalize(adapter.validate(node, data), data),
            None => unsupported(node),
        }
    }

    /// Validate `data` against `node` with the vendor's async validator.
    ///
    /// Vendors without an async path fall back to their sync validator.
    pub async fn validate_async(&self, node: &SchemaNode, data: &Value) -> ValidationResult {
        match self.registry.resolve(node) {
            Some(adapter) => normalize(adapter.validate_async(node, data).await, data),
            None => unsupported(node),
        }
    }
}

/// Map a native validator result onto the canonical shape.
///
/// `input` is echoed as the data of vendors that only answer with a boolean.
pub fn normalize(outcome: Result<NativeOutcome, AdapterError>, input: &Value) -> ValidationResult {
    match outcome {
        Ok(NativeOutcome::Parsed(data)) => ValidationResult::success(data),
        Ok(NativeOutcome::Accepted) => ValidationResult::success(input.clone()),
        Ok(NativeOutcome::Rejected) => ValidationResult::failure_message(GENERIC_FAILURE),
        Ok(NativeOutcome::Issues(issues)) if issues.is_empty() => {
            ValidationResult::failure_message(GENERIC_FAILURE)
        }
        Ok(NativeOutcome::Issues(issues)) => ValidationResult::Failure {
            issues: issues.into_iter().map(issue).collect(),
        },
        Err(err) => {
            tracing::debug!(vendor = err.vendor(), error = %err, "vendor validator failed");
            ValidationResult::failure_message(err.message())
        }
    }
}

/// Failure for a node no registered adapter claims.
pub fn unsupported(node: &SchemaNode) -> ValidationResult {
    tracing::debug!(
        node_type = node.type_name(),
        "validate called with unclaimed schema node"
    );
    ValidationResult::failure_message(format!(
        "unsupported schema: no registered adapter recognizes a value of type `{}`",
        node.type_name()
    ))
}

fn issue(native: NativeIssue) -> Issue {
    let message = if native.message.is_empty() {
        GENERIC_FAILURE.to_string()
    } else {
        native.message
    };
    match native.path {
        Some(path) => Issue::at(message, normalize_path(&path)),
        None => Issue::new(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polyschema_core::{NativePath, PathSegment};
    use serde_json::json;

    #[test]
    fn parsed_output_wins_over_input() {
        let result = normalize(Ok(NativeOutcome::Parsed(json!(2))), &json!("2"));
        assert_eq!(result, ValidationResult::success(json!(2)));
    }

    #[test]
    fn accepted_echoes_input() {
        let result = normalize(Ok(NativeOutcome::Accepted), &json!({"a": 1}));
        assert_eq!(result.to_json(), json!({"success": true, "data": {"a": 1}}));
    }

    #[test]
    fn bare_rejection_gets_generic_issue() {
        for outcome in [NativeOutcome::Rejected, NativeOutcome::Issues(Vec::new())] {
            let result = normalize(Ok(outcome), &json!(1));
            assert_eq!(result.issues(), &[Issue::new(GENERIC_FAILURE)]);
        }
    }

    #[test]
    fn issue_paths_are_normalized() {
        let result = normalize(
            Ok(NativeOutcome::Issues(vec![
                NativeIssue::at("bad", NativePath::Delimited("/a/0".into())),
                NativeIssue::at("root", NativePath::Accessor(String::new())),
                NativeIssue::new(""),
            ])),
            &json!(null),
        );
        assert_eq!(
            result.issues(),
            &[
                Issue::at("bad", vec![PathSegment::from("a"), PathSegment::Index(0)]),
                Issue::new("root"),
                Issue::new(GENERIC_FAILURE),
            ]
        );
    }

    #[test]
    fn vendor_error_becomes_single_issue() {
        let result = normalize(Err(AdapterError::native("x", "boom")), &json!(1));
        assert_eq!(result.issues(), &[Issue::new("boom")]);
    }

    #[test]
    fn unsupported_names_payload_type() {
        let result = unsupported(&SchemaNode::new(5_u32));
        assert!(result.issues()[0].message.contains("`u32`"));
    }
}
