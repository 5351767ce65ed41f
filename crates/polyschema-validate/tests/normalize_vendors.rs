//! # Validator Normalizer Integration Tests
//!
//! Drives [`Validator`] over the reference vendors and over small inline
//! adapters that exercise each native outcome shape: parsed output, bare
//! booleans, delimited paths, vendor errors and an async-only vendor.

use std::sync::Arc;

use async_trait::async_trait;
use polyschema_core::{
    AdapterError, AdapterRegistry, Issue, NativeIssue, NativeOutcome, NativePath, PathSegment,
    SchemaAdapter, SchemaNode, ValidationResult,
};
use polyschema_mock::{describe, fluent};
use polyschema_validate::{Validator, GENERIC_FAILURE};
use serde_json::{json, Value};

/// Boolean-only vendor: accepts even numbers.
struct EvenOnly;

struct Even;

impl SchemaAdapter for EvenOnly {
    fn vendor(&self) -> &str {
        "even"
    }
    fn matches(&self, node: &SchemaNode) -> bool {
        node.is::<Even>()
    }
    fn validate(&self, _node: &SchemaNode, data: &Value) -> Result<NativeOutcome, AdapterError> {
        Ok(match data.as_i64() {
            Some(n) if n % 2 == 0 => NativeOutcome::Accepted,
            _ => NativeOutcome::Rejected,
        })
    }
}

/// Vendor reporting JSON Pointer paths.
struct PointerVendor;

struct Pointer(&'static str);

impl SchemaAdapter for PointerVendor {
    fn vendor(&self) -> &str {
        "pointer"
    }
    fn matches(&self, node: &SchemaNode) -> bool {
        node.is::<Pointer>()
    }
    fn validate(&self, node: &SchemaNode, _data: &Value) -> Result<NativeOutcome, AdapterError> {
        let pointer = node.downcast_ref::<Pointer>().map(|p| p.0).unwrap_or("");
        Ok(NativeOutcome::Issues(vec![NativeIssue::at(
            "Expected number",
            NativePath::Delimited(pointer.to_string()),
        )]))
    }
}

/// Vendor whose only validator is async.
struct AsyncOnly;

struct Deferred;

#[async_trait]
impl SchemaAdapter for AsyncOnly {
    fn vendor(&self) -> &str {
        "async-only"
    }
    fn matches(&self, node: &SchemaNode) -> bool {
        node.is::<Deferred>()
    }
    async fn validate_async(
        &self,
        _node: &SchemaNode,
        data: &Value,
    ) -> Result<NativeOutcome, AdapterError> {
        Ok(NativeOutcome::Parsed(json!({ "checked": data })))
    }
}

fn registry() -> AdapterRegistry {
    polyschema_mock::registry()
        .with_adapter(Arc::new(EvenOnly))
        .with_adapter(Arc::new(PointerVendor))
        .with_adapter(Arc::new(AsyncOnly))
}

#[test]
fn string_accepts_hello_and_rejects_number() {
    let registry = registry();
    let validator = Validator::new(&registry);
    let node = fluent::string().into_node();

    let ok = validator.validate(&node, &json!("hello"));
    assert_eq!(ok.to_json(), json!({"success": true, "data": "hello"}));

    let bad = validator.validate(&node, &json!(123));
    assert!(!bad.is_success());
    assert!(!bad.issues().is_empty());
}

#[test]
fn parsed_output_is_returned() {
    let registry = registry();
    let node = fluent::object([
        ("tags", fluent::array(fluent::string()).default(json!([]))),
    ])
    .into_node();
    let result = Validator::new(&registry).validate(&node, &json!({}));
    assert_eq!(result.data(), Some(&json!({"tags": []})));
}

#[test]
fn fluent_segment_paths_survive() {
    let registry = registry();
    let node = fluent::array(fluent::object([("id", fluent::number())])).into_node();
    let result = Validator::new(&registry).validate(&node, &json!([{"id": 1}, {"id": "two"}]));
    let issues = result.issues();
    assert_eq!(issues.len(), 1);
    assert_eq!(
        issues[0].path,
        Some(vec![PathSegment::Index(1), PathSegment::from("id")])
    );
    assert_eq!(issues[0].to_string(), "[1].id: expected number, received string");
}

#[test]
fn describe_accessor_paths_are_normalized() {
    let registry = registry();
    let node = describe::schema(json!({
        "type": "object",
        "keys": {
            "user": {"type": "object", "keys": {"name": {"type": "string"}}}
        }
    }));
    let result = Validator::new(&registry).validate(&node, &json!({"user": {"name": 7}}));
    assert_eq!(
        result.issues()[0].path,
        Some(vec![PathSegment::from("user"), PathSegment::from("name")])
    );
}

#[test]
fn describe_success_echoes_input() {
    let registry = registry();
    let node = describe::schema(json!({"type": "string", "flags": {"presence": "optional"}}));
    let result = Validator::new(&registry).validate(&node, &json!("kept"));
    assert_eq!(result, ValidationResult::success(json!("kept")));
}

#[test]
fn boolean_vendor() {
    let registry = registry();
    let validator = Validator::new(&registry);
    let node = SchemaNode::new(Even);
    assert_eq!(validator.validate(&node, &json!(4)), ValidationResult::success(json!(4)));
    assert_eq!(
        validator.validate(&node, &json!(3)).issues(),
        &[Issue::new(GENERIC_FAILURE)]
    );
}

#[test]
fn json_pointer_paths() {
    let registry = registry();
    let node = SchemaNode::new(Pointer("/rows/3/total"));
    let result = Validator::new(&registry).validate(&node, &json!({}));
    assert_eq!(
        result.issues()[0].path,
        Some(vec![
            PathSegment::from("rows"),
            PathSegment::Index(3),
            PathSegment::from("total")
        ])
    );
}

#[test]
fn vendor_error_is_contained() {
    let registry = registry();
    let pending = fluent::Recursive::new();
    let node = fluent::array(pending.reference()).into_node();
    let result = Validator::new(&registry).validate(&node, &json!([1]));
    assert_eq!(result.issues().len(), 1);
    assert!(result.issues()[0].message.contains("lazy schema"));
}

#[test]
fn sync_only_path_of_async_vendor_is_unsupported() {
    let registry = registry();
    let result = Validator::new(&registry).validate(&SchemaNode::new(Deferred), &json!(1));
    assert!(result.issues()[0].message.contains("does not support validate"));
}

#[test]
fn unclaimed_node_fails_with_type_name() {
    let registry = registry();
    let result = Validator::new(&registry).validate(&SchemaNode::new(3.5_f64), &json!(1));
    assert!(!result.is_success());
    assert!(result.issues()[0].message.starts_with("unsupported schema"));
    assert!(result.issues()[0].message.contains("f64"));
}

#[tokio::test]
async fn async_falls_back_to_sync() {
    let registry = registry();
    let validator = Validator::new(&registry);
    let node = fluent::string().min_length(3).into_node();
    let sync = validator.validate(&node, &json!("ab"));
    let asynchronous = validator.validate_async(&node, &json!("ab")).await;
    assert_eq!(sync, asynchronous);
    assert!(!asynchronous.is_success());
}

#[tokio::test]
async fn async_only_vendor() {
    let registry = registry();
    let result = Validator::new(&registry)
        .validate_async(&SchemaNode::new(Deferred), &json!(5))
        .await;
    assert_eq!(result.data(), Some(&json!({"checked": 5})));
}

#[tokio::test]
async fn async_unclaimed_node() {
    let registry = AdapterRegistry::new();
    let result = Validator::new(&registry)
        .validate_async(&SchemaNode::new(()), &Value::Null)
        .await;
    assert!(!result.is_success());
}
