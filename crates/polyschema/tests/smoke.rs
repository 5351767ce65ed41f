//! End-to-end checks of the process-wide entry points with both reference
//! vendors registered once for the whole test binary.

use std::sync::{Arc, Once};

use polyschema::{CompileOptions, SchemaNode};
use polyschema_mock::{describe, fluent, DescribeAdapter, FluentAdapter};
use serde_json::json;

static SETUP: Once = Once::new();

fn setup() {
    SETUP.call_once(|| {
        polyschema::register(Arc::new(FluentAdapter));
        polyschema::register(Arc::new(DescribeAdapter));
    });
}

#[test]
fn compiles_object_with_optional_field() {
    setup();
    let node = fluent::object([
        ("name", fluent::string()),
        ("age", fluent::number().optional()),
    ])
    .into_node();
    assert_eq!(
        polyschema::compile(&node),
        json!({
            "type": "object",
            "properties": {
                "name": {"type": "string"},
                "age": {"type": "number"}
            },
            "required": ["name"]
        })
    );
}

#[test]
fn compile_with_custom_options() {
    setup();
    let options = CompileOptions::default().with_schema_uri("http://json-schema.org/draft-07/schema#");
    let doc = polyschema::compile_with(&fluent::boolean().into_node(), &options);
    assert_eq!(
        doc,
        json!({"$schema": "http://json-schema.org/draft-07/schema#", "type": "boolean"})
    );
}

#[test]
fn validates_through_the_global_registry() {
    setup();
    let node = fluent::string().into_node();
    assert_eq!(
        polyschema::validate(&node, &json!("hello")).to_json(),
        json!({"success": true, "data": "hello"})
    );
    let bad = polyschema::validate(&node, &json!(123));
    assert!(!bad.is_success());
    assert!(!bad.issues().is_empty());
}

#[test]
fn second_vendor_is_reachable() {
    setup();
    let node = describe::schema(json!({"type": "string", "flags": {"presence": "optional"}}));
    assert_eq!(polyschema::compile(&node)["type"], "string");
    assert!(polyschema::validate(&node, &json!("x")).is_success());
    assert!(!polyschema::validate(&node, &json!(1)).is_success());
}

#[test]
fn unclaimed_node_degrades() {
    setup();
    let node = SchemaNode::new(1.5_f64);
    assert_eq!(polyschema::compile(&node), json!({}));
    let result = polyschema::validate(&node, &json!(1));
    assert!(!result.is_success());
    assert!(result.issues()[0].message.starts_with("unsupported schema"));
}

#[test]
fn registry_snapshot_lists_vendors_in_order() {
    setup();
    let snapshot = polyschema::registry();
    let vendors = snapshot.vendors();
    assert_eq!(&vendors[..2], ["fluent", "describe"]);
}

#[tokio::test]
async fn async_validation_falls_back_to_sync() {
    setup();
    let node = fluent::array(fluent::number()).into_node();
    let ok = polyschema::validate_async(&node, &json!([1, 2])).await;
    assert!(ok.is_success());
    let bad = polyschema::validate_async(&node, &json!([1, "2"])).await;
    assert_eq!(bad.issues()[0].to_string(), "[1]: expected number, received string");
}
