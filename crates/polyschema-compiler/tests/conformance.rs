//! # JSON Schema Conformance Tests
//!
//! Compiled documents are checked with the `jsonschema` crate two ways:
//!
//! 1. **Meta-validation.** Every document builds a draft-07 validator.
//! 2. **Agreement with the vendor.** Data the fluent vendor's native
//!    validator accepts must satisfy the compiled document; selected
//!    rejections must be rejected by both.
//!
//! Property tests cover idempotence, the required set, and meta-validity
//! over generated schema trees.

use std::collections::BTreeMap;

use polyschema_compiler::{CompileOptions, Compiler};
use polyschema_core::{NativeOutcome, SchemaAdapter, SchemaNode};
use polyschema_mock::fluent::{self, Fluent, Recursive};
use polyschema_mock::FluentAdapter;
use proptest::prelude::*;
use serde_json::{json, Value};

const DRAFT_07: &str = "http://json-schema.org/draft-07/schema#";

/// Route library logs to the test harness; filter with `RUST_LOG`.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn compile_draft7(node: &SchemaNode) -> Value {
    let registry = polyschema_mock::registry();
    Compiler::new(&registry)
        .with_options(CompileOptions::default().with_schema_uri(DRAFT_07))
        .compile(node)
}

fn vendor_accepts(node: &SchemaNode, data: &Value) -> bool {
    matches!(
        FluentAdapter.validate(node, data),
        Ok(NativeOutcome::Parsed(_) | NativeOutcome::Accepted)
    )
}

struct Case {
    name: &'static str,
    schema: SchemaNode,
    accepted: Vec<Value>,
    rejected: Vec<Value>,
}

fn cases() -> Vec<Case> {
    let tree = Recursive::new();
    let tree_node = tree.define(
        fluent::object([
            ("value", fluent::number().into_node()),
            ("children", fluent::array(tree.reference()).into_node()),
        ])
        .title("Tree"),
    );

    vec![
        Case {
            name: "user",
            schema: fluent::object([
                ("name", fluent::string().min_length(1)),
                ("age", fluent::number().min(0.0).optional()),
                ("tags", fluent::array(fluent::string()).max(3.0)),
                ("role", fluent::enumeration(["admin", "user"])),
                ("nick", fluent::string().nullable()),
            ])
            .into_node(),
            accepted: vec![
                json!({"name": "a", "role": "user", "nick": null, "tags": []}),
                json!({"name": "bob", "age": 3, "role": "admin", "nick": "b", "tags": ["x"], "extra": true}),
            ],
            rejected: vec![
                json!({"name": "", "role": "user", "nick": null, "tags": []}),
                json!({"name": "a", "role": "root", "nick": null, "tags": []}),
                json!({"name": "a", "role": "user", "nick": null, "tags": ["1", "2", "3", "4"]}),
                json!({"role": "user"}),
            ],
        },
        Case {
            name: "tuple with rest",
            schema: fluent::tuple_with_rest([fluent::string()], fluent::number()).into_node(),
            accepted: vec![json!(["a"]), json!(["a", 1, 2])],
            rejected: vec![json!([1]), json!(["a", "b"]), json!([])],
        },
        Case {
            name: "set",
            schema: fluent::set(fluent::number()).into_node(),
            accepted: vec![json!([]), json!([1, 2])],
            rejected: vec![json!([1, 1])],
        },
        Case {
            name: "record with enum keys",
            schema: fluent::record(fluent::enumeration(["x", "y"]), fluent::boolean()).into_node(),
            accepted: vec![json!({}), json!({"x": true, "y": false})],
            rejected: vec![json!({"z": true}), json!({"x": 1})],
        },
        Case {
            name: "recursive tree",
            schema: tree_node,
            accepted: vec![json!({"value": 1, "children": [{"value": 2, "children": []}]})],
            rejected: vec![json!({"value": 1, "children": [{"value": "2", "children": []}]})],
        },
        Case {
            name: "literal union",
            schema: fluent::union([fluent::literal("a"), fluent::literal(1)]).into_node(),
            accepted: vec![json!("a"), json!(1)],
            rejected: vec![json!("b")],
        },
        Case {
            name: "intersection",
            schema: fluent::intersection([
                fluent::object([("a", fluent::string())]),
                fluent::object([("b", fluent::number())]),
            ])
            .into_node(),
            accepted: vec![json!({"a": "x", "b": 1})],
            rejected: vec![json!({"a": "x"})],
        },
        Case {
            name: "refined bounds",
            schema: fluent::number()
                .min(1.0)
                .max(10.0)
                .refine("even", |v| v.as_i64().is_some_and(|n| n % 2 == 0))
                .min(2.0)
                .into_node(),
            accepted: vec![json!(2), json!(10)],
            rejected: vec![json!(1), json!(11)],
        },
        Case {
            name: "nullable union",
            schema: fluent::union([fluent::string(), fluent::boolean()])
                .nullable()
                .into_node(),
            accepted: vec![json!(null), json!("s"), json!(true)],
            rejected: vec![json!(1)],
        },
    ]
}

#[test]
fn compiled_documents_are_valid_draft7() {
    init_tracing();
    for case in cases() {
        let doc = compile_draft7(&case.schema);
        assert!(
            jsonschema::validator_for(&doc).is_ok(),
            "{}: compiled document is not a valid schema: {doc}",
            case.name
        );
    }
}

#[test]
fn documents_accept_what_the_vendor_accepts() {
    init_tracing();
    for case in cases() {
        let doc = compile_draft7(&case.schema);
        let validator = jsonschema::validator_for(&doc).expect("valid schema");
        for data in &case.accepted {
            assert!(vendor_accepts(&case.schema, data), "{}: vendor rejected {data}", case.name);
            assert!(validator.is_valid(data), "{}: document rejected {data}", case.name);
        }
    }
}

#[test]
fn documents_reject_what_the_vendor_rejects() {
    init_tracing();
    for case in cases() {
        let doc = compile_draft7(&case.schema);
        let validator = jsonschema::validator_for(&doc).expect("valid schema");
        for data in &case.rejected {
            assert!(!vendor_accepts(&case.schema, data), "{}: vendor accepted {data}", case.name);
            assert!(!validator.is_valid(data), "{}: document accepted {data}", case.name);
        }
    }
}

// ── Generated schema trees ──────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Gen {
    String,
    Number,
    Boolean,
    Null,
    Literal(i64),
    Enum(Vec<String>),
    Array(Box<Gen>),
    Set(Box<Gen>),
    Tuple(Vec<Gen>),
    Object(Vec<(String, Gen, bool)>),
    Union(Vec<Gen>),
    Nullable(Box<Gen>),
    Bounded(Box<Gen>, u8, u8),
}

impl Gen {
    fn build(&self) -> Fluent {
        match self {
            Self::String => fluent::string(),
            Self::Number => fluent::number(),
            Self::Boolean => fluent::boolean(),
            Self::Null => fluent::null(),
            Self::Literal(n) => fluent::literal(*n),
            Self::Enum(values) => fluent::enumeration(values.clone()),
            Self::Array(inner) => fluent::array(inner.build()),
            Self::Set(inner) => fluent::set(inner.build()),
            Self::Tuple(items) => fluent::tuple(items.iter().map(Gen::build)),
            Self::Object(entries) => fluent::object(entries.iter().map(|(key, inner, optional)| {
                let field = inner.build();
                (key.clone(), if *optional { field.optional() } else { field })
            })),
            Self::Union(options) => fluent::union(options.iter().map(Gen::build)),
            Self::Nullable(inner) => inner.build().nullable(),
            Self::Bounded(inner, min, max) => inner
                .build()
                .refine("bounded", |_| true)
                .min(f64::from(*min))
                .max(f64::from(*max)),
        }
    }
}

fn gen_schema() -> impl Strategy<Value = Gen> {
    let leaf = prop_oneof![
        Just(Gen::String),
        Just(Gen::Number),
        Just(Gen::Boolean),
        Just(Gen::Null),
        any::<i64>().prop_map(Gen::Literal),
        prop::collection::btree_set("[a-z]{1,4}", 1..4)
            .prop_map(|values| Gen::Enum(values.into_iter().collect())),
    ];
    leaf.prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            inner.clone().prop_map(|g| Gen::Array(Box::new(g))),
            inner.clone().prop_map(|g| Gen::Set(Box::new(g))),
            prop::collection::vec(inner.clone(), 0..4).prop_map(Gen::Tuple),
            prop::collection::btree_map("[a-z]{1,6}", (inner.clone(), any::<bool>()), 0..4)
                .prop_map(|fields| Gen::Object(
                    fields.into_iter().map(|(k, (g, opt))| (k, g, opt)).collect()
                )),
            prop::collection::vec(inner.clone(), 0..4).prop_map(Gen::Union),
            inner.clone().prop_map(|g| Gen::Nullable(Box::new(g))),
            (inner, 0u8..10, 0u8..10).prop_map(|(g, min, max)| Gen::Bounded(Box::new(g), min, max)),
        ]
    })
}

proptest! {
    #[test]
    fn compile_is_idempotent(schema in gen_schema()) {
        let node = schema.build().into_node();
        prop_assert_eq!(compile_draft7(&node), compile_draft7(&node));
    }

    #[test]
    fn rebuilt_trees_compile_identically(schema in gen_schema()) {
        let first = compile_draft7(&schema.build().into_node());
        let second = compile_draft7(&schema.build().into_node());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn acyclic_trees_have_no_defs_and_are_valid(schema in gen_schema()) {
        let doc = compile_draft7(&schema.build().into_node());
        prop_assert!(doc.get("$defs").is_none());
        prop_assert!(jsonschema::validator_for(&doc).is_ok(), "invalid schema: {}", doc);
    }

    #[test]
    fn required_is_non_optional_keys_in_order(
        fields in prop::collection::btree_map("[a-z]{1,6}", (gen_schema(), any::<bool>()), 0..6)
    ) {
        let schema = Gen::Object(fields.iter().map(|(k, (g, o))| (k.clone(), g.clone(), *o)).collect());
        let doc = compile_draft7(&schema.build().into_node());
        let expected: Vec<Value> = fields
            .iter()
            .filter(|(_, (_, optional))| !optional)
            .map(|(k, _)| Value::String(k.clone()))
            .collect();
        let properties = doc["properties"].as_object().map(|p| p.len()).unwrap_or(0);
        prop_assert_eq!(properties, fields.len());
        if expected.is_empty() {
            prop_assert!(doc.get("required").is_none());
        } else {
            prop_assert_eq!(&doc["required"], &Value::Array(expected));
        }
    }
}

#[test]
fn required_count_matches_n_minus_k() {
    let fields: BTreeMap<&str, bool> = [("a", false), ("b", true), ("c", false), ("d", true)]
        .into_iter()
        .collect();
    let node = fluent::object(fields.iter().map(|(k, optional)| {
        let field = fluent::any();
        (*k, if *optional { field.optional() } else { field })
    }))
    .into_node();
    let doc = compile_draft7(&node);
    assert_eq!(doc["required"], json!(["a", "c"]));
}
