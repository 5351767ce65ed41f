//! # Fragment Accumulator
//!
//! A [`Fragment`] is one node's JSON Schema under construction: the
//! structural body produced by dispatch plus everything the unwrap layers
//! contribute. Layers are absorbed innermost first, so a later (outer)
//! layer overwrites an earlier (inner) one on every conflicting key.

use polyschema_core::{Constraints, SchemaAdapter, SchemaNode};
use serde_json::{json, Map, Number, Value};

use crate::shape::Bounds;

/// Largest integer an `f64` represents exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

#[derive(Debug, Clone, Default)]
struct Annotations {
    title: Option<String>,
    description: Option<String>,
    default: Option<Value>,
    examples: Vec<Value>,
    deprecated: bool,
}

impl Annotations {
    fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.default.is_none()
            && self.examples.is_empty()
            && !self.deprecated
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Fragment {
    body: Map<String, Value>,
    bounds: Bounds,
    constraints: Constraints,
    annotations: Annotations,
    nullable: bool,
}

impl Fragment {
    pub(crate) fn new(body: Map<String, Value>, bounds: Bounds) -> Self {
        Self {
            body,
            bounds,
            constraints: Constraints::default(),
            annotations: Annotations::default(),
            nullable: false,
        }
    }

    /// The empty schema, which accepts anything.
    pub(crate) fn any() -> Self {
        Self::new(Map::new(), Bounds::Value)
    }

    /// Wrap an already-compiled child document.
    pub(crate) fn embed(schema: Value, bounds: Bounds) -> Self {
        match schema {
            Value::Object(body) => Self::new(body, bounds),
            _ => Self::any(),
        }
    }

    /// Merge the constraints and metadata `adapter` reports for `node`.
    pub(crate) fn absorb(&mut self, adapter: &dyn SchemaAdapter, node: &SchemaNode) {
        if let Some(constraints) = adapter.constraints(node) {
            self.constraints.overlay(&constraints);
        }

        let meta = &mut self.annotations;
        if let Some(title) = adapter.title(node) {
            meta.title = Some(title);
        }
        if let Some(description) = adapter.description(node) {
            meta.description = Some(description);
        }
        if let Some(default) = adapter.default_value(node) {
            meta.default = Some(default);
        }
        let examples = adapter.examples(node);
        if !examples.is_empty() {
            meta.examples = examples;
        }
        if adapter.is_deprecated(node) {
            meta.deprecated = true;
        }
    }

    pub(crate) fn mark_nullable(&mut self) {
        self.nullable = true;
    }

    pub(crate) fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Render the fragment as a JSON Schema object.
    pub(crate) fn finalize(&self) -> Value {
        let mut body = self.body.clone();
        self.render_constraints(&mut body);

        // Keywords beside `$ref` are ignored by draft-07 validators.
        let annotated = !self.nullable && !self.annotations.is_empty();
        if self.body.contains_key("$ref") && (body.len() > self.body.len() || annotated) {
            let mut wrapped = Map::new();
            wrapped.insert("allOf".into(), Value::Array(vec![Value::Object(self.body.clone())]));
            self.render_constraints(&mut wrapped);
            body = wrapped;
        }

        let mut schema = if self.nullable {
            with_null_branch(body)
        } else {
            body
        };

        let meta = &self.annotations;
        if let Some(title) = &meta.title {
            schema.insert("title".into(), Value::String(title.clone()));
        }
        if let Some(description) = &meta.description {
            schema.insert("description".into(), Value::String(description.clone()));
        }
        if let Some(default) = &meta.default {
            schema.insert("default".into(), default.clone());
        }
        if !meta.examples.is_empty() {
            schema.insert("examples".into(), Value::Array(meta.examples.clone()));
        }
        if meta.deprecated {
            schema.insert("deprecated".into(), Value::Bool(true));
        }

        Value::Object(schema)
    }

    fn render_constraints(&self, body: &mut Map<String, Value>) {
        let c = &self.constraints;
        let (min_kw, max_kw) = self.bounds.keywords();
        if let Some(min) = c.min {
            body.insert(min_kw.into(), number(min));
        }
        if let Some(max) = c.max {
            body.insert(max_kw.into(), number(max));
        }

        let (min_len_kw, max_len_kw) = self.bounds.length_keywords();
        if let Some(len) = c.min_length {
            body.insert(min_len_kw.into(), Value::from(len));
        }
        if let Some(len) = c.max_length {
            body.insert(max_len_kw.into(), Value::from(len));
        }

        if let Some(pattern) = &c.pattern {
            body.insert("pattern".into(), Value::String(pattern.clone()));
        }
        if let Some(format) = &c.format {
            body.insert("format".into(), Value::String(format.clone()));
        }
    }
}

/// Union `body` with `{"type": "null"}`.
///
/// A bare `anyOf` gains the null branch in place; anything else becomes
/// the first branch of a new `anyOf`.
fn with_null_branch(mut body: Map<String, Value>) -> Map<String, Value> {
    let null = json!({"type": "null"});
    if body.len() == 1 {
        if let Some(Value::Array(branches)) = body.get_mut("anyOf") {
            if !branches.contains(&null) {
                branches.push(null);
            }
            return body;
        }
    }
    let mut wrapped = Map::new();
    wrapped.insert("anyOf".into(), Value::Array(vec![Value::Object(body), null]));
    wrapped
}

/// JSON number for a bound; integral values render as integers.
fn number(n: f64) -> Value {
    if n.is_finite() && n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        Value::from(n as i64)
    } else {
        Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
    }
}
